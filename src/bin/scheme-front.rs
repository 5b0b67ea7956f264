// scheme-front command-line entry point.
// Usage: scheme-front <tokens|group|ast|check> [options]

fn main() {
    scheme_front::cli::run();
}
