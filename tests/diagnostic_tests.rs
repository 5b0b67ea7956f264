mod common;

use common::{group, lex_error, parse_err, source, FULL};
use miette::Report;
use scheme_front::{ErrorCategory, ErrorKind, ParseOptions, Position};

#[test]
fn excerpt_points_at_mismatched_close() {
    let err = group("(+ 1 2]").unwrap_err();
    assert_eq!(err.excerpt(), "1 | (+ 1 2]\n  |       ^");
}

#[test]
fn excerpt_underlines_whole_token() {
    let err = parse_err("(delay 1)", 1);
    assert_eq!(err.excerpt(), "1 | (delay 1)\n  |  ^----");
}

#[test]
fn excerpt_uses_the_error_line() {
    let err = parse_err("(define x 1)\n(f ,x)", FULL);
    assert_eq!(err.position(), Position::new(2, 4, 16));
    assert_eq!(err.excerpt(), "2 | (f ,x)\n  |    ^");
}

#[test]
fn unterminated_list_points_at_open() {
    let err = group("(a b").unwrap_err();
    assert_eq!(err.excerpt(), "1 | (a b\n  | ^");
}

#[test]
fn each_stage_has_its_category() {
    let cases = [
        (lex_error("\"abc"), ErrorCategory::Lexical, "scheme::lexical::unterminated_string"),
        (
            group("(a").unwrap_err(),
            ErrorCategory::Structural,
            "scheme::structural::unterminated_form",
        ),
        (
            parse_err("(if)", FULL),
            ErrorCategory::Grammar,
            "scheme::grammar::expected_form",
        ),
        (
            parse_err("(define-syntax m (syntax-rules () ((_) ...)))", 5),
            ErrorCategory::Macro,
            "scheme::macro::invalid_template",
        ),
    ];
    for (err, category, code) in cases {
        assert_eq!(err.category(), category, "{err}");
        assert_eq!(err.code_name(), code);
    }
}

#[test]
fn message_names_category_position_and_form() {
    let err = parse_err("(if)", FULL);
    assert_eq!(
        err.to_string(),
        "Grammar error at 1:1: expected (if <predicate> <consequent> <alternative>?), found `(if)`"
    );
}

#[test]
fn long_forms_are_abbreviated() {
    let err = parse_err("(if a b c d e f g h i j k l m n o p q r s t u v w x y z)", FULL);
    let ErrorKind::ExpectedForm { found, .. } = &err.kind else {
        panic!("expected form error, got {:?}", err.kind);
    };
    assert!(found.ends_with("..."), "{found}");
    assert!(found.chars().count() <= 48);
}

#[test]
fn nesting_limit_is_enforced_while_grouping() {
    let source = source("(((x)))");
    assert!(scheme_front::group_with_depth(&source, 3).is_ok());
    let err = scheme_front::group_with_depth(&source, 2).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooDeeplyNested { limit: 2 });
    assert_eq!(err.category(), ErrorCategory::Structural);
    assert_eq!(err.position().column, 3);
}

#[test]
fn parse_options_carry_the_nesting_limit() {
    let source = source("(f (g (h x)))");
    let options = ParseOptions {
        max_depth: 2,
        ..ParseOptions::with_chapter(FULL)
    };
    let err = scheme_front::parse(&source, options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooDeeplyNested { limit: 2 });
}

#[test]
fn kinds_carry_help() {
    let err = group("[a)").unwrap_err();
    assert_eq!(err.help.as_deref(), Some("`[` must be closed by `]`"));

    let err = parse_err("(set! x 1)", 2);
    assert_eq!(err.help.as_deref(), Some("this form is available from chapter 3"));

    let err = err.with_help("upgrade the chapter");
    assert_eq!(err.help.as_deref(), Some("upgrade the chapter"));
}

#[test]
fn report_includes_code_and_help() {
    let err = group("(1 2]").unwrap_err();
    let output = format!("{:?}", Report::new(err));
    assert!(output.contains("scheme::structural::mismatched_parenthesis"), "{output}");
    assert!(output.contains("must be closed by"), "{output}");
}
