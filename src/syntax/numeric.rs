//! Recognizer for Scheme numeric literal syntax.
//!
//! Only decides *whether* a lexeme is a number. Integers, rationals,
//! decimals with exponents, the special values `+inf.0`/`-nan.0`, and
//! rectangular (`1+2i`, `-i`) and polar (`1@2`) complex numbers are accepted.
//! Anything else, e.g. `123.45.67`, is left for the lexer to treat as an
//! identifier.

use once_cell::sync::Lazy;
use regex::Regex;

static SCHEME_NUMBER: Lazy<Regex> = Lazy::new(|| {
    let ureal = r"(?:\d+/\d+|(?:\d+\.?\d*|\.\d+)(?:e[+-]?\d+)?)";
    let special = r"(?:inf\.0|nan\.0)";
    let real = format!(r"(?:[+-]?{ureal}|[+-]{special})");
    let imaginary = format!(r"(?:[+-](?:{ureal}|{special})?i)");
    let pattern = format!(r"(?i)^(?:{real}|{real}?{imaginary}|{real}@{real})$");
    Regex::new(&pattern).expect("numeric literal grammar is a valid regex")
});

/// Returns true if `lexeme` is a complete Scheme numeric literal.
pub fn is_scheme_number(lexeme: &str) -> bool {
    SCHEME_NUMBER.is_match(lexeme)
}

/// Returns true if a lexeme starting with `c` may be a number.
pub fn could_start_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'i' | 'n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_numbers() {
        for lexeme in ["0", "42", "-17", "+3", "1/2", "-3/4", "1.5", ".5", "5.", "1e10", "2.5E-3"] {
            assert!(is_scheme_number(lexeme), "{lexeme} should be a number");
        }
    }

    #[test]
    fn accepts_special_and_complex_numbers() {
        for lexeme in ["+inf.0", "-inf.0", "+nan.0", "1+2i", "3-i", "+i", "-2.5i", "1@2", "+inf.0i"] {
            assert!(is_scheme_number(lexeme), "{lexeme} should be a number");
        }
    }

    #[test]
    fn rejects_number_like_identifiers() {
        for lexeme in ["123.45.67", "+", "-", ".", "...", "1+", "inf.0", "nan", "i", "1/", "/2", "1e", "if"] {
            assert!(!is_scheme_number(lexeme), "{lexeme} should not be a number");
        }
    }
}
