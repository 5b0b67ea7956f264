mod common;

use common::group;
use scheme_front::{Datum, ErrorCategory, ErrorKind, Position, TokenType};

fn render(data: &[Datum]) -> String {
    data.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn regrouping_rendered_data_is_idempotent() {
    let sources = [
        "(define (f x) (g x 'y))",
        "[a (b [c]) ()]",
        "`(1 ,x ,@xs . tail)",
        "#(1 #(2) \"s\\\"q\") |odd name| #t",
        "(a #;(ignored) b) ''c",
        "(quote (unquote-splicing x))",
    ];
    for text in sources {
        let first = group(text).unwrap();
        let rendered = render(&first);
        let second = group(&rendered).unwrap();
        assert_eq!(first.len(), second.len(), "{text} -> {rendered}");
        for (a, b) in first.iter().zip(&second) {
            assert!(a.equals(b), "{text} regrouped as {rendered}");
        }
    }
}

#[test]
fn matching_brackets_are_accepted() {
    assert!(group("(1 2)").is_ok());
    assert!(group("[1 2]").is_ok());
    assert!(group("([1] [(2)])").is_ok());
}

#[test]
fn mismatched_brackets_are_structural_errors() {
    for text in ["(1 2]", "[1 2)"] {
        let err = group(text).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Structural, "{text}");
        assert!(
            matches!(err.kind, ErrorKind::MismatchedParenthesis { .. }),
            "{text}: {:?}",
            err.kind
        );
        assert_eq!(err.position(), Position::new(1, 5, 4));
    }
}

#[test]
fn stray_close_is_unexpected() {
    let err = group("(a) )").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedToken { found: ")".into() });
    assert_eq!(err.position().column, 5);
}

#[test]
fn unterminated_list_points_at_its_open() {
    let err = group("(a (b)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedForm { open: "(".into() });
    assert_eq!(err.position(), Position::new(1, 1, 0));
}

#[test]
fn parentheses_are_kept_inside_groups() {
    let data = group("(a b)").unwrap();
    let group = data[0].as_group().unwrap();
    assert!(group.is_parenthesized());
    assert_eq!(group.elements().len(), 4);
    assert_eq!(group.len(), 2);
    assert_eq!(group.open_token().map(|t| t.kind), Some(TokenType::LeftParen));
}

#[test]
fn affectors_bind_tightly_and_nest() {
    let data = group("'`,@x y").unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].to_string(), "'`,@x");

    let outer = data[0].as_group().unwrap();
    let (affector, target) = outer.affector().unwrap();
    assert_eq!(affector.kind, TokenType::Apostrophe);
    assert!(target.as_group().and_then(|g| g.affector()).is_some());
}

#[test]
fn affector_takes_whole_list() {
    let data = group("#(1 (2 3)) 4").unwrap();
    assert_eq!(data.len(), 2);
    let (affector, target) = data[0].as_group().unwrap().affector().unwrap();
    assert_eq!(affector.kind, TokenType::HashVector);
    assert_eq!(target.as_list().map(|g| g.len()), Some(2));
}

#[test]
fn datum_comments_vanish_everywhere() {
    let data = group("#;top (a #;(b c) d) #;x").unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].to_string(), "(a d)");
}

#[test]
fn affector_needs_a_target() {
    let err = group("(a ')").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Structural);
    let err = group("'").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnexpectedToken {
            found: "end of input".into()
        }
    );
}

#[test]
fn group_location_spans_parentheses() {
    let data = group("  (a\n b)").unwrap();
    let location = data[0].location();
    assert_eq!(location.start, Position::new(1, 3, 2));
    assert_eq!(location.end, Position::new(2, 4, 8));
}
