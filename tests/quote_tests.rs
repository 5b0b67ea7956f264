mod common;

use common::{
    apply, assert_equals, dotted, ident, list, num, parse_at, parse_err, parse_one, string, sym,
    FULL,
};
use scheme_front::{Atomic, Chapter, ErrorKind, Expression, Extended, Position};

#[test]
fn quasiquote_keeps_order_around_unquote() {
    let expr = parse_one("`(1 ,(+ 1 1) 3)");
    assert_equals(
        &expr,
        &list(vec![
            num("1"),
            apply(ident("+"), vec![num("1"), num("1")]),
            num("3"),
        ]),
    );
    assert_eq!(expr.pretty(), "`(1 ,(+ 1 1) 3)");
}

#[test]
fn dotted_and_proper_lists_differ() {
    let dotted_list = parse_one("'(1 2 . 3)");
    let proper_list = parse_one("'(1 2 3)");
    assert_equals(&dotted_list, &dotted(vec![num("1"), num("2")], num("3")));
    assert_equals(&proper_list, &list(vec![num("1"), num("2"), num("3")]));
    assert!(!dotted_list.equals(&proper_list));
}

#[test]
fn identifiers_and_keywords_become_symbols() {
    assert_equals(&parse_one("'x"), &sym("x"));
    assert_equals(
        &parse_one("'(define if else \"s\" #t)"),
        &list(vec![
            sym("define"),
            sym("if"),
            sym("else"),
            string("s"),
            Atomic::BooleanLiteral(scheme_front::ast::BooleanLiteral {
                value: true,
                location: Default::default(),
            })
            .into(),
        ]),
    );
}

#[test]
fn empty_quoted_list_is_nil() {
    for text in ["'()", "`[]", "(quote ())"] {
        assert_eq!(parse_one(text).type_name(), "Nil", "{text}");
    }
}

#[test]
fn nested_quote_is_kept_as_data() {
    assert_equals(&parse_one("''a"), &list(vec![sym("quote"), sym("a")]));
    assert_equals(
        &parse_one("'(a ,b)"),
        &list(vec![sym("a"), list(vec![sym("unquote"), sym("b")])]),
    );
}

#[test]
fn long_affectors_match_short_ones() {
    assert!(parse_one("(quote (a b))").equals(&parse_one("'(a b)")));
    assert!(parse_one("(quasiquote a)").equals(&parse_one("`a")));
}

#[test]
fn long_unquote_inside_quoted_group_is_data() {
    assert_equals(
        &parse_one("(quasiquote (a (unquote b)))"),
        &list(vec![sym("a"), list(vec![sym("unquote"), sym("b")])]),
    );
}

#[test]
fn long_affector_needs_exactly_one_datum() {
    for text in ["(quote)", "(quote a b)"] {
        let err = parse_err(text, FULL);
        assert_eq!(
            err.kind,
            ErrorKind::ExpectedForm {
                expected: "(quote <datum>)".into(),
                found: text.into(),
            }
        );
    }
}

#[test]
fn unquote_outside_quasiquote_is_unsupported() {
    let err = parse_err("(f ,x)", FULL);
    assert_eq!(
        err.kind,
        ErrorKind::UnsupportedToken {
            token: ",".into(),
            reason: "unquote is only valid inside a quasiquote".into(),
        }
    );
    assert_eq!(err.position(), Position::new(1, 4, 3));
}

#[test]
fn mode_returns_to_quasiquote_after_unquote() {
    assert_equals(&parse_one("`(,x y)"), &list(vec![ident("x"), sym("y")]));
    assert_equals(&parse_one("`,x"), &ident("x"));
}

#[test]
fn splicing_wraps_value_in_marker() {
    let Expression::Extended(Extended::List { elements, .. }) = parse_one("`(a ,@xs)") else {
        panic!("expected list");
    };
    let Expression::Atomic(Atomic::SpliceMarker { value, location }) = &elements[1] else {
        panic!("expected splice marker, got {:?}", elements[1]);
    };
    assert_equals(value, &ident("xs"));
    assert_eq!(location.start, Position::new(1, 5, 4));
    assert_eq!(location.end.offset, 8);
}

#[test]
fn vectors_hold_data() {
    let program = parse_at("#(1 (2 3) x)", 3).unwrap();
    let Expression::Atomic(Atomic::Vector { elements, .. }) = &program[0] else {
        panic!("expected vector");
    };
    assert_equals(&elements[0], &num("1"));
    assert_equals(&elements[1], &list(vec![num("2"), num("3")]));
    assert_equals(&elements[2], &sym("x"));
    assert_eq!(program[0].pretty(), "#(1 (2 3) x)");
}

#[test]
fn vectors_need_chapter_three() {
    let err = parse_err("#(1 2)", 2);
    assert_eq!(
        err.kind,
        ErrorKind::DisallowedToken {
            token: "#".into(),
            chapter: Chapter(2),
            required: Chapter::VECTOR,
        }
    );
}

#[test]
fn quoting_needs_chapter_two() {
    for (text, token) in [("'a", "'"), ("(quote a)", "quote"), ("`a", "`")] {
        let err = parse_err(text, 1);
        assert_eq!(
            err.kind,
            ErrorKind::DisallowedToken {
                token: token.into(),
                chapter: Chapter(1),
                required: Chapter::QUOTING,
            },
            "{text}"
        );
    }
    assert!(parse_at("'a", 2).is_ok());
}

#[test]
fn dot_needs_a_preceding_element() {
    let err = parse_err("'(. a)", FULL);
    assert!(matches!(err.kind, ErrorKind::ExpectedForm { .. }));
}
