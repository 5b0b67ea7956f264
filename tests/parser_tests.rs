mod common;

use common::{apply, assert_equals, ident, num, parse_at, parse_err, parse_ok, parse_one, FULL};
use scheme_front::{Atomic, Chapter, ErrorKind, Expression, Extended, ParseOptions, SourceText};

#[test]
fn square_is_a_function_definition() {
    let program = parse_at("(define (square x) (* x x))", 1).unwrap();
    assert_eq!(program.len(), 1);
    let Expression::Extended(Extended::FunctionDefinition {
        name,
        params,
        rest,
        body,
        ..
    }) = &program[0]
    else {
        panic!("expected a function definition, got {:?}", program[0]);
    };
    assert_eq!(name.name, "square");
    assert_eq!(
        params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        vec!["x"]
    );
    assert!(rest.is_none());
    assert_equals(body, &apply(ident("*"), vec![ident("x"), ident("x")]));
}

#[test]
fn delay_is_gated_by_chapter() {
    let err = parse_err("(delay 1)", 1);
    assert_eq!(
        err.kind,
        ErrorKind::DisallowedToken {
            token: "delay".into(),
            chapter: Chapter(1),
            required: Chapter::LAZY,
        }
    );
    assert_eq!(
        err.to_string(),
        "Grammar error at 1:2: `delay` requires chapter 3, but chapter 1 is active"
    );

    let program = parse_at("(delay 1)", 3).unwrap();
    assert_eq!(program[0].type_name(), "Delay");
}

#[test]
fn mutation_forms_need_chapter_three() {
    for text in ["(begin 1 2)", "(set! x 1)"] {
        let err = parse_err(text, 2);
        assert!(
            matches!(err.kind, ErrorKind::DisallowedToken { required, .. } if required == Chapter::MUTABLE),
            "{text}: {:?}",
            err.kind
        );
    }
    let program = parse_at("(begin (set! x 1) x)", 3).unwrap();
    let Expression::Extended(Extended::Begin { expressions, .. }) = &program[0] else {
        panic!("expected begin");
    };
    assert_eq!(expressions[0].type_name(), "Reassignment");
    assert_eq!(expressions[1].type_name(), "Identifier");
}

#[test]
fn lambda_with_dotted_formals_and_long_body() {
    let Expression::Atomic(Atomic::Lambda {
        params, rest, body, ..
    }) = parse_one("(lambda (a b . c) (display a) c)")
    else {
        panic!("expected lambda");
    };
    assert_eq!(params.len(), 2);
    assert_eq!(rest.map(|r| r.name), Some("c".to_string()));
    let Expression::Atomic(Atomic::Sequence { expressions, .. }) = *body else {
        panic!("expected sequence body");
    };
    assert_equals(&expressions[0], &apply(ident("display"), vec![ident("a")]));
    assert_equals(&expressions[1], &ident("c"));
}

#[test]
fn single_body_is_not_wrapped() {
    let Expression::Atomic(Atomic::Lambda { body, .. }) = parse_one("(lambda () 1)") else {
        panic!("expected lambda");
    };
    assert_equals(&body, &num("1"));
}

#[test]
fn variable_definition() {
    let Expression::Atomic(Atomic::Definition { name, value, .. }) = parse_one("(define x (f 1))")
    else {
        panic!("expected definition");
    };
    assert_eq!(name.name, "x");
    assert_equals(&value, &apply(ident("f"), vec![num("1")]));
}

#[test]
fn malformed_forms_report_expected_grammar() {
    let cases = [
        ("(define x)", "(define <identifier>"),
        ("(define x 1 2)", "(define <identifier>"),
        ("(define 1 2)", "(define <identifier>"),
        ("(if a)", "(if <predicate>"),
        ("(lambda (x))", "(lambda"),
        ("(let ((x)) x)", "(<identifier> <value>)"),
        ("(let x x)", "(let"),
        ("(cond)", "(cond"),
        ("(set! 1 2)", "(set!"),
        ("(delay)", "(delay"),
        ("(import lib (f))", "(import"),
        ("(import \"lib\" f)", "(import"),
        ("(export x)", "(export"),
    ];
    for (text, grammar) in cases {
        let err = parse_err(text, FULL);
        match &err.kind {
            ErrorKind::ExpectedForm { expected, .. } => {
                assert!(expected.starts_with(grammar), "{text}: {expected}")
            }
            other => panic!("{text}: expected ExpectedForm, got {other:?}"),
        }
    }
}

#[test]
fn let_binds_in_order() {
    let Expression::Extended(Extended::Let {
        identifiers,
        values,
        body,
        ..
    }) = parse_one("(let ((x 1) (y \"s\")) (f x y))")
    else {
        panic!("expected let");
    };
    let names: Vec<_> = identifiers.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_equals(&values[0], &num("1"));
    assert_equals(&values[1], &common::string("s"));
    assert_eq!(body.type_name(), "Application");
}

#[test]
fn cond_with_else_and_test_only_clause() {
    let Expression::Extended(Extended::Cond {
        predicates,
        consequents,
        catch_all,
        ..
    }) = parse_one("(cond ((> x 0) 1) (y) (else 2 3))")
    else {
        panic!("expected cond");
    };
    assert_eq!(predicates.len(), 2);
    assert_equals(&consequents[0], &num("1"));
    assert_equals(&consequents[1], &ident("y"));
    let catch_all = catch_all.expect("else clause");
    assert_eq!(catch_all.type_name(), "Sequence");
}

#[test]
fn cond_without_else_has_no_catch_all() {
    let Expression::Extended(Extended::Cond { catch_all, .. }) = parse_one("(cond (a 1))") else {
        panic!("expected cond");
    };
    assert!(catch_all.is_none());
}

#[test]
fn two_branch_if_gets_undefined_alternative() {
    let program = parse_ok("(if #t 1)");
    assert_eq!(program[0].pretty(), "(if #t 1 undefined)");
}

#[test]
fn import_and_export() {
    let Expression::Atomic(Atomic::Import {
        source,
        identifiers,
        ..
    }) = parse_one("(import \"lib\" (a b))")
    else {
        panic!("expected import");
    };
    assert_eq!(source.value, "lib");
    assert_eq!(identifiers.len(), 2);

    let Expression::Atomic(Atomic::Export { definition, .. }) = parse_one("(export (define (f) 1))")
    else {
        panic!("expected export");
    };
    assert_eq!(definition.type_name(), "FunctionDefinition");
}

#[test]
fn macro_chapter_hoists_imports_and_quotes_the_rest() {
    let source = SourceText::new("main.scm", "(import \"lib\" (f)) (define x 1) (f x)");
    let program = scheme_front::parse(&source, ParseOptions::default()).unwrap();
    let kinds: Vec<_> = program.iter().map(Expression::type_name).collect();
    assert_eq!(kinds, vec!["Import", "List", "List"]);

    let Expression::Extended(Extended::List { elements, .. }) = &program[1] else {
        panic!("expected list");
    };
    assert_eq!(elements[0].as_symbol().map(|s| s.value.as_str()), Some("define"));
    assert_eq!(program[2].pretty(), "'(f x)");
}

#[test]
fn macro_chapter_still_validates_forms() {
    let err = parse_err("(define x)", 5);
    assert!(matches!(err.kind, ErrorKind::ExpectedForm { .. }));
}

#[test]
fn programs_serialize_with_node_type() {
    let program = parse_at("(define (square x) (* x x))", 1).unwrap();
    let json = serde_json::to_string(&program).unwrap();
    assert!(json.contains("\"type\":\"FunctionDefinition\""), "{json}");
    assert!(json.contains("\"type\":\"Application\""), "{json}");
}

#[test]
fn pretty_output_parses_back_to_the_same_tree() {
    let sources = [
        "(define (f a . rest) (g a) rest)",
        "(lambda args args)",
        "(let ((x 1) (y \"s\\\"\")) (+ x y))",
        "(cond ((> x 0) 'pos) (z) (else 'neg))",
        "(if #t 1)",
        "(begin (set! x #f) (delay x))",
        "(export (define y '(1 2 . 3)))",
        "`(a ,b ,@c)",
        "#(1 \"two\" three)",
    ];
    for text in sources {
        let first = parse_ok(text);
        let rendered = first
            .iter()
            .map(Expression::pretty)
            .collect::<Vec<_>>()
            .join(" ");
        let second = parse_ok(&rendered);
        assert_eq!(first.len(), second.len(), "{text} -> {rendered}");
        for (a, b) in first.iter().zip(&second) {
            assert!(a.equals(b), "{text} reparsed from {rendered}");
        }
    }
}
