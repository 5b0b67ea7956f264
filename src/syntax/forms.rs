//! Special forms.
//!
//! Each parser re-checks the arity and shape of its form and fails with an
//! expected-form error quoting the grammar it wanted. Chapter gating happens
//! before these are called, in the parser's dispatch.

use crate::ast::{
    Atomic, Expression, Extended, Identifier, StringLiteral, SyntaxRule, SyntaxRules,
};
use crate::diagnostics::{ErrorReporting, SyntaxError};

use super::datum::{Datum, Group};
use super::parser::{Parser, QuoteMode};
use super::token::{Literal, TokenType};
use super::validator::{validate_pattern, validate_template};
use super::SourceText;

const LAMBDA_FORM: &str =
    "(lambda (<identifier>* . <rest-identifier>?) <body>+) | (lambda <rest-identifier> <body>+)";
const DEFINE_FORM: &str =
    "(define <identifier> <expression>) | (define (<identifier> <formals>) <body>+)";
const IF_FORM: &str = "(if <predicate> <consequent> <alternative>?)";
const LET_FORM: &str = "(let ((<identifier> <value>)*) <body>+)";
const LET_BINDING: &str = "(<identifier> <value>)";
const COND_FORM: &str = "(cond (<predicate> <consequent>*)+ (else <consequent>+)?)";
const BEGIN_FORM: &str = "(begin <body>+)";
const SET_FORM: &str = "(set! <identifier> <expression>)";
const DELAY_FORM: &str = "(delay <expression>)";
const IMPORT_FORM: &str = "(import \"<source>\" (<identifier>*))";
const EXPORT_FORM: &str = "(export (<definition>))";
const DEFINE_SYNTAX_FORM: &str = "(define-syntax <identifier> <transformer>)";
const SYNTAX_RULES_FORM: &str = "(syntax-rules (<literal>*) <syntax-rule>+)";
const SYNTAX_RULE: &str = "(<pattern> <template>)";

impl Parser<'_> {
    pub(super) fn parse_lambda(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() < 3 {
            return Err(self.expected(LAMBDA_FORM, group));
        }
        let (params, rest) = match &items[1] {
            formals if formals.as_list().is_some() => self.parse_formals(formals)?,
            formals => {
                let rest = self.parse_identifier(formals, LAMBDA_FORM)?;
                (Vec::new(), Some(rest))
            }
        };
        let body = self.parse_body(&items[2..])?;
        Ok(Atomic::Lambda {
            params,
            rest,
            body: Box::new(body),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_define(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() < 3 {
            return Err(self.expected(DEFINE_FORM, group));
        }

        if let Some(signature) = items[1].as_list() {
            let (mut names, rest) = self.parse_formals(&items[1])?;
            if names.is_empty() {
                return Err(self.expected(DEFINE_FORM, signature));
            }
            let name = names.remove(0);
            let body = self.parse_body(&items[2..])?;
            return Ok(Extended::FunctionDefinition {
                name,
                params: names,
                rest,
                body: Box::new(body),
                location: group.location(),
            }
            .into());
        }

        if items.len() != 3 {
            return Err(self.expected(DEFINE_FORM, group));
        }
        let name = self.parse_identifier(&items[1], DEFINE_FORM)?;
        let value = self.parse_expression(&items[2])?;
        Ok(Atomic::Definition {
            name,
            value: Box::new(value),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_conditional(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if !(3..=4).contains(&items.len()) {
            return Err(self.expected(IF_FORM, group));
        }
        let test = self.parse_expression(&items[1])?;
        let consequent = self.parse_expression(&items[2])?;
        let alternate = match items.get(3) {
            Some(alternate) => self.parse_expression(alternate)?,
            None => Identifier::new("undefined", group.location()).into(),
        };
        Ok(Atomic::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_let(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() < 3 {
            return Err(self.expected(LET_FORM, group));
        }
        let Some(bindings) = items[1].as_list() else {
            return Err(self.expected_at(LET_FORM, &items[1]));
        };

        let mut identifiers = Vec::with_capacity(bindings.len());
        let mut values = Vec::with_capacity(bindings.len());
        for binding in bindings.contents() {
            let pair = match binding.as_list() {
                Some(pair) if pair.len() == 2 => pair.contents(),
                _ => return Err(self.expected_at(LET_BINDING, binding)),
            };
            identifiers.push(self.parse_identifier(&pair[0], LET_BINDING)?);
            values.push(self.parse_expression(&pair[1])?);
        }

        let body = self.parse_body(&items[2..])?;
        Ok(Extended::Let {
            identifiers,
            values,
            body: Box::new(body),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_cond(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let clauses = &group.contents()[1..];
        if clauses.is_empty() {
            return Err(self.expected(COND_FORM, group));
        }

        let mut predicates = Vec::with_capacity(clauses.len());
        let mut consequents = Vec::with_capacity(clauses.len());
        let mut catch_all = None;
        for (index, clause) in clauses.iter().enumerate() {
            let parts = match clause.as_list() {
                Some(list) if !list.is_empty() => list.contents(),
                _ => return Err(self.expected_at(COND_FORM, clause)),
            };
            if parts[0].is_token(TokenType::Else) {
                if index + 1 != clauses.len() || parts.len() < 2 {
                    return Err(self.expected_at(COND_FORM, clause));
                }
                catch_all = Some(Box::new(self.parse_body(&parts[1..])?));
                continue;
            }
            let predicate = self.parse_expression(&parts[0])?;
            let consequent = if parts.len() == 1 {
                predicate.clone()
            } else {
                self.parse_body(&parts[1..])?
            };
            predicates.push(predicate);
            consequents.push(consequent);
        }

        Ok(Extended::Cond {
            predicates,
            consequents,
            catch_all,
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_begin(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() < 2 {
            return Err(self.expected(BEGIN_FORM, group));
        }
        let expressions = items[1..]
            .iter()
            .map(|item| self.parse_expression(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Extended::Begin {
            expressions,
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_set(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() != 3 {
            return Err(self.expected(SET_FORM, group));
        }
        let name = self.parse_identifier(&items[1], SET_FORM)?;
        let value = self.parse_expression(&items[2])?;
        Ok(Atomic::Reassignment {
            name,
            value: Box::new(value),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_delay(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() != 2 {
            return Err(self.expected(DELAY_FORM, group));
        }
        let expression = self.parse_expression(&items[1])?;
        Ok(Extended::Delay {
            expression: Box::new(expression),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_import(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() != 3 {
            return Err(self.expected(IMPORT_FORM, group));
        }
        let source = match items[1].as_token() {
            Some(token) if token.kind == TokenType::String => match &token.literal {
                Some(Literal::String(value)) => StringLiteral {
                    value: value.clone(),
                    location: token.location(),
                },
                _ => return Err(self.expected_at(IMPORT_FORM, &items[1])),
            },
            _ => return Err(self.expected_at(IMPORT_FORM, &items[1])),
        };
        let Some(names) = items[2].as_list() else {
            return Err(self.expected_at(IMPORT_FORM, &items[2]));
        };
        let identifiers = names
            .contents()
            .iter()
            .map(|name| self.parse_identifier(name, IMPORT_FORM))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Atomic::Import {
            source,
            identifiers,
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_export(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() != 2 || items[1].as_list().is_none() {
            return Err(self.expected(EXPORT_FORM, group));
        }
        let definition = self.parse_expression(&items[1])?;
        if !definition.is_definition() {
            return Err(self.expected_at(EXPORT_FORM, &items[1]));
        }
        Ok(Atomic::Export {
            definition: Box::new(definition),
            location: group.location(),
        }
        .into())
    }

    pub(super) fn parse_define_syntax(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.len() != 3 {
            return Err(self.expected(DEFINE_SYNTAX_FORM, group));
        }
        let name = self
            .with_quote_mode(QuoteMode::Quote, |parser| parser.parse_expression(&items[1]))?
            .into_symbol()
            .ok_or_else(|| self.expected_at(DEFINE_SYNTAX_FORM, &items[1]))?;

        let transformer = match items[2].as_list() {
            Some(list) if list.head_token().map(|t| t.kind) == Some(TokenType::SyntaxRules) => {
                self.parse_syntax_rules(list)?
            }
            _ => return Err(self.expected_at(DEFINE_SYNTAX_FORM, &items[2])),
        };
        Ok(Atomic::DefineSyntax {
            name,
            transformer,
            location: group.location(),
        }
        .into())
    }

    /// Parses and validates a transformer; patterns and templates stay data.
    pub(super) fn parse_syntax_rules(&mut self, group: &Group) -> Result<SyntaxRules, SyntaxError> {
        let items = group.contents();
        if items.len() < 3 {
            return Err(self.expected(SYNTAX_RULES_FORM, group));
        }
        let Some(literal_list) = items[1].as_list() else {
            return Err(self.expected_at(SYNTAX_RULES_FORM, &items[1]));
        };

        self.with_quote_mode(QuoteMode::Quote, |parser| {
            let mut literals = Vec::with_capacity(literal_list.len());
            for literal in literal_list.contents() {
                let symbol = parser
                    .parse_expression(literal)?
                    .into_symbol()
                    .ok_or_else(|| parser.expected_at(SYNTAX_RULES_FORM, literal))?;
                literals.push(symbol);
            }

            let mut rules = Vec::with_capacity(items.len() - 2);
            for rule in &items[2..] {
                let parts = match rule.as_list() {
                    Some(list) if list.len() == 2 => list.contents(),
                    _ => return Err(parser.expected_at(SYNTAX_RULE, rule)),
                };
                let pattern = parser.parse_expression(&parts[0])?;
                let template = parser.parse_expression(&parts[1])?;
                validate_pattern(parser.source, &pattern)?;
                validate_template(parser.source, &template)?;
                rules.push(SyntaxRule { pattern, template });
            }

            Ok(SyntaxRules {
                literals,
                rules,
                location: group.location(),
            })
        })
    }
}

// ============================================================================
// HELPERS
// ============================================================================

impl Parser<'_> {
    /// Formals of `lambda` and `define`: identifiers, possibly dotted.
    fn parse_formals(
        &mut self,
        formals: &Datum,
    ) -> Result<(Vec<Identifier>, Option<Identifier>), SyntaxError> {
        let Some(list) = formals.as_list() else {
            return Err(self.expected_at("(<identifier>* . <rest-identifier>?)", formals));
        };
        let source = self.source;
        let (params, rest) =
            self.destructure_list(list.contents(), |item| verify_identifier(source, item))?;
        let params = params
            .into_iter()
            .map(|param| self.into_identifier(param))
            .collect::<Result<Vec<_>, _>>()?;
        let rest = rest.map(|rest| self.into_identifier(rest)).transpose()?;
        Ok((params, rest))
    }

    fn parse_identifier(&mut self, datum: &Datum, form: &str) -> Result<Identifier, SyntaxError> {
        verify_identifier(self.source, datum)
            .map_err(|_| self.expected_at(form, datum))?;
        let expression = self.parse_expression(datum)?;
        self.into_identifier(expression)
    }

    fn into_identifier(&self, expression: Expression) -> Result<Identifier, SyntaxError> {
        let location = expression.location();
        match expression {
            Expression::Atomic(Atomic::Identifier(identifier)) => Ok(identifier),
            other => Err(self.source.expected_form("<identifier>", &other, location)),
        }
    }

    /// One or more body expressions; several are wrapped in a sequence.
    fn parse_body(&mut self, items: &[Datum]) -> Result<Expression, SyntaxError> {
        let body = items
            .iter()
            .map(|item| self.parse_expression(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expression::sequence(body))
    }

    fn expected(&self, form: &str, group: &Group) -> SyntaxError {
        self.source.expected_form(form, group, group.location())
    }

    fn expected_at(&self, form: &str, datum: &Datum) -> SyntaxError {
        self.source.expected_form(form, datum, datum.location())
    }
}

fn verify_identifier(source: &SourceText, datum: &Datum) -> Result<(), SyntaxError> {
    match datum.as_token() {
        Some(token) if token.kind == TokenType::Identifier => Ok(()),
        _ => Err(source.expected_form("<identifier>", datum, datum.location())),
    }
}
