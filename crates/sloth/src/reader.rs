//! S-expression reader: source text to the expression tree
//!
//! Reading happens in two stages. A nom-based scanner turns text into
//! uninterpreted datums, then syntax analysis maps datums onto the `ast`
//! types, resolving special forms, parameter declarations, and the fixed
//! primitive names. Any conforming producer of the same tree shape could
//! replace this module; the evaluator never sees source text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{opt, recognize, value},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{pair, preceded},
    IResult, Parser,
};

use std::rc::Rc;

use crate::ast::{Define, Expr, Param, Program, TopForm};
use crate::error::ParseError;
use crate::primitives::is_primitive;
use crate::value::{PrimOp, Value};

/// Maximum s-expression nesting depth accepted by the reader.
///
/// Bounds the scanner's recursion so hostile input cannot overflow the
/// parser stack; evaluation depth is bounded only by the host stack.
pub const MAX_READ_DEPTH: usize = 64;

const SYMBOL_CHARS: &str = "+-*/<>=!?_.";

/// An uninterpreted s-expression datum.
#[derive(Debug, Clone, PartialEq)]
enum Datum {
    Number(i64),
    Bool(bool),
    Str(String),
    Symbol(String),
    List(Vec<Datum>),
}

// ═══════════════════════════════════════════════════════════════════════
// Scanning
// ═══════════════════════════════════════════════════════════════════════

fn read_number(input: &str) -> IResult<&str, Datum> {
    let (rest, text) = recognize(pair(
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
    ))
    .parse(input)?;

    match text.parse::<i64>() {
        Ok(n) => Ok((rest, Datum::Number(n))),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::Digit,
        ))),
    }
}

fn read_bool(input: &str) -> IResult<&str, Datum> {
    alt((
        value(Datum::Bool(true), tag("#t")),
        value(Datum::Bool(false), tag("#f")),
    ))
    .parse(input)
}

fn read_symbol(input: &str) -> IResult<&str, Datum> {
    let (rest, text) =
        take_while1(|c: char| c.is_alphanumeric() || SYMBOL_CHARS.contains(c)).parse(input)?;

    // A leading digit would have been taken by the number scanner; reject
    // the leftovers of a malformed number rather than calling them a symbol.
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::Alpha,
        )));
    }
    Ok((rest, Datum::Symbol(text.to_string())))
}

fn read_string(input: &str) -> IResult<&str, Datum> {
    let (mut rest, _) = char('"').parse(input)?;
    let mut text = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('"') => return Ok((chars.as_str(), Datum::Str(text))),
            Some('\\') => {
                match chars.next() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some('\\') => text.push('\\'),
                    Some('"') => text.push('"'),
                    _ => {
                        return Err(nom::Err::Error(nom::error::Error::new(
                            rest,
                            ErrorKind::Char,
                        )))
                    }
                }
                rest = chars.as_str();
            }
            Some(c) => {
                text.push(c);
                rest = chars.as_str();
            }
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    rest,
                    ErrorKind::Char,
                )))
            }
        }
    }
}

fn read_list(input: &str, depth: usize) -> IResult<&str, Datum> {
    let (input, _) = char('(').parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    let (input, items) =
        separated_list0(multispace1, |input| read_datum(input, depth + 1)).parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    let (input, _) = char(')').parse(input)?;
    Ok((input, Datum::List(items)))
}

// 'datum is sugar for (quote datum).
fn read_quoted(input: &str, depth: usize) -> IResult<&str, Datum> {
    let (input, _) = char('\'').parse(input)?;
    let (input, datum) = read_datum(input, depth + 1)?;
    Ok((
        input,
        Datum::List(vec![Datum::Symbol("quote".to_string()), datum]),
    ))
}

fn read_datum(input: &str, depth: usize) -> IResult<&str, Datum> {
    if depth >= MAX_READ_DEPTH {
        // Failure, not Error: this must not be backtracked into "end of list".
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    preceded(
        multispace0,
        alt((
            |input| read_quoted(input, depth),
            |input| read_list(input, depth),
            read_number,
            read_bool,
            read_string,
            read_symbol,
        )),
    )
    .parse(input)
}

fn syntax_error(source: &str, err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.code == ErrorKind::TooLarge {
                return ParseError::TooDeep {
                    limit: MAX_READ_DEPTH,
                };
            }
            let position = source.len().saturating_sub(e.input.len());
            if position < source.len() {
                let near: String = source.chars().skip(position).take(12).collect();
                ParseError::Syntax(format!("invalid syntax near `{}`", near))
            } else {
                ParseError::Syntax("unexpected end of input".to_string())
            }
        }
        nom::Err::Incomplete(_) => ParseError::Syntax("incomplete input".to_string()),
    }
}

fn read_all(source: &str) -> Result<Vec<Datum>, ParseError> {
    let mut rest = source.trim_start();
    let mut data = Vec::new();
    while !rest.is_empty() {
        match read_datum(rest, 0) {
            Ok((after, datum)) => {
                data.push(datum);
                rest = after.trim_start();
            }
            Err(err) => return Err(syntax_error(source, err)),
        }
    }
    Ok(data)
}

// ═══════════════════════════════════════════════════════════════════════
// Syntax Analysis
// ═══════════════════════════════════════════════════════════════════════

/// Parse a complete top-level program: an ordered sequence of expressions
/// and definitions.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let data = read_all(source)?;
    let forms = data
        .iter()
        .map(analyze_top)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program { forms })
}

/// Parse exactly one expression; anything after it is an error.
pub fn parse_expr(source: &str) -> Result<Expr, ParseError> {
    match read_datum(source, 0) {
        Ok((rest, datum)) => {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return Err(ParseError::Trailing(rest.chars().take(20).collect()));
            }
            analyze_expr(&datum)
        }
        Err(err) => Err(syntax_error(source, err)),
    }
}

fn analyze_top(datum: &Datum) -> Result<TopForm, ParseError> {
    if let Datum::List(items) = datum {
        if let Some(Datum::Symbol(head)) = items.first() {
            if head == "define" {
                return analyze_define(&items[1..]).map(TopForm::Define);
            }
        }
    }
    analyze_expr(datum).map(TopForm::Expr)
}

fn analyze_define(rest: &[Datum]) -> Result<Define, ParseError> {
    match rest {
        [Datum::Symbol(name), expr] => Ok(Define {
            name: name.clone(),
            expr: analyze_expr(expr)?,
        }),
        _ => Err(bad_form("define", "expected `(define name expr)`")),
    }
}

fn analyze_expr(datum: &Datum) -> Result<Expr, ParseError> {
    match datum {
        Datum::Number(n) => Ok(Expr::Number(*n)),
        Datum::Bool(b) => Ok(Expr::Bool(*b)),
        Datum::Str(s) => Ok(Expr::Str(Rc::from(s.as_str()))),
        Datum::Symbol(name) => {
            // Primitive names resolve at read time, as the fixed operation
            // set is not rebindable.
            if is_primitive(name) {
                Ok(Expr::Prim(PrimOp::new(name)))
            } else {
                Ok(Expr::Var(name.clone()))
            }
        }
        Datum::List(items) => analyze_list(items),
    }
}

fn analyze_list(items: &[Datum]) -> Result<Expr, ParseError> {
    let head = match items.first() {
        Some(head) => head,
        None => return Err(ParseError::Syntax("`()` is not an expression".to_string())),
    };

    if let Datum::Symbol(name) = head {
        match name.as_str() {
            "quote" => return analyze_quote(&items[1..]),
            "if" => return analyze_if(&items[1..]),
            "lambda" => return analyze_lambda(&items[1..]),
            "let" => return analyze_binding_form("let", &items[1..]),
            "letrec" => return analyze_binding_form("letrec", &items[1..]),
            "set!" => return analyze_set(&items[1..]),
            "define" => return Err(ParseError::NestedDefine),
            _ => {}
        }
    }

    let rator = analyze_expr(head)?;
    let rands = items[1..]
        .iter()
        .map(analyze_expr)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::App {
        rator: Box::new(rator),
        rands,
    })
}

fn analyze_quote(rest: &[Datum]) -> Result<Expr, ParseError> {
    match rest {
        [datum] => Ok(Expr::Quote(datum_to_value(datum))),
        _ => Err(bad_form("quote", "expected exactly one datum")),
    }
}

fn analyze_if(rest: &[Datum]) -> Result<Expr, ParseError> {
    match rest {
        [test, then, alt] => Ok(Expr::If {
            test: Box::new(analyze_expr(test)?),
            then: Box::new(analyze_expr(then)?),
            alt: Box::new(analyze_expr(alt)?),
        }),
        _ => Err(bad_form("if", "expected `(if test then alt)`")),
    }
}

fn analyze_lambda(rest: &[Datum]) -> Result<Expr, ParseError> {
    match rest {
        [Datum::List(params), body @ ..] if !body.is_empty() => {
            let params = params
                .iter()
                .map(analyze_param)
                .collect::<Result<Vec<_>, _>>()?;
            let body = body
                .iter()
                .map(analyze_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::Lambda {
                params,
                body: Rc::from(body),
            })
        }
        _ => Err(bad_form("lambda", "expected `(lambda (param ...) body ...)`")),
    }
}

fn analyze_param(datum: &Datum) -> Result<Param, ParseError> {
    match datum {
        Datum::Symbol(name) => Ok(Param::eager(name.clone())),
        Datum::List(items) => match items.as_slice() {
            [Datum::Symbol(name), Datum::Symbol(mode)] if mode == "lazy" => {
                Ok(Param::lazy(name.clone()))
            }
            _ => Err(bad_form("lambda", "parameter must be `name` or `(name lazy)`")),
        },
        _ => Err(bad_form("lambda", "parameter must be `name` or `(name lazy)`")),
    }
}

fn analyze_binding_form(form: &'static str, rest: &[Datum]) -> Result<Expr, ParseError> {
    match rest {
        [Datum::List(bindings), body @ ..] if !body.is_empty() => {
            let bindings = bindings
                .iter()
                .map(|datum| analyze_binding(form, datum))
                .collect::<Result<Vec<_>, _>>()?;
            let body = body
                .iter()
                .map(analyze_expr)
                .collect::<Result<Vec<_>, _>>()?;
            if form == "let" {
                Ok(Expr::Let { bindings, body })
            } else {
                Ok(Expr::Letrec { bindings, body })
            }
        }
        _ => Err(bad_form(
            form,
            format!("expected `({} ((name expr) ...) body ...)`", form),
        )),
    }
}

fn analyze_binding(form: &'static str, datum: &Datum) -> Result<(String, Expr), ParseError> {
    if let Datum::List(items) = datum {
        if let [Datum::Symbol(name), expr] = items.as_slice() {
            return Ok((name.clone(), analyze_expr(expr)?));
        }
    }
    Err(bad_form(form, "binding must be `(name expr)`"))
}

fn analyze_set(rest: &[Datum]) -> Result<Expr, ParseError> {
    match rest {
        [Datum::Symbol(name), expr] => Ok(Expr::Set {
            name: name.clone(),
            expr: Box::new(analyze_expr(expr)?),
        }),
        _ => Err(bad_form("set!", "expected `(set! name expr)`")),
    }
}

// Quoted data becomes values directly: a quoted list is a compound
// structure, a quoted `()` is the empty-structure marker.
fn datum_to_value(datum: &Datum) -> Value {
    match datum {
        Datum::Number(n) => Value::Number(*n),
        Datum::Bool(b) => Value::Bool(*b),
        Datum::Str(s) => Value::string(s),
        Datum::Symbol(s) => Value::symbol(s),
        Datum::List(items) if items.is_empty() => Value::Empty,
        Datum::List(items) => Value::compound(items.iter().map(datum_to_value).collect()),
    }
}

fn bad_form(form: &'static str, message: impl Into<String>) -> ParseError {
    ParseError::BadForm {
        form,
        message: message.into(),
    }
}
