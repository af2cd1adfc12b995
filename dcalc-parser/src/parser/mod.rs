//! A recursive parser for plain arithmetic expressions.
//!
//! Parsing happens in two stages. The [preprocessor](preprocess) normalizes the raw text, then
//! [`create_node`] recursively splits the normalized text at the lowest-precedence top-level
//! operator found by the [splitter](splitter), bottoming out in the terminal productions:
//! numeric literals, unary function calls, and variable references.

pub mod ast;
pub mod error;
pub mod preprocess;
pub mod splitter;

use ast::{BinOpKind, Func, Node};
use crate::tokenizer::{tokenize_spanned, Token};
use dcalc_error::Error;
use error::{EmptyExpression, UnparsableToken};
use levenshtein::levenshtein;
use preprocess::Preprocessed;
use splitter::divider_position;
use std::ops::Range;

/// A high-level parser for arithmetic expressions. This is the type to use to parse an arbitrary
/// piece of text into an expression tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The source text being parsed.
    source: &'source str,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self { source }
    }

    /// Parses the source into an expression tree.
    ///
    /// Spans attached to a returned error point into the original source, not the normalized
    /// text the parser works on internally.
    pub fn parse(&self) -> Result<Node, Error> {
        let normalized = Preprocessed::new(self.source);
        create_node(&normalized.text, 0).map_err(|err| normalized.remap(err))
    }
}

/// Recursively builds a [`Node`] from a normalized substring. `base` is the byte offset of
/// `text` within the full normalized input, used to report spans.
fn create_node(text: &str, base: usize) -> Result<Node, Error> {
    if text.is_empty() {
        return Err(Error::new(vec![base..base], EmptyExpression));
    }

    let tokens = tokenize_spanned(text);

    // strip one layer of fully enclosing brackets and start over
    if is_fully_enclosed(&tokens) {
        return create_node(&text[1..text.len() - 1], base + 1);
    }

    if let Some(split) = divider_position(&tokens, base)? {
        let lhs = create_node(&text[..split.pos], base)?;
        let rhs = create_node(&text[split.pos + 1..], base + split.pos + 1)?;
        return Ok(Node::Binary {
            op: split.op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        });
    }

    // terminal productions, in order: numeric literal, unary function call, variable
    if let Some(node) = parse_number(text, &tokens) {
        return Ok(node);
    }

    if let Some(result) = parse_function(text, &tokens, base) {
        return result;
    }

    parse_variable(text, &tokens, base)
}

/// Returns true if the substring is wrapped in a pair of brackets that enclose all of it, i.e.
/// the opening bracket pairs with the final closing bracket.
fn is_fully_enclosed(tokens: &[(Token, Range<usize>)]) -> bool {
    let [(Token::OpenParen, _), .., (Token::CloseParen, _)] = tokens else {
        return false;
    };

    let mut depth = 0usize;
    for (token, _) in &tokens[..tokens.len() - 1] {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return false;
        }
    }
    true
}

/// Attempts to parse the substring as a numeric literal: an optionally signed decimal number
/// (with `.` or `,` as the decimal separator), or one of the symbolic constants `e` and `pi`.
fn parse_number(text: &str, tokens: &[(Token, Range<usize>)]) -> Option<Node> {
    let (sign, rest) = match tokens {
        [(Token::Add, _), rest @ ..] => (1.0, rest),
        [(Token::Sub, _), rest @ ..] => (-1.0, rest),
        rest => (1.0, rest),
    };

    let value = match rest {
        [(Token::Number, span)] => text[span.clone()].parse::<f64>().ok()?,
        [(Token::Number, int), (Token::Dot | Token::Comma, _), (Token::Number, frac)] => {
            format!("{}.{}", &text[int.clone()], &text[frac.clone()])
                .parse::<f64>()
                .ok()?
        }
        [(Token::Name, span)] => match &text[span.clone()] {
            "e" => std::f64::consts::E,
            "pi" => std::f64::consts::PI,
            _ => return None,
        },
        _ => return None,
    };

    Some(Node::Number(sign * value))
}

/// Attempts to parse the substring as a call to a known unary function. The bracketed argument
/// is parsed recursively.
fn parse_function(
    text: &str,
    tokens: &[(Token, Range<usize>)],
    base: usize,
) -> Option<Result<Node, Error>> {
    let [(Token::Name, name), (Token::OpenParen, open), .., (Token::CloseParen, _)] = tokens
    else {
        return None;
    };
    let func = Func::from_name(&text[name.clone()])?;

    Some(
        create_node(&text[open.start..], base + open.start).map(|arg| Node::FuncCall {
            func,
            arg: Box::new(arg),
        }),
    )
}

/// Parses the substring as a variable reference: a leading `+` is dropped, a leading `-` becomes
/// a multiplication by `-1`, and the remaining name must be identifier-shaped.
fn parse_variable(
    text: &str,
    tokens: &[(Token, Range<usize>)],
    base: usize,
) -> Result<Node, Error> {
    let (negated, name) = match text.as_bytes() {
        [b'+', ..] => (false, &text[1..]),
        [b'-', ..] => (true, &text[1..]),
        _ => (false, text),
    };

    if !is_identifier(name) {
        return Err(Error::new(
            vec![base..base + text.len()],
            UnparsableToken {
                token: text.to_string(),
                suggestions: similar_functions(text, tokens),
            },
        ));
    }

    let variable = Node::Variable(name.to_string());
    if negated {
        Ok(Node::Binary {
            op: BinOpKind::Mul,
            lhs: Box::new(Node::Number(-1.0)),
            rhs: Box::new(variable),
        })
    } else {
        Ok(variable)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// If the rejected text is shaped like a call to an unknown function, returns the names of known
/// functions similar to the one used.
fn similar_functions(text: &str, tokens: &[(Token, Range<usize>)]) -> Vec<String> {
    let [(Token::Name, span), (Token::OpenParen, _), .., (Token::CloseParen, _)] = tokens else {
        return Vec::new();
    };

    let name = &text[span.clone()];
    Func::NAMES
        .iter()
        .filter(|known| levenshtein(known, name) < 2)
        .map(|known| known.to_string())
        .collect()
}
