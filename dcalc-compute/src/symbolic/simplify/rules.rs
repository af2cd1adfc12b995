//! Simplification rules for binary operations.
//!
//! Each rule takes the already-simplified operands and returns `Some(expr)` with the rewritten
//! expression if it applies, or `None` if it does not. Within a rule the checks run in a fixed
//! order, so e.g. `0^0` resolves through the zero-base rule.

use dcalc_error::Error;
use dcalc_parser::parser::ast::{BinOpKind, Node};
use crate::numerical::eval::eval_operands;
use super::super::error::DivisionByZero;

/// Applies the identity rules for `op` to the simplified operands. Operands that no rule
/// touches are rebuilt into a binary node unchanged.
pub(crate) fn binary(op: BinOpKind, lhs: Node, rhs: Node) -> Result<Node, Error> {
    let rewritten = match op {
        BinOpKind::Add => add(&lhs, &rhs),
        BinOpKind::Sub => sub(&lhs, &rhs),
        BinOpKind::Mul => mul(&lhs, &rhs),
        BinOpKind::Div => div(&lhs, &rhs)?,
        BinOpKind::Pow => pow(&lhs, &rhs),
    };

    Ok(rewritten.unwrap_or(Node::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }))
}

/// `c+k` folds; `0+a = a`; `a+0 = a`.
fn add(lhs: &Node, rhs: &Node) -> Option<Node> {
    fold(BinOpKind::Add, lhs, rhs)
        .or_else(|| lhs.is_exactly(0.0).then(|| rhs.clone()))
        .or_else(|| rhs.is_exactly(0.0).then(|| lhs.clone()))
}

/// `c-k` folds; `0-a = (-1)*a`; `a-0 = a`.
fn sub(lhs: &Node, rhs: &Node) -> Option<Node> {
    fold(BinOpKind::Sub, lhs, rhs)
        .or_else(|| {
            lhs.is_exactly(0.0).then(|| Node::Binary {
                op: BinOpKind::Mul,
                lhs: Box::new(Node::Number(-1.0)),
                rhs: Box::new(rhs.clone()),
            })
        })
        .or_else(|| rhs.is_exactly(0.0).then(|| lhs.clone()))
}

/// `0*a = a*0 = 0`; `1*a = a`; `a*1 = a`; `c*k` folds.
fn mul(lhs: &Node, rhs: &Node) -> Option<Node> {
    if lhs.is_exactly(0.0) || rhs.is_exactly(0.0) {
        return Some(Node::Number(0.0));
    }

    lhs.is_exactly(1.0)
        .then(|| rhs.clone())
        .or_else(|| rhs.is_exactly(1.0).then(|| lhs.clone()))
        .or_else(|| fold(BinOpKind::Mul, lhs, rhs))
}

/// `a/0` is a static error; `c/k` folds.
fn div(lhs: &Node, rhs: &Node) -> Result<Option<Node>, Error> {
    if rhs.is_exactly(0.0) {
        let expr = Node::Binary {
            op: BinOpKind::Div,
            lhs: Box::new(lhs.clone()),
            rhs: Box::new(rhs.clone()),
        };
        return Err(Error::spanless(DivisionByZero {
            expr: expr.to_string(),
        }));
    }

    Ok(fold(BinOpKind::Div, lhs, rhs))
}

/// `0^a = 0`; `1^a = 1`; `a^0 = 1`; `a^1 = a`; `c^k` folds.
fn pow(lhs: &Node, rhs: &Node) -> Option<Node> {
    if lhs.is_exactly(0.0) {
        return Some(Node::Number(0.0));
    }
    if lhs.is_exactly(1.0) || rhs.is_exactly(0.0) {
        return Some(Node::Number(1.0));
    }

    rhs.is_exactly(1.0)
        .then(|| lhs.clone())
        .or_else(|| fold(BinOpKind::Pow, lhs, rhs))
}

/// Replaces two literal operands with the literal result of the operation.
fn fold(op: BinOpKind, lhs: &Node, rhs: &Node) -> Option<Node> {
    match (lhs, rhs) {
        (Node::Number(left), Node::Number(right)) => {
            Some(Node::Number(eval_operands(op, *left, *right)))
        }
        _ => None,
    }
}
