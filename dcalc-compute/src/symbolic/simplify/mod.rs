//! Simplification of expression trees: constant folding and algebraic identities.
//!
//! Simplification is a single bottom-up pass. Children are rewritten before their parent's
//! rules fire, so constants fold all the way up the tree in one traversal. The pass is
//! deterministic and applies a fixed rule set; it does not search for a unique normal form.

pub mod rules;

use dcalc_error::Error;
use dcalc_parser::parser::ast::Node;
use crate::numerical::eval::eval_func;
use crate::numerical::trig_mode::TrigMode;

/// Simplifies the given expression tree, returning a new tree.
///
/// The input is never modified, so a caller's tree is left intact even when simplification
/// fails. Fails if any division in the tree has a provably zero denominator.
pub fn simplify(node: &Node) -> Result<Node, Error> {
    match node {
        Node::Number(_) | Node::Variable(_) => Ok(node.clone()),
        Node::Binary { op, lhs, rhs } => {
            let lhs = simplify(lhs)?;
            let rhs = simplify(rhs)?;
            rules::binary(*op, lhs, rhs)
        }
        Node::FuncCall { func, arg } => {
            let arg = simplify(arg)?;
            // a call with a literal argument folds to its value; constant trigonometry is
            // evaluated in radians
            if let Some(value) = arg.as_number() {
                Ok(Node::Number(eval_func(*func, value, TrigMode::Radians)))
            } else {
                Ok(Node::FuncCall {
                    func: *func,
                    arg: Box::new(arg),
                })
            }
        }
    }
}
