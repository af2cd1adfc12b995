//! The public facade tying parsing, evaluation, differentiation and simplification together.

use dcalc_error::Error;
use dcalc_parser::parser::ast::{Node, TreeNode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use dcalc_parser::parser::Parser;
use crate::numerical::ctxt::Ctxt;
use crate::numerical::error::ArityMismatch;
use crate::numerical::eval::Eval;
use crate::numerical::trig_mode::TrigMode;
use crate::symbolic::error::UnsupportedDerivative;
use crate::symbolic::{derivative, simplify};
use std::fmt;

/// A parsed expression: the tree, its free variables, and the operations defined on them.
///
/// The free variables are kept in canonical order (lexicographically sorted, no duplicates);
/// [`evaluate`](Expression::evaluate) binds its values to them positionally in that order.
///
/// The tree is never modified after construction. The transforming operations return new
/// `Expression`s whose variable lists are recomputed from the result tree, so a variable that a
/// rewrite eliminated (`x*0`) is dropped, and no variable is ever invented.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    /// The root of the expression tree.
    root: Node,

    /// The free variables of the tree, in canonical order.
    variables: Vec<String>,

    /// The value computed by the most recent evaluation, if any.
    last_value: Option<f64>,
}

impl Expression {
    /// Parses the given text into an expression.
    pub fn new(input: &str) -> Result<Expression, Error> {
        Ok(Expression::from_root(Parser::new(input).parse()?))
    }

    /// Wraps an already-built tree, discovering its free variables.
    fn from_root(root: Node) -> Expression {
        let variables = root.variables();
        Expression {
            root,
            variables,
            last_value: None,
        }
    }

    /// The root node of the expression tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The free variables of the expression, in canonical order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The most recently evaluated value, if the expression has been evaluated at all.
    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    /// Evaluates the expression in radians mode.
    ///
    /// See [`evaluate_with_mode`](Expression::evaluate_with_mode).
    pub fn evaluate(&mut self, values: &[f64]) -> Result<f64, Error> {
        self.evaluate_with_mode(values, TrigMode::default())
    }

    /// Evaluates the expression with the given trigonometric mode.
    ///
    /// `values` are bound to the free variables positionally in canonical order, so its length
    /// must equal the number of free variables. The computed value is cached and also available
    /// through [`last_value`](Expression::last_value) afterwards.
    pub fn evaluate_with_mode(
        &mut self,
        values: &[f64],
        trig_mode: TrigMode,
    ) -> Result<f64, Error> {
        if values.len() != self.variables.len() {
            return Err(Error::spanless(ArityMismatch {
                expected: self.variables.len(),
                given: values.len(),
            }));
        }

        let mut ctxt = Ctxt::with_trig_mode(trig_mode);
        for (name, value) in self.variables.iter().zip(values) {
            ctxt.add_var(name, *value);
        }

        let value = self.root.eval(&ctxt)?;
        self.last_value = Some(value);
        Ok(value)
    }

    /// Differentiates the expression with respect to its sole free variable.
    ///
    /// An expression with no free variables is a constant and differentiates to zero. An
    /// expression with more than one free variable has no single full derivative; use
    /// [`differentiate_by`](Expression::differentiate_by) instead.
    pub fn differentiate(&self) -> Result<Expression, Error> {
        match self.variables.as_slice() {
            [] => Ok(Expression::from_root(Node::Number(0.0))),
            [var] => Ok(Expression::from_root(derivative(&self.root, var))),
            vars => Err(Error::spanless(UnsupportedDerivative {
                variables: vars.to_vec(),
            })),
        }
    }

    /// Differentiates the expression with respect to `var`, treating every other variable as a
    /// symbolic constant.
    pub fn differentiate_by(&self, var: &str) -> Expression {
        Expression::from_root(derivative(&self.root, var))
    }

    /// Simplifies the expression via constant folding and algebraic identities.
    ///
    /// Fails if the tree contains a division with a provably zero denominator; the expression
    /// itself is left untouched in that case.
    pub fn optimize(&self) -> Result<Expression, Error> {
        Ok(Expression::from_root(simplify(&self.root)?))
    }

    /// Converts the expression into the generic labeled tree consumed by display adapters.
    pub fn display_tree(&self) -> TreeNode {
        self.root.display_tree()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use crate::numerical::error::{ArityMismatch, UndefinedVariable};
    use crate::symbolic::error::{DivisionByZero, UnsupportedDerivative};
    use super::*;

    fn expr(input: &str) -> Expression {
        Expression::new(input).unwrap()
    }

    #[test]
    fn implicit_multiplication_evaluates_identically() {
        for x in [-2.0, 0.0, 1.0, 3.5] {
            assert_eq!(
                expr("2x").evaluate(&[x]).unwrap(),
                expr("2*x").evaluate(&[x]).unwrap(),
            );
        }
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(expr("10-3-2").evaluate(&[]).unwrap(), 5.0);
    }

    #[test]
    fn linear_evaluation() {
        assert_eq!(expr("2*x+3").evaluate(&[5.0]).unwrap(), 13.0);
    }

    #[test]
    fn values_bind_in_sorted_variable_order() {
        let mut quotient = expr("x/y");
        assert_eq!(quotient.variables(), ["x", "y"]);
        assert_eq!(quotient.evaluate(&[6.0, 2.0]).unwrap(), 3.0);
    }

    #[test]
    fn arity_is_enforced() {
        let mut sum = expr("x+y");
        let err = sum.evaluate(&[1.0]).unwrap_err();
        let kind = err.downcast::<ArityMismatch>().unwrap();
        assert_eq!((kind.expected, kind.given), (2, 1));

        assert!(sum.evaluate(&[1.0, 2.0, 3.0]).unwrap_err().is::<ArityMismatch>());
        assert!(expr("2+2").evaluate(&[1.0]).unwrap_err().is::<ArityMismatch>());
    }

    #[test]
    fn evaluation_caches_the_result() {
        let mut linear = expr("2*x+3");
        assert_eq!(linear.last_value(), None);
        linear.evaluate(&[5.0]).unwrap();
        assert_eq!(linear.last_value(), Some(13.0));
    }

    #[test]
    fn degrees_mode() {
        let mut sine = expr("sin(x)");
        assert_float_absolute_eq!(
            sine.evaluate_with_mode(&[90.0], TrigMode::Degrees).unwrap(),
            1.0
        );
    }

    #[test]
    fn differentiation_correctness() {
        let mut diff = expr("x^2").differentiate().unwrap();
        assert_eq!(diff.evaluate(&[3.0]).unwrap(), 6.0);
    }

    #[test]
    fn constant_differentiates_to_zero() {
        let mut diff = expr("2+3").differentiate().unwrap();
        assert_eq!(diff.evaluate(&[]).unwrap(), 0.0);
    }

    #[test]
    fn multi_variable_full_derivative_is_rejected() {
        let err = expr("x+y").differentiate().unwrap_err();
        let kind = err.downcast::<UnsupportedDerivative>().unwrap();
        assert_eq!(kind.variables, ["x", "y"]);
    }

    #[test]
    fn partial_derivative_independence() {
        let product = expr("x*y");

        let mut by_x = product.differentiate_by("x");
        assert_eq!(by_x.variables(), ["y"]);
        assert_eq!(by_x.evaluate(&[4.0]).unwrap(), 4.0);

        let by_y = product.differentiate_by("y");
        assert_eq!(by_y.variables(), ["x"]);
    }

    #[test]
    fn optimizer_identities() {
        let optimized = expr("x*1").optimize().unwrap();
        assert_eq!(optimized.root(), expr("x").root());

        let err = expr("x/0").optimize().unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    #[test]
    fn optimization_reconciles_the_variable_list() {
        let source = expr("x*0+y");
        assert_eq!(source.variables(), ["x", "y"]);

        let optimized = source.optimize().unwrap();
        assert_eq!(optimized.variables(), ["y"]);
        // the source expression is untouched
        assert_eq!(source.variables(), ["x", "y"]);
    }

    #[test]
    fn display_round_trip_preserves_values() {
        let mut source = expr("x/(y*z)+sin(x)*2");
        let mut reparsed = expr(&source.optimize().unwrap().to_string());

        for binding in [[3.0, 2.0, 5.0], [1.0, 4.0, 0.5], [-2.0, 1.5, 2.0]] {
            assert_float_absolute_eq!(
                source.evaluate(&binding).unwrap(),
                reparsed.evaluate(&binding).unwrap()
            );
        }
    }

    #[test]
    fn display_tree_orders_operands_for_the_renderer() {
        let tree = expr("x+1").display_tree();
        assert_eq!(tree.label, "+");
        assert_eq!(tree.children[0].label, "1");
        assert_eq!(tree.children[1].label, "x");
    }

    #[test]
    fn standalone_evaluation_validates_variables() {
        // evaluating a tree directly against an incomplete context reports the missing name
        let product = expr("x*y");
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 1.0);
        let err = product.root().eval(&ctxt).unwrap_err();
        assert!(err.is::<UndefinedVariable>());
    }
}
