//! Numerical evaluation of expression trees.
//!
//! Evaluation is a pure function of a tree and a [`Ctxt`]: variable bindings and the angle unit
//! are looked up in the context, never stored in the tree, so a tree and a context can be
//! evaluated concurrently from any number of threads.
//!
//! Division by zero and the poles of `tan` and `cot` are not checked here; they produce the
//! usual IEEE-754 infinities and NaNs, and a negative base raised to a fractional power follows
//! [`f64::powf`]. Only the simplifier performs static division-by-zero detection.

use dcalc_error::Error;
use dcalc_parser::parser::ast::{BinOpKind, Func, Node};
use super::ctxt::Ctxt;
use super::error::UndefinedVariable;
use super::trig_mode::TrigMode;

/// Trait for types that can be evaluated to a numeric value within a context.
pub trait Eval {
    /// Evaluate the expression, returning the computed value.
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error>;
}

impl Eval for Node {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        match self {
            Node::Number(value) => Ok(*value),
            Node::Variable(name) => ctxt.get_var(name).ok_or_else(|| {
                Error::spanless(UndefinedVariable {
                    name: name.clone(),
                    suggestions: ctxt.get_similar_vars(name),
                })
            }),
            Node::Binary { op, lhs, rhs } => {
                Ok(eval_operands(*op, lhs.eval(ctxt)?, rhs.eval(ctxt)?))
            }
            Node::FuncCall { func, arg } => Ok(eval_func(*func, arg.eval(ctxt)?, ctxt.trig_mode)),
        }
    }
}

/// Evaluates the binary expression given the operator and the operand values.
pub(crate) fn eval_operands(op: BinOpKind, left: f64, right: f64) -> f64 {
    match op {
        BinOpKind::Add => left + right,
        BinOpKind::Sub => left - right,
        BinOpKind::Mul => left * right,
        BinOpKind::Div => left / right,
        BinOpKind::Pow => left.powf(right),
    }
}

/// Applies the unary function to the evaluated argument.
///
/// In degrees mode, arguments to the trigonometric functions are converted to radians first;
/// `ln` is unaffected by the mode.
pub(crate) fn eval_func(func: Func, arg: f64, trig_mode: TrigMode) -> f64 {
    let arg = if func.is_trig() && trig_mode == TrigMode::Degrees {
        arg.to_radians()
    } else {
        arg
    };

    match func {
        Func::Sin => arg.sin(),
        Func::Cos => arg.cos(),
        Func::Tan => arg.tan(),
        Func::Cot => arg.tan().recip(),
        Func::Ln => arg.ln(),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use dcalc_parser::parser::Parser;
    use super::*;

    fn parse(input: &str) -> Node {
        Parser::new(input).parse().unwrap()
    }

    #[test]
    fn linear_evaluation() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 5.0);
        assert_eq!(parse("2*x+3").eval(&ctxt).unwrap(), 13.0);
    }

    #[test]
    fn power_and_functions() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 2.0);
        assert_eq!(parse("x^3").eval(&ctxt).unwrap(), 8.0);
        assert_float_absolute_eq!(parse("ln(e)").eval(&ctxt).unwrap(), 1.0);
        assert_float_absolute_eq!(parse("sin(pi)").eval(&ctxt).unwrap(), 0.0);
    }

    #[test]
    fn degrees_mode_affects_trig_only() {
        let mut ctxt = Ctxt::with_trig_mode(TrigMode::Degrees);
        ctxt.add_var("x", 90.0);
        assert_float_absolute_eq!(parse("sin(x)").eval(&ctxt).unwrap(), 1.0);
        assert_float_absolute_eq!(parse("cos(x)").eval(&ctxt).unwrap(), 0.0);
        // ln ignores the angle unit
        assert_float_absolute_eq!(parse("ln(x)").eval(&ctxt).unwrap(), 90.0_f64.ln());
    }

    #[test]
    fn cotangent() {
        let ctxt = Ctxt::new();
        assert_float_absolute_eq!(parse("cot(1)").eval(&ctxt).unwrap(), 1.0 / 1.0_f64.tan());
    }

    #[test]
    fn division_by_zero_is_permissive() {
        // evaluation follows IEEE-754; only the simplifier rejects a provably zero denominator
        let ctxt = Ctxt::new();
        assert_eq!(parse("1/0").eval(&ctxt).unwrap(), f64::INFINITY);
        assert!(parse("0/0").eval(&ctxt).unwrap().is_nan());
        assert_eq!(parse("cot(0)").eval(&ctxt).unwrap(), f64::INFINITY);
    }

    #[test]
    fn negative_base_fractional_power_follows_host_semantics() {
        let ctxt = Ctxt::new();
        assert!(parse("(-8)^(0.5)").eval(&ctxt).unwrap().is_nan());
    }

    #[test]
    fn undefined_variable() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 1.0);

        let err = parse("y").eval(&ctxt).unwrap_err();
        let kind = err.downcast::<UndefinedVariable>().unwrap();
        assert_eq!(kind.name, "y");
        assert_eq!(kind.suggestions, ["x"]);
    }
}
