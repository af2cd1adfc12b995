//! Symbolic differentiation of expression trees.
//!
//! Differentiation is a structural rewrite: it reads the input tree and builds a new tree
//! representing the derivative, case by case over the node variants. Operands that do not
//! depend on the differentiation variable are treated as constants
//! ([`Node::is_const_relative`]), which is what makes the same engine compute partial
//! derivatives of multi-variable expressions.
//!
//! The produced trees are left unsimplified; run them through
//! [`simplify`](super::simplify::simplify) to fold the `*1` and `+0` noise away.

use dcalc_parser::parser::ast::{BinOpKind, Func, Node};

fn num(value: f64) -> Node {
    Node::Number(value)
}

fn binary(op: BinOpKind, lhs: Node, rhs: Node) -> Node {
    Node::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn call(func: Func, arg: Node) -> Node {
    Node::FuncCall {
        func,
        arg: Box::new(arg),
    }
}

/// Negates the expression: a literal is negated in place, anything else is multiplied by `-1`.
fn neg(node: &Node) -> Node {
    match node {
        Node::Number(value) => num(-value),
        _ => binary(BinOpKind::Mul, num(-1.0), node.clone()),
    }
}

/// Builds the expression one less than the given one, folding literals.
fn decremented(node: &Node) -> Node {
    match node {
        Node::Number(value) => num(value - 1.0),
        _ => binary(BinOpKind::Sub, node.clone(), num(1.0)),
    }
}

/// Returns true if the node is exactly the differentiation variable.
fn is_bare(node: &Node, var: &str) -> bool {
    matches!(node, Node::Variable(name) if name == var)
}

/// Produces the derivative of the given expression with respect to `var`.
///
/// Every other variable is held symbolically constant, so for a multi-variable expression this
/// is the partial derivative. The input tree is never modified; the result shares no nodes with
/// it.
pub fn derivative(node: &Node, var: &str) -> Node {
    match node {
        Node::Number(_) => num(0.0),
        Node::Variable(name) => {
            if name == var {
                num(1.0)
            } else {
                num(0.0)
            }
        }
        // (f ± g)' = f' ± g'
        Node::Binary {
            op: op @ (BinOpKind::Add | BinOpKind::Sub),
            lhs,
            rhs,
        } => binary(*op, derivative(lhs, var), derivative(rhs, var)),
        Node::Binary {
            op: BinOpKind::Mul,
            lhs,
            rhs,
        } => product(lhs, rhs, var),
        Node::Binary {
            op: BinOpKind::Div,
            lhs,
            rhs,
        } => quotient(lhs, rhs, var),
        Node::Binary {
            op: BinOpKind::Pow,
            lhs,
            rhs,
        } => power(node, lhs, rhs, var),
        Node::FuncCall { func, arg } => function(*func, arg, var),
    }
}

fn product(f: &Node, g: &Node, var: &str) -> Node {
    // (c*g)' = c*g'
    if f.is_const_relative(var) {
        binary(BinOpKind::Mul, f.clone(), derivative(g, var))
    // (f*c)' = f'*c
    } else if g.is_const_relative(var) {
        binary(BinOpKind::Mul, derivative(f, var), g.clone())
    // (f*g)' = f'*g + f*g'
    } else {
        binary(
            BinOpKind::Add,
            binary(BinOpKind::Mul, derivative(f, var), g.clone()),
            binary(BinOpKind::Mul, f.clone(), derivative(g, var)),
        )
    }
}

fn quotient(f: &Node, g: &Node, var: &str) -> Node {
    let f_const = f.is_const_relative(var);
    let g_const = g.is_const_relative(var);

    // (c/k)' = 0
    if f_const && g_const {
        num(0.0)
    // (f/c)' = f'/c
    } else if g_const {
        binary(BinOpKind::Div, derivative(f, var), g.clone())
    // (c/g)' = -c*g'/g^2
    } else if f_const {
        binary(
            BinOpKind::Div,
            binary(BinOpKind::Mul, neg(f), derivative(g, var)),
            binary(BinOpKind::Pow, g.clone(), num(2.0)),
        )
    // (f/g)' = (f'*g - f*g')/g^2
    } else {
        binary(
            BinOpKind::Div,
            binary(
                BinOpKind::Sub,
                binary(BinOpKind::Mul, derivative(f, var), g.clone()),
                binary(BinOpKind::Mul, f.clone(), derivative(g, var)),
            ),
            binary(BinOpKind::Pow, g.clone(), num(2.0)),
        )
    }
}

fn power(node: &Node, f: &Node, g: &Node, var: &str) -> Node {
    let f_const = f.is_const_relative(var);
    let g_const = g.is_const_relative(var);

    // (c^k)' = 0
    if f_const && g_const {
        return num(0.0);
    }

    if g_const {
        let lowered = binary(BinOpKind::Pow, f.clone(), decremented(g));
        // (x^c)' = c*x^(c-1)
        return if is_bare(f, var) {
            binary(BinOpKind::Mul, g.clone(), lowered)
        // (f^c)' = c*f^(c-1)*f'
        } else {
            binary(
                BinOpKind::Mul,
                g.clone(),
                binary(BinOpKind::Mul, lowered, derivative(f, var)),
            )
        };
    }

    if f_const {
        let ln = call(Func::Ln, f.clone());
        // (a^x)' = ln(a)*a^x
        return if is_bare(g, var) {
            binary(BinOpKind::Mul, ln, node.clone())
        // (a^g)' = ln(a)*a^g*g'
        } else {
            binary(
                BinOpKind::Mul,
                ln,
                binary(BinOpKind::Mul, node.clone(), derivative(g, var)),
            )
        };
    }

    // (f^g)' = f^g*(g'*ln(f) + g*f'/f)
    binary(
        BinOpKind::Mul,
        node.clone(),
        binary(
            BinOpKind::Add,
            binary(
                BinOpKind::Mul,
                derivative(g, var),
                call(Func::Ln, f.clone()),
            ),
            binary(
                BinOpKind::Mul,
                g.clone(),
                binary(BinOpKind::Div, derivative(f, var), f.clone()),
            ),
        ),
    )
}

fn function(func: Func, arg: &Node, var: &str) -> Node {
    if arg.is_const_relative(var) {
        return num(0.0);
    }

    // when the argument is the bare variable, the chain-rule factor is 1 and is omitted
    let bare = is_bare(arg, var);
    match func {
        // sin(f)' = f'*cos(f)
        Func::Sin => {
            let cos = call(Func::Cos, arg.clone());
            if bare {
                cos
            } else {
                binary(BinOpKind::Mul, derivative(arg, var), cos)
            }
        }
        // cos(f)' = -1*f'*sin(f)
        Func::Cos => {
            let sin = call(Func::Sin, arg.clone());
            let left = if bare {
                num(-1.0)
            } else {
                binary(BinOpKind::Mul, num(-1.0), derivative(arg, var))
            };
            binary(BinOpKind::Mul, left, sin)
        }
        // tan(f)' = f'/cos(f)^2
        Func::Tan => {
            let denominator = binary(BinOpKind::Pow, call(Func::Cos, arg.clone()), num(2.0));
            let numerator = if bare { num(1.0) } else { derivative(arg, var) };
            binary(BinOpKind::Div, numerator, denominator)
        }
        // cot(f)' = -1*f'/sin(f)^2
        Func::Cot => {
            let denominator = binary(BinOpKind::Pow, call(Func::Sin, arg.clone()), num(2.0));
            let numerator = if bare {
                num(-1.0)
            } else {
                binary(BinOpKind::Mul, num(-1.0), derivative(arg, var))
            };
            binary(BinOpKind::Div, numerator, denominator)
        }
        // ln(f)' = f'/f
        Func::Ln => {
            let numerator = if bare { num(1.0) } else { derivative(arg, var) };
            binary(BinOpKind::Div, numerator, arg.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use dcalc_parser::parser::Parser;
    use pretty_assertions::assert_eq;
    use crate::numerical::ctxt::Ctxt;
    use crate::numerical::eval::Eval;
    use super::*;

    fn parse(input: &str) -> Node {
        Parser::new(input).parse().unwrap()
    }

    /// Boilerplate helper for evaluating an expression at a given value of `x`.
    fn eval_x(node: &Node, x: f64) -> f64 {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", x);
        node.eval(&ctxt).unwrap()
    }

    /// Approximates the derivative of the expression at `x` with a central finite difference.
    fn finite_difference(node: &Node, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(node, x + DX) - eval_x(node, x - DX)) / (2.0 * DX)
    }

    /// Checks the symbolic derivative of `function` against a finite difference at each of the
    /// given points.
    fn check_derivative(function: &str, points: &[f64]) {
        const TOL: f64 = 1e-4;

        let node = parse(function);
        let diff = derivative(&node, "x");

        for &point in points {
            let symbolic = eval_x(&diff, point);
            let numeric = finite_difference(&node, point);
            assert!(
                (symbolic - numeric).abs() < TOL,
                "for \"{function}\" at x={point}, the symbolic derivative gave {symbolic} \
                 but the finite difference gave {numeric}"
            );
        }
    }

    #[test]
    fn power_rule() {
        check_derivative("x^2+x+1", &[0.0, 1.0, 2.0, 5.0, 8.0]);
        check_derivative("x^3-2*x", &[-2.0, 0.0, 1.5, 3.0]);
    }

    #[test]
    fn power_rule_general_base() {
        check_derivative("(x^2+1)^3", &[0.0, 0.5, 1.0, 2.0]);
    }

    #[test]
    fn exponential_rules() {
        check_derivative("2^x", &[0.0, 1.0, 2.0]);
        check_derivative("2^(x^2)", &[0.0, 0.5, 1.0]);
        check_derivative("x^x", &[0.5, 1.0, 2.0]);
    }

    #[test]
    fn product_rule() {
        check_derivative("x*sin(x)", &[0.0, 1.0, 2.0]);
        check_derivative("3*x", &[0.0, 7.0]);
    }

    #[test]
    fn quotient_rule() {
        check_derivative("sin(x)/x", &[0.5, 1.0, 2.0]);
        check_derivative("x/(x+1)", &[0.0, 1.0, 2.0]);
        check_derivative("2/(x^2+1)", &[0.0, 1.0, 2.0]);
        check_derivative("x/3", &[0.0, 1.0]);
    }

    #[test]
    fn chain_rule() {
        check_derivative("sin(x^2)", &[0.0, 0.5, 1.0]);
        check_derivative("cos(3*x)", &[0.0, 0.5, 1.0]);
        check_derivative("ln(x^2+1)", &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn trigonometric_derivatives() {
        check_derivative("sin(x)", &[0.0, 1.0, 2.0]);
        check_derivative("cos(x)", &[0.0, 1.0, 2.0]);
        check_derivative("tan(x)", &[0.0, 0.3, 1.0]);
        check_derivative("cot(x)", &[0.5, 1.0, 2.0]);
        check_derivative("ln(x)", &[0.5, 1.0, 4.0]);
    }

    #[test]
    fn exact_power_rule_value() {
        // d/dx x^2 = 2*x^(1), exactly 6 at x = 3
        let diff = derivative(&parse("x^2"), "x");
        assert_eq!(eval_x(&diff, 3.0), 6.0);
    }

    #[test]
    fn bare_variable_skips_chain_factor() {
        assert_eq!(derivative(&parse("sin(x)"), "x"), parse("cos(x)"));
        assert_eq!(derivative(&parse("ln(x)"), "x"), parse("1/x"));
    }

    #[test]
    fn constants_and_variables() {
        assert_eq!(derivative(&parse("5"), "x"), Node::Number(0.0));
        assert_eq!(derivative(&parse("x"), "x"), Node::Number(1.0));
        assert_eq!(derivative(&parse("y"), "x"), Node::Number(0.0));
        assert_eq!(derivative(&parse("sin(y)"), "x"), Node::Number(0.0));
    }

    #[test]
    fn partial_derivatives() {
        // d/dx (x*y) = 1*y, which is 4 when y = 4
        let diff = derivative(&parse("x*y"), "x");
        let mut ctxt = Ctxt::new();
        ctxt.add_var("y", 4.0);
        assert_eq!(diff.eval(&ctxt).unwrap(), 4.0);

        // d/dy (x*y) depends only on x
        let diff = derivative(&parse("x*y"), "y");
        assert_eq!(diff.variables(), ["x"]);
    }

    #[test]
    fn partial_derivative_with_symbolic_exponent() {
        // d/dx x^y = y*x^(y-1)
        let diff = derivative(&parse("x^y"), "x");
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 2.0);
        ctxt.add_var("y", 3.0);
        assert_eq!(diff.eval(&ctxt).unwrap(), 12.0);
    }

    #[test]
    fn source_tree_is_untouched() {
        let node = parse("x^2*sin(x)");
        let copy = node.clone();
        let _ = derivative(&node, "x");
        assert_eq!(node, copy);
    }
}
