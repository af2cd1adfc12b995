//! The tree representation of a parsed expression.
//!
//! A [`Node`] is an immutable value: every transformation downstream of the parser (evaluation,
//! differentiation, simplification) reads an existing tree and builds a new one, so subtrees can
//! be cloned and shared freely without aliasing hazards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::{E, PI};
use std::fmt;

/// A binary operator of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOpKind {
    /// The symbol of this operator in the expression grammar.
    pub fn symbol(self) -> char {
        match self {
            BinOpKind::Add => '+',
            BinOpKind::Sub => '-',
            BinOpKind::Mul => '*',
            BinOpKind::Div => '/',
            BinOpKind::Pow => '^',
        }
    }
}

/// One of the unary functions of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Ln,
}

impl Func {
    /// The names of all known functions, as they appear in the grammar.
    pub const NAMES: [&'static str; 5] = ["sin", "cos", "tan", "cot", "ln"];

    /// Looks up a function by its name in the grammar.
    pub fn from_name(name: &str) -> Option<Func> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "cot" => Some(Func::Cot),
            "ln" => Some(Func::Ln),
            _ => None,
        }
    }

    /// The name of this function in the grammar.
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cot => "cot",
            Func::Ln => "ln",
        }
    }

    /// Returns true if the function is trigonometric, i.e. affected by the angle unit of the
    /// evaluation context.
    pub fn is_trig(self) -> bool {
        !matches!(self, Func::Ln)
    }
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// A numeric literal, such as `2` or `3.14`.
    ///
    /// The symbolic constants `e` and `pi` are stored as their [`f64`] values; display code
    /// recognizes the exact constants and prints them symbolically.
    Number(f64),

    /// A reference to a variable, such as `x`.
    ///
    /// The name is the variable's identity: distinct leaves with the same name are the same
    /// variable and resolve through the same binding at evaluation time.
    Variable(String),

    /// A binary operation applied to two operands.
    Binary {
        op: BinOpKind,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },

    /// A unary function applied to an argument, such as `sin(x)`.
    FuncCall { func: Func, arg: Box<Node> },
}

impl Node {
    /// Returns true if the node is the exact literal `value`.
    pub fn is_exactly(&self, value: f64) -> bool {
        matches!(self, Node::Number(num) if *num == value)
    }

    /// If the node is a literal, returns its value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the distinct free variable names of the tree, lexicographically sorted.
    ///
    /// This order is the canonical variable order used to bind positional values at evaluation
    /// time.
    pub fn variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names.into_iter().collect()
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Node::Number(_) => {}
            Node::Variable(name) => {
                names.insert(name.clone());
            }
            Node::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
            Node::FuncCall { arg, .. } => arg.collect_variables(names),
        }
    }

    /// Returns true if the subtree does not depend on `var`, even if it depends on other
    /// variables.
    pub fn is_const_relative(&self, var: &str) -> bool {
        match self {
            Node::Number(_) => true,
            Node::Variable(name) => name != var,
            Node::Binary { lhs, rhs, .. } => {
                lhs.is_const_relative(var) && rhs.is_const_relative(var)
            }
            Node::FuncCall { arg, .. } => arg.is_const_relative(var),
        }
    }

    /// Converts the tree into the generic labeled form consumed by display adapters.
    ///
    /// Binary nodes list their right operand before their left; rendering frontends have
    /// historically relied on this order.
    pub fn display_tree(&self) -> TreeNode {
        match self {
            Node::Number(_) => TreeNode {
                label: self.to_string(),
                children: Vec::new(),
            },
            Node::Variable(name) => TreeNode {
                label: name.clone(),
                children: Vec::new(),
            },
            Node::Binary { op, lhs, rhs } => TreeNode {
                label: op.symbol().to_string(),
                children: vec![rhs.display_tree(), lhs.display_tree()],
            },
            Node::FuncCall { func, arg } => TreeNode {
                label: func.name().to_string(),
                children: vec![arg.display_tree()],
            },
        }
    }
}

/// Formats the tree as text the parser accepts back.
///
/// Additive and power nodes are printed fully parenthesized and negative literals are wrapped in
/// brackets, so the rightmost-operator split reconstructs the same tree shape. A multiplicative
/// right operand that is itself multiplicative is parenthesized for the same reason: `x/(y*z)`
/// must not print as `x/y*z`, which re-parses as `(x/y)*z`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(value) => {
                if *value == E {
                    write!(f, "e")
                } else if *value == -E {
                    write!(f, "(-e)")
                } else if *value == PI {
                    write!(f, "pi")
                } else if *value == -PI {
                    write!(f, "(-pi)")
                } else if *value < 0.0 {
                    write!(f, "({})", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Node::Variable(name) => write!(f, "{}", name),
            Node::Binary {
                op: op @ (BinOpKind::Add | BinOpKind::Sub),
                lhs,
                rhs,
            } => write!(f, "({}{}{})", lhs, op.symbol(), rhs),
            Node::Binary {
                op: BinOpKind::Pow,
                lhs,
                rhs,
            } => write!(f, "({})^({})", lhs, rhs),
            Node::Binary { op, lhs, rhs } => {
                write!(f, "{}{}", lhs, op.symbol())?;
                if matches!(
                    **rhs,
                    Node::Binary {
                        op: BinOpKind::Mul | BinOpKind::Div,
                        ..
                    }
                ) {
                    write!(f, "({})", rhs)
                } else {
                    write!(f, "{}", rhs)
                }
            }
            Node::FuncCall { func, arg } => write!(f, "{}({})", func.name(), arg),
        }
    }
}

/// A generic labeled tree, the sole surface consumed by rendering frontends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeNode {
    /// The text displayed for this node.
    pub label: String,

    /// The children of this node, in render order.
    pub children: Vec<TreeNode>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::super::Parser;
    use super::*;

    fn parse(input: &str) -> Node {
        Parser::new(input).parse().unwrap()
    }

    #[test]
    fn canonical_variable_order() {
        assert_eq!(parse("y+x*x-a").variables(), ["a", "x", "y"]);
        assert_eq!(parse("2+3").variables(), Vec::<String>::new());
    }

    #[test]
    fn const_relative() {
        let expr = parse("x*y+2");
        assert!(!expr.is_const_relative("x"));
        assert!(!expr.is_const_relative("y"));
        assert!(expr.is_const_relative("z"));
        assert!(parse("sin(y)").is_const_relative("x"));
    }

    #[test]
    fn display_round_trip_shapes() {
        for input in ["(2*x+3)", "x/(y*z)", "((x)^(2)+sin(x))", "(-2.5)", "(x-(-3))"] {
            let expr = parse(input);
            assert_eq!(parse(&expr.to_string()), expr);
        }
    }

    #[test]
    fn display_symbolic_constants() {
        assert_eq!(parse("e").to_string(), "e");
        assert_eq!(parse("-e").to_string(), "(-e)");
        assert_eq!(parse("pi").to_string(), "pi");
        assert_eq!(Node::Number(-2.0).to_string(), "(-2)");
    }

    #[test]
    fn display_parenthesizes_multiplicative_rhs() {
        assert_eq!(parse("x/(y*z)").to_string(), "x/(y*z)");
        assert_eq!(parse("x*(y/z)").to_string(), "x*(y/z)");
        assert_eq!(parse("x*y/z").to_string(), "x*y/z");
    }

    #[test]
    fn display_tree_lists_right_operand_first() {
        let tree = parse("x-2").display_tree();
        assert_eq!(tree.label, "-");
        assert_eq!(tree.children[0].label, "2");
        assert_eq!(tree.children[1].label, "x");

        let tree = parse("sin(x)").display_tree();
        assert_eq!(tree.label, "sin");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].label, "x");
    }
}
