//! Error kinds produced by the symbolic transformations.

use ariadne::{Fmt, Label, Report, ReportKind};
use dcalc_error::{ErrorKind, EXPR};
use std::any::Any;
use std::ops::Range;

fn offset(spans: &[Range<usize>]) -> usize {
    spans.first().map_or(0, |span| span.start)
}

/// A full derivative was requested for an expression with more than one free variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedDerivative {
    /// The free variables of the expression.
    pub variables: Vec<String>,
}

impl ErrorKind for UnsupportedDerivative {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message("cannot take the full derivative of a multi-variable expression")
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone())).with_message("this expression")
            }))
            .with_help(format!(
                "this expression depends on {}; differentiate by one of them instead",
                self.variables
                    .iter()
                    .map(|name| format!("`{}`", name.fg(EXPR)))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
            .finish()
    }
}

/// The simplifier found a division whose denominator is provably zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionByZero {
    /// The text of the offending division.
    pub expr: String,
}

impl ErrorKind for DivisionByZero {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message(format!("division by zero detected in `{}`", self.expr))
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone())).with_message("this division")
            }))
            .with_help("the denominator of this division is zero for every variable binding")
            .finish()
    }
}
