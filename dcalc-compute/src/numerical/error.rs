//! Error kinds produced while binding variables and evaluating an expression.
//!
//! Evaluation errors do not originate from a region of source text, so they carry no spans;
//! their reports consist of the message and help text only.

use ariadne::{Fmt, Label, Report, ReportKind};
use dcalc_error::{ErrorKind, EXPR};
use std::any::Any;
use std::ops::Range;

fn offset(spans: &[Range<usize>]) -> usize {
    spans.first().map_or(0, |span| span.start)
}

/// A variable leaf was evaluated with no matching binding in the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedVariable {
    /// The name of the variable that was undefined.
    pub name: String,

    /// Names of bound variables similar to the undefined one.
    pub suggestions: Vec<String>,
}

impl ErrorKind for UndefinedVariable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let help = if self.suggestions.is_empty() {
            "every free variable of the expression must be bound to a value".to_string()
        } else {
            format!(
                "did you mean {}?",
                self.suggestions
                    .iter()
                    .map(|name| format!("`{}`", name.fg(EXPR)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };

        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message(format!("`{}` is not defined", self.name))
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone())).with_message("this variable")
            }))
            .with_help(help)
            .finish()
    }
}

/// The number of values supplied for evaluation does not match the number of free variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityMismatch {
    /// The number of free variables of the expression.
    pub expected: usize,

    /// The number of values that were supplied.
    pub given: usize,
}

impl ErrorKind for ArityMismatch {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message(format!(
                "expected {} value(s) for evaluation, got {}",
                self.expected, self.given
            ))
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone())).with_message("this expression")
            }))
            .with_help("one value must be supplied per free variable, in sorted name order")
            .finish()
    }
}
