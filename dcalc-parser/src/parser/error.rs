//! Error kinds produced while parsing an expression.
//!
//! Each kind implements [`ErrorKind`] by hand, building the [`ariadne`] report shown to the
//! user. Spans attached to these kinds point into the original source text.

use ariadne::{Fmt, Label, Report, ReportKind};
use dcalc_error::{ErrorKind, EXPR};
use std::any::Any;
use std::ops::Range;

fn offset(spans: &[Range<usize>]) -> usize {
    spans.first().map_or(0, |span| span.start)
}

/// The input contained no expression where one was required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyExpression;

impl ErrorKind for EmptyExpression {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message("empty expression")
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone()))
                    .with_message(format!("I expected to see an {} here", "expression".fg(EXPR)))
            }))
            .finish()
    }
}

/// The numbers of opening and closing brackets in the expression do not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketMismatch;

impl ErrorKind for BracketMismatch {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message("mismatched brackets")
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone())).with_message("this bracket is not matched")
            }))
            .with_help("every opening bracket must pair with a closing bracket")
            .finish()
    }
}

/// A piece of the expression could not be interpreted as any terminal production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsableToken {
    /// The text that could not be interpreted.
    pub token: String,

    /// Names of known functions similar to the token, when it is shaped like a call to an
    /// unknown function.
    pub suggestions: Vec<String>,
}

impl ErrorKind for UnparsableToken {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let help = if self.suggestions.is_empty() {
            "expected a number, a call to a known function, or a variable name".to_string()
        } else if self.suggestions.len() == 1 {
            format!(
                "did you mean the `{}` function?",
                (&*self.suggestions[0]).fg(EXPR)
            )
        } else {
            format!(
                "did you mean one of these functions? {}",
                self.suggestions
                    .iter()
                    .map(|name| format!("`{}`", name.fg(EXPR)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };

        Report::build(ReportKind::Error, src_id, offset(spans))
            .with_message(format!("cannot interpret `{}`", self.token))
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone())).with_message("this part of the expression")
            }))
            .with_help(help)
            .finish()
    }
}
