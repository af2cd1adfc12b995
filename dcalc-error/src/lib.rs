//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

use ariadne::{Color, Report};
use std::{any::Any, fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Returns the concrete error kind as a [`dyn Any`](Any), allowing callers to inspect which
    /// kind of error occurred.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error with no associated spans, for errors that do not originate from a
    /// region of source code (such as evaluation errors).
    pub fn spanless(kind: impl ErrorKind + 'static) -> Self {
        Self { spans: Vec::new(), kind: Box::new(kind) }
    }

    /// Returns true if the contained kind is of the given type.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns a reference to the contained kind if it is of the given type.
    pub fn downcast<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}
