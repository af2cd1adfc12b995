//! Input normalization, the first stage of parsing.
//!
//! The preprocessor removes whitespace and makes implicit multiplication explicit. Its output is
//! still plain text; the splitter and the terminal productions work on the normalized string.

use crate::tokenizer::{tokenize_spanned, Token};
use dcalc_error::Error;
use std::ops::Range;

/// The result of normalizing raw input text: the normalized text plus a byte-offset map back
/// into the original source, so errors raised against the normalized text can be reported
/// against what the user actually typed.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// The normalized text: no whitespace, implicit multiplication made explicit.
    pub text: String,

    /// For each byte of `text`, the offset of the source byte it came from. An inserted `*`
    /// maps to the byte that follows it.
    offsets: Vec<usize>,
}

impl Preprocessed {
    /// Normalizes the given source text.
    ///
    /// Whitespace is removed entirely, not collapsed: operators may be written with or without
    /// separating spaces. A `*` is then inserted wherever a number is immediately followed by a
    /// name or an opening bracket, so `2x`, `3sin(x)` and `2(x+1)` read as products.
    pub fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut offsets = Vec::with_capacity(source.len());
        let mut last = None;

        for (token, span) in tokenize_spanned(source) {
            if token == Token::Whitespace {
                continue;
            }

            if last == Some(Token::Number) && matches!(token, Token::Name | Token::OpenParen) {
                text.push('*');
                offsets.push(span.start);
            }

            text.push_str(&source[span.clone()]);
            offsets.extend(span.clone());
            last = Some(token);
        }

        Self { text, offsets }
    }

    /// Rewrites the spans of an error raised against the normalized text so they point into the
    /// original source.
    pub fn remap(&self, mut err: Error) -> Error {
        for span in &mut err.spans {
            *span = self.source_span(span.clone());
        }
        err
    }

    fn source_span(&self, span: Range<usize>) -> Range<usize> {
        let past_end = self.offsets.last().map_or(0, |last| last + 1);
        let start = self.offsets.get(span.start).copied().unwrap_or(past_end);
        let end = if span.end > span.start {
            self.offsets.get(span.end - 1).map_or(start, |last| last + 1)
        } else {
            start
        };
        start..end
    }
}
