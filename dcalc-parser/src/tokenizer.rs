use logos::{Lexer, Logos};
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("^")]
    Exp,

    #[regex(r"[a-zA-Z_]+")]
    Name,

    #[regex(r"[0-9]+")]
    Number,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r".", priority = 0)]
    Symbol,
}

/// Returns an iterator over the tokens in the given string.
pub fn tokenize(input: &str) -> Lexer<Token> {
    Token::lexer(input)
}

/// Tokenizes the whole input, pairing each token with its byte span.
///
/// The catch-all [`Token::Symbol`] pattern means tokenization itself never fails; unexpected
/// characters surface later, when the parser cannot interpret the text they appear in.
pub fn tokenize_spanned(input: &str) -> Vec<(Token, Range<usize>)> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        tokens.push((token.unwrap_or(Token::Symbol), lexer.span()));
    }
    tokens
}
