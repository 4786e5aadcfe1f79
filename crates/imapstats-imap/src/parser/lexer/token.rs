//! Lexer tokens.

/// A single IMAP token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Atom (also used for numbers too large for `u32`).
    Atom(&'a str),
    /// Quoted string, unescaped.
    QuotedString(String),
    /// Literal payload.
    Literal(&'a [u8]),
    /// Number.
    Number(u32),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// Single space.
    Space,
    /// `*`
    Asterisk,
    /// `+`
    Plus,
    /// NIL (case-insensitive).
    Nil,
    /// Line terminator.
    Crlf,
    /// End of input.
    Eof,
}
