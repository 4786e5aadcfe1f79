//! Tokenizer for server responses (RFC 9051 §9 formal syntax).

#![allow(clippy::missing_errors_doc)]

mod token;

pub use token::Token;

use crate::{Error, Result};

/// Byte-oriented IMAP lexer over one response frame.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// Returns true if all input has been consumed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peeks at the current byte.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consumes one byte.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skips `n` bytes, clamped to the end of input.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Consumes bytes up to (not including) `stop`, or to end of input.
    pub fn skip_until(&mut self, stop: u8) {
        while self.peek().is_some_and(|b| b != stop) {
            self.pos += 1;
        }
    }

    /// Reads the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Token::Eof);
        };

        let single = match byte {
            b' ' => Some(Token::Space),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            b'[' => Some(Token::LBracket),
            b']' => Some(Token::RBracket),
            b'*' => Some(Token::Asterisk),
            b'+' => Some(Token::Plus),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok(token);
        }

        match byte {
            b'\r' if self.input.get(self.pos + 1) == Some(&b'\n') => {
                self.pos += 2;
                Ok(Token::Crlf)
            }
            b'"' => self.read_quoted(),
            b'{' => self.read_literal(),
            _ if is_atom_char(byte) => Ok(self.read_atom()),
            _ => Err(self.error(&format!("unexpected byte {byte:#04x}"))),
        }
    }

    fn read_quoted(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(c @ (b'"' | b'\\')) => out.push(c),
                    Some(c) => return Err(self.error(&format!("invalid escape \\{}", c as char))),
                    None => return Err(self.error("unterminated quoted string")),
                },
                Some(b'\r' | b'\n') | None => {
                    return Err(self.error("unterminated quoted string"));
                }
                Some(c) => out.push(c),
            }
        }
        // 8-bit subjects show up in the wild; keep them readable.
        Ok(Token::QuotedString(String::from_utf8_lossy(&out).into_owned()))
    }

    fn read_literal(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];
        if self.peek() == Some(b'+') {
            self.pos += 1;
        }
        if self.advance() != Some(b'}') {
            return Err(self.error("malformed literal size"));
        }
        if self.advance() != Some(b'\r') || self.advance() != Some(b'\n') {
            return Err(self.error("expected CRLF after literal size"));
        }

        let size: usize = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.error("malformed literal size"))?;
        let end = self
            .pos
            .checked_add(size)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.error("incomplete literal"))?;
        let data = &self.input[self.pos..end];
        self.pos = end;
        Ok(Token::Literal(data))
    }

    fn read_atom(&mut self) -> Token<'a> {
        let start = self.pos;
        while self.peek().is_some_and(is_atom_char) {
            self.pos += 1;
        }
        // Atom chars are ASCII, so this slice is valid UTF-8.
        let s = std::str::from_utf8(&self.input[start..self.pos]).unwrap_or_default();

        if s.eq_ignore_ascii_case("NIL") {
            Token::Nil
        } else if s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse().map_or(Token::Atom(s), Token::Number)
        } else {
            Token::Atom(s)
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }

    /// Consumes a token of the same kind as `expected`.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token) == std::mem::discriminant(&expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {expected:?}, got {token:?}")))
        }
    }

    /// Consumes a single space.
    pub fn expect_space(&mut self) -> Result<()> {
        self.expect(Token::Space)
    }

    /// Reads an astring (atom, quoted string or literal).
    pub fn read_astring(&mut self) -> Result<String> {
        match self.next_token()? {
            Token::Atom(s) => Ok(s.to_string()),
            Token::Number(n) => Ok(n.to_string()),
            Token::QuotedString(s) => Ok(s),
            Token::Literal(data) => Ok(String::from_utf8_lossy(data).into_owned()),
            token => Err(self.error(&format!("expected astring, got {token:?}"))),
        }
    }

    /// Reads an nstring (NIL, quoted string or literal).
    pub fn read_nstring(&mut self) -> Result<Option<String>> {
        match self.next_token()? {
            Token::Nil => Ok(None),
            Token::QuotedString(s) => Ok(Some(s)),
            Token::Literal(data) => Ok(Some(String::from_utf8_lossy(data).into_owned())),
            token => Err(self.error(&format!("expected nstring, got {token:?}"))),
        }
    }

    /// Reads a number.
    pub fn read_number(&mut self) -> Result<u32> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            token => Err(self.error(&format!("expected number, got {token:?}"))),
        }
    }

    /// Reads an atom.
    pub fn read_atom_string(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Atom(s) => Ok(s),
            token => Err(self.error(&format!("expected atom, got {token:?}"))),
        }
    }

    /// Skips one complete value: a scalar, or a parenthesized or bracketed
    /// group including everything nested inside it.
    pub fn skip_value(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.next_token()? {
                Token::LParen | Token::LBracket => depth += 1,
                Token::RParen | Token::RBracket => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| self.error("unbalanced group"))?;
                }
                Token::Crlf | Token::Eof => return Err(self.error("value ends mid-group")),
                _ => {}
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }
}

/// Returns true if the byte may appear in an atom.
///
/// `\` is accepted so that flags such as `\Seen` lex as one atom.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    b > 0x20
        && b < 0x7F
        && !matches!(b, b'(' | b')' | b'{' | b'%' | b'*' | b'"' | b'[' | b']')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_tagged_line() {
        assert_eq!(
            tokens(b"A001 OK done\r\n"),
            vec![
                Token::Atom("A001"),
                Token::Space,
                Token::Atom("OK"),
                Token::Space,
                Token::Atom("done"),
                Token::Crlf,
            ]
        );
    }

    #[test]
    fn test_numbers_and_big_numbers() {
        assert_eq!(
            tokens(b"42 98765432109"),
            vec![Token::Number(42), Token::Space, Token::Atom("98765432109")]
        );
    }

    #[test]
    fn test_quoted_string_escapes() {
        assert_eq!(
            tokens(br#""say \"hi\"""#),
            vec![Token::QuotedString("say \"hi\"".to_string())]
        );
    }

    #[test]
    fn test_quoted_string_eight_bit() {
        let toks = tokens(b"\"caf\xe9\"");
        assert!(matches!(&toks[0], Token::QuotedString(s) if s.starts_with("caf")));
    }

    #[test]
    fn test_nil_any_case() {
        assert_eq!(
            tokens(b"NIL nil"),
            vec![Token::Nil, Token::Space, Token::Nil]
        );
    }

    #[test]
    fn test_flags_and_brackets() {
        assert_eq!(
            tokens(b"(\\Seen) [UNSEEN 3]"),
            vec![
                Token::LParen,
                Token::Atom("\\Seen"),
                Token::RParen,
                Token::Space,
                Token::LBracket,
                Token::Atom("UNSEEN"),
                Token::Space,
                Token::Number(3),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_literal() {
        assert_eq!(
            tokens(b"{5}\r\nhello"),
            vec![Token::Literal(b"hello")]
        );
    }

    #[test]
    fn test_incomplete_literal() {
        let mut lexer = Lexer::new(b"{10}\r\nshort");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_skip_nested_value() {
        let mut lexer = Lexer::new(b"((\"a\" NIL) [x] {2}\r\n()) rest");
        lexer.skip_value().unwrap();
        assert_eq!(lexer.remaining(), b" rest");
    }

    #[test]
    fn test_atom_chars() {
        assert!(is_atom_char(b'A'));
        assert!(is_atom_char(b'\\'));
        assert!(is_atom_char(b':'));
        assert!(!is_atom_char(b' '));
        assert!(!is_atom_char(b'('));
        assert!(!is_atom_char(b']'));
        assert!(!is_atom_char(0x80));
    }

    proptest::proptest! {
        #[test]
        fn lexing_arbitrary_input_terminates(input in proptest::collection::vec(proptest::num::u8::ANY, 0..256)) {
            let mut lexer = Lexer::new(&input);
            let mut last = 0;
            loop {
                match lexer.next_token() {
                    Ok(Token::Eof) | Err(_) => break,
                    Ok(_) => {
                        proptest::prop_assert!(lexer.position() > last);
                        last = lexer.position();
                    }
                }
            }
        }
    }
}
