//! Parsing helpers shared by the response parser.

use crate::parser::lexer::{Lexer, Token};
use crate::types::{Capability, ResponseCode, SeqNum};
use crate::{Error, Result};

/// Parses a bracketed response code. Unknown codes are skipped to `]`.
pub fn parse_response_code(lexer: &mut Lexer<'_>) -> Result<ResponseCode> {
    lexer.expect(Token::LBracket)?;
    let atom = lexer.read_atom_string()?;

    let code = match atom.to_ascii_uppercase().as_str() {
        "ALERT" => ResponseCode::Alert,
        "READ-ONLY" => ResponseCode::ReadOnly,
        "READ-WRITE" => ResponseCode::ReadWrite,
        "UIDNEXT" => ResponseCode::UidNext(read_code_number(lexer)?),
        "UIDVALIDITY" => ResponseCode::UidValidity(read_code_number(lexer)?),
        "UNSEEN" => ResponseCode::Unseen(read_code_number(lexer)?),
        "CAPABILITY" => ResponseCode::Capability(parse_capability_data(lexer)?),
        _ => ResponseCode::Other(atom.to_string()),
    };

    lexer.skip_until(b']');
    lexer.expect(Token::RBracket)?;
    Ok(code)
}

fn read_code_number(lexer: &mut Lexer<'_>) -> Result<u32> {
    lexer.expect_space()?;
    lexer.read_number()
}

/// Parses space-separated capability atoms up to `]` or CRLF.
pub fn parse_capability_data(lexer: &mut Lexer<'_>) -> Result<Vec<Capability>> {
    let mut caps = Vec::new();
    while lexer.peek() == Some(b' ') {
        lexer.advance();
        if let Token::Atom(s) = lexer.next_token()? {
            caps.push(Capability::parse(s));
        }
    }
    Ok(caps)
}

/// Parses a parenthesized flag list.
pub fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Vec<String>> {
    lexer.expect(Token::LParen)?;
    let mut flags = Vec::new();
    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(flags),
            Token::Atom(s) => flags.push(s.to_string()),
            Token::Space | Token::Asterisk => {}
            token => {
                return Err(Error::Parse {
                    position: lexer.position(),
                    message: format!("unexpected token in flag list: {token:?}"),
                });
            }
        }
    }
}

/// Parses SEARCH data. A trailing `(MODSEQ n)` group is ignored.
pub fn parse_search_response(lexer: &mut Lexer<'_>) -> Result<Vec<SeqNum>> {
    let mut nums = Vec::new();
    while lexer.peek() == Some(b' ') {
        lexer.advance();
        if lexer.peek() == Some(b'(') {
            lexer.skip_value()?;
            continue;
        }
        // Some servers pad an empty result with a trailing space.
        if matches!(lexer.peek(), Some(b'\r') | None) {
            break;
        }
        let position = lexer.position();
        let token = lexer.next_token()?;
        let seq = match token {
            Token::Number(n) => SeqNum::new(n),
            _ => None,
        };
        let Some(seq) = seq else {
            return Err(Error::Parse {
                position,
                message: format!("expected message number in SEARCH, got {token:?}"),
            });
        };
        nums.push(seq);
    }
    Ok(nums)
}

/// Reads the rest of the line as text and consumes the CRLF.
pub fn read_text_until_crlf(lexer: &mut Lexer<'_>) -> String {
    let remaining = lexer.remaining();
    let end = remaining
        .windows(2)
        .position(|w| w == b"\r\n")
        .unwrap_or(remaining.len());
    lexer.skip(end + 2);
    String::from_utf8_lossy(&remaining[..end]).into_owned()
}
