//! FETCH response parsing.

use crate::parser::lexer::{Lexer, Token};
use crate::Result;

use super::helpers::parse_flag_list;
use super::types::{Address, Envelope, FetchItem};

/// Parses the parenthesized item list of a FETCH response.
///
/// Items the client does not model (BODY sections, MODSEQ, X-GM-*) are
/// skipped without failing the response.
pub fn parse_fetch_response(lexer: &mut Lexer<'_>) -> Result<Vec<FetchItem>> {
    lexer.expect(Token::LParen)?;
    let mut items = Vec::new();

    loop {
        let name = match lexer.next_token()? {
            Token::RParen => return Ok(items),
            Token::Space => continue,
            Token::Atom(name) => name,
            token => {
                return Err(crate::Error::Parse {
                    position: lexer.position(),
                    message: format!("unexpected token in FETCH data: {token:?}"),
                });
            }
        };

        match name.to_ascii_uppercase().as_str() {
            "ENVELOPE" => {
                lexer.expect_space()?;
                items.push(FetchItem::Envelope(Box::new(parse_envelope(lexer)?)));
            }
            "UID" => {
                lexer.expect_space()?;
                items.push(FetchItem::Uid(lexer.read_number()?));
            }
            "FLAGS" => {
                lexer.expect_space()?;
                items.push(FetchItem::Flags(parse_flag_list(lexer)?));
            }
            "RFC822.SIZE" => {
                lexer.expect_space()?;
                items.push(FetchItem::Rfc822Size(lexer.read_number()?));
            }
            "INTERNALDATE" => {
                lexer.expect_space()?;
                if let Some(date) = lexer.read_nstring()? {
                    items.push(FetchItem::InternalDate(date));
                }
            }
            _ => skip_item(lexer)?,
        }
    }
}

/// Skips an unmodelled item: optional `[section]` and `<origin>`, then the value.
fn skip_item(lexer: &mut Lexer<'_>) -> Result<()> {
    if lexer.peek() == Some(b'[') {
        lexer.skip_until(b']');
        lexer.advance();
    }
    if lexer.peek() == Some(b'<') {
        lexer.skip_until(b'>');
        lexer.advance();
    }
    lexer.expect_space()?;
    lexer.skip_value()
}

/// Parses an envelope structure.
pub fn parse_envelope(lexer: &mut Lexer<'_>) -> Result<Envelope> {
    lexer.expect(Token::LParen)?;

    let date = lexer.read_nstring()?;
    lexer.expect_space()?;
    let subject = lexer.read_nstring()?;
    lexer.expect_space()?;
    let from = parse_address_list(lexer)?;
    lexer.expect_space()?;
    // sender, reply-to
    lexer.skip_value()?;
    lexer.expect_space()?;
    lexer.skip_value()?;
    lexer.expect_space()?;
    let to = parse_address_list(lexer)?;
    lexer.expect_space()?;
    // cc, bcc, in-reply-to
    for _ in 0..3 {
        lexer.skip_value()?;
        lexer.expect_space()?;
    }
    let message_id = lexer.read_nstring()?;
    lexer.expect(Token::RParen)?;

    Ok(Envelope {
        date,
        subject,
        from,
        to,
        message_id,
    })
}

fn parse_address_list(lexer: &mut Lexer<'_>) -> Result<Vec<Address>> {
    let mut addresses = Vec::new();
    match lexer.next_token()? {
        Token::Nil => return Ok(addresses),
        Token::LParen => {}
        token => {
            return Err(crate::Error::Parse {
                position: lexer.position(),
                message: format!("expected address list, got {token:?}"),
            });
        }
    }

    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(addresses),
            Token::Space => {}
            Token::LParen => {
                let name = lexer.read_nstring()?;
                lexer.expect_space()?;
                // source route
                lexer.read_nstring()?;
                lexer.expect_space()?;
                let mailbox = lexer.read_nstring()?;
                lexer.expect_space()?;
                let host = lexer.read_nstring()?;
                lexer.expect(Token::RParen)?;
                addresses.push(Address {
                    name,
                    mailbox,
                    host,
                });
            }
            token => {
                return Err(crate::Error::Parse {
                    position: lexer.position(),
                    message: format!("unexpected token in address list: {token:?}"),
                });
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ENVELOPE: &[u8] = b"(\"Wed, 17 Jul 1996 02:23:25 -0700 (PDT)\" \"IMAP4rev1 WG mtg summary and minutes\" ((\"Terry Gray\" NIL \"gray\" \"cac.washington.edu\")) ((\"Terry Gray\" NIL \"gray\" \"cac.washington.edu\")) ((\"Terry Gray\" NIL \"gray\" \"cac.washington.edu\")) ((NIL NIL \"imap\" \"cac.washington.edu\")) ((NIL NIL \"minutes\" \"CNRI.Reston.VA.US\")(\"John Klensin\" NIL \"KLENSIN\" \"MIT.EDU\")) NIL NIL \"<B27397-0100000@cac.washington.edu>\")";

    #[test]
    fn rfc_sample_envelope() {
        let mut lexer = Lexer::new(ENVELOPE);
        let env = parse_envelope(&mut lexer).unwrap();
        assert_eq!(
            env.date.as_deref(),
            Some("Wed, 17 Jul 1996 02:23:25 -0700 (PDT)")
        );
        assert_eq!(
            env.subject.as_deref(),
            Some("IMAP4rev1 WG mtg summary and minutes")
        );
        assert_eq!(
            env.from[0].email().as_deref(),
            Some("gray@cac.washington.edu")
        );
        assert_eq!(env.to[0].email().as_deref(), Some("imap@cac.washington.edu"));
        assert_eq!(
            env.message_id.as_deref(),
            Some("<B27397-0100000@cac.washington.edu>")
        );
        assert!(lexer.is_eof());
    }

    #[test]
    fn nil_heavy_envelope() {
        let mut lexer = Lexer::new(b"(NIL NIL NIL NIL NIL NIL NIL NIL NIL NIL)");
        let env = parse_envelope(&mut lexer).unwrap();
        assert_eq!(env, Envelope::default());
    }

    #[test]
    fn literal_subject() {
        let mut lexer = Lexer::new(b"(NIL {5}\r\nhello NIL NIL NIL NIL NIL NIL NIL NIL)");
        let env = parse_envelope(&mut lexer).unwrap();
        assert_eq!(env.subject.as_deref(), Some("hello"));
    }

    #[test]
    fn unknown_items_are_skipped() {
        let mut lexer =
            Lexer::new(b"(X-GM-LABELS (\\Inbox) BODY[HEADER.FIELDS (DATE)] {4}\r\nabcd UID 7)");
        let items = parse_fetch_response(&mut lexer).unwrap();
        assert_eq!(items, vec![FetchItem::Uid(7)]);
    }
}
