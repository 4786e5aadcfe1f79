//! Wire encoding of command arguments.

use crate::types::Mailbox;

use super::types::SearchCriteria;

/// Writes an astring: bare atom when possible, otherwise a quoted string.
pub fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

/// Writes a mailbox name.
pub fn write_mailbox(buf: &mut Vec<u8>, mailbox: &Mailbox) {
    write_astring(buf, mailbox.as_str());
}

const fn needs_quoting(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*' | b']'
    ) || b < 0x20
        || b >= 0x7F
}

/// Writes a top-level SEARCH program.
///
/// A top-level AND is written bare; an empty AND degrades to `ALL`.
pub fn write_search_criteria(buf: &mut Vec<u8>, criteria: &SearchCriteria) {
    match criteria {
        SearchCriteria::And(items) if items.is_empty() => buf.extend_from_slice(b"ALL"),
        SearchCriteria::And(items) => write_key_list(buf, items),
        other => write_search_key(buf, other),
    }
}

fn write_key_list(buf: &mut Vec<u8>, items: &[SearchCriteria]) {
    for (i, c) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        write_search_key(buf, c);
    }
}

/// Writes one search key; multi-key conjunctions become a group.
fn write_search_key(buf: &mut Vec<u8>, criteria: &SearchCriteria) {
    match criteria {
        SearchCriteria::All => buf.extend_from_slice(b"ALL"),
        SearchCriteria::Unseen => buf.extend_from_slice(b"UNSEEN"),
        SearchCriteria::Body(s) => {
            buf.extend_from_slice(b"BODY ");
            write_astring(buf, s);
        }
        SearchCriteria::Header(name, value) => {
            buf.extend_from_slice(b"HEADER ");
            write_astring(buf, name);
            buf.push(b' ');
            write_astring(buf, value);
        }
        SearchCriteria::And(items) => match items.as_slice() {
            [] => buf.extend_from_slice(b"ALL"),
            [single] => write_search_key(buf, single),
            _ => {
                buf.push(b'(');
                write_key_list(buf, items);
                buf.push(b')');
            }
        },
        SearchCriteria::Or(a, b) => {
            buf.extend_from_slice(b"OR ");
            write_search_key(buf, a);
            buf.push(b' ');
            write_search_key(buf, b);
        }
    }
}
