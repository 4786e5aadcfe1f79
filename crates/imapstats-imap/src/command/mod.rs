//! Command builders.
//!
//! Only the read-only subset of IMAP is modelled: nothing here can change
//! mailbox state.

mod serialize;
mod tag_generator;
mod types;

use crate::types::{Mailbox, SequenceSet};
use crate::{Error, Result};

pub use tag_generator::TagGenerator;
pub use types::SearchCriteria;

use serialize::{write_astring, write_mailbox, write_search_criteria};

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// LOGOUT command.
    Logout,
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// EXAMINE command (read-only SELECT).
    Examine {
        /// Mailbox to examine.
        mailbox: Mailbox,
    },
    /// SEARCH command.
    Search {
        /// Search program.
        criteria: SearchCriteria,
    },
    /// `FETCH <set> ENVELOPE`.
    FetchEnvelope {
        /// Messages to fetch.
        sequence: SequenceSet,
    },
}

impl Command {
    /// Serializes the command with the given tag, CRLF terminated.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
            Self::Login { username, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_astring(&mut buf, username);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }
            Self::Examine { mailbox } => {
                buf.extend_from_slice(b"EXAMINE ");
                write_mailbox(&mut buf, mailbox);
            }
            Self::Search { criteria } => {
                buf.extend_from_slice(b"SEARCH ");
                if criteria.needs_utf8() {
                    buf.extend_from_slice(b"CHARSET UTF-8 ");
                }
                write_search_criteria(&mut buf, criteria);
            }
            Self::FetchEnvelope { sequence } => {
                buf.extend_from_slice(b"FETCH ");
                buf.extend_from_slice(sequence.to_string().as_bytes());
                buf.extend_from_slice(b" ENVELOPE");
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Serializes the command, refusing arguments that contain CR or LF.
    ///
    /// A quoted string cannot carry a line break, so such an argument
    /// would end the command early and smuggle in a second one.
    pub fn to_line(&self, tag: &str) -> Result<Vec<u8>> {
        let line = self.serialize(tag);
        let body = line.strip_suffix(b"\r\n").unwrap_or(&line[..]);
        if body.iter().any(|&b| b == b'\r' || b == b'\n') {
            return Err(Error::Protocol(format!(
                "{} argument contains a line break",
                self.name()
            )));
        }
        Ok(line)
    }

    /// Name used in log lines. LOGIN never exposes its arguments.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Logout => "LOGOUT",
            Self::Login { .. } => "LOGIN",
            Self::Examine { .. } => "EXAMINE",
            Self::Search { .. } => "SEARCH",
            Self::FetchEnvelope { .. } => "FETCH",
        }
    }
}
