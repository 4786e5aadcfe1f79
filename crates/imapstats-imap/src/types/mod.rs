//! Core IMAP types.
//!
//! The subset of RFC 9051 / RFC 3501 data types the read-only client deals
//! with: tags, sequence numbers, mailbox names and SELECT/EXAMINE status.

#![allow(clippy::missing_const_for_fn)]

mod capability;
mod identifiers;
mod mailbox;
mod response_code;
mod sequence;

pub use capability::{Capability, Status};
pub use identifiers::{SeqNum, Tag};
pub use mailbox::{Mailbox, MailboxStatus};
pub use response_code::ResponseCode;
pub use sequence::SequenceSet;
