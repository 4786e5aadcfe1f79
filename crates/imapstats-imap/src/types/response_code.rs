//! Response codes.

use super::Capability;

/// Bracketed response code attached to a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// ALERT: text the server insists a human sees.
    Alert,
    /// CAPABILITY list piggybacked on a greeting or LOGIN completion.
    Capability(Vec<Capability>),
    /// READ-ONLY: mailbox selected as read-only.
    ReadOnly,
    /// READ-WRITE: mailbox selected as read-write.
    ReadWrite,
    /// UIDNEXT: next UID to be assigned.
    UidNext(u32),
    /// UIDVALIDITY: unique identifier validity value.
    UidValidity(u32),
    /// UNSEEN: first unseen message sequence number.
    Unseen(u32),
    /// Any other code; the atom is kept for diagnostics.
    Other(String),
}
