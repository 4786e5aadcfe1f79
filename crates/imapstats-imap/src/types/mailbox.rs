//! Mailbox names and selection status.

/// Mailbox name as sent on the wire (no modified UTF-7 conversion).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox(pub String);

impl Mailbox {
    /// Creates a new mailbox name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The INBOX mailbox.
    #[must_use]
    pub fn inbox() -> Self {
        Self("INBOX".to_string())
    }

    /// Returns the mailbox name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mailbox status collected from SELECT/EXAMINE untagged data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Number of recent messages.
    pub recent: u32,
    /// Sequence number of the first unseen message, if reported.
    pub first_unseen: Option<u32>,
    /// UIDVALIDITY value, if reported.
    pub uid_validity: Option<u32>,
    /// Next UID to be assigned, if reported.
    pub uid_next: Option<u32>,
    /// Whether the server granted read-only access.
    pub read_only: bool,
}
