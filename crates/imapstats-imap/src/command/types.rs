//! SEARCH argument types.

/// SEARCH key tree.
///
/// [`SearchCriteria::And`] is the implicit conjunction of IMAP; when it
/// appears as an operand of OR or another AND it is written as a
/// parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// All messages.
    All,
    /// Messages without `\Seen`.
    Unseen,
    /// Body contains string.
    Body(String),
    /// Named header contains string.
    Header(String, String),
    /// Every operand matches.
    And(Vec<Self>),
    /// Either operand matches.
    Or(Box<Self>, Box<Self>),
}

impl SearchCriteria {
    /// Builds `OR a b`.
    #[must_use]
    pub fn or(a: Self, b: Self) -> Self {
        Self::Or(Box::new(a), Box::new(b))
    }

    /// Returns true if any string argument contains non-ASCII bytes.
    ///
    /// Such searches have to announce `CHARSET UTF-8`.
    #[must_use]
    pub fn needs_utf8(&self) -> bool {
        match self {
            Self::All | Self::Unseen => false,
            Self::Body(s) => !s.is_ascii(),
            Self::Header(name, value) => !name.is_ascii() || !value.is_ascii(),
            Self::And(items) => items.iter().any(Self::needs_utf8),
            Self::Or(a, b) => a.needs_utf8() || b.needs_utf8(),
        }
    }
}
