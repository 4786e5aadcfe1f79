//! Sequence sets.

use super::SeqNum;

/// Set of message sequence numbers as used by FETCH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceSet {
    /// Single sequence number.
    Single(SeqNum),
    /// Inclusive range.
    Range(SeqNum, SeqNum),
    /// All messages (`1:*`).
    All,
    /// Comma-separated union.
    Set(Vec<Self>),
}

impl SequenceSet {
    /// Creates a sequence set from a single number.
    #[must_use]
    pub fn single(n: u32) -> Option<Self> {
        SeqNum::new(n).map(Self::Single)
    }

    /// Creates a range sequence set.
    #[must_use]
    pub fn range(start: u32, end: u32) -> Option<Self> {
        Some(Self::Range(SeqNum::new(start)?, SeqNum::new(end)?))
    }

    /// Builds a set naming exactly the given messages.
    ///
    /// Consecutive runs collapse into ranges; input order is not preserved
    /// on the wire since servers answer FETCH in mailbox order anyway.
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_seq_nums(nums: &[SeqNum]) -> Option<Self> {
        let mut sorted: Vec<u32> = nums.iter().map(|n| n.get()).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut parts = Vec::new();
        let mut iter = sorted.into_iter();
        let first = iter.next()?;
        let (mut start, mut end) = (first, first);
        for n in iter {
            if n == end + 1 {
                end = n;
                continue;
            }
            parts.push(Self::run(start, end)?);
            start = n;
            end = n;
        }
        parts.push(Self::run(start, end)?);

        if parts.len() == 1 {
            parts.pop()
        } else {
            Some(Self::Set(parts))
        }
    }

    fn run(start: u32, end: u32) -> Option<Self> {
        if start == end {
            Self::single(start)
        } else {
            Self::range(start, end)
        }
    }
}

impl std::fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::Range(start, end) => write!(f, "{start}:{end}"),
            Self::All => f.write_str("1:*"),
            Self::Set(items) => {
                let s: Vec<_> = items.iter().map(ToString::to_string).collect();
                f.write_str(&s.join(","))
            }
        }
    }
}
