//! Command tag generator.

use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out sequential command tags (`A0000`, `A0001`, ...).
#[derive(Debug)]
pub struct TagGenerator {
    counter: AtomicU32,
    prefix: char,
}

impl TagGenerator {
    /// Creates a new tag generator with the given prefix.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self {
            counter: AtomicU32::new(0),
            prefix,
        }
    }

    /// Generates the next tag.
    ///
    /// The counter wraps after `u32::MAX` tags; a statistics run issues a
    /// few dozen commands at most.
    #[must_use]
    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{:04}", self.prefix, n)
    }

    /// Number of tags handed out so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new('A')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_sequential() {
        let tags = TagGenerator::default();
        assert_eq!(tags.next(), "A0000");
        assert_eq!(tags.next(), "A0001");
        assert_eq!(tags.issued(), 2);
    }

    #[test]
    fn custom_prefix() {
        let tags = TagGenerator::new('S');
        assert_eq!(tags.next(), "S0000");
    }

    #[test]
    fn tags_are_unique() {
        let tags = TagGenerator::default();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            assert!(seen.insert(tags.next()));
        }
    }
}
