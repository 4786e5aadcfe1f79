//! The criteria tree as written in the configuration file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One matching rule.
///
/// All fields are optional in YAML:
///
/// ```yaml
/// seen: false            # false restricts to unread messages
/// body: [foo, bar]       # every substring must occur in the body
/// headers:
///   Subject: "Notification:"
/// fetch_envelope: true   # also sample date/subject of matches
/// or:                    # zero, or at least two alternatives
///   - headers: {From: boss@example.com}
///   - headers: {From: ceo@example.com}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criterion {
    /// Include already-read messages. When false only unseen ones match.
    pub seen: bool,
    /// Substrings that must all appear in the message body.
    pub body: Vec<String>,
    /// Header name to substring; each pair must match.
    pub headers: BTreeMap<String, String>,
    /// Retrieve date and subject of (up to ten) matching messages.
    #[serde(alias = "fetchEnvelope")]
    pub fetch_envelope: bool,
    /// Alternatives; a message matching any of them qualifies.
    pub or: Vec<Criterion>,
}

impl Criterion {
    /// Returns the first single-branch OR found anywhere in the tree, as a
    /// path of branch indexes from this node.
    #[must_use]
    pub fn find_single_branch_or(&self) -> Option<Vec<usize>> {
        if self.or.len() == 1 {
            return Some(Vec::new());
        }
        self.or.iter().enumerate().find_map(|(i, branch)| {
            branch.find_single_branch_or().map(|mut path| {
                path.insert(0, i);
                path
            })
        })
    }

    /// Whether any body substring, header name or header value in the tree
    /// contains CR or LF. Such strings cannot be sent inside a SEARCH.
    #[must_use]
    pub fn has_line_break(&self) -> bool {
        let breaks = |s: &String| s.contains(['\r', '\n']);
        self.body.iter().any(breaks)
            || self.headers.iter().any(|(k, v)| breaks(k) || breaks(v))
            || self.or.iter().any(Self::has_line_break)
    }
}
