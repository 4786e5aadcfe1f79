//! Collected statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use imapstats_imap::Envelope;
use serde::{Deserialize, Serialize};

/// Most envelopes sampled per statistic.
pub const MAX_MAIL_FETCH_COUNT: usize = 10;

/// Suffix of the key envelope samples are stored under.
const MESSAGES_SUFFIX: &str = "_messages";

/// Date and subject of one matching message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeSample {
    /// Message date; `null` when missing or unparseable.
    pub date: Option<DateTime<FixedOffset>>,
    /// Subject as sent by the server (RFC 2047 words are not decoded).
    pub subject: String,
}

impl From<&Envelope> for EnvelopeSample {
    fn from(envelope: &Envelope) -> Self {
        Self {
            date: envelope.date.as_deref().and_then(parse_date),
            subject: envelope.subject.clone().unwrap_or_default(),
        }
    }
}

/// Parses an RFC 2822 date, tolerating a trailing `(zone)` comment.
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw).ok().or_else(|| {
        let (head, _) = raw.rsplit_once(" (")?;
        DateTime::parse_from_rfc2822(head.trim_end()).ok()
    })
}

/// Value of one statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Number of matching messages.
    Count(usize),
    /// Envelope samples, in search order.
    Messages(Vec<EnvelopeSample>),
}

/// Statistic name to value; serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsResult(BTreeMap<String, StatValue>);

impl StatsResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the match count for `stat`.
    pub fn insert_count(&mut self, stat: &str, count: usize) {
        self.0.insert(stat.to_string(), StatValue::Count(count));
    }

    /// Records envelope samples for `stat` under `<stat>_messages`.
    pub fn insert_samples(&mut self, stat: &str, samples: Vec<EnvelopeSample>) {
        self.0
            .insert(format!("{stat}{MESSAGES_SUFFIX}"), StatValue::Messages(samples));
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.0.get(key)
    }

    /// Match count for `stat`, if recorded.
    #[must_use]
    pub fn count(&self, stat: &str) -> Option<usize> {
        match self.0.get(stat) {
            Some(StatValue::Count(n)) => Some(*n),
            _ => None,
        }
    }

    /// Envelope samples for `stat`, if recorded.
    #[must_use]
    pub fn samples(&self, stat: &str) -> Option<&[EnvelopeSample]> {
        match self.0.get(&format!("{stat}{MESSAGES_SUFFIX}")) {
            Some(StatValue::Messages(samples)) => Some(samples),
            _ => None,
        }
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes as one JSON object followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns the serializer error.
    pub fn to_json_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
