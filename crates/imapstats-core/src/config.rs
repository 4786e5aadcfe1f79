//! Statistic definitions per account and mailbox.
//!
//! ```yaml
//! accounts:
//!   foo@bar.com:
//!     INBOX:
//!       important_count:
//!         headers:
//!           From: boss@bar.com
//!       seen_count:
//!         seen: true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::criteria::Criterion;
use crate::{Error, Result};

/// Statistic that is always collected.
pub const DEFAULT_STAT: &str = "unseen_count";

/// Statistic name to criterion, iterated in name order.
pub type StatsConfig = BTreeMap<String, Criterion>;

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountConfig {
    /// Account id to mailbox name to statistics.
    #[serde(default)]
    pub accounts: BTreeMap<String, BTreeMap<String, StatsConfig>>,
}

impl AccountConfig {
    /// Loads and validates the configuration file.
    ///
    /// A missing file is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML for
    /// this shape, or fails [`Self::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config = Self::from_yaml(&text).map_err(|source| Error::ConfigSyntax {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses YAML without validating.
    ///
    /// # Errors
    ///
    /// Returns the YAML error.
    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file deserializes as null.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Rejects single-branch ORs and line breaks in search strings at any
    /// depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming `account/mailbox/statistic`.
    pub fn validate(&self) -> Result<()> {
        for (account, mailboxes) in &self.accounts {
            for (mailbox, stats) in mailboxes {
                for (stat, criterion) in stats {
                    if criterion.find_single_branch_or().is_some() {
                        return Err(Error::Config(format!(
                            "OR criteria must have 2 clauses ({account}/{mailbox}/{stat})"
                        )));
                    }
                    if criterion.has_line_break() {
                        return Err(Error::Config(format!(
                            "search strings must not contain line breaks ({account}/{mailbox}/{stat})"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Statistics for one account and mailbox, with [`DEFAULT_STAT`]
    /// added when not configured.
    #[must_use]
    pub fn resolve(&self, account: &str, mailbox: &str) -> StatsConfig {
        let mut stats = self
            .accounts
            .get(account)
            .and_then(|mailboxes| mailboxes.get(mailbox))
            .cloned()
            .unwrap_or_default();
        stats
            .entry(DEFAULT_STAT.to_string())
            .or_insert_with(Criterion::default);
        stats
    }
}
