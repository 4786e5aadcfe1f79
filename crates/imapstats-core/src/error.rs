//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Criteria tree or configuration is semantically invalid.
    #[error("bad config: {0}")]
    Config(String),

    /// Configuration file is not valid YAML for the expected shape.
    #[error("bad config {}: {source}", path.display())]
    ConfigSyntax {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Dial, greeting, LOGIN or mailbox selection failed.
    #[error("connection failed: {0}")]
    Connection(#[source] imapstats_imap::Error),

    /// SEARCH for a statistic failed.
    #[error("search for {stat} failed: {source}")]
    Search {
        /// Statistic being collected.
        stat: String,
        /// Underlying protocol error.
        #[source]
        source: imapstats_imap::Error,
    },

    /// FETCH ENVELOPE for a statistic failed.
    #[error("envelope fetch for {stat} failed: {source}")]
    Fetch {
        /// Statistic being collected.
        stat: String,
        /// Underlying protocol error.
        #[source]
        source: imapstats_imap::Error,
    },

    /// No usable cache entry: the file is missing or older than the TTL.
    #[error("cache not found ({reason}): {}", path.display())]
    CacheNotFound {
        /// Cache file that was looked up.
        path: PathBuf,
        /// `missing` or `too old`.
        reason: &'static str,
    },

    /// Password file could not be read.
    #[error("cannot read password file {}: {source}", path.display())]
    Credentials {
        /// Password file.
        path: PathBuf,
        /// Read error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The home directory could not be determined.
    #[error("cannot determine home directory")]
    NoHomeDir,
}

impl Error {
    /// Returns true if this error is, or wraps, a network timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connection(source)
            | Self::Search { source, .. }
            | Self::Fetch { source, .. } => source.is_timeout(),
            Self::Io(err) => err.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
