//! # imapstats-core
//!
//! Everything `imapstats` does between parsing flags and printing JSON:
//!
//! - [`criteria`]: the YAML criteria tree and its compilation to IMAP SEARCH
//! - [`config`]: per-account, per-mailbox statistic definitions
//! - [`engine`]: runs the searches and aggregates a [`StatsResult`]
//! - [`cache`]: TTL-gated result files
//! - [`escalation`]: turns network timeouts into an immediate exit
//! - [`paths`], [`credentials`], [`time`]: process environment

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod credentials;
pub mod criteria;
pub mod engine;
mod error;
pub mod escalation;
pub mod paths;
pub mod stats;
pub mod time;

pub use cache::{CacheStore, OutputMode, Ttl};
pub use config::{AccountConfig, DEFAULT_STAT, StatsConfig};
pub use criteria::{Criterion, Query, compile};
pub use engine::{
    ImapConnection, Login, MailboxConnection, collect_stats, fetch_stats, fetch_stats_from_stream,
};
pub use error::{Error, Result};
pub use escalation::{EX_UNAVAILABLE, Escalating, ExitOnTimeout, TimeoutHandler};
pub use paths::AppPaths;
pub use stats::{EnvelopeSample, MAX_MAIL_FETCH_COUNT, StatValue, StatsResult};
pub use time::{Clock, MockClock, SystemClock};
