//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use imapstats_core::{OutputMode, Ttl};

/// Prints IMAP mailbox statistics as one JSON line.
#[derive(Debug, Parser)]
#[command(name = "imapstats", version, about, long_about = None)]
pub struct Args {
    /// IMAP server, `host:port`.
    #[arg(long, default_value = "imap.gmail.com:993")]
    pub addr: String,

    /// Account to log in as; also names the cache entry.
    #[arg(long)]
    pub user: String,

    /// File holding the password.
    #[arg(long, value_name = "FILE", required_unless_present = "read_cache")]
    pub pass: Option<PathBuf>,

    /// Mailbox to examine.
    #[arg(long, default_value = "INBOX")]
    pub mailbox: String,

    /// Do not print fetched stats; only meaningful with --write-cache.
    #[arg(short, long)]
    pub quiet: bool,

    /// Save fetched stats to the cache.
    #[arg(long)]
    pub write_cache: bool,

    /// Print cached stats instead of connecting.
    #[arg(long)]
    pub read_cache: bool,

    /// Maximum cache age for --read-cache: seconds, or a number with an
    /// s/m/h suffix. Empty or unparseable means no limit.
    #[arg(long, default_value = "")]
    pub ttl: Ttl,

    /// Criteria file [default: ~/.imapstats/config.yaml].
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Where fetched stats are written.
    pub const fn output_mode(&self) -> OutputMode {
        OutputMode::new(self.write_cache, self.quiet)
    }
}
