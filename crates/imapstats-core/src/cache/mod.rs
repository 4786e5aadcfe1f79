//! TTL-gated result cache.
//!
//! One file per account/mailbox pair holding the JSON line last written
//! for it. Staleness is judged from the file's modification time, so the
//! payload carries no timestamp of its own.

mod ttl;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

pub use ttl::Ttl;

use crate::error::{Error, Result};
use crate::stats::StatsResult;
use crate::time::Clock;

/// Where a freshly collected result goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Standard output only.
    Stdout,
    /// Cache file and standard output, same bytes.
    CacheAndStdout,
    /// Cache file only.
    CacheOnly,
}

impl OutputMode {
    /// Picks the mode from the `--write-cache` and `--quiet` flags.
    ///
    /// `quiet` only has an effect when the cache is written.
    #[must_use]
    pub const fn new(write_cache: bool, quiet: bool) -> Self {
        match (write_cache, quiet) {
            (false, _) => Self::Stdout,
            (true, false) => Self::CacheAndStdout,
            (true, true) => Self::CacheOnly,
        }
    }

    const fn writes_cache(self) -> bool {
        !matches!(self, Self::Stdout)
    }

    const fn writes_stdout(self) -> bool {
        !matches!(self, Self::CacheOnly)
    }
}

/// Cache files under one directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the result for `account`/`mailbox`.
    ///
    /// The key is `<account>.<mailbox>` without escaping, so a mailbox
    /// containing `/` lands in a subdirectory.
    #[must_use]
    pub fn path_for(&self, account: &str, mailbox: &str) -> PathBuf {
        self.dir.join(format!("{account}.{mailbox}"))
    }

    /// Emits `result` according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the cache file, or `out` fails.
    pub fn write(
        &self,
        account: &str,
        mailbox: &str,
        result: &StatsResult,
        mode: OutputMode,
        out: &mut impl Write,
    ) -> Result<()> {
        let bytes = result.to_json_line()?;

        if mode.writes_cache() {
            let path = self.path_for(account, mailbox);
            debug!(path = %path.display(), "writing cache");
            fs::write(&path, &bytes)?;
        }
        if mode.writes_stdout() {
            out.write_all(&bytes)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Copies the cached bytes for `account`/`mailbox` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheNotFound`] if the file is missing or older
    /// than `ttl`, or an I/O error while copying.
    pub fn read_into(
        &self,
        account: &str,
        mailbox: &str,
        ttl: Ttl,
        clock: &impl Clock,
        out: &mut impl Write,
    ) -> Result<()> {
        let path = self.path_for(account, mailbox);

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::CacheNotFound {
                    path,
                    reason: "missing",
                });
            }
            Err(err) => return Err(err.into()),
        };

        if let Ttl::Finite(_) = ttl {
            let age = clock.age_of(file.metadata()?.modified()?);
            if ttl.is_expired(age) {
                debug!(path = %path.display(), ?age, "cache entry is stale");
                return Err(Error::CacheNotFound {
                    path,
                    reason: "too old",
                });
            }
        }

        io::copy(&mut file, out)?;
        out.flush()?;
        Ok(())
    }
}
