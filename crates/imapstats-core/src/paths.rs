//! Application directories.

use std::fs::DirBuilder;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the per-user state directory under `$HOME`.
const APP_DIR: &str = ".imapstats";

/// Locations of the config file and the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// `~/.imapstats`.
    pub home: PathBuf,
    /// `~/.imapstats/cache`.
    pub cache_dir: PathBuf,
    /// `~/.imapstats/config.yaml`.
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Lays out the application directory under `user_home`.
    pub fn from_home(user_home: impl AsRef<Path>) -> Self {
        let home = user_home.as_ref().join(APP_DIR);
        Self {
            cache_dir: home.join("cache"),
            config_file: home.join("config.yaml"),
            home,
        }
    }

    /// Lays out the application directory under the user's home.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHomeDir`] if the home directory is unknown.
    pub fn discover() -> Result<Self> {
        dirs::home_dir().map(Self::from_home).ok_or(Error::NoHomeDir)
    }

    /// Uses `config_file` instead of the default config location.
    #[must_use]
    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// Creates the application and cache directories (mode 0700).
    ///
    /// # Errors
    ///
    /// Returns the I/O error if a directory cannot be created.
    pub fn ensure_dirs(&self) -> Result<()> {
        create_private_dir(&self.home)?;
        create_private_dir(&self.cache_dir)?;
        Ok(())
    }
}

fn create_private_dir(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}
