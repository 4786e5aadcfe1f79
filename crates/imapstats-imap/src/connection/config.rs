//! Connection configuration.

use std::time::Duration;

use crate::{Error, Result};

/// Implicit-TLS IMAP port.
pub const DEFAULT_PORT: u16 = 993;

/// Default connect and per-command deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to connect and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server hostname (also used for TLS server name verification).
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Deadline for TCP connect plus TLS handshake.
    pub connect_timeout: Duration,
    /// Deadline for each command round-trip, greeting included.
    pub io_timeout: Duration,
}

impl Config {
    /// Creates a configuration for `host` on port 993 with default deadlines.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_TIMEOUT,
            io_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Parses `host:port` (or bare `host`, meaning port 993).
    ///
    /// IPv6 literals must be bracketed: `[::1]:993`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] for an empty host or a bad port.
    pub fn parse_addr(addr: &str) -> Result<Self> {
        let invalid = || Error::InvalidAddress(addr.to_string());

        let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            let port = match tail {
                "" => DEFAULT_PORT,
                _ => tail
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(invalid)?,
            };
            (host, port)
        } else {
            match addr.rsplit_once(':') {
                Some((host, port)) => (host, port.parse().map_err(|_| invalid())?),
                None => (addr, DEFAULT_PORT),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            port,
            ..Self::new(host)
        })
    }

    /// Sets the connect deadline.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-command deadline.
    #[must_use]
    pub const fn io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// `host:port` as passed to the resolver.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
