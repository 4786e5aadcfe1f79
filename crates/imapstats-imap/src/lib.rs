//! # imapstats-imap
//!
//! The read-only slice of IMAP (RFC 9051, with RFC 3501 fallback) that
//! `imapstats` needs to count and sample messages.
//!
//! ## Features
//!
//! - **Type-state connection management**: `NotAuthenticated` →
//!   `Authenticated` → `Selected`, enforced at compile time
//! - **Read-only command set**: LOGIN, EXAMINE, SEARCH,
//!   FETCH ENVELOPE, LOGOUT
//! - **Typed timeouts**: connect and per-command deadlines surface as
//!   [`Error::Timeout`] instead of being retried internally
//! - **TLS via rustls**: no OpenSSL dependency
//! - **Sans-I/O parser**: protocol parsing separated from network I/O
//!
//! ## Quick Start
//!
//! ```ignore
//! use imapstats_imap::{Client, Config, SearchCriteria};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> imapstats_imap::Result<()> {
//!     let config = Config::parse_addr("imap.example.com:993")?;
//!     let stream = imapstats_imap::connection::connect_tls(&config).await?;
//!     let client = Client::from_stream(stream, config.io_timeout).await?;
//!
//!     let client = client.login("user@example.com", "password").await?;
//!     let (mut client, status) = client.examine("INBOX").await?;
//!     println!("Messages: {}", status.exists);
//!
//!     let unseen = client.search(&SearchCriteria::Unseen).await?;
//!     println!("Unseen: {}", unseen.len());
//!
//!     client.logout().await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`]: command builders and serialization
//! - [`connection`]: transport, framing and the type-state client
//! - [`parser`]: sans-I/O response parser
//! - [`types`]: core IMAP types (sequence numbers, mailboxes, statuses)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, SearchCriteria, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, FramedStream, ImapStream, NotAuthenticated, Selected,
};
pub use error::{Error, Result};
pub use parser::{Envelope, FetchItem, Response, ResponseParser, UntaggedResponse};
pub use types::{Capability, Mailbox, MailboxStatus, ResponseCode, SeqNum, SequenceSet, Status, Tag};
