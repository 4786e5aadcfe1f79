//! Connection management.
//!
//! - [`Config`]: server address and deadlines
//! - [`ImapStream`]: implicit-TLS transport
//! - [`FramedStream`]: line/literal framing
//! - [`Client`]: type-state command interface

mod client;
mod config;
mod framed;
mod stream;

pub use client::{Authenticated, Client, NotAuthenticated, Selected};
pub use config::{Config, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use framed::FramedStream;
pub use stream::{ImapStream, connect_tls, create_tls_connector};
