//! Type-state client.
//!
//! The IMAP connection states map onto marker types:
//!
//! - [`NotAuthenticated`]: after the greeting
//! - [`Authenticated`]: after LOGIN
//! - [`Selected`]: after EXAMINE
//!
//! Every command round-trip runs under the client's I/O deadline and fails
//! with [`Error::Timeout`] when it elapses. Nothing is retried.

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use std::marker::PhantomData;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::FramedStream;
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, Status};
use crate::{Error, Result};

/// IMAP client; `State` tracks the protocol state at compile time.
pub struct Client<S, State> {
    stream: FramedStream<S>,
    tag_gen: TagGenerator,
    capabilities: Vec<Capability>,
    io_timeout: Duration,
    _state: PhantomData<State>,
}

impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .field("io_timeout", &self.io_timeout)
            .finish_non_exhaustive()
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Capabilities seen so far (greeting or LOGIN completion).
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    fn has_capability(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Per-command deadline.
    #[must_use]
    pub const fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    /// Sends `command` and collects every frame up to its tagged completion.
    ///
    /// Fails with the completion status when it is not OK.
    pub(crate) async fn execute(&mut self, command: &Command) -> Result<Vec<Vec<u8>>> {
        let tag = self.tag_gen.next();
        debug!(%tag, command = command.name(), "sending");

        let bytes = command.to_line(&tag)?;
        let stream = &mut self.stream;
        let round_trip = async {
            stream.write_command(&bytes).await?;
            stream.read_until_tagged(&tag).await
        };

        let frames = tokio::time::timeout(self.io_timeout, round_trip)
            .await
            .map_err(|_| Error::Timeout(self.io_timeout))??;

        Self::check_tagged_ok(&frames, &tag)?;
        debug!(%tag, frames = frames.len(), "completed");
        Ok(frames)
    }

    fn absorb_capabilities(&mut self, frames: &[Vec<u8>]) {
        for frame in frames {
            if let Ok(Response::Untagged(UntaggedResponse::Capability(caps))) =
                ResponseParser::parse(frame)
            {
                self.capabilities = caps;
            }
        }
    }

    /// Maps the tagged completion for `tag` to a result.
    fn check_tagged_ok(frames: &[Vec<u8>], tag: &str) -> Result<()> {
        let completion = frames
            .last()
            .map(|frame| ResponseParser::parse(frame))
            .transpose()?;

        match completion {
            Some(Response::Tagged {
                tag: got,
                status,
                text,
                ..
            }) if got.as_str() == tag => match status {
                Status::Ok | Status::PreAuth => Ok(()),
                Status::No => Err(Error::No(text)),
                Status::Bad => Err(Error::Bad(text)),
                Status::Bye => Err(Error::Bye(text)),
            },
            _ => Err(Error::Protocol(format!("missing completion for {tag}"))),
        }
    }

    /// Moves the connection into another state.
    fn into_state<Next>(self) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            io_timeout: self.io_timeout,
            _state: PhantomData,
        }
    }

    /// Sends LOGOUT and shuts the connection down.
    ///
    /// Available in every state.
    pub async fn logout(mut self) -> Result<()> {
        self.execute(&Command::Logout).await?;
        // The server has already said BYE; a failed close changes nothing.
        let _ = self.stream.shutdown().await;
        Ok(())
    }
}
