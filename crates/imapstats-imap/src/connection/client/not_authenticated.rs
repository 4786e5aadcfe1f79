//! Greeting and LOGIN.

use std::marker::PhantomData;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, ResponseCode};
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a connected stream and reads the server greeting.
    ///
    /// `io_timeout` bounds the greeting and every later command.
    pub async fn from_stream(stream: S, io_timeout: Duration) -> Result<Self> {
        let mut framed = FramedStream::new(stream);

        let greeting = tokio::time::timeout(io_timeout, framed.read_response())
            .await
            .map_err(|_| Error::Timeout(io_timeout))??;

        let capabilities = match ResponseParser::parse(&greeting)? {
            Response::Untagged(
                UntaggedResponse::Ok { code, .. } | UntaggedResponse::PreAuth { code, .. },
            ) => match code {
                Some(ResponseCode::Capability(caps)) => caps,
                _ => Vec::new(),
            },
            Response::Untagged(UntaggedResponse::Bye { text, .. }) => {
                return Err(Error::Bye(text));
            }
            other => {
                return Err(Error::Protocol(format!("unexpected greeting: {other:?}")));
            }
        };
        debug!(capabilities = capabilities.len(), "greeting received");

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            capabilities,
            io_timeout,
            _state: PhantomData,
        })
    }

    /// Logs in with a plaintext password (the transport is TLS).
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        if self.has_capability(&Capability::LoginDisabled) {
            return Err(Error::Protocol("server disabled LOGIN".to_string()));
        }

        let frames = self
            .execute(&Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.absorb_capabilities(&frames);

        // Capabilities may also ride on the tagged OK.
        if let Some(Ok(Response::Tagged {
            code: Some(ResponseCode::Capability(caps)),
            ..
        })) = frames.last().map(|f| ResponseParser::parse(f))
        {
            self.capabilities = caps;
        }

        debug!(user = username, "logged in");
        Ok(self.into_state())
    }
}
