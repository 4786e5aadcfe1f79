//! The live IMAP session.

use std::fmt;

use imapstats_imap::connection::connect_tls;
use imapstats_imap::{Client, Config, Result as ImapResult, Selected, SeqNum};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use super::{MailboxConnection, run};
use crate::config::StatsConfig;
use crate::criteria::Query;
use crate::error::{Error, Result};
use crate::escalation::{Escalating, TimeoutHandler, escalate};
use crate::stats::{EnvelopeSample, StatsResult};

/// Server and credentials for one account.
#[derive(Clone)]
pub struct Login {
    /// Server address and deadlines.
    pub server: Config,
    /// Account name; also the cache key prefix.
    pub user: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// [`MailboxConnection`] over a selected IMAP client.
#[derive(Debug)]
pub struct ImapConnection<S> {
    client: Client<S, Selected>,
}

impl<S> ImapConnection<S> {
    /// Wraps a client that has a mailbox open.
    pub const fn new(client: Client<S, Selected>) -> Self {
        Self { client }
    }
}

impl<S> MailboxConnection for ImapConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn search(&mut self, query: &Query) -> ImapResult<Vec<SeqNum>> {
        self.client.search(&query.to_search_criteria()).await
    }

    async fn fetch_envelopes(&mut self, ids: &[SeqNum]) -> ImapResult<Vec<EnvelopeSample>> {
        let envelopes = self.client.fetch_envelopes(ids).await?;
        Ok(envelopes
            .iter()
            .map(|(_, envelope)| EnvelopeSample::from(envelope))
            .collect())
    }

    async fn logout(self) -> ImapResult<()> {
        self.client.logout().await
    }
}

/// Connects to `login.server` and collects `stats` for `mailbox`.
///
/// Every network step, including connect, runs through `handler`.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the session cannot be set up, or the
/// first collection error.
pub async fn fetch_stats<H: TimeoutHandler>(
    login: &Login,
    mailbox: &str,
    stats: &StatsConfig,
    handler: H,
) -> Result<StatsResult> {
    debug!(server = %login.server.socket_addr(), "connecting");
    let stream = escalate(&handler, connect_tls(&login.server).await).map_err(Error::Connection)?;
    fetch_stats_from_stream(stream, login, mailbox, stats, handler).await
}

/// Like [`fetch_stats`], over an already connected stream.
///
/// # Errors
///
/// Same as [`fetch_stats`].
pub async fn fetch_stats_from_stream<S, H>(
    stream: S,
    login: &Login,
    mailbox: &str,
    stats: &StatsConfig,
    handler: H,
) -> Result<StatsResult>
where
    S: AsyncRead + AsyncWrite + Unpin,
    H: TimeoutHandler,
{
    let client = escalate(
        &handler,
        Client::from_stream(stream, login.server.io_timeout).await,
    )
    .map_err(Error::Connection)?;

    let client = escalate(&handler, client.login(&login.user, &login.password).await)
        .map_err(Error::Connection)?;
    info!(user = %login.user, "logged in");

    let (client, status) =
        escalate(&handler, client.examine(mailbox).await).map_err(Error::Connection)?;
    debug!(%mailbox, exists = status.exists, "mailbox opened");

    run(Escalating::new(ImapConnection::new(client), &handler), stats).await
}
