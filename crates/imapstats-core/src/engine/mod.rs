//! Stats collection.
//!
//! [`collect_stats`] runs one SEARCH per statistic (plus an optional
//! FETCH ENVELOPE) against a connection already positioned on a mailbox.
//! [`fetch_stats`] owns the whole session around it: connect, LOGIN,
//! EXAMINE, collect, LOGOUT.

mod connection;

use imapstats_imap::{Result as ImapResult, SeqNum};
use tracing::{debug, warn};

pub use connection::{ImapConnection, Login, fetch_stats, fetch_stats_from_stream};

use crate::config::StatsConfig;
use crate::criteria::{Query, compile};
use crate::error::{Error, Result};
use crate::stats::{EnvelopeSample, MAX_MAIL_FETCH_COUNT, StatsResult};

/// The mailbox operations statistics are collected with.
///
/// Implementations are positioned on one mailbox already.
#[allow(async_fn_in_trait)]
pub trait MailboxConnection {
    /// Returns the sequence numbers matching `query`, in server order.
    async fn search(&mut self, query: &Query) -> ImapResult<Vec<SeqNum>>;

    /// Returns date and subject for each of `ids`, in the order given.
    async fn fetch_envelopes(&mut self, ids: &[SeqNum]) -> ImapResult<Vec<EnvelopeSample>>;

    /// Ends the session.
    async fn logout(self) -> ImapResult<()>;
}

/// Evaluates every statistic in `stats` on `conn`.
///
/// The first failing search or fetch aborts the run.
///
/// # Errors
///
/// Returns [`Error::Search`] or [`Error::Fetch`] naming the statistic, or
/// [`Error::Config`] for a criterion that does not compile.
pub async fn collect_stats<C: MailboxConnection>(
    conn: &mut C,
    stats: &StatsConfig,
) -> Result<StatsResult> {
    let mut result = StatsResult::new();

    for (stat, criterion) in stats {
        let query = compile(criterion)?;
        let ids = conn.search(&query).await.map_err(|source| Error::Search {
            stat: stat.clone(),
            source,
        })?;
        debug!(%stat, matches = ids.len(), "search complete");
        result.insert_count(stat, ids.len());

        if !criterion.fetch_envelope || ids.is_empty() {
            continue;
        }

        let fetch_count = ids.len().min(MAX_MAIL_FETCH_COUNT);
        if ids.len() > fetch_count {
            warn!(
                %stat,
                total = ids.len(),
                fetching = fetch_count,
                "too many matching messages, fetching only the first ones"
            );
        }

        let samples = conn
            .fetch_envelopes(&ids[..fetch_count])
            .await
            .map_err(|source| Error::Fetch {
                stat: stat.clone(),
                source,
            })?;
        result.insert_samples(stat, samples);
    }

    Ok(result)
}

/// Collects `stats` and then logs out, whatever the outcome.
///
/// A failed LOGOUT after a successful collection is only logged.
///
/// # Errors
///
/// Returns the collection error, if any.
pub async fn run<C: MailboxConnection>(mut conn: C, stats: &StatsConfig) -> Result<StatsResult> {
    let result = collect_stats(&mut conn, stats).await;
    if let Err(err) = conn.logout().await {
        warn!(%err, "logout failed");
    }
    result
}
