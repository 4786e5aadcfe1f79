//! Timeout escalation.
//!
//! A network timeout is not retried or reported like other failures: the
//! process exits at once with `EX_UNAVAILABLE` so callers (cron jobs,
//! status bars) can tell "server unreachable" apart from "bad config".
//! [`Escalating`] puts that policy in front of every connection call.

use imapstats_imap::{Error as ImapError, Result as ImapResult, SeqNum};
use tracing::error;

use crate::criteria::Query;
use crate::engine::MailboxConnection;
use crate::stats::EnvelopeSample;

/// Exit status for an unreachable service (`sysexits.h`).
pub const EX_UNAVAILABLE: i32 = 69;

/// Reacts to a timed-out connection call.
pub trait TimeoutHandler {
    /// Called with the error before it propagates. May not return.
    fn on_timeout(&self, err: &ImapError);
}

impl<H: TimeoutHandler + ?Sized> TimeoutHandler for &H {
    fn on_timeout(&self, err: &ImapError) {
        (**self).on_timeout(err);
    }
}

/// Logs the timeout and exits with [`EX_UNAVAILABLE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitOnTimeout;

impl TimeoutHandler for ExitOnTimeout {
    fn on_timeout(&self, err: &ImapError) {
        error!(%err, "network timeout");
        std::process::exit(EX_UNAVAILABLE);
    }
}

/// Runs `handler` if `result` is a timeout, then hands `result` back.
///
/// # Errors
///
/// Returns `result`'s error unchanged.
pub fn escalate<T>(handler: &impl TimeoutHandler, result: ImapResult<T>) -> ImapResult<T> {
    if let Err(err) = &result
        && err.is_timeout()
    {
        handler.on_timeout(err);
    }
    result
}

/// A [`MailboxConnection`] whose calls go through a [`TimeoutHandler`].
#[derive(Debug)]
pub struct Escalating<C, H> {
    inner: C,
    handler: H,
}

impl<C, H> Escalating<C, H> {
    /// Wraps `inner`.
    pub const fn new(inner: C, handler: H) -> Self {
        Self { inner, handler }
    }
}

impl<C, H> MailboxConnection for Escalating<C, H>
where
    C: MailboxConnection,
    H: TimeoutHandler,
{
    async fn search(&mut self, query: &Query) -> ImapResult<Vec<SeqNum>> {
        let result = self.inner.search(query).await;
        escalate(&self.handler, result)
    }

    async fn fetch_envelopes(&mut self, ids: &[SeqNum]) -> ImapResult<Vec<EnvelopeSample>> {
        let result = self.inner.fetch_envelopes(ids).await;
        escalate(&self.handler, result)
    }

    async fn logout(self) -> ImapResult<()> {
        let Self { inner, handler } = self;
        let result = inner.logout().await;
        escalate(&handler, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl TimeoutHandler for Recorder {
        fn on_timeout(&self, err: &ImapError) {
            self.0.borrow_mut().push(err.to_string());
        }
    }

    #[test]
    fn timeouts_reach_the_handler() {
        let recorder = Recorder::default();
        let result: ImapResult<()> =
            escalate(&recorder, Err(ImapError::Timeout(Duration::from_secs(10))));
        assert!(result.unwrap_err().is_timeout());
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn socket_timeouts_reach_the_handler() {
        let recorder = Recorder::default();
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
        let _ = escalate::<()>(&recorder, Err(ImapError::Io(io)));
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn other_errors_pass_through() {
        let recorder = Recorder::default();
        let result: ImapResult<()> = escalate(&recorder, Err(ImapError::No("denied".into())));
        assert!(matches!(result, Err(ImapError::No(_))));
        assert_eq!(escalate(&recorder, Ok(5)).unwrap(), 5);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn handler_by_reference() {
        let recorder = Recorder::default();
        let by_ref = &recorder;
        let _ = escalate::<()>(&by_ref, Err(ImapError::Timeout(Duration::from_secs(1))));
        assert_eq!(recorder.0.borrow().len(), 1);
    }
}
