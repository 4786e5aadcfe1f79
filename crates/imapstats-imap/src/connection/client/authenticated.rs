//! Mailbox selection.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::Command;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Mailbox, MailboxStatus, ResponseCode};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// EXAMINEs a mailbox (read-only SELECT).
    pub async fn examine(mut self, mailbox: &str) -> Result<(Client<S, Selected>, MailboxStatus)> {
        let mailbox = Mailbox::new(mailbox);
        let frames = self
            .execute(&Command::Examine {
                mailbox: mailbox.clone(),
            })
            .await?;
        let status = mailbox_status(&frames);
        debug!(%mailbox, exists = status.exists, read_only = status.read_only, "mailbox open");

        Ok((self.into_state(), status))
    }
}

/// Collects EXAMINE untagged data into a status.
fn mailbox_status(frames: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for frame in frames {
        let code = match ResponseParser::parse(frame) {
            Ok(Response::Untagged(UntaggedResponse::Exists(n))) => {
                status.exists = n;
                continue;
            }
            Ok(Response::Untagged(UntaggedResponse::Recent(n))) => {
                status.recent = n;
                continue;
            }
            Ok(
                Response::Untagged(UntaggedResponse::Ok { code, .. })
                | Response::Tagged { code, .. },
            ) => code,
            _ => continue,
        };

        match code {
            Some(ResponseCode::Unseen(n)) => status.first_unseen = Some(n),
            Some(ResponseCode::UidValidity(n)) => status.uid_validity = Some(n),
            Some(ResponseCode::UidNext(n)) => status.uid_next = Some(n),
            Some(ResponseCode::ReadOnly) => status.read_only = true,
            Some(ResponseCode::ReadWrite) => status.read_only = false,
            _ => {}
        }
    }

    status
}
