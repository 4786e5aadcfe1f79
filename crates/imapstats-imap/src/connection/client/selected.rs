//! SEARCH and FETCH.

use std::collections::HashMap;

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::Selected;
use crate::Result;
use crate::command::{Command, SearchCriteria};
use crate::parser::{Envelope, FetchItem, Response, ResponseParser, UntaggedResponse};
use crate::types::{SeqNum, SequenceSet};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Runs SEARCH and returns matching sequence numbers in server order.
    pub async fn search(&mut self, criteria: &SearchCriteria) -> Result<Vec<SeqNum>> {
        let frames = self
            .execute(&Command::Search {
                criteria: criteria.clone(),
            })
            .await?;

        let mut ids = Vec::new();
        for frame in &frames {
            if let Response::Untagged(UntaggedResponse::Search(found)) =
                ResponseParser::parse(frame)?
            {
                ids.extend(found);
            }
        }
        Ok(ids)
    }

    /// Fetches envelopes for `ids`, returned in the order of `ids`.
    ///
    /// Messages the server returned no envelope for are left out.
    pub async fn fetch_envelopes(&mut self, ids: &[SeqNum]) -> Result<Vec<(SeqNum, Envelope)>> {
        let Some(set) = SequenceSet::from_seq_nums(ids) else {
            return Ok(Vec::new());
        };

        let frames = self
            .execute(&Command::FetchEnvelope { sequence: set })
            .await?;

        let mut by_seq: HashMap<SeqNum, Envelope> = HashMap::new();
        for frame in &frames {
            if let Response::Untagged(UntaggedResponse::Fetch { seq, items }) =
                ResponseParser::parse(frame)?
            {
                for item in items {
                    if let FetchItem::Envelope(envelope) = item {
                        by_seq.insert(seq, *envelope);
                    }
                }
            }
        }

        Ok(ids
            .iter()
            .filter_map(|seq| by_seq.remove(seq).map(|env| (*seq, env)))
            .collect())
    }
}
