//! Drafted answers for one sheet and their submission.

use crate::api::{ApiClient, Transport};
use crate::models::VoteSubmission;
use crate::voting::VoteVector;
use log::{error, info, warn};
use std::collections::BTreeMap;

pub use crate::phone::is_respondent_phone_valid as respondent_phone_ok;

#[derive(Debug, Clone, PartialEq)]
struct Draft {
    votes: VoteVector,
    inputs: Vec<String>,
}

/// Per-poll answers waiting to be submitted, keyed by poll id.
#[derive(Debug, Clone, Default)]
pub struct VoteBook {
    drafts: BTreeMap<String, Draft>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct SubmitReport {
    pub outcomes: BTreeMap<String, SubmitOutcome>,
}

impl SubmitReport {
    pub fn all_accepted(&self) -> bool {
        self.outcomes.values().all(|o| *o == SubmitOutcome::Accepted)
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(id, outcome)| match outcome {
            SubmitOutcome::Failed(reason) => Some((id.as_str(), reason.as_str())),
            SubmitOutcome::Accepted => None,
        })
    }
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or replaces the answer for `poll_id`. An answer with nothing
    /// in it removes the entry instead.
    pub fn record(&mut self, poll_id: &str, votes: VoteVector, inputs: &[String]) {
        let cleaned: Vec<String> = inputs
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let keep = if inputs.is_empty() {
            votes.iter().any(|v| *v != 0)
        } else {
            !cleaned.is_empty()
        };

        if keep {
            self.drafts.insert(
                poll_id.to_string(),
                Draft {
                    votes,
                    inputs: cleaned,
                },
            );
        } else {
            self.drafts.remove(poll_id);
        }
    }

    pub fn get(&self, poll_id: &str) -> Option<(&[u32], &[String])> {
        self.drafts
            .get(poll_id)
            .map(|d| (d.votes.as_slice(), d.inputs.as_slice()))
    }

    pub fn has_any_vote(&self) -> bool {
        !self.drafts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn submissions(&self) -> Vec<VoteSubmission> {
        self.drafts
            .iter()
            .map(|(id, draft)| VoteSubmission {
                id: id.clone(),
                votes: draft.votes.clone(),
                inputs: draft.inputs.clone(),
            })
            .collect()
    }

    /// Submits every entry concurrently, one request per poll. Accepted
    /// polls stay accepted when others fail.
    pub async fn submit_all<T>(&self, client: &ApiClient<T>) -> SubmitReport
    where
        T: Transport + 'static,
    {
        let mut handles = Vec::with_capacity(self.drafts.len());
        for submission in self.submissions() {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                let result = client.submit_poll_votes(&submission).await;
                (submission.id, result)
            }));
        }

        let mut report = SubmitReport::default();
        for handle in handles {
            match handle.await {
                Ok((id, Ok(_))) => {
                    info!("Submitted votes for poll {}", id);
                    report.outcomes.insert(id, SubmitOutcome::Accepted);
                }
                Ok((id, Err(e))) => {
                    warn!("Submitting poll {} failed: {}", id, e);
                    report.outcomes.insert(id, SubmitOutcome::Failed(e.to_string()));
                }
                Err(e) => error!("Submission task panicked: {}", e),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestBody;
    use crate::api::fake::FakeTransport;
    use serde_json::json;

    fn inputs(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn zero_votes_without_inputs_are_dropped() {
        let mut book = VoteBook::new();
        book.record("1", vec![0, 1, 0], &[]);
        assert!(book.has_any_vote());

        book.record("1", vec![0, 0, 0], &[]);
        assert!(!book.has_any_vote());
        assert_eq!(book.len(), 0);
    }

    #[test]
    fn blank_inputs_remove_the_entry() {
        let mut book = VoteBook::new();
        book.record("op", vec![1], &inputs(&["  great  ", ""]));
        assert_eq!(book.get("op").unwrap().1, &["great".to_string()][..]);

        book.record("op", vec![1], &inputs(&["   "]));
        assert!(book.get("op").is_none());
    }

    #[tokio::test]
    async fn partial_failure_is_reported_per_poll() {
        let client = ApiClient::new(
            FakeTransport::new()
                .respond("/submit", 200, json!({"message": "ok"}))
                .respond("/submit", 500, json!({"error": "db down"})),
        );

        let mut book = VoteBook::new();
        book.record("a", vec![1, 0], &[]);
        book.record("b", vec![0, 1], &[]);

        let report = book.submit_all(&client).await;
        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.all_accepted());
        assert_eq!(report.failed().count(), 1);

        let bodies: Vec<RequestBody> = client
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.body)
            .collect();
        assert!(bodies.contains(&RequestBody::Json(json!({"id": "a", "votes": [1, 0], "inputs": []}))));
    }

    #[test]
    fn phone_rule_is_shared() {
        assert!(respondent_phone_ok(false, ""));
        assert!(!respondent_phone_ok(true, "0912"));
    }
}
