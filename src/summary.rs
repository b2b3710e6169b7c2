use crate::normalize::{Normalizer, POLLS, pagination::to_finite_number};
use serde::Serialize;
use serde_json::Value;

/// Per-poll results as shown to admins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminPollSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub options: Vec<String>,
    /// Aligned with `options`; missing tallies are 0.
    pub votes: Vec<f64>,
    pub responses: Vec<String>,
    pub participants: u64,
}

fn trimmed(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| trimmed(Some(item)))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn number_list(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|v| to_finite_number(v).unwrap_or(0.0)).collect())
        .unwrap_or_default()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl AdminPollSummary {
    /// `index` is the record's position in the listing; it stands in for a
    /// missing id and title.
    pub fn from_record(record: &Value, index: usize) -> Self {
        let field = |key: &str| record.get(key);

        let id = non_empty(trimmed(field("id"))).unwrap_or_else(|| (index + 1).to_string());
        let title = non_empty(trimmed(field("title"))).unwrap_or_else(|| format!("Poll {}", index + 1));
        let category = non_empty(trimmed(field("category"))).unwrap_or_else(|| "Uncategorized".to_string());
        let kind = non_empty(trimmed(field("poll_type")))
            .or_else(|| non_empty(trimmed(field("type"))))
            .unwrap_or_else(|| "unknown".to_string());
        let description = non_empty(trimmed(field("description")));

        let options = string_list(field("options"));
        let tallies = number_list(field("votes"));
        let votes: Vec<f64> = (0..options.len())
            .map(|idx| tallies.get(idx).copied().unwrap_or(0.0))
            .collect();
        let responses = string_list(field("responses"));

        let participants = field("participant")
            .and_then(to_finite_number)
            .or_else(|| field("participants").and_then(to_finite_number))
            .map(|n| n.max(0.0).floor() as u64)
            .unwrap_or_else(|| votes.iter().sum::<f64>().max(0.0) as u64);

        Self {
            id,
            title,
            category,
            description,
            kind,
            options,
            votes,
            responses,
            participants,
        }
    }

    /// Share of the total tally held by each option, in percent.
    pub fn percentages(&self) -> Vec<f64> {
        let total: f64 = self.votes.iter().sum();
        self.votes
            .iter()
            .map(|v| if total > 0.0 { v * 100.0 / total } else { 0.0 })
            .collect()
    }
}

pub fn summarize_admin_polls(body: &Value) -> Vec<AdminPollSummary> {
    Normalizer::new(POLLS)
        .raw_records(body)
        .iter()
        .enumerate()
        .map(|(index, record)| AdminPollSummary::from_record(record, index))
        .collect()
}
