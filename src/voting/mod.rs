pub mod multi_choice;
pub mod opinion;
pub mod single_choice;
pub mod slide;

pub use multi_choice::build_multi_choice_votes;
pub use opinion::build_opinion_votes;
pub use single_choice::build_single_choice_votes;
pub use slide::build_slide_votes;

use crate::models::{PollRecord, PollType};
use std::str::FromStr;
use thiserror::Error;

/// One entry per poll option for choice and slide polls, or the `[1]`
/// sentinel for opinion polls.
pub type VoteVector = Vec<u32>;

// A respondent's raw answer before encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteSelection {
    SingleChoice { selected_index: i64 },
    MultiChoice { selected_indices: Vec<i64> },
    Slide { order: Vec<i64> },
    Opinion { value: String },
}

impl VoteSelection {
    pub fn poll_type(&self) -> PollType {
        match self {
            VoteSelection::SingleChoice { .. } => PollType::SingleChoice,
            VoteSelection::MultiChoice { .. } => PollType::MultiChoice,
            VoteSelection::Slide { .. } => PollType::Slide,
            VoteSelection::Opinion { .. } => PollType::Opinion,
        }
    }

    /// Free text travels next to the vote vector, never inside it.
    pub fn inputs(&self) -> Vec<String> {
        match self {
            VoteSelection::Opinion { value } => vec![value.clone()],
            _ => Vec::new(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionParseError {
    #[error("expected <kind>:<value>, got '{0}'")]
    MissingKind(String),

    #[error("unknown answer kind '{0}' (use single, multi, slide or opinion)")]
    UnknownKind(String),

    #[error("'{0}' is not an option index")]
    BadIndex(String),
}

fn parse_indices(raw: &str) -> Result<Vec<i64>, SelectionParseError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|_| SelectionParseError::BadIndex(s.to_string())))
        .collect()
}

// Accepts "single:2", "multi:0,2", "slide:2,0,1" (or "slide:" for the
// original order) and "opinion:free text"
impl FromStr for VoteSelection {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| SelectionParseError::MissingKind(s.to_string()))?;

        match kind.trim() {
            "single" | "single_choice" => {
                let raw = value.trim();
                let selected_index = raw
                    .parse::<i64>()
                    .map_err(|_| SelectionParseError::BadIndex(raw.to_string()))?;
                Ok(VoteSelection::SingleChoice { selected_index })
            }
            "multi" | "multi_choice" => Ok(VoteSelection::MultiChoice {
                selected_indices: parse_indices(value)?,
            }),
            "slide" => Ok(VoteSelection::Slide {
                order: parse_indices(value)?,
            }),
            "opinion" => Ok(VoteSelection::Opinion {
                value: value.to_string(),
            }),
            other => Err(SelectionParseError::UnknownKind(other.to_string())),
        }
    }
}

pub fn infer_poll_type(poll: &PollRecord) -> Option<PollType> {
    let raw = poll.poll_type.as_deref().unwrap_or("").trim();
    if raw.is_empty() {
        return None;
    }
    PollType::from_wire(raw)
}

pub fn build_votes_by_type(selection: &VoteSelection, options_len: usize) -> VoteVector {
    match selection {
        VoteSelection::SingleChoice { selected_index } => {
            build_single_choice_votes(*selected_index, options_len)
        }
        VoteSelection::MultiChoice { selected_indices } => {
            build_multi_choice_votes(selected_indices, options_len)
        }
        VoteSelection::Slide { order } => build_slide_votes(options_len, Some(order)),
        VoteSelection::Opinion { value } => build_opinion_votes(value),
    }
}

pub(crate) fn zero_votes(options_len: usize) -> VoteVector {
    vec![0; options_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_of_type(kind: &str) -> PollRecord {
        PollRecord {
            poll_type: Some(kind.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn infers_only_exact_known_types() {
        assert_eq!(infer_poll_type(&poll_of_type("slide")), Some(PollType::Slide));
        assert_eq!(
            infer_poll_type(&poll_of_type("  multi_choice ")),
            Some(PollType::MultiChoice)
        );
        assert_eq!(infer_poll_type(&poll_of_type("ranked")), None);
        assert_eq!(infer_poll_type(&poll_of_type("Slide")), None);
        assert_eq!(infer_poll_type(&poll_of_type("single")), None);
        assert_eq!(infer_poll_type(&PollRecord::default()), None);
    }

    #[test]
    fn parses_cli_answers() {
        assert_eq!(
            "single:2".parse::<VoteSelection>(),
            Ok(VoteSelection::SingleChoice { selected_index: 2 })
        );
        assert_eq!(
            "multi:0, 2,2".parse::<VoteSelection>(),
            Ok(VoteSelection::MultiChoice { selected_indices: vec![0, 2, 2] })
        );
        assert_eq!(
            "slide:".parse::<VoteSelection>(),
            Ok(VoteSelection::Slide { order: vec![] })
        );
        assert_eq!(
            "opinion:more salad: please".parse::<VoteSelection>(),
            Ok(VoteSelection::Opinion { value: "more salad: please".into() })
        );
        assert_eq!(
            "ranked:1".parse::<VoteSelection>(),
            Err(SelectionParseError::UnknownKind("ranked".into()))
        );
        assert_eq!(
            "multi:1,x".parse::<VoteSelection>(),
            Err(SelectionParseError::BadIndex("x".into()))
        );
        assert!(matches!(
            "2".parse::<VoteSelection>(),
            Err(SelectionParseError::MissingKind(_))
        ));
    }

    #[test]
    fn dispatches_by_selection_kind() {
        let single = VoteSelection::SingleChoice { selected_index: 1 };
        let slide = VoteSelection::Slide { order: vec![] };
        let opinion = VoteSelection::Opinion { value: "hi".into() };
        assert_eq!(build_votes_by_type(&single, 3), vec![0, 1, 0]);
        assert_eq!(build_votes_by_type(&slide, 3), vec![3, 2, 1]);
        assert_eq!(build_votes_by_type(&opinion, 1), vec![1]);
        assert_eq!(opinion.inputs(), vec!["hi".to_string()]);
        assert!(single.inputs().is_empty());
    }
}
