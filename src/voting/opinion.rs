use crate::voting::VoteVector;

/// Opinion polls always vote `[1]`.
///
/// The answer text is sent separately in the submission's `inputs`.
pub fn build_opinion_votes(_value: &str) -> VoteVector {
    vec![1]
}
