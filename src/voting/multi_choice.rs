use crate::voting::{VoteVector, zero_votes};
use std::collections::BTreeSet;

/// Multi-hot encoding of the selected options.
///
/// Duplicates collapse, and indices outside `0..options_len` are dropped
/// without complaint.
pub fn build_multi_choice_votes(selected_indices: &[i64], options_len: usize) -> VoteVector {
    let mut votes = zero_votes(options_len);
    if votes.is_empty() {
        return votes;
    }

    // Sorted and unique so the walk is deterministic
    let unique_sorted: BTreeSet<i64> = selected_indices.iter().copied().collect();

    for idx in unique_sorted {
        if idx >= 0 && (idx as usize) < votes.len() {
            votes[idx as usize] = 1;
        }
    }

    votes
}
