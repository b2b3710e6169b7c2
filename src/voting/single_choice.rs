use crate::voting::{VoteVector, zero_votes};

/// One-hot encoding of a single selected option.
///
/// The index is clamped into `0..options_len`, so every non-empty poll gets
/// exactly one `1`. Polls without options produce an empty vector.
pub fn build_single_choice_votes(selected_index: i64, options_len: usize) -> VoteVector {
    let mut votes = zero_votes(options_len);
    if votes.is_empty() {
        return votes;
    }

    let last = (votes.len() - 1) as i64;
    let index = selected_index.clamp(0, last) as usize;
    votes[index] = 1;
    votes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn marks_the_selected_option() {
        assert_eq!(build_single_choice_votes(2, 4), vec![0, 0, 1, 0]);
    }

    #[test]
    fn clamps_out_of_range_selections() {
        assert_eq!(build_single_choice_votes(-3, 3), vec![1, 0, 0]);
        assert_eq!(build_single_choice_votes(10, 3), vec![0, 0, 1]);
    }

    #[test]
    fn no_options_means_no_votes() {
        assert!(build_single_choice_votes(0, 0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_exactly_one_hot(index in -50i64..50, len in 0usize..20) {
            let votes = build_single_choice_votes(index, len);
            prop_assert_eq!(votes.len(), len);

            let ones = votes.iter().filter(|v| **v == 1).count();
            if len == 0 {
                prop_assert_eq!(ones, 0);
            } else {
                prop_assert_eq!(ones, 1);
                let expected = index.clamp(0, len as i64 - 1) as usize;
                prop_assert_eq!(votes[expected], 1);
            }
        }
    }
}
