use crate::voting::{VoteVector, zero_votes};

/// Encodes a ranked ordering as descending weights.
///
/// `order[r]` is the option placed at rank `r`; it receives
/// `max(options_len - r, 1)`. Without an order (or with an empty one) the
/// options keep their original sequence. Indices outside the option range
/// are clamped onto the nearest option, and options the order never
/// mentions end up with the floor weight of 1.
pub fn build_slide_votes(options_len: usize, order_indices: Option<&[i64]>) -> VoteVector {
    let mut votes = zero_votes(options_len);
    if votes.is_empty() {
        return votes;
    }

    let identity: Vec<i64>;
    let order: &[i64] = match order_indices {
        Some(order) if !order.is_empty() => order,
        _ => {
            identity = (0..options_len as i64).collect();
            &identity
        }
    };

    let max_score = votes.len();
    let last = (votes.len() - 1) as i64;

    for (rank, original_index) in order.iter().enumerate() {
        let index = (*original_index).clamp(0, last) as usize;
        let score = max_score.saturating_sub(rank).max(1);
        votes[index] = score as u32;
    }

    for vote in votes.iter_mut().filter(|v| **v == 0) {
        *vote = 1;
    }

    votes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ranks_map_to_descending_weights() {
        // rank0 -> option 2, rank1 -> option 0, rank2 -> option 3, rank3 -> option 1
        assert_eq!(build_slide_votes(4, Some(&[2, 0, 3, 1])), vec![3, 1, 4, 2]);
    }

    #[test]
    fn defaults_to_original_order() {
        assert_eq!(build_slide_votes(3, None), vec![3, 2, 1]);
        assert_eq!(build_slide_votes(3, Some(&[])), vec![3, 2, 1]);
    }

    #[test]
    fn unmentioned_options_get_the_floor_weight() {
        assert_eq!(build_slide_votes(4, Some(&[3])), vec![1, 1, 1, 4]);
    }

    #[test]
    fn ranks_past_the_option_count_stay_at_one() {
        // The sixth rank would score 4 - 5 but never drops under 1
        assert_eq!(build_slide_votes(4, Some(&[0, 1, 2, 3, 0, 1])), vec![1, 1, 2, 1]);
    }

    #[test]
    fn empty_poll() {
        assert!(build_slide_votes(0, Some(&[1, 0])).is_empty());
    }

    proptest! {
        #[test]
        fn prop_permutations_give_strictly_ranked_weights(
            order in (1usize..12).prop_flat_map(|n| Just((0..n as i64).collect::<Vec<_>>()).prop_shuffle())
        ) {
            let len = order.len();
            let votes = build_slide_votes(len, Some(&order));
            prop_assert_eq!(votes.len(), len);
            prop_assert!(votes.iter().all(|v| *v >= 1));

            let by_rank: Vec<u32> = order.iter().map(|idx| votes[*idx as usize]).collect();
            prop_assert!(by_rank.windows(2).all(|w| w[0] > w[1]));
            prop_assert_eq!(by_rank[0] as usize, len);
        }
    }
}
