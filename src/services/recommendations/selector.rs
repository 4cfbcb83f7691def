use std::collections::HashSet;

use crate::models::ActorId;

/// How many new ids a step may contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    /// At most this many, however short earlier steps fell
    Fixed(usize),
    /// Whatever room is left under the overall bound
    Remaining,
}

/// One source list and its quota
#[derive(Debug, Clone, Copy)]
pub struct QuotaStep<'a> {
    pub source: &'a [ActorId],
    pub quota: Quota,
}

impl<'a> QuotaStep<'a> {
    pub fn fixed(source: &'a [ActorId], count: usize) -> Self {
        Self {
            source,
            quota: Quota::Fixed(count),
        }
    }

    pub fn remaining(source: &'a [ActorId]) -> Self {
        Self {
            source,
            quota: Quota::Remaining,
        }
    }
}

/// Builds a de-duplicated ranked list from several ranked sources, step by step
///
/// Steps run in order. Each preserves its source's order and skips ids chosen by any
/// earlier step; the whole result never exceeds `bound` when one is set.
#[derive(Debug, Clone, Copy)]
pub struct QuotaSelector {
    bound: Option<usize>,
}

impl QuotaSelector {
    pub fn new(bound: Option<usize>) -> Self {
        Self { bound }
    }

    pub fn select(&self, steps: &[QuotaStep<'_>]) -> Vec<ActorId> {
        let mut result = Vec::new();
        let mut chosen = HashSet::new();

        for step in steps {
            let allowance = match step.quota {
                Quota::Fixed(count) => count,
                Quota::Remaining => usize::MAX,
            };

            let mut taken = 0;
            for &id in step.source {
                if taken == allowance || self.is_full(&result) {
                    break;
                }
                if chosen.insert(id) {
                    result.push(id);
                    taken += 1;
                }
            }
        }

        result
    }

    fn is_full(&self, result: &[ActorId]) -> bool {
        self.bound.is_some_and(|bound| result.len() >= bound)
    }

    /// User recommendations: half friends, a quarter likes, tags for the rest, then combined
    ///
    /// The likes quota is not raised when friends fall short; the tags step is what absorbs
    /// any shortfall.
    pub fn pick_top(
        friends: &[ActorId],
        likes: &[ActorId],
        tags: &[ActorId],
        combined: &[ActorId],
        top_n: usize,
    ) -> Vec<ActorId> {
        Self::new(Some(top_n)).select(&[
            QuotaStep::fixed(friends, top_n / 2),
            QuotaStep::fixed(likes, top_n / 4),
            QuotaStep::remaining(tags),
            QuotaStep::remaining(combined),
        ])
    }

    /// Post ordering: likes, then tags, then combined, optionally bounded
    pub fn order_all(
        likes: &[ActorId],
        tags: &[ActorId],
        combined: &[ActorId],
        limit: Option<usize>,
    ) -> Vec<ActorId> {
        Self::new(limit).select(&[
            QuotaStep::remaining(likes),
            QuotaStep::remaining(tags),
            QuotaStep::remaining(combined),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_top_quota_ordering() {
        let friends = [1, 2, 3, 4, 5, 6];
        let likes = [7, 8];
        let tags = [9, 10];
        let combined = [1, 7, 9, 11, 12];

        let picked = QuotaSelector::pick_top(&friends, &likes, &tags, &combined, 6);

        assert_eq!(picked, vec![1, 2, 3, 7, 9, 10]);
    }

    #[test]
    fn test_pick_top_falls_back_to_combined() {
        let picked = QuotaSelector::pick_top(&[1], &[2], &[3], &[1, 4, 5, 6], 5);
        assert_eq!(picked, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_likes_quota_not_inflated_by_friend_shortfall() {
        // top_n = 8: friends quota 4 (only 1 available), likes quota 2
        let picked = QuotaSelector::pick_top(&[1], &[2, 3, 4, 5], &[6, 7, 8, 9, 10], &[], 8);
        assert_eq!(picked, vec![1, 2, 3, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_pick_top_deduplicates_across_sources() {
        let picked = QuotaSelector::pick_top(&[1, 2], &[2, 1, 3], &[3, 1, 4], &[4, 3, 5], 10);

        assert_eq!(picked, vec![1, 2, 3, 4, 5]);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), picked.len());
    }

    #[test]
    fn test_pick_top_with_no_sources_is_empty() {
        assert!(QuotaSelector::pick_top(&[], &[], &[], &[], 15).is_empty());
    }

    #[test]
    fn test_pick_top_zero_is_empty() {
        assert!(QuotaSelector::pick_top(&[1], &[2], &[3], &[4], 0).is_empty());
    }

    #[test]
    fn test_pick_top_single_slot_comes_from_tags() {
        // top_n = 1: friends and likes quotas are both zero
        assert_eq!(QuotaSelector::pick_top(&[1], &[2], &[3], &[4], 1), vec![3]);
    }

    #[test]
    fn test_prefix_stable_when_quotas_match() {
        let friends = [1, 2, 3, 4];
        let likes = [5, 6, 7];
        let tags = [8, 9, 10, 11];
        let combined = [12, 13];

        // 6 and 7 share the same friends (3) and likes (1) quotas
        let smaller = QuotaSelector::pick_top(&friends, &likes, &tags, &combined, 6);
        let larger = QuotaSelector::pick_top(&friends, &likes, &tags, &combined, 7);

        assert_eq!(smaller.len(), 6);
        assert_eq!(&larger[..smaller.len()], smaller.as_slice());
    }

    #[test]
    fn test_order_all_unbounded() {
        let ordered = QuotaSelector::order_all(&[3, 1], &[1, 4], &[5, 3, 6], None);
        assert_eq!(ordered, vec![3, 1, 4, 5, 6]);
    }

    #[test]
    fn test_order_all_respects_limit() {
        let ordered = QuotaSelector::order_all(&[3, 1], &[1, 4], &[5, 3, 6], Some(3));
        assert_eq!(ordered, vec![3, 1, 4]);
    }
}
