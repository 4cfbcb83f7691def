use std::collections::HashSet;
use std::iter::FusedIterator;
use std::vec;

use crate::models::ActorId;

/// Lazily yields batches by drawing round-robin from ranked streams
///
/// The round-robin cursor carries over between batches, exhausted streams are skipped and
/// ids already yielded are dropped. Iteration ends on the first empty batch or once `limit`
/// ids have been yielded in total. There is no persisted cursor: paging again means
/// building a new interleaver.
#[derive(Debug, Clone)]
pub struct BatchInterleaver {
    streams: Vec<vec::IntoIter<ActorId>>,
    cursor: usize,
    batch_size: usize,
    limit: Option<usize>,
    yielded: HashSet<ActorId>,
    done: bool,
}

impl BatchInterleaver {
    /// `streams` are drawn from in the given order
    pub fn new(streams: Vec<Vec<ActorId>>, batch_size: usize, limit: Option<usize>) -> Self {
        Self {
            streams: streams.into_iter().map(Vec::into_iter).collect(),
            cursor: 0,
            batch_size,
            limit,
            yielded: HashSet::new(),
            done: false,
        }
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded.len() >= limit)
    }

    /// Next id in round-robin order, or `None` once every stream is exhausted
    fn draw(&mut self) -> Option<ActorId> {
        while self.streams.iter().any(|stream| stream.len() > 0) {
            let index = self.cursor;
            self.cursor = (self.cursor + 1) % self.streams.len();

            if let Some(id) = self.streams[index].next() {
                return Some(id);
            }
        }
        None
    }
}

impl Iterator for BatchInterleaver {
    type Item = Vec<ActorId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::new();
        while batch.len() < self.batch_size && !self.limit_reached() {
            match self.draw() {
                Some(id) => {
                    if self.yielded.insert(id) {
                        batch.push(id);
                    }
                }
                None => break,
            }
        }

        if batch.is_empty() {
            self.done = true;
            return None;
        }

        Some(batch)
    }
}

impl FusedIterator for BatchInterleaver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_resumes_across_batches() {
        let interleaver =
            BatchInterleaver::new(vec![vec![1, 2, 3], vec![4, 5], vec![6]], 2, None);

        let batches: Vec<Vec<ActorId>> = interleaver.collect();

        assert_eq!(batches, vec![vec![1, 4], vec![6, 2], vec![5, 3]]);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let interleaver =
            BatchInterleaver::new(vec![vec![1, 2], vec![1, 3], vec![2, 4]], 10, None);

        let batches: Vec<Vec<ActorId>> = interleaver.collect();

        assert_eq!(batches, vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_limit_caps_cumulative_output() {
        let mut interleaver =
            BatchInterleaver::new(vec![vec![1, 2, 3], vec![4, 5], vec![6]], 2, Some(3));

        assert_eq!(interleaver.next(), Some(vec![1, 4]));
        assert_eq!(interleaver.next(), Some(vec![6]));
        assert_eq!(interleaver.next(), None);
    }

    #[test]
    fn test_cumulative_output_is_unique() {
        let interleaver = BatchInterleaver::new(
            vec![vec![5, 1, 9, 2], vec![1, 2, 7], vec![9, 7, 5, 8]],
            3,
            None,
        );

        let all: Vec<ActorId> = interleaver.flatten().collect();
        let unique: HashSet<_> = all.iter().collect();

        assert_eq!(unique.len(), all.len());
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_empty_streams_yield_nothing() {
        let mut interleaver = BatchInterleaver::new(vec![vec![], vec![], vec![]], 20, None);
        assert_eq!(interleaver.next(), None);
        assert_eq!(interleaver.next(), None);
    }

    #[test]
    fn test_zero_batch_size_or_limit_yields_nothing() {
        assert_eq!(BatchInterleaver::new(vec![vec![1]], 0, None).count(), 0);
        assert_eq!(BatchInterleaver::new(vec![vec![1]], 5, Some(0)).count(), 0);
    }
}
