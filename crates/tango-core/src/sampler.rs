use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tango_types::{WordId, WordRecord};

use crate::ledger::UsageLedger;

/// Weighted random deck selection.
///
/// Each candidate is weighted by [`UsageEntry::weight`](tango_types::UsageEntry::weight).
/// Ids drawn in the current round are tracked here rather than on the word records.
pub struct WeightedSampler<R = ChaCha8Rng> {
    rng: R,
    drawn: HashSet<WordId>,
}

impl WeightedSampler<ChaCha8Rng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Deterministic sampler, for tests and reproducible sessions
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> WeightedSampler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            drawn: HashSet::new(),
        }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Forget which words were drawn this round
    pub fn reset_round(&mut self) {
        self.drawn.clear();
    }

    pub fn is_drawn(&self, id: WordId) -> bool {
        self.drawn.contains(&id)
    }

    /// Draw `count` distinct words from `pool`.
    ///
    /// When fewer than `count` undrawn words remain the round marks are cleared
    /// once and the draw retried. If the pool itself is smaller than `count`,
    /// every distinct word is returned and the caller sees the shortfall in the
    /// returned length.
    pub fn select(
        &mut self,
        pool: &[WordRecord],
        ledger: &UsageLedger,
        count: usize,
    ) -> Vec<WordRecord> {
        if count == 0 || pool.is_empty() {
            return Vec::new();
        }

        let unique = distinct_by_id(pool);

        let mut available = self.available(&unique);
        if available.len() < count {
            tracing::debug!(
                "Only {} of {} words undrawn, resetting round marks",
                available.len(),
                unique.len()
            );
            self.reset_round();
            available = self.available(&unique);

            if available.len() < count {
                self.drawn.extend(unique.iter().map(|word| word.id));
                return unique.into_iter().cloned().collect();
            }
        }

        let mut candidates: Vec<(&WordRecord, f64)> = available
            .into_iter()
            .map(|word| (word, ledger.get(word.id).weight()))
            .collect();

        let mut selected = Vec::with_capacity(count);
        while selected.len() < count && !candidates.is_empty() {
            let index = self.draw_index(&candidates);
            let (word, _) = candidates.remove(index);

            self.drawn.insert(word.id);
            selected.push(word.clone());
        }

        selected
    }

    /// Inverse-CDF pick over the cumulative weights, in candidate order
    fn draw_index(&mut self, candidates: &[(&WordRecord, f64)]) -> usize {
        let mut total = 0.0;
        let cumulative: Vec<f64> = candidates
            .iter()
            .map(|(_, weight)| {
                total += weight;
                total
            })
            .collect();

        let target = self.rng.gen_range(0.0..total);
        cumulative
            .partition_point(|&bound| bound <= target)
            .min(candidates.len() - 1)
    }

    fn available<'a>(&self, words: &[&'a WordRecord]) -> Vec<&'a WordRecord> {
        words
            .iter()
            .copied()
            .filter(|word| !self.drawn.contains(&word.id))
            .collect()
    }
}

fn distinct_by_id(pool: &[WordRecord]) -> Vec<&WordRecord> {
    let mut seen = HashSet::new();
    pool.iter().filter(|word| seen.insert(word.id)).collect()
}
