use tango_config::round::RoundConfig;
use tango_types::{DrillMode, UsageEntry, WordRecord};

use crate::error::{RoundError, StoreError};
use crate::ledger::UsageLedger;
use crate::matching::MatchRound;
use crate::round::RoundController;
use crate::sampler::WeightedSampler;
use crate::wordlist::WordList;

/// One row of the full word list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub word: WordRecord,
    pub usage: UsageEntry,
}

/// Everything a practice session mutates: the loaded pool, the ledger and the sampler.
///
/// Owned by a single event loop; rounds borrow from it only while they are started
/// or graded.
pub struct Session {
    config: RoundConfig,
    words: Vec<WordRecord>,
    ledger: UsageLedger,
    sampler: WeightedSampler,
}

impl Session {
    pub fn new(config: RoundConfig, ledger: UsageLedger, sampler: WeightedSampler) -> Self {
        Self {
            config,
            words: Vec::new(),
            ledger,
            sampler,
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut UsageLedger {
        &mut self.ledger
    }

    /// Swap in a freshly loaded list. Rounds already started keep their own deck.
    pub fn replace_pool(&mut self, list: WordList) -> usize {
        let added = self.ledger.ensure_initialized(list.ids());
        tracing::info!(
            "Loaded {} words ({} new to the ledger)",
            list.words.len(),
            added
        );
        self.words = list.words;
        added
    }

    pub fn list_rows(&self) -> Vec<ListRow> {
        self.words
            .iter()
            .map(|word| ListRow {
                word: word.clone(),
                usage: self.ledger.get(word.id),
            })
            .collect()
    }

    pub fn start_drill(&mut self, mode: DrillMode) -> Result<RoundController, RoundError> {
        let mut round = RoundController::new(mode, &self.config);
        round.start(&self.words, &self.ledger, &mut self.sampler)?;
        Ok(round)
    }

    pub fn start_match(&mut self) -> Result<MatchRound, RoundError> {
        let mut round = MatchRound::new(&self.config);
        round.start(&self.words, &self.ledger, &mut self.sampler)?;
        Ok(round)
    }

    pub fn reset_usage(&mut self) -> Result<(), StoreError> {
        self.ledger.reset()
    }
}
