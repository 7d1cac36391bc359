use std::fmt;

use rand::Rng;
use tango_config::round::RoundConfig;
use tango_types::{AttemptResult, DrillMode, WordId, WordRecord};

use crate::cards::{self, Card};
use crate::error::RoundError;
use crate::ledger::{LedgerUpdate, UsageLedger};
use crate::sampler::WeightedSampler;
use crate::scoring::score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    InProgress,
    RoundComplete,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card: Card,
    pub resolved: bool,
}

/// Progress counter for the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub label: &'static str,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}/{}", self.label, self.done, self.total)
    }
}

#[derive(Debug)]
pub struct AttemptOutcome {
    pub word_id: WordId,
    pub result: AttemptResult,
    pub accepted: bool,
    pub round_complete: bool,
    pub ledger: LedgerUpdate,
}

/// Round controller for the spoken/typed drills
///
/// ```text
/// Idle -> InProgress -> RoundComplete
///   \-> Aborted (not enough words; start may be retried)
/// ```
pub struct RoundController {
    mode: DrillMode,
    deck_size: usize,
    threshold: f64,
    phase: RoundPhase,
    deck: Vec<DeckEntry>,
    cursor: usize,
    completed: usize,
    attempt_pending: bool,
}

impl RoundController {
    pub fn new(mode: DrillMode, config: &RoundConfig) -> Self {
        Self {
            mode,
            deck_size: config.deck_size,
            threshold: config.match_threshold,
            phase: RoundPhase::Idle,
            deck: Vec::new(),
            cursor: 0,
            completed: 0,
            attempt_pending: false,
        }
    }

    /// Draw a fresh deck. On a shortfall no deck is built and the phase becomes `Aborted`.
    pub fn start<R: Rng>(
        &mut self,
        pool: &[WordRecord],
        ledger: &UsageLedger,
        sampler: &mut WeightedSampler<R>,
    ) -> Result<(), RoundError> {
        if matches!(self.mode, DrillMode::List | DrillMode::Match) {
            return Err(RoundError::UnsupportedMode(self.mode));
        }
        if self.deck_size == 0 {
            self.deck.clear();
            self.phase = RoundPhase::Aborted;
            return Err(RoundError::EmptyDeck);
        }

        let eligible: Vec<WordRecord> = pool
            .iter()
            .filter(|word| cards::supports(word, self.mode))
            .cloned()
            .collect();

        sampler.reset_round();
        let words = sampler.select(&eligible, ledger, self.deck_size);

        let mode = self.mode;
        let deck: Vec<DeckEntry> = words
            .iter()
            .filter_map(|word| {
                let prefer_past = mode == DrillMode::Example && sampler.rng_mut().gen_bool(0.5);
                Card::for_mode(word, mode, prefer_past)
            })
            .map(|card| DeckEntry {
                card,
                resolved: false,
            })
            .collect();

        self.cursor = 0;
        self.completed = 0;
        self.attempt_pending = false;

        if deck.len() < self.deck_size {
            tracing::warn!(
                "Cannot start {} round: {} eligible words, {} required",
                self.mode,
                deck.len(),
                self.deck_size
            );
            self.deck.clear();
            self.phase = RoundPhase::Aborted;
            return Err(RoundError::NotEnoughWords {
                available: deck.len(),
                required: self.deck_size,
            });
        }

        tracing::info!("Started {} round with {} words", self.mode, deck.len());
        self.deck = deck;
        self.phase = RoundPhase::InProgress;
        Ok(())
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn deck(&self) -> &[DeckEntry] {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn attempt_pending(&self) -> bool {
        self.attempt_pending
    }

    /// Card awaiting an answer, if a round is running
    pub fn current_card(&self) -> Option<&Card> {
        if self.phase != RoundPhase::InProgress {
            return None;
        }
        self.deck.get(self.cursor).map(|entry| &entry.card)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            done: self.completed,
            total: self.deck.len(),
            label: self.mode.progress_label(),
        }
    }

    /// Mark an attempt as in flight, e.g. while a recogniser is listening
    pub fn begin_attempt(&mut self) -> Result<(), RoundError> {
        if self.phase != RoundPhase::InProgress {
            return Err(RoundError::NotInProgress);
        }
        if self.attempt_pending {
            return Err(RoundError::AttemptPending);
        }

        self.attempt_pending = true;
        Ok(())
    }

    /// Discard the in-flight attempt. Returns whether one was pending.
    pub fn cancel_attempt(&mut self) -> bool {
        std::mem::replace(&mut self.attempt_pending, false)
    }

    /// Grade `produced` against the current card and record the result.
    ///
    /// A miss keeps the cursor where it is so the same word is retried.
    pub fn submit_attempt(
        &mut self,
        produced: &str,
        ledger: &mut UsageLedger,
    ) -> Result<AttemptOutcome, RoundError> {
        if self.phase != RoundPhase::InProgress {
            return Err(RoundError::NotInProgress);
        }
        self.attempt_pending = false;

        let entry = self
            .deck
            .get_mut(self.cursor)
            .ok_or(RoundError::NotInProgress)?;
        let word_id = entry.card.word_id;
        let result = score(&entry.card.expected, produced);
        let accepted = result.passes(self.threshold);

        let update = if accepted {
            entry.resolved = true;
            self.completed += 1;
            ledger.record_correct(word_id)
        } else {
            ledger.record_incorrect(word_id)
        };

        tracing::info!(
            word_id,
            accuracy = result.accuracy,
            accepted,
            "Attempt graded ({})",
            self.progress()
        );

        if accepted {
            if self.completed == self.deck.len() {
                tracing::info!("{} round complete", self.mode);
                self.phase = RoundPhase::RoundComplete;
            } else if let Some(next) = self.deck.iter().position(|entry| !entry.resolved) {
                self.cursor = next;
            }
        }

        Ok(AttemptOutcome {
            word_id,
            result,
            accepted,
            round_complete: self.phase == RoundPhase::RoundComplete,
            ledger: update,
        })
    }
}
