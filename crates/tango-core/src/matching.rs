use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tango_config::round::RoundConfig;
use tango_types::{DrillMode, WordId, WordRecord};

use crate::cards::{self, Face};
use crate::error::RoundError;
use crate::ledger::{LedgerUpdate, UsageLedger};
use crate::round::{Progress, RoundPhase};
use crate::sampler::WeightedSampler;

#[derive(Debug, Clone)]
pub struct FaceSlot {
    pub face: Face,
    pub cleared: bool,
    pub selected: bool,
}

#[derive(Debug)]
pub enum SelectOutcome {
    /// Cleared or already selected face, or input locked after a mismatch
    Ignored,
    /// Face added to the current group
    Selected,
    Matched {
        word_id: WordId,
        round_complete: bool,
        ledger: LedgerUpdate,
    },
    /// Group was wrong; every selected face's word was penalised once per face
    Mismatched { ledger: Vec<LedgerUpdate> },
}

/// Matching round: pick every face of one word to clear it
pub struct MatchRound {
    deck_size: usize,
    phase: RoundPhase,
    words: Vec<WordRecord>,
    faces: Vec<FaceSlot>,
    selection: Vec<usize>,
    completed: usize,
    awaiting_reset: bool,
}

impl MatchRound {
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            deck_size: config.deck_size,
            phase: RoundPhase::Idle,
            words: Vec::new(),
            faces: Vec::new(),
            selection: Vec::new(),
            completed: 0,
            awaiting_reset: false,
        }
    }

    pub fn start<R: Rng>(
        &mut self,
        pool: &[WordRecord],
        ledger: &UsageLedger,
        sampler: &mut WeightedSampler<R>,
    ) -> Result<(), RoundError> {
        if self.deck_size == 0 {
            self.words.clear();
            self.faces.clear();
            self.phase = RoundPhase::Aborted;
            return Err(RoundError::EmptyDeck);
        }

        sampler.reset_round();
        let words = sampler.select(pool, ledger, self.deck_size);

        self.selection.clear();
        self.completed = 0;
        self.awaiting_reset = false;

        if words.len() < self.deck_size {
            tracing::warn!(
                "Cannot start match round: {} words, {} required",
                words.len(),
                self.deck_size
            );
            self.words.clear();
            self.faces.clear();
            self.phase = RoundPhase::Aborted;
            return Err(RoundError::NotEnoughWords {
                available: words.len(),
                required: self.deck_size,
            });
        }

        let mut faces: Vec<FaceSlot> = words
            .iter()
            .flat_map(cards::faces)
            .map(|face| FaceSlot {
                face,
                cleared: false,
                selected: false,
            })
            .collect();
        faces.shuffle(sampler.rng_mut());

        tracing::info!(
            "Started match round with {} words ({} faces)",
            words.len(),
            faces.len()
        );
        self.words = words;
        self.faces = faces;
        self.phase = RoundPhase::InProgress;
        Ok(())
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn faces(&self) -> &[FaceSlot] {
        &self.faces
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// True while a wrong group is still shown and input is locked
    pub fn awaiting_reset(&self) -> bool {
        self.awaiting_reset
    }

    pub fn progress(&self) -> Progress {
        Progress {
            done: self.completed,
            total: self.words.len(),
            label: DrillMode::Match.progress_label(),
        }
    }

    /// Pick the face at `index`; a full group is graded immediately
    pub fn select(
        &mut self,
        index: usize,
        ledger: &mut UsageLedger,
    ) -> Result<SelectOutcome, RoundError> {
        if self.phase != RoundPhase::InProgress {
            return Err(RoundError::NotInProgress);
        }

        let slot = self
            .faces
            .get_mut(index)
            .ok_or(RoundError::NoSuchFace(index))?;
        if self.awaiting_reset || slot.cleared || slot.selected {
            return Ok(SelectOutcome::Ignored);
        }

        slot.selected = true;
        self.selection.push(index);

        if self.selection.len() < self.group_arity() {
            return Ok(SelectOutcome::Selected);
        }

        Ok(self.grade_selection(ledger))
    }

    /// Unlock input after a mismatch (the UI waits `match_delay_ms` first)
    pub fn clear_mismatch(&mut self) {
        for &index in &self.selection {
            self.faces[index].selected = false;
        }
        self.selection.clear();
        self.awaiting_reset = false;
    }

    /// Group size is set by the word of the first picked face
    fn group_arity(&self) -> usize {
        self.selection
            .first()
            .and_then(|&index| {
                let id = self.faces[index].face.word_id;
                self.words.iter().find(|word| word.id == id)
            })
            .map(cards::match_arity)
            .unwrap_or(2)
    }

    fn grade_selection(&mut self, ledger: &mut UsageLedger) -> SelectOutcome {
        let picked: Vec<&Face> = self
            .selection
            .iter()
            .map(|&index| &self.faces[index].face)
            .collect();

        let ids: HashSet<WordId> = picked.iter().map(|face| face.word_id).collect();
        let kinds: HashSet<_> = picked.iter().map(|face| face.kind).collect();

        if ids.len() == 1 && kinds.len() == picked.len() {
            let word_id = picked[0].word_id;

            for &index in &self.selection {
                let slot = &mut self.faces[index];
                slot.selected = false;
                slot.cleared = true;
            }
            self.selection.clear();
            self.completed += 1;

            let update = ledger.record_correct(word_id);
            if self.completed == self.words.len() {
                tracing::info!("Match round complete");
                self.phase = RoundPhase::RoundComplete;
            }

            SelectOutcome::Matched {
                word_id,
                round_complete: self.phase == RoundPhase::RoundComplete,
                ledger: update,
            }
        } else {
            let penalised: Vec<WordId> = picked.iter().map(|face| face.word_id).collect();
            tracing::debug!("Mismatch between words {:?}", penalised);

            self.awaiting_reset = true;
            let updates = penalised
                .into_iter()
                .map(|id| ledger.record_incorrect(id))
                .collect();

            SelectOutcome::Mismatched { ledger: updates }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::fixtures::{basic, tense};
    use crate::store::MemoryStore;

    fn config(deck_size: usize) -> RoundConfig {
        RoundConfig {
            deck_size,
            ..RoundConfig::default()
        }
    }

    fn positions_of(round: &MatchRound, id: WordId) -> Vec<usize> {
        round
            .faces()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.face.word_id == id)
            .map(|(index, _)| index)
            .collect()
    }

    fn started(pool: &[WordRecord], deck_size: usize) -> (MatchRound, UsageLedger) {
        let ledger = UsageLedger::open(MemoryStore::new());
        let mut sampler = WeightedSampler::seeded(4);
        let mut round = MatchRound::new(&config(deck_size));
        round.start(pool, &ledger, &mut sampler).unwrap();
        (round, ledger)
    }

    #[test]
    fn test_pairs_clear_and_complete() {
        let pool: Vec<_> = (1..=3).map(|id| basic(id, "en", "ja")).collect();
        let (mut round, mut ledger) = started(&pool, 3);
        assert_eq!(round.faces().len(), 6);

        for id in 1..=3 {
            let positions = positions_of(&round, id);
            assert!(matches!(
                round.select(positions[0], &mut ledger).unwrap(),
                SelectOutcome::Selected
            ));
            match round.select(positions[1], &mut ledger).unwrap() {
                SelectOutcome::Matched {
                    word_id,
                    round_complete,
                    ..
                } => {
                    assert_eq!(word_id, id);
                    assert_eq!(round_complete, id == 3);
                }
                other => panic!("expected match, got {other:?}"),
            }
            assert_eq!(ledger.get(id).used_count, 1);
        }

        assert_eq!(round.phase(), RoundPhase::RoundComplete);
        assert!(round.faces().iter().all(|slot| slot.cleared));
    }

    #[test]
    fn test_mismatch_penalises_each_face_and_locks_input() {
        let pool: Vec<_> = (1..=2).map(|id| basic(id, "en", "ja")).collect();
        let (mut round, mut ledger) = started(&pool, 2);

        let first = positions_of(&round, 1)[0];
        let second = positions_of(&round, 2)[0];
        round.select(first, &mut ledger).unwrap();
        assert!(matches!(
            round.select(second, &mut ledger).unwrap(),
            SelectOutcome::Mismatched { .. }
        ));
        assert_eq!(ledger.get(1).difficulty, 1);
        assert_eq!(ledger.get(2).difficulty, 1);

        let other = positions_of(&round, 1)[1];
        assert!(matches!(
            round.select(other, &mut ledger).unwrap(),
            SelectOutcome::Ignored
        ));

        round.clear_mismatch();
        assert!(!round.awaiting_reset());
        assert!(round.faces().iter().all(|slot| !slot.selected));
        assert!(matches!(
            round.select(other, &mut ledger).unwrap(),
            SelectOutcome::Selected
        ));
    }

    #[test]
    fn test_three_face_groups_for_tense_lists() {
        let pool: Vec<_> = (1..=2)
            .map(|id| tense(id, "go", "went", ("", "")))
            .collect();
        let (mut round, mut ledger) = started(&pool, 2);
        assert_eq!(round.faces().len(), 6);

        let positions = positions_of(&round, 2);
        round.select(positions[0], &mut ledger).unwrap();
        assert!(matches!(
            round.select(positions[1], &mut ledger).unwrap(),
            SelectOutcome::Selected
        ));
        assert!(matches!(
            round.select(positions[2], &mut ledger).unwrap(),
            SelectOutcome::Matched { word_id: 2, .. }
        ));
        assert_eq!(round.progress().to_string(), "Matched: 1/2");
    }

    #[test]
    fn test_reselecting_same_face_is_ignored() {
        let pool: Vec<_> = (1..=2).map(|id| basic(id, "en", "ja")).collect();
        let (mut round, mut ledger) = started(&pool, 2);

        round.select(0, &mut ledger).unwrap();
        assert!(matches!(
            round.select(0, &mut ledger).unwrap(),
            SelectOutcome::Ignored
        ));
        assert_eq!(round.select(99, &mut ledger).unwrap_err(), RoundError::NoSuchFace(99));
    }

    #[test]
    fn test_short_pool_aborts() {
        let ledger = UsageLedger::open(MemoryStore::new());
        let mut sampler = WeightedSampler::seeded(4);
        let mut round = MatchRound::new(&config(10));
        let pool: Vec<_> = (1..=4).map(|id| basic(id, "en", "ja")).collect();

        assert_eq!(
            round.start(&pool, &ledger, &mut sampler),
            Err(RoundError::NotEnoughWords {
                available: 4,
                required: 10
            })
        );
        assert_eq!(round.phase(), RoundPhase::Aborted);
        assert!(round.faces().is_empty());
    }

    #[test]
    fn test_zero_deck_size_aborts() {
        let mut ledger = UsageLedger::open(MemoryStore::new());
        let mut sampler = WeightedSampler::seeded(4);
        let mut round = MatchRound::new(&config(0));
        let pool: Vec<_> = (1..=3).map(|id| basic(id, "en", "ja")).collect();

        assert_eq!(
            round.start(&pool, &ledger, &mut sampler),
            Err(RoundError::EmptyDeck)
        );
        assert_eq!(round.phase(), RoundPhase::Aborted);
        assert_eq!(round.select(0, &mut ledger).unwrap_err(), RoundError::NotInProgress);
    }
}
