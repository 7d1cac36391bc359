use tango_core::Session;
use tango_core::matching::MatchRound;
use tango_core::round::{Progress, RoundController};
use tango_types::{AppEvent, DrillMode, FaceView, PromptView, WordView};

/// The round currently on screen
pub enum ActiveRound {
    None,
    Drill(RoundController),
    Match(MatchRound),
}

/// Engine state owned by the event loop
pub struct Practice {
    pub session: Session,
    pub mode: DrillMode,
    pub active: ActiveRound,
    /// Set after a miss until the front-end sends `ResumeAfterMiss`
    pub awaiting_resume: bool,
}

impl Practice {
    pub fn new(session: Session, mode: DrillMode) -> Self {
        Self {
            session,
            mode,
            active: ActiveRound::None,
            awaiting_resume: false,
        }
    }

    pub fn words_view(&self) -> Vec<WordView> {
        self.session
            .list_rows()
            .into_iter()
            .map(|row| WordView {
                word: row.word,
                usage: row.usage,
            })
            .collect()
    }
}

pub fn progress_event(progress: Progress) -> AppEvent {
    AppEvent::ShowProgress {
        done: progress.done,
        total: progress.total,
        label: progress.label.to_string(),
    }
}

pub fn prompt_view(round: &RoundController) -> Option<PromptView> {
    round.current_card().map(|card| PromptView {
        word_id: card.word_id,
        prompt: card.prompt.clone(),
        instruction: card.instruction.clone(),
        voice_url: card.voice_url.clone(),
    })
}

pub fn faces_view(round: &MatchRound) -> Vec<FaceView> {
    round
        .faces()
        .iter()
        .enumerate()
        .map(|(index, slot)| FaceView {
            number: index + 1,
            text: slot.face.text.clone(),
            cleared: slot.cleared,
            selected: slot.selected,
        })
        .collect()
}
