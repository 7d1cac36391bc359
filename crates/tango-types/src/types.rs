use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable word identifier, the join key between the word list and the usage ledger
pub type WordId = u32;

/// One row of a loaded word list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: WordId,
    pub fields: WordFields,
}

/// Column layout of a word list row, keyed by the number of columns in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum WordFields {
    /// `id,english,japanese,voice_url`
    Basic {
        english: String,
        japanese: String,
        voice_url: String,
    },
    /// `id,japanese,present,present_voice,present_example,present_example_voice,past,past_voice,past_example,past_example_voice`
    Tense {
        japanese: String,
        present: String,
        present_voice: String,
        present_example: String,
        present_example_voice: String,
        past: String,
        past_voice: String,
        past_example: String,
        past_example_voice: String,
    },
}

impl WordRecord {
    pub fn new(id: WordId, fields: WordFields) -> Self {
        Self { id, fields }
    }

    /// Native-language prompt, present in both layouts
    pub fn japanese(&self) -> &str {
        match &self.fields {
            WordFields::Basic { japanese, .. } | WordFields::Tense { japanese, .. } => japanese,
        }
    }

    /// Text columns shown in the word list view, voice and example columns left out
    pub fn display_fields(&self) -> Vec<&str> {
        match &self.fields {
            WordFields::Basic {
                english, japanese, ..
            } => vec![english, japanese],
            WordFields::Tense {
                japanese,
                present,
                past,
                ..
            } => vec![japanese, present, past],
        }
    }

    /// Number of columns the row had in the source file
    pub fn column_count(&self) -> usize {
        match self.fields {
            WordFields::Basic { .. } => 4,
            WordFields::Tense { .. } => 10,
        }
    }
}

/// Per-word practice history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    /// Number of correct resolutions
    pub used_count: u32,
    /// Rises on mistakes, falls on success, never below zero
    pub difficulty: u32,
}

impl UsageEntry {
    /// Sampling weight: favours difficult and rarely practised words
    pub fn weight(&self) -> f64 {
        let weight = (1.0 / (self.used_count as f64 + 1.0)) * (self.difficulty as f64 + 1.0);
        weight.max(MIN_WEIGHT)
    }
}

/// Floor for [`UsageEntry::weight`] so every word keeps a chance to be drawn
pub const MIN_WEIGHT: f64 = 0.1;

/// Graded comparison of an expected answer with what the learner produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Percentage in `0..=100`
    pub accuracy: u8,
    /// Expected tokens that never appeared in the produced text, in expected order
    pub missed_tokens: Vec<String>,
}

impl AttemptResult {
    pub fn fraction(&self) -> f64 {
        f64::from(self.accuracy) / 100.0
    }

    pub fn passes(&self, threshold: f64) -> bool {
        self.fraction() >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillMode {
    /// Browse the full list with usage statistics
    List,
    /// Match faces of the same word
    Match,
    /// Say (or type) the answer for a prompt
    Speak,
    /// Read an example sentence aloud
    Example,
}

impl DrillMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "list" => Some(DrillMode::List),
            "match" => Some(DrillMode::Match),
            "speak" => Some(DrillMode::Speak),
            "example" => Some(DrillMode::Example),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrillMode::List => "list",
            DrillMode::Match => "match",
            DrillMode::Speak => "speak",
            DrillMode::Example => "example",
        }
    }

    /// Label shown next to the progress counter
    pub fn progress_label(&self) -> &'static str {
        match self {
            DrillMode::Match => "Matched",
            _ => "Correct",
        }
    }
}

impl fmt::Display for DrillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A line of learner input: an answer, face numbers, or a command
    TextInput { text: String, source: TextSource },
    StartRound,
    /// Drop the in-flight attempt without grading it
    CancelAttempt,
    /// The post-miss pause has elapsed
    ResumeAfterMiss,
    Shutdown,

    // Engine -> front-end
    ShowPrompt(PromptView),
    ShowFeedback(FeedbackView),
    ShowFaces(Vec<FaceView>),
    /// Two faces of different words were picked; input is locked until resumed
    ShowMismatch,
    ShowProgress { done: usize, total: usize, label: String },
    ShowWords(Vec<WordView>),
    RoundFinished { mode: DrillMode },
    Notice { level: NoticeLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Keyboard,
    /// Transcript from an external speech recogniser
    Speech,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub word_id: WordId,
    pub prompt: String,
    pub instruction: String,
    pub voice_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub word_id: WordId,
    pub result: AttemptResult,
    pub accepted: bool,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceView {
    /// 1-based number the learner types to pick this face
    pub number: usize,
    pub text: String,
    pub cleared: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordView {
    pub word: WordRecord,
    pub usage: UsageEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}
