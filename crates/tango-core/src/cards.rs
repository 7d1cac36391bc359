use tango_types::{DrillMode, WordFields, WordId, WordRecord};

/// Prompt/answer pair for the spoken or typed drills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub word_id: WordId,
    /// Text on the card
    pub prompt: String,
    /// What the learner is asked to do with it
    pub instruction: String,
    /// String the produced answer is graded against
    pub expected: String,
    pub voice_url: Option<String>,
}

impl Card {
    /// Build the card `mode` needs for `word`, or `None` if the word lacks the fields.
    ///
    /// `prefer_past` only matters for [`DrillMode::Example`] on tense lists.
    pub fn for_mode(word: &WordRecord, mode: DrillMode, prefer_past: bool) -> Option<Card> {
        match (mode, &word.fields) {
            (
                DrillMode::Speak,
                WordFields::Basic {
                    english,
                    japanese,
                    voice_url,
                },
            ) => {
                if english.is_empty() {
                    return None;
                }
                Some(Card {
                    word_id: word.id,
                    prompt: japanese.clone(),
                    instruction: format!("Say: \"{english}\""),
                    expected: english.clone(),
                    voice_url: non_empty(voice_url),
                })
            }
            (
                DrillMode::Speak,
                WordFields::Tense {
                    japanese,
                    present,
                    present_voice,
                    past,
                    ..
                },
            ) => {
                if present.is_empty() || past.is_empty() {
                    return None;
                }
                Some(Card {
                    word_id: word.id,
                    prompt: japanese.clone(),
                    instruction: format!("Say: \"{present}\" then \"{past}\""),
                    expected: format!("{present} {past}"),
                    voice_url: non_empty(present_voice),
                })
            }
            (
                DrillMode::Example,
                WordFields::Tense {
                    present_example,
                    present_example_voice,
                    past_example,
                    past_example_voice,
                    ..
                },
            ) => {
                let (sentence, voice) = if prefer_past && !past_example.is_empty() {
                    (past_example, past_example_voice)
                } else if !present_example.is_empty() {
                    (present_example, present_example_voice)
                } else if !past_example.is_empty() {
                    (past_example, past_example_voice)
                } else {
                    return None;
                };

                Some(Card {
                    word_id: word.id,
                    prompt: sentence.clone(),
                    instruction: "Read the sentence above.".to_string(),
                    expected: sentence.clone(),
                    voice_url: non_empty(voice),
                })
            }
            _ => None,
        }
    }
}

/// Whether `word` can take part in a round of `mode`
pub fn supports(word: &WordRecord, mode: DrillMode) -> bool {
    match mode {
        DrillMode::List | DrillMode::Match => true,
        DrillMode::Speak | DrillMode::Example => Card::for_mode(word, mode, false).is_some(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    English,
    Japanese,
    Present,
    Past,
}

/// One card of a matching round; all faces of a word share its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub word_id: WordId,
    pub kind: FaceKind,
    pub text: String,
    pub voice_url: Option<String>,
}

/// Faces a word contributes to a matching round
pub fn faces(word: &WordRecord) -> Vec<Face> {
    let face = |kind, text: &String, voice: Option<&String>| Face {
        word_id: word.id,
        kind,
        text: text.clone(),
        voice_url: voice.and_then(|v| non_empty(v)),
    };

    match &word.fields {
        WordFields::Basic {
            english,
            japanese,
            voice_url,
        } => vec![
            face(FaceKind::English, english, Some(voice_url)),
            face(FaceKind::Japanese, japanese, None),
        ],
        WordFields::Tense {
            japanese,
            present,
            present_voice,
            past,
            past_voice,
            ..
        } => vec![
            face(FaceKind::Japanese, japanese, None),
            face(FaceKind::Present, present, Some(present_voice)),
            face(FaceKind::Past, past, Some(past_voice)),
        ],
    }
}

/// Number of faces that form a complete match for `word`
pub fn match_arity(word: &WordRecord) -> usize {
    match word.fields {
        WordFields::Basic { .. } => 2,
        WordFields::Tense { .. } => 3,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
