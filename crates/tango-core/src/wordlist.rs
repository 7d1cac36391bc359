use std::path::Path;

use tango_types::{WordFields, WordId, WordRecord};

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    pub words: Vec<WordRecord>,
    /// Malformed lines skipped while parsing
    pub dropped: usize,
}

impl WordList {
    pub fn ids(&self) -> impl Iterator<Item = WordId> + '_ {
        self.words.iter().map(|word| word.id)
    }
}

/// Rows are `id,english,japanese,voice_url` or the ten-column tense layout.
/// Rows with any other shape are dropped and counted.
pub fn parse_word_list(text: &str) -> Result<WordList, LoadError> {
    let mut words = Vec::new();
    let mut dropped = 0;

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(word) => words.push(word),
            None => {
                tracing::debug!("Dropping malformed word list line {}: {:?}", line_no + 1, line);
                dropped += 1;
            }
        }
    }

    if words.is_empty() {
        return Err(LoadError::Empty { dropped });
    }

    tracing::info!("Parsed {} words ({} lines dropped)", words.len(), dropped);
    Ok(WordList { words, dropped })
}

pub fn load_word_list(path: impl AsRef<Path>) -> Result<WordList, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound(path.display().to_string()),
        _ => LoadError::IoError(e),
    })?;

    parse_word_list(&text)
}

fn parse_line(line: &str) -> Option<WordRecord> {
    let parts: Vec<String> = line.split(',').map(|p| p.trim().to_string()).collect();
    let id: WordId = parts.first()?.parse().ok()?;

    let fields = match <[String; 4]>::try_from(parts) {
        Ok([_, english, japanese, voice_url]) => WordFields::Basic {
            english,
            japanese,
            voice_url,
        },
        Err(parts) => {
            let [
                _,
                japanese,
                present,
                present_voice,
                present_example,
                present_example_voice,
                past,
                past_voice,
                past_example,
                past_example_voice,
            ] = <[String; 10]>::try_from(parts).ok()?;
            WordFields::Tense {
                japanese,
                present,
                present_voice,
                present_example,
                present_example_voice,
                past,
                past_voice,
                past_example,
                past_example_voice,
            }
        }
    };

    Some(WordRecord::new(id, fields))
}
