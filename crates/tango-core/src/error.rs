use tango_types::DrillMode;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No words found in the word list ({dropped} malformed lines dropped)")]
    Empty { dropped: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("Not enough words ({available}) to build a round of {required}")]
    NotEnoughWords { available: usize, required: usize },

    #[error("A round needs at least one word")]
    EmptyDeck,

    #[error("An attempt is already being scored")]
    AttemptPending,

    #[error("No round in progress")]
    NotInProgress,

    #[error("Mode {0} has no drill rounds")]
    UnsupportedMode(DrillMode),

    #[error("No face at position {0}")]
    NoSuchFace(usize),
}
