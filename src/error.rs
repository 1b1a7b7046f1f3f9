use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoodError {
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    #[error("Mood index {index} out of range (catalog has {len} moods)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Embed failed to load: {0}")]
    EmbedLoad(String),

    #[error("Capability probe failed: {0}")]
    CapabilityProbe(String),

    #[error("Command dispatch failed: {0}")]
    MessageDispatch(String),

    #[error("Invalid mood catalog: {0}")]
    InvalidCatalog(String),
}

pub type Result<T> = std::result::Result<T, MoodError>;
