//! Error types for the inkcal core.

use thiserror::Error;

/// Errors that can occur while fetching, expanding or laying out events.
#[derive(Error, Debug)]
pub enum InkCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Calendar parse error: {0}")]
    Parse(String),

    /// A single source could not be fetched or parsed. The caller decides
    /// whether to skip the source or fail the run.
    #[error("Source '{source_id}' unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// Every requested source failed.
    #[error("No sources could be loaded")]
    EmptyResult,

    #[error("Invalid time window: end {end} is not after start {start}")]
    InvalidWindow {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    #[error("RRULE error for event '{event_id}': {reason}")]
    Rrule { event_id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for inkcal operations.
pub type InkCalResult<T> = Result<T, InkCalError>;
