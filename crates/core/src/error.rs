//! Error types for the paperscope domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all paperscope operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Paper source errors ---
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // --- Model gateway errors ---
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Stage cache errors ---
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    // --- Response extraction errors ---
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// The paper feed could not be reached or produced no usable data.
///
/// Fatal for the current run; nothing is cached, safe to retry later.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Feed for {category} could not be parsed: {reason}")]
    Feed { category: String, reason: String },

    #[error("No category could be fetched: {0}")]
    Unavailable(String),
}

/// The text-generation service failed outright.
///
/// Fatal for the current run; prior completed stages remain cached and valid.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by gateway, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway returned an empty completion")]
    EmptyResponse,

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Storage error at {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("Stage {stage} for {date} is already being computed by another run")]
    Busy { date: String, stage: String },

    #[error("Stage {stage} for {date} is already cached; delete the entry to regenerate")]
    AlreadyWritten { date: String, stage: String },
}

/// The gateway responded, but its output could not be turned into the
/// expected structure. The raw text is preserved by the caller for diagnosis;
/// no cache entry is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("No JSON object found in response")]
    NoObject,

    #[error("Response JSON could not be parsed: {0}")]
    Parse(String),

    #[error("Response references unknown paper id: {0}")]
    UnknownId(String),

    #[error("Paper id {0} appears in more than one tier")]
    OverlappingTiers(String),

    #[error("Paper id {0} is listed more than once in the same tier")]
    DuplicateId(String),
}
