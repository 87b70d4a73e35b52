//! Error types for interpreting timetable requests.

use thiserror::Error;

/// Errors that reject an inbound request before any fetching happens.
///
/// The display text is what the caller sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Pass in ID and course codes")]
    MalformedRequest,

    #[error("Invalid ID")]
    InvalidIdentifier,
}

/// Result type alias for request interpretation.
pub type RequestResult<T> = Result<T, RequestError>;
