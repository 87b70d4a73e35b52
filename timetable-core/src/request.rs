//! Interpretation of inbound timetable requests.

use crate::course_codes::CourseCodes;
use crate::error::{RequestError, RequestResult};

/// A validated request for a filtered timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRequest {
    /// Timetable identifier, digits and uppercase ASCII letters only.
    pub identifier: String,
    pub course_codes: CourseCodes,
}

impl TimetableRequest {
    /// Interpret a decoded request path of the form `/<identifier>/<codes>`.
    ///
    /// The path must split on `/` into exactly three segments, so a trailing
    /// slash or a missing code list is rejected as malformed.
    pub fn from_path(path: &str) -> RequestResult<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        let [_, identifier, codes] = segments[..] else {
            return Err(RequestError::MalformedRequest);
        };

        if !is_valid_identifier(identifier) {
            return Err(RequestError::InvalidIdentifier);
        }

        Ok(TimetableRequest {
            identifier: identifier.to_string(),
            course_codes: CourseCodes::from_csv(codes),
        })
    }
}

fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}
