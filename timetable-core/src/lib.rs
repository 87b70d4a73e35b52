//! Core logic for filtering iCalendar timetables by course.
//!
//! This crate is transport-free and is shared by the HTTP service:
//! - `request` turns an inbound path into an identifier and course codes
//! - `transform` is the streaming event filter that rewrites and drops events
//! - `lines` splits a chunked network body into text lines

pub mod course_codes;
pub mod error;
pub mod lines;
pub mod request;
pub mod transform;

pub use course_codes::CourseCodes;
pub use error::{RequestError, RequestResult};
pub use lines::LineSplitter;
pub use request::TimetableRequest;
pub use transform::{CalendarFilter, FilterState, Transform, filter_reader, transform};
