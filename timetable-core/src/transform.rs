//! Streaming course filter over iCalendar lines.
//!
//! The filter consumes a calendar one physical line at a time and only ever
//! holds the event currently being read. Whether an event is kept is decided
//! by its `SUMMARY`, which arrives after earlier lines of the same event, so
//! event lines are buffered until `END:VEVENT` and then flushed or dropped as
//! a unit. Lines outside any event pass straight through.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::mem;
use std::sync::LazyLock;

use regex::Regex;

use crate::course_codes::CourseCodes;
use crate::lines;

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";
const DESCRIPTION: &str = "DESCRIPTION:";
const LOCATION: &str = "LOCATION:";
const SUMMARY: &str = "SUMMARY:";

/// Escaped semicolon in a text value; everything after it in a summary is noise.
const ESCAPED_SEMICOLON: &str = "\\;";

/// Building codes expanded in `LOCATION` values.
const BUILDING_ABBREVIATION: (&str, &str) = ("HXLY", "Huxley");

static COURSE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^SUMMARY:([a-zA-Z]{2}(?:[0-9]{3}|-[a-zA-Z+]))")
        .expect("course code pattern is valid")
});

static SESSION_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"; (Lecture|Tutorial)$").expect("session pattern is valid"));

/// Where the filter is relative to the event structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterState {
    /// Outside any event.
    #[default]
    Idle,
    /// Inside an event that has not been excluded yet.
    Buffering,
    /// Inside an event whose course is not wanted.
    Ignoring,
}

/// Line-by-line filter for a single calendar document.
///
/// Each request gets its own filter; nothing is shared between instances
/// apart from the compiled patterns.
#[derive(Debug)]
pub struct CalendarFilter {
    course_codes: CourseCodes,
    state: FilterState,
    event: String,
    keep_continuation: bool,
}

impl CalendarFilter {
    pub fn new(course_codes: CourseCodes) -> Self {
        CalendarFilter {
            course_codes,
            state: FilterState::Idle,
            event: String::new(),
            keep_continuation: true,
        }
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Feed one input line, without its terminator.
    ///
    /// Returns the output produced by this line: either a single line passed
    /// through from outside an event, or a whole event flushed by its
    /// `END:VEVENT`. Every returned line ends in `\n`.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line == BEGIN_EVENT {
            self.state = FilterState::Buffering;
            self.event.clear();
            self.keep_continuation = true;
        }

        if line.starts_with(' ') {
            self.push_continuation(line);
            return None;
        }

        if self.state == FilterState::Ignoring {
            if line == END_EVENT {
                self.state = FilterState::Idle;
            }
            return None;
        }

        if line.starts_with(DESCRIPTION) {
            self.keep_continuation = false;
            return None;
        }

        let (line, truncated) = rewrite(line);
        self.keep_continuation = !truncated;

        if self.state == FilterState::Buffering {
            if line == END_EVENT {
                self.append(&line);
                self.state = FilterState::Idle;
                return Some(mem::take(&mut self.event));
            }

            if let Some(code) = course_code(&line) {
                if !self.course_codes.contains(code) {
                    tracing::trace!(code, "dropping event for unwanted course");
                    self.state = FilterState::Ignoring;
                    self.event.clear();
                    return None;
                }
            }

            self.append(&line);
            return None;
        }

        Some(format!("{line}\n"))
    }

    /// End of input. Returns true if an unterminated event was dropped.
    pub fn finish(self) -> bool {
        let dropped = self.state != FilterState::Idle;
        if dropped {
            tracing::debug!("input ended inside an event, dropping it");
        }
        dropped
    }

    // Folded lines follow the property they continue; outside events they
    // are never emitted on their own.
    fn push_continuation(&mut self, line: &str) {
        if self.state == FilterState::Buffering && self.keep_continuation {
            self.append(line);
        }
    }

    fn append(&mut self, line: &str) {
        self.event.push_str(line);
        self.event.push('\n');
    }
}

/// Apply the readability rewrites to a property line.
///
/// The flag is true when a summary was cut at an escaped semicolon.
fn rewrite(line: &str) -> (Cow<'_, str>, bool) {
    if line.starts_with(LOCATION) {
        let (short, long) = BUILDING_ABBREVIATION;
        return (Cow::Owned(line.replacen(short, long, 1)), false);
    }

    if !line.starts_with(SUMMARY) {
        return (Cow::Borrowed(line), false);
    }

    let session = SESSION_TYPE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    let (mut summary, truncated) = match line.find(ESCAPED_SEMICOLON) {
        Some(index) => (line[..index].to_string(), true),
        None => (line.to_string(), false),
    };

    if let Some(session) = session {
        summary.push_str(" - ");
        summary.push_str(session);
    }

    (Cow::Owned(summary), truncated)
}

/// Course code named at the start of a `SUMMARY` line, e.g. `CS101`.
fn course_code(line: &str) -> Option<&str> {
    COURSE_CODE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Lazy sequence of output chunks produced from a sequence of input lines.
pub struct Transform<I> {
    filter: CalendarFilter,
    lines: I,
}

impl<I> Iterator for Transform<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let line = self.lines.next()?;
            if let Some(chunk) = self.filter.push_line(line.as_ref()) {
                return Some(chunk);
            }
        }
    }
}

/// Filter `lines`, yielding output chunks as soon as they are decided.
pub fn transform<I>(course_codes: CourseCodes, lines: I) -> Transform<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Transform {
        filter: CalendarFilter::new(course_codes),
        lines: lines.into_iter(),
    }
}

/// Filter a calendar read from `reader`, writing the result to `writer`.
///
/// Only IO errors from the reader or writer are returned; the filter itself
/// accepts any input.
pub fn filter_reader<R: BufRead, W: Write>(
    course_codes: CourseCodes,
    mut reader: R,
    mut writer: W,
) -> io::Result<()> {
    let mut filter = CalendarFilter::new(course_codes);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        if let Some(chunk) = filter.push_line(&lines::decode(bytes)) {
            writer.write_all(chunk.as_bytes())?;
        }
    }

    filter.finish();
    writer.flush()
}
