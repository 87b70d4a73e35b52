//! Incremental line splitting for chunked network bodies.

/// Splits a byte stream that arrives in arbitrary chunks into text lines.
///
/// Lines may end in `\n` or `\r\n`; the terminator is not part of the
/// returned line. Bytes that are not valid UTF-8 are replaced rather than
/// rejected.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
    consumed: usize,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of the body.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.consumed > 0 {
            self.pending.drain(..self.consumed);
            self.consumed = 0;
        }
        self.pending.extend_from_slice(chunk);
    }

    /// Take the next complete line, if one has been fully received.
    pub fn next_line(&mut self) -> Option<String> {
        let rest = &self.pending[self.consumed..];
        let end = rest.iter().position(|&b| b == b'\n')?;
        let line = decode(&rest[..end]);
        self.consumed += end + 1;
        Some(line)
    }

    /// Finish the body, returning a final line that had no terminator.
    pub fn finish(mut self) -> Option<String> {
        let rest = &self.pending[self.consumed..];
        if rest.is_empty() {
            return None;
        }
        let line = decode(rest);
        self.pending.clear();
        Some(line)
    }
}

pub(crate) fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
