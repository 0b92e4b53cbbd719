//! [`Framer`] – newline-delimited JSON framing for the control stream.
//!
//! The controller writes one [`ControlEvent`] per line at a fixed rate, so a
//! single read can hold several records, or end halfway through one.  Per
//! chunk the framer:
//!
//! - splits the carried-over bytes plus the new chunk on `\n`, trimming
//!   surrounding whitespace (so `\r\n` works) and skipping empty lines;
//! - treats a line that starts with `{` and ends with `}` as a complete
//!   record, and decodes only the most recent one (older records in the same
//!   chunk are stale and dropped without decoding);
//! - keeps an unterminated trailing line that has a `{` but no `}` for the
//!   next chunk.
//!
//! A chunk without any complete record yields `None`.  Decoding the selected
//! record is strict: an unknown or missing field is a protocol error.

use teleop_types::{ControlEvent, TeleopError};

/// Largest partial record kept between chunks.
pub const MAX_CARRY_BYTES: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct Framer {
    carry: Vec<u8>,
}

impl Framer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently held back as a partial record.
    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }

    /// Feed one chunk as read from the socket.
    ///
    /// # Errors
    ///
    /// [`TeleopError::Protocol`] when the input is not UTF-8, when the
    /// selected record does not decode, or when the partial record outgrows
    /// [`MAX_CARRY_BYTES`].
    pub fn push(&mut self, chunk: &[u8]) -> Result<Option<ControlEvent>, TeleopError> {
        let mut data = std::mem::take(&mut self.carry);
        data.extend_from_slice(chunk);

        // A multi-byte character cut by the read boundary completes later.
        let valid = match std::str::from_utf8(&data) {
            Ok(_) => data.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(TeleopError::Protocol(format!("non UTF-8 input: {e}"))),
        };
        let (text, cut) = data.split_at(valid);
        let text = std::str::from_utf8(text)
            .map_err(|e| TeleopError::Protocol(format!("non UTF-8 input: {e}")))?;

        let mut lines: Vec<&str> = text.split('\n').collect();
        let tail = lines.pop().unwrap_or_default();

        let latest = lines
            .iter()
            .copied()
            .chain(std::iter::once(tail))
            .map(str::trim)
            .filter(|line| is_record(line))
            .next_back();

        let tail = tail.trim_start();
        if !is_record(tail.trim_end()) && tail.contains('{') && !tail.contains('}') {
            let mut carry = tail.as_bytes().to_vec();
            carry.extend_from_slice(cut);
            if carry.len() > MAX_CARRY_BYTES {
                return Err(TeleopError::Protocol(format!(
                    "partial record exceeds {MAX_CARRY_BYTES} bytes"
                )));
            }
            self.carry = carry;
        }

        latest.map(decode).transpose()
    }
}

fn is_record(line: &str) -> bool {
    line.starts_with('{') && line.ends_with('}')
}

fn decode(record: &str) -> Result<ControlEvent, TeleopError> {
    serde_json::from_str(record)
        .map_err(|e| TeleopError::Protocol(format!("undecodable record: {e}")))
}
