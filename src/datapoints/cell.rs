//! Fixed-capacity storage for a datapoint's latest rendered value.

use crate::datapoints::data::{DecodedValue, DecodingKind};
use core::fmt::{self, Write};
use heapless::String;

/// Bytes available for one rendered value.
pub const VALUE_CAPACITY: usize = 10;

/// Latest rendering of one datapoint plus its "ever populated" flag.
///
/// Once populated, the buffer always holds a printable, valid JSON number
/// (or `null`) no longer than [`VALUE_CAPACITY`] bytes.
#[derive(Debug, Clone, Default)]
pub struct ValueCell {
    value: String<VALUE_CAPACITY>,
    populated: bool,
}

impl ValueCell {
    /// Create an empty, unpopulated cell.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// The rendered value, or `None` before the first decode.
    pub fn value(&self) -> Option<&str> {
        self.populated.then(|| self.value.as_str())
    }

    /// Render `decoded` according to `kind` and mark the cell populated.
    ///
    /// Returns `true` when the rendering did not fit and was clipped.
    pub fn store(&mut self, kind: DecodingKind, decoded: DecodedValue) -> bool {
        let truncated = render_into(kind, decoded, &mut self.value);
        self.populated = true;
        truncated
    }
}

/// Writer that stops accepting characters once the buffer is full.
struct Clipped<'a, const N: usize> {
    buf: &'a mut String<N>,
    truncated: bool,
}

impl<const N: usize> Write for Clipped<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        for c in s.chars() {
            if self.buf.push(c).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}

/// Render a decoded value into `buf`, replacing its contents.
pub fn render_into<const N: usize>(
    kind: DecodingKind,
    decoded: DecodedValue,
    buf: &mut String<N>,
) -> bool {
    buf.clear();
    let mut out = Clipped {
        buf: &mut *buf,
        truncated: false,
    };
    let raw = decoded.0;

    // Clipped never reports an error
    let _ = match kind {
        DecodingKind::Temperature => {
            let sign = if raw < 0 { "-" } else { "" };
            let tenths = raw.unsigned_abs();
            write!(out, "{}{}.{}", sign, tenths / 10, tenths % 10)
        }
        DecodingKind::Status | DecodingKind::CounterShort | DecodingKind::Counter => {
            write!(out, "{}", raw)
        }
    };

    let truncated = out.truncated;
    if truncated {
        // A clipped number may end in a bare sign or decimal point.
        while matches!(buf.chars().last(), Some('.') | Some('-')) {
            buf.pop();
        }
    }
    if buf.is_empty() {
        let _ = buf.push_str("null");
    }
    truncated
}
