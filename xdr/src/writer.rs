//! Big-endian writer for XDR-encoded data.

use crate::error::{XdrError, XdrResult};
use crate::{pad_len, MAX_COUNT};

/// A byte-level writer producing big-endian XDR data.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer. Scalar writes never insert padding; callers
/// pad explicitly with [`pad_zero`](Self::pad_zero) or
/// [`pad_with`](Self::pad_with).
#[derive(Debug, Default)]
pub struct XdrWriter {
    bytes: Vec<u8>,
}

impl XdrWriter {
    /// Creates a new empty `XdrWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `XdrWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes raw bytes without a length prefix or padding.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes a non-negative 31-bit count.
    ///
    /// # Errors
    ///
    /// Returns [`XdrError::LengthOverflow`] if `count` exceeds `i32::MAX`.
    pub fn write_count(&mut self, count: usize) -> XdrResult<()> {
        let raw = u32::try_from(count)
            .ok()
            .filter(|raw| *raw <= MAX_COUNT)
            .ok_or(XdrError::LengthOverflow { length: count })?;
        self.write_u32(raw);
        Ok(())
    }

    /// Writes a counted string: length, bytes, then zero padding to 4 bytes.
    pub fn write_string(&mut self, value: &str) -> XdrResult<()> {
        self.write_count(value.len())?;
        self.write_bytes(value.as_bytes());
        self.pad_zero(value.len());
        Ok(())
    }

    /// Appends the zero padding owed by a payload of `payload_len` bytes.
    pub fn pad_zero(&mut self, payload_len: usize) {
        let pad = pad_len(payload_len);
        self.bytes.resize(self.bytes.len() + pad, 0);
    }

    /// Appends `count` bytes by cycling through `pattern`.
    ///
    /// An empty pattern pads with zeros.
    pub fn pad_with(&mut self, pattern: &[u8], count: usize) {
        if pattern.is_empty() {
            self.bytes.resize(self.bytes.len() + count, 0);
            return;
        }
        self.bytes
            .extend(pattern.iter().copied().cycle().take(count));
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
