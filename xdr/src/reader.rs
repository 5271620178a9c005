//! Big-endian reader with bounded operations.

use crate::error::{XdrError, XdrResult};
use crate::pad_len;

/// A byte-level reader for decoding XDR data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct XdrReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    /// Creates a new `XdrReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an absolute byte position.
    pub fn seek(&mut self, position: usize) -> XdrResult<()> {
        if position > self.data.len() {
            return Err(XdrError::SeekOutOfBounds {
                position,
                len: self.data.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn read_bytes(&mut self, len: usize) -> XdrResult<&'a [u8]> {
        self.ensure(len)?;
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Skips the padding owed by a payload of `payload_len` bytes.
    pub fn skip_padding(&mut self, payload_len: usize) -> XdrResult<()> {
        self.read_bytes(pad_len(payload_len)).map(|_| ())
    }

    pub fn read_u8(&mut self) -> XdrResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> XdrResult<i8> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> XdrResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> XdrResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> XdrResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> XdrResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> XdrResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> XdrResult<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Reads a counted string written by
    /// [`XdrWriter::write_string`](crate::XdrWriter::write_string).
    ///
    /// The count is checked against the remaining bytes before any
    /// allocation happens.
    pub fn read_string(&mut self) -> XdrResult<String> {
        let len = self.read_u32()? as usize;
        let start = self.pos;
        let bytes = self.read_bytes(len)?;
        let value = std::str::from_utf8(bytes)
            .map_err(|_| XdrError::InvalidUtf8 { position: start })?
            .to_owned();
        self.skip_padding(len)?;
        Ok(value)
    }

    fn ensure(&self, len: usize) -> XdrResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(XdrError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> XdrResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}
