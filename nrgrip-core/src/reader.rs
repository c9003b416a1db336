//! Positioned big-endian reader over a seekable source.
//!
//! Every read is bounds-checked against the source length captured when the
//! reader was created, so a short read surfaces as
//! [`NrgError::TruncatedInput`] with the offset where it happened.

use std::io::{ErrorKind, SeekFrom};

use crate::{NrgError, ReadSeek};

/// Width of an integer field whose size differs between format revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Bits32,
    Bits64,
}

impl FieldWidth {
    /// Size of the field in bytes.
    pub fn size(self) -> u64 {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

/// Cursor that reads fixed-width integers and tracks its own position.
pub struct ByteReader<'a> {
    inner: &'a mut dyn ReadSeek,
    pos: u64,
    len: u64,
}

impl<'a> ByteReader<'a> {
    /// Wrap a source, measuring its length and rewinding to offset 0.
    pub fn new(inner: &'a mut dyn ReadSeek) -> Result<Self, NrgError> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, len })
    }

    /// Total length of the source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current absolute offset.
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Bytes between the current offset and end of source.
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Move to an absolute or relative offset inside the source.
    ///
    /// Targets past the end of the source are rejected as truncation rather
    /// than silently accepted the way `Seek` allows.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64, NrgError> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        }
        .ok_or_else(|| {
            NrgError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                "seek before start of source",
            ))
        })?;

        if target > self.len {
            return Err(NrgError::TruncatedInput {
                offset: self.len,
                wanted: target - self.len,
            });
        }

        self.pos = self.inner.seek(SeekFrom::Start(target))?;
        Ok(self.pos)
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: u64) -> Result<(), NrgError> {
        self.need(n)?;
        self.seek(SeekFrom::Start(self.pos + n))?;
        Ok(())
    }

    fn need(&self, n: u64) -> Result<(), NrgError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(NrgError::TruncatedInput {
                offset: self.pos,
                wanted: n - remaining,
            });
        }
        Ok(())
    }

    /// Read exactly `N` bytes.
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], NrgError> {
        self.need(N as u64)?;
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                NrgError::TruncatedInput {
                    offset: self.pos,
                    wanted: N as u64,
                }
            } else {
                NrgError::Io(e)
            }
        })?;
        self.pos += N as u64;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, NrgError> {
        Ok(self.read_bytes::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, NrgError> {
        Ok(u16::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, NrgError> {
        Ok(u32::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, NrgError> {
        Ok(u64::from_be_bytes(self.read_bytes()?))
    }

    /// Read a 32-bit field as a signed value (two's complement LBAs).
    pub fn read_i32(&mut self) -> Result<i32, NrgError> {
        Ok(i32::from_be_bytes(self.read_bytes()?))
    }

    /// Read a 32- or 64-bit unsigned field, widened to `u64`.
    pub fn read_width(&mut self, width: FieldWidth) -> Result<u64, NrgError> {
        match width {
            FieldWidth::Bits32 => Ok(self.read_u32()? as u64),
            FieldWidth::Bits64 => self.read_u64(),
        }
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
