//! Footer detection.
//!
//! The footer is the only fixed-position structure in the format: a magic
//! followed by the absolute offset of the first chunk.
//!
//! | Version | Bytes from end | Layout                      |
//! |---------|----------------|-----------------------------|
//! | V2      | 12             | `NER5` + 64-bit offset      |
//! | V1      | 8              | `NERO` + 32-bit offset      |

use std::io::SeekFrom;

use nrgrip_core::{ByteReader, FormatVersion, NrgError};

pub const V2_MAGIC: &[u8; 4] = b"NER5";
pub const V1_MAGIC: &[u8; 4] = b"NERO";

/// Result of footer detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    pub version: FormatVersion,
    /// Absolute offset of the first chunk header.
    pub first_chunk_offset: u64,
    /// Absolute offset where the footer begins; the chunk stream ends here.
    pub footer_offset: u64,
}

impl Footer {
    /// Bytes available to the chunk stream.
    pub fn stream_len(&self) -> u64 {
        self.footer_offset - self.first_chunk_offset
    }
}

/// Locate the format version and first-chunk offset.
///
/// The V2 magic is checked first at 12 bytes from the end; only when it is
/// absent is the V1 magic checked at 8 bytes from the end.
pub fn detect_footer(reader: &mut ByteReader<'_>) -> Result<Footer, NrgError> {
    let len = reader.len();

    let v2_len = FormatVersion::V2.footer_len();
    if len >= v2_len {
        reader.seek(SeekFrom::Start(len - v2_len))?;
        if &reader.read_bytes::<4>()? == V2_MAGIC {
            let first_chunk_offset = reader.read_u64()?;
            return validated(FormatVersion::V2, first_chunk_offset, len - v2_len);
        }
    }

    let v1_len = FormatVersion::V1.footer_len();
    if len >= v1_len {
        reader.seek(SeekFrom::Start(len - v1_len))?;
        if &reader.read_bytes::<4>()? == V1_MAGIC {
            let first_chunk_offset = reader.read_u32()? as u64;
            return validated(FormatVersion::V1, first_chunk_offset, len - v1_len);
        }
    }

    Err(NrgError::NotThisFormat)
}

fn validated(
    version: FormatVersion,
    first_chunk_offset: u64,
    footer_offset: u64,
) -> Result<Footer, NrgError> {
    if first_chunk_offset >= footer_offset {
        return Err(NrgError::mismatch(
            footer_offset,
            format!(
                "first chunk offset 0x{:X} is not before the footer at 0x{:X}",
                first_chunk_offset, footer_offset
            ),
        ));
    }
    log::debug!(
        "{} footer at 0x{:X}, first chunk at 0x{:X}",
        version.name(),
        footer_offset,
        first_chunk_offset
    );
    Ok(Footer {
        version,
        first_chunk_offset,
        footer_offset,
    })
}

#[cfg(test)]
#[path = "tests/footer_tests.rs"]
mod tests;
