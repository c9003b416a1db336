use thiserror::Error;

/// Errors that can occur while reading a disc image.
///
/// Every variant except `Io` means the chunk layout could not be trusted
/// any further, so parsing stops at the first one.
#[derive(Debug, Error)]
pub enum NrgError {
    /// I/O error other than a short read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes were available than the format required
    #[error("Truncated input at offset 0x{offset:X}: needed {wanted} more bytes")]
    TruncatedInput { offset: u64, wanted: u64 },

    /// Neither footer magic was found at the end of the source
    #[error("Not a Nero disc image (no NER5 or NERO footer)")]
    NotThisFormat,

    /// A chunk tag the decoder does not know
    #[error("Unknown chunk {} at offset 0x{offset:X}", display_tag(tag))]
    UnknownChunk { tag: [u8; 4], offset: u64 },

    /// A fixed byte, count or running number embedded in the format did not hold
    #[error("Structural mismatch at offset 0x{offset:X}: {detail}")]
    StructuralMismatch { offset: u64, detail: String },

    /// Track data arrived with no session to attach it to
    #[error("Orphan track data at offset 0x{offset:X}: {detail}")]
    OrphanTrack { offset: u64, detail: String },
}

impl NrgError {
    pub fn mismatch(offset: u64, detail: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            offset,
            detail: detail.into(),
        }
    }

    pub fn orphan(offset: u64, detail: impl Into<String>) -> Self {
        Self::OrphanTrack {
            offset,
            detail: detail.into(),
        }
    }

    /// Returns true for errors raised by the layout checks rather than the source.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Render a 4-byte tag as ASCII when printable, hex otherwise.
pub fn display_tag(tag: &[u8; 4]) -> String {
    if tag.iter().all(|b| (0x20..0x7F).contains(b)) {
        format!("'{}'", String::from_utf8_lossy(tag))
    } else {
        format!(
            "0x{:02X}{:02X}{:02X}{:02X}",
            tag[0], tag[1], tag[2], tag[3]
        )
    }
}
