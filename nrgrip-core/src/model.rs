//! In-memory model of a disc image: sessions owning tracks.
//!
//! The tree is built once by the parser and only read afterwards. Track
//! numbers are global across the image, not per session.

use std::fmt;

use serde::Serialize;

use crate::util::sector_count;

/// Footer revision, which also decides the integer width of offset fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatVersion {
    /// `NERO` footer with a 32-bit first-chunk offset.
    V1,
    /// `NER5` footer with a 64-bit first-chunk offset.
    V2,
}

impl FormatVersion {
    pub fn name(&self) -> &'static str {
        match self {
            Self::V1 => "Nero 5 (NERO)",
            Self::V2 => "Nero 5.5+ (NER5)",
        }
    }

    /// Footer length in bytes.
    pub fn footer_len(&self) -> u64 {
        match self {
            Self::V1 => 8,
            Self::V2 => 12,
        }
    }
}

/// How a session was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BurnMode {
    DiscAtOnce,
    TrackAtOnce,
}

impl BurnMode {
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::DiscAtOnce => "DAO",
            Self::TrackAtOnce => "TAO",
        }
    }
}

/// Interpretation of a cue-sheet mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueMode {
    Audio,
    Mode2,
    Other(u8),
}

impl CueMode {
    pub const AUDIO_BYTE: u8 = 0x01;
    pub const DATA_BYTE: u8 = 0x41;

    pub fn from_byte(byte: u8) -> Self {
        match byte {
            Self::AUDIO_BYTE => Self::Audio,
            Self::DATA_BYTE => Self::Mode2,
            other => Self::Other(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Mode2 => "Mode2",
            Self::Other(_) => "Unknown",
        }
    }
}

/// Sector layout of a track's payload, from DAO or extended track records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackMode {
    /// Mode 1, 2048 user bytes per sector
    Mode1,
    /// Mode 2 Form 1, 2048 user bytes per sector
    Mode2Form1,
    /// Mode 2 formless, 2336 bytes per sector
    Mode2,
    /// Raw Mode 1 sectors, 2352 bytes
    Mode1Raw,
    /// Raw Mode 2 sectors, 2352 bytes
    Mode2Raw,
    /// Red Book audio, 2352 bytes
    Audio,
}

impl TrackMode {
    /// Decode the mode code used in DAO and extended track records.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x00 => Some(Self::Mode1),
            0x02 => Some(Self::Mode2Form1),
            0x03 => Some(Self::Mode2),
            0x05 => Some(Self::Mode1Raw),
            0x06 => Some(Self::Mode2Raw),
            0x07 => Some(Self::Audio),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Mode1 => 0x00,
            Self::Mode2Form1 => 0x02,
            Self::Mode2 => 0x03,
            Self::Mode1Raw => 0x05,
            Self::Mode2Raw => 0x06,
            Self::Audio => 0x07,
        }
    }

    /// Bytes per stored sector.
    pub fn sector_size(&self) -> u32 {
        match self {
            Self::Mode1 | Self::Mode2Form1 => 2048,
            Self::Mode2 => 2336,
            Self::Mode1Raw | Self::Mode2Raw | Self::Audio => 2352,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }

    /// Mode byte a cue sheet would carry for this track.
    pub fn cue_mode_byte(&self) -> u8 {
        if self.is_audio() {
            CueMode::AUDIO_BYTE
        } else {
            CueMode::DATA_BYTE
        }
    }

    /// Track type keyword as written in a CUE sheet.
    pub fn cue_keyword(&self) -> &'static str {
        match self {
            Self::Mode1 => "MODE1/2048",
            Self::Mode2Form1 => "MODE2/2048",
            Self::Mode2 => "MODE2/2336",
            Self::Mode1Raw => "MODE1/2352",
            Self::Mode2Raw => "MODE2/2352",
            Self::Audio => "AUDIO",
        }
    }
}

impl fmt::Display for TrackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mode1 => "Mode1/2048",
            Self::Mode2Form1 => "Mode2 Form1/2048",
            Self::Mode2 => "Mode2/2336",
            Self::Mode1Raw => "Mode1/2352",
            Self::Mode2Raw => "Mode2/2352",
            Self::Audio => "Audio/2352",
        };
        f.write_str(name)
    }
}

/// Where a track's payload lives in the image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackLayout {
    /// Offset of the pre-gap (index 0). Equal to `byte_offset` when there is none.
    pub pregap_offset: u64,
    /// Offset of index 1, where the track content starts.
    pub byte_offset: u64,
    /// Payload length from `byte_offset`.
    pub length_bytes: u64,
    pub sector_size: u32,
    pub mode: TrackMode,
}

impl TrackLayout {
    pub fn pregap_bytes(&self) -> u64 {
        self.byte_offset - self.pregap_offset
    }

    pub fn sectors(&self) -> u64 {
        sector_count(self.length_bytes, self.sector_size)
    }

    pub fn pregap_sectors(&self) -> u64 {
        sector_count(self.pregap_bytes(), self.sector_size)
    }
}

/// One track. Created only by the disc builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Global track number, starting at 1.
    pub number: u32,
    pub pretrack_mode: u8,
    /// Index 0 (pre-gap) position.
    pub pretrack_lba: i32,
    pub track_mode: u8,
    /// Index 1 position, where the track actually starts.
    pub track_lba: i32,
    pub isrc: Option<String>,
    pub layout: Option<TrackLayout>,
}

impl Track {
    /// Whether the track holds audio, judged by layout first and mode byte otherwise.
    pub fn is_audio(&self) -> bool {
        match &self.layout {
            Some(layout) => layout.mode.is_audio(),
            None => CueMode::from_byte(self.track_mode) == CueMode::Audio,
        }
    }

    pub fn mode_name(&self) -> String {
        match &self.layout {
            Some(layout) => layout.mode.to_string(),
            None => CueMode::from_byte(self.track_mode).name().to_string(),
        }
    }
}

/// Header fields of a DAO information chunk, kept per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaoSummary {
    /// Media catalog number (UPC/EAN), if recorded.
    pub catalog_number: Option<String>,
    pub toc_type: u8,
    pub close_flag: u8,
    pub first_track: u8,
    pub last_track: u8,
}

/// One burn session and the tracks it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Session number, starting at 1.
    pub number: u32,
    pub burn_mode: BurnMode,
    /// Raw cue mode byte (0x41 data, 0x01 audio).
    pub session_mode: u8,
    pub start_lba: i32,
    pub end_lba: i32,
    pub tracks: Vec<Track>,
    pub dao: Option<DaoSummary>,
    /// Track count from a session-info chunk, when one was present.
    pub declared_track_count: Option<u32>,
}

impl Session {
    pub fn mode(&self) -> CueMode {
        CueMode::from_byte(self.session_mode)
    }

    pub fn first_track_number(&self) -> Option<u32> {
        self.tracks.first().map(|t| t.number)
    }

    pub fn last_track_number(&self) -> Option<u32> {
        self.tracks.last().map(|t| t.number)
    }
}

/// Root of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscImage {
    pub format_version: FormatVersion,
    pub first_chunk_offset: u64,
    pub sessions: Vec<Session>,
    /// Opaque value of the media-type chunk.
    pub media_type: Option<u32>,
    /// Total size of skipped CD-Text chunks.
    pub cd_text_bytes: u64,
    /// False when the chunk stream ended without a terminator chunk.
    pub terminated: bool,
}

impl DiscImage {
    pub fn new(format_version: FormatVersion, first_chunk_offset: u64) -> Self {
        Self {
            format_version,
            first_chunk_offset,
            sessions: Vec::new(),
            media_type: None,
            cd_text_bytes: 0,
            terminated: false,
        }
    }

    pub fn track_count(&self) -> usize {
        self.sessions.iter().map(|s| s.tracks.len()).sum()
    }

    /// All tracks in stored order, paired with their session.
    pub fn tracks(&self) -> impl Iterator<Item = (&Session, &Track)> {
        self.sessions
            .iter()
            .flat_map(|s| s.tracks.iter().map(move |t| (s, t)))
    }

    pub fn has_audio(&self) -> bool {
        self.tracks().any(|(_, t)| t.is_audio())
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
