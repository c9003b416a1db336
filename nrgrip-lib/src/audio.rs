//! Output formats and the audio container headers written in front of
//! audio track payloads.
//!
//! Track audio is 16-bit stereo PCM at 44.1 kHz, stored little-endian.
//! WAV keeps that byte order; AIFF needs every sample swapped.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use nrgrip_core::TrackLayout;

pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNELS: u16 = 2;
pub const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

pub const WAV_HEADER_LEN: usize = 44;
pub const AIFF_HEADER_LEN: usize = 54;

/// Output format chosen for a whole extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Sectors copied verbatim
    Raw,
    /// Audio tracks wrapped in a RIFF/WAVE header
    #[default]
    Wav,
    /// Audio tracks wrapped in an AIFF header, samples big-endian
    Aiff,
}

impl OutputFormat {
    /// Container used for one track. Data tracks are always raw.
    pub fn container_for(&self, layout: &TrackLayout) -> Container {
        if !layout.mode.is_audio() {
            return Container::Raw;
        }
        match self {
            Self::Raw => Container::Raw,
            Self::Wav => Container::Wav,
            Self::Aiff => Container::Aiff,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Wav => "wav",
            Self::Aiff => "aiff",
        })
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "bin" => Ok(Self::Raw),
            "wav" | "wave" => Ok(Self::Wav),
            "aiff" | "aif" => Ok(Self::Aiff),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// How a single track's bytes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Raw,
    Wav,
    Aiff,
}

impl Container {
    /// File extension, without the dot.
    pub fn extension(&self, layout: &TrackLayout) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Aiff => "aiff",
            Self::Raw if layout.sector_size == 2048 && !layout.mode.is_audio() => "iso",
            Self::Raw => "bin",
        }
    }

    /// File type keyword for a cue sheet `FILE` line.
    pub fn cue_file_type(&self) -> &'static str {
        match self {
            Self::Raw => "BINARY",
            Self::Wav => "WAVE",
            Self::Aiff => "AIFF",
        }
    }

    /// Write this container's header for `data_len` payload bytes.
    pub fn write_header(&self, out: &mut dyn Write, data_len: u32) -> io::Result<()> {
        match self {
            Self::Raw => Ok(()),
            Self::Wav => out.write_all(&wav_header(data_len)),
            Self::Aiff => out.write_all(&aiff_header(data_len)),
        }
    }

    /// Convert a payload buffer to this container's sample order in place.
    pub fn prepare_samples(&self, buf: &mut [u8]) {
        if *self == Self::Aiff {
            swap_sample_bytes(buf);
        }
    }
}

/// 44-byte canonical RIFF/WAVE header for CD audio.
pub fn wav_header(data_len: u32) -> [u8; WAV_HEADER_LEN] {
    let byte_rate = SAMPLE_RATE * BLOCK_ALIGN as u32;
    let mut h = [0u8; WAV_HEADER_LEN];
    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&data_len.saturating_add(36).to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");
    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    h[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    h[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    h[24..28].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&BLOCK_ALIGN.to_le_bytes());
    h[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&data_len.to_le_bytes());
    h
}

/// 44100 as an 80-bit IEEE 754 extended float, as AIFF stores sample rates.
const AIFF_RATE_44100: [u8; 10] = [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0];

/// 54-byte FORM/AIFF header with COMM and SSND chunks.
pub fn aiff_header(data_len: u32) -> [u8; AIFF_HEADER_LEN] {
    let frames = data_len / BLOCK_ALIGN as u32;
    let mut h = [0u8; AIFF_HEADER_LEN];
    h[0..4].copy_from_slice(b"FORM");
    h[4..8].copy_from_slice(&data_len.saturating_add(46).to_be_bytes());
    h[8..12].copy_from_slice(b"AIFF");
    h[12..16].copy_from_slice(b"COMM");
    h[16..20].copy_from_slice(&18u32.to_be_bytes());
    h[20..22].copy_from_slice(&CHANNELS.to_be_bytes());
    h[22..26].copy_from_slice(&frames.to_be_bytes());
    h[26..28].copy_from_slice(&BITS_PER_SAMPLE.to_be_bytes());
    h[28..38].copy_from_slice(&AIFF_RATE_44100);
    h[38..42].copy_from_slice(b"SSND");
    h[42..46].copy_from_slice(&data_len.saturating_add(8).to_be_bytes());
    // offset and block size stay zero
    h
}

/// Swap each 16-bit sample's bytes. A trailing odd byte is left alone.
pub fn swap_sample_bytes(buf: &mut [u8]) {
    for pair in buf.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
#[path = "tests/audio_tests.rs"]
mod tests;
