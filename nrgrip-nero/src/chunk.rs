//! Chunk header reading and per-tag payload decoding.
//!
//! Each decoder consumes exactly the bytes its layout defines and returns a
//! [`Chunk`] value; applying that value to the model is the builder's job.
//! Every chunk starts with a 4-byte ASCII tag and a 32-bit payload size.

use nrgrip_core::error::display_tag;
use nrgrip_core::msf::Msf;
use nrgrip_core::util::read_ascii_field;
use nrgrip_core::{ByteReader, DaoSummary, FieldWidth, FormatVersion, NrgError, TrackMode};

use crate::options::SessionModeCheck;

/// Position encoding used by a cue-sheet chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueEncoding {
    /// `CUES`: positions are `00 MM SS FF`.
    Msf,
    /// `CUEX`: positions are signed LBAs.
    Lba,
}

/// Known chunk types, keyed by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    CueSheet(CueEncoding),
    DaoInfo(FieldWidth),
    CdText,
    TrackInfo(FieldWidth),
    SessionInfo,
    MediaType,
    End,
}

impl ChunkKind {
    pub fn from_tag(tag: &[u8; 4]) -> Option<Self> {
        match tag {
            b"CUES" => Some(Self::CueSheet(CueEncoding::Msf)),
            b"CUEX" => Some(Self::CueSheet(CueEncoding::Lba)),
            b"DAOI" => Some(Self::DaoInfo(FieldWidth::Bits32)),
            b"DAOX" => Some(Self::DaoInfo(FieldWidth::Bits64)),
            b"CDTX" => Some(Self::CdText),
            b"ETNF" => Some(Self::TrackInfo(FieldWidth::Bits32)),
            b"ETN2" => Some(Self::TrackInfo(FieldWidth::Bits64)),
            b"SINF" => Some(Self::SessionInfo),
            b"MTYP" => Some(Self::MediaType),
            b"END!" => Some(Self::End),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static [u8; 4] {
        match self {
            Self::CueSheet(CueEncoding::Msf) => b"CUES",
            Self::CueSheet(CueEncoding::Lba) => b"CUEX",
            Self::DaoInfo(FieldWidth::Bits32) => b"DAOI",
            Self::DaoInfo(FieldWidth::Bits64) => b"DAOX",
            Self::CdText => b"CDTX",
            Self::TrackInfo(FieldWidth::Bits32) => b"ETNF",
            Self::TrackInfo(FieldWidth::Bits64) => b"ETN2",
            Self::SessionInfo => b"SINF",
            Self::MediaType => b"MTYP",
            Self::End => b"END!",
        }
    }
}

/// A chunk's tag and declared payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Offset of the tag.
    pub offset: u64,
    pub tag: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    pub const LEN: u64 = 8;

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, NrgError> {
        let offset = reader.tell();
        let tag = reader.read_bytes::<4>()?;
        let size = reader.read_u32()?;
        Ok(Self { offset, tag, size })
    }

    pub fn payload_offset(&self) -> u64 {
        self.offset + Self::LEN
    }

    /// Offset just past the declared payload, where the next header starts.
    pub fn end_offset(&self) -> u64 {
        self.payload_offset() + self.size as u64
    }

    pub fn tag_name(&self) -> String {
        display_tag(&self.tag)
    }
}

/// One 8-byte cue point: mode byte and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuePoint {
    pub mode: u8,
    pub lba: i32,
}

/// Index 0 and index 1 cue points of one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrackEntry {
    pub number: u32,
    pub pretrack: CuePoint,
    pub start: CuePoint,
}

/// Decoded cue-sheet chunk: one session's worth of tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheetChunk {
    pub session_mode: u8,
    pub start_lba: i32,
    pub tracks: Vec<CueTrackEntry>,
    pub trailer_mode: u8,
    pub end_lba: i32,
}

/// Per-track record of a DAO information chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoTrackEntry {
    pub isrc: Option<String>,
    pub sector_size: u16,
    pub mode: TrackMode,
    pub index0: u64,
    pub index1: u64,
    pub next: u64,
}

/// Decoded DAO information chunk: header fields plus one record per track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoInfoChunk {
    pub summary: DaoSummary,
    pub tracks: Vec<DaoTrackEntry>,
}

/// One extended track-information record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfoEntry {
    pub offset: u64,
    pub length: u64,
    pub mode: TrackMode,
    pub start_lba: i32,
}

/// A decoded chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    CueSheet(CueSheetChunk),
    DaoInfo(DaoInfoChunk),
    CdText { size: u32 },
    TrackInfo(Vec<TrackInfoEntry>),
    SessionInfo { track_count: u32 },
    MediaType(u32),
    End,
}

/// Parser state a decoder needs to validate what it reads.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    pub version: FormatVersion,
    /// Number the next track in the stream must carry.
    pub next_track: u32,
    pub session_mode_check: SessionModeCheck,
}

/// Bytes in a cue-sheet record.
const CUE_RECORD_LEN: u32 = 8;

/// Fixed bytes at the start of a DAO information payload.
const DAO_HEADER_LEN: u32 = 22;

/// Lead-out track number in the cue-sheet trailer.
const LEAD_OUT_TRACK: u8 = 0xAA;

/// Decode the payload of a chunk whose header has already been read.
pub fn decode_chunk(
    reader: &mut ByteReader<'_>,
    header: &ChunkHeader,
    kind: ChunkKind,
    ctx: &DecodeContext,
) -> Result<Chunk, NrgError> {
    match kind {
        ChunkKind::CueSheet(encoding) => {
            decode_cue_sheet(reader, header, encoding, ctx).map(Chunk::CueSheet)
        }
        ChunkKind::DaoInfo(width) => decode_dao_info(reader, header, width).map(Chunk::DaoInfo),
        ChunkKind::CdText => {
            reader.skip(header.size as u64)?;
            Ok(Chunk::CdText { size: header.size })
        }
        ChunkKind::TrackInfo(width) => {
            decode_track_info(reader, header, width).map(Chunk::TrackInfo)
        }
        ChunkKind::SessionInfo => Ok(Chunk::SessionInfo {
            track_count: reader.read_u32()?,
        }),
        ChunkKind::MediaType => Ok(Chunk::MediaType(reader.read_u32()?)),
        ChunkKind::End => Ok(Chunk::End),
    }
}

// ---------------------------------------------------------------------------
// Cue sheet (CUES / CUEX)
// ---------------------------------------------------------------------------

/// Fields of one raw 8-byte cue record.
struct CueRecord {
    offset: u64,
    mode: u8,
    track: u8,
    index: u8,
    reserved: u8,
    lba: i32,
}

fn read_cue_record(
    reader: &mut ByteReader<'_>,
    encoding: CueEncoding,
) -> Result<CueRecord, NrgError> {
    let offset = reader.tell();
    let [mode, track, index, reserved] = reader.read_bytes::<4>()?;
    let lba = match encoding {
        CueEncoding::Lba => reader.read_i32()?,
        CueEncoding::Msf => {
            let [_, minutes, seconds, frames] = reader.read_bytes::<4>()?;
            Msf::new(minutes, seconds, frames).to_lba()
        }
    };
    Ok(CueRecord {
        offset,
        mode,
        track,
        index,
        reserved,
        lba,
    })
}

fn expect_byte(offset: u64, field: &str, expected: u8, actual: u8) -> Result<(), NrgError> {
    if expected != actual {
        return Err(NrgError::mismatch(
            offset,
            format!(
                "{} should be 0x{:02X}, found 0x{:02X}",
                field, expected, actual
            ),
        ));
    }
    Ok(())
}

/// Check one track's index record against the running track number.
fn read_track_point(
    reader: &mut ByteReader<'_>,
    encoding: CueEncoding,
    number: u32,
    index: u8,
) -> Result<CuePoint, NrgError> {
    let record = read_cue_record(reader, encoding)?;
    if record.track as u32 != number {
        return Err(NrgError::mismatch(
            record.offset,
            format!(
                "expected track number {}, found {}",
                number, record.track
            ),
        ));
    }
    expect_byte(record.offset, "cue index", index, record.index)?;
    expect_byte(record.offset, "cue reserved byte", 0x00, record.reserved)?;
    Ok(CuePoint {
        mode: record.mode,
        lba: record.lba,
    })
}

fn decode_cue_sheet(
    reader: &mut ByteReader<'_>,
    header: &ChunkHeader,
    encoding: CueEncoding,
    ctx: &DecodeContext,
) -> Result<CueSheetChunk, NrgError> {
    let record_pair = CUE_RECORD_LEN * 2;
    if header.size < record_pair || header.size % record_pair != 0 {
        return Err(NrgError::mismatch(
            header.offset,
            format!(
                "cue sheet size {} is not a positive multiple of {}",
                header.size, record_pair
            ),
        ));
    }
    let track_count = header.size / record_pair - 1;

    let lead = read_cue_record(reader, encoding)?;
    expect_byte(lead.offset, "session track number", 0x00, lead.track)?;
    expect_byte(lead.offset, "session index", 0x00, lead.index)?;
    expect_byte(lead.offset, "session reserved byte", 0x00, lead.reserved)?;

    log::trace!(
        "  session: {} track(s), mode 0x{:02X}, starts at LBA {}",
        track_count,
        lead.mode,
        lead.lba
    );

    let mut tracks = Vec::with_capacity(track_count as usize);
    for i in 0..track_count {
        let number = ctx.next_track + i;
        let pretrack = read_track_point(reader, encoding, number, 0x00)?;
        let start = read_track_point(reader, encoding, number, 0x01)?;
        log::trace!(
            "  track {}: index 0 mode 0x{:02X} at LBA {}, index 1 mode 0x{:02X} at LBA {}",
            number,
            pretrack.mode,
            pretrack.lba,
            start.mode,
            start.lba
        );
        tracks.push(CueTrackEntry {
            number,
            pretrack,
            start,
        });
    }

    let trailer = read_cue_record(reader, encoding)?;
    if ctx.session_mode_check.applies_to(ctx.version) {
        expect_byte(trailer.offset, "lead-out mode", lead.mode, trailer.mode)?;
    }
    expect_byte(trailer.offset, "lead-out track", LEAD_OUT_TRACK, trailer.track)?;
    expect_byte(trailer.offset, "lead-out index", 0x01, trailer.index)?;
    expect_byte(trailer.offset, "lead-out reserved byte", 0x00, trailer.reserved)?;

    Ok(CueSheetChunk {
        session_mode: lead.mode,
        start_lba: lead.lba,
        tracks,
        trailer_mode: trailer.mode,
        end_lba: trailer.lba,
    })
}

// ---------------------------------------------------------------------------
// DAO information (DAOI / DAOX)
// ---------------------------------------------------------------------------

/// Bytes per DAO track record: ISRC, sector size, mode field, three offsets.
fn dao_track_len(width: FieldWidth) -> u32 {
    12 + 2 + 4 + 3 * width.size() as u32
}

fn decode_dao_info(
    reader: &mut ByteReader<'_>,
    header: &ChunkHeader,
    width: FieldWidth,
) -> Result<DaoInfoChunk, NrgError> {
    let start = reader.tell();
    let leading_size = reader.read_u32()?;
    if leading_size > header.size {
        return Err(NrgError::mismatch(
            header.offset,
            format!(
                "DAO size {} exceeds the chunk's declared {} bytes",
                leading_size, header.size
            ),
        ));
    }
    let per_track = dao_track_len(width);
    if leading_size < DAO_HEADER_LEN || (leading_size - DAO_HEADER_LEN) % per_track != 0 {
        return Err(NrgError::mismatch(
            start,
            format!(
                "DAO size {} does not fit {}-byte header plus {}-byte tracks",
                leading_size, DAO_HEADER_LEN, per_track
            ),
        ));
    }
    let track_count = (leading_size - DAO_HEADER_LEN) / per_track;

    let catalog_number = read_ascii_field(&reader.read_bytes::<14>()?);
    let [toc_type, close_flag, first_track, last_track] = reader.read_bytes::<4>()?;
    log::trace!(
        "  DAO: toc type 0x{:02X}, tracks {}..={} ({} record(s))",
        toc_type,
        first_track,
        last_track,
        track_count
    );

    let mut tracks = Vec::with_capacity(track_count.min(header.size / per_track) as usize);
    for _ in 0..track_count {
        let record_offset = reader.tell();
        let isrc = read_ascii_field(&reader.read_bytes::<12>()?);
        let sector_size = reader.read_u16()?;
        let mode_field = reader.read_bytes::<4>()?;
        let mode = TrackMode::from_code(mode_field[0] as u32).ok_or_else(|| {
            NrgError::mismatch(
                record_offset,
                format!("unknown DAO track mode 0x{:02X}", mode_field[0]),
            )
        })?;
        let index0 = reader.read_width(width)?;
        let index1 = reader.read_width(width)?;
        let next = reader.read_width(width)?;

        if sector_size == 0 {
            return Err(NrgError::mismatch(record_offset, "DAO track has zero sector size"));
        }
        if index0 > index1 || index1 > next {
            return Err(NrgError::mismatch(
                record_offset,
                format!(
                    "DAO offsets out of order: index0 0x{:X}, index1 0x{:X}, next 0x{:X}",
                    index0, index1, next
                ),
            ));
        }

        tracks.push(DaoTrackEntry {
            isrc,
            sector_size,
            mode,
            index0,
            index1,
            next,
        });
    }

    Ok(DaoInfoChunk {
        summary: DaoSummary {
            catalog_number,
            toc_type,
            close_flag,
            first_track,
            last_track,
        },
        tracks,
    })
}

// ---------------------------------------------------------------------------
// Extended track information (ETNF / ETN2)
// ---------------------------------------------------------------------------

/// Bytes per record: offset, length, mode, start LBA, reserved.
fn track_info_len(width: FieldWidth) -> u32 {
    3 * width.size() as u32 + 4 + 4
}

fn decode_track_info(
    reader: &mut ByteReader<'_>,
    header: &ChunkHeader,
    width: FieldWidth,
) -> Result<Vec<TrackInfoEntry>, NrgError> {
    let record_len = track_info_len(width);
    if header.size == 0 || header.size % record_len != 0 {
        return Err(NrgError::mismatch(
            header.offset,
            format!(
                "track info size {} is not a multiple of {}",
                header.size, record_len
            ),
        ));
    }

    let mut entries = Vec::with_capacity((header.size / record_len) as usize);
    for _ in 0..header.size / record_len {
        let record_offset = reader.tell();
        let offset = reader.read_width(width)?;
        let length = reader.read_width(width)?;
        let code = reader.read_u32()?;
        let start_lba = reader.read_i32()?;
        let reserved = reader.read_width(width)?;

        let mode = TrackMode::from_code(code).ok_or_else(|| {
            NrgError::mismatch(record_offset, format!("unknown track mode 0x{:X}", code))
        })?;
        if reserved != 0 {
            return Err(NrgError::mismatch(
                record_offset,
                format!("reserved track info field is 0x{:X}, expected 0", reserved),
            ));
        }

        log::trace!(
            "  track info: {} bytes at 0x{:X}, {}, LBA {}",
            length,
            offset,
            mode,
            start_lba
        );
        entries.push(TrackInfoEntry {
            offset,
            length,
            mode,
            start_lba,
        });
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "tests/chunk_tests.rs"]
mod tests;
