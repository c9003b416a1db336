//! Synthetic image writer.
//!
//! Produces byte-exact images for tests: the payload comes first, chunks
//! follow, and [`ImageWriter::finish`] appends the footer pointing at the
//! first chunk. Nothing here validates its input, so tests can build
//! deliberately broken images with [`ImageWriter::raw_chunk`] and
//! [`ImageWriter::chunk_with_size`].

use nrgrip_core::msf::Msf;
use nrgrip_core::{BurnMode, DiscImage, FieldWidth, FormatVersion, Session};

use crate::footer::{V1_MAGIC, V2_MAGIC};

pub struct ImageWriter {
    version: FormatVersion,
    buf: Vec<u8>,
    first_chunk: Option<u64>,
}

impl ImageWriter {
    pub fn new(version: FormatVersion) -> Self {
        Self {
            version,
            buf: Vec::new(),
            first_chunk: None,
        }
    }

    fn width(&self) -> FieldWidth {
        match self.version {
            FormatVersion::V1 => FieldWidth::Bits32,
            FormatVersion::V2 => FieldWidth::Bits64,
        }
    }

    /// Append track payload bytes and return their offset.
    pub fn payload(&mut self, bytes: &[u8]) -> u64 {
        let offset = self.buf.len() as u64;
        self.buf.extend_from_slice(bytes);
        offset
    }

    /// Current end of the image, where the next chunk will start.
    pub fn position(&self) -> u64 {
        self.buf.len() as u64
    }

    /// Write a chunk whose declared size matches its body.
    pub fn raw_chunk(&mut self, tag: &[u8; 4], body: &[u8]) -> &mut Self {
        self.chunk_with_size(tag, body.len() as u32, body)
    }

    /// Write a chunk with an arbitrary declared size.
    pub fn chunk_with_size(&mut self, tag: &[u8; 4], declared: u32, body: &[u8]) -> &mut Self {
        if self.first_chunk.is_none() {
            self.first_chunk = Some(self.buf.len() as u64);
        }
        self.buf.extend_from_slice(tag);
        self.buf.extend_from_slice(&declared.to_be_bytes());
        self.buf.extend_from_slice(body);
        self
    }

    /// Write every chunk a session would have produced.
    ///
    /// Disc-at-once sessions get a cue sheet and, when present, DAO
    /// information; track-at-once sessions get one track-info chunk. Either
    /// kind is followed by session info when a track count was declared.
    pub fn session(&mut self, session: &Session) -> &mut Self {
        match session.burn_mode {
            BurnMode::DiscAtOnce => {
                self.cue_sheet(session);
                if session.dao.is_some() {
                    self.dao_info(session);
                }
            }
            BurnMode::TrackAtOnce => {
                self.track_info(session);
            }
        }
        if let Some(count) = session.declared_track_count {
            self.session_info(count);
        }
        self
    }

    /// `CUES` for V1 images, `CUEX` for V2.
    pub fn cue_sheet(&mut self, session: &Session) -> &mut Self {
        let msf = self.version == FormatVersion::V1;
        let mut body = Vec::new();
        let mut record = |mode: u8, track: u8, index: u8, lba: i32| {
            body.extend_from_slice(&[mode, track, index, 0]);
            if msf {
                let addr = Msf::from_lba(lba).unwrap_or(Msf::new(0, 0, 0));
                body.extend_from_slice(&[0, addr.minutes, addr.seconds, addr.frames]);
            } else {
                body.extend_from_slice(&lba.to_be_bytes());
            }
        };

        record(session.session_mode, 0, 0, session.start_lba);
        for track in &session.tracks {
            let number = track.number as u8;
            record(track.pretrack_mode, number, 0, track.pretrack_lba);
            record(track.track_mode, number, 1, track.track_lba);
        }
        record(session.session_mode, 0xAA, 1, session.end_lba);

        let tag = if msf { b"CUES" } else { b"CUEX" };
        self.raw_chunk(tag, &body)
    }

    /// `DAOI` for V1 images, `DAOX` for V2. Tracks without a layout are
    /// written as empty mode-1 records.
    pub fn dao_info(&mut self, session: &Session) -> &mut Self {
        let width = self.width();
        let summary = session.dao.clone().unwrap_or(nrgrip_core::DaoSummary {
            catalog_number: None,
            toc_type: 0,
            close_flag: 0,
            first_track: session.first_track_number().unwrap_or(0) as u8,
            last_track: session.last_track_number().unwrap_or(0) as u8,
        });

        let mut body = vec![0u8; 4];
        body.extend_from_slice(&ascii_field::<14>(summary.catalog_number.as_deref()));
        body.extend_from_slice(&[
            summary.toc_type,
            summary.close_flag,
            summary.first_track,
            summary.last_track,
        ]);
        for track in &session.tracks {
            body.extend_from_slice(&ascii_field::<12>(track.isrc.as_deref()));
            let (sector_size, code, index0, index1, next) = match &track.layout {
                Some(l) => (
                    l.sector_size as u16,
                    l.mode.code(),
                    l.pregap_offset,
                    l.byte_offset,
                    l.byte_offset + l.length_bytes,
                ),
                None => (2048, 0, 0, 0, 0),
            };
            body.extend_from_slice(&sector_size.to_be_bytes());
            body.extend_from_slice(&[code, 0, 0, 0]);
            for value in [index0, index1, next] {
                push_width(&mut body, width, value);
            }
        }
        let total = body.len() as u32;
        body[..4].copy_from_slice(&total.to_be_bytes());

        let tag = match width {
            FieldWidth::Bits32 => b"DAOI",
            FieldWidth::Bits64 => b"DAOX",
        };
        self.raw_chunk(tag, &body)
    }

    /// `ETNF` for V1 images, `ETN2` for V2, one record per laid-out track.
    pub fn track_info(&mut self, session: &Session) -> &mut Self {
        let width = self.width();
        let mut body = Vec::new();
        for track in &session.tracks {
            let Some(layout) = &track.layout else {
                continue;
            };
            push_width(&mut body, width, layout.byte_offset);
            push_width(&mut body, width, layout.length_bytes);
            body.extend_from_slice(&(layout.mode.code() as u32).to_be_bytes());
            body.extend_from_slice(&track.track_lba.to_be_bytes());
            push_width(&mut body, width, 0);
        }

        let tag = match width {
            FieldWidth::Bits32 => b"ETNF",
            FieldWidth::Bits64 => b"ETN2",
        };
        self.raw_chunk(tag, &body)
    }

    pub fn session_info(&mut self, track_count: u32) -> &mut Self {
        self.raw_chunk(b"SINF", &track_count.to_be_bytes())
    }

    pub fn media_type(&mut self, value: u32) -> &mut Self {
        self.raw_chunk(b"MTYP", &value.to_be_bytes())
    }

    pub fn cd_text(&mut self, body: &[u8]) -> &mut Self {
        self.raw_chunk(b"CDTX", body)
    }

    pub fn end(&mut self) -> &mut Self {
        self.raw_chunk(b"END!", &[])
    }

    /// Append the footer and return the image bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let first = self.first_chunk.unwrap_or(self.buf.len() as u64);
        match self.version {
            FormatVersion::V1 => {
                self.buf.extend_from_slice(V1_MAGIC);
                self.buf.extend_from_slice(&(first as u32).to_be_bytes());
            }
            FormatVersion::V2 => {
                self.buf.extend_from_slice(V2_MAGIC);
                self.buf.extend_from_slice(&first.to_be_bytes());
            }
        }
        self.buf
    }
}

fn push_width(buf: &mut Vec<u8>, width: FieldWidth, value: u64) {
    match width {
        FieldWidth::Bits32 => buf.extend_from_slice(&(value as u32).to_be_bytes()),
        FieldWidth::Bits64 => buf.extend_from_slice(&value.to_be_bytes()),
    }
}

fn ascii_field<const N: usize>(value: Option<&str>) -> [u8; N] {
    let mut field = [0u8; N];
    if let Some(value) = value {
        for (dst, src) in field.iter_mut().zip(value.bytes()) {
            *dst = src;
        }
    }
    field
}

/// Serialize a whole model behind `payload`, which is placed at offset 0 so
/// the layouts in `image` can refer to it directly.
///
/// Consecutive track-at-once sessions need a declared track count to stay
/// separate, since only session info closes them.
pub fn write_image(image: &DiscImage, payload: &[u8]) -> Vec<u8> {
    let mut writer = ImageWriter::new(image.format_version);
    writer.payload(payload);
    for session in &image.sessions {
        writer.session(session);
    }
    if image.cd_text_bytes > 0 {
        writer.cd_text(&vec![0u8; image.cd_text_bytes as usize]);
    }
    if let Some(value) = image.media_type {
        writer.media_type(value);
    }
    if image.terminated {
        writer.end();
    }
    writer.finish()
}
