//! Accumulates decoded chunks into a [`DiscImage`].
//!
//! The builder is the only place sessions and tracks are created. It owns
//! the running global track counter and the index of the session currently
//! accepting tracks.

use nrgrip_core::util::sector_count;
use nrgrip_core::{BurnMode, DiscImage, FormatVersion, NrgError, Session, Track, TrackLayout};

use crate::chunk::{Chunk, ChunkHeader, CueSheetChunk, DaoInfoChunk, TrackInfoEntry};

/// Handle to a session inside the image under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(usize);

/// Fields of a track about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub number: u32,
    pub pretrack_mode: u8,
    pub pretrack_lba: i32,
    pub track_mode: u8,
    pub track_lba: i32,
    pub layout: Option<TrackLayout>,
}

impl NewTrack {
    fn from_track_info(number: u32, entry: &TrackInfoEntry) -> Self {
        let mode_byte = entry.mode.cue_mode_byte();
        Self {
            number,
            pretrack_mode: mode_byte,
            pretrack_lba: entry.start_lba,
            track_mode: mode_byte,
            track_lba: entry.start_lba,
            layout: Some(TrackLayout {
                pregap_offset: entry.offset,
                byte_offset: entry.offset,
                length_bytes: entry.length,
                sector_size: entry.mode.sector_size(),
                mode: entry.mode,
            }),
        }
    }
}

/// Builds a [`DiscImage`] from decoded chunks, in stream order.
pub struct DiscBuilder {
    image: DiscImage,
    /// Session still accepting tracks, if any.
    open: Option<SessionId>,
    next_track: u32,
    /// Offset of the chunk being applied, for diagnostics.
    chunk_offset: u64,
}

impl DiscBuilder {
    pub fn new(version: FormatVersion, first_chunk_offset: u64) -> Self {
        Self {
            image: DiscImage::new(version, first_chunk_offset),
            open: None,
            next_track: 1,
            chunk_offset: first_chunk_offset,
        }
    }

    /// Number the next appended track must carry.
    pub fn next_track_number(&self) -> u32 {
        self.next_track
    }

    pub fn image(&self) -> &DiscImage {
        &self.image
    }

    /// Start a new session and make it the append target.
    ///
    /// A session left open by track-at-once records is closed first.
    pub fn open_session(
        &mut self,
        burn_mode: BurnMode,
        session_mode: u8,
        start_lba: i32,
    ) -> SessionId {
        if let Some(previous) = self.open.take() {
            log::debug!("closing session {} implicitly", previous.0 + 1);
            self.finalize(previous, None);
        }

        let id = SessionId(self.image.sessions.len());
        self.image.sessions.push(Session {
            number: id.0 as u32 + 1,
            burn_mode,
            session_mode,
            start_lba,
            end_lba: start_lba,
            tracks: Vec::new(),
            dao: None,
            declared_track_count: None,
        });
        self.open = Some(id);
        id
    }

    /// Append a track to the open session.
    ///
    /// Fails with `OrphanTrack` if `session` is not the open session and with
    /// `StructuralMismatch` if the number breaks the global sequence.
    pub fn append_track(&mut self, session: SessionId, track: NewTrack) -> Result<u32, NrgError> {
        if self.open != Some(session) {
            return Err(NrgError::orphan(
                self.chunk_offset,
                format!("track {} has no open session", track.number),
            ));
        }
        if track.number != self.next_track {
            return Err(NrgError::mismatch(
                self.chunk_offset,
                format!(
                    "track number {} breaks the sequence, expected {}",
                    track.number, self.next_track
                ),
            ));
        }

        let number = track.number;
        self.image.sessions[session.0].tracks.push(Track {
            number,
            pretrack_mode: track.pretrack_mode,
            pretrack_lba: track.pretrack_lba,
            track_mode: track.track_mode,
            track_lba: track.track_lba,
            isrc: None,
            layout: track.layout,
        });
        self.next_track += 1;
        Ok(number)
    }

    /// Close the open session. With no `end_lba`, the end is computed from
    /// the last track's start and length.
    pub fn close_session(&mut self, session: SessionId, end_lba: Option<i32>) -> Result<(), NrgError> {
        if self.open != Some(session) {
            return Err(NrgError::mismatch(
                self.chunk_offset,
                format!("session {} is not open", session.0 + 1),
            ));
        }
        self.open = None;
        self.finalize(session, end_lba);
        Ok(())
    }

    fn finalize(&mut self, session: SessionId, end_lba: Option<i32>) {
        let s = &mut self.image.sessions[session.0];
        s.end_lba = end_lba.unwrap_or_else(|| computed_end_lba(s));
    }

    /// Apply one decoded chunk.
    pub fn apply(&mut self, chunk: Chunk, header: &ChunkHeader) -> Result<(), NrgError> {
        self.chunk_offset = header.offset;
        match chunk {
            Chunk::CueSheet(cue) => self.apply_cue_sheet(cue),
            Chunk::DaoInfo(dao) => self.merge_dao(dao),
            Chunk::CdText { size } => {
                self.image.cd_text_bytes += size as u64;
                Ok(())
            }
            Chunk::TrackInfo(entries) => self.apply_track_info(&entries),
            Chunk::SessionInfo { track_count } => {
                self.apply_session_info(track_count);
                Ok(())
            }
            Chunk::MediaType(value) => {
                self.image.media_type = Some(value);
                Ok(())
            }
            Chunk::End => Ok(()),
        }
    }

    fn apply_cue_sheet(&mut self, cue: CueSheetChunk) -> Result<(), NrgError> {
        let id = self.open_session(BurnMode::DiscAtOnce, cue.session_mode, cue.start_lba);
        for entry in cue.tracks {
            self.append_track(
                id,
                NewTrack {
                    number: entry.number,
                    pretrack_mode: entry.pretrack.mode,
                    pretrack_lba: entry.pretrack.lba,
                    track_mode: entry.start.mode,
                    track_lba: entry.start.lba,
                    layout: None,
                },
            )?;
        }
        self.close_session(id, Some(cue.end_lba))
    }

    /// Merge DAO records into the most recently opened session's tracks.
    fn merge_dao(&mut self, dao: DaoInfoChunk) -> Result<(), NrgError> {
        let offset = self.chunk_offset;
        let session = self
            .image
            .sessions
            .last_mut()
            .ok_or_else(|| NrgError::orphan(offset, "DAO information before any session"))?;

        if dao.tracks.len() != session.tracks.len() {
            return Err(NrgError::mismatch(
                offset,
                format!(
                    "DAO information lists {} track(s), session {} has {}",
                    dao.tracks.len(),
                    session.number,
                    session.tracks.len()
                ),
            ));
        }

        let first = session.first_track_number().unwrap_or(0);
        let last = session.last_track_number().unwrap_or(0);
        if dao.summary.first_track as u32 != first || dao.summary.last_track as u32 != last {
            log::warn!(
                "DAO information names tracks {}..={}, session {} holds {}..={}",
                dao.summary.first_track,
                dao.summary.last_track,
                session.number,
                first,
                last
            );
        }
        if session.dao.is_some() {
            log::warn!(
                "session {} already has DAO information; replacing it",
                session.number
            );
        }

        for (track, entry) in session.tracks.iter_mut().zip(dao.tracks) {
            track.isrc = entry.isrc;
            track.layout = Some(TrackLayout {
                pregap_offset: entry.index0,
                byte_offset: entry.index1,
                length_bytes: entry.next - entry.index1,
                sector_size: entry.sector_size as u32,
                mode: entry.mode,
            });
        }
        session.dao = Some(dao.summary);
        Ok(())
    }

    /// Each record becomes a new track in the open track-at-once session.
    fn apply_track_info(&mut self, entries: &[TrackInfoEntry]) -> Result<(), NrgError> {
        for entry in entries {
            let open_tao = self
                .open
                .filter(|id| self.image.sessions[id.0].burn_mode == BurnMode::TrackAtOnce);
            let id = match open_tao {
                Some(id) => id,
                None => self.open_session(
                    BurnMode::TrackAtOnce,
                    entry.mode.cue_mode_byte(),
                    entry.start_lba,
                ),
            };
            let number = self.next_track;
            self.append_track(id, NewTrack::from_track_info(number, entry))?;
        }
        Ok(())
    }

    /// Record the declared track count and end an open track-at-once session.
    fn apply_session_info(&mut self, track_count: u32) {
        let target = match self.open.take() {
            Some(id) => {
                self.finalize(id, None);
                id.0
            }
            None => match self.image.sessions.len() {
                0 => {
                    log::warn!("session info chunk with no session; ignoring");
                    return;
                }
                n => n - 1,
            },
        };

        let session = &mut self.image.sessions[target];
        if session.tracks.len() as u32 != track_count {
            log::warn!(
                "session {} declares {} track(s) but holds {}",
                session.number,
                track_count,
                session.tracks.len()
            );
        }
        session.declared_track_count = Some(track_count);
    }

    /// Close anything still open and hand over the finished image.
    pub fn finish(mut self, terminated: bool) -> DiscImage {
        if let Some(id) = self.open.take() {
            self.finalize(id, None);
        }
        self.image.terminated = terminated;
        self.image
    }
}

/// End LBA of a session derived from its last track.
fn computed_end_lba(session: &Session) -> i32 {
    match session.tracks.last() {
        Some(track) => {
            let sectors = track.layout.as_ref().map_or(0, |l| {
                sector_count(l.length_bytes, l.sector_size)
            });
            track.track_lba.saturating_add(sectors.min(i32::MAX as u64) as i32)
        }
        None => session.start_lba,
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
