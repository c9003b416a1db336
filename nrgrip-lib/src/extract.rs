//! Copy each track of a parsed image into its own file.
//!
//! Tracks are written in stored order. A failure while copying one track
//! abandons that track's output and moves on to the next; nothing short of
//! an unreadable source stops the run.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, SeekFrom, Write};
use std::path::{Path, PathBuf};

use nrgrip_core::{DiscImage, ReadSeek, Session, Track, TrackLayout};

use crate::audio::{Container, OutputFormat};
use crate::cue::{CueFile, render_cue_sheet};
use crate::error::ExtractError;
use crate::progress::ExtractProgress;

/// Options controlling what gets written.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Prefix for every output file name
    pub base_name: String,
    pub format: OutputFormat,
    /// Start copying at index 0 instead of index 1
    pub include_pregap: bool,
    /// Write one cue sheet per session
    pub write_cue: bool,
    /// Compute a CRC32 of each written payload
    pub checksum: bool,
}

impl ExtractOptions {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            format: OutputFormat::default(),
            include_pregap: false,
            write_cue: true,
            checksum: false,
        }
    }

    pub fn track_file_name(&self, number: u32, container: Container, layout: &TrackLayout) -> String {
        format!(
            "{}-track{:02}.{}",
            self.base_name,
            number,
            container.extension(layout)
        )
    }

    pub fn cue_file_name(&self, session: u32) -> String {
        format!("{}-session{:02}.cue", self.base_name, session)
    }

    /// Byte range copied for a track under these options.
    pub fn copy_range(&self, layout: &TrackLayout) -> (u64, u64) {
        if self.include_pregap {
            (layout.pregap_offset, layout.pregap_bytes() + layout.length_bytes)
        } else {
            (layout.byte_offset, layout.length_bytes)
        }
    }
}

/// Where output files are created.
pub trait OutputSink {
    /// Create (or truncate) an output file.
    fn create(&mut self, name: &str) -> io::Result<Box<dyn Write>>;

    /// Remove a partially written output file.
    fn discard(&mut self, name: &str) -> io::Result<()>;
}

/// Sink writing into a directory on disk.
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for FsSink {
    fn create(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let file = File::create(self.dir.join(name))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn discard(&mut self, name: &str) -> io::Result<()> {
        match fs::remove_file(self.dir.join(name)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// A track written in full.
#[derive(Debug, Clone)]
pub struct TrackOutcome {
    pub number: u32,
    pub file_name: String,
    /// Payload bytes, excluding any container header
    pub bytes: u64,
    pub crc32: Option<u32>,
}

/// A track that could not be written.
#[derive(Debug)]
pub struct TrackFailure {
    pub number: u32,
    pub error: ExtractError,
}

/// Summary of an extraction run.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub written: Vec<TrackOutcome>,
    pub failed: Vec<TrackFailure>,
    /// Cue sheet file names, one per session with at least one written track
    pub sidecars: Vec<String>,
}

impl ExtractSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.written.iter().map(|t| t.bytes).sum()
    }
}

const COPY_SECTORS: u64 = 32;

/// Extract every track of `image` from `source`.
pub fn extract_image(
    source: &mut dyn ReadSeek,
    image: &DiscImage,
    options: &ExtractOptions,
    sink: &mut dyn OutputSink,
    progress: &dyn Fn(ExtractProgress),
) -> Result<ExtractSummary, ExtractError> {
    let source_len = source.seek(SeekFrom::End(0))?;
    let total_bytes = image
        .tracks()
        .filter_map(|(_, t)| t.layout.as_ref())
        .map(|l| options.copy_range(l).1)
        .sum();
    progress(ExtractProgress::Started {
        tracks: image.track_count(),
        total_bytes,
    });

    let mut summary = ExtractSummary::default();
    for session in &image.sessions {
        let mut cue_files = Vec::new();
        for track in &session.tracks {
            match extract_track(source, source_len, track, options, sink, progress) {
                Ok(outcome) => {
                    progress(ExtractProgress::TrackFinished {
                        number: outcome.number,
                        bytes: outcome.bytes,
                    });
                    cue_files.push(CueFile {
                        track,
                        file_name: outcome.file_name.clone(),
                    });
                    summary.written.push(outcome);
                }
                Err(error) => {
                    log::warn!("{}", error);
                    progress(ExtractProgress::failed(track.number, error.to_string()));
                    summary.failed.push(TrackFailure {
                        number: track.number,
                        error,
                    });
                }
            }
        }

        if options.write_cue && !cue_files.is_empty() {
            if let Some(name) = write_sidecar(session, &cue_files, options, sink) {
                progress(ExtractProgress::SidecarWritten {
                    file_name: name.clone(),
                });
                summary.sidecars.push(name);
            }
        }
    }

    progress(ExtractProgress::Completed {
        written: summary.written.len(),
        failed: summary.failed.len(),
    });
    Ok(summary)
}

fn extract_track(
    source: &mut dyn ReadSeek,
    source_len: u64,
    track: &Track,
    options: &ExtractOptions,
    sink: &mut dyn OutputSink,
    progress: &dyn Fn(ExtractProgress),
) -> Result<TrackOutcome, ExtractError> {
    let number = track.number;
    let layout = track
        .layout
        .as_ref()
        .ok_or(ExtractError::MissingLayout { track: number })?;
    let container = options.format.container_for(layout);
    let file_name = options.track_file_name(number, container, layout);
    let (start, len) = options.copy_range(layout);

    if start.saturating_add(len) > source_len {
        return Err(ExtractError::track_io(
            number,
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "payload 0x{:X}+{} runs past the end of the image ({} bytes)",
                    start, len, source_len
                ),
            ),
        ));
    }
    let header_len = match container {
        Container::Raw => 0,
        _ => u32::try_from(len).map_err(|_| {
            ExtractError::track_io(
                number,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} bytes of audio do not fit a 32-bit container size", len),
                ),
            )
        })?,
    };

    progress(ExtractProgress::TrackStarted {
        number,
        file_name: file_name.clone(),
        bytes: len,
    });
    log::debug!(
        "track {:02}: {} bytes from 0x{:X} -> {}",
        number,
        len,
        start,
        file_name
    );

    let mut out = sink
        .create(&file_name)
        .map_err(|e| ExtractError::track_io(number, e))?;
    let copied = copy_payload(
        source,
        &mut *out,
        CopyJob {
            number,
            start,
            len,
            sector_size: layout.sector_size,
            container,
            header_len,
            checksum: options.checksum,
        },
        progress,
    )
    .and_then(|crc| out.flush().map(|_| crc));
    drop(out);

    match copied {
        Ok(crc32) => Ok(TrackOutcome {
            number,
            file_name,
            bytes: len,
            crc32,
        }),
        Err(e) => {
            if let Err(discard) = sink.discard(&file_name) {
                log::warn!("could not remove partial {}: {}", file_name, discard);
            }
            Err(ExtractError::track_io(number, e))
        }
    }
}

struct CopyJob {
    number: u32,
    start: u64,
    len: u64,
    sector_size: u32,
    container: Container,
    /// Payload size written into the container header
    header_len: u32,
    checksum: bool,
}

/// Copy one track's bytes, returning the CRC32 of what was written.
fn copy_payload(
    source: &mut dyn ReadSeek,
    out: &mut dyn Write,
    job: CopyJob,
    progress: &dyn Fn(ExtractProgress),
) -> io::Result<Option<u32>> {
    job.container.write_header(out, job.header_len)?;
    source.seek(SeekFrom::Start(job.start))?;

    let block = job.sector_size.max(1) as u64 * COPY_SECTORS;
    let mut buf = vec![0u8; block as usize];
    let mut hasher = job.checksum.then(crc32fast::Hasher::new);
    let mut done = 0u64;

    while done < job.len {
        let n = (job.len - done).min(block) as usize;
        source.read_exact(&mut buf[..n])?;
        job.container.prepare_samples(&mut buf[..n]);
        if let Some(h) = hasher.as_mut() {
            h.update(&buf[..n]);
        }
        out.write_all(&buf[..n])?;
        done += n as u64;
        progress(ExtractProgress::Copying {
            number: job.number,
            bytes_done: done,
            bytes_total: job.len,
        });
    }

    Ok(hasher.map(|h| h.finalize()))
}

/// Write a session's cue sheet; failures only cost the sidecar.
fn write_sidecar(
    session: &Session,
    files: &[CueFile<'_>],
    options: &ExtractOptions,
    sink: &mut dyn OutputSink,
) -> Option<String> {
    let name = options.cue_file_name(session.number);
    let text = render_cue_sheet(session, files, options);
    let written = sink.create(&name).and_then(|mut out| {
        out.write_all(text.as_bytes())?;
        out.flush()
    });
    match written {
        Ok(()) => Some(name),
        Err(e) => {
            log::warn!("could not write {}: {}", name, e);
            if let Err(e) = sink.discard(&name) {
                log::debug!("could not remove partial {}: {}", name, e);
            }
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
