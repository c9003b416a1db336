use super::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::rc::Rc;

use nrgrip_core::{BurnMode, FormatVersion, TrackMode};

use crate::audio::{AIFF_HEADER_LEN, WAV_HEADER_LEN};

/// In-memory sink. Writes to `fail_on` error out after `fail_after` bytes.
#[derive(Default)]
struct MemSink {
    files: BTreeMap<String, Rc<RefCell<Vec<u8>>>>,
    fail_on: Option<String>,
    fail_after: usize,
    discarded: Vec<String>,
}

struct MemFile {
    data: Rc<RefCell<Vec<u8>>>,
    limit: Option<usize>,
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = self.data.borrow_mut();
        if let Some(limit) = self.limit {
            if data.len() + buf.len() > limit {
                return Err(io::Error::other("disk full"));
            }
        }
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl OutputSink for MemSink {
    fn create(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let data = Rc::new(RefCell::new(Vec::new()));
        self.files.insert(name.to_string(), data.clone());
        let limit = (self.fail_on.as_deref() == Some(name)).then_some(self.fail_after);
        Ok(Box::new(MemFile { data, limit }))
    }

    fn discard(&mut self, name: &str) -> io::Result<()> {
        self.files.remove(name);
        self.discarded.push(name.to_string());
        Ok(())
    }
}

impl MemSink {
    fn contents(&self, name: &str) -> Vec<u8> {
        self.files
            .get(name)
            .map(|d| d.borrow().clone())
            .unwrap_or_else(|| panic!("no file named {}", name))
    }
}

fn track(number: u32, mode: TrackMode, pregap: u64, offset: u64, sectors: u64) -> Track {
    let sector_size = mode.sector_size();
    Track {
        number,
        pretrack_mode: mode.cue_mode_byte(),
        pretrack_lba: 0,
        track_mode: mode.cue_mode_byte(),
        track_lba: 0,
        isrc: None,
        layout: Some(TrackLayout {
            pregap_offset: offset - pregap,
            byte_offset: offset,
            length_bytes: sectors * sector_size as u64,
            sector_size,
            mode,
        }),
    }
}

/// One session: audio track with a one-sector pregap, then a data track.
fn fixture() -> (DiscImage, Vec<u8>) {
    let audio_len = 3 * 2352;
    let data_len = 2 * 2048;
    let payload: Vec<u8> = (0..audio_len + data_len).map(|i| (i % 253) as u8).collect();

    let mut image = DiscImage::new(FormatVersion::V2, payload.len() as u64);
    image.sessions.push(Session {
        number: 1,
        burn_mode: BurnMode::DiscAtOnce,
        session_mode: 0x01,
        start_lba: -150,
        end_lba: 5,
        tracks: vec![
            track(1, TrackMode::Audio, 2352, 2352, 2),
            track(2, TrackMode::Mode1, 0, audio_len as u64, 2),
        ],
        dao: None,
        declared_track_count: None,
    });
    (image, payload)
}

fn run(
    image: &DiscImage,
    payload: &[u8],
    options: &ExtractOptions,
    sink: &mut MemSink,
) -> ExtractSummary {
    let mut source = Cursor::new(payload.to_vec());
    extract_image(&mut source, image, options, sink, &|_| {}).unwrap()
}

#[test]
fn writes_one_file_per_track_and_a_cue_sheet() {
    let (image, payload) = fixture();
    let mut sink = MemSink::default();
    let summary = run(&image, &payload, &ExtractOptions::new("disc"), &mut sink);

    assert!(summary.is_complete());
    assert_eq!(
        sink.files.keys().cloned().collect::<Vec<_>>(),
        vec!["disc-session01.cue", "disc-track01.wav", "disc-track02.iso"]
    );
    assert_eq!(summary.sidecars, vec!["disc-session01.cue"]);

    let wav = sink.contents("disc-track01.wav");
    assert_eq!(wav.len(), WAV_HEADER_LEN + 2 * 2352);
    assert_eq!(&wav[..4], b"RIFF");
    assert_eq!(&wav[WAV_HEADER_LEN..], &payload[2352..3 * 2352]);

    let iso = sink.contents("disc-track02.iso");
    assert_eq!(iso, &payload[3 * 2352..]);
    assert_eq!(summary.total_bytes(), 2 * 2352 + 2 * 2048);
}

#[test]
fn include_pregap_starts_at_index_zero() {
    let (image, payload) = fixture();
    let mut options = ExtractOptions::new("disc");
    options.include_pregap = true;
    options.format = OutputFormat::Raw;
    let mut sink = MemSink::default();
    run(&image, &payload, &options, &mut sink);

    let bin = sink.contents("disc-track01.bin");
    assert_eq!(bin, &payload[..3 * 2352]);
}

#[test]
fn aiff_output_swaps_samples() {
    let (image, payload) = fixture();
    let mut options = ExtractOptions::new("disc");
    options.format = OutputFormat::Aiff;
    let mut sink = MemSink::default();
    run(&image, &payload, &options, &mut sink);

    let aiff = sink.contents("disc-track01.aiff");
    assert_eq!(&aiff[..4], b"FORM");
    let samples = &aiff[AIFF_HEADER_LEN..];
    assert_eq!(samples[0], payload[2353]);
    assert_eq!(samples[1], payload[2352]);
    // Data tracks stay raw under every format
    assert_eq!(sink.contents("disc-track02.iso"), &payload[3 * 2352..]);
}

#[test]
fn checksum_covers_written_payload() {
    let (image, payload) = fixture();
    let mut options = ExtractOptions::new("disc");
    options.checksum = true;
    let mut sink = MemSink::default();
    let summary = run(&image, &payload, &options, &mut sink);

    assert_eq!(
        summary.written[1].crc32,
        Some(crc32fast::hash(&payload[3 * 2352..]))
    );
    assert_eq!(
        summary.written[0].crc32,
        Some(crc32fast::hash(&payload[2352..3 * 2352]))
    );
}

#[test]
fn write_failure_abandons_only_that_track() {
    let (mut image, payload) = fixture();
    image.sessions[0]
        .tracks
        .push(track(3, TrackMode::Mode1, 0, 3 * 2352, 1));
    let mut sink = MemSink {
        fail_on: Some("disc-track02.iso".into()),
        fail_after: 100,
        ..Default::default()
    };
    let summary = run(&image, &payload, &ExtractOptions::new("disc"), &mut sink);

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].number, 2);
    assert!(matches!(
        summary.failed[0].error,
        ExtractError::TrackIo { track: 2, .. }
    ));
    assert_eq!(sink.discarded, vec!["disc-track02.iso"]);
    assert!(!sink.files.contains_key("disc-track02.iso"));
    assert_eq!(sink.contents("disc-track03.iso"), &payload[3 * 2352..3 * 2352 + 2048]);

    let cue = String::from_utf8(sink.contents("disc-session01.cue")).unwrap();
    assert!(cue.contains("disc-track01.wav"));
    assert!(!cue.contains("disc-track02.iso"));
    assert!(cue.contains("disc-track03.iso"));
}

#[test]
fn track_without_layout_is_reported() {
    let (mut image, payload) = fixture();
    image.sessions[0].tracks[0].layout = None;
    let mut sink = MemSink::default();
    let summary = run(&image, &payload, &ExtractOptions::new("disc"), &mut sink);

    assert_eq!(summary.written.len(), 1);
    assert!(matches!(
        summary.failed[0].error,
        ExtractError::MissingLayout { track: 1 }
    ));
    assert!(sink.discarded.is_empty());
}

#[test]
fn payload_past_end_of_source_is_track_io() {
    let (mut image, payload) = fixture();
    if let Some(layout) = image.sessions[0].tracks[1].layout.as_mut() {
        layout.length_bytes += 2048;
    }
    let mut sink = MemSink::default();
    let summary = run(&image, &payload, &ExtractOptions::new("disc"), &mut sink);

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].error.track(), Some(2));
    assert!(!sink.files.contains_key("disc-track02.iso"));
}

#[test]
fn no_cue_option_skips_sidecars() {
    let (image, payload) = fixture();
    let mut options = ExtractOptions::new("disc");
    options.write_cue = false;
    let mut sink = MemSink::default();
    let summary = run(&image, &payload, &options, &mut sink);
    assert!(summary.sidecars.is_empty());
    assert_eq!(sink.files.len(), 2);
}

#[test]
fn progress_brackets_the_run() {
    let (image, payload) = fixture();
    let events = RefCell::new(Vec::new());
    let mut sink = MemSink::default();
    let mut source = Cursor::new(payload);
    extract_image(
        &mut source,
        &image,
        &ExtractOptions::new("disc"),
        &mut sink,
        &|p| events.borrow_mut().push(p),
    )
    .unwrap();

    let events = events.into_inner();
    assert!(matches!(
        events.first(),
        Some(ExtractProgress::Started {
            tracks: 2,
            total_bytes: 8800
        })
    ));
    assert!(matches!(
        events.last(),
        Some(ExtractProgress::Completed {
            written: 2,
            failed: 0
        })
    ));
    assert!(events.iter().any(|e| matches!(
        e,
        ExtractProgress::Copying {
            number: 2,
            bytes_done: 4096,
            bytes_total: 4096
        }
    )));
}
