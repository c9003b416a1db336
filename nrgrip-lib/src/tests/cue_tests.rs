use super::*;
use nrgrip_core::{BurnMode, DaoSummary, TrackLayout, TrackMode};

use crate::audio::OutputFormat;

fn track(number: u32, mode: TrackMode, pregap_sectors: u64) -> Track {
    let sector_size = mode.sector_size();
    let pregap = pregap_sectors * sector_size as u64;
    Track {
        number,
        pretrack_mode: mode.cue_mode_byte(),
        pretrack_lba: 0,
        track_mode: mode.cue_mode_byte(),
        track_lba: pregap_sectors as i32,
        isrc: None,
        layout: Some(TrackLayout {
            pregap_offset: 0,
            byte_offset: pregap,
            length_bytes: 10 * sector_size as u64,
            sector_size,
            mode,
        }),
    }
}

fn session(tracks: Vec<Track>) -> Session {
    Session {
        number: 1,
        burn_mode: BurnMode::DiscAtOnce,
        session_mode: 0x01,
        start_lba: -150,
        end_lba: 1000,
        tracks,
        dao: Some(DaoSummary {
            catalog_number: Some("0724384260927".into()),
            toc_type: 0,
            close_flag: 0,
            first_track: 1,
            last_track: 2,
        }),
        declared_track_count: None,
    }
}

#[test]
fn renders_pregap_as_pregap_command_by_default() {
    let mut audio = track(1, TrackMode::Audio, 150);
    audio.isrc = Some("USRC17607839".into());
    let data = track(2, TrackMode::Mode1, 0);
    let s = session(vec![audio, data]);
    let files = vec![
        CueFile {
            track: &s.tracks[0],
            file_name: "disc-track01.wav".into(),
        },
        CueFile {
            track: &s.tracks[1],
            file_name: "disc-track02.iso".into(),
        },
    ];

    let text = render_cue_sheet(&s, &files, &ExtractOptions::new("disc"));
    assert_eq!(
        text,
        "REM SESSION 01 DAO\n\
         CATALOG 0724384260927\n\
         FILE \"disc-track01.wav\" WAVE\n\
         \x20 TRACK 01 AUDIO\n\
         \x20   ISRC USRC17607839\n\
         \x20   PREGAP 00:02:00\n\
         \x20   INDEX 01 00:00:00\n\
         FILE \"disc-track02.iso\" BINARY\n\
         \x20 TRACK 02 MODE1/2048\n\
         \x20   INDEX 01 00:00:00\n"
    );
}

#[test]
fn included_pregap_becomes_index_zero() {
    let s = session(vec![track(1, TrackMode::Audio, 75)]);
    let files = vec![CueFile {
        track: &s.tracks[0],
        file_name: "disc-track01.aiff".into(),
    }];
    let mut options = ExtractOptions::new("disc");
    options.include_pregap = true;
    options.format = OutputFormat::Aiff;

    let text = render_cue_sheet(&s, &files, &options);
    assert!(text.contains("FILE \"disc-track01.aiff\" AIFF\n"));
    assert!(text.contains("    INDEX 00 00:00:00\n    INDEX 01 00:01:00\n"));
    assert!(!text.contains("PREGAP"));
}

#[test]
fn tracks_without_layout_are_left_out() {
    let mut bare = track(1, TrackMode::Audio, 0);
    bare.layout = None;
    let mut s = session(vec![bare]);
    s.dao = None;
    let files = vec![CueFile {
        track: &s.tracks[0],
        file_name: "disc-track01.wav".into(),
    }];
    let text = render_cue_sheet(&s, &files, &ExtractOptions::new("disc"));
    assert_eq!(text, "REM SESSION 01 DAO\n");
}
