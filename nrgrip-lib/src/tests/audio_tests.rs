use super::*;
use nrgrip_core::TrackMode;

fn layout(mode: TrackMode) -> TrackLayout {
    TrackLayout {
        pregap_offset: 0,
        byte_offset: 0,
        length_bytes: 2352,
        sector_size: mode.sector_size(),
        mode,
    }
}

#[test]
fn wav_header_layout() {
    let h = wav_header(2352 * 75);
    assert_eq!(&h[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes(h[4..8].try_into().unwrap()), 36 + 176_400);
    assert_eq!(&h[8..16], b"WAVEfmt ");
    assert_eq!(u32::from_le_bytes(h[16..20].try_into().unwrap()), 16);
    assert_eq!(u16::from_le_bytes([h[20], h[21]]), 1);
    assert_eq!(u16::from_le_bytes([h[22], h[23]]), 2);
    assert_eq!(u32::from_le_bytes(h[24..28].try_into().unwrap()), 44_100);
    assert_eq!(u32::from_le_bytes(h[28..32].try_into().unwrap()), 176_400);
    assert_eq!(u16::from_le_bytes([h[32], h[33]]), 4);
    assert_eq!(u16::from_le_bytes([h[34], h[35]]), 16);
    assert_eq!(&h[36..40], b"data");
    assert_eq!(u32::from_le_bytes(h[40..44].try_into().unwrap()), 176_400);
}

#[test]
fn aiff_header_layout() {
    let h = aiff_header(2352 * 2);
    assert_eq!(&h[0..4], b"FORM");
    assert_eq!(u32::from_be_bytes(h[4..8].try_into().unwrap()), 46 + 4704);
    assert_eq!(&h[8..16], b"AIFFCOMM");
    assert_eq!(u32::from_be_bytes(h[16..20].try_into().unwrap()), 18);
    assert_eq!(u16::from_be_bytes([h[20], h[21]]), 2);
    // 4 bytes per stereo frame
    assert_eq!(u32::from_be_bytes(h[22..26].try_into().unwrap()), 1176);
    assert_eq!(u16::from_be_bytes([h[26], h[27]]), 16);
    assert_eq!(&h[28..30], &[0x40, 0x0E]);
    assert_eq!(&h[38..42], b"SSND");
    assert_eq!(u32::from_be_bytes(h[42..46].try_into().unwrap()), 4712);
    assert_eq!(&h[46..54], &[0u8; 8]);
}

#[test]
fn swap_sample_bytes_leaves_odd_tail() {
    let mut buf = [1, 2, 3, 4, 5];
    swap_sample_bytes(&mut buf);
    assert_eq!(buf, [2, 1, 4, 3, 5]);
}

#[test]
fn data_tracks_are_always_raw() {
    let data = layout(TrackMode::Mode1);
    let audio = layout(TrackMode::Audio);
    assert_eq!(OutputFormat::Wav.container_for(&data), Container::Raw);
    assert_eq!(OutputFormat::Aiff.container_for(&data), Container::Raw);
    assert_eq!(OutputFormat::Wav.container_for(&audio), Container::Wav);
    assert_eq!(OutputFormat::Raw.container_for(&audio), Container::Raw);
}

#[test]
fn raw_extension_depends_on_sector_size() {
    assert_eq!(Container::Raw.extension(&layout(TrackMode::Mode1)), "iso");
    assert_eq!(Container::Raw.extension(&layout(TrackMode::Mode2Form1)), "iso");
    assert_eq!(Container::Raw.extension(&layout(TrackMode::Mode2Raw)), "bin");
    assert_eq!(Container::Raw.extension(&layout(TrackMode::Audio)), "bin");
    assert_eq!(Container::Aiff.extension(&layout(TrackMode::Audio)), "aiff");
}

#[test]
fn output_format_parses_and_displays() {
    assert_eq!("WAV".parse(), Ok(OutputFormat::Wav));
    assert_eq!("aif".parse(), Ok(OutputFormat::Aiff));
    assert_eq!("bin".parse(), Ok(OutputFormat::Raw));
    assert!("flac".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::Aiff.to_string(), "aiff");
    assert_eq!(OutputFormat::default(), OutputFormat::Wav);
}

#[test]
fn aiff_prepares_big_endian_samples() {
    let mut buf = [0x34, 0x12, 0x78, 0x56];
    Container::Wav.prepare_samples(&mut buf);
    assert_eq!(buf, [0x34, 0x12, 0x78, 0x56]);
    Container::Aiff.prepare_samples(&mut buf);
    assert_eq!(buf, [0x12, 0x34, 0x56, 0x78]);
}
