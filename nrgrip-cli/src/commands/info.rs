use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nrgrip_core::util::format_bytes_approx;
use nrgrip_core::{Msf, Session, Track};
use nrgrip_lib::{DiscImage, Overrides, Settings, open_image};

use crate::CliError;
use crate::cli_types::ParseArgs;

/// Run the info command.
pub(crate) fn run_info(image_path: &Path, json: bool, parse: &ParseArgs) -> Result<(), CliError> {
    let overrides = Overrides {
        session_mode_check: parse.session_mode_check(),
        ..Default::default()
    };
    let effective = Settings::load()?.resolve(&overrides);
    let image = open_image(image_path, &effective.parse_options())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&image)?);
        return Ok(());
    }

    print_header(image_path, &image);
    for session in &image.sessions {
        crate::log_blank();
        print_session(session);
    }
    Ok(())
}

fn print_header(image_path: &Path, image: &DiscImage) {
    log::info!(
        "{}",
        image_path
            .display()
            .if_supports_color(Stdout, |t| t.bold())
    );
    log::info!(
        "  Format:     {} (chunks at 0x{:X})",
        image.format_version.name(),
        image.first_chunk_offset
    );
    log::info!(
        "  Sessions:   {}, {} track(s)",
        image.sessions.len(),
        image.track_count()
    );
    if let Some(media) = image.media_type {
        log::info!("  Media type: 0x{:08X}", media);
    }
    if image.cd_text_bytes > 0 {
        log::info!(
            "  CD-Text:    {} (not decoded)",
            format_bytes_approx(image.cd_text_bytes)
        );
    }
    if !image.terminated {
        log::warn!(
            "  {} No terminator chunk; the image may be incomplete",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
}

fn print_session(session: &Session) {
    log::info!(
        "{} {}  LBA {}..{}",
        format!("Session {:02}", session.number).if_supports_color(Stdout, |t| t.bold()),
        format!("[{} {}]", session.burn_mode.short_name(), session.mode().name())
            .if_supports_color(Stdout, |t| t.cyan()),
        session.start_lba,
        session.end_lba,
    );
    if let Some(dao) = &session.dao {
        if let Some(catalog) = &dao.catalog_number {
            log::info!("  Catalog: {}", catalog);
        }
    }
    if let Some(declared) = session.declared_track_count {
        if declared as usize != session.tracks.len() {
            log::warn!(
                "  {} Session info declares {} track(s), found {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                declared,
                session.tracks.len()
            );
        }
    }
    for track in &session.tracks {
        print_track(track);
    }
}

fn print_track(track: &Track) {
    let number = format!("Track {:02}", track.number);
    let Some(layout) = &track.layout else {
        log::info!(
            "  {}  {:<14} LBA {:>7}  {}",
            number,
            track.mode_name(),
            track.track_lba,
            "(no layout)".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    };

    let duration = u32::try_from(layout.sectors())
        .ok()
        .and_then(Msf::from_frames)
        .map(|m| m.to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let mut line = format!(
        "  {}  {:<14} LBA {:>7}  {}  {:>9}",
        number,
        layout.mode.to_string(),
        track.track_lba,
        duration,
        format_bytes_approx(layout.length_bytes),
    );
    if layout.pregap_sectors() > 0 {
        line.push_str(&format!("  pregap {}", layout.pregap_sectors()));
    }
    if let Some(isrc) = &track.isrc {
        line.push_str(&format!("  ISRC {}", isrc));
    }
    log::info!("{}", line);
}
