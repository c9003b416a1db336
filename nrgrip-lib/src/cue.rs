//! Per-session cue sheet sidecars.
//!
//! Every track lives in its own file, so index positions are relative to
//! the start of that file rather than to the disc.

use nrgrip_core::{Msf, Session, Track};

use crate::extract::ExtractOptions;

/// A written track file to list in a cue sheet.
#[derive(Debug, Clone)]
pub struct CueFile<'a> {
    pub track: &'a Track,
    pub file_name: String,
}

/// Render the cue sheet for one session. Tracks without a layout are left out.
pub fn render_cue_sheet(
    session: &Session,
    files: &[CueFile<'_>],
    options: &ExtractOptions,
) -> String {
    let mut lines = vec![format!(
        "REM SESSION {:02} {}",
        session.number,
        session.burn_mode.short_name()
    )];
    if let Some(catalog) = session.dao.as_ref().and_then(|d| d.catalog_number.as_deref()) {
        lines.push(format!("CATALOG {}", catalog));
    }

    for file in files {
        let Some(layout) = file.track.layout.as_ref() else {
            continue;
        };
        let container = options.format.container_for(layout);
        let pregap = u32::try_from(layout.pregap_sectors())
            .ok()
            .and_then(Msf::from_frames)
            .unwrap_or(Msf::new(0, 0, 0));
        let has_pregap = layout.pregap_bytes() > 0;

        lines.push(format!(
            "FILE \"{}\" {}",
            file.file_name,
            container.cue_file_type()
        ));
        lines.push(format!(
            "  TRACK {:02} {}",
            file.track.number,
            layout.mode.cue_keyword()
        ));
        if let Some(isrc) = &file.track.isrc {
            lines.push(format!("    ISRC {}", isrc));
        }
        if options.include_pregap && has_pregap {
            lines.push("    INDEX 00 00:00:00".to_string());
            lines.push(format!("    INDEX 01 {}", pregap));
        } else {
            if has_pregap {
                lines.push(format!("    PREGAP {}", pregap));
            }
            lines.push("    INDEX 01 00:00:00".to_string());
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
#[path = "tests/cue_tests.rs"]
mod tests;
