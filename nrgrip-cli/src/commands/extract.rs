use std::cell::Cell;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nrgrip_core::util::format_bytes_approx;
use nrgrip_lib::{
    ExtractProgress, ExtractSummary, FsSink, Overrides, Settings, extract_image, open_image,
};

use crate::CliError;

/// Run the extract command.
pub(crate) fn run_extract(
    image_path: &Path,
    overrides: &Overrides,
    quiet: bool,
) -> Result<(), CliError> {
    let effective = Settings::load()?.resolve(overrides);
    let image = open_image(image_path, &effective.parse_options())?;
    let options = effective.extract_options(image_path);
    let mut sink = FsSink::new(effective.output_dir_for(image_path))?;

    log::info!(
        "Extracting {} track(s) from {}",
        image.track_count(),
        image_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if image.has_audio() {
        log::info!(
            "  into {}  (audio as {})",
            sink.dir().display().if_supports_color(Stdout, |t| t.cyan()),
            options.format,
        );
    } else {
        log::info!(
            "  into {}",
            sink.dir().display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    crate::log_blank();

    let mut source = std::fs::File::open(image_path)?;

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}",
            )
            .expect("static pattern")
            .progress_chars("=> "),
        );
        pb
    };
    let finished_bytes = Cell::new(0u64);

    let progress_callback = |progress: ExtractProgress| match progress {
        ExtractProgress::Started { total_bytes, .. } => {
            pb.set_length(total_bytes);
        }
        ExtractProgress::TrackStarted { ref file_name, .. } => {
            pb.set_message(file_name.clone());
        }
        ExtractProgress::Copying { bytes_done, .. } => {
            pb.set_position(finished_bytes.get() + bytes_done);
        }
        ExtractProgress::TrackFinished { number, bytes } => {
            finished_bytes.set(finished_bytes.get() + bytes);
            pb.set_position(finished_bytes.get());
            pb.println(format!(
                "  {} Track {:02} ({})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                number,
                format_bytes_approx(bytes),
            ));
        }
        ExtractProgress::TrackFailed { number, .. } => {
            pb.println(format!(
                "  {} Track {:02}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                number,
            ));
        }
        ExtractProgress::SidecarWritten { ref file_name } => {
            log::debug!("wrote {}", file_name);
        }
        ExtractProgress::Completed { .. } => {
            pb.finish_and_clear();
        }
    };

    let summary = extract_image(&mut source, &image, &options, &mut sink, &progress_callback)?;
    print_summary(&summary);

    if summary.is_complete() {
        Ok(())
    } else {
        Err(CliError::TracksFailed(summary.failed.len()))
    }
}

fn print_summary(summary: &ExtractSummary) {
    for outcome in &summary.written {
        match outcome.crc32 {
            Some(crc) => log::info!(
                "  {}  {}",
                outcome.file_name,
                format!("CRC32 {:08X}", crc).if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::debug!("  {}", outcome.file_name),
        }
    }
    for sidecar in &summary.sidecars {
        log::info!(
            "  {} {}",
            sidecar,
            "(cue sheet)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for failure in &summary.failed {
        log::warn!(
            "  {} Track {:02}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            failure.number,
            failure.error,
        );
    }

    crate::log_blank();
    let written = format!(
        "{} written ({})",
        summary.written.len(),
        format_bytes_approx(summary.total_bytes())
    );
    if summary.is_complete() {
        log::info!("{}", written.if_supports_color(Stdout, |t| t.green()));
    } else {
        log::info!(
            "{}, {}",
            written,
            format!("{} failed", summary.failed.len()).if_supports_color(Stdout, |t| t.red()),
        );
    }
}
