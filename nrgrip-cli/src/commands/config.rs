use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nrgrip_lib::{Overrides, Settings, settings_path};

use crate::CliError;

/// Show the effective settings and the file they were read from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "nrgrip Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let settings = Settings::load_from(&path)?;
    let effective = settings.resolve(&Overrides::default());
    let rendered = effective.to_toml().map_err(|e| CliError::config(e.to_string()))?;
    for line in rendered.lines() {
        log::info!("  {}", line);
    }
    if effective.output_dir.is_none() {
        log::info!(
            "  {}",
            "# output_dir unset: tracks go next to each image".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}
