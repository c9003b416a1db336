//! nrgrip CLI
//!
//! Command-line interface for inspecting Nero disc images and extracting
//! their tracks.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Info { image, json, parse } => commands::info::run_info(&image, json, &parse),
        Commands::Extract {
            image,
            output_dir,
            format,
            include_pregap,
            no_cue,
            checksum,
            parse,
        } => {
            let overrides = nrgrip_lib::Overrides {
                format,
                output_dir,
                include_pregap: include_pregap.then_some(true),
                cue: no_cue.then_some(false),
                checksum: checksum.then_some(true),
                session_mode_check: parse.session_mode_check(),
            };
            commands::extract::run_extract(&image, &overrides, cli.quiet)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        if e.is_format_error() {
            log::error!("The image is damaged or uses a layout nrgrip does not understand.");
        }
        std::process::exit(1);
    }
}

/// Install the logger. `RUST_LOG`, when set, overrides the flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis().format_module_path(true);
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.parse_default_env();
    builder.init();
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
