//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use nrgrip_lib::{OutputFormat, SessionModeCheck};

#[derive(Parser)]
#[command(name = "nrgrip")]
#[command(about = "Inspect and extract tracks from Nero (.nrg) disc images", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Cue-sheet strictness flags shared by commands that parse an image.
#[derive(Args, Clone, Default)]
pub(crate) struct ParseArgs {
    /// Check every cue sheet's lead-out mode byte, whatever the image version
    #[arg(long, conflicts_with = "lenient_session_mode")]
    pub strict_session_mode: bool,

    /// Never check the cue sheet lead-out mode byte
    #[arg(long)]
    pub lenient_session_mode: bool,
}

impl ParseArgs {
    pub fn session_mode_check(&self) -> Option<SessionModeCheck> {
        if self.strict_session_mode {
            Some(SessionModeCheck::Always)
        } else if self.lenient_session_mode {
            Some(SessionModeCheck::Never)
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the sessions and tracks of an image
    Info {
        /// Image file to read
        image: PathBuf,

        /// Print the parsed disc model as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Extract every track into its own file
    Extract {
        /// Image file to read
        image: PathBuf,

        /// Output directory (default: a directory named after the image, next to it)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format for audio tracks: raw, wav or aiff
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Start each track at index 0 so the pre-gap is included
        #[arg(long)]
        include_pregap: bool,

        /// Don't write per-session cue sheets
        #[arg(long)]
        no_cue: bool,

        /// Compute a CRC32 of each extracted track
        #[arg(long)]
        checksum: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,
}
