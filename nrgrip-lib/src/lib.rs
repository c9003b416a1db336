//! Extraction on top of the Nero image parser: per-track files, audio
//! containers, cue sheet sidecars and user settings.

pub mod audio;
pub mod cue;
pub mod error;
pub mod extract;
pub mod progress;
pub mod settings;

pub use audio::{Container, OutputFormat};
pub use error::ExtractError;
pub use extract::{
    ExtractOptions, ExtractSummary, FsSink, OutputSink, TrackFailure, TrackOutcome, extract_image,
};
pub use progress::ExtractProgress;
pub use settings::{EffectiveSettings, Overrides, Settings, settings_path};

pub use nrgrip_core::{DiscImage, NrgError};
pub use nrgrip_nero::{ParseOptions, SessionModeCheck, open_image, parse_image};
