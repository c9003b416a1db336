use nrgrip_core::NrgError;
use thiserror::Error;

/// Errors that can occur while extracting tracks from a parsed image.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// I/O error outside any single track
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be parsed
    #[error(transparent)]
    Parse(#[from] NrgError),

    /// The settings file could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// Copying one track failed; the rest of the run continues
    #[error("Track {track:02}: {source}")]
    TrackIo {
        track: u32,
        #[source]
        source: std::io::Error,
    },

    /// The track has no byte layout to copy from
    #[error("Track {track:02}: no payload layout (cue sheet without DAO information)")]
    MissingLayout { track: u32 },
}

impl ExtractError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn track_io(track: u32, source: std::io::Error) -> Self {
        Self::TrackIo { track, source }
    }

    /// Number of the track this error belongs to, if any.
    pub fn track(&self) -> Option<u32> {
        match self {
            Self::TrackIo { track, .. } | Self::MissingLayout { track } => Some(*track),
            _ => None,
        }
    }
}
