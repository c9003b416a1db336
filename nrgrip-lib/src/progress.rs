/// Progress update sent during extraction.
///
/// Delivered through a `&dyn Fn(ExtractProgress)` callback so the CLI can
/// drive a progress bar without the library knowing about terminals.
#[derive(Debug, Clone)]
pub enum ExtractProgress {
    /// Extraction has started
    Started {
        /// Tracks that will be attempted
        tracks: usize,
        /// Payload bytes across all tracks with a layout
        total_bytes: u64,
    },

    /// A track file is about to be written
    TrackStarted {
        number: u32,
        file_name: String,
        bytes: u64,
    },

    /// Bytes copied so far for the current track
    Copying {
        number: u32,
        bytes_done: u64,
        bytes_total: u64,
    },

    /// A track was written completely
    TrackFinished { number: u32, bytes: u64 },

    /// A track was abandoned
    TrackFailed { number: u32, message: String },

    /// A session cue sheet was written
    SidecarWritten { file_name: String },

    /// All tracks were attempted
    Completed { written: usize, failed: usize },
}

impl ExtractProgress {
    pub fn failed(number: u32, message: impl Into<String>) -> Self {
        Self::TrackFailed {
            number,
            message: message.into(),
        }
    }

    /// Returns the progress percentage (0.0 to 1.0) if calculable.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            Self::Copying {
                bytes_done,
                bytes_total,
                ..
            } if *bytes_total > 0 => Some(*bytes_done as f64 / *bytes_total as f64),
            Self::TrackFinished { .. } | Self::Completed { .. } => Some(1.0),
            _ => None,
        }
    }
}
