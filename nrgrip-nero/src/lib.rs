//! Reader for Nero (`.nrg`) disc images.
//!
//! An image is raw track data followed by a chunk stream and a footer. The
//! footer gives the format version and the offset of the first chunk; the
//! chunks describe sessions and tracks and where their bytes live.
//!
//! ```no_run
//! use nrgrip_nero::{ParseOptions, open_image};
//!
//! let image = open_image("disc.nrg".as_ref(), &ParseOptions::default())?;
//! for (session, track) in image.tracks() {
//!     println!("session {} track {:02}", session.number, track.number);
//! }
//! # Ok::<(), nrgrip_core::NrgError>(())
//! ```

pub mod builder;
pub mod chunk;
pub mod footer;
pub mod options;
pub mod parser;

#[cfg(any(test, feature = "synth"))]
pub mod synth;

pub use builder::{DiscBuilder, NewTrack, SessionId};
pub use chunk::{Chunk, ChunkHeader, ChunkKind};
pub use footer::{Footer, detect_footer};
pub use options::{ParseOptions, SessionModeCheck};
pub use parser::{can_handle, open_image, parse_image};
