//! Core types for reading Nero disc images: the disc model, the
//! positioned byte reader, MSF addressing and the parse error taxonomy.

use std::io::{Read, Seek};

pub mod error;
pub mod model;
pub mod msf;
pub mod reader;
pub mod util;

pub use error::NrgError;
pub use model::{
    BurnMode, CueMode, DaoSummary, DiscImage, FormatVersion, Session, Track, TrackLayout,
    TrackMode,
};
pub use msf::Msf;
pub use reader::{ByteReader, FieldWidth};

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}
