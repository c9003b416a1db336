//! Chunk stream driver: footer, then chunks in order until the terminator.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nrgrip_core::{ByteReader, DiscImage, NrgError, ReadSeek};

use crate::builder::DiscBuilder;
use crate::chunk::{ChunkHeader, ChunkKind, DecodeContext, decode_chunk};
use crate::footer::detect_footer;
use crate::options::ParseOptions;

/// Quick check for a Nero footer without parsing any chunks.
pub fn can_handle(reader: &mut dyn ReadSeek) -> bool {
    match ByteReader::new(reader) {
        Ok(mut reader) => detect_footer(&mut reader).is_ok(),
        Err(_) => false,
    }
}

/// Open and parse an image file.
pub fn open_image(path: &Path, options: &ParseOptions) -> Result<DiscImage, NrgError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    parse_image(&mut reader, options)
}

/// Parse an image into its disc model.
///
/// Chunks are read sequentially from the first-chunk offset. Parsing stops
/// at the terminator chunk, or with a warning when the footer is reached
/// first. Any structural error aborts the whole parse.
pub fn parse_image(source: &mut dyn ReadSeek, options: &ParseOptions) -> Result<DiscImage, NrgError> {
    let mut reader = ByteReader::new(source)?;
    let footer = detect_footer(&mut reader)?;
    let end = footer.footer_offset;

    log::debug!("chunk stream holds {} bytes", footer.stream_len());

    let mut builder = DiscBuilder::new(footer.version, footer.first_chunk_offset);
    reader.seek(std::io::SeekFrom::Start(footer.first_chunk_offset))?;

    loop {
        let pos = reader.tell();
        if pos >= end {
            log::warn!(
                "chunk stream reached the footer at 0x{:X} without an END! chunk",
                end
            );
            return Ok(builder.finish(false));
        }
        if end - pos < ChunkHeader::LEN {
            return Err(NrgError::TruncatedInput {
                offset: pos,
                wanted: ChunkHeader::LEN - (end - pos),
            });
        }

        let header = ChunkHeader::read(&mut reader)?;
        let kind = ChunkKind::from_tag(&header.tag).ok_or(NrgError::UnknownChunk {
            tag: header.tag,
            offset: header.offset,
        })?;
        log::debug!(
            "chunk {} at 0x{:X}, {} bytes",
            header.tag_name(),
            header.offset,
            header.size
        );

        if kind == ChunkKind::End {
            if header.size != 0 {
                log::debug!("END! chunk declares {} bytes; ignoring them", header.size);
            }
            return Ok(builder.finish(true));
        }
        if header.end_offset() > end {
            return Err(NrgError::TruncatedInput {
                offset: header.payload_offset(),
                wanted: header.end_offset() - end,
            });
        }

        let ctx = DecodeContext {
            version: footer.version,
            next_track: builder.next_track_number(),
            session_mode_check: options.session_mode_check,
        };
        let chunk = decode_chunk(&mut reader, &header, kind, &ctx)?;
        settle(&mut reader, &header)?;
        builder.apply(chunk, &header)?;
    }
}

/// Move the reader to the end of the chunk's declared payload.
///
/// Unread trailing bytes are padding and skipped; reading past the declared
/// size means the payload did not match its layout.
fn settle(reader: &mut ByteReader<'_>, header: &ChunkHeader) -> Result<(), NrgError> {
    let pos = reader.tell();
    let end = header.end_offset();
    if pos > end {
        return Err(NrgError::mismatch(
            header.offset,
            format!(
                "chunk {} declares {} bytes but its layout needs {}",
                header.tag_name(),
                header.size,
                pos - header.payload_offset()
            ),
        ));
    }
    if pos < end {
        log::debug!(
            "skipping {} trailing byte(s) in chunk {}",
            end - pos,
            header.tag_name()
        );
        reader.skip(end - pos)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
