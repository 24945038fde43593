//! Normalized I/O and exact-size reads for frame streams.
//!
//! Short reads never surface as `io::ErrorKind::UnexpectedEof`; they are
//! turned into the `Truncated` variant of the layer being read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::constants::READ_CHUNK_HINT;
use crate::headers::{decode_header_le, encode_header_le, Header};
use crate::stream::framing::{decode_frame, frame_len, Frame, FrameError};
use crate::types::StreamError;

/// Open `path` for buffered sequential reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>, StreamError> {
    Ok(BufReader::new(File::open(path)?))
}

/// Create (or truncate) `path` for buffered writing.
pub fn open_output(path: &Path) -> Result<BufWriter<File>, StreamError> {
    Ok(BufWriter::new(File::create(path)?))
}

// ================= Raw reads =================

/// Read up to `len` bytes, stopping early only at EOF.
///
/// The buffer grows as data arrives, so a huge `len` over a short stream
/// costs what the stream holds, not what the caller asked for.
pub fn read_up_to<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>, StreamError> {
    let mut buf = Vec::with_capacity(len.min(READ_CHUNK_HINT));
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

// ================= Header =================

pub fn write_header<W: Write>(w: &mut W, h: &Header) -> Result<(), StreamError> {
    w.write_all(&encode_header_le(h))?;
    Ok(())
}

/// Consume exactly 12 bytes and decode them. Shape is not checked here.
pub fn read_header<R: Read>(r: &mut R) -> Result<Header, StreamError> {
    let buf = read_up_to(r, Header::LEN)?;
    Ok(decode_header_le(&buf)?)
}

// ================= Frames =================

/// Consume one frame for a `width x height` grid.
///
/// The returned frame carries index 0; use [`read_frame_at`] when the
/// position in the stream matters.
pub fn read_frame<R: Read>(r: &mut R, width: i32, height: i32) -> Result<Frame, StreamError> {
    read_frame_at(r, 0, width, height)
}

pub fn read_frame_at<R: Read>(r: &mut R, index: u64, width: i32, height: i32) -> Result<Frame, StreamError> {
    // Shape is checked before touching the stream.
    let need = frame_len(width, height)?;

    let wire = read_up_to(r, need)?;
    if wire.len() < need {
        return Err(FrameError::Truncated {
            index,
            have: wire.len(),
            need,
        }
        .into());
    }

    Ok(decode_frame(index, &wire, width, height)?)
}

/// True if the reader has at least one more byte.
pub fn has_remaining<R: Read>(r: &mut R) -> Result<bool, StreamError> {
    Ok(!read_up_to(r, 1)?.is_empty())
}
