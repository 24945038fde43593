//! stream — decoding and producing reaction-diffusion frame files.
//!
//! This module exposes the stable public API used by Rust callers and the
//! Python bindings. Internals are layered: `framing` knows bytes, `io` knows
//! readers, `decoder`/`writer` know the stream as a whole.

pub mod framing;
pub mod grid;
pub mod io;
pub mod decoder;
pub mod writer;
pub mod parallelism;

pub use decoder::{decode_all, decode_file, open_file, DecoderState, FrameDecoder};
pub use framing::{Frame, FrameError};
pub use grid::Grid;
pub use io::{open_input, open_output, read_frame, read_header};
pub use writer::FrameWriter;
