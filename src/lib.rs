//! # pnmgrid
//!
//! Netpbm (PBM/PGM/PPM) decoder and encoder over a nested pixel grid.
//!
//! Images decode to a [`PixelGrid`]: Y rows of X pixels of Z channel
//! samples, `0..=maxval`. All six magic tokens are read — `P1`/`P4`
//! (bitmap), `P2`/`P5` (grey), `P3`/`P6` (RGB), ASCII and binary, 8- and
//! 16-bit — with tolerant header parsing (comments and irregular
//! whitespace). Bitmap pixels are renormalized to 8-bit grey, so every
//! decode yields the same grid shape regardless of source variant.
//!
//! Encoding writes binary (`P5`/`P6`) or ASCII (`P2`/`P3`) output,
//! streaming row-wise or sample-wise so large images never need a second
//! in-memory copy. Grids with an alpha channel either have it dropped or
//! composited against a checkerboard for previews ([`AlphaMode`]).
//!
//! Each call is a self-contained transform: no state is retained between
//! decode and encode, and errors are fail-fast with no partial results.
//!
//! ```no_run
//! use pnmgrid::AlphaMode;
//!
//! let decoded = pnmgrid::decode_file("input.ppm")?;
//! println!(
//!     "{}x{}, {} channels, maxval {}",
//!     decoded.width, decoded.height, decoded.channels, decoded.maxval
//! );
//!
//! // Preview bytes with transparency composited against the checkerboard.
//! let preview = pnmgrid::encode_binary(&decoded.grid, decoded.maxval, AlphaMode::Checkerboard)?;
//! let _ = preview;
//!
//! // Streamed copy on disk.
//! pnmgrid::encode_binary_file("copy.ppm", &decoded.grid, decoded.maxval)?;
//! # Ok::<(), pnmgrid::PnmError>(())
//! ```

#![forbid(unsafe_code)]

mod composite;
mod decode;
mod encode;
mod error;
mod grid;
mod header;
mod limits;

pub use composite::AlphaMode;
pub use decode::{DecodeOutput, decode, decode_file, decode_with_limits, probe};
pub use encode::{
    encode_ascii_file, encode_binary, encode_binary_file, write_ascii_to, write_binary_to,
};
pub use error::PnmError;
pub use grid::PixelGrid;
pub use header::{PnmFormat, PnmHeader, SampleWidth};
pub use limits::Limits;
