//! PNM encoders: binary (P5/P6) and ASCII (P2/P3), streamed to any sink.
//!
//! Both encoders share one shape: validate the grid, write the textual
//! header, then stream the payload — row by row for binary, sample by
//! sample for ASCII — so peak memory stays at one row regardless of image
//! size. The in-memory and file entry points differ only in the sink they
//! hand in. Bitmap-derived grids come out as grey; P1/P4 are never written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::composite::{self, AlphaMode};
use crate::error::PnmError;
use crate::grid::PixelGrid;
use crate::header::SampleWidth;

/// Encode to an in-memory binary PNM buffer, usable directly as preview or
/// display data. `AlphaMode::Checkerboard` composites transparent pixels
/// against the checkerboard; the default drops alpha unmodified.
pub fn encode_binary(grid: &PixelGrid, maxval: u16, alpha: AlphaMode) -> Result<Vec<u8>, PnmError> {
    let mut out = Vec::new();
    write_binary_to(&mut out, grid, maxval, alpha)?;
    Ok(out)
}

/// Write a binary PNM file, streaming one row at a time.
pub fn encode_binary_file<P: AsRef<Path>>(
    path: P,
    grid: &PixelGrid,
    maxval: u16,
) -> Result<(), PnmError> {
    let mut sink = BufWriter::new(File::create(path)?);
    write_binary_to(&mut sink, grid, maxval, AlphaMode::Drop)?;
    sink.flush()?;
    Ok(())
}

/// Write an ASCII PNM file, streaming per sample.
pub fn encode_ascii_file<P: AsRef<Path>>(
    path: P,
    grid: &PixelGrid,
    maxval: u16,
) -> Result<(), PnmError> {
    let mut sink = BufWriter::new(File::create(path)?);
    write_ascii_to(&mut sink, grid, maxval, AlphaMode::Drop)?;
    sink.flush()?;
    Ok(())
}

/// Stream a grid as binary PGM/PPM into `sink`.
pub fn write_binary_to<W: Write>(
    sink: &mut W,
    grid: &PixelGrid,
    maxval: u16,
    alpha: AlphaMode,
) -> Result<(), PnmError> {
    let (width, height, channels) = validate(grid, maxval)?;
    let z_out = composite::color_channels(channels);
    let magic = if z_out < 3 { "P5" } else { "P6" };
    let sample_width = SampleWidth::for_maxval(maxval);

    write!(sink, "{magic}\n{width} {height}\n{maxval}\n")?;

    let mut row_samples = Vec::with_capacity(width * z_out);
    let mut row_bytes = Vec::with_capacity(width * z_out * sample_width.bytes());
    for (y, row) in grid.rows().iter().enumerate() {
        row_samples.clear();
        row_bytes.clear();
        composite::flatten_row(row, y, maxval, alpha, &mut row_samples);
        match sample_width {
            SampleWidth::Narrow => row_bytes.extend(row_samples.iter().map(|&s| s as u8)),
            SampleWidth::Wide => {
                for &s in &row_samples {
                    row_bytes.extend_from_slice(&s.to_be_bytes());
                }
            }
        }
        sink.write_all(&row_bytes)?;
    }
    Ok(())
}

/// Stream a grid as ASCII PGM/PPM into `sink`.
///
/// Each sample is followed by one space; a newline precedes every 3rd
/// sample regardless of row or pixel boundaries. The fixed cadence keeps
/// every line within the format's length convention for any sample width.
pub fn write_ascii_to<W: Write>(
    sink: &mut W,
    grid: &PixelGrid,
    maxval: u16,
    alpha: AlphaMode,
) -> Result<(), PnmError> {
    let (width, height, channels) = validate(grid, maxval)?;
    let z_out = composite::color_channels(channels);
    let magic = if z_out < 3 { "P2" } else { "P3" };

    write!(sink, "{magic}\n{width} {height}\n{maxval}\n")?;

    let mut emitted: u64 = 0;
    let mut row_samples = Vec::with_capacity(width * z_out);
    for (y, row) in grid.rows().iter().enumerate() {
        row_samples.clear();
        composite::flatten_row(row, y, maxval, alpha, &mut row_samples);
        for &s in &row_samples {
            emitted += 1;
            if emitted % 3 == 0 {
                sink.write_all(b"\n")?;
            }
            write!(sink, "{s} ")?;
        }
    }
    Ok(())
}

/// Check the grid is non-empty, rectangular with a uniform channel count,
/// and that every sample (alpha included) fits under maxval.
fn validate(grid: &PixelGrid, maxval: u16) -> Result<(usize, usize, usize), PnmError> {
    if maxval == 0 {
        return Err(PnmError::InvalidData("maxval must be at least 1".into()));
    }
    let width = grid.width();
    let height = grid.height();
    let channels = grid.channels();
    if width == 0 || height == 0 || channels == 0 {
        return Err(PnmError::InvalidData("cannot encode an empty grid".into()));
    }

    let row_samples = width * channels;
    for row in grid.rows() {
        if row.len() != width || row.iter().any(|pixel| pixel.len() != channels) {
            return Err(PnmError::DimensionMismatch {
                expected: row_samples,
                actual: row.iter().map(Vec::len).sum(),
            });
        }
        for pixel in row {
            for &sample in pixel {
                if sample > maxval {
                    return Err(PnmError::InvalidData(format!(
                        "sample {sample} exceeds maxval {maxval}"
                    )));
                }
            }
        }
    }
    Ok((width, height, channels))
}
