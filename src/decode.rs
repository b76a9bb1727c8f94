//! Decode entry points and the per-variant sample decoders.
//!
//! All variants funnel through the same shape: parse the header, decode a
//! flat row-major sample vector, reshape it into the nested [`PixelGrid`].
//! The flat vector is consumed by the reshape, so at no point do two full
//! copies of the image coexist.

use std::fs;
use std::path::Path;

use log::trace;

use crate::error::PnmError;
use crate::grid::{self, PixelGrid};
use crate::header::{self, BITMAP_MAXVAL, PnmFormat, PnmHeader, SampleWidth};
use crate::limits::Limits;

/// A decoded image: dimensions, maxval, and the owned pixel grid.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub maxval: u16,
    pub grid: PixelGrid,
}

/// Parse the header of a PNM buffer without decoding pixel data.
pub fn probe(data: &[u8]) -> Result<PnmHeader, PnmError> {
    header::parse_header(data)
}

/// Decode a PNM image from a byte buffer.
pub fn decode(data: &[u8]) -> Result<DecodeOutput, PnmError> {
    decode_inner(data, None)
}

/// Decode with resource limits checked after the header is parsed.
pub fn decode_with_limits(data: &[u8], limits: &Limits) -> Result<DecodeOutput, PnmError> {
    decode_inner(data, Some(limits))
}

/// Read and decode a PNM file.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodeOutput, PnmError> {
    let data = fs::read(path)?;
    decode_inner(&data, None)
}

fn decode_inner(data: &[u8], limits: Option<&Limits>) -> Result<DecodeOutput, PnmError> {
    let header = header::parse_header(data)?;
    let channels = header.channels();
    let samples = grid::checked_samples(header.width, header.height, channels)?;

    if let Some(limits) = limits {
        limits.check(&header, samples)?;
    }

    let payload = &data[header.data_offset..];
    trace!(
        "decoding {samples} samples from {} payload bytes ({:?})",
        payload.len(),
        header.format
    );

    let flat = match header.format {
        PnmFormat::BinaryGray | PnmFormat::BinaryRgb => {
            decode_binary_samples(payload, SampleWidth::for_maxval(header.maxval), samples)?
        }
        PnmFormat::AsciiGray | PnmFormat::AsciiRgb => {
            decode_ascii_samples(payload, header.maxval, samples)?
        }
        PnmFormat::BinaryBitmap => {
            decode_packed_bits(payload, header.width as usize, header.height as usize)?
        }
        PnmFormat::AsciiBitmap => decode_ascii_bits(payload, samples)?,
    };

    let grid = PixelGrid::from_flat(
        flat,
        header.width as usize,
        header.height as usize,
        channels,
    )?;

    Ok(DecodeOutput {
        width: header.width,
        height: header.height,
        channels: channels as u32,
        maxval: header.maxval,
        grid,
    })
}

/// Binary continuous-tone samples. Wide samples are big-endian on the wire
/// regardless of host order. Trailing bytes are ignored; a short stream is
/// a dimension mismatch.
fn decode_binary_samples(
    data: &[u8],
    width: SampleWidth,
    count: usize,
) -> Result<Vec<u16>, PnmError> {
    let needed = count * width.bytes();
    if data.len() < needed {
        return Err(PnmError::DimensionMismatch {
            expected: count,
            actual: data.len() / width.bytes(),
        });
    }

    let mut out = Vec::with_capacity(count);
    match width {
        SampleWidth::Narrow => out.extend(data[..count].iter().map(|&b| u16::from(b))),
        SampleWidth::Wide => {
            for pair in data[..needed].chunks_exact(2) {
                out.push(u16::from_be_bytes([pair[0], pair[1]]));
            }
        }
    }
    Ok(out)
}

/// ASCII continuous-tone samples: whitespace-delimited decimal tokens.
fn decode_ascii_samples(data: &[u8], maxval: u16, count: usize) -> Result<Vec<u16>, PnmError> {
    let mut out = Vec::with_capacity(count);
    for token in data.split(|b| b.is_ascii_whitespace()) {
        if token.is_empty() {
            continue;
        }
        if out.len() == count {
            break;
        }
        let value = parse_sample_token(token)?;
        if value > u32::from(maxval) {
            return Err(PnmError::InvalidData(format!(
                "sample {value} exceeds maxval {maxval}"
            )));
        }
        out.push(value as u16);
    }
    if out.len() != count {
        return Err(PnmError::InvalidData(format!(
            "expected {count} samples, found {}",
            out.len()
        )));
    }
    Ok(out)
}

fn parse_sample_token(token: &[u8]) -> Result<u32, PnmError> {
    let mut value: u32 = 0;
    for &b in token {
        if !b.is_ascii_digit() {
            return Err(PnmError::InvalidData(format!(
                "malformed sample token \"{}\"",
                String::from_utf8_lossy(token)
            )));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| PnmError::InvalidData("sample value out of range".into()))?;
    }
    Ok(value)
}

/// Binary bitmap: bits packed MSB-first, each row padded to a whole byte.
/// Padding bits are discarded. An ink bit of 1 maps to black (0), 0 to
/// white (255).
fn decode_packed_bits(data: &[u8], width: usize, height: usize) -> Result<Vec<u16>, PnmError> {
    let row_bytes = width.div_ceil(8);
    let needed = row_bytes
        .checked_mul(height)
        .ok_or(PnmError::DimensionsTooLarge {
            width: width as u32,
            height: height as u32,
        })?;
    if data.len() < needed {
        return Err(PnmError::UnexpectedEof);
    }

    let mut out = Vec::with_capacity(width * height);
    for row in data[..needed].chunks_exact(row_bytes) {
        for x in 0..width {
            let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
            out.push(BITMAP_MAXVAL * u16::from(1 - bit));
        }
    }
    Ok(out)
}

/// ASCII bitmap: `0`/`1` characters with optional whitespace between them.
fn decode_ascii_bits(data: &[u8], count: usize) -> Result<Vec<u16>, PnmError> {
    let mut out = Vec::with_capacity(count);
    for &b in data {
        if out.len() == count {
            break;
        }
        match b {
            b'0' => out.push(BITMAP_MAXVAL),
            b'1' => out.push(0),
            b if b.is_ascii_whitespace() => {}
            other => {
                return Err(PnmError::InvalidData(format!(
                    "unexpected byte {other:#04x} in bitmap data"
                )));
            }
        }
    }
    if out.len() != count {
        return Err(PnmError::InvalidData(format!(
            "expected {count} bitmap samples, found {}",
            out.len()
        )));
    }
    Ok(out)
}
