//! Header parsing: magic detection and a hand-written token scanner.
//!
//! The grammar is tolerant of `#`-to-end-of-line comments and irregular
//! whitespace between tokens, both of which real-world PNM writers produce
//! freely. Comments may sit between any two numeric tokens, not only at
//! line starts.

use log::trace;

use crate::error::PnmError;

/// Bitmap variants carry no maxval on the wire; decoded samples are
/// renormalized to an 8-bit grey scale.
pub(crate) const BITMAP_MAXVAL: u16 = 255;

/// Which PNM sub-format a file uses, from its magic token.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// P1 — plain (ASCII) bitmap.
    AsciiBitmap,
    /// P2 — plain (ASCII) grayscale.
    AsciiGray,
    /// P3 — plain (ASCII) RGB.
    AsciiRgb,
    /// P4 — raw (binary, bit-packed) bitmap.
    BinaryBitmap,
    /// P5 — raw (binary) grayscale.
    BinaryGray,
    /// P6 — raw (binary) RGB.
    BinaryRgb,
}

impl PnmFormat {
    fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"P1" => Some(Self::AsciiBitmap),
            b"P2" => Some(Self::AsciiGray),
            b"P3" => Some(Self::AsciiRgb),
            b"P4" => Some(Self::BinaryBitmap),
            b"P5" => Some(Self::BinaryGray),
            b"P6" => Some(Self::BinaryRgb),
            _ => None,
        }
    }

    /// The two-character magic token for this variant.
    pub fn magic(self) -> &'static str {
        match self {
            Self::AsciiBitmap => "P1",
            Self::AsciiGray => "P2",
            Self::AsciiRgb => "P3",
            Self::BinaryBitmap => "P4",
            Self::BinaryGray => "P5",
            Self::BinaryRgb => "P6",
        }
    }

    /// Channels per pixel: 1 for bitmap/grey, 3 for RGB.
    pub fn channels(self) -> usize {
        match self {
            Self::AsciiRgb | Self::BinaryRgb => 3,
            _ => 1,
        }
    }

    pub fn is_ascii(self) -> bool {
        matches!(self, Self::AsciiBitmap | Self::AsciiGray | Self::AsciiRgb)
    }

    /// Bitmap (1 bit per pixel) variants have no maxval token.
    pub fn is_bitmap(self) -> bool {
        matches!(self, Self::AsciiBitmap | Self::BinaryBitmap)
    }
}

/// On-wire width of one binary sample, decided once per image from maxval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleWidth {
    /// One byte per sample (maxval < 256).
    Narrow,
    /// Two bytes per sample, big-endian (maxval >= 256).
    Wide,
}

impl SampleWidth {
    pub fn for_maxval(maxval: u16) -> Self {
        if maxval < 256 { Self::Narrow } else { Self::Wide }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }
}

/// Parsed PNM header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PnmHeader {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
    /// Maximum sample value; fixed at 255 for bitmap variants.
    pub maxval: u16,
    /// Offset of the first pixel-data byte.
    pub data_offset: usize,
}

impl PnmHeader {
    /// Channels per pixel, derived from the format variant.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }
}

struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Skip a run of whitespace and `#`-to-EOL comments. At least one byte
    /// must be consumed; tokens cannot abut.
    fn skip_separators(&mut self) -> Result<(), PnmError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(PnmError::InvalidHeader(format!(
                "expected whitespace at byte {}",
                self.pos
            )));
        }
        Ok(())
    }

    fn read_uint(&mut self, what: &str) -> Result<u32, PnmError> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            value = value * 10 + u64::from(b - b'0');
            if value > u64::from(u32::MAX) {
                return Err(PnmError::InvalidHeader(format!("{what} out of range")));
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(PnmError::InvalidHeader(format!(
                "expected {what} at byte {}",
                self.pos
            )));
        }
        Ok(value as u32)
    }
}

/// Parse the header of a PNM byte buffer.
///
/// Grammar: magic token, width, height, and — except for bitmap variants —
/// maxval, with whitespace/comment runs between tokens. Exactly one
/// whitespace byte separates the final token from pixel data; that byte is
/// consumed and `data_offset` points past it.
pub(crate) fn parse_header(data: &[u8]) -> Result<PnmHeader, PnmError> {
    if data.len() < 2 {
        return Err(PnmError::UnexpectedEof);
    }
    let format = PnmFormat::from_magic(&data[..2]).ok_or(PnmError::UnrecognizedFormat)?;

    let mut scanner = Scanner { data, pos: 2 };
    scanner.skip_separators()?;
    let width = scanner.read_uint("width")?;
    scanner.skip_separators()?;
    let height = scanner.read_uint("height")?;
    if width == 0 || height == 0 {
        return Err(PnmError::InvalidHeader(format!(
            "zero dimension {width}x{height}"
        )));
    }

    let maxval = if format.is_bitmap() {
        BITMAP_MAXVAL
    } else {
        scanner.skip_separators()?;
        let raw = scanner.read_uint("maxval")?;
        if raw == 0 || raw > u32::from(u16::MAX) {
            return Err(PnmError::InvalidHeader(format!("maxval {raw} out of range")));
        }
        raw as u16
    };

    // Exactly one whitespace byte before pixel data; it is not pixel data.
    match scanner.peek() {
        Some(b) if b.is_ascii_whitespace() => scanner.pos += 1,
        Some(b) => {
            return Err(PnmError::InvalidHeader(format!(
                "expected whitespace before pixel data, found {b:#04x}"
            )));
        }
        None => return Err(PnmError::UnexpectedEof),
    }

    trace!("{} header: {width}x{height}, maxval {maxval}", format.magic());

    Ok(PnmHeader {
        format,
        width,
        height,
        maxval,
        data_offset: scanner.pos,
    })
}
