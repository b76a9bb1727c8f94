//! The nested pixel grid and its builders.

use crate::error::PnmError;

/// A rectangular image: Y rows of X pixels of Z channel samples.
///
/// Row-major throughout. Samples are `u16` and must stay within
/// `0..=maxval` for whatever maxval accompanies the grid; the encoders
/// reject anything above it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelGrid {
    rows: Vec<Vec<Vec<u16>>>,
}

impl PixelGrid {
    /// Zero-filled grid of the given dimensions.
    pub fn zeroed(width: usize, height: usize, channels: usize) -> Self {
        Self {
            rows: vec![vec![vec![0; channels]; width]; height],
        }
    }

    /// Wrap an existing nested row/pixel/sample structure.
    ///
    /// Rectangularity is not checked here; the encoders verify it.
    pub fn from_rows(rows: Vec<Vec<Vec<u16>>>) -> Self {
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn channels(&self) -> usize {
        self.rows.first().and_then(|row| row.first()).map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<Vec<u16>>] {
        &self.rows
    }

    /// Mutable access to the rows, for filling a [`zeroed`](Self::zeroed)
    /// grid in place before encoding.
    pub fn rows_mut(&mut self) -> &mut [Vec<Vec<u16>>] {
        &mut self.rows
    }

    /// Consume the grid, returning the nested row/pixel/sample structure.
    pub fn into_rows(self) -> Vec<Vec<Vec<u16>>> {
        self.rows
    }

    /// Reshape a flat row-major sample vector (index `y·X·Z + x·Z + z`)
    /// into the nested grid, consuming the flat copy.
    pub(crate) fn from_flat(
        samples: Vec<u16>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, PnmError> {
        let expected = width
            .checked_mul(height)
            .and_then(|wh| wh.checked_mul(channels))
            .ok_or(PnmError::DimensionsTooLarge {
                width: width as u32,
                height: height as u32,
            })?;
        if samples.len() != expected {
            return Err(PnmError::DimensionMismatch {
                expected,
                actual: samples.len(),
            });
        }

        let mut pixels = samples.chunks_exact(channels);
        let mut rows = Vec::with_capacity(height);
        for _ in 0..height {
            rows.push(pixels.by_ref().take(width).map(<[u16]>::to_vec).collect());
        }
        Ok(Self { rows })
    }
}

/// Total sample count X·Y·Z with overflow guarding. Also guarantees the
/// wide-sample byte count (2·X·Y·Z) fits in `usize`, so later size
/// arithmetic can multiply unchecked.
pub(crate) fn checked_samples(
    width: u32,
    height: u32,
    channels: usize,
) -> Result<usize, PnmError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(channels))
        .and_then(|n| n.checked_mul(2).map(|_| n))
        .ok_or(PnmError::DimensionsTooLarge { width, height })
}
