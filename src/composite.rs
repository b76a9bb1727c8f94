//! Alpha handling for encode: drop the channel or composite against a
//! preview checkerboard.

/// How encoding treats a grid that carries an alpha channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlphaMode {
    /// Drop the alpha channel; color channels pass through unmodified.
    #[default]
    Drop,
    /// Blend color channels against the checkerboard, then drop alpha.
    Checkerboard,
}

/// Tile edge in pixels. Levels are 0.8·maxval and maxval, the "light"
/// checker preset.
const TILE: usize = 8;

/// Color channels written for a grid of `channels` channels: grids with an
/// alpha channel keep the leading channels up to it, anything past RGBA is
/// clipped off.
pub(crate) fn color_channels(channels: usize) -> usize {
    match channels {
        0 => 0,
        1 | 3 => channels,
        z => z.min(4) - 1,
    }
}

pub(crate) fn tile(x: usize, y: usize, maxval: u16) -> u16 {
    if (y / TILE) % 2 == (x / TILE) % 2 {
        (u32::from(maxval) * 4 / 5) as u16
    } else {
        maxval
    }
}

/// Flatten one row of pixels into `out`, resolving any alpha channel per
/// `mode`. Callers guarantee uniform channel counts and samples <= maxval.
pub(crate) fn flatten_row(
    row: &[Vec<u16>],
    y: usize,
    maxval: u16,
    mode: AlphaMode,
    out: &mut Vec<u16>,
) {
    let channels = row.first().map_or(0, Vec::len);
    let z_read = color_channels(channels);
    let has_alpha = z_read != channels;

    for (x, pixel) in row.iter().enumerate() {
        if has_alpha && mode == AlphaMode::Checkerboard {
            let alpha = u32::from(pixel[z_read]);
            let tile = u32::from(tile(x, y, maxval));
            let m = u32::from(maxval);
            for &value in &pixel[..z_read] {
                out.push(((u32::from(value) * alpha + tile * (m - alpha)) / m) as u16);
            }
        } else {
            out.extend_from_slice(&pixel[..z_read]);
        }
    }
}
