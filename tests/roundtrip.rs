use pnmgrid::{AlphaMode, Limits, PixelGrid, PnmError, PnmFormat};

/// Deterministic pseudo-random grid via xorshift, bounded by maxval.
fn noise_grid(width: usize, height: usize, channels: usize, maxval: u16) -> PixelGrid {
    let mut state: u32 = 0xDEAD_BEEF;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state % (u32::from(maxval) + 1)) as u16
    };
    let rows = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| (0..channels).map(|_| next()).collect())
                .collect()
        })
        .collect();
    PixelGrid::from_rows(rows)
}

#[test]
fn binary_rgb_roundtrip() {
    let grid = noise_grid(7, 5, 3, 255);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.width, 7);
    assert_eq!(decoded.height, 5);
    assert_eq!(decoded.channels, 3);
    assert_eq!(decoded.maxval, 255);
    assert_eq!(decoded.grid, grid);
}

#[test]
fn binary_grey_roundtrip() {
    let grid = noise_grid(16, 3, 1, 255);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.grid, grid);
}

#[test]
fn sixteen_bit_roundtrip() {
    let grid = noise_grid(4, 4, 3, 65535);
    let encoded = pnmgrid::encode_binary(&grid, 65535, AlphaMode::Drop).unwrap();
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.maxval, 65535);
    assert_eq!(decoded.grid, grid);
}

#[test]
fn ascii_rgb_roundtrip() {
    let grid = noise_grid(5, 4, 3, 255);
    let mut encoded = Vec::new();
    pnmgrid::write_ascii_to(&mut encoded, &grid, 255, AlphaMode::Drop).unwrap();
    assert_eq!(&encoded[..2], b"P3");
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.grid, grid);
}

#[test]
fn ascii_grey_roundtrip_wide() {
    let grid = noise_grid(3, 3, 1, 1023);
    let mut encoded = Vec::new();
    pnmgrid::write_ascii_to(&mut encoded, &grid, 1023, AlphaMode::Drop).unwrap();
    assert_eq!(&encoded[..2], b"P2");
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.maxval, 1023);
    assert_eq!(decoded.grid, grid);
}

#[test]
fn rgba_alpha_dropped_by_default() {
    let rows = vec![vec![vec![10, 20, 30, 0], vec![40, 50, 60, 255]]];
    let grid = PixelGrid::from_rows(rows);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();
    assert_eq!(encoded, b"P6\n2 1\n255\n\x0a\x14\x1e\x28\x32\x3c");
}

#[test]
fn chessboard_composite_boundary_values() {
    // Fully transparent pixel at the origin takes the tile value exactly:
    // (0 div 8) mod 2 == (0 div 8) mod 2, so floor(0.8 * 255) = 204.
    let grid = PixelGrid::from_rows(vec![vec![vec![10, 20, 30, 0]]]);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Checkerboard).unwrap();
    assert_eq!(&encoded[11..], &[204, 204, 204]);

    // Fully opaque pixel keeps its color channels unmodified.
    let grid = PixelGrid::from_rows(vec![vec![vec![10, 20, 30, 255]]]);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Checkerboard).unwrap();
    assert_eq!(&encoded[11..], &[10, 20, 30]);
}

#[test]
fn grey_alpha_composites_to_single_channel() {
    let grid = PixelGrid::from_rows(vec![vec![vec![99, 0]]]);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Checkerboard).unwrap();
    assert_eq!(encoded, b"P5\n1 1\n255\n\xcc");
}

#[test]
fn binary_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.ppm");
    let grid = noise_grid(9, 6, 3, 255);

    pnmgrid::encode_binary_file(&path, &grid, 255).unwrap();
    let decoded = pnmgrid::decode_file(&path).unwrap();
    assert_eq!(decoded.grid, grid);

    // The streamed file and the in-memory buffer are byte-identical.
    let on_disk = std::fs::read(&path).unwrap();
    let in_memory = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();
    assert_eq!(on_disk, in_memory);
}

#[test]
fn ascii_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.pgm");
    let grid = noise_grid(6, 9, 1, 255);

    pnmgrid::encode_ascii_file(&path, &grid, 255).unwrap();
    let decoded = pnmgrid::decode_file(&path).unwrap();
    assert_eq!(decoded.maxval, 255);
    assert_eq!(decoded.grid, grid);
}

#[test]
fn sixteen_bit_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.pgm");
    let grid = noise_grid(8, 2, 1, 4095);

    pnmgrid::encode_binary_file(&path, &grid, 4095).unwrap();
    let decoded = pnmgrid::decode_file(&path).unwrap();
    assert_eq!(decoded.grid, grid);
}

#[test]
fn missing_file_is_io_error() {
    let err = pnmgrid::decode_file("/nonexistent/image.ppm").unwrap_err();
    assert!(matches!(err, PnmError::Io(_)));
}

#[test]
fn limits_reject_oversized_input() {
    let grid = noise_grid(4, 4, 3, 255);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();

    let limits = Limits {
        max_samples: Some(8),
        ..Default::default()
    };
    let err = pnmgrid::decode_with_limits(&encoded, &limits).unwrap_err();
    assert!(matches!(err, PnmError::LimitExceeded(_)));

    let limits = Limits {
        max_width: Some(3),
        ..Default::default()
    };
    assert!(pnmgrid::decode_with_limits(&encoded, &limits).is_err());

    // Within limits decodes normally.
    let limits = Limits {
        max_width: Some(4),
        max_height: Some(4),
        max_samples: Some(48),
    };
    assert_eq!(
        pnmgrid::decode_with_limits(&encoded, &limits).unwrap().grid,
        grid
    );
}

#[test]
fn probe_reads_header_only() {
    let info = pnmgrid::probe(b"P6\n640 480\n65535\n").unwrap();
    assert_eq!(info.format, PnmFormat::BinaryRgb);
    assert_eq!((info.width, info.height), (640, 480));
    assert_eq!(info.maxval, 65535);
    assert_eq!(info.channels(), 3);
}

#[test]
fn fill_zeroed_grid_in_place_then_encode() {
    let mut grid = PixelGrid::zeroed(2, 2, 3);
    for (y, row) in grid.rows_mut().iter_mut().enumerate() {
        for (x, pixel) in row.iter_mut().enumerate() {
            for (z, sample) in pixel.iter_mut().enumerate() {
                *sample = (y * 100 + x * 10 + z) as u16;
            }
        }
    }

    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.grid, grid);
    assert_eq!(
        decoded.grid.into_rows(),
        vec![
            vec![vec![0, 1, 2], vec![10, 11, 12]],
            vec![vec![100, 101, 102], vec![110, 111, 112]],
        ]
    );
}

#[test]
fn zeroed_grid_encodes() {
    let grid = PixelGrid::zeroed(3, 2, 3);
    let encoded = pnmgrid::encode_binary(&grid, 255, AlphaMode::Drop).unwrap();
    let decoded = pnmgrid::decode(&encoded).unwrap();
    assert_eq!(decoded.grid, grid);
    assert!(
        decoded
            .grid
            .rows()
            .iter()
            .flatten()
            .flatten()
            .all(|&s| s == 0)
    );
}
