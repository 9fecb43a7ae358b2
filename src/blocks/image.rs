use super::{BlockedMessage, FileType, SplitStrategy};
use crate::error::ParamError;

struct Pgm {
    cols: usize,
    rows: usize,
    pixels: Vec<u8>,
}

/// Parse a PGM-style plain-text image: skip the magic line and two
/// comment/header lines, read the "columns rows" line, skip the max-value
/// line, then read whitespace-separated pixel values for the body.
fn parse_pgm(bytes: &[u8]) -> Result<Pgm, ParamError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParamError::UnknownFileType(format!("non-UTF8 image bytes: {e}")))?;
    let mut lines = text.lines();

    lines
        .next()
        .ok_or_else(|| ParamError::UnknownFileType("empty image file".into()))?; // magic
    lines
        .next()
        .ok_or_else(|| ParamError::UnknownFileType("missing header line 1".into()))?; // comment/header
    lines
        .next()
        .ok_or_else(|| ParamError::UnknownFileType("missing header line 2".into()))?; // comment/header

    let dims_line = lines
        .next()
        .ok_or_else(|| ParamError::UnknownFileType("missing dimensions line".into()))?;
    let mut dims = dims_line.split_whitespace();
    let cols: usize = dims
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParamError::UnknownFileType("invalid column count".into()))?;
    let rows: usize = dims
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParamError::UnknownFileType("invalid row count".into()))?;

    lines
        .next()
        .ok_or_else(|| ParamError::UnknownFileType("missing max-value line".into()))?; // maxval

    let body: String = lines.collect::<Vec<_>>().join(" ");
    let pixels: Vec<u8> = body
        .split_whitespace()
        .map(|tok| {
            tok.parse::<u16>()
                .map(|v| v.min(255) as u8)
                .map_err(|_| ParamError::UnknownFileType(format!("invalid pixel value: {tok}")))
        })
        .collect::<Result<_, _>>()?;

    if pixels.len() != rows * cols {
        return Err(ParamError::UnknownFileType(format!(
            "expected {} pixels ({rows}x{cols}), found {}",
            rows * cols,
            pixels.len()
        )));
    }

    Ok(Pgm { cols, rows, pixels })
}

fn tile_side(rows: usize, cols: usize, strategy: SplitStrategy) -> usize {
    match strategy {
        SplitStrategy::FixedSize(s) => {
            if s == 0 || s > rows || s > cols {
                rows.max(cols).max(1)
            } else {
                s
            }
        }
        SplitStrategy::FixedCount(k) => {
            if k == 0 || k > rows * cols {
                1
            } else {
                let ideal = ((rows * cols) as f64 / k as f64).sqrt();
                ideal.round().max(1.0) as usize
            }
        }
    }
}

pub fn split_image(
    bytes: &[u8],
    strategy: SplitStrategy,
) -> Result<BlockedMessage, ParamError> {
    let img = parse_pgm(bytes)?;
    let side = tile_side(img.rows, img.cols, strategy);

    let mut blocks = Vec::new();
    let mut row0 = 0usize;
    while row0 < img.rows {
        let row1 = (row0 + side).min(img.rows);
        let mut col0 = 0usize;
        while col0 < img.cols {
            let col1 = (col0 + side).min(img.cols);
            let mut tile = Vec::with_capacity((row1 - row0) * (col1 - col0));
            for r in row0..row1 {
                let row_start = r * img.cols;
                tile.extend_from_slice(&img.pixels[row_start + col0..row_start + col1]);
            }
            blocks.push(tile);
            col0 = col1;
        }
        row0 = row1;
    }
    if blocks.is_empty() {
        blocks.push(Vec::new());
    }

    Ok(BlockedMessage {
        file_type: FileType::Image,
        original_bytes: bytes.to_vec(),
        blocks,
        block_size: side as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pgm(cols: usize, rows: usize) -> Vec<u8> {
        let mut out = String::new();
        out.push_str("P2\n");
        out.push_str("# comment\n");
        out.push_str("# header\n");
        out.push_str(&format!("{cols} {rows}\n"));
        out.push_str("255\n");
        for i in 0..(rows * cols) {
            out.push_str(&format!("{} ", (i % 255) as u8));
        }
        out.push('\n');
        out.into_bytes()
    }

    #[test]
    fn fixed_size_tiles_cover_every_pixel() {
        let bytes = sample_pgm(6, 4);
        let bm = split_image(&bytes, SplitStrategy::FixedSize(2)).unwrap();
        assert_eq!(bm.blocks.len(), 6); // 2 rows of 3 tiles
        let total_pixels: usize = bm.blocks.iter().map(|b| b.len()).sum();
        assert_eq!(total_pixels, 24);
    }

    #[test]
    fn oversized_tile_falls_back_to_max_dimension() {
        let bytes = sample_pgm(3, 2);
        let bm = split_image(&bytes, SplitStrategy::FixedSize(100)).unwrap();
        assert_eq!(bm.block_size, 3);
        assert_eq!(bm.blocks.len(), 1);
    }

    #[test]
    fn fixed_count_exceeding_pixel_count_uses_side_one() {
        let bytes = sample_pgm(2, 2);
        let bm = split_image(&bytes, SplitStrategy::FixedCount(50)).unwrap();
        assert_eq!(bm.block_size, 1);
        assert_eq!(bm.blocks.len(), 4);
    }
}
