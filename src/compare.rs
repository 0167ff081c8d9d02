//! Canvas comparison utilities.
//!
//! Shared by the unit tests, the scene harness and anyone checking a render
//! against a reference image.

use crate::render::{Canvas, defaults};
use crate::types::{Color, Point};

/// Result of comparing two canvases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareResult {
    /// Same size, same pixels
    Match,
    /// Dimensions differ; pixels were not compared
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// Same size, `count` pixels differ; `first` is the first one in row-major order
    PixelMismatch { count: usize, first: Point },
}

impl CompareResult {
    pub fn is_match(&self) -> bool {
        matches!(self, CompareResult::Match)
    }
}

/// Compare `actual` against `expected` pixel by pixel.
pub fn compare_canvases(expected: &Canvas, actual: &Canvas) -> CompareResult {
    let expected_size = (expected.width(), expected.height());
    let actual_size = (actual.width(), actual.height());
    if expected_size != actual_size {
        return CompareResult::SizeMismatch {
            expected: expected_size,
            actual: actual_size,
        };
    }

    let width = expected.width() as usize;
    let mut diffs = expected
        .pixels()
        .iter()
        .zip(actual.pixels())
        .enumerate()
        .filter(|(_, (e, a))| e != a)
        .map(|(i, _)| i);

    match diffs.next() {
        None => CompareResult::Match,
        Some(first) => CompareResult::PixelMismatch {
            count: 1 + diffs.count(),
            first: Point::new((first % width) as i32, (first / width) as i32),
        },
    }
}

/// Text dump of a canvas, one line per row.
///
/// Background pixels are `.`; every other colour gets a letter (`A`, `B`, ...)
/// in order of first appearance, scanning row-major.
pub fn ascii(canvas: &Canvas) -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut palette: Vec<Color> = Vec::new();
    let mut out = String::with_capacity((canvas.width() as usize + 1) * canvas.height() as usize);

    for (y, row) in canvas.pixels().chunks(canvas.width() as usize).enumerate() {
        if y > 0 {
            out.push('\n');
        }
        for &color in row {
            if color == defaults::BACKGROUND {
                out.push('.');
                continue;
            }
            let slot = match palette.iter().position(|&c| c == color) {
                Some(slot) => slot,
                None => {
                    palette.push(color);
                    palette.len() - 1
                }
            };
            out.push(LETTERS.get(slot).map_or('?', |&b| b as char));
        }
    }
    out
}
