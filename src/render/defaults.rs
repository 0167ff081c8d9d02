//! Default colours and canvas limits

use crate::types::Color;

/// Every freshly allocated canvas starts out this colour.
pub const BACKGROUND: Color = Color::WHITE;
/// Paint used when a shape has no `fill` / `stroke` attribute.
pub const PAINT: Color = Color::BLACK;
/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;
/// Largest accepted pixel count (width * height).
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;
