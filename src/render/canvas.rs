//! Raster canvas and the integer drawing primitives
//!
//! The canvas owns a row-major buffer of opaque colours. Drawing primitives clip
//! silently at the canvas edge; direct pixel access reports `OutOfBounds`.

use crate::errors::CanvasError;
use crate::log::debug;
use crate::types::{Color, Point};

use super::defaults;

/// Mutable pixel buffer, the only rendering target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Allocate a `width` x `height` canvas filled with the background colour.
    pub fn new(width: i32, height: i32) -> Result<Self, CanvasError> {
        let (width, height) = checked_dimensions(i64::from(width), i64::from(height))?;
        debug!(width, height, "allocating canvas");
        Ok(Canvas {
            width,
            height,
            pixels: vec![defaults::BACKGROUND; width as usize * height as usize],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, CanvasError> {
        let (width, height) = checked_dimensions(i64::from(width), i64::from(height))?;
        if pixels.len() != width as usize * height as usize {
            return Err(CanvasError::InvalidDimensions {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        Ok(Canvas { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Row-major RGB8 bytes, ready for an image encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, CanvasError> {
        if self.contains(x, y) {
            Ok(y as usize * self.width as usize + x as usize)
        } else {
            Err(CanvasError::OutOfBounds { x, y, width: self.width, height: self.height })
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Result<Color, CanvasError> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), CanvasError> {
        let i = self.index(x, y)?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Clipped write used by the drawing primitives.
    #[inline]
    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if let Ok(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Clipped write of the inclusive span `x0..=x1` on row `y`.
    fn fill_row(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        if y < 0 || y >= i64::from(self.height) {
            return;
        }
        let start = x0.min(x1).max(0);
        let end = x0.max(x1).min(i64::from(self.width) - 1);
        if start > end {
            return;
        }
        let row = y as usize * self.width as usize;
        self.pixels[row + start as usize..=row + end as usize].fill(color);
    }

    /// Bresenham line from `a` to `b`, both endpoints included.
    ///
    /// The walk always runs along the major axis in increasing order, so
    /// `draw_line(a, b)` and `draw_line(b, a)` paint the same pixels. When both
    /// deltas are equal the X-major branch is taken.
    ///
    /// Only the part of the major axis that lies on the canvas is walked; the
    /// decision variable is advanced to the first visible step in closed form.
    /// All arithmetic is done in `i64`.
    pub fn draw_line(&mut self, a: Point, b: Point, color: Color) {
        let (ax, ay, bx, by) = (i64::from(a.x), i64::from(a.y), i64::from(b.x), i64::from(b.y));
        let x_major = (bx - ax).abs() >= (by - ay).abs();
        // (major, minor) coordinates of both ends, and the canvas extent along major.
        let (a, b, limit) = if x_major {
            ((ax, ay), (bx, by), i64::from(self.width))
        } else {
            ((ay, ax), (by, bx), i64::from(self.height))
        };
        let (from, to) = if b.0 < a.0 { (b, a) } else { (a, b) };

        let run = to.0 - from.0;
        let rise = (to.1 - from.1).abs();
        let step = if to.1 < from.1 { -1 } else { 1 };
        let (run2, rise2) = (2 * run, 2 * rise);

        let first = (-from.0).max(0);
        let last = (limit - 1 - from.0).min(run);
        if first > last {
            return;
        }

        // Minor-axis steps taken after `first` major steps: round(first * rise / run), halves up.
        // The products can exceed i64 for far endpoints; the results cannot.
        let (run_w, rise_w, first_w) = (i128::from(run), i128::from(rise), i128::from(first));
        let taken = if first == 0 { 0 } else { (2 * rise_w * first_w + run_w) / (2 * run_w) };
        let fraction = 2 * rise_w * (first_w + 1) - run_w - 2 * run_w * taken;
        let mut minor = from.1 + step * taken as i64;
        let mut fraction = fraction as i64;

        for major in from.0 + first..=from.0 + last {
            let (x, y) = if x_major { (major, minor) } else { (minor, major) };
            if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
                self.plot(x, y, color);
            }
            if fraction >= 0 {
                minor += step;
                fraction -= run2;
            }
            fraction += rise2;
        }
    }

    /// Outline the closed polygon, then scanline-fill its interior.
    pub fn draw_polygon(&mut self, points: &[Point], color: Color) {
        if points.is_empty() {
            return;
        }
        let n = points.len();
        for i in 0..n {
            self.draw_line(points[i], points[(i + 1) % n], color);
        }

        let (y_min, y_max) = points
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        // Rows off the canvas would only produce clipped writes.
        let y_start = y_min.max(0);
        let y_end = y_max.min(self.height as i32);

        let mut crossings: Vec<f64> = Vec::with_capacity(n);
        for y in y_start..y_end {
            crossings.clear();
            for i in 0..n {
                let (a, b) = (points[i], points[(i + 1) % n]);
                if a.y == b.y || y < a.y.min(b.y) || y > a.y.max(b.y) {
                    continue;
                }
                let (ax, ay) = (f64::from(a.x), f64::from(a.y));
                let x = (f64::from(y) - ay) * (f64::from(b.x) - ax) / (f64::from(b.y) - ay) + ax;
                crossings.push(x);
            }
            crossings.sort_by(f64::total_cmp);
            self.fill_spans(y, &crossings, color);
        }
    }

    /// Draw spans between sorted crossings, pairing 0-1, 2-3, ...
    ///
    /// A pair that rounds to a single column consumes only its first crossing,
    /// and pairing resumes from the second.
    fn fill_spans(&mut self, y: i32, crossings: &[f64], color: Color) {
        let mut i = 0;
        while i + 1 < crossings.len() {
            let x0 = crossings[i].round() as i32;
            let x1 = crossings[i + 1].round() as i32;
            if x0 == x1 {
                i += 1;
            } else {
                self.draw_line(Point::new(x0, y), Point::new(x1, y), color);
                i += 2;
            }
        }
    }

    /// Filled ellipse built from horizontal chords.
    ///
    /// Row half-widths are found by a downward search that starts from the
    /// previous row's width extrapolated by the previous row's decrement. A zero
    /// radius on either axis degenerates to a line (or a single point).
    pub fn draw_ellipse(&mut self, center: Point, radius: Point, color: Color) {
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let (rx, ry) = (i64::from(radius.x).abs(), i64::from(radius.y).abs());
        let (width, height) = (i64::from(self.width), i64::from(self.height));
        if cx + rx < 0 || cy + ry < 0 || cx - rx >= width || cy - ry >= height {
            return;
        }

        self.fill_row(cy, cx - rx, cx + rx, color);

        let mut x0 = rx;
        let mut dx = 0;
        for y in 1..=ry {
            // Both chords have left the canvas, and every later row is further out.
            if cy - y < 0 && cy + y >= height {
                break;
            }
            let x1 = if rx == 0 {
                0
            } else {
                let vy = y as f64 / ry as f64;
                widest_chord(x0 - (dx - 1), rx, vy * vy)
            };
            dx = x0 - x1;
            x0 = x1;
            self.fill_row(cy - y, cx - x0, cx + x0, color);
            self.fill_row(cy + y, cx - x0, cx + x0, color);
        }
    }
}

/// Largest `x` in `1..=start` with `(x / rx)^2 + vy <= 1`, or 0 if there is none.
///
/// The test only gets harder as `x` grows, so bisecting gives the same answer
/// as scanning down from `start` one column at a time.
fn widest_chord(start: i64, rx: i64, vy: f64) -> i64 {
    let inside = |x: i64| {
        let vx = x as f64 / rx as f64;
        vx * vx + vy <= 1.0
    };
    if start <= 0 {
        return 0;
    }
    if inside(start) {
        return start;
    }
    // `lo` is 0 or inside, `hi` is outside.
    let (mut lo, mut hi) = (0, start);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if inside(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

fn checked_dimensions(width: i64, height: i64) -> Result<(u32, u32), CanvasError> {
    if width <= 0 || height <= 0 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    let (w, h) = (width as u64, height as u64);
    if w > u64::from(defaults::MAX_DIMENSION)
        || h > u64::from(defaults::MAX_DIMENSION)
        || w * h > defaults::MAX_PIXELS
    {
        return Err(CanvasError::TooLarge { width: w as u32, height: h as u32 });
    }
    Ok((w as u32, h as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ascii;
    use std::collections::HashSet;

    fn painted(canvas: &Canvas) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                if canvas.pixel(x, y).unwrap() != defaults::BACKGROUND {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    fn line_pixels(a: Point, b: Point) -> HashSet<(i32, i32)> {
        let mut canvas = Canvas::new(32, 32).unwrap();
        canvas.draw_line(a, b, Color::BLACK);
        painted(&canvas)
    }

    #[test]
    fn new_canvas_is_white() {
        let canvas = Canvas::new(3, 2).unwrap();
        assert_eq!(canvas.pixels().len(), 6);
        assert!(canvas.pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            Canvas::new(0, 5),
            Err(CanvasError::InvalidDimensions { width: 0, height: 5 })
        );
        assert!(matches!(Canvas::new(4, -1), Err(CanvasError::InvalidDimensions { .. })));
        assert!(matches!(Canvas::new(100_000, 2), Err(CanvasError::TooLarge { .. })));
    }

    #[test]
    fn pixel_access_is_bounds_checked() {
        let mut canvas = Canvas::new(4, 3).unwrap();
        canvas.set_pixel(3, 2, Color::RED).unwrap();
        assert_eq!(canvas.pixel(3, 2), Ok(Color::RED));
        assert_eq!(
            canvas.pixel(4, 0),
            Err(CanvasError::OutOfBounds { x: 4, y: 0, width: 4, height: 3 })
        );
        assert!(canvas.set_pixel(-1, 0, Color::RED).is_err());
        assert!(canvas.pixel(0, 3).is_err());
    }

    #[test]
    fn line_shallow_slope() {
        let mut canvas = Canvas::new(5, 3).unwrap();
        canvas.draw_line(Point::new(0, 0), Point::new(4, 2), Color::BLACK);
        insta::assert_snapshot!(ascii(&canvas), @r"
        A....
        .AA..
        ...AA
        ");
    }

    #[test]
    fn line_covers_endpoints_with_connected_steps() {
        let endpoints = [
            (Point::new(3, 4), Point::new(20, 9)),
            (Point::new(20, 9), Point::new(3, 4)),
            (Point::new(5, 25), Point::new(9, 2)),
            (Point::new(0, 0), Point::new(31, 31)),
            (Point::new(7, 7), Point::new(7, 7)),
            (Point::new(30, 1), Point::new(1, 3)),
            (Point::new(10, 0), Point::new(10, 31)),
        ];
        for (a, b) in endpoints {
            let pixels = line_pixels(a, b);
            let expected_len = (b.x - a.x).abs().max((b.y - a.y).abs()) as usize + 1;
            assert_eq!(pixels.len(), expected_len, "{a} -> {b}");
            assert!(pixels.contains(&(a.x, a.y)));
            assert!(pixels.contains(&(b.x, b.y)));
            for &(x, y) in &pixels {
                if (x, y) == (a.x, a.y) {
                    continue;
                }
                let has_neighbour = (-1..=1).any(|ox| {
                    (-1..=1).any(|oy| (ox, oy) != (0, 0) && pixels.contains(&(x + ox, y + oy)))
                });
                assert!(has_neighbour, "isolated pixel ({x}, {y}) on {a} -> {b}");
            }
        }
    }

    #[test]
    fn line_direction_does_not_matter() {
        for (ax, ay) in [(0, 0), (3, 17), (12, 5), (31, 0)] {
            for (bx, by) in [(2, 1), (20, 31), (31, 9), (1, 30), (12, 5)] {
                let (a, b) = (Point::new(ax, ay), Point::new(bx, by));
                assert_eq!(line_pixels(a, b), line_pixels(b, a), "{a} <-> {b}");
            }
        }
    }

    #[test]
    fn line_clips_at_edges() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.draw_line(Point::new(-3, 1), Point::new(10, 1), Color::RED);
        assert_eq!(painted(&canvas), (0..4).map(|x| (x, 1)).collect());
    }

    #[test]
    fn clipped_line_matches_unclipped_window() {
        let (dx, dy) = (9, 7);
        let lines = [
            (Point::new(1, 2), Point::new(38, 17)),
            (Point::new(3, 36), Point::new(30, 1)),
            (Point::new(12, 0), Point::new(19, 39)),
            (Point::new(35, 3), Point::new(2, 36)),
            (Point::new(0, 5), Point::new(33, 38)),
            (Point::new(39, 10), Point::new(4, 13)),
        ];
        for (a, b) in lines {
            let mut full = Canvas::new(40, 40).unwrap();
            full.draw_line(a, b, Color::BLACK);
            let mut window = Canvas::new(12, 10).unwrap();
            let shift = Point::new(dx, dy);
            window.draw_line(a - shift, b - shift, Color::BLACK);
            for y in 0..10 {
                for x in 0..12 {
                    assert_eq!(
                        window.pixel(x, y).unwrap(),
                        full.pixel(x + dx, y + dy).unwrap(),
                        "line {a} -> {b} differs at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn far_endpoints_do_not_overflow() {
        let mut canvas = Canvas::new(4, 2).unwrap();
        canvas.draw_line(Point::new(0, 0), Point::new(1_200_000_000, 0), Color::BLACK);
        assert_eq!(painted(&canvas), (0..4).map(|x| (x, 0)).collect());

        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.draw_line(Point::new(i32::MIN, i32::MIN), Point::new(i32::MAX, i32::MAX), Color::BLACK);
        assert_eq!(painted(&canvas), (0..5).map(|i| (i, i)).collect());

        let mut canvas = Canvas::new(5, 3).unwrap();
        canvas.draw_line(Point::new(2, -1_000_000_000), Point::new(2, 1_000_000_000), Color::BLACK);
        assert_eq!(painted(&canvas), (0..3).map(|y| (2, y)).collect());
    }

    #[test]
    fn huge_ellipse_radii_are_clipped() {
        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.draw_ellipse(Point::new(2, 2), Point::new(i32::MAX, 2), Color::RED);
        insta::assert_snapshot!(ascii(&canvas), @r"
        ..A..
        AAAAA
        AAAAA
        AAAAA
        ..A..
        ");

        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.draw_ellipse(Point::new(2, 2), Point::new(1, i32::MAX), Color::RED);
        insta::assert_snapshot!(ascii(&canvas), @r"
        .AAA.
        .AAA.
        .AAA.
        .AAA.
        .AAA.
        ");

        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.draw_ellipse(Point::new(i32::MAX, 2), Point::new(3, 3), Color::RED);
        assert!(painted(&canvas).is_empty());
    }

    #[test]
    fn rectangle_fills_small_canvas() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        let corners = [Point::new(0, 0), Point::new(4, 0), Point::new(4, 4), Point::new(0, 4)];
        canvas.draw_polygon(&corners, Color::RED);
        assert!(canvas.pixels().iter().all(|&c| c == Color::RED));
    }

    #[test]
    fn triangle_fill_matches_half_plane() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.draw_polygon(&[Point::new(1, 1), Point::new(8, 1), Point::new(1, 8)], Color::BLUE);
        let expected: HashSet<_> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .filter(|&(x, y)| x >= 1 && y >= 1 && x + y <= 9)
            .collect();
        assert_eq!(painted(&canvas), expected);
    }

    #[test]
    fn diamond_vertices_do_not_desync_pairs() {
        let mut canvas = Canvas::new(11, 11).unwrap();
        let diamond = [Point::new(5, 1), Point::new(9, 5), Point::new(5, 9), Point::new(1, 5)];
        canvas.draw_polygon(&diamond, Color::GREEN);
        let expected: HashSet<_> = (0..11)
            .flat_map(|y| (0..11).map(move |x| (x, y)))
            .filter(|&(x, y): &(i32, i32)| (x - 5).abs() + (y - 5).abs() <= 4)
            .collect();
        assert_eq!(painted(&canvas), expected);
    }

    #[test]
    fn concave_polygon_leaves_notch_empty() {
        let mut canvas = Canvas::new(9, 7).unwrap();
        // U shape: one-pixel notch at x=4 in rows 1 and 2
        let u = [
            Point::new(1, 1),
            Point::new(3, 1),
            Point::new(3, 3),
            Point::new(5, 3),
            Point::new(5, 1),
            Point::new(7, 1),
            Point::new(7, 5),
            Point::new(1, 5),
        ];
        canvas.draw_polygon(&u, Color::BLACK);
        insta::assert_snapshot!(ascii(&canvas), @r"
        .........
        .AAA.AAA.
        .AAA.AAA.
        .AAAAAAA.
        .AAAAAAA.
        .AAAAAAA.
        .........
        ");
    }

    #[test]
    fn degenerate_polygons_do_not_panic() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.draw_polygon(&[], Color::BLACK);
        canvas.draw_polygon(&[Point::new(2, 2)], Color::BLACK);
        canvas.draw_polygon(&[Point::new(1, 1), Point::new(6, 1)], Color::BLACK);
        assert_eq!(painted(&canvas), (1..=6).map(|x| (x, 1)).chain([(2, 2)]).collect());
    }

    #[test]
    fn ellipse_rows() {
        let mut canvas = Canvas::new(9, 7).unwrap();
        canvas.draw_ellipse(Point::new(4, 3), Point::new(3, 2), Color::RED);
        insta::assert_snapshot!(ascii(&canvas), @r"
        .........
        ....A....
        ..AAAAA..
        .AAAAAAA.
        ..AAAAA..
        ....A....
        .........
        ");
    }

    #[test]
    fn ellipse_with_zero_x_radius_is_vertical_segment() {
        let mut canvas = Canvas::new(11, 11).unwrap();
        canvas.draw_ellipse(Point::new(5, 5), Point::new(0, 3), Color::BLACK);
        assert_eq!(painted(&canvas), (2..=8).map(|y| (5, y)).collect());
    }

    #[test]
    fn ellipse_with_zero_y_radius_is_horizontal_segment() {
        let mut canvas = Canvas::new(11, 11).unwrap();
        canvas.draw_ellipse(Point::new(5, 5), Point::new(4, 0), Color::BLACK);
        assert_eq!(painted(&canvas), (1..=9).map(|x| (x, 5)).collect());
    }

    #[test]
    fn ellipse_is_symmetric_and_bounded() {
        let mut canvas = Canvas::new(41, 31).unwrap();
        canvas.draw_ellipse(Point::new(20, 15), Point::new(17, 11), Color::BLACK);
        let pixels = painted(&canvas);
        for &(x, y) in &pixels {
            assert!((x - 20).abs() <= 17 && (y - 15).abs() <= 11);
            assert!(pixels.contains(&(40 - x, y)));
            assert!(pixels.contains(&(x, 30 - y)));
        }
        assert!(pixels.contains(&(3, 15)) && pixels.contains(&(37, 15)));
        assert!(pixels.contains(&(20, 4)) && pixels.contains(&(20, 26)));
    }
}
