//! Geometry primitives for rastik (small `Copy` value types).
//!
//! - `Point` is an integer pixel-space pair, also used for direction vectors (radii)
//! - `Color` is an opaque 8-bit RGB triple
//! - `Transform` is one atomic translate/scale/rotate step about an origin
//! - `TransformList` is the ordered chain from a node outwards to the canvas

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use glam::DVec2;

/// Integer point (or vector) in canvas space. Y grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Offset this point by `delta`.
    #[inline]
    pub fn translate(self, delta: Point) -> Point {
        self + delta
    }

    /// Scale the vector from `origin` to this point by `factor`, then add `origin` back.
    ///
    /// With `origin == Point::ORIGIN` this scales a pure direction vector such as a radius.
    #[inline]
    pub fn scale(self, origin: Point, factor: i32) -> Point {
        origin + (self - origin) * factor
    }

    /// Rotate about `origin` by `degrees` (clockwise on screen, since Y points down).
    ///
    /// The rotated offset is rounded to the nearest integer on each axis.
    pub fn rotate(self, origin: Point, degrees: i32) -> Point {
        if degrees % 360 == 0 {
            return self;
        }
        let offset = self - origin;
        let rotated = DVec2::from_angle(f64::from(degrees).to_radians())
            .rotate(DVec2::new(f64::from(offset.x), f64::from(offset.y)));
        origin + Point::new(rotated.x.round() as i32, rotated.y.round() as i32)
    }

    /// Component-wise absolute value, used for extents after a negative scale.
    #[inline]
    pub fn abs(self) -> Point {
        Point::new(self.x.saturating_abs(), self.y.saturating_abs())
    }
}

// Point arithmetic saturates: far off-canvas geometry pins at the i32 range
// instead of wrapping back onto the canvas.
impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, rhs: i32) -> Point {
        Point::new(self.x.saturating_mul(rhs), self.y.saturating_mul(rhs))
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Opaque 24-bit colour. There is no alpha channel; later writes simply replace earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(0xff, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 0x80, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Build a colour from a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Color::rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }

    /// Look up an SVG colour keyword (case-insensitive).
    pub fn named(name: &str) -> Option<Color> {
        let name = name.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, packed)| Color::from_u32(*packed))
    }

    /// Parse `#rgb` / `#rrggbb` hex notation.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Color::from_u32),
            3 => {
                let mut channels = digits.chars().filter_map(|c| c.to_digit(16));
                let mut next = || channels.next().map(|v| (v * 0x11) as u8);
                Some(Color::rgb(next()?, next()?, next()?))
            }
            _ => None,
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Error for colour strings that are neither hex nor a known keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown colour: {}", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let color = if s.starts_with('#') { Color::from_hex(s) } else { Color::named(s) };
        color.ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// SVG colour keywords (24-bit values).
const NAMED_COLORS: &[(&str, u32)] = &[
    ("white", 0xffffff),
    ("black", 0x000000),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("cyan", 0x00ffff),
    ("aqua", 0x00ffff),
    ("magenta", 0xff00ff),
    ("fuchsia", 0xff00ff),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("lightgray", 0xd3d3d3),
    ("lightgrey", 0xd3d3d3),
    ("darkgray", 0xa9a9a9),
    ("darkgrey", 0xa9a9a9),
    ("orange", 0xffa500),
    ("pink", 0xffc0cb),
    ("purple", 0x800080),
    ("bisque", 0xffe4c4),
    ("beige", 0xf5f5dc),
    ("brown", 0xa52a2a),
    ("coral", 0xff7f50),
    ("gold", 0xffd700),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("linen", 0xfaf0e6),
    ("maroon", 0x800000),
    ("navy", 0x000080),
    ("olive", 0x808000),
    ("salmon", 0xfa8072),
    ("silver", 0xc0c0c0),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
];

/// One atomic transform step.
///
/// Applied to a position as: translate, then scale about `origin`, then rotate about `origin`.
/// The order is fixed regardless of how the transform was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    pub translate: Point,
    /// Rotation in degrees
    pub rotate: i32,
    pub scale: i32,
    /// Origin for both scaling and rotation
    pub origin: Point,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate: Point::ORIGIN,
        rotate: 0,
        scale: 1,
        origin: Point::ORIGIN,
    };

    pub fn translation(dx: i32, dy: i32) -> Self {
        Transform { translate: Point::new(dx, dy), ..Transform::IDENTITY }
    }

    pub fn rotation(degrees: i32) -> Self {
        Transform { rotate: degrees, ..Transform::IDENTITY }
    }

    pub fn scaling(factor: i32) -> Self {
        Transform { scale: factor, ..Transform::IDENTITY }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Map a position through this step (T, then S, then R).
    pub fn apply(&self, p: Point) -> Point {
        p.translate(self.translate)
            .scale(self.origin, self.scale)
            .rotate(self.origin, self.rotate)
    }

    /// Map an extent (radius): scaled about (0,0), never translated or rotated.
    pub fn apply_extent(&self, v: Point) -> Point {
        v.scale(Point::ORIGIN, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

/// Ordered transform chain: the node's own transform first, then each ancestor's outwards.
///
/// Never empty; construction always supplies the node's own entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformList(Vec<Transform>);

impl TransformList {
    /// A chain holding only the node's own transform.
    pub fn new(own: Transform) -> Self {
        TransformList(vec![own])
    }

    /// `[own] ++ outer`.
    pub fn with_outer(own: Transform, outer: &[Transform]) -> Self {
        let mut list = Vec::with_capacity(outer.len() + 1);
        list.push(own);
        list.extend_from_slice(outer);
        TransformList(list)
    }

    /// The node's own (innermost) transform.
    pub fn own(&self) -> Transform {
        self.0[0]
    }

    pub fn as_slice(&self) -> &[Transform] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Keep the own transform, replace everything outside it with `outer`.
    pub fn rebased(&self, outer: &[Transform]) -> Self {
        TransformList::with_outer(self.own(), outer)
    }

    /// Resolve a position through every step, innermost first.
    pub fn apply(&self, p: Point) -> Point {
        self.0.iter().fold(p, |acc, t| t.apply(acc))
    }

    /// Resolve an extent through every step's scale.
    pub fn apply_extent(&self, v: Point) -> Point {
        self.0.iter().fold(v, |acc, t| t.apply_extent(acc))
    }
}

impl Default for TransformList {
    fn default() -> Self {
        TransformList::new(Transform::IDENTITY)
    }
}
