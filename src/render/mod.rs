//! Raster rendering of a scene forest
//!
//! This module is organized into submodules:
//! - `defaults`: Background colour, default paint, canvas limits
//! - `canvas`: Pixel buffer and the line / polygon / ellipse primitives
//! - `shapes`: Scene node variants and their render / duplicate operations

pub mod canvas;
pub mod defaults;
pub mod shapes;

pub use canvas::Canvas;
pub use shapes::{EllipseShape, GroupShape, Node, PolyKind, PolyShape, Shape, UseShape};

use crate::errors::CanvasError;
use crate::log::debug;

/// An assembled scene: canvas dimensions plus the ordered root nodes.
#[derive(Debug, PartialEq)]
pub struct Scene {
    pub width: i32,
    pub height: i32,
    pub roots: Vec<Node>,
}

impl Scene {
    pub fn new(width: i32, height: i32, roots: Vec<Node>) -> Self {
        Self { width, height, roots }
    }
}

/// Allocate a canvas for `scene` and paint every root in order.
pub fn render(scene: &Scene) -> Result<Canvas, CanvasError> {
    let mut canvas = Canvas::new(scene.width, scene.height)?;
    render_into(&mut canvas, &scene.roots);
    Ok(canvas)
}

/// Paint `roots` onto an existing canvas in painter's order.
pub fn render_into(canvas: &mut Canvas, roots: &[Node]) {
    for (_index, root) in roots.iter().enumerate() {
        debug!(index = _index, kind = root.kind(), id = ?root.id(), "rendering root");
        root.render(canvas);
    }
}
