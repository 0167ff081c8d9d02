use std::path::Path;

use miette::{IntoDiagnostic, WrapErr};
use pest_derive::Parser;

pub mod assemble;
pub mod ast;
pub mod compare;
pub mod encode;
pub mod errors;
pub mod log;
pub mod parse;
pub mod render;
pub mod types;

pub use errors::{CanvasError, ConstructionError, EncodeError, ParseError, SourceContext};
pub use render::{Canvas, Node, Scene};
pub use types::{Color, Point, Transform, TransformList};

#[derive(Parser)]
#[grammar = "svg.pest"]
pub struct SvgParser;

/// Render SVG markup to a canvas.
///
/// Parses, assembles the scene (resolving every `use`), then rasterizes it.
/// Nothing is drawn unless the whole document is valid.
pub fn render_svg(source: &str) -> Result<Canvas, miette::Report> {
    render_named("<input>", source)
}

/// Like [`render_svg`], with `name` shown in diagnostics.
pub fn render_named(name: &str, source: &str) -> Result<Canvas, miette::Report> {
    let ctx = SourceContext::new(name, source);
    let doc = parse::parse(&ctx)?;
    let scene = assemble::assemble(&doc, &ctx)?;
    Ok(render::render(&scene)?)
}

/// Read the SVG file at `svg_path` and write the rendered image to `png_path`.
pub fn convert(svg_path: impl AsRef<Path>, png_path: impl AsRef<Path>) -> Result<(), miette::Report> {
    let svg_path = svg_path.as_ref();
    let source = std::fs::read_to_string(svg_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", svg_path.display()))?;
    let canvas = render_named(&svg_path.display().to_string(), &source)?;
    encode::save_png(&canvas, png_path)?;
    Ok(())
}
