//! Error types with rich diagnostics using miette
//!
//! Errors raised while reading the document carry source spans; canvas errors carry coordinates.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors that occur while reading the markup
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(rastik::parse::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("closing tag </{found}> does not match <{expected}>")]
    #[diagnostic(code(rastik::parse::mismatched_tag))]
    MismatchedTag {
        expected: String,
        found: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("opened here")]
        open: SourceSpan,
        #[label("closed here")]
        close: SourceSpan,
    },
}

// ============================================================================
// Construction Errors
// ============================================================================

/// Errors that occur while assembling the scene from a parsed document.
///
/// All of these are raised before a canvas is allocated.
#[derive(Error, Diagnostic, Debug)]
pub enum ConstructionError {
    #[error("root element must be <svg>, found <{name}>")]
    #[diagnostic(code(rastik::assemble::bad_root))]
    BadRoot {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected <svg>")]
        span: SourceSpan,
    },

    #[error("invalid value for attribute `{attribute}`: {message}")]
    #[diagnostic(code(rastik::assemble::invalid_attribute))]
    InvalidAttribute {
        attribute: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this value")]
        span: SourceSpan,
    },

    #[error("<use> element has no href")]
    #[diagnostic(code(rastik::assemble::missing_href), help("add href=\"#some-id\""))]
    MissingHref {
        #[source_code]
        src: NamedSource<String>,
        #[label("no href")]
        span: SourceSpan,
    },

    #[error("unresolved reference: #{id}")]
    #[diagnostic(
        code(rastik::assemble::unresolved_reference),
        help("a <use> may only reference an element with that id defined earlier in the document")
    )]
    UnresolvedReference {
        id: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("no element with this id")]
        span: SourceSpan,
    },

    #[error("element #{id} references itself")]
    #[diagnostic(code(rastik::assemble::self_reference))]
    SelfReference {
        id: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("cyclic reference")]
        span: SourceSpan,
    },

    #[error("duplicate id: {id}")]
    #[diagnostic(code(rastik::assemble::duplicate_id))]
    DuplicateId {
        id: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("first defined here")]
        first: SourceSpan,
        #[label("defined again here")]
        second: SourceSpan,
    },
}

// ============================================================================
// Canvas Errors
// ============================================================================

/// Errors raised by the raster canvas
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    #[diagnostic(code(rastik::canvas::out_of_bounds))]
    OutOfBounds { x: i32, y: i32, width: u32, height: u32 },

    #[error("invalid canvas dimensions {width}x{height}")]
    #[diagnostic(code(rastik::canvas::invalid_dimensions), help("width and height must be positive"))]
    InvalidDimensions { width: i64, height: i64 },

    #[error("canvas {width}x{height} exceeds the supported size")]
    #[diagnostic(code(rastik::canvas::too_large))]
    TooLarge { width: u32, height: u32 },
}

// ============================================================================
// Encoding Errors
// ============================================================================

/// Errors from the image encoding collaborator
#[derive(Error, Diagnostic, Debug)]
pub enum EncodeError {
    #[error("failed to write {path}")]
    #[diagnostic(code(rastik::encode::write))]
    Write {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {path}")]
    #[diagnostic(code(rastik::encode::read))]
    Read {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Canvas(#[from] CanvasError),
}
