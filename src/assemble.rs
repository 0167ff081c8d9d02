//! Scene assembly: document tree to scene nodes
//!
//! Walks the parsed elements in document order, builds each element's
//! transform chain (`[own] ++ parent's chain`), keeps a registry of nodes
//! with ids, and resolves `use` references against it.

use std::collections::HashMap;

use crate::ast::{Document, Element, Span};
use crate::errors::{ConstructionError, SourceContext};
use crate::log::{debug, warn};
use crate::parse::{parse_number, parse_origin, parse_points, parse_transform};
use crate::render::defaults;
use crate::render::{EllipseShape, GroupShape, Node, PolyShape, Scene, Shape, UseShape};
use crate::types::{Color, Point, Transform, TransformList};

/// Build a scene from a parsed document.
pub fn assemble(doc: &Document, ctx: &SourceContext) -> Result<Scene, ConstructionError> {
    let root = &doc.root;
    if root.name != "svg" {
        return Err(ConstructionError::BadRoot {
            name: root.name.clone(),
            src: ctx.named_source(),
            span: root.name_span.into(),
        });
    }

    let mut assembler = Assembler::new(ctx);
    let width = assembler.number(root, "width")?;
    let height = assembler.number(root, "height")?;

    let mut roots = Vec::new();
    for child in &root.children {
        if let Some(node) = assembler.element(child, &[])? {
            roots.push(node);
        }
    }

    debug!(width, height, roots = roots.len(), "assembled scene");
    Ok(Scene::new(width, height, roots))
}

/// Registered template for `use`: the node under its own transform only.
struct Template {
    node: Node,
    span: Span,
}

struct Assembler<'a> {
    ctx: &'a SourceContext,
    templates: HashMap<String, Template>,
    /// Ids of groups currently being assembled, innermost last
    open: Vec<(String, Span)>,
}

impl<'a> Assembler<'a> {
    fn new(ctx: &'a SourceContext) -> Self {
        Self {
            ctx,
            templates: HashMap::new(),
            open: Vec::new(),
        }
    }

    fn element(&mut self, el: &Element, outer: &[Transform]) -> Result<Option<Node>, ConstructionError> {
        let id = el.attr_value("id").filter(|id| !id.is_empty()).map(str::to_string);
        if let Some(id) = &id {
            self.check_unique(id, el)?;
        }

        let transforms = TransformList::with_outer(self.own_transform(el)?, outer);

        let node: Node = match el.name.as_str() {
            "ellipse" => {
                let center = self.point(el, "cx", "cy")?;
                let radius = self.point(el, "rx", "ry")?;
                EllipseShape::new(center, radius, self.paint(el, "fill")?)
                    .with_transforms(transforms)
                    .into()
            }
            "circle" => {
                let center = self.point(el, "cx", "cy")?;
                let r = self.number(el, "r")?;
                EllipseShape::circle(center, r, self.paint(el, "fill")?)
                    .with_transforms(transforms)
                    .into()
            }
            "polyline" => PolyShape::polyline(self.points(el)?, self.paint(el, "stroke")?)
                .with_transforms(transforms)
                .into(),
            "line" => {
                let from = self.point(el, "x1", "y1")?;
                let to = self.point(el, "x2", "y2")?;
                PolyShape::line(from, to, self.paint(el, "stroke")?)
                    .with_transforms(transforms)
                    .into()
            }
            "polygon" => PolyShape::polygon(self.points(el)?, self.paint(el, "fill")?)
                .with_transforms(transforms)
                .into(),
            "rect" => {
                let origin = self.point(el, "x", "y")?;
                let width = self.number(el, "width")?;
                let height = self.number(el, "height")?;
                PolyShape::rect(origin, width, height, self.paint(el, "fill")?)
                    .with_transforms(transforms)
                    .into()
            }
            "g" => {
                if let Some(id) = &id {
                    self.open.push((id.clone(), el.span));
                }
                let children = self.children(el, &transforms);
                if id.is_some() {
                    self.open.pop();
                }
                GroupShape::new(children?).with_transforms(transforms).into()
            }
            "use" => self.reference(el, transforms)?.into(),
            _other => {
                warn!(element = _other, "skipping unsupported element");
                return Ok(None);
            }
        };

        let node = match id {
            Some(id) => {
                debug!(id = %id, kind = node.kind(), "registering template");
                self.templates.insert(
                    id.clone(),
                    Template {
                        node: node.duplicate(&[]),
                        span: el.span,
                    },
                );
                with_id(node, id)
            }
            None => node,
        };
        Ok(Some(node))
    }

    fn children(&mut self, el: &Element, transforms: &TransformList) -> Result<Vec<Node>, ConstructionError> {
        let mut children = Vec::with_capacity(el.children.len());
        for child in &el.children {
            if let Some(node) = self.element(child, transforms.as_slice())? {
                children.push(node);
            }
        }
        Ok(children)
    }

    /// Resolve a `use` element against the templates registered so far.
    fn reference(&self, el: &Element, transforms: TransformList) -> Result<UseShape, ConstructionError> {
        let href = el
            .attr("href")
            .or_else(|| el.attr("xlink:href"))
            .ok_or_else(|| ConstructionError::MissingHref {
                src: self.ctx.named_source(),
                span: el.name_span.into(),
            })?;

        let Some(target) = href.value.trim().strip_prefix('#') else {
            return Err(ConstructionError::InvalidAttribute {
                attribute: href.name.clone(),
                message: "expected a local reference of the form #id".to_string(),
                src: self.ctx.named_source(),
                span: href.value_span.into(),
            });
        };

        let referencing_self = el.attr_value("id") == Some(target)
            || self.open.iter().any(|(open, _)| open == target);
        if referencing_self {
            return Err(ConstructionError::SelfReference {
                id: target.to_string(),
                src: self.ctx.named_source(),
                span: href.value_span.into(),
            });
        }

        let template = self.templates.get(target).ok_or_else(|| ConstructionError::UnresolvedReference {
            id: target.to_string(),
            src: self.ctx.named_source(),
            span: href.value_span.into(),
        })?;

        debug!(target, chain = transforms.len(), "resolving use");
        Ok(UseShape::new(&template.node, transforms))
    }

    fn check_unique(&self, id: &str, el: &Element) -> Result<(), ConstructionError> {
        let first = self
            .templates
            .get(id)
            .map(|t| t.span)
            .or_else(|| self.open.iter().find(|(open, _)| open == id).map(|(_, span)| *span));
        match first {
            Some(first) => Err(ConstructionError::DuplicateId {
                id: id.to_string(),
                src: self.ctx.named_source(),
                first: first.into(),
                second: el.span.into(),
            }),
            None => Ok(()),
        }
    }

    fn own_transform(&self, el: &Element) -> Result<Transform, ConstructionError> {
        let mut transform = match el.attr("transform") {
            Some(attr) => parse_transform(&attr.value).map_err(|message| self.invalid(el, "transform", message))?,
            None => Transform::IDENTITY,
        };
        if let Some(attr) = el.attr("transform-origin") {
            let origin = parse_origin(&attr.value).map_err(|message| self.invalid(el, "transform-origin", message))?;
            transform = transform.with_origin(origin);
        }
        Ok(transform)
    }

    /// Integer attribute; absent means 0.
    fn number(&self, el: &Element, name: &str) -> Result<i32, ConstructionError> {
        match el.attr(name) {
            Some(attr) => parse_number(&attr.value).map_err(|message| self.invalid(el, name, message)),
            None => Ok(0),
        }
    }

    fn point(&self, el: &Element, x: &str, y: &str) -> Result<Point, ConstructionError> {
        Ok(Point::new(self.number(el, x)?, self.number(el, y)?))
    }

    fn points(&self, el: &Element) -> Result<Vec<Point>, ConstructionError> {
        match el.attr("points") {
            Some(attr) => parse_points(&attr.value).map_err(|message| self.invalid(el, "points", message)),
            None => Ok(Vec::new()),
        }
    }

    /// `fill` / `stroke` colour; absent means the default paint.
    fn paint(&self, el: &Element, name: &str) -> Result<Color, ConstructionError> {
        match el.attr(name) {
            Some(attr) => attr
                .value
                .parse()
                .map_err(|e: crate::types::UnknownColor| self.invalid(el, name, e.to_string())),
            None => Ok(defaults::PAINT),
        }
    }

    fn invalid(&self, el: &Element, name: &str, message: String) -> ConstructionError {
        let span = el.attr(name).map_or(el.name_span, |a| a.value_span);
        ConstructionError::InvalidAttribute {
            attribute: name.to_string(),
            message,
            src: self.ctx.named_source(),
            span: span.into(),
        }
    }
}

fn with_id(node: Node, id: String) -> Node {
    match node {
        Node::Ellipse(e) => e.with_id(id).into(),
        Node::Poly(p) => p.with_id(id).into(),
        Node::Group(g) => g.with_id(id).into(),
        Node::Use(u) => u.with_id(id).into(),
    }
}
