//! Scene node types
//!
//! Every node knows how to:
//! - Resolve its geometry through its transform list
//! - Render itself onto a canvas
//! - Produce an anonymous deep duplicate under a different outer transform chain
//!
//! Circles, lines and rectangles are constructors on `EllipseShape` and
//! `PolyShape`, not separate variants.

use enum_dispatch::enum_dispatch;

use crate::types::{Color, Point, Transform, TransformList};

use super::canvas::Canvas;

/// Common behavior for all scene nodes
#[enum_dispatch]
pub trait Shape {
    /// Document id, if any. Duplicates never carry one.
    fn id(&self) -> Option<&str>;

    /// The node's transform chain, own transform first.
    fn transforms(&self) -> &TransformList;

    /// Short variant name for diagnostics
    fn kind(&self) -> &'static str;

    /// Paint this node (and any children) onto `canvas`. Never mutates the node.
    fn render(&self, canvas: &mut Canvas);

    /// Deep copy whose chain is `[own] ++ outer`, with geometry copied verbatim.
    fn duplicate(&self, outer: &[Transform]) -> Node;
}

/// A scene node. Children and referents are owned exclusively, so the tree is acyclic.
#[enum_dispatch(Shape)]
#[derive(Debug, PartialEq)]
pub enum Node {
    Ellipse(EllipseShape),
    Poly(PolyShape),
    Group(GroupShape),
    Use(UseShape),
}

// ============================================================================
// Ellipse
// ============================================================================

/// A filled ellipse
#[derive(Debug, PartialEq)]
pub struct EllipseShape {
    pub id: Option<String>,
    pub transforms: TransformList,
    pub color: Color,
    pub center: Point,
    pub radius: Point,
}

impl EllipseShape {
    pub fn new(center: Point, radius: Point, color: Color) -> Self {
        Self {
            id: None,
            transforms: TransformList::default(),
            color,
            center,
            radius,
        }
    }

    /// An ellipse with equal radii.
    pub fn circle(center: Point, radius: i32, color: Color) -> Self {
        Self::new(center, Point::new(radius, radius), color)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transforms(mut self, transforms: TransformList) -> Self {
        self.transforms = transforms;
        self
    }

    /// Center and radius in canvas space. The radius is only ever scaled.
    pub fn resolved(&self) -> (Point, Point) {
        (
            self.transforms.apply(self.center),
            self.transforms.apply_extent(self.radius).abs(),
        )
    }
}

impl Shape for EllipseShape {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn transforms(&self) -> &TransformList {
        &self.transforms
    }

    fn kind(&self) -> &'static str {
        "ellipse"
    }

    fn render(&self, canvas: &mut Canvas) {
        let (center, radius) = self.resolved();
        canvas.draw_ellipse(center, radius, self.color);
    }

    fn duplicate(&self, outer: &[Transform]) -> Node {
        EllipseShape {
            id: None,
            transforms: self.transforms.rebased(outer),
            color: self.color,
            center: self.center,
            radius: self.radius,
        }
        .into()
    }
}

// ============================================================================
// Poly (polyline / line / polygon / rect)
// ============================================================================

/// Whether a point sequence is stroked as an open chain or filled as a closed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyKind {
    /// n points, n-1 segments, no closing edge
    Open,
    /// Closing edge from last to first, interior filled
    Closed,
}

/// A point sequence: polyline, line, polygon or rectangle
#[derive(Debug, PartialEq)]
pub struct PolyShape {
    pub id: Option<String>,
    pub transforms: TransformList,
    pub points: Vec<Point>,
    pub color: Color,
    pub kind: PolyKind,
}

impl PolyShape {
    pub fn polyline(points: Vec<Point>, color: Color) -> Self {
        Self {
            id: None,
            transforms: TransformList::default(),
            points,
            color,
            kind: PolyKind::Open,
        }
    }

    pub fn line(from: Point, to: Point, color: Color) -> Self {
        Self::polyline(vec![from, to], color)
    }

    pub fn polygon(points: Vec<Point>, color: Color) -> Self {
        Self {
            kind: PolyKind::Closed,
            ..Self::polyline(points, color)
        }
    }

    /// Closed four-corner polygon: origin, +width, +width+height, +height.
    pub fn rect(origin: Point, width: i32, height: i32, color: Color) -> Self {
        Self::polygon(
            vec![
                origin,
                origin + Point::new(width, 0),
                origin + Point::new(width, height),
                origin + Point::new(0, height),
            ],
            color,
        )
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transforms(mut self, transforms: TransformList) -> Self {
        self.transforms = transforms;
        self
    }

    /// Points in canvas space.
    pub fn resolved(&self) -> Vec<Point> {
        self.points.iter().map(|&p| self.transforms.apply(p)).collect()
    }
}

impl Shape for PolyShape {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn transforms(&self) -> &TransformList {
        &self.transforms
    }

    fn kind(&self) -> &'static str {
        match self.kind {
            PolyKind::Open => "polyline",
            PolyKind::Closed => "polygon",
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        let points = self.resolved();
        match self.kind {
            PolyKind::Open => {
                for segment in points.windows(2) {
                    canvas.draw_line(segment[0], segment[1], self.color);
                }
            }
            PolyKind::Closed => canvas.draw_polygon(&points, self.color),
        }
    }

    fn duplicate(&self, outer: &[Transform]) -> Node {
        PolyShape {
            id: None,
            transforms: self.transforms.rebased(outer),
            points: self.points.clone(),
            color: self.color,
            kind: self.kind,
        }
        .into()
    }
}

// ============================================================================
// Group
// ============================================================================

/// An ordered list of owned children, drawn in document order.
///
/// Each child's chain already includes this group's chain; the group itself
/// applies nothing at render time.
#[derive(Debug, PartialEq)]
pub struct GroupShape {
    pub id: Option<String>,
    pub transforms: TransformList,
    pub children: Vec<Node>,
}

impl GroupShape {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            id: None,
            transforms: TransformList::default(),
            children,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transforms(mut self, transforms: TransformList) -> Self {
        self.transforms = transforms;
        self
    }
}

impl Shape for GroupShape {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn transforms(&self) -> &TransformList {
        &self.transforms
    }

    fn kind(&self) -> &'static str {
        "group"
    }

    fn render(&self, canvas: &mut Canvas) {
        for child in &self.children {
            child.render(canvas);
        }
    }

    fn duplicate(&self, outer: &[Transform]) -> Node {
        let transforms = self.transforms.rebased(outer);
        // Children keep everything up to and including this group's own transform.
        let children = self
            .children
            .iter()
            .map(|child| child.duplicate(transforms.as_slice()))
            .collect();
        GroupShape {
            id: None,
            transforms,
            children,
        }
        .into()
    }
}

// ============================================================================
// Use
// ============================================================================

/// A private, transform-extended copy of another node.
///
/// The copy is taken when the `UseShape` is built; later changes to the target
/// (there are none, nodes are immutable) could not reach it.
#[derive(Debug, PartialEq)]
pub struct UseShape {
    pub id: Option<String>,
    pub transforms: TransformList,
    pub referent: Box<Node>,
}

impl UseShape {
    /// Duplicate `target` under this use-site's chain.
    pub fn new(target: &Node, transforms: TransformList) -> Self {
        let referent = Box::new(target.duplicate(transforms.as_slice()));
        Self {
            id: None,
            transforms,
            referent,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Shape for UseShape {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn transforms(&self) -> &TransformList {
        &self.transforms
    }

    fn kind(&self) -> &'static str {
        "use"
    }

    fn render(&self, canvas: &mut Canvas) {
        self.referent.render(canvas);
    }

    fn duplicate(&self, outer: &[Transform]) -> Node {
        let transforms = self.transforms.rebased(outer);
        let referent = Box::new(self.referent.duplicate(transforms.as_slice()));
        UseShape {
            id: None,
            transforms,
            referent,
        }
        .into()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CompareResult, ascii, compare_canvases};

    fn canvas(w: i32, h: i32) -> Canvas {
        Canvas::new(w, h).unwrap()
    }

    #[test]
    fn rect_corners() {
        let rect = PolyShape::rect(Point::new(2, 3), 4, 5, Color::RED);
        assert_eq!(
            rect.points,
            vec![Point::new(2, 3), Point::new(6, 3), Point::new(6, 8), Point::new(2, 8)]
        );
        assert_eq!(rect.kind, PolyKind::Closed);
        assert_eq!(PolyShape::line(Point::ORIGIN, Point::new(1, 1), Color::RED).kind, PolyKind::Open);
    }

    #[test]
    fn rectangle_paints_whole_canvas() {
        let mut c = canvas(4, 4);
        Node::from(PolyShape::rect(Point::ORIGIN, 4, 4, Color::RED)).render(&mut c);
        assert!(c.pixels().iter().all(|&p| p == Color::RED));
    }

    #[test]
    fn polyline_is_open() {
        let mut c = canvas(6, 6);
        let pts = vec![Point::new(1, 1), Point::new(4, 1), Point::new(4, 4)];
        Node::from(PolyShape::polyline(pts, Color::BLACK)).render(&mut c);
        insta::assert_snapshot!(ascii(&c), @r"
        ......
        .AAAA.
        ....A.
        ....A.
        ....A.
        ......
        ");
    }

    #[test]
    fn ellipse_radius_is_scaled_not_rotated_or_translated() {
        let chain = TransformList::new(Transform {
            translate: Point::new(5, 0),
            rotate: 90,
            scale: 2,
            origin: Point::ORIGIN,
        });
        let e = EllipseShape::new(Point::new(1, 0), Point::new(3, 1), Color::RED).with_transforms(chain);
        // center: (1,0) -> T (6,0) -> S (12,0) -> R (0,12)
        assert_eq!(e.resolved(), (Point::new(0, 12), Point::new(6, 2)));
    }

    #[test]
    fn negative_scale_keeps_radius_positive() {
        let e = EllipseShape::circle(Point::new(10, 10), 3, Color::RED)
            .with_transforms(TransformList::new(Transform::scaling(-1)));
        assert_eq!(e.resolved(), (Point::new(-10, -10), Point::new(3, 3)));
    }

    #[test]
    fn duplicate_replaces_outer_chain_and_drops_id() {
        let own = Transform::translation(1, 1);
        let original = Node::from(
            PolyShape::polygon(vec![Point::ORIGIN, Point::new(3, 0), Point::new(0, 3)], Color::BLUE)
                .with_id("tri")
                .with_transforms(TransformList::with_outer(own, &[Transform::scaling(9)])),
        );
        let extra = [Transform::translation(10, 0)];
        let copy = original.duplicate(&extra);
        assert_eq!(copy.id(), None);
        assert_eq!(copy.transforms().as_slice(), &[own, extra[0]]);
        let Node::Poly(poly) = &copy else { panic!("expected poly, got {}", copy.kind()) };
        assert_eq!(poly.points, vec![Point::ORIGIN, Point::new(3, 0), Point::new(0, 3)]);
        // The original is untouched.
        assert_eq!(original.id(), Some("tri"));
        assert_eq!(original.transforms().len(), 2);
    }

    #[test]
    fn duplicate_renders_like_original_with_extra_chain() {
        let own = Transform::rotation(90).with_origin(Point::new(5, 5));
        let extra = [Transform::translation(3, 1), Transform::scaling(2)];
        let original = EllipseShape::new(Point::new(7, 5), Point::new(2, 1), Color::RED)
            .with_transforms(TransformList::new(own));
        let expected = EllipseShape::new(Point::new(7, 5), Point::new(2, 1), Color::RED)
            .with_transforms(TransformList::with_outer(own, &extra));

        let mut a = canvas(30, 30);
        Node::from(original).duplicate(&extra).render(&mut a);
        let mut b = canvas(30, 30);
        expected.render(&mut b);
        assert_eq!(compare_canvases(&b, &a), CompareResult::Match);
    }

    #[test]
    fn group_duplicate_keeps_group_transform() {
        let group_own = Transform::translation(0, 4);
        let child = EllipseShape::circle(Point::new(2, 2), 1, Color::RED)
            .with_transforms(TransformList::with_outer(Transform::IDENTITY, &[group_own]));
        let group = Node::from(
            GroupShape::new(vec![child.into()]).with_transforms(TransformList::new(group_own)),
        );
        let copy = group.duplicate(&[Transform::translation(10, 0)]);
        let Node::Group(g) = &copy else { panic!("expected group") };
        assert_eq!(
            g.children[0].transforms().as_slice(),
            &[Transform::IDENTITY, group_own, Transform::translation(10, 0)]
        );
    }

    #[test]
    fn use_of_circle_is_offset_copy() {
        let circle = Node::from(EllipseShape::circle(Point::new(4, 4), 3, Color::RED).with_id("a"));
        let reuse = UseShape::new(&circle, TransformList::new(Transform::translation(10, 0)));
        let group = Node::from(GroupShape::new(vec![circle, reuse.into()]));

        let mut c = canvas(20, 9);
        group.render(&mut c);
        let mut painted = 0;
        for y in 0..9 {
            for x in 0..10 {
                let left = c.pixel(x, y).unwrap();
                assert_eq!(left, c.pixel(x + 10, y).unwrap(), "mismatch at ({x}, {y})");
                if left == Color::RED {
                    painted += 1;
                }
            }
        }
        assert!(painted > 20);
        let Node::Group(g) = &group else { panic!("expected group") };
        assert!(matches!(&g.children[1], Node::Use(u) if matches!(*u.referent, Node::Ellipse(_))));
    }

    #[test]
    fn later_children_draw_over_earlier_ones() {
        let under = PolyShape::rect(Point::ORIGIN, 4, 4, Color::RED);
        let over = PolyShape::rect(Point::new(1, 1), 1, 1, Color::BLUE);
        let mut c = canvas(4, 4);
        Node::from(GroupShape::new(vec![under.into(), over.into()])).render(&mut c);
        insta::assert_snapshot!(ascii(&c), @r"
        AAAA
        ABBA
        ABBA
        AAAA
        ");
    }

    #[test]
    fn use_of_use_nests_chains() {
        let dot = Node::from(EllipseShape::circle(Point::new(1, 1), 0, Color::BLACK).with_id("dot"));
        let first = Node::from(UseShape::new(&dot, TransformList::new(Transform::translation(2, 0))));
        let second = UseShape::new(&first, TransformList::new(Transform::translation(0, 3)));
        let Node::Use(inner) = second.referent.as_ref() else { panic!("expected use") };
        assert_eq!(
            inner.referent.transforms().as_slice(),
            &[Transform::IDENTITY, Transform::translation(2, 0), Transform::translation(0, 3)]
        );
        let mut c = canvas(5, 5);
        second.render(&mut c);
        assert_eq!(c.pixel(3, 4), Ok(Color::BLACK));
        assert_eq!(c.pixels().iter().filter(|&&p| p == Color::BLACK).count(), 1);
    }
}
