//////////////////////////////////////////////////////////////////////
// points, rectangles, and the coordinate graph the turtle produces

use std::collections::HashMap;
use std::collections::hash_map::Entry::{Occupied, Vacant};

//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

pub type Vec2d = nalgebra::Vector2<f64>;
pub type Point2d = nalgebra::geometry::Point2<f64>;
pub type Translation2d = nalgebra::Translation2<f64>;
pub type Transform2d = nalgebra::Transform2<f64>;
type Matrix3d = nalgebra::Matrix3<f64>;

const PI: f64 = std::f64::consts::PI;
const DEG: f64 = PI / 180.0;

// grid spacing, relative to a unit step, used to decide that two
// points are the same node
pub const NODE_TOLERANCE: f64 = 1e-12;

// past this many cells a coordinate no longer fits the grid and
// is keyed by its exact value
const GRID_LIMIT: f64 = 9007199254740992.0; // 2^53

//////////////////////////////////////////////////////////////////////
// conversions for callers that don't speak nalgebra

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * DEG
}

pub fn point_from_tuple<T: Into<f64>>((x, y): (T, T)) -> Point2d {
    Point2d::new(x.into(), y.into())
}

pub fn point_to_array(p: &Point2d) -> [f64; 2] {
    [p.x, p.y]
}

//////////////////////////////////////////////////////////////////////
// Rect2d type has lower-left p0 and upper-right p1

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2d {
    pub p0: Point2d,
    pub p1: Point2d
}

impl Rect2d {

    // empty rectangle has p0 > p1
    pub fn empty() -> Self {

        let p0 = Point2d::new(f64::MAX, f64::MAX);
        let p1 = -p0;

        Rect2d { p0, p1 }

    }

    pub fn new(p0: Point2d, p1: Point2d) -> Self {
        Rect2d { p0, p1 }
    }

    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    // expand this rect to include the given point
    pub fn expand(&mut self, p: &Point2d) {
        self.p0 = self.p0.inf(p);
        self.p1 = self.p1.sup(p);
    }

    pub fn dims(&self) -> Vec2d {
        self.p1 - self.p0
    }

    pub fn center(&self) -> Point2d {
        self.p0 + 0.5*(self.p1 - self.p0)
    }

}

//////////////////////////////////////////////////////////////////////
//
// make a Transform2d that will translate and uniformly scale the
// given content rect into the target rect, centered.
//
// y flip is for canvases whose y axis increases going down.
// returns the transform and the scale factor it applies.

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum YFlip {
    Yes,
    No
}

pub fn fit_transform(content_rect: &Rect2d,
                     target_rect: &Rect2d,
                     yflip: YFlip) -> (Transform2d, f64) {

    let tmid = target_rect.center();
    let translate_target = Translation2d::new(tmid.x, tmid.y);

    // nothing to fit: put the origin at the middle of the target
    if content_rect.is_empty() {
        return (Transform2d::identity() * translate_target, 1.0);
    }

    let cdims = content_rect.dims();
    let tdims = target_rect.dims();

    // a degenerate axis (a straight line of segments) can't
    // constrain the scale, so only look at axes with extent
    let mut scl = f64::MAX;

    for i in 0..2 {
        if cdims[i] > 0.0 {
            scl = scl.min(tdims[i] / cdims[i]);
        }
    }

    if scl == f64::MAX {
        scl = 1.0;
    }

    let cmid = content_rect.center();

    let vsign = if yflip == YFlip::Yes { -1.0 } else { 1.0 };

    let scale = Transform2d::from_matrix_unchecked(
        Matrix3d::new(
            scl, 0.0, 0.0,
            0.0, scl*vsign, 0.0,
            0.0, 0.0, 1.0
        )
    );

    let translate_content = Translation2d::new(-cmid.x, -cmid.y);

    let transform = translate_target * scale * translate_content;

    (transform, scl)

}

//////////////////////////////////////////////////////////////////////
// hashable identity for a point. points are snapped to a grid of the
// given quantum so that floating point drift from long turtle walks
// still lands on the same node; coordinates too large for the grid,
// or a non-positive quantum, fall back to exact identity.

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeKey {
    Grid(i64, i64),
    Exact(u64, u64)
}

impl NodeKey {

    pub fn from_point(p: &Point2d, quantum: f64) -> Self {

        if quantum > 0.0 && quantum.is_finite() {

            let q = p.coords / quantum;

            // nearest grid cell, not truncation toward zero
            if q.x.abs() < GRID_LIMIT && q.y.abs() < GRID_LIMIT {
                return NodeKey::Grid(q.x.round() as i64, q.y.round() as i64);
            }

        }

        // adding 0.0 folds -0.0 into 0.0
        NodeKey::Exact((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())

    }

}

//////////////////////////////////////////////////////////////////////
// directed graph from origin points to the ordered list of points
// reached by one step from them.
//
// origins keep their first-insertion order so iteration, and hence
// edge_list(), is deterministic for a given walk.

#[derive(Debug, Clone)]
pub struct Graph {

    origins:  Vec<(Point2d, Vec<Point2d>)>, // origin + destinations
    index:    HashMap<NodeKey, usize>,      // key -> index into origins
    quantum:  f64,
    edges:    usize

}

impl Default for Graph {
    fn default() -> Self {
        Graph::with_quantum(NODE_TOLERANCE)
    }
}

impl Graph {

    pub fn new() -> Self {
        Default::default()
    }

    // quantum is the node grid spacing in world units
    pub fn with_quantum(quantum: f64) -> Self {
        Graph {
            origins: Vec::new(),
            index: HashMap::new(),
            quantum: quantum,
            edges: 0
        }
    }

    pub fn quantum(&self) -> f64 {
        self.quantum
    }

    // empties the graph and changes the grid spacing for what follows
    pub fn reset(&mut self, quantum: f64) {
        self.clear();
        self.quantum = quantum;
    }

    pub fn clear(&mut self) {
        self.origins.clear();
        self.index.clear();
        self.edges = 0;
    }

    fn key(&self, p: &Point2d) -> NodeKey {
        NodeKey::from_point(p, self.quantum)
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    // number of points with at least one outgoing edge
    pub fn node_count(&self) -> usize {
        self.origins.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    // append an edge, creating the origin node if it's new. an origin
    // node keeps the first point seen for its key; destinations are
    // stored as given.
    pub fn add_edge(&mut self, from: Point2d, to: Point2d) {

        let key = self.key(&from);

        let idx = match self.index.entry(key) {

            Occupied(o) => {
                *o.get()
            }

            Vacant(v) => {
                let idx_new = self.origins.len();
                self.origins.push((from, Vec::new()));
                v.insert(idx_new);
                idx_new
            }

        };

        self.origins[idx].1.push(to);
        self.edges += 1;

    }

    pub fn contains(&self, p: &Point2d) -> bool {
        self.index.contains_key(&self.key(p))
    }

    pub fn neighbors(&self, p: &Point2d) -> Option<&[Point2d]> {
        self.index.get(&self.key(p))
            .map(|&idx| self.origins[idx].1.as_slice())
    }

    pub fn nodes<'a>(&'a self) -> impl Iterator<Item=&'a Point2d> {
        self.origins.iter().map(|(p, _)| p)
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(&'a Point2d, &'a [Point2d])> {
        self.origins.iter().map(|(p, dests)| (p, dests.as_slice()))
    }

    // flatten into (origin, destination) pairs
    pub fn edge_list(&self) -> Vec<(Point2d, Point2d)> {

        let mut edges = Vec::with_capacity(self.edges);

        for (origin, destinations) in &self.origins {
            for destination in destinations {
                edges.push((*origin, *destination));
            }
        }

        edges

    }

    // bounding rect of every endpoint; empty rect for an empty graph
    pub fn bounds(&self) -> Rect2d {

        let mut rect = Rect2d::empty();

        for (origin, destinations) in &self.origins {
            rect.expand(origin);
            for destination in destinations {
                rect.expand(destination);
            }
        }

        rect

    }

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;

    fn close(a: &Point2d, b: &Point2d) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn degrees_convert_to_radians() {
        assert!((deg_to_rad(180.0) - PI).abs() < 1e-15);
        assert!((deg_to_rad(90.0) - 0.5*PI).abs() < 1e-15);
        assert_eq!(deg_to_rad(0.0), 0.0);
    }

    #[test]
    fn tuple_and_array_conversions() {
        let p = point_from_tuple((3, -4));
        assert_eq!(p, Point2d::new(3.0, -4.0));
        assert_eq!(point_to_array(&p), [3.0, -4.0]);

        let q = point_from_tuple((0.5f32, 1.5f32));
        assert_eq!(q, Point2d::new(0.5, 1.5));
    }

    #[test]
    fn empty_rect_expands_to_points() {
        let mut r = Rect2d::empty();
        assert!(r.is_empty());

        r.expand(&Point2d::new(1.0, 2.0));
        r.expand(&Point2d::new(-1.0, 4.0));

        assert!(!r.is_empty());
        assert_eq!(r.p0, Point2d::new(-1.0, 2.0));
        assert_eq!(r.p1, Point2d::new(1.0, 4.0));
        assert_eq!(r.dims(), Vec2d::new(2.0, 2.0));
        assert_eq!(r.center(), Point2d::new(0.0, 3.0));
    }

    #[test]
    fn fit_transform_centers_and_scales() {
        let content = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(2.0, 1.0));
        let target = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(100.0, 100.0));

        let (xform, scl) = fit_transform(&content, &target, YFlip::No);
        assert!((scl - 50.0).abs() < 1e-12);

        let mid = xform * content.center();
        assert!(close(&mid, &target.center()));

        let corner = xform * Point2d::new(2.0, 1.0);
        assert!(close(&corner, &Point2d::new(100.0, 75.0)));
    }

    #[test]
    fn fit_transform_flips_y() {
        let content = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(1.0, 1.0));
        let target = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(10.0, 10.0));

        let (xform, _) = fit_transform(&content, &target, YFlip::Yes);

        let top = xform * Point2d::new(0.0, 1.0);
        assert!(close(&top, &Point2d::new(0.0, 0.0)));
    }

    #[test]
    fn fit_transform_handles_flat_content() {
        let content = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 4.0));
        let target = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(8.0, 8.0));

        let (_, scl) = fit_transform(&content, &target, YFlip::No);
        assert!((scl - 2.0).abs() < 1e-12);

        let dot = Rect2d::new(Point2d::new(1.0, 1.0), Point2d::new(1.0, 1.0));
        let (_, scl) = fit_transform(&dot, &target, YFlip::No);
        assert_eq!(scl, 1.0);
    }

    #[test]
    fn fit_transform_of_empty_graph_is_finite() {
        let target = Rect2d::new(Point2d::new(0.0, 0.0), Point2d::new(640.0, 480.0));

        for &yflip in &[YFlip::No, YFlip::Yes] {
            let (xform, scl) = fit_transform(&Graph::new().bounds(), &target, yflip);
            assert_eq!(scl, 1.0);

            let p = xform * Point2d::origin();
            assert!(p.x.is_finite() && p.y.is_finite());
            assert!(close(&p, &Point2d::new(320.0, 240.0)));

            let q = xform * Point2d::new(1.0, 0.0);
            assert!(close(&q, &Point2d::new(321.0, 240.0)));
        }
    }

    #[test]
    fn node_keys_absorb_drift() {
        let a = Point2d::new(1.0, -1.0);
        let b = Point2d::new(1.0 + 6e-17, -1.0 - 2e-16);
        let c = Point2d::new(1.0 + 1e-6, -1.0);

        assert_eq!(NodeKey::from_point(&a, NODE_TOLERANCE), NodeKey::from_point(&b, NODE_TOLERANCE));
        assert_ne!(NodeKey::from_point(&a, NODE_TOLERANCE), NodeKey::from_point(&c, NODE_TOLERANCE));
    }

    #[test]
    fn node_keys_scale_with_quantum() {
        let a = Point2d::new(1e-10, 0.0);
        let b = Point2d::new(2e-10, 0.0);

        // a unit grid can't tell them apart, a grid scaled to the step can
        assert_eq!(NodeKey::from_point(&a, 1e-9), NodeKey::from_point(&b, 1e-9));
        assert_ne!(NodeKey::from_point(&a, 1e-22), NodeKey::from_point(&b, 1e-22));
    }

    #[test]
    fn node_keys_never_saturate() {
        // both are far past i64::MAX grid cells
        let a = Point2d::new(1e10, 0.0);
        let b = Point2d::new(2e10, 0.0);

        assert_ne!(NodeKey::from_point(&a, 1e-12), NodeKey::from_point(&b, 1e-12));
        assert_eq!(NodeKey::from_point(&a, 1e-12), NodeKey::from_point(&a, 1e-12));

        let huge = Point2d::new(1e300, -1e300);
        assert_ne!(NodeKey::from_point(&huge, 1.0), NodeKey::from_point(&(huge * 2.0), 1.0));

        // no usable grid: exact identity, with -0 the same as 0
        assert_eq!(NodeKey::from_point(&Point2d::new(-0.0, 0.0), 0.0),
                   NodeKey::from_point(&Point2d::new(0.0, -0.0), 0.0));
        assert_ne!(NodeKey::from_point(&a, 0.0), NodeKey::from_point(&b, 0.0));
    }

    #[test]
    fn edges_keep_insertion_order() {
        let mut g = Graph::new();

        let o = Point2d::new(0.0, 0.0);
        let a = Point2d::new(1.0, 0.0);
        let b = Point2d::new(0.0, 1.0);

        g.add_edge(o, a);
        g.add_edge(a, b);
        g.add_edge(o, b);

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.neighbors(&o), Some(&[a, b][..]));
        assert_eq!(g.neighbors(&b), None);

        assert_eq!(g.edge_list(), vec![(o, a), (o, b), (a, b)]);
        assert_eq!(g.nodes().cloned().collect::<Vec<_>>(), vec![o, a]);
    }

    #[test]
    fn revisited_points_merge() {
        let mut g = Graph::new();

        let o = Point2d::new(0.0, 0.0);
        let a = Point2d::new(1.0, 0.0);
        let drifted = Point2d::new(1e-16, -1e-16);

        g.add_edge(o, a);
        g.add_edge(a, drifted);

        // leaves from the drifted point, joins the origin node
        g.add_edge(drifted, Point2d::new(0.0, 1.0));

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.neighbors(&o).map(|d| d.len()), Some(2));
        assert!(g.contains(&drifted));

        // the origin node keeps the first point, destinations are as given
        assert_eq!(g.nodes().next(), Some(&o));
        assert_eq!(g.neighbors(&a), Some(&[drifted][..]));
    }

    #[test]
    fn clear_and_bounds() {
        let mut g = Graph::new();
        assert!(g.bounds().is_empty());

        g.add_edge(Point2d::new(0.0, 0.0), Point2d::new(3.0, -2.0));

        let r = g.bounds();
        assert_eq!(r.p0, Point2d::new(0.0, -2.0));
        assert_eq!(r.p1, Point2d::new(3.0, 0.0));

        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.edge_list().is_empty());

        g.reset(0.5);
        assert_eq!(g.quantum(), 0.5);

        g.add_edge(Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0));
        assert!(g.contains(&Point2d::new(0.2, -0.2)));
    }

}
