//! Integer shape primitives and the intersection predicates used for culling.
//!
//! Coordinates are lattice points. A rectangle covers the cells
//! `[pos, pos + bounds)`, a circle or ellipse covers the cells with
//! `dx²·b² + dy²·a² <= a²·b²`. The rasterizers in `raster` use the same rules,
//! so a shape that intersects the viewport always lands at least one glyph.

use glam::{DVec2, I64Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Point {
    pub(crate) pos: I64Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Line {
    pub(crate) pos: I64Vec2,
    pub(crate) end: I64Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Circle {
    pub(crate) pos: I64Vec2,
    pub(crate) radius: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ellipse {
    pub(crate) pos: I64Vec2,
    pub(crate) a: i64,
    pub(crate) b: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) pos: I64Vec2,
    pub(crate) bounds: I64Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Ellipse(Ellipse),
    Rect(Rect),
}

impl Point {
    pub(crate) fn new(x: i64, y: i64) -> Self {
        Self { pos: I64Vec2::new(x, y) }
    }
}

impl Line {
    pub(crate) fn new(pos: I64Vec2, end: I64Vec2) -> Self {
        Self { pos, end }
    }
}

impl Circle {
    pub(crate) fn new(pos: I64Vec2, radius: i64) -> Self {
        Self { pos, radius }
    }
}

impl Ellipse {
    pub(crate) fn new(pos: I64Vec2, a: i64, b: i64) -> Self {
        Self { pos, a, b }
    }

    /// True when the cell at `p` lies inside the ellipse.
    pub(crate) fn covers(&self, p: I64Vec2) -> bool {
        inside_ellipse(p - self.pos, self.a, self.b)
    }
}

impl Rect {
    pub(crate) fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            pos: I64Vec2::new(x, y),
            bounds: I64Vec2::new(w, h),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bounds.x <= 0 || self.bounds.y <= 0
    }

    /// Last covered cell (inclusive corner).
    pub(crate) fn max_cell(&self) -> I64Vec2 {
        self.pos + self.bounds - I64Vec2::ONE
    }

    pub(crate) fn contains(&self, p: I64Vec2) -> bool {
        p.x >= self.pos.x
            && p.x < self.pos.x + self.bounds.x
            && p.y >= self.pos.y
            && p.y < self.pos.y + self.bounds.y
    }

    pub(crate) fn center(&self) -> I64Vec2 {
        self.pos + I64Vec2::new(self.bounds.x / 2, self.bounds.y / 2)
    }

    /// Closest covered cell to `p`.
    fn clamp(&self, p: I64Vec2) -> I64Vec2 {
        let max = self.max_cell();
        I64Vec2::new(p.x.clamp(self.pos.x, max.x), p.y.clamp(self.pos.y, max.y))
    }
}

impl Shape {
    pub(crate) fn position(&self) -> I64Vec2 {
        match self {
            Shape::Point(s) => s.pos,
            Shape::Line(s) => s.pos,
            Shape::Circle(s) => s.pos,
            Shape::Ellipse(s) => s.pos,
            Shape::Rect(s) => s.pos,
        }
    }

    pub(crate) fn set_position(&mut self, pos: I64Vec2) {
        match self {
            Shape::Point(s) => s.pos = pos,
            Shape::Line(s) => s.pos = pos,
            Shape::Circle(s) => s.pos = pos,
            Shape::Ellipse(s) => s.pos = pos,
            Shape::Rect(s) => s.pos = pos,
        }
    }

    /// Moves the shape; a line moves both endpoints.
    pub(crate) fn translate(&mut self, by: I64Vec2) {
        let pos = self.position() + by;
        self.set_position(pos);
        if let Shape::Line(l) = self {
            l.end += by;
        }
    }

    /// Divides the extent fields by `by` (floor). Positions are left alone,
    /// except a line's end point which is itself an extent here.
    pub(crate) fn scale(&mut self, by: i64) {
        let by = by.max(1);
        match self {
            Shape::Point(_) => {}
            Shape::Line(l) => l.end = floor_div_vec(l.end, by),
            Shape::Circle(c) => c.radius = c.radius.div_euclid(by),
            Shape::Ellipse(e) => {
                e.a = e.a.div_euclid(by);
                e.b = e.b.div_euclid(by);
            }
            Shape::Rect(r) => r.bounds = floor_div_vec(r.bounds, by),
        }
    }

    /// Replaces shapes too small to have an interior with the single cell the
    /// rasterizer would draw for them.
    pub(crate) fn collapse_degenerate(self) -> Shape {
        match self {
            Shape::Line(l) if l.pos == l.end => Shape::Point(Point { pos: l.pos }),
            Shape::Circle(c) if c.radius <= 1 => Shape::Point(Point { pos: c.pos }),
            Shape::Ellipse(e) if e.a <= 1 && e.b <= 1 => Shape::Point(Point { pos: e.pos }),
            Shape::Ellipse(e) => Shape::Ellipse(Ellipse {
                a: e.a.max(1),
                b: e.b.max(1),
                ..e
            }),
            Shape::Rect(r) if r.bounds == I64Vec2::ONE => Shape::Point(Point { pos: r.pos }),
            other => other,
        }
    }

    /// Cells the shape may touch, as a half-open rectangle.
    pub(crate) fn bounding_rect(&self) -> Rect {
        match *self {
            Shape::Point(p) => Rect { pos: p.pos, bounds: I64Vec2::ONE },
            Shape::Line(l) => {
                let min = l.pos.min(l.end);
                let max = l.pos.max(l.end);
                Rect { pos: min, bounds: max - min + I64Vec2::ONE }
            }
            Shape::Circle(c) => Rect {
                pos: c.pos - I64Vec2::splat(c.radius),
                bounds: I64Vec2::splat(2 * c.radius + 1),
            },
            Shape::Ellipse(e) => Rect {
                pos: e.pos - I64Vec2::new(e.a, e.b),
                bounds: I64Vec2::new(2 * e.a + 1, 2 * e.b + 1),
            },
            Shape::Rect(r) => r,
        }
    }
}

pub(crate) fn floor_div_vec(v: I64Vec2, by: i64) -> I64Vec2 {
    I64Vec2::new(v.x.div_euclid(by), v.y.div_euclid(by))
}

fn sq(v: i64) -> i128 {
    (v as i128) * (v as i128)
}

fn inside_ellipse(d: I64Vec2, a: i64, b: i64) -> bool {
    sq(d.x) * sq(b) + sq(d.y) * sq(a) <= sq(a) * sq(b)
}

fn to_f64(v: I64Vec2) -> DVec2 {
    DVec2::new(v.x as f64, v.y as f64)
}

fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

// -------------------- Pair predicates --------------------

fn point_line(p: &Point, l: &Line) -> bool {
    let d = l.end - l.pos;
    let rel = p.pos - l.pos;
    let cross = (d.x as i128) * (rel.y as i128) - (d.y as i128) * (rel.x as i128);
    cross == 0 && Shape::Line(*l).bounding_rect().contains(p.pos)
}

fn point_circle(p: &Point, c: &Circle) -> bool {
    let d = p.pos - c.pos;
    sq(d.x) + sq(d.y) <= sq(c.radius)
}

fn point_ellipse(p: &Point, e: &Ellipse) -> bool {
    e.covers(p.pos)
}

fn point_rect(p: &Point, r: &Rect) -> bool {
    r.contains(p.pos)
}

/// Parametric crossing test. Parallel segments intersect only when collinear
/// and overlapping.
fn segments_cross(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> bool {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        if cross(p2 - p1, p3 - p1) != 0.0 {
            return false;
        }
        let dir = p2 - p1;
        let len2 = dir.length_squared();
        if len2 == 0.0 {
            let other = p4 - p3;
            if other.length_squared() == 0.0 {
                return p1 == p3;
            }
            let t = (p1 - p3).dot(other) / other.length_squared();
            return (0.0..=1.0).contains(&t);
        }
        let t3 = (p3 - p1).dot(dir) / len2;
        let t4 = (p4 - p1).dot(dir) / len2;
        let (lo, hi) = if t3 <= t4 { (t3, t4) } else { (t4, t3) };
        return hi >= 0.0 && lo <= 1.0;
    }
    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

fn line_line(a: &Line, b: &Line) -> bool {
    segments_cross(to_f64(a.pos), to_f64(a.end), to_f64(b.pos), to_f64(b.end))
}

/// Squared distance from `p` to the segment `a..b`.
fn segment_distance2(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 == 0.0 {
        0.0
    } else {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    };
    (a + ab * t - p).length_squared()
}

fn line_circle(l: &Line, c: &Circle) -> bool {
    let r = c.radius as f64;
    segment_distance2(to_f64(c.pos), to_f64(l.pos), to_f64(l.end)) <= r * r
}

fn line_ellipse(l: &Line, e: &Ellipse) -> bool {
    if e.a <= 0 || e.b <= 0 {
        return point_line(&Point { pos: e.pos }, l);
    }
    let squash = DVec2::new(1.0 / e.a as f64, 1.0 / e.b as f64);
    let a = (to_f64(l.pos) - to_f64(e.pos)) * squash;
    let b = (to_f64(l.end) - to_f64(e.pos)) * squash;
    segment_distance2(DVec2::ZERO, a, b) <= 1.0
}

/// True when the Bresenham walk of `l` plots at least one cell of `r`.
/// Uses the same clipping and walk as `raster::line`, so culling against the
/// screen rect never keeps a line that lands no glyph.
fn line_rect(l: &Line, r: &Rect) -> bool {
    if r.is_empty() {
        return false;
    }
    let Some((a, b)) = clip_segment(l.pos, l.end, r) else {
        return false;
    };
    // every walked cell lies inside the endpoints' bounding box
    if !rect_rect(&Shape::Line(Line::new(a, b)).bounding_rect(), r) {
        return false;
    }
    LineCells::new(a, b).any(|p| r.contains(p))
}

/// Cuts a segment much longer than `r` down to the part near it (Liang-Barsky
/// against `r` grown by one cell). Shorter segments pass through unchanged.
/// `None` when a long segment misses the grown rect entirely.
pub(crate) fn clip_segment(a: I64Vec2, b: I64Vec2, r: &Rect) -> Option<(I64Vec2, I64Vec2)> {
    let limit = 4 * (r.bounds.x.max(0) + r.bounds.y.max(0)) + 16;
    let d = b - a;
    if d.x.abs() <= limit && d.y.abs() <= limit {
        return Some((a, b));
    }
    let p0 = to_f64(a);
    let dir = to_f64(d);
    let min = to_f64(r.pos) - DVec2::ONE;
    let max = to_f64(r.pos + r.bounds);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dir.x, p0.x - min.x),
        (dir.x, max.x - p0.x),
        (-dir.y, p0.y - min.y),
        (dir.y, max.y - p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    let ca = (p0 + dir * t0).round();
    let cb = (p0 + dir * t1).round();
    Some((
        I64Vec2::new(ca.x as i64, ca.y as i64),
        I64Vec2::new(cb.x as i64, cb.y as i64),
    ))
}

/// Cells of a Bresenham walk from `a` to `b`, both endpoints included.
#[derive(Clone, Debug)]
pub(crate) struct LineCells {
    at: I64Vec2,
    step: I64Vec2,
    /// |major|, |minor| deltas
    major: i64,
    minor: i64,
    x_major: bool,
    err: i64,
    left: i64,
}

impl LineCells {
    pub(crate) fn new(a: I64Vec2, b: I64Vec2) -> Self {
        let dx = (b.x - a.x).abs();
        let dy = (b.y - a.y).abs();
        let step = I64Vec2::new(if a.x < b.x { 1 } else { -1 }, if a.y < b.y { 1 } else { -1 });
        let x_major = dx >= dy;
        let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
        Self {
            at: a,
            step,
            major,
            minor,
            x_major,
            err: 2 * minor - major,
            left: major + 1,
        }
    }
}

impl Iterator for LineCells {
    type Item = I64Vec2;

    fn next(&mut self) -> Option<I64Vec2> {
        if self.left <= 0 {
            return None;
        }
        self.left -= 1;
        let cell = self.at;
        if self.err > 0 {
            if self.x_major {
                self.at.y += self.step.y;
            } else {
                self.at.x += self.step.x;
            }
            self.err -= 2 * self.major;
        }
        self.err += 2 * self.minor;
        if self.x_major {
            self.at.x += self.step.x;
        } else {
            self.at.y += self.step.y;
        }
        Some(cell)
    }
}

fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let d = a.pos - b.pos;
    sq(d.x) + sq(d.y) <= sq(a.radius + b.radius)
}

fn rect_circle(r: &Rect, c: &Circle) -> bool {
    if r.is_empty() {
        return false;
    }
    point_circle(&Point { pos: r.clamp(c.pos) }, c)
}

fn rect_ellipse(r: &Rect, e: &Ellipse) -> bool {
    if r.is_empty() {
        return false;
    }
    e.covers(r.clamp(e.pos))
}

fn rect_rect(a: &Rect, b: &Rect) -> bool {
    !a.is_empty()
        && !b.is_empty()
        && a.pos.x < b.pos.x + b.bounds.x
        && a.pos.x + a.bounds.x > b.pos.x
        && a.pos.y < b.pos.y + b.bounds.y
        && a.pos.y + a.bounds.y > b.pos.y
}

/// Bounding-box overlap; used only for the curved pairs involving an ellipse.
fn curved_boxes(a: &Shape, b: &Shape) -> bool {
    rect_rect(&a.bounding_rect(), &b.bounding_rect())
}

pub(crate) fn intersects(lhs: &Shape, rhs: &Shape) -> bool {
    use Shape as S;
    match (lhs, rhs) {
        (S::Point(a), S::Point(b)) => a.pos == b.pos,
        (S::Point(p), S::Line(l)) | (S::Line(l), S::Point(p)) => point_line(p, l),
        (S::Point(p), S::Circle(c)) | (S::Circle(c), S::Point(p)) => point_circle(p, c),
        (S::Point(p), S::Ellipse(e)) | (S::Ellipse(e), S::Point(p)) => point_ellipse(p, e),
        (S::Point(p), S::Rect(r)) | (S::Rect(r), S::Point(p)) => point_rect(p, r),
        (S::Line(a), S::Line(b)) => line_line(a, b),
        (S::Line(l), S::Circle(c)) | (S::Circle(c), S::Line(l)) => line_circle(l, c),
        (S::Line(l), S::Ellipse(e)) | (S::Ellipse(e), S::Line(l)) => line_ellipse(l, e),
        (S::Line(l), S::Rect(r)) | (S::Rect(r), S::Line(l)) => line_rect(l, r),
        (S::Circle(a), S::Circle(b)) => circle_circle(a, b),
        (S::Circle(_), S::Ellipse(_))
        | (S::Ellipse(_), S::Circle(_))
        | (S::Ellipse(_), S::Ellipse(_)) => curved_boxes(lhs, rhs),
        (S::Rect(r), S::Circle(c)) | (S::Circle(c), S::Rect(r)) => rect_circle(r, c),
        (S::Rect(r), S::Ellipse(e)) | (S::Ellipse(e), S::Rect(r)) => rect_ellipse(r, e),
        (S::Rect(a), S::Rect(b)) => rect_rect(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i64, y: i64) -> I64Vec2 {
        I64Vec2::new(x, y)
    }

    #[test]
    fn point_against_rect_is_half_open() {
        let r = Shape::Rect(Rect::new(0, 0, 10, 5));
        assert!(intersects(&Shape::Point(Point::new(0, 0)), &r));
        assert!(intersects(&Shape::Point(Point::new(9, 4)), &r));
        assert!(!intersects(&Shape::Point(Point::new(10, 4)), &r));
        assert!(!intersects(&Shape::Point(Point::new(3, 5)), &r));
        assert!(!intersects(&Shape::Point(Point::new(-1, 2)), &r));
    }

    #[test]
    fn point_against_curves() {
        let c = Shape::Circle(Circle::new(v(0, 0), 5));
        assert!(intersects(&Shape::Point(Point::new(3, 4)), &c));
        assert!(intersects(&c, &Shape::Point(Point::new(5, 0))));
        assert!(!intersects(&Shape::Point(Point::new(4, 4)), &c));

        let e = Shape::Ellipse(Ellipse::new(v(0, 0), 6, 2));
        assert!(intersects(&Shape::Point(Point::new(6, 0)), &e));
        assert!(intersects(&Shape::Point(Point::new(0, -2)), &e));
        assert!(!intersects(&Shape::Point(Point::new(0, 3)), &e));
        assert!(!intersects(&e, &Shape::Point(Point::new(6, 1))));
    }

    #[test]
    fn crossing_and_parallel_lines() {
        let a = Shape::Line(Line::new(v(0, 0), v(10, 10)));
        let b = Shape::Line(Line::new(v(0, 10), v(10, 0)));
        assert!(intersects(&a, &b));

        let c = Shape::Line(Line::new(v(0, 1), v(10, 11)));
        assert!(!intersects(&a, &c));

        let overlap = Shape::Line(Line::new(v(5, 5), v(20, 20)));
        assert!(intersects(&a, &overlap));
        let apart = Shape::Line(Line::new(v(11, 11), v(20, 20)));
        assert!(!intersects(&a, &apart));
    }

    #[test]
    fn line_against_rect() {
        let r = Shape::Rect(Rect::new(0, 0, 10, 10));
        // passes straight through without an endpoint inside
        let through = Shape::Line(Line::new(v(-5, 5), v(15, 5)));
        assert!(intersects(&through, &r));
        assert!(intersects(&r, &through));
        // fully inside
        let inner = Shape::Line(Line::new(v(2, 2), v(3, 7)));
        assert!(intersects(&inner, &r));
        // fully outside
        let outside = Shape::Line(Line::new(v(-5, 20), v(15, 20)));
        assert!(!intersects(&outside, &r));
        let below = Shape::Line(Line::new(v(-5, -2), v(15, -2)));
        assert!(!intersects(&below, &r));
    }

    #[test]
    fn line_grazing_a_corner_only_counts_walked_cells() {
        let r = Shape::Rect(Rect::new(0, 0, 10, 10));
        // cuts the corner of cell (0, 0) but the walk plots (-1, 0) and (0, -1)
        let graze = Shape::Line(Line::new(v(-1, 0), v(0, -1)));
        assert!(!intersects(&graze, &r));
        assert_eq!(
            LineCells::new(v(-1, 0), v(0, -1)).collect::<Vec<_>>(),
            [v(-1, 0), v(0, -1)]
        );
        // one step further in and the walk lands on (0, 0)
        assert!(intersects(&Shape::Line(Line::new(v(-1, 1), v(1, -1))), &r));
    }

    #[test]
    fn long_segments_are_clipped_near_the_rect() {
        let r = Rect::new(0, 0, 20, 10);
        let (a, b) = clip_segment(v(-5_000_000, 5), v(5_000_000, 5), &r).unwrap();
        assert_eq!((a, b), (v(-1, 5), v(20, 5)));
        assert!(clip_segment(v(-5_000_000, 50), v(5_000_000, 50), &r).is_none());
        let short = (v(-3, 2), v(30, 4));
        assert_eq!(clip_segment(short.0, short.1, &r), Some(short));
    }

    #[test]
    fn rect_against_circle_and_ellipse() {
        let r = Shape::Rect(Rect::new(0, 0, 10, 10));
        assert!(intersects(&r, &Shape::Circle(Circle::new(v(-3, 5), 3))));
        assert!(!intersects(&r, &Shape::Circle(Circle::new(v(-4, 5), 3))));
        // corner: nearest cell is (9, 9)
        assert!(intersects(&Shape::Circle(Circle::new(v(12, 13), 5)), &r));
        assert!(!intersects(&Shape::Circle(Circle::new(v(13, 13), 5)), &r));

        assert!(intersects(&r, &Shape::Ellipse(Ellipse::new(v(15, 5), 6, 2))));
        assert!(!intersects(&r, &Shape::Ellipse(Ellipse::new(v(15, 5), 5, 20))));
        assert!(!intersects(&Shape::Ellipse(Ellipse::new(v(5, 13), 20, 3)), &r));
    }

    #[test]
    fn rect_overlap() {
        let a = Shape::Rect(Rect::new(0, 0, 10, 10));
        assert!(intersects(&a, &Shape::Rect(Rect::new(9, 9, 5, 5))));
        assert!(!intersects(&a, &Shape::Rect(Rect::new(10, 0, 5, 5))));
        assert!(!intersects(&a, &Shape::Rect(Rect::new(0, 10, 5, 5))));
        assert!(intersects(&a, &Shape::Rect(Rect::new(-5, -5, 30, 30))));
        assert!(!intersects(&a, &Shape::Rect(Rect::new(2, 2, 0, 4))));
    }

    #[test]
    fn circles_and_lines() {
        let c = Shape::Circle(Circle::new(v(0, 0), 4));
        assert!(intersects(&c, &Shape::Circle(Circle::new(v(7, 0), 3))));
        assert!(!intersects(&c, &Shape::Circle(Circle::new(v(8, 0), 3))));
        assert!(intersects(&Shape::Line(Line::new(v(-10, 4), v(10, 4))), &c));
        assert!(!intersects(&Shape::Line(Line::new(v(-10, 5), v(10, 5))), &c));
        let e = Shape::Ellipse(Ellipse::new(v(0, 0), 8, 2));
        assert!(intersects(&Shape::Line(Line::new(v(7, -10), v(7, 10))), &e));
        assert!(!intersects(&Shape::Line(Line::new(v(9, -10), v(9, 10))), &e));
    }

    #[test]
    fn translate_and_scale() {
        let mut l = Shape::Line(Line::new(v(0, 0), v(10, -10)));
        l.translate(v(5, 5));
        assert_eq!(l, Shape::Line(Line::new(v(5, 5), v(15, -5))));
        l.scale(4);
        assert_eq!(l, Shape::Line(Line::new(v(5, 5), v(3, -2))));

        let mut c = Shape::Circle(Circle::new(v(1, 1), 9));
        c.scale(2);
        assert_eq!(c, Shape::Circle(Circle::new(v(1, 1), 4)));

        let mut r = Shape::Rect(Rect::new(0, 0, 9, 4));
        r.scale(3);
        assert_eq!(r, Shape::Rect(Rect::new(0, 0, 3, 1)));
    }

    #[test]
    fn degenerate_shapes_collapse_to_points() {
        let p = Point::new(3, 3);
        assert_eq!(Shape::Circle(Circle::new(p.pos, 1)).collapse_degenerate(), Shape::Point(p));
        assert_eq!(Shape::Circle(Circle::new(p.pos, 0)).collapse_degenerate(), Shape::Point(p));
        assert_eq!(Shape::Ellipse(Ellipse::new(p.pos, 1, 1)).collapse_degenerate(), Shape::Point(p));
        assert_eq!(Shape::Line(Line::new(p.pos, p.pos)).collapse_degenerate(), Shape::Point(p));
        assert_eq!(
            Shape::Ellipse(Ellipse::new(p.pos, 0, 4)).collapse_degenerate(),
            Shape::Ellipse(Ellipse::new(p.pos, 1, 4))
        );
    }
}
