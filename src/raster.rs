//! Scan conversion of screen-space shapes onto a `Surface`.
//!
//! Input coordinates have Y growing upward; every plot flips to the surface's
//! Y-down rows. Each function returns the number of cells written.

use glam::I64Vec2;

use crate::geometry::{clip_segment, Ellipse, Line, LineCells, Rect, Shape};
use crate::surface::Surface;

pub(crate) fn draw<S: Surface + ?Sized>(s: &mut S, shape: &Shape, glyph: char) -> usize {
    match shape {
        Shape::Point(p) => point(s, p.pos, glyph),
        Shape::Line(l) => line(s, l, glyph),
        Shape::Circle(c) => ellipse(s, &Ellipse::new(c.pos, c.radius, c.radius), glyph),
        Shape::Ellipse(e) => ellipse(s, e, glyph),
        Shape::Rect(r) => rect(s, r, glyph),
    }
}

fn plot<S: Surface + ?Sized>(s: &mut S, x: i64, y: i64, glyph: char) -> bool {
    s.plot(x, s.height() - 1 - y, glyph)
}

pub(crate) fn point<S: Surface + ?Sized>(s: &mut S, p: I64Vec2, glyph: char) -> usize {
    plot(s, p.x, p.y, glyph) as usize
}

/// Horizontal run `x0..=x1` on row `y`, clipped.
fn span<S: Surface + ?Sized>(s: &mut S, x0: i64, x1: i64, y: i64, glyph: char) -> usize {
    if y < 0 || y >= s.height() {
        return 0;
    }
    let lo = x0.max(0);
    let hi = x1.min(s.width() - 1);
    (lo..=hi).filter(|&x| plot(s, x, y, glyph)).count()
}

/// Bresenham, both endpoints included. Long segments are clipped to the
/// surface first.
pub(crate) fn line<S: Surface + ?Sized>(s: &mut S, l: &Line, glyph: char) -> usize {
    let screen = Rect::new(0, 0, s.width(), s.height());
    let Some((a, b)) = clip_segment(l.pos, l.end, &screen) else {
        return 0;
    };
    LineCells::new(a, b)
        .filter(|p| plot(s, p.x, p.y, glyph))
        .count()
}

/// Filled ellipse: one span per row from `dx²·b² + dy²·a² <= a²·b²`.
pub(crate) fn ellipse<S: Surface + ?Sized>(s: &mut S, e: &Ellipse, glyph: char) -> usize {
    if e.a <= 0 || e.b <= 0 {
        return point(s, e.pos, glyph);
    }
    let a2 = (e.a as i128).pow(2);
    let b2 = (e.b as i128).pow(2);
    let y_lo = (e.pos.y - e.b).max(0);
    let y_hi = (e.pos.y + e.b).min(s.height() - 1);
    let mut n = 0;
    for y in y_lo..=y_hi {
        let dy = (y - e.pos.y) as i128;
        let rhs = a2 * b2 - dy * dy * a2;
        let half = isqrt(rhs / b2) as i64;
        n += span(s, e.pos.x - half, e.pos.x + half, y, glyph);
    }
    n
}

/// Filled rectangle over `[pos, pos + bounds)`.
pub(crate) fn rect<S: Surface + ?Sized>(s: &mut S, r: &Rect, glyph: char) -> usize {
    if r.is_empty() {
        return 0;
    }
    let max = r.max_cell();
    let y_lo = r.pos.y.max(0);
    let y_hi = max.y.min(s.height() - 1);
    (y_lo..=y_hi)
        .map(|y| span(s, r.pos.x, max.x, y, glyph))
        .sum()
}

/// Floor square root.
fn isqrt(n: i128) -> i128 {
    if n <= 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as i128;
    while x * x > n {
        x -= 1;
    }
    while (x + 1) * (x + 1) <= n {
        x += 1;
    }
    x
}
