//! World-to-screen camera with a per-frame draw batch.

use crossterm::style::Color;
use glam::I64Vec2;

use crate::geometry::{self, floor_div_vec, Rect, Shape};
use crate::raster;
use crate::surface::Surface;

pub(crate) const DEFAULT_SCALE: i64 = 16_384;
/// Coarsest zoom, km per cell. Keeps `viewport * scale` well inside `i64`.
pub(crate) const MAX_SCALE: i64 = 1 << 40;
/// Largest pan offset on either axis, km.
const MAX_OFFSET: i64 = 1 << 56;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawEntry {
    pub(crate) shape: Shape,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) glyph: char,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameStats {
    pub(crate) drawn: usize,
    pub(crate) culled: usize,
    pub(crate) glyphs: usize,
}

#[derive(Debug)]
pub(crate) struct Camera {
    position: I64Vec2,
    origin: I64Vec2,
    /// World units (km) per cell.
    scale: i64,
    viewport: I64Vec2,
    frustum: Rect,
    dirty: bool,
    batch: Vec<DrawEntry>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

impl Camera {
    pub(crate) fn new(scale: i64) -> Self {
        Self {
            position: I64Vec2::ZERO,
            origin: I64Vec2::ZERO,
            scale: scale.clamp(1, MAX_SCALE),
            viewport: I64Vec2::ZERO,
            frustum: Rect::new(0, 0, 0, 0),
            dirty: true,
            batch: Vec::new(),
        }
    }

    pub(crate) fn position(&self) -> I64Vec2 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: I64Vec2) {
        let position = position.clamp(I64Vec2::splat(-MAX_OFFSET), I64Vec2::splat(MAX_OFFSET));
        if position != self.position {
            self.position = position;
            self.dirty = true;
        }
    }

    /// Moves the camera by whole cells.
    pub(crate) fn pan(&mut self, cells: I64Vec2) {
        self.set_position(
            self.position
                .saturating_add(cells.saturating_mul(I64Vec2::splat(self.scale))),
        );
    }

    pub(crate) fn origin(&self) -> I64Vec2 {
        self.origin
    }

    /// Point the camera is anchored to; position is an offset from it.
    pub(crate) fn set_origin(&mut self, origin: I64Vec2) {
        if origin != self.origin {
            self.origin = origin;
            self.dirty = true;
        }
    }

    pub(crate) fn scale(&self) -> i64 {
        self.scale
    }

    pub(crate) fn set_scale(&mut self, scale: i64) {
        let scale = scale.clamp(1, MAX_SCALE);
        if scale != self.scale {
            self.scale = scale;
            self.dirty = true;
        }
    }

    pub(crate) fn zoom_out(&mut self) {
        self.set_scale(self.scale.saturating_mul(2));
    }

    pub(crate) fn zoom_in(&mut self) {
        self.set_scale(self.scale / 2);
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn frustum(&self) -> Rect {
        self.frustum
    }

    pub(crate) fn push(&mut self, shape: Shape, fg: Color, bg: Color, glyph: char) {
        self.batch.push(DrawEntry { shape, fg, bg, glyph });
    }

    pub(crate) fn batch_len(&self) -> usize {
        self.batch.len()
    }

    /// Screen cell of world point `p`, Y up.
    pub(crate) fn world_to_screen(&self, p: I64Vec2) -> I64Vec2 {
        floor_div_vec(p - self.frustum.pos, self.scale)
    }

    fn recompute_frustum<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let size = self.viewport.saturating_mul(I64Vec2::splat(self.scale));
        let center = self.position.saturating_add(self.origin);
        self.frustum = Rect {
            pos: center.saturating_sub(size / 2),
            bounds: size,
        };
        surface.set_color(Color::White, Color::Black);
        surface.clear(' ');
        self.dirty = false;
    }

    /// Projects `shape` from world space onto the screen lattice.
    pub(crate) fn project(&self, mut shape: Shape) -> Shape {
        let screen = self.world_to_screen(shape.position());
        shape.translate(-self.frustum.pos);
        shape.set_position(screen);
        shape.scale(self.scale);
        shape.collapse_degenerate()
    }

    /// Rasterizes the batch onto `surface` and empties it. Does nothing but
    /// drop the batch when the camera is clean, leaving the last frame intact.
    pub(crate) fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        let viewport = I64Vec2::new(surface.width(), surface.height());
        if viewport != self.viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
        let mut stats = FrameStats::default();
        if !self.dirty {
            self.batch.clear();
            return stats;
        }
        self.recompute_frustum(surface);

        let screen = Shape::Rect(Rect::new(0, 0, viewport.x, viewport.y));
        let batch = std::mem::take(&mut self.batch);
        for entry in &batch {
            let shape = self.project(entry.shape);
            if !geometry::intersects(&shape, &screen) {
                stats.culled += 1;
                continue;
            }
            surface.set_color(entry.fg, entry.bg);
            stats.glyphs += raster::draw(surface, &shape, entry.glyph);
            stats.drawn += 1;
        }
        // keep the allocation
        self.batch = batch;
        self.batch.clear();
        stats
    }
}
