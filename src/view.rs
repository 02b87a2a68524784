//! The system view: camera control, focus tracking, body batching and the
//! info panels drawn around it.

use std::f64::consts::TAU;

use crossterm::style::Color;
use glam::I64Vec2;

use crate::app::{RunState, Session};
use crate::camera::Camera;
use crate::ecs::{Mass, Orbital, Position, RenderCircle};
use crate::geometry::{Ellipse, Line, Shape};
use crate::kepler;
use crate::keybind::{self, translate_code, Keybinds};
use crate::orbit::{NodeId, OrbitTree};
use crate::search::{Search, SearchOutcome};
use crate::surface::Screen;
use crate::system::System;
use crate::units::{AU_KM, DAY_SECONDS};
use crate::window::{WindowId, Windows};

/// Mean anomaly step between orbit path samples, rad.
const PATH_STEP: f64 = 0.01;
const ORBIT_COLOR: Color = Color::Blue;
const FOCUS_COLOR: Color = Color::Yellow;

#[derive(Debug)]
pub(crate) struct SystemView {
    focus: NodeId,
    search: Option<Search>,
}

impl Default for SystemView {
    fn default() -> Self {
        Self {
            focus: OrbitTree::ROOT,
            search: None,
        }
    }
}

impl SystemView {
    pub(crate) fn focus(&self) -> NodeId {
        self.focus
    }

    pub(crate) fn searching(&self) -> bool {
        self.search.is_some()
    }

    pub(crate) fn set_focus(&mut self, node: NodeId, system: &System, session: &mut Session) {
        if node == self.focus {
            return;
        }
        self.focus = node;
        let name = system.name(system.tree.entity(node));
        log::info!("focus -> {name}");
        session.events.push(format!("Focus: {name}"));
    }

    pub(crate) fn keypress(
        &mut self,
        key: i32,
        session: &mut Session,
        camera: &mut Camera,
        system: &System,
    ) {
        if session.windows.is_focused(WindowId::Search) {
            if let Some(search) = self.search.as_mut() {
                match search.keypress(key, &session.binds, system, self.focus) {
                    SearchOutcome::Pending => {}
                    SearchOutcome::Selected(node) => {
                        self.set_focus(node, system, session);
                        camera.set_position(I64Vec2::ZERO);
                        self.finish_search(session, camera);
                    }
                    SearchOutcome::Cancelled => self.finish_search(session, camera),
                }
            }
            return;
        }
        if !session.windows.is_focused(WindowId::SystemView) {
            return;
        }
        let binds = &session.binds;
        if binds.is(keybind::VIEW_PAN_UP, key) {
            camera.pan(I64Vec2::new(0, 1));
        } else if binds.is(keybind::VIEW_PAN_DOWN, key) {
            camera.pan(I64Vec2::new(0, -1));
        } else if binds.is(keybind::VIEW_PAN_RIGHT, key) {
            camera.pan(I64Vec2::new(1, 0));
        } else if binds.is(keybind::VIEW_PAN_LEFT, key) {
            camera.pan(I64Vec2::new(-1, 0));
        } else if binds.is(keybind::VIEW_INC_SCALE, key) {
            camera.zoom_out();
        } else if binds.is(keybind::VIEW_DEC_SCALE, key) {
            camera.zoom_in();
        } else if binds.is(keybind::VIEW_SEARCH, key) {
            session.state = RunState::PausedInput;
            session.windows.set_hidden(WindowId::Search, false);
            session.windows.focus(WindowId::Search);
            self.search = Some(Search::new(system, self.focus));
        }
    }

    fn finish_search(&mut self, session: &mut Session, camera: &mut Camera) {
        self.search = None;
        session.state = RunState::Running;
        session.windows.set_hidden(WindowId::Search, true);
        session.windows.focus(WindowId::SystemView);
        camera.mark_dirty();
    }

    /// Keeps the camera anchored to the focused body.
    pub(crate) fn update(&self, camera: &mut Camera, system: &System, state: RunState) {
        if state.paused() {
            return;
        }
        camera.set_origin(system.position(system.tree.entity(self.focus)));
    }

    /// Draws the search list and, on dirty frames, batches the scene.
    pub(crate) fn draw(&mut self, camera: &mut Camera, system: &System, windows: &mut Windows) {
        if let Some(search) = self.search.as_mut() {
            search.draw(windows.screen_mut(WindowId::Search), system);
        }
        if !camera.is_dirty() {
            return;
        }
        let focus = system.tree.entity(self.focus);
        if let Some(orbital) = system.world.get::<Orbital>(focus) {
            batch_orbit_path(camera, orbital, system.position(orbital.origin));
        }

        let scale = camera.scale();
        for id in system.world.with::<RenderCircle>() {
            let (Some(pos), Some(circle)) = (
                system.world.get::<Position>(id),
                system.world.get::<RenderCircle>(id),
            ) else {
                continue;
            };
            let r = circle.0.max(scale);
            let glyph = if circle.0 < r { '*' } else { '#' };
            let color = if id == focus { FOCUS_COLOR } else { Color::White };
            camera.push(Shape::Ellipse(Ellipse::new(pos.0, r, r)), color, Color::Black, glyph);
        }
    }

    /// Text drawn after the camera: body info and the view overlay.
    pub(crate) fn draw_over(
        &self,
        camera: &Camera,
        system: &System,
        windows: &mut Windows,
        binds: &Keybinds,
    ) {
        draw_body_info(windows.screen_mut(WindowId::BodyInfo), system, self.focus);

        let view = windows.screen_mut(WindowId::SystemView);
        view.reset_pen();
        let hint = format!(
            "Press '{}' to change focus",
            translate_code(binds.code(keybind::VIEW_SEARCH))
        );
        view.print(0, 0, &hint);
        let bottom = view.buf.h.saturating_sub(1);
        view.print(0, bottom, &scale_label(camera.scale(), view.buf.w));
    }
}

fn batch_orbit_path(camera: &mut Camera, orbital: &Orbital, parent: I64Vec2) {
    let steps = (TAU / PATH_STEP).ceil() as usize;
    let points: Vec<I64Vec2> = (0..steps)
        .map(|i| {
            let s = kepler::sample_orbit(orbital, orbital.m + i as f64 * PATH_STEP);
            parent + s.offset.round().as_i64vec2()
        })
        .collect();
    let Some(&last) = points.last() else {
        return;
    };
    let mut prev = last;
    for &p in &points {
        camera.push(Shape::Line(Line::new(prev, p)), ORBIT_COLOR, Color::Black, '#');
        prev = p;
    }
}

/// Half the view width in world units.
pub(crate) fn scale_label(scale: i64, view_w: u16) -> String {
    let km = scale as f64 * (view_w as f64 / 2.0);
    if km > 1e7 {
        format!("{:.3} AU", km / AU_KM as f64)
    } else {
        format!("{km:.0} km")
    }
}

fn draw_body_info(screen: &mut Screen, system: &System, focus: NodeId) {
    screen.reset_pen();
    screen.buf.fill(Default::default());
    let id = system.tree.entity(focus);
    let mut lines = vec![format!("Focus: {}", system.name(id))];
    if let Some(o) = system.world.get::<Orbital>(id) {
        let distance = (system.position(id) - system.position(o.origin)).as_dvec2().length();
        lines.push(format!("Orbiting: {}", system.name(o.origin)));
        lines.push(format!("Distance: {distance:.0} km"));
        lines.push(format!("Period: {:.2} days", o.period / DAY_SECONDS as f64));
        lines.push(format!("Angle: {:.1} deg", o.v.to_degrees().rem_euclid(360.0)));
        lines.push(format!("Eccentricity: {:.4}", o.e));
    }
    if let Some(m) = system.world.get::<Mass>(id) {
        lines.push(format!("Mass: {}", m.0));
    }
    for (y, line) in lines.iter().enumerate() {
        screen.print(0, y as u16, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_label_switches_to_au() {
        assert_eq!(scale_label(1_000, 100), "50000 km");
        assert_eq!(scale_label(16_384, 96), "786432 km");
        assert_eq!(scale_label(AU_KM / 48, 96), "1.000 AU");
    }
}
