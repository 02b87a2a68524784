//! Fixed window layout and focus cycling.

use crossterm::style::Color;

use crate::keybind::{self, Keybinds};
use crate::surface::{Cell, CellBuffer, Screen};

const INFO_W: u16 = 24;
const INFO_H: u16 = 12;
const TIME_H: u16 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum WindowId {
    SystemView,
    BodyInfo,
    Events,
    Time,
    Search,
}

impl WindowId {
    const ORDER: [WindowId; 5] = [
        WindowId::SystemView,
        WindowId::BodyInfo,
        WindowId::Events,
        WindowId::Time,
        WindowId::Search,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            WindowId::SystemView => "System View",
            WindowId::BodyInfo => "Body Info",
            WindowId::Events => "Events",
            WindowId::Time => "Time",
            WindowId::Search => "Search",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) w: u16,
    pub(crate) h: u16,
}

/// A titled region: one title row, then a persistent content screen.
#[derive(Debug)]
pub(crate) struct Window {
    pub(crate) id: WindowId,
    pub(crate) frame: Frame,
    pub(crate) hidden: bool,
    pub(crate) screen: Screen,
}

impl Window {
    fn new(id: WindowId, frame: Frame, hidden: bool) -> Self {
        let mut w = Self {
            id,
            frame,
            hidden,
            screen: Screen::new(0, 0),
        };
        w.set_frame(frame);
        w
    }

    fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
        self.screen.resize(frame.w, frame.h.saturating_sub(1));
    }

    fn draw_title(&self, out: &mut CellBuffer, focused: bool) {
        let (fg, bg) = if focused {
            (Color::Black, Color::White)
        } else {
            (Color::White, Color::Black)
        };
        let mut title = self.id.title().chars();
        for x in 0..self.frame.w {
            let ch = title.next().unwrap_or(' ');
            out.set(self.frame.x + x, self.frame.y, Cell { ch, fg, bg, bold: focused });
        }
    }
}

fn layout(w: u16, h: u16) -> [Frame; 5] {
    let view_h = h.saturating_sub(1);
    let side = INFO_W.min(w);
    let rest = w.saturating_sub(side);
    let info_h = INFO_H.min(view_h);
    // Time never starts above the bottom of Body Info on short terminals.
    let time_y = view_h.saturating_sub(TIME_H).max(info_h);
    [
        Frame { x: side, y: 0, w: rest, h: view_h },
        Frame { x: 0, y: 0, w: side, h: info_h },
        Frame {
            x: 0,
            y: info_h,
            w: side,
            h: view_h.saturating_sub(INFO_H + TIME_H),
        },
        Frame { x: 0, y: time_y, w: side, h: TIME_H.min(view_h - time_y) },
        Frame { x: side, y: 0, w: rest / 4, h: view_h },
    ]
}

#[derive(Debug)]
pub(crate) struct Windows {
    windows: Vec<Window>,
    focus: usize,
}

impl Windows {
    /// The default layout for a `w`×`h` terminal. The bottom row is left for
    /// the key hint line.
    pub(crate) fn new(w: u16, h: u16) -> Self {
        let frames = layout(w, h);
        let windows = WindowId::ORDER
            .iter()
            .zip(frames)
            .map(|(&id, frame)| Window::new(id, frame, id == WindowId::Search))
            .collect();
        Self { windows, focus: 0 }
    }

    pub(crate) fn relayout(&mut self, w: u16, h: u16) {
        for (win, frame) in self.windows.iter_mut().zip(layout(w, h)) {
            win.set_frame(frame);
        }
    }

    fn index(&self, id: WindowId) -> usize {
        self.windows.iter().position(|w| w.id == id).unwrap_or(0)
    }

    pub(crate) fn get(&self, id: WindowId) -> &Window {
        &self.windows[self.index(id)]
    }

    pub(crate) fn screen_mut(&mut self, id: WindowId) -> &mut Screen {
        let i = self.index(id);
        &mut self.windows[i].screen
    }

    pub(crate) fn focused(&self) -> WindowId {
        self.windows[self.focus].id
    }

    pub(crate) fn is_focused(&self, id: WindowId) -> bool {
        self.focused() == id
    }

    pub(crate) fn focus(&mut self, id: WindowId) {
        self.focus = self.index(id);
        log::debug!("focus {}", id.title());
    }

    pub(crate) fn set_hidden(&mut self, id: WindowId, hidden: bool) {
        let i = self.index(id);
        self.windows[i].hidden = hidden;
    }

    /// Moves focus by `dir` (±1), skipping hidden windows.
    fn cycle(&mut self, dir: isize) {
        let n = self.windows.len() as isize;
        let mut i = self.focus as isize;
        for _ in 0..n {
            i = (i + dir).rem_euclid(n);
            if !self.windows[i as usize].hidden {
                self.focus = i as usize;
                return;
            }
        }
    }

    pub(crate) fn next(&mut self) {
        self.cycle(1);
    }

    pub(crate) fn prev(&mut self) {
        self.cycle(-1);
    }

    /// Handles the global window keys. Returns true when focus moved.
    pub(crate) fn update(&mut self, key: i32, binds: &Keybinds) -> bool {
        let before = self.focus;
        if binds.is(keybind::G_NEXT_WINDOW, key) {
            self.next();
        } else if binds.is(keybind::G_PREV_WINDOW, key) {
            self.prev();
        }
        before != self.focus
    }

    /// Draws every visible window into `out`, in layout order.
    pub(crate) fn compose(&self, out: &mut CellBuffer) {
        for (i, win) in self.windows.iter().enumerate() {
            if win.hidden || win.frame.w == 0 || win.frame.h == 0 {
                continue;
            }
            win.draw_title(out, i == self.focus);
            out.blit(&win.screen.buf, win.frame.x, win.frame.y + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let w = Windows::new(120, 40);
        assert_eq!(w.get(WindowId::SystemView).frame, Frame { x: 24, y: 0, w: 96, h: 39 });
        assert_eq!(w.get(WindowId::Events).frame, Frame { x: 0, y: 12, w: 24, h: 17 });
        assert_eq!(w.get(WindowId::Time).frame, Frame { x: 0, y: 29, w: 24, h: 10 });
        assert_eq!(w.get(WindowId::Search).frame.w, 24);
        assert_eq!(w.get(WindowId::SystemView).screen.buf.h, 38);
        assert!(w.get(WindowId::Search).hidden);
    }

    #[test]
    fn short_terminal_keeps_side_windows_apart() {
        for h in [2, 8, 14, 18, 22, 23, 24] {
            let w = Windows::new(80, h);
            let info = w.get(WindowId::BodyInfo).frame;
            let events = w.get(WindowId::Events).frame;
            let time = w.get(WindowId::Time).frame;
            assert!(time.y >= info.y + info.h, "h = {h}: {time:?} overlaps {info:?}");
            assert!(events.h == 0 || events.y + events.h <= time.y, "h = {h}");
            assert!(time.y + time.h <= h.saturating_sub(1), "h = {h}");
        }
        let w = Windows::new(80, 16);
        assert_eq!(w.get(WindowId::Time).frame, Frame { x: 0, y: 12, w: 24, h: 3 });
    }

    #[test]
    fn cycling_skips_hidden_windows() {
        let k = Keybinds::with_defaults();
        let mut w = Windows::new(120, 40);
        assert_eq!(w.focused(), WindowId::SystemView);
        for expected in [WindowId::BodyInfo, WindowId::Events, WindowId::Time, WindowId::SystemView] {
            assert!(w.update('x' as i32, &k));
            assert_eq!(w.focused(), expected);
        }
        assert!(w.update('X' as i32, &k));
        assert_eq!(w.focused(), WindowId::Time);
        assert!(!w.update('q' as i32, &k));
    }

    #[test]
    fn compose_inverts_the_focused_title() {
        let mut w = Windows::new(60, 20);
        w.focus(WindowId::Time);
        let mut out = CellBuffer::new(60, 20);
        w.compose(&mut out);
        let time = w.get(WindowId::Time).frame;
        let title = out.get(time.x, time.y).unwrap();
        assert_eq!((title.ch, title.bg), ('T', Color::White));
        let info = out.get(0, 0).unwrap();
        assert_eq!((info.ch, info.bg), ('B', Color::Black));
    }
}
