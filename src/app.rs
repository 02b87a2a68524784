use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Color;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::catalog::{self, load_catalog};
use crate::clock::Clock;
use crate::config::{load_settings, project_paths, save_settings_atomic, Args, Settings};
use crate::input::collect_codes_nonblocking;
use crate::keybind::{self, translate_code, Keybinds};
use crate::logging;
use crate::surface::{Cell, CellBuffer, Screen, Terminal};
use crate::system::System;
use crate::view::SystemView;
use crate::window::{WindowId, Windows};

const EVENT_CAP: usize = 64;
/// Ctrl-C arrives as a key in raw mode.
const KEY_CTRL_C: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunState {
    Stopped,
    Running,
    RunningInput,
    Paused,
    PausedInput,
}

impl RunState {
    pub(crate) fn running(self) -> bool {
        self != RunState::Stopped
    }

    pub(crate) fn paused(self) -> bool {
        matches!(self, RunState::Paused | RunState::PausedInput)
    }

    /// A text field owns the keyboard; global keys are not interpreted.
    pub(crate) fn input_mode(self) -> bool {
        matches!(self, RunState::RunningInput | RunState::PausedInput)
    }
}

/// Bounded log of user-facing messages, mirrored to the log file.
#[derive(Debug)]
pub(crate) struct EventLog {
    lines: VecDeque<String>,
    cap: usize,
}

impl EventLog {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    pub(crate) fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("event: {line}");
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Newest lines at the bottom.
    pub(crate) fn draw(&self, screen: &mut Screen) {
        screen.reset_pen();
        screen.buf.fill(Default::default());
        let h = screen.buf.h as usize;
        let skip = self.lines.len().saturating_sub(h);
        for (y, line) in self.lines.iter().skip(skip).enumerate() {
            screen.print(0, y as u16, line);
        }
    }
}

/// Shared UI state handed to the components that react to keys.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) state: RunState,
    pub(crate) binds: Keybinds,
    pub(crate) windows: Windows,
    pub(crate) events: EventLog,
}

pub(crate) struct App {
    pub(crate) session: Session,
    pub(crate) system: System,
    pub(crate) camera: Camera,
    pub(crate) view: SystemView,
    pub(crate) clock: Clock,
    color: bool,
    hint: String,
}

impl App {
    pub(crate) fn new(system: System, binds: Keybinds, settings: &Settings, w: u16, h: u16) -> Self {
        let mut events = EventLog::new(EVENT_CAP);
        for name in system.fallbacks() {
            events.push(format!("{name}: unknown parent, orbiting {}", catalog::ROOT_NAME));
        }
        let hint = hint_line(&binds);
        Self {
            session: Session {
                state: RunState::Running,
                binds,
                windows: Windows::new(w, h),
                events,
            },
            system,
            camera: Camera::new(settings.scale),
            view: SystemView::default(),
            clock: Clock::new(settings.step, settings.auto),
            color: settings.enable_color,
            hint,
        }
    }

    pub(crate) fn running(&self) -> bool {
        self.session.state.running()
    }

    /// Focuses the named body. Returns false when no body has that name.
    pub(crate) fn focus_by_name(&mut self, name: &str) -> bool {
        match self.system.tree.find(&self.system.world, name) {
            Some(node) => {
                self.view.set_focus(node, &self.system, &mut self.session);
                true
            }
            None => {
                self.session.events.push(format!("No body named {name}"));
                false
            }
        }
    }

    /// One frame: input, time, propagation, then drawing into window screens.
    pub(crate) fn tick(&mut self, key: i32) {
        let s = &mut self.session;
        if !s.state.input_mode() {
            if s.binds.is(keybind::G_QUIT, key) || key == KEY_CTRL_C {
                log::info!("quit requested");
                s.state = RunState::Stopped;
                return;
            }
            s.windows.update(key, &s.binds);
        }

        self.view
            .keypress(key, &mut self.session, &mut self.camera, &self.system);

        let s = &mut self.session;
        let auto = self.clock.auto();
        self.clock.update(
            key,
            s.windows.is_focused(WindowId::Time),
            s.state.paused(),
            &s.binds,
        );
        if self.clock.auto() != auto {
            s.events
                .push(if self.clock.auto() { "Auto time on" } else { "Auto time off" });
        }
        if self.clock.changed() {
            self.camera.mark_dirty();
        }

        let report = self.system.update(self.clock.time() as f64);
        if report.unconverged > 0 {
            log::debug!("{} of {} bodies did not converge", report.unconverged, report.bodies);
        }

        self.view.update(&mut self.camera, &self.system, s.state);
        self.view
            .draw(&mut self.camera, &self.system, &mut self.session.windows);
        let s = &mut self.session;
        self.clock.draw(s.windows.screen_mut(WindowId::Time));
        self.camera.draw(s.windows.screen_mut(WindowId::SystemView));
        self.view
            .draw_over(&self.camera, &self.system, &mut s.windows, &s.binds);
        s.events.draw(s.windows.screen_mut(WindowId::Events));
    }

    /// Composes every window plus the key hint row into `out`.
    pub(crate) fn render(&self, out: &mut CellBuffer) {
        out.fill(Cell::default());
        self.session.windows.compose(out);
        if out.h > 0 {
            let y = out.h - 1;
            let mut hint = self.hint.chars();
            for x in 0..out.w {
                let ch = hint.next().unwrap_or(' ');
                out.set(x, y, Cell { ch, ..Cell::default() });
            }
        }
        if !self.color {
            for c in out.cells.iter_mut() {
                mute(c);
            }
        }
    }

    pub(crate) fn resize(&mut self, w: u16, h: u16) {
        self.session.windows.relayout(w, h);
        self.camera.mark_dirty();
    }

    /// Current preferences, to be written back on exit.
    pub(crate) fn settings(&self, base: &Settings) -> Settings {
        Settings {
            scale: self.camera.scale(),
            step: self.clock.step(),
            auto: self.clock.auto(),
            ..base.clone()
        }
    }
}

fn hint_line(binds: &Keybinds) -> String {
    let k = |name| translate_code(binds.code(name));
    format!(
        "{}: Quit  {}/{}: Window  {}: Focus  {}: Step  {}: Auto",
        k(keybind::G_QUIT),
        k(keybind::G_NEXT_WINDOW),
        k(keybind::G_PREV_WINDOW),
        k(keybind::VIEW_SEARCH),
        k(keybind::TIME_STEP),
        k(keybind::TIME_TOGGLE_AUTO),
    )
}

/// Monochrome: keep inverted cells, flatten every other color to white on black.
fn mute(c: &mut Cell) {
    if c.bg == Color::White {
        c.fg = Color::Black;
    } else {
        c.fg = Color::White;
        c.bg = Color::Black;
    }
}

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();
    let paths = project_paths()?;
    let log_path = args.log.clone().unwrap_or_else(|| paths.log_path.clone());
    logging::init(&log_path)?;

    let mut settings = load_settings(&paths.settings_path);
    settings.apply_args(&args);

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => catalog::sol(),
    };
    let system = System::new(&catalog).context("building system")?;
    log::info!("loaded {} bodies", system.tree.len());
    let binds = Keybinds::load(&paths.keybinds_path);

    let mut term = Terminal::begin()?;
    let mut app = App::new(system, binds, &settings, term.cols, term.rows);
    if let Some(name) = &args.focus {
        app.focus_by_name(name);
    }

    let result = main_loop(&mut term, &mut app, settings.fps());
    term.end()?;
    result?;

    if !args.no_save {
        save_settings_atomic(&paths.settings_path, &app.settings(&settings))?;
        app.session.binds.save(&paths.keybinds_path)?;
    }
    log::info!("bye");
    Ok(())
}

fn main_loop(term: &mut Terminal, app: &mut App, fps: u32) -> Result<()> {
    let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
    let mut pending: VecDeque<i32> = VecDeque::new();

    while app.running() {
        let frame_start = Instant::now();
        if term.resize_if_needed()? {
            app.resize(term.cols, term.rows);
        }

        pending.extend(collect_codes_nonblocking(frame_dt)?);
        // one key per tick keeps bursts from skipping frames of feedback
        let key = pending.pop_front().unwrap_or(crate::input::NO_KEY);
        app.tick(key);

        app.render(&mut term.cur);
        term.present()?;

        spin_sleep(frame_dt.saturating_sub(frame_start.elapsed()), Instant::now());
    }
    Ok(())
}

// ---- frame pacing ----

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KEY_ENTER, KEY_ESC, NO_KEY};

    fn app() -> App {
        let system = System::new(&catalog::sol()).unwrap();
        App::new(system, Keybinds::with_defaults(), &Settings::default(), 120, 40)
    }

    fn last_event(a: &App) -> Option<&str> {
        a.session.events.lines.back().map(String::as_str)
    }

    #[test]
    fn run_state_flags() {
        assert!(!RunState::Stopped.running());
        assert!(RunState::PausedInput.paused() && RunState::PausedInput.input_mode());
        assert!(!RunState::Running.paused() && !RunState::Running.input_mode());
        assert!(RunState::RunningInput.input_mode() && !RunState::RunningInput.paused());
    }

    #[test]
    fn event_log_drops_the_oldest() {
        let mut log = EventLog::new(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.lines, ["b", "c"]);
        let mut screen = Screen::new(10, 1);
        log.draw(&mut screen);
        assert_eq!(screen.row_text(0).trim_end(), "c");
    }

    #[test]
    fn quit_key_stops_and_ctrl_c_too() {
        let mut a = app();
        a.tick(NO_KEY);
        assert!(a.running());
        a.tick('y' as i32);
        assert!(!a.running());

        let mut a = app();
        a.tick(KEY_CTRL_C);
        assert_eq!(a.session.state, RunState::Stopped);
    }

    #[test]
    fn search_pauses_and_swallows_global_keys() {
        let mut a = app();
        a.tick('/' as i32);
        assert_eq!(a.session.state, RunState::PausedInput);
        assert!(a.session.windows.is_focused(WindowId::Search));
        assert!(a.view.searching());

        // 'y' is query text here, not quit
        a.tick('y' as i32);
        assert!(a.running());
        a.tick(KEY_ESC);
        assert_eq!(a.session.state, RunState::Running);
        assert!(a.session.windows.is_focused(WindowId::SystemView));
        assert!(a.session.windows.get(WindowId::Search).hidden);
        assert!(!a.view.searching());
    }

    #[test]
    fn search_selects_a_new_focus() {
        let mut a = app();
        a.camera.pan(glam::I64Vec2::new(3, 0));
        a.tick('/' as i32);
        for ch in "Mars".chars() {
            a.tick(ch as i32);
        }
        // Sol is listed first; Mars is the only match below it
        a.tick(crate::input::KEY_END);
        a.tick(KEY_ENTER);
        let mars = a.system.tree.find(&a.system.world, "Mars").unwrap();
        assert_eq!(a.view.focus(), mars);
        assert_eq!(a.camera.position(), glam::I64Vec2::ZERO);
        assert_eq!(last_event(&a), Some("Focus: Mars"));

        let id = a.system.tree.entity(mars);
        a.tick(NO_KEY);
        assert_eq!(a.camera.origin(), a.system.position(id));
    }

    #[test]
    fn time_keys_need_the_time_window() {
        let mut a = app();
        a.tick('.' as i32);
        assert_eq!(a.clock.time(), 0);
        // SystemView -> BodyInfo -> Events -> Time
        for _ in 0..3 {
            a.tick('x' as i32);
        }
        assert!(a.session.windows.is_focused(WindowId::Time));
        a.tick('.' as i32);
        assert_eq!(a.clock.time(), crate::units::DAY_SECONDS);
        a.tick('a' as i32);
        assert!(a.clock.auto());
        assert_eq!(last_event(&a), Some("Auto time on"));
        a.tick(NO_KEY);
        assert_eq!(a.clock.time(), 2 * crate::units::DAY_SECONDS);
    }

    #[test]
    fn render_draws_the_hint_row_and_mutes_color() {
        let mut a = app();
        a.color = false;
        a.tick(NO_KEY);
        let mut out = CellBuffer::new(120, 40);
        a.render(&mut out);
        let hint: String = (0..120).filter_map(|x| out.get(x, 39)).map(|c| c.ch).collect();
        assert!(hint.starts_with("y: Quit"));
        assert!(out.cells.iter().all(|c| c.fg != Color::Yellow && c.fg != Color::Blue));
    }

    #[test]
    fn saved_settings_follow_the_session() {
        let mut a = app();
        a.camera.zoom_out();
        let s = a.settings(&Settings::default());
        assert_eq!(s.scale, crate::camera::DEFAULT_SCALE * 2);
        assert_eq!(s.fps_cap, Settings::default().fps_cap);
    }
}
