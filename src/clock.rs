use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::keybind::{self, Keybinds};
use crate::surface::Screen;
use crate::units::{split_duration, DAY_SECONDS};

/// Simulated time in whole seconds since 2000-01-01 12:00 UTC.
#[derive(Clone, Debug)]
pub(crate) struct Clock {
    time: i64,
    step: i64,
    auto: bool,
    changed: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DAY_SECONDS, false)
    }
}

impl Clock {
    pub(crate) fn new(step: i64, auto: bool) -> Self {
        Self {
            time: 0,
            step: step.max(1),
            auto,
            // first frame always propagates
            changed: true,
        }
    }

    pub(crate) fn time(&self) -> i64 {
        self.time
    }

    pub(crate) fn step(&self) -> i64 {
        self.step
    }

    pub(crate) fn auto(&self) -> bool {
        self.auto
    }

    /// Whether time moved during the last `update`.
    pub(crate) fn changed(&self) -> bool {
        self.changed
    }

    pub(crate) fn advance(&mut self) {
        self.time = self.time.saturating_add(self.step);
        self.changed = true;
    }

    /// Per-tick update. Keys only apply while the time window has focus, and
    /// time never moves while paused.
    pub(crate) fn update(&mut self, key: i32, focused: bool, paused: bool, binds: &Keybinds) {
        self.changed = false;
        if !paused && self.auto {
            self.advance();
        }
        if !focused {
            return;
        }
        if binds.is(keybind::TIME_INC_STEP, key) {
            self.step = self.step.saturating_mul(2).max(1);
            log::debug!("time step {}", self.step);
        } else if binds.is(keybind::TIME_DEC_STEP, key) {
            self.step = (self.step / 2).max(1);
            log::debug!("time step {}", self.step);
        } else if binds.is(keybind::TIME_TOGGLE_AUTO, key) {
            self.auto = !self.auto;
        } else if binds.is(keybind::TIME_STEP, key) && !paused {
            self.advance();
        }
    }

    pub(crate) fn date(&self) -> Option<DateTime<Utc>> {
        let epoch = NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(12, 0, 0)?.and_utc();
        epoch.checked_add_signed(TimeDelta::try_seconds(self.time)?)
    }

    pub(crate) fn draw(&self, screen: &mut Screen) {
        screen.reset_pen();
        screen.buf.fill(Default::default());
        match self.date() {
            Some(d) => {
                screen.print(0, 0, &d.format("%B %-d, %Y").to_string());
                screen.print(0, 1, &d.format("%H:%M").to_string());
            }
            None => screen.print(0, 0, &format!("T+{} s", self.time)),
        }
        let [y, mo, d, h, mi, s] = split_duration(self.step);
        screen.print(0, 3, "Step:");
        screen.print(0, 4, &format!("{y} Years, {mo} Months"));
        screen.print(0, 5, &format!("{d} Days, {h} Hours"));
        screen.print(0, 6, &format!("{mi} Minutes, {s} Seconds"));
        if self.auto {
            screen.print(0, 8, "Auto");
        }
    }
}
