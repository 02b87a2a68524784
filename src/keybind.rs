//! Named key bindings with JSON persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::save_json_atomic;
use crate::input::{
    KEY_BACKSPACE, KEY_DOWN, KEY_END, KEY_ENTER, KEY_ESC, KEY_HOME, KEY_LEFT, KEY_PAGE_DOWN,
    KEY_PAGE_UP, KEY_RIGHT, KEY_TAB, KEY_UP,
};

pub(crate) const G_ESCAPE: &str = "G_Escape";
pub(crate) const G_SELECT: &str = "G_Select";
pub(crate) const G_NEXT_WINDOW: &str = "G_NextWindow";
pub(crate) const G_PREV_WINDOW: &str = "G_PrevWindow";
pub(crate) const G_QUIT: &str = "G_Quit";

pub(crate) const VIEW_PAN_UP: &str = "Systemview_PanUp";
pub(crate) const VIEW_PAN_LEFT: &str = "Systemview_PanLeft";
pub(crate) const VIEW_PAN_DOWN: &str = "Systemview_PanDown";
pub(crate) const VIEW_PAN_RIGHT: &str = "Systemview_PanRight";
pub(crate) const VIEW_INC_SCALE: &str = "Systemview_IncScale";
pub(crate) const VIEW_DEC_SCALE: &str = "Systemview_DecScale";
pub(crate) const VIEW_SEARCH: &str = "Systemview_Search";
pub(crate) const SEARCH_PREV: &str = "Systemview_Search_Prev";
pub(crate) const SEARCH_NEXT: &str = "Systemview_Search_Next";
pub(crate) const SEARCH_TOP: &str = "Systemview_Search_Top";
pub(crate) const SEARCH_BOTTOM: &str = "Systemview_Search_Bottom";
pub(crate) const SEARCH_COLLAPSE: &str = "Systemview_Search_Collapse";

pub(crate) const TIME_STEP: &str = "Timeman_Step";
pub(crate) const TIME_INC_STEP: &str = "Timeman_IncStep";
pub(crate) const TIME_DEC_STEP: &str = "Timeman_DecStep";
pub(crate) const TIME_TOGGLE_AUTO: &str = "Timeman_ToggleAuto";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum BindContext {
    Global,
    SystemView,
    Time,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Bind {
    pub(crate) code: i32,
    pub(crate) context: BindContext,
    #[serde(default)]
    pub(crate) desc: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Keybinds {
    binds: BTreeMap<String, Bind>,
}

impl Keybinds {
    /// Every action with its default key.
    pub(crate) fn with_defaults() -> Self {
        let mut k = Self::default();
        k.register_defaults();
        k
    }

    /// Reads stored bindings, falling back to an empty set, then fills in the
    /// defaults for anything missing.
    pub(crate) fn load(path: &Path) -> Self {
        let mut k = fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str::<Keybinds>(&s).ok())
            .unwrap_or_default();
        let stored = k.binds.len();
        k.register_defaults();
        log::info!("keybinds: {stored} stored, {} total", k.binds.len());
        k
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        save_json_atomic(path, self)
    }

    fn register_defaults(&mut self) {
        use BindContext::{Global, SystemView, Time};

        self.register(KEY_ESC, G_ESCAPE, Global, "Escape from focused searchbox / window");
        self.register(KEY_ENTER, G_SELECT, Global, "Select something");
        self.register('x' as i32, G_NEXT_WINDOW, Global, "Focus the next window");
        self.register('X' as i32, G_PREV_WINDOW, Global, "Focus the previous window");
        self.register('y' as i32, G_QUIT, Global, "Quit");

        self.register('w' as i32, VIEW_PAN_UP, SystemView, "Move the camera up");
        self.register('a' as i32, VIEW_PAN_LEFT, SystemView, "Move the camera left");
        self.register('s' as i32, VIEW_PAN_DOWN, SystemView, "Move the camera down");
        self.register('d' as i32, VIEW_PAN_RIGHT, SystemView, "Move the camera right");
        self.register('-' as i32, VIEW_INC_SCALE, SystemView, "Zoom out");
        self.register('+' as i32, VIEW_DEC_SCALE, SystemView, "Zoom in");
        self.register('/' as i32, VIEW_SEARCH, SystemView, "Search bodies to change focus");
        self.register(KEY_UP, SEARCH_PREV, SystemView, "Move the search cursor up");
        self.register(KEY_DOWN, SEARCH_NEXT, SystemView, "Move the search cursor down");
        self.register(KEY_HOME, SEARCH_TOP, SystemView, "First search entry");
        self.register(KEY_END, SEARCH_BOTTOM, SystemView, "Last search entry");
        self.register(KEY_RIGHT, SEARCH_COLLAPSE, SystemView, "Expand or collapse a search entry");

        self.register('.' as i32, TIME_STEP, Time, "Move time ahead by a step");
        self.register('+' as i32, TIME_INC_STEP, Time, "Double the time step");
        self.register('-' as i32, TIME_DEC_STEP, Time, "Halve the time step");
        self.register('a' as i32, TIME_TOGGLE_AUTO, Time, "Toggle automatic time");
    }

    /// Adds `name` bound to `code`. A binding already loaded for `name` keeps
    /// its code; context and description are always refreshed.
    pub(crate) fn register(&mut self, code: i32, name: &str, context: BindContext, desc: &str) {
        let bind = self.binds.entry(name.to_string()).or_insert(Bind {
            code,
            context,
            desc: String::new(),
        });
        bind.context = context;
        bind.desc = desc.to_string();
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Bind> {
        self.binds.get(name)
    }

    /// Code bound to `name`, or `NO_KEY` when unbound.
    pub(crate) fn code(&self, name: &str) -> i32 {
        self.binds.get(name).map_or(crate::input::NO_KEY, |b| b.code)
    }

    /// True when `key` is a real key press bound to `name`.
    pub(crate) fn is(&self, name: &str, key: i32) -> bool {
        key >= 0 && self.code(name) == key
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Bind)> {
        self.binds.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Human-readable key name.
pub(crate) fn translate_code(code: i32) -> String {
    match code {
        KEY_ENTER => "Enter".into(),
        KEY_ESC => "Esc".into(),
        KEY_BACKSPACE | 8 => "Backspace".into(),
        KEY_TAB => "Tab".into(),
        32 => "Space".into(),
        KEY_UP => "Up".into(),
        KEY_DOWN => "Down".into(),
        KEY_RIGHT => "Right".into(),
        KEY_LEFT => "Left".into(),
        KEY_END => "End".into(),
        KEY_HOME => "Home".into(),
        KEY_PAGE_UP => "PageUp".into(),
        KEY_PAGE_DOWN => "PageDown".into(),
        1..=26 => format!("Ctrl-{}", (b'A' + (code - 1) as u8) as char),
        33..=126 => (code as u8 as char).to_string(),
        _ => match u32::try_from(code).ok().and_then(char::from_u32) {
            Some(ch) if !ch.is_control() => ch.to_string(),
            _ => format!("<{code}>"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_action() {
        let k = Keybinds::with_defaults();
        assert_eq!(k.code(G_QUIT), 'y' as i32);
        assert_eq!(k.code(SEARCH_NEXT), KEY_DOWN);
        assert_eq!(k.get(TIME_INC_STEP).map(|b| b.context), Some(BindContext::Time));
        assert_eq!(k.iter().count(), 21);
        assert!(!k.is(G_QUIT, -1));
        assert_eq!(k.code("nope"), -1);
    }

    #[test]
    fn register_keeps_a_loaded_code() {
        let mut k = Keybinds::default();
        k.register('q' as i32, G_QUIT, BindContext::Global, "old");
        k.register('y' as i32, G_QUIT, BindContext::Global, "Quit");
        assert_eq!(k.code(G_QUIT), 'q' as i32);
        assert_eq!(k.get(G_QUIT).map(|b| b.desc.as_str()), Some("Quit"));
    }

    #[test]
    fn json_round_trip_preserves_rebinds() {
        let mut k = Keybinds::with_defaults();
        if let Some(b) = k.binds.get_mut(VIEW_PAN_UP) {
            b.code = KEY_UP;
        }
        let json = serde_json::to_string(&k).unwrap();
        assert!(json.contains("\"Systemview_PanUp\""));

        let mut back: Keybinds = serde_json::from_str(&json).unwrap();
        back.register_defaults();
        assert_eq!(back.code(VIEW_PAN_UP), KEY_UP);
        assert_eq!(back.code(VIEW_PAN_DOWN), 's' as i32);
    }

    #[test]
    fn key_names() {
        assert_eq!(translate_code('/' as i32), "/");
        assert_eq!(translate_code(KEY_ENTER), "Enter");
        assert_eq!(translate_code(KEY_HOME), "Home");
        assert_eq!(translate_code(32), "Space");
        assert_eq!(translate_code(3), "Ctrl-C");
        assert_eq!(translate_code(-1), "<-1>");
    }
}
