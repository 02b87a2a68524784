use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Integer key codes. Printable keys are their character code; keys without
/// one get synthesized codes above 255.
pub(crate) const NO_KEY: i32 = -1;
pub(crate) const KEY_TAB: i32 = 9;
pub(crate) const KEY_ENTER: i32 = 10;
pub(crate) const KEY_ESC: i32 = 27;
pub(crate) const KEY_BACKSPACE: i32 = 127;
pub(crate) const KEY_UP: i32 = 321;
pub(crate) const KEY_DOWN: i32 = 322;
pub(crate) const KEY_RIGHT: i32 = 323;
pub(crate) const KEY_LEFT: i32 = 324;
pub(crate) const KEY_END: i32 = 326;
pub(crate) const KEY_HOME: i32 = 328;
pub(crate) const KEY_PAGE_UP: i32 = 329;
pub(crate) const KEY_PAGE_DOWN: i32 = 330;

pub(crate) fn key_code(k: &KeyEvent) -> Option<i32> {
    let code = match k.code {
        KeyCode::Char(ch) if k.modifiers.contains(KeyModifiers::CONTROL) && ch.is_ascii_alphabetic() => {
            (ch.to_ascii_lowercase() as i32) - ('a' as i32) + 1
        }
        KeyCode::Char(ch) => ch as i32,
        KeyCode::Enter => KEY_ENTER,
        KeyCode::Esc => KEY_ESC,
        KeyCode::Backspace => KEY_BACKSPACE,
        KeyCode::Tab => KEY_TAB,
        KeyCode::Up => KEY_UP,
        KeyCode::Down => KEY_DOWN,
        KeyCode::Right => KEY_RIGHT,
        KeyCode::Left => KEY_LEFT,
        KeyCode::End => KEY_END,
        KeyCode::Home => KEY_HOME,
        KeyCode::PageUp => KEY_PAGE_UP,
        KeyCode::PageDown => KEY_PAGE_DOWN,
        _ => return None,
    };
    Some(code)
}

/// Drains pending key presses without blocking for longer than a millisecond.
pub(crate) fn collect_codes_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<i32>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                if let Some(code) = key_code(&k) {
                    out.push(code);
                }
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}
