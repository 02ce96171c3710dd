//! Desk peripherals: a virtual keyboard that lights up the keys being typed,
//! and a mouse pad whose mouse follows the pointer over the monitor.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

pub const KEY_ROWS: [&[&str]; 4] = [
    &["ESC", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "="],
    &["TAB", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]"],
    &["CAPS", "A", "S", "D", "F", "G", "H", "J", "K", "L", ";", "'"],
    &["SHIFT", "Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", "SHIFT"],
];

pub const SPACE_LABEL: &str = "SPACE";

/// Ticks a key stays lit. Terminals don't report key release reliably.
const PRESS_TICKS: u8 = 2;

/// Per-tick easing factor for the virtual mouse.
const MOUSE_EASING: f32 = 0.25;

/// Identifier used to match a keyboard label against a pressed key.
pub fn label_id(label: &str) -> String {
    if label == SPACE_LABEL {
        " ".to_string()
    } else {
        label.to_lowercase()
    }
}

/// Identifier for a pressed key, or `None` for keys the keyboard doesn't draw.
pub fn key_id(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(' ') => Some(" ".to_string()),
        KeyCode::Char(c) => Some(c.to_lowercase().collect()),
        KeyCode::Enter => Some("enter".to_string()),
        KeyCode::Backspace => Some("backspace".to_string()),
        KeyCode::Tab | KeyCode::BackTab => Some("tab".to_string()),
        KeyCode::CapsLock => Some("caps".to_string()),
        KeyCode::Esc => Some("esc".to_string()),
        _ => None,
    }
}

/// Terminals report shifted letters as uppercase chars, often without the modifier.
fn is_shifted(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(key.code, KeyCode::Char(c) if c.is_uppercase())
}

#[derive(Debug, Default)]
pub struct Keyboard {
    pressed: HashMap<String, u8>,
}

impl Keyboard {
    pub fn press(&mut self, key: KeyEvent) {
        if let Some(id) = key_id(key.code) {
            self.pressed.insert(id, PRESS_TICKS);
        }
        if is_shifted(&key) {
            self.pressed.insert(label_id("SHIFT"), PRESS_TICKS);
        }
    }

    pub fn is_pressed(&self, label: &str) -> bool {
        self.pressed.contains_key(&label_id(label))
    }

    pub fn tick(&mut self) {
        self.pressed.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}

/// Position of `pos` inside `[start, start + len)` as a fraction in `0.0..=1.0`.
pub fn normalize(pos: u16, start: u16, len: u16) -> f32 {
    if len <= 1 {
        return 0.0;
    }
    let offset = f32::from(pos.saturating_sub(start));
    (offset / f32::from(len - 1)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePad {
    target: (f32, f32),
    current: (f32, f32),
    pub clicked: bool,
}

impl Default for MousePad {
    fn default() -> Self {
        Self {
            target: (0.0, 0.0),
            current: (0.0, 0.0),
            clicked: false,
        }
    }
}

impl MousePad {
    /// Point the mouse at the pointer's position over `screen`.
    pub fn aim(&mut self, column: u16, row: u16, screen: Rect) {
        self.target = (
            normalize(column, screen.x, screen.width),
            normalize(row, screen.y, screen.height),
        );
    }

    pub fn step(&mut self) {
        self.current.0 += (self.target.0 - self.current.0) * MOUSE_EASING;
        self.current.1 += (self.target.1 - self.current.1) * MOUSE_EASING;
    }

    pub fn position(&self) -> (f32, f32) {
        self.current
    }

    /// Top-left cell for a `mouse_w`×`mouse_h` glyph inside the pad.
    pub fn cell_in(&self, pad: Rect, mouse_w: u16, mouse_h: u16) -> (u16, u16) {
        let span_x = pad.width.saturating_sub(mouse_w);
        let span_y = pad.height.saturating_sub(mouse_h);
        let x = (self.current.0 * f32::from(span_x)).round() as u16;
        let y = (self.current.1 * f32::from(span_y)).round() as u16;
        (pad.x + x.min(span_x), pad.y + y.min(span_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ids_match_labels() {
        assert_eq!(key_id(KeyCode::Char('Q')), Some(label_id("Q")));
        assert_eq!(key_id(KeyCode::Char(' ')), Some(label_id(SPACE_LABEL)));
        assert_eq!(key_id(KeyCode::Esc), Some(label_id("ESC")));
        assert_eq!(key_id(KeyCode::CapsLock), Some(label_id("CAPS")));
        assert_eq!(key_id(KeyCode::F(5)), None);
    }

    #[test]
    fn test_pressed_key_fades_after_ticks() {
        let mut keyboard = Keyboard::default();
        keyboard.press(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(keyboard.is_pressed("A"));
        assert!(!keyboard.is_pressed("SHIFT"));
        keyboard.tick();
        assert!(keyboard.is_pressed("A"));
        keyboard.tick();
        assert!(!keyboard.is_pressed("A"));
    }

    #[test]
    fn test_shifted_keys_light_shift() {
        let mut keyboard = Keyboard::default();
        keyboard.press(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::NONE));
        assert!(keyboard.is_pressed("Q"));
        assert!(keyboard.is_pressed("SHIFT"));

        keyboard.release_all();
        keyboard.press(KeyEvent::new(KeyCode::Char('!'), KeyModifiers::SHIFT));
        assert!(keyboard.is_pressed("SHIFT"));

        keyboard.release_all();
        keyboard.press(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert!(!keyboard.is_pressed("SHIFT"));
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize(0, 10, 21), 0.0);
        assert_eq!(normalize(20, 10, 21), 0.5);
        assert_eq!(normalize(30, 10, 21), 1.0);
        assert_eq!(normalize(99, 10, 21), 1.0);
        assert_eq!(normalize(5, 5, 1), 0.0);
    }

    #[test]
    fn test_mouse_eases_towards_target() {
        let mut pad = MousePad::default();
        pad.aim(100, 100, Rect::new(0, 0, 11, 11));
        pad.step();
        assert!((pad.position().0 - 0.25).abs() < 1e-6);
        for _ in 0..60 {
            pad.step();
        }
        assert!((pad.position().0 - 1.0).abs() < 1e-3);
        assert!((pad.position().1 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_mouse_cell_stays_inside_pad() {
        let mut pad = MousePad::default();
        pad.aim(50, 50, Rect::new(0, 0, 10, 10));
        for _ in 0..100 {
            pad.step();
        }
        let area = Rect::new(4, 2, 20, 6);
        let (x, y) = pad.cell_in(area, 3, 2);
        assert!(x + 3 <= area.x + area.width);
        assert!(y + 2 <= area.y + area.height);
    }
}
