use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use deskfolio_core::AppId;
use ratatui::layout::Rect;

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// `'1'` → first app, and so on.
fn app_for_digit(c: char) -> Option<AppId> {
    let n = c.to_digit(10)? as usize;
    AppId::all().get(n.checked_sub(1)?).copied()
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(width, _) => app.resize(width),
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.view.is_started() && !app.is_compact() {
        app.keyboard.press(key);
    }

    if app.input_mode == InputMode::Editing {
        handle_editing(app, key);
        return;
    }

    if !app.view.is_started() {
        handle_start_screen(app, key);
    } else if app.is_compact() {
        handle_compact(app, key);
    } else {
        match app.view.open_app() {
            None => handle_desk(app, key),
            Some(AppId::Ai) => handle_assistant(app, key),
            Some(_) => handle_window(app, key),
        }
    }
}

fn handle_start_screen(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => app.start(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_desk(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('h') | KeyCode::Left => app.move_selection(-1, 0),
        KeyCode::Char('l') | KeyCode::Right => app.move_selection(1, 0),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(0, -1),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(0, 1),

        KeyCode::Enter => {
            let selected = app.selected_app();
            app.open_app(selected);
        }
        KeyCode::Char(c) => {
            if let Some(target) = app_for_digit(c) {
                app.open_app(target);
            }
        }
        _ => {}
    }
}

fn handle_window(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.close_app(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.content_scroll = app.content_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.content_scroll = app.content_scroll.saturating_sub(1);
        }
        KeyCode::Char(c) => {
            if let Some(target) = app_for_digit(c) {
                app.open_app(target);
            }
        }
        _ => {}
    }
}

fn handle_assistant(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_app(),
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Char('j') | KeyCode::Down => {
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(n) = c.to_digit(10) {
                app.send_suggestion(n as usize - 1);
            }
        }
        _ => {}
    }
}

fn handle_compact(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        // No windows to close in the single-page layout
        KeyCode::Esc => app.close_app(),
        KeyCode::Char('i') => app.input_mode = InputMode::Editing,

        KeyCode::Char('j') | KeyCode::Down => {
            app.page_scroll = app.page_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.page_scroll = app.page_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => app.page_scroll = app.page_scroll.saturating_add(10),
        KeyCode::PageUp => app.page_scroll = app.page_scroll.saturating_sub(10),
        KeyCode::Char('g') => app.page_scroll = 0,

        KeyCode::Tab => {
            let apps = AppId::all();
            let current = app.active_section().unwrap_or(AppId::Ai);
            let idx = apps.iter().position(|a| *a == current).unwrap_or(0);
            app.open_app(apps[(idx + 1) % apps.len()]);
        }
        KeyCode::Char(c) => {
            if let Some(target) = app_for_digit(c) {
                app.open_app(target);
            }
        }
        _ => {}
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.send_chat(),
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            if let Some(screen) = app.screen_area {
                if !app.is_compact() && point_in_rect(x, y, screen) {
                    app.mouse.aim(x, y, screen);
                }
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.mouse.clicked = true;
            handle_click(app, x, y);
        }
        MouseEventKind::Up(_) => {
            app.mouse.clicked = false;
        }
        MouseEventKind::ScrollDown => scroll_under_pointer(app, 3),
        MouseEventKind::ScrollUp => scroll_under_pointer(app, -3),
        _ => {}
    }
}

fn handle_click(app: &mut App, x: u16, y: u16) {
    if !app.view.is_started() {
        app.start();
        return;
    }

    if app.is_compact() {
        let hit = app.link_areas.iter().find(|(_, r)| point_in_rect(x, y, *r)).map(|(a, _)| *a);
        if let Some(target) = hit {
            app.open_app(target);
        } else if app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
            app.input_mode = InputMode::Editing;
        }
        return;
    }

    match app.view.open_app() {
        None => {
            let hit = app.icon_areas.iter().position(|(_, r)| point_in_rect(x, y, *r));
            if let Some(idx) = hit {
                app.selected_icon = idx;
                let target = app.icon_areas[idx].0;
                app.open_app(target);
            }
        }
        Some(AppId::Ai) => {
            if app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
                app.input_mode = InputMode::Editing;
            }
        }
        Some(_) => {}
    }
}

fn scroll_under_pointer(app: &mut App, delta: i32) {
    let step = delta.unsigned_abs() as u16;
    let target = if app.is_compact() {
        &mut app.page_scroll
    } else {
        match app.view.open_app() {
            Some(AppId::Ai) => &mut app.chat_scroll,
            Some(_) => &mut app.content_scroll,
            None => return,
        }
    };
    *target = if delta > 0 {
        target.saturating_add(step)
    } else {
        target.saturating_sub(step)
    };
}
