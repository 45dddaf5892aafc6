use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;

/// Rows moved per wheel notch or arrow key.
const SCROLL_STEP: f32 = 1.0;
/// Rows moved per page key.
const PAGE_STEP: f32 = 10.0;

pub fn handle_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Enter => {
            let line = app.input.trim().to_string();
            app.input.clear();
            if !line.is_empty() {
                app.controller.submit(&line);
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        // Positive deltas move towards the top of the log, negative back
        // towards the bottom anchor; the controller clamps either way.
        KeyCode::Up => app.controller.scroll(SCROLL_STEP),
        KeyCode::Down => app.controller.scroll(-SCROLL_STEP),
        KeyCode::PageUp => app.controller.scroll(PAGE_STEP),
        KeyCode::PageDown => app.controller.scroll(-PAGE_STEP),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                if c == 'c' {
                    app.should_quit = true;
                }
            } else {
                app.input.push(c);
            }
        }
        _ => {}
    }
}

pub fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.controller.scroll(SCROLL_STEP),
        MouseEventKind::ScrollDown => app.controller.scroll(-SCROLL_STEP),
        _ => {}
    }
}
