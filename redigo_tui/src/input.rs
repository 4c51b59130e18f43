//! Terminal key events, read on a dedicated thread.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use redigo_console::Key;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const INPUT_QUEUE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    Resize,
    Quit,
}

pub fn translate(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Resize(_, _) => Some(Input::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let input = match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Input::Quit,
        KeyCode::Enter => Input::Key(Key::Enter),
        KeyCode::Backspace => Input::Key(Key::Backspace),
        KeyCode::Char(c) if !ctrl && !alt => Input::Key(Key::Char(c)),
        _ => Input::Key(Key::Other),
    };
    Some(input)
}

/// Spawn the reader thread. It exits when the receiver is dropped or the
/// terminal stops delivering events.
pub fn spawn_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel(INPUT_QUEUE);
    thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(INPUT_POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                error!("Terminal poll failed: {}", e);
                break;
            }
        }
        let input = match event::read() {
            Ok(ev) => translate(ev),
            Err(e) => {
                error!("Terminal read failed: {}", e);
                break;
            }
        };
        if let Some(input) = input {
            if tx.blocking_send(input).is_err() {
                break;
            }
        }
    });
    debug!("Input reader started");
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn editing_keys_map_to_console_keys() {
        assert_eq!(
            translate(press(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Input::Key(Key::Char('x')))
        );
        assert_eq!(
            translate(press(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(Input::Key(Key::Char('X')))
        );
        assert_eq!(
            translate(press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Input::Key(Key::Enter))
        );
        assert_eq!(
            translate(press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Input::Key(Key::Backspace))
        );
    }

    #[test]
    fn navigation_keys_are_ignored_by_the_console() {
        for code in [KeyCode::Up, KeyCode::Left, KeyCode::Tab, KeyCode::Esc] {
            assert_eq!(
                translate(press(code, KeyModifiers::NONE)),
                Some(Input::Key(Key::Other))
            );
        }
        assert_eq!(
            translate(press(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(Input::Key(Key::Other))
        );
    }

    #[test]
    fn ctrl_c_and_ctrl_d_quit() {
        assert_eq!(
            translate(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(
            translate(press(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
    }

    #[test]
    fn releases_and_focus_events_are_dropped() {
        let mut release = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(Event::Key(release)), None);
        assert_eq!(translate(Event::FocusGained), None);
        assert_eq!(translate(Event::Resize(80, 24)), Some(Input::Resize));
    }
}
