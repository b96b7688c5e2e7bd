use crossterm::event::Event as CrosstermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyEventState;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use tui_textarea::Key;

use super::from_crossterm;
use crate::domain::models::Event;
use crate::domain::models::ScrollMove;

fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
    return CrosstermEvent::Key(KeyEvent::new(code, modifiers));
}

fn scroll_move(event: Option<Event>) -> Option<ScrollMove> {
    match event {
        Some(Event::Scroll(scroll_move)) => return Some(scroll_move),
        _ => return None,
    }
}

#[test]
fn it_maps_ctrl_c_to_cancel() {
    let event = from_crossterm(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(matches!(event, Some(Event::Cancel())));
}

#[test]
fn it_maps_enter_to_submit() {
    let event = from_crossterm(key(KeyCode::Enter, KeyModifiers::NONE));
    assert!(matches!(event, Some(Event::Submit())));
}

#[test]
fn it_maps_scroll_keys() {
    assert_eq!(
        scroll_move(from_crossterm(key(KeyCode::Up, KeyModifiers::NONE))),
        Some(ScrollMove::LineUp)
    );
    assert_eq!(
        scroll_move(from_crossterm(key(KeyCode::Down, KeyModifiers::NONE))),
        Some(ScrollMove::LineDown)
    );
    assert_eq!(
        scroll_move(from_crossterm(key(KeyCode::Char('u'), KeyModifiers::CONTROL))),
        Some(ScrollMove::PageUp)
    );
    assert_eq!(
        scroll_move(from_crossterm(key(KeyCode::PageDown, KeyModifiers::NONE))),
        Some(ScrollMove::PageDown)
    );
    assert_eq!(
        scroll_move(from_crossterm(key(KeyCode::End, KeyModifiers::CONTROL))),
        Some(ScrollMove::Latest)
    );
}

#[test]
fn it_passes_typing_to_the_textarea() {
    let event = from_crossterm(key(KeyCode::Char('w'), KeyModifiers::NONE));
    match event {
        Some(Event::TextInput(input)) => assert!(matches!(input.key, Key::Char('w'))),
        _ => panic!("expected text input"),
    }

    // Plain End moves the cursor, it does not scroll.
    let event = from_crossterm(key(KeyCode::End, KeyModifiers::NONE));
    assert!(matches!(event, Some(Event::TextInput(_))));
}

#[test]
fn it_ignores_key_releases() {
    let release = CrosstermEvent::Key(KeyEvent {
        code: KeyCode::Enter,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    });
    assert!(from_crossterm(release).is_none());
}

#[test]
fn it_maps_mouse_wheel_and_paste() {
    let wheel = CrosstermEvent::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollUp,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(scroll_move(from_crossterm(wheel)), Some(ScrollMove::LineUp));

    let event = from_crossterm(CrosstermEvent::Paste("WBC 13.2".to_string()));
    match event {
        Some(Event::Paste(text)) => assert_eq!(text, "WBC 13.2"),
        _ => panic!("expected paste"),
    }

    assert!(matches!(
        from_crossterm(CrosstermEvent::Resize(80, 24)),
        Some(Event::Redraw())
    ));
}
