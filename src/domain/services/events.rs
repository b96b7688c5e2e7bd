#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;
use crate::domain::models::ScrollMove;

/// Redraw cadence while nothing else happens. Keeps the loading box and the
/// bubble timestamps current.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

fn from_input(input: Input) -> Event {
    match input {
        Input {
            key: Key::Char('c'),
            ctrl: true,
            ..
        } => return Event::Cancel(),
        Input {
            key: Key::Enter, ..
        } => return Event::Submit(),
        Input { key: Key::Up, .. } => return Event::Scroll(ScrollMove::LineUp),
        Input { key: Key::Down, .. } => return Event::Scroll(ScrollMove::LineDown),
        Input {
            key: Key::PageUp, ..
        }
        | Input {
            key: Key::Char('u'),
            ctrl: true,
            ..
        } => return Event::Scroll(ScrollMove::PageUp),
        Input {
            key: Key::PageDown,
            ..
        }
        | Input {
            key: Key::Char('d'),
            ctrl: true,
            ..
        } => return Event::Scroll(ScrollMove::PageDown),
        Input {
            key: Key::End,
            ctrl: true,
            ..
        } => return Event::Scroll(ScrollMove::Latest),
        input => return Event::TextInput(input),
    }
}

/// Maps a terminal event to what the chat does with it. Key releases and
/// mouse clicks are dropped.
pub fn from_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => return Some(Event::Paste(text)),
        CrosstermEvent::Resize(_, _) => return Some(Event::Redraw()),
        CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => return Some(Event::Scroll(ScrollMove::LineUp)),
            MouseEventKind::ScrollDown => return Some(Event::Scroll(ScrollMove::LineDown)),
            _ => return None,
        },
        CrosstermEvent::Key(key_event) => {
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            return Some(from_input(key_event.into()));
        }
        _ => return None,
    }
}

/// Merges terminal input with the answers coming back from the assistant
/// worker.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => from_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "unreadable terminal event");
                        None
                    }
                    None => None
                },
                _ = time::sleep(REDRAW_INTERVAL) => Some(Event::Redraw())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
