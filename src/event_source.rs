use anyhow::Result;
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Abstraction over terminal input so the run loop can be driven by
/// scripted key sequences in tests.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    fn read(&mut self) -> Result<Event>;
}

/// Real keyboard input via crossterm.
pub struct KeyboardEventSource;

impl EventSource for KeyboardEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Scripted input for tests. Once the script runs out it reports no more
/// events; a stray read past the end yields `q` so a loop under test
/// always terminates.
pub struct SimulatedEventSource {
    events: Vec<Event>,
    current_index: usize,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }

    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: crossterm::event::KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        })
    }

    pub fn char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub fn enter_key() -> Event {
        Self::key_event(KeyCode::Enter, KeyModifiers::empty())
    }

    pub fn esc_key() -> Event {
        Self::key_event(KeyCode::Esc, KeyModifiers::empty())
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.current_index < self.events.len())
    }

    fn read(&mut self) -> Result<Event> {
        if self.current_index < self.events.len() {
            let event = self.events[self.current_index].clone();
            self.current_index += 1;
            Ok(event)
        } else {
            Ok(SimulatedEventSource::char_key('q'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_events_replay_in_order_then_run_dry() {
        let events = vec![
            SimulatedEventSource::char_key('j'),
            SimulatedEventSource::enter_key(),
            SimulatedEventSource::esc_key(),
        ];

        let mut source = SimulatedEventSource::new(events);

        assert!(source.poll(Duration::from_millis(0)).unwrap());
        match source.read().unwrap() {
            Event::Key(key) => assert_eq!(key.code, KeyCode::Char('j')),
            other => panic!("unexpected event: {other:?}"),
        }
        match source.read().unwrap() {
            Event::Key(key) => assert_eq!(key.code, KeyCode::Enter),
            other => panic!("unexpected event: {other:?}"),
        }
        match source.read().unwrap() {
            Event::Key(key) => assert_eq!(key.code, KeyCode::Esc),
            other => panic!("unexpected event: {other:?}"),
        }

        assert!(!source.poll(Duration::from_millis(0)).unwrap());
        match source.read().unwrap() {
            Event::Key(key) => assert_eq!(key.code, KeyCode::Char('q')),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
