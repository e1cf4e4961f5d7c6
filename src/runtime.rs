use std::sync::mpsc::{self, Receiver};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum ActivityEvent {
    Key(KeyEvent),
    /// Left button press at a terminal cell
    Click { column: u16, row: u16 },
    Resize,
}

impl ActivityEvent {
    /// Map a raw terminal event, dropping the ones the app does not handle.
    pub fn from_terminal(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(key) => Some(ActivityEvent::Key(key)),
            CtEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                Some(ActivityEvent::Click {
                    column: mouse.column,
                    row: mouse.row,
                })
            }
            CtEvent::Resize(_, _) => Some(ActivityEvent::Resize),
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait EventSource: Send + 'static {
    /// Block until the next event. `None` once the source is closed.
    fn recv(&self) -> Option<ActivityEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<ActivityEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(ev) = ActivityEvent::from_terminal(ev) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv(&self) -> Option<ActivityEvent> {
        self.rx.recv().ok()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<ActivityEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ActivityEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv(&self) -> Option<ActivityEvent> {
        self.rx.recv().ok()
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self { event_source }
    }

    pub fn step(&self) -> Option<ActivityEvent> {
        self.event_source.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(ActivityEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx));

        assert_eq!(runner.step(), Some(ActivityEvent::Resize));
    }

    #[test]
    fn step_returns_none_when_source_closes() {
        let (tx, rx) = mpsc::channel::<ActivityEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx));
        assert_eq!(runner.step(), None);
    }

    #[test]
    fn only_left_presses_become_clicks() {
        let press = |kind| {
            CtEvent::Mouse(MouseEvent {
                kind,
                column: 4,
                row: 7,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            ActivityEvent::from_terminal(press(MouseEventKind::Down(MouseButton::Left))),
            Some(ActivityEvent::Click { column: 4, row: 7 })
        );
        assert_eq!(
            ActivityEvent::from_terminal(press(MouseEventKind::Down(MouseButton::Right))),
            None
        );
        assert_eq!(ActivityEvent::from_terminal(press(MouseEventKind::Moved)), None);

        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE);
        assert_eq!(
            ActivityEvent::from_terminal(CtEvent::Key(key)),
            Some(ActivityEvent::Key(key))
        );
    }
}
