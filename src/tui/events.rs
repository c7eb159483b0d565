//! TUI Event System
//!
//! Terminal input and background completions, funneled through one channel
//! so every state mutation happens on the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::analysis::{AnalysisError, AnalysisResult};
use crate::error::MoodRxError;

/// Events that can occur in the kiosk
#[derive(Debug)]
pub enum TuiEvent {
    /// User pressed a key
    Key(KeyEvent),

    /// User pasted text (e.g. a dragged-in file path)
    Paste(String),

    /// Terminal was resized
    Resize(u16, u16),

    /// Tick for the spinner
    Tick,

    /// A spawned submission finished
    AnalysisFinished {
        generation: u64,
        outcome: Result<AnalysisResult, AnalysisError>,
    },

    /// A spawned camera capture finished. `shot` matches the request that
    /// started it; `Ok(None)` means the camera had no frame.
    SnapshotTaken {
        shot: u64,
        outcome: Result<Option<String>, MoodRxError>,
    },

    /// Request to quit
    Quit,
}

/// Event handler for the TUI
pub struct EventHandler {
    tx: mpsc::UnboundedSender<TuiEvent>,
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a sender for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Receive the next event (waits until available)
    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }

    /// Try to receive the next event without waiting
    pub fn try_next(&mut self) -> Option<TuiEvent> {
        self.rx.try_recv().ok()
    }

    /// Start listening for terminal events.
    ///
    /// Uses crossterm's async EventStream so the HTTP submission and the
    /// camera process share the runtime with input handling.
    pub fn start_terminal_listener(tx: mpsc::UnboundedSender<TuiEvent>) {
        use crossterm::event::{Event, EventStream, KeyEventKind};
        use futures::StreamExt;

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let tick_interval = std::time::Duration::from_millis(100);

            loop {
                let event = tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => Some(event),
                            Some(Err(e)) => {
                                tracing::debug!("Terminal event error: {}", e);
                                None
                            }
                            None => break,
                        }
                    }
                    _ = tokio::time::sleep(tick_interval) => None,
                };

                if let Some(event) = event {
                    let closed = match event {
                        // Press only; release/repeat would double every keystroke
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            tx.send(TuiEvent::Key(key)).is_err()
                        }
                        Event::Resize(w, h) => tx.send(TuiEvent::Resize(w, h)).is_err(),
                        Event::Paste(text) => tx.send(TuiEvent::Paste(text)).is_err(),
                        _ => false,
                    };
                    if closed {
                        break;
                    }
                }

                if tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to check if a key event matches
pub fn key_matches(event: &KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    event.code == code && event.modifiers == modifiers
}

/// Kiosk key bindings
pub mod keys {
    use super::*;

    /// Ctrl+C - Quit
    pub fn is_quit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    /// Ctrl+R - Restart from step 1
    pub fn is_restart(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('r'), KeyModifiers::CONTROL)
    }

    /// Ctrl+S - Submit the selected image
    pub fn is_submit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    /// Escape - Back
    pub fn is_cancel(event: &KeyEvent) -> bool {
        event.code == KeyCode::Esc
    }

    /// Enter - Confirm
    pub fn is_enter(event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter && event.modifiers.is_empty()
    }

    /// Tab - Switch upload/camera
    pub fn is_toggle_mode(event: &KeyEvent) -> bool {
        matches!(event.code, KeyCode::Tab | KeyCode::BackTab)
    }

    /// Space or 'c' - Camera snapshot
    pub fn is_snapshot(event: &KeyEvent) -> bool {
        matches!(event.code, KeyCode::Char(' ') | KeyCode::Char('c'))
            && (event.modifiers.is_empty() || event.modifiers == KeyModifiers::SHIFT)
    }

    /// 'r' - Retake
    pub fn is_retake(event: &KeyEvent) -> bool {
        matches!(event.code, KeyCode::Char('r') | KeyCode::Char('R'))
            && (event.modifiers.is_empty() || event.modifiers == KeyModifiers::SHIFT)
    }

    /// Delete - Retake while the upload path field has focus
    pub fn is_delete(event: &KeyEvent) -> bool {
        event.code == KeyCode::Delete
    }

    pub fn is_backspace(event: &KeyEvent) -> bool {
        event.code == KeyCode::Backspace
    }

    /// Printable character with no modifiers beyond Shift
    pub fn text_char(event: &KeyEvent) -> Option<char> {
        match event.code {
            KeyCode::Char(c)
                if event.modifiers.is_empty() || event.modifiers == KeyModifiers::SHIFT =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handler_creation() {
        let mut handler = EventHandler::new();
        let sender = handler.sender();
        assert!(sender.send(TuiEvent::Quit).is_ok());
        assert!(matches!(handler.try_next(), Some(TuiEvent::Quit)));
        assert!(handler.try_next().is_none());
    }

    #[test]
    fn test_key_matches() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(key_matches(&event, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!key_matches(&event, KeyCode::Char('c'), KeyModifiers::empty()));
    }

    #[test]
    fn test_quit_vs_snapshot() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(keys::is_quit(&ctrl_c));
        assert!(!keys::is_snapshot(&ctrl_c));

        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::empty());
        assert!(!keys::is_quit(&c));
        assert!(keys::is_snapshot(&c));
    }

    #[test]
    fn test_restart_vs_retake() {
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(keys::is_restart(&ctrl_r));
        assert!(!keys::is_retake(&ctrl_r));

        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::empty());
        assert!(keys::is_retake(&r));
        assert!(!keys::is_restart(&r));
    }

    #[test]
    fn test_text_char() {
        let shifted = KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(keys::text_char(&shifted), Some('K'));
        let ctrl = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(keys::text_char(&ctrl), None);
        let hangul = KeyEvent::new(KeyCode::Char('한'), KeyModifiers::empty());
        assert_eq!(keys::text_char(&hangul), Some('한'));
    }
}
