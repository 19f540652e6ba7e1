//! Terminal keyboard input
//!
//! A dedicated thread reads crossterm events, runs them through the keymap and
//! forwards the resulting messages. Prompts pause the reader through
//! [`InputGate`] so the two never compete for stdin.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event};
use tokio::sync::mpsc::UnboundedSender;

use crate::keymap::{keystroke_from_crossterm, KeyAction, Keymap};
use crate::messages::Msg;

/// How long the reader blocks before re-checking the gate
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared switch between the key reader and interactive prompts
#[derive(Debug, Default)]
pub struct InputGate {
    paused: AtomicBool,
    stopped: AtomicBool,
}

impl InputGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Map one terminal event to messages
pub fn handle_event(keymap: &mut Keymap, event: &Event) -> Vec<Msg> {
    let Event::Key(key_event) = event else {
        return Vec::new();
    };
    let Some(keystroke) = keystroke_from_crossterm(key_event) else {
        return Vec::new();
    };

    match keymap.handle_keystroke(keystroke) {
        KeyAction::Execute(command) => {
            tracing::debug!("Key {} -> {:?}", keystroke, command);
            command.to_msgs()
        }
        KeyAction::AwaitMore => Vec::new(),
        KeyAction::NoMatch => {
            tracing::trace!("Unbound key {}", keystroke);
            Vec::new()
        }
    }
}

/// Start the key reader thread
pub fn spawn_key_reader(
    mut keymap: Keymap,
    gate: Arc<InputGate>,
    tx: UnboundedSender<Msg>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("mdview-keys".to_string())
        .spawn(move || {
            while !gate.is_stopped() {
                if gate.is_paused() {
                    std::thread::sleep(POLL_INTERVAL);
                    continue;
                }

                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        tracing::error!("Terminal input failed: {}", e);
                        return;
                    }
                }

                let event = match event::read() {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!("Failed to read terminal event: {}", e);
                        return;
                    }
                };

                for msg in handle_event(&mut keymap, &event) {
                    if tx.send(msg).is_err() {
                        return;
                    }
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::default_bindings;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_keys_become_messages() {
        let mut keymap = Keymap::with_bindings(default_bindings());
        let ctrl_o = Event::Key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(&mut keymap, &ctrl_o), vec![Msg::OpenFile]);

        let question = Event::Key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT));
        assert_eq!(handle_event(&mut keymap, &question), vec![Msg::ToggleShortcuts]);
    }

    #[test]
    fn test_other_events_ignored() {
        let mut keymap = Keymap::with_bindings(default_bindings());
        assert!(handle_event(&mut keymap, &Event::FocusGained).is_empty());
        let unbound = Event::Key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE));
        assert!(handle_event(&mut keymap, &unbound).is_empty());
    }

    #[test]
    fn test_gate_flags() {
        let gate = InputGate::new();
        gate.pause();
        assert!(gate.is_paused());
        gate.resume();
        assert!(!gate.is_paused());
        gate.stop();
        assert!(gate.is_stopped());
    }
}
