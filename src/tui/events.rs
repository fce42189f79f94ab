//! Event plumbing for the TUI.
//!
//! Everything that can mutate application state arrives as an [`AppMessage`]
//! on a single unbounded channel: keystrokes and ticks from a dedicated
//! input thread, and completion messages from spawned network tasks.
//! Processing is strictly ordered by arrival, so the state machine needs no
//! locking.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::StylusError;
use crate::model::Session;

/// Messages processed by the event loop.
#[derive(Debug)]
pub enum AppMessage {
    /// Key press.
    Key(KeyEvent),
    /// Periodic tick, used to expire the error banner.
    Tick,
    /// Terminal resize (handled by ratatui on the next draw).
    Resize(u16, u16),
    /// Login plus notebook fetch completed.
    ///
    /// The session arrives with its notebook cache already populated.
    /// `generation` is the state-machine generation at dispatch time;
    /// completions from an abandoned screen are dropped.
    SessionReady {
        /// Generation at dispatch time.
        generation: u64,
        /// The authenticated session.
        session: Session,
    },
    /// Login or the follow-up notebook fetch failed.
    LoginFailed {
        /// Generation at dispatch time.
        generation: u64,
        /// What went wrong.
        error: StylusError,
    },
}

/// Input thread feeding terminal events into the shared message channel.
pub struct EventHandler {
    _handle: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Spawn the input thread.
    ///
    /// The thread polls crossterm at the tick rate and exits once the
    /// receiving side of the channel is gone.
    pub fn spawn(tx: UnboundedSender<AppMessage>, tick_rate: Duration) -> Self {
        let handle = thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(AppMessage::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => {
                        if tx.send(AppMessage::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }

            if tx.send(AppMessage::Tick).is_err() {
                break;
            }
        });

        Self { _handle: handle }
    }
}
