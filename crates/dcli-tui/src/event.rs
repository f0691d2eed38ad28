//! Terminal event handling

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events consumed by the main loop
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal tick
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// The background listener replaced the container snapshot
    ContainersRefreshed(usize),
}

/// Event handler that polls the terminal in a separate task
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    paused: Arc<AtomicBool>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let paused = Arc::new(AtomicBool::new(false));
        let tx_clone = tx.clone();
        let paused_clone = paused.clone();

        tokio::spawn(async move {
            loop {
                // Stdin belongs to a child process while paused
                if paused_clone.load(Ordering::SeqCst) {
                    tokio::time::sleep(tick_rate).await;
                    continue;
                }

                let polled = tokio::task::block_in_place(|| event::poll(tick_rate));
                let forwarded = if polled.unwrap_or(false) {
                    match tokio::task::block_in_place(event::read) {
                        Ok(CrosstermEvent::Key(key)) => tx_clone.send(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => tx_clone.send(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => tx_clone.send(Event::Resize(w, h)),
                        _ => Ok(()),
                    }
                } else {
                    tx_clone.send(Event::Tick)
                };

                if forwarded.is_err() {
                    break;
                }
            }
        });

        Self { rx, tx, paused }
    }

    /// Sender for events produced outside the terminal (background tasks)
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Stop or resume reading the terminal
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    /// Drop anything queued, e.g. keys typed into a child process
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
