// src/notify/mod.rs
//! At-most-once fan-out of disaster mutations to connected stream clients.
//! Nothing is persisted or replayed; a client that is not subscribed when
//! an event fires never sees it.
use serde::Serialize;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use crate::domain::Disaster;
use crate::errors::ServerError;

pub const EVENT_NAME: &str = "disaster_updated";
pub const KEEP_ALIVE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum DisasterEvent {
    Create { disaster: Disaster },
    Update { disaster: Disaster },
    Delete { disaster_id: String },
}

impl DisasterEvent {
    /// One server-sent-events frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        let data = serde_json::to_string(self)?;
        Ok(format!("event: {EVENT_NAME}\ndata: {data}\n\n"))
    }
}

/// Stream clients each hold a server worker for as long as they stay
/// connected, so their number is capped.
pub const DEFAULT_MAX_SUBSCRIBERS: usize = 4;

struct Subscriber {
    tx: Sender<String>,
    // Dead once the `Subscription` (and with it the response body) is dropped.
    alive: Weak<()>,
}

pub struct Notifier {
    subscribers: Mutex<Vec<Subscriber>>,
    max_subscribers: usize,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_max_subscribers(DEFAULT_MAX_SUBSCRIBERS)
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_subscribers(max_subscribers: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            max_subscribers,
        }
    }

    /// The subscriber list with dropped subscriptions already removed.
    fn live(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        // A panicked sender can't leave the list half-written.
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subs.retain(|s| s.alive.strong_count() > 0);
        subs
    }

    pub fn subscribe(&self) -> Result<Subscription, ServerError> {
        self.subscribe_with_keep_alive(KEEP_ALIVE)
    }

    /// `TooManyRequests` once `max_subscribers` clients are connected.
    pub fn subscribe_with_keep_alive(&self, keep_alive: Duration) -> Result<Subscription, ServerError> {
        let mut subs = self.live();
        if subs.len() >= self.max_subscribers {
            tracing::warn!(limit = self.max_subscribers, "stream client refused, subscriber cap reached");
            return Err(ServerError::TooManyRequests);
        }

        let (tx, rx) = mpsc::channel();
        let alive = Arc::new(());
        subs.push(Subscriber {
            tx,
            alive: Arc::downgrade(&alive),
        });
        tracing::debug!(subscribers = subs.len(), "stream client subscribed");
        Ok(Subscription {
            rx,
            keep_alive,
            _alive: alive,
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.live().len()
    }

    /// Sends to every live subscriber and drops the ones that went away.
    /// Returns how many received the event.
    pub fn notify(&self, event: &DisasterEvent) -> usize {
        let frame = match event.to_frame() {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(error = %e, "could not encode event");
                return 0;
            }
        };

        let mut subs = self.live();
        subs.retain(|s| s.tx.send(frame.clone()).is_ok());
        tracing::debug!(delivered = subs.len(), "broadcast {EVENT_NAME}");
        subs.len()
    }
}

/// Receiving side of one stream client. Yields event frames, or a comment
/// frame after `keep_alive` of silence.
pub struct Subscription {
    rx: Receiver<String>,
    keep_alive: Duration,
    _alive: Arc<()>,
}

impl Iterator for Subscription {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rx.recv_timeout(self.keep_alive) {
            Ok(frame) => Some(Ok(frame)),
            Err(RecvTimeoutError::Timeout) => Some(Ok(": keep-alive\n\n".to_string())),
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
