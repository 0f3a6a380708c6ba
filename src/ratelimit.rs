// src/ratelimit.rs
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::errors::ServerError;

/// Past this many tracked peers, expired windows are swept on insert.
const SWEEP_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request budget per peer address.
pub struct RateLimiter {
    max: u32,
    window: Duration,
    peers: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            peers: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, peer: IpAddr) -> Result<(), ServerError> {
        self.check_at(peer, Instant::now())
    }

    pub fn check_at(&self, peer: IpAddr, now: Instant) -> Result<(), ServerError> {
        let mut peers = self
            .peers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if peers.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            peers.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = peers.entry(peer).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max {
            tracing::debug!(%peer, "rate limit hit");
            return Err(ServerError::TooManyRequests);
        }
        entry.count += 1;
        Ok(())
    }
}
