//! Duplicate suppression across calls.
//!
//! The engine is stateless. A station that hears the same packet from
//! several neighbours keeps a [`DuplicateFilter`] next to it and drops
//! repeats before routing.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use packet::Packet;

/// Window used by most digipeaters.
pub const DEFAULT_DEDUPE_WINDOW: Duration = Duration::from_secs(30);

/// Remembers packet fingerprints for a sliding time window.
///
/// The fingerprint covers source, destination and payload. The path is left
/// out because every digipeater on the way rewrites it.
///
/// Time is supplied by the caller as a monotonic offset, so the filter works
/// the same under a test clock as under `Instant`.
#[derive(Debug, Clone)]
pub struct DuplicateFilter {
    window: Duration,
    seen: HashMap<u64, Duration>,
}

impl DuplicateFilter {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Records `packet` at `now`. Returns `false` if it is a duplicate of a
    /// packet recorded within the window.
    ///
    /// A duplicate does not refresh the original's timestamp, so a packet
    /// repeated continuously is let through once per window.
    pub fn check(&mut self, packet: &Packet, now: Duration) -> bool {
        let window = self.window;
        self.seen.retain(|_, seen_at| now.saturating_sub(*seen_at) < window);

        let key = fingerprint(packet);
        if let Some(seen_at) = self.seen.get(&key) {
            let age = now.saturating_sub(*seen_at);
            tracing::debug!(source = %packet.source, ?age, "duplicate packet");
            return false;
        }
        self.seen.insert(key, now);
        true
    }

    /// Number of fingerprints currently remembered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl Default for DuplicateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUPE_WINDOW)
    }
}

fn fingerprint(packet: &Packet) -> u64 {
    let mut hasher = DefaultHasher::new();
    packet.source.hash(&mut hasher);
    packet.destination.hash(&mut hasher);
    packet.payload.hash(&mut hasher);
    hasher.finish()
}
