//! Per-sticker cut path ownership with stale-result rejection.
//!
//! Every trace request takes a ticket carrying a monotonically increasing
//! generation. A finished trace may only install its result if its ticket
//! is still the newest one issued for that sticker, so a slow, superseded
//! trace can never overwrite the result of a later request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::path::CutPath;

/// Proof of a trace request, redeemed when the result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TraceTicket {
    generation: u64,
}

impl TraceTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds at most one cut path for one sticker.
#[derive(Debug, Default)]
pub struct CutPathSlot {
    latest: AtomicU64,
    current: Mutex<Option<Arc<CutPath>>>,
}

impl CutPathSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new trace request, superseding all earlier tickets.
    pub fn request(&self) -> TraceTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        TraceTicket { generation }
    }

    /// Whether `ticket` is still the newest request.
    pub fn is_current(&self, ticket: TraceTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }

    /// Install the result of the trace behind `ticket`.
    ///
    /// `None` records that the trace found no silhouette. Returns `false`
    /// (and changes nothing) when a newer request has been issued.
    pub fn apply(&self, ticket: TraceTicket, cut: Option<CutPath>) -> bool {
        let mut current = self.lock();
        // Checked under the lock so a concurrent `clear` cannot interleave.
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.latest.load(Ordering::SeqCst),
                "discarding stale trace result"
            );
            return false;
        }
        *current = cut.map(Arc::new);
        true
    }

    /// The installed cut path, if any.
    pub fn current(&self) -> Option<Arc<CutPath>> {
        self.lock().clone()
    }

    /// Drop the cut path and invalidate in-flight requests, e.g. when the
    /// sticker's image is replaced or the sticker is deleted.
    pub fn clear(&self) {
        let mut current = self.lock();
        self.latest.fetch_add(1, Ordering::SeqCst);
        *current = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<CutPath>>> {
        // The guarded value is replaced wholesale, so a poisoned lock
        // never holds a half-written path.
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::emit;
    use kurbo::{Affine, Point};
    use std::thread;

    fn cut(size: f64) -> CutPath {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
        ];
        emit(pts.as_slice(), Affine::IDENTITY)
    }

    #[test]
    fn latest_request_wins_regardless_of_completion_order() {
        let slot = CutPathSlot::new();
        let first = slot.request();
        let second = slot.request();

        assert!(slot.apply(second, Some(cut(2.0))));
        // The first trace finishes last but is stale.
        assert!(!slot.apply(first, Some(cut(1.0))));
        assert_eq!(slot.current().as_deref(), Some(&cut(2.0)));
    }

    #[test]
    fn stale_result_before_newer_one_is_discarded() {
        let slot = CutPathSlot::new();
        let first = slot.request();
        let second = slot.request();

        assert!(!slot.apply(first, Some(cut(1.0))));
        assert!(slot.current().is_none());
        assert!(slot.apply(second, Some(cut(2.0))));
        assert_eq!(slot.current().as_deref(), Some(&cut(2.0)));
    }

    #[test]
    fn retrace_replaces_wholesale() {
        let slot = CutPathSlot::new();
        let t = slot.request();
        assert!(slot.apply(t, Some(cut(1.0))));
        let t = slot.request();
        assert!(slot.apply(t, None));
        assert!(slot.current().is_none());
    }

    #[test]
    fn clear_invalidates_in_flight_tickets() {
        let slot = CutPathSlot::new();
        let t = slot.request();
        slot.clear();
        assert!(!slot.is_current(t));
        assert!(!slot.apply(t, Some(cut(1.0))));
        assert!(slot.current().is_none());
    }

    #[test]
    fn concurrent_applies_keep_newest() {
        let slot = CutPathSlot::new();
        let tickets: Vec<TraceTicket> = (0..16).map(|_| slot.request()).collect();
        let newest = *tickets.last().unwrap();

        thread::scope(|s| {
            for (i, &ticket) in tickets.iter().enumerate() {
                let slot = &slot;
                s.spawn(move || slot.apply(ticket, Some(cut(i as f64 + 1.0))));
            }
        });

        assert_eq!(newest.generation(), 16);
        assert_eq!(slot.current().as_deref(), Some(&cut(16.0)));
    }
}
