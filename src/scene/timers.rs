//! Scene-owned delayed actions.
//!
//! Everything the scene defers goes through one `Timers` queue, so teardown
//! revokes all of it with a single `cancel_all`. After that the queue is
//! closed and a late `schedule` is refused rather than queued.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: f64,
    payload: T,
}

#[derive(Debug)]
pub struct Timers<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
    closed: bool,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            closed: false,
        }
    }
}

impl<T> Timers<T> {
    /// Queue `payload` to fire at simulation time `due` (ms). `None` once
    /// the queue is closed.
    pub fn schedule(&mut self, due: f64, payload: T) -> Option<TimerId> {
        if self.closed {
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due, payload });
        Some(id)
    }

    /// Returns whether `id` was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove and return every payload due at or before `now`, earliest
    /// first; equal due times keep scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = pending;
        // Stable: equal due times stay in scheduling order.
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|e| e.payload).collect()
    }

    /// Drop everything pending and refuse further scheduling.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
        self.closed = true;
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
