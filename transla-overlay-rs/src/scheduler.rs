//! Delayed tasks on the event thread.
//!
//! The host drives time: it passes the current clock to
//! [`Scheduler::take_due`] and arms a timer for [`Scheduler::next_deadline`].

use crate::gesture::GestureTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Work deferred to a later turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Deferred long-press for the recognizer on a surface
    LongPress(GestureTarget),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: TimerId,
    due_ms: u64,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, due_ms: u64, task: Task) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(Entry { id, due_ms, task });
        id
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove and return the tasks due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<(TimerId, Task)> {
        let mut due: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.due_ms <= now_ms)
            .copied()
            .collect();
        self.entries.retain(|e| e.due_ms > now_ms);
        due.sort_by_key(|e| (e.due_ms, e.id));
        due.into_iter().map(|e| (e.id, e.task)).collect()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
