use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

/*
Wall-Clock Timers
=================

The host event loop owns time; the scheduler only remembers what is due
when. Tasks are ordered by due time, and tasks due at the same instant fire
in the order they were scheduled:

  schedule(1000ms, Dispose(C4#0))
  schedule( 200ms, ClearPressed("a"))
  schedule(1000ms, Dispose(E4#1))

  pop_due(1000ms) -> ClearPressed("a"), Dispose(C4#0), Dispose(E4#1)

Nothing here blocks or sleeps: the loop asks for due tasks whenever it
wakes up, so a late wake-up simply delivers the tasks late.
*/

struct Entry<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // BinaryHeap is a max-heap; reverse so the earliest entry is on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct Scheduler<T> {
    queue: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queue `task` to become due at wall-clock time `due`.
    pub fn schedule(&mut self, due: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry { due, seq, task });
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        if self.queue.peek()?.due <= now {
            self.queue.pop().map(|entry| entry.task)
        } else {
            None
        }
    }

    /// When the earliest pending task becomes due.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|entry| entry.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
