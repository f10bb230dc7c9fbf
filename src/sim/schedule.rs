//! Deferred effect continuations
//!
//! Effects never hold timers of their own. One-shot continuations are queued
//! here against the simulation clock, and progress-driven effects are small
//! state machines stepped from inside the tick. Everything refers to
//! particles by id and is dropped if the caster is gone when it comes due.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec2;

use super::particle::ParticleId;

/// Simulation time in milliseconds; only advances while unpaused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub now_ms: u64,
}

impl Clock {
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

/// A one-shot continuation of an effect
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    ClearShield { caster: ParticleId },
    CollapseBlackHole { caster: ParticleId },
    ClearVortex { caster: ParticleId },
    ChainBurst { caster: ParticleId, origin: Vec2, depth: u32 },
    ClearChain { caster: ParticleId },
    ClearFractal { caster: ParticleId },
    ResolveTimeWarp { caster: ParticleId },
    Disentangle { a: ParticleId, b: ParticleId },
}

#[derive(Debug)]
struct Entry {
    due_ms: u64,
    seq: u64,
    task: Deferred,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap pops the earliest (due, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of one-shot tasks, fired in (due time, insertion) order
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run once the clock reaches `due_ms`
    pub fn schedule(&mut self, due_ms: u64, task: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry { due_ms, seq, task });
    }

    /// Pop the next task due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Deferred> {
        if self.queue.peek().is_some_and(|e| e.due_ms <= now_ms) {
            self.queue.pop().map(|e| e.task)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Progress-driven effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Pentagram,
    Supernova,
    Atom,
}

/// A running progress effect: stepped every `CHANNEL_STEP_MS` until done
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub kind: ChannelKind,
    pub caster: ParticleId,
    /// Steps taken so far
    pub steps: u32,
    pub next_step_ms: u64,
}

impl Channel {
    pub fn new(kind: ChannelKind, caster: ParticleId, first_step_ms: u64) -> Self {
        Self {
            kind,
            caster,
            steps: 0,
            next_step_ms: first_step_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_due_then_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(300, Deferred::ClearShield { caster: 3 });
        s.schedule(100, Deferred::ClearShield { caster: 1 });
        s.schedule(100, Deferred::ClearShield { caster: 2 });

        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(100), Some(Deferred::ClearShield { caster: 1 }));
        assert_eq!(s.pop_due(100), Some(Deferred::ClearShield { caster: 2 }));
        assert_eq!(s.pop_due(299), None);
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(1000), Some(Deferred::ClearShield { caster: 3 }));
        assert!(s.is_empty());
    }

    #[test]
    fn test_clock_advances() {
        let mut clock = Clock::default();
        clock.advance(16);
        clock.advance(16);
        assert_eq!(clock.now_ms, 32);
    }
}
