//! Cooperative timed-job scheduler
//!
//! Every simulation update runs as a job counted down in logical ticks: the
//! gun update, each ball's motion or explosion, each target's idle tick, the
//! arena's victory watcher and the delayed round restart. The arena owns one
//! `Scheduler` and drains the due jobs each tick; cancellation is synchronous
//! and immediate (single-threaded, no race window).

use std::collections::BTreeMap;

/// What a due job should run, with the owning entity id where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    GunUpdate,
    TargetIdle(u64),
    BallMotion(u64),
    BallExplosion(u64),
    VictoryWatch,
    Restart,
}

impl JobKind {
    /// Dispatch order within one tick: gun, then target idles, then balls by
    /// entity id, then the arena's own jobs. Insertion order never matters.
    fn priority(&self) -> (u8, u64) {
        match *self {
            JobKind::GunUpdate => (0, 0),
            JobKind::TargetIdle(id) => (1, id),
            JobKind::BallMotion(id) => (2, id),
            JobKind::BallExplosion(id) => (2, id),
            JobKind::VictoryWatch => (3, 0),
            JobKind::Restart => (4, 0),
        }
    }
}

/// Opaque handle to a scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JobId(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticks_left: u32,
    kind: JobKind,
}

/// Fixed-tick registry of pending jobs.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: BTreeMap<u64, Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job to fire after `after_ticks` ticks (minimum one).
    pub fn schedule(&mut self, after_ticks: u32, kind: JobKind) -> JobId {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.insert(
            id,
            Pending {
                ticks_left: after_ticks.max(1),
                kind,
            },
        );
        JobId(id)
    }

    /// Cancel a pending job. Cancelling an unknown or already-fired id is a
    /// no-op, never an error.
    pub fn cancel(&mut self, id: JobId) {
        self.pending.remove(&id.0);
    }

    /// Whether a job is still waiting to fire.
    pub fn is_pending(&self, id: JobId) -> bool {
        self.pending.contains_key(&id.0)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Advance one tick and return the jobs that fired, in dispatch order.
    pub fn take_due(&mut self) -> Vec<(JobId, JobKind)> {
        let mut due = Vec::new();
        self.pending.retain(|&id, p| {
            p.ticks_left -= 1;
            if p.ticks_left == 0 {
                due.push((JobId(id), p.kind));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(id, kind)| {
            let (class, entity) = kind.priority();
            (class, entity, id)
        });
        due
    }
}

/// When restoring jobs from a snapshot, whether "was active" jobs come back
/// running or suspended (supports "load but stay paused until resumed").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    Active,
    Paused,
}

/// Lifecycle handle for one deferred update.
///
/// This tri-state is the unit every entity composes to implement
/// start/stop/play/pause uniformly: `None` is inert, `Active` will fire,
/// `Paused` remembers it was active without being scheduled. Snapshots record
/// a slot as a single boolean - "was active" - which is true for both the
/// `Active` and `Paused` states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobSlot {
    #[default]
    None,
    Paused,
    Active(JobId),
}

impl JobSlot {
    /// Arm from `None` or `Paused`; an already-active slot is left alone.
    pub fn start(&mut self, sched: &mut Scheduler, after_ticks: u32, kind: JobKind) {
        if matches!(self, JobSlot::None | JobSlot::Paused) {
            *self = JobSlot::Active(sched.schedule(after_ticks, kind));
        }
    }

    /// Resume a paused slot, re-arming with a fresh one-tick delay.
    pub fn play(&mut self, sched: &mut Scheduler, kind: JobKind) {
        self.play_after(sched, 1, kind);
    }

    /// Resume a paused slot with an explicit delay (the delayed restart job
    /// re-arms with its full display duration rather than one tick).
    pub fn play_after(&mut self, sched: &mut Scheduler, after_ticks: u32, kind: JobKind) {
        if *self == JobSlot::Paused {
            *self = JobSlot::Active(sched.schedule(after_ticks, kind));
        }
    }

    /// Cancel and forget. Safe in any state.
    pub fn stop(&mut self, sched: &mut Scheduler) {
        if let JobSlot::Active(id) = *self {
            sched.cancel(id);
        }
        *self = JobSlot::None;
    }

    /// Suspend an active slot, guaranteeing the underlying timer is cancelled.
    /// No-op for `None` and `Paused`.
    pub fn pause(&mut self, sched: &mut Scheduler) {
        if let JobSlot::Active(id) = *self {
            sched.cancel(id);
            *self = JobSlot::Paused;
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobSlot::Active(_))
    }

    pub fn is_paused(&self) -> bool {
        *self == JobSlot::Paused
    }

    /// What a snapshot records: a paused job still counts as active because
    /// it will fire again after resume.
    pub fn was_active(&self) -> bool {
        *self != JobSlot::None
    }

    /// Rebuild a slot from a snapshot boolean under the given job mode.
    pub fn restore(
        active: bool,
        mode: JobMode,
        sched: &mut Scheduler,
        after_ticks: u32,
        kind: JobKind,
    ) -> Self {
        match (active, mode) {
            (false, _) => JobSlot::None,
            (true, JobMode::Paused) => JobSlot::Paused,
            (true, JobMode::Active) => JobSlot::Active(sched.schedule(after_ticks, kind)),
        }
    }
}
