//! The pool abstraction: an ordered queue of work units with pluggable storage,
//! producer/consumer access control, and blocked/migration accounting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::{Duration, SystemTime};

use crossbeam_queue::ArrayQueue;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::core::counter::AtomicCounter;
use crate::core::error::SyncError;
use crate::core::ult::{Ult, Unit};

/// Controls which producer/consumer identity checks a pool enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// A single native thread both produces and consumes.
    Private,
    /// A single producer, a single consumer.
    Spsc,
    /// Multiple producers, a single consumer.
    Mpsc,
    /// A single producer, multiple consumers.
    Spmc,
    /// Multiple producers, multiple consumers; neither identity is checked.
    Mpmc,
}

impl AccessMode {
    fn producer_checked(self) -> bool {
        matches!(self, AccessMode::Private | AccessMode::Spsc | AccessMode::Spmc)
    }

    fn consumer_checked(self) -> bool {
        matches!(self, AccessMode::Private | AccessMode::Spsc | AccessMode::Mpsc)
    }
}

/// The pluggable backing capability set: `{push, pop, pop_timedwait, remove, size}`.
/// Modeled as a vtable (`Box<dyn Backing>`) rather than a generic parameter so a
/// `Pool`'s storage strategy is chosen once at construction and doesn't propagate
/// through every type that holds a pool.
pub trait Backing: Send + Sync {
    /// Enqueues `unit`. Must synchronize (release) so a consumer's `pop`
    /// (acquire) observes any state the unit's owner wrote before pushing.
    fn push(&self, unit: Unit) -> Result<(), SyncError>;

    /// Non-blocking dequeue; `None` when empty.
    fn pop(&self) -> Option<Unit>;

    /// Blocks the calling native thread until a unit is available or the
    /// absolute `deadline` elapses.
    fn pop_timedwait(&self, deadline: SystemTime) -> Option<Unit>;

    /// Removes a specific unit if present.
    fn remove(&self, unit: &Unit) -> bool;

    /// Number of units currently queued.
    fn size(&self) -> usize;
}

/// Default backing: a `VecDeque` guarded by a mutex/condvar pair, used for the
/// blocking `pop_timedwait` path without busy-polling. Suited to every access
/// mode since the internal lock serializes all access regardless.
pub struct FifoBacking {
    queue: Mutex<VecDeque<Unit>>,
    not_empty: Condvar,
}

impl FifoBacking {
    /// Creates an empty FIFO backing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }
}

impl Default for FifoBacking {
    fn default() -> Self {
        Self::new()
    }
}

impl Backing for FifoBacking {
    fn push(&self, unit: Unit) -> Result<(), SyncError> {
        let mut queue = self.queue.lock();
        queue.push_back(unit);
        self.not_empty.notify_one();
        Ok(())
    }

    fn pop(&self) -> Option<Unit> {
        self.queue.lock().pop_front()
    }

    fn pop_timedwait(&self, deadline: SystemTime) -> Option<Unit> {
        let mut queue = self.queue.lock();
        loop {
            if let Some(unit) = queue.pop_front() {
                return Some(unit);
            }
            let now = SystemTime::now();
            if now >= deadline {
                return None;
            }
            let timeout = deadline.duration_since(now).unwrap_or(Duration::ZERO);
            let result = self.not_empty.wait_for(&mut queue, timeout);
            if result.timed_out() && queue.is_empty() {
                return None;
            }
        }
    }

    fn remove(&self, unit: &Unit) -> bool {
        let mut queue = self.queue.lock();
        if let Some(pos) = queue.iter().position(|u| Arc::ptr_eq(u, unit)) {
            queue.remove(pos);
            true
        } else {
            false
        }
    }

    fn size(&self) -> usize {
        self.queue.lock().len()
    }
}

/// A fixed-capacity lock-free backing built on `crossbeam_queue::ArrayQueue`,
/// for MPMC workloads that want to avoid blocking producers behind a mutex.
/// `pop_timedwait` has no native blocking primitive to fall back to, so it
/// polls with a short sleep between attempts.
pub struct ArrayQueueBacking {
    queue: ArrayQueue<Unit>,
    len: AtomicCounter,
}

impl ArrayQueueBacking {
    /// Creates an empty backing with room for `capacity` units.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            len: AtomicCounter::new(0),
        }
    }
}

impl Backing for ArrayQueueBacking {
    fn push(&self, unit: Unit) -> Result<(), SyncError> {
        self.queue.push(unit).map_err(|_| SyncError::Mem)?;
        self.len.increment();
        Ok(())
    }

    fn pop(&self) -> Option<Unit> {
        let popped = self.queue.pop();
        if popped.is_some() {
            self.len.decrement();
        }
        popped
    }

    fn pop_timedwait(&self, deadline: SystemTime) -> Option<Unit> {
        const POLL_INTERVAL: Duration = Duration::from_micros(200);
        loop {
            if let Some(unit) = self.pop() {
                return Some(unit);
            }
            if SystemTime::now() >= deadline {
                return None;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn remove(&self, unit: &Unit) -> bool {
        // ArrayQueue has no random-access removal; drain into a side buffer,
        // re-insert everything but the target. O(n), acceptable given this
        // backing's intended use (remove is rare relative to push/pop).
        let mut carried = Vec::new();
        let mut found = false;
        while let Some(candidate) = self.queue.pop() {
            self.len.decrement();
            if !found && Arc::ptr_eq(&candidate, unit) {
                found = true;
                continue;
            }
            carried.push(candidate);
        }
        for item in carried {
            let reinserted = self.push(item).is_ok();
            debug_assert!(
                reinserted,
                "lost a unit re-inserting into ArrayQueueBacking during remove"
            );
        }
        found
    }

    fn size(&self) -> usize {
        self.len.load_relaxed().max(0) as usize
    }
}

/// An ordered queue of runnable work units with pluggable storage, producer/
/// consumer access control, and blocked/migration accounting.
pub struct Pool {
    backing: Box<dyn Backing>,
    access_mode: AccessMode,
    num_blocked: AtomicCounter,
    num_migrations: AtomicCounter,
    num_scheds: AtomicCounter,
    producer_id: Mutex<Option<ThreadId>>,
    consumer_id: Mutex<Option<ThreadId>>,
    torn_down: AtomicBool,
}

impl Pool {
    /// Creates a pool with the given backing and access mode.
    #[must_use]
    pub fn new(backing: Box<dyn Backing>, access_mode: AccessMode) -> Arc<Self> {
        Arc::new(Self {
            backing,
            access_mode,
            num_blocked: AtomicCounter::new(0),
            num_migrations: AtomicCounter::new(0),
            num_scheds: AtomicCounter::new(0),
            producer_id: Mutex::new(None),
            consumer_id: Mutex::new(None),
            torn_down: AtomicBool::new(false),
        })
    }

    /// The access mode this pool was created with.
    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    fn check_producer(&self, producer_id: Option<ThreadId>) -> Result<(), SyncError> {
        if !self.access_mode.producer_checked() {
            return Ok(());
        }
        let Some(id) = producer_id else {
            return Ok(());
        };
        let mut recorded = self.producer_id.lock();
        match *recorded {
            None => {
                *recorded = Some(id);
                Ok(())
            }
            Some(existing) if existing == id => Ok(()),
            Some(_) => Err(SyncError::InvPoolAccess),
        }
    }

    fn check_consumer(&self, consumer_id: Option<ThreadId>) -> Result<(), SyncError> {
        if !self.access_mode.consumer_checked() {
            return Ok(());
        }
        let Some(id) = consumer_id else {
            return Ok(());
        };
        let mut recorded = self.consumer_id.lock();
        match *recorded {
            None => {
                *recorded = Some(id);
                Ok(())
            }
            Some(existing) if existing == id => Ok(()),
            Some(_) => Err(SyncError::InvPoolAccess),
        }
    }

    /// Enqueues `unit`. When producer checking is enabled for this pool's
    /// access mode, validates `producer_id` against the previously recorded
    /// producer first; on failure the backing is not mutated. There is no
    /// check that the unit is not already queued — callers must uphold that.
    pub fn push(&self, unit: Unit, producer_id: Option<ThreadId>) -> Result<(), SyncError> {
        self.check_producer(producer_id)?;
        self.backing.push(unit)
    }

    /// Sets `ult.state = READY` then pushes it into this pool. The relaxed
    /// state store is correct because `push` issues a release so a consumer
    /// popping the unit observes READY.
    pub fn add_thread(&self, ult: &Unit, producer_id: Option<ThreadId>) -> Result<(), SyncError> {
        ult.mark_ready_relaxed();
        trace!(ult = ult.id(), "add_thread: pushing ULT into pool");
        self.push(Arc::clone(ult), producer_id)
    }

    /// Non-blocking dequeue; `None` when empty.
    #[must_use]
    pub fn pop(&self) -> Option<Unit> {
        self.backing.pop()
    }

    /// Blocks the caller's native thread until a unit is available or the
    /// absolute `deadline` (seconds since the Unix epoch) elapses.
    #[must_use]
    pub fn pop_timedwait(&self, deadline: SystemTime) -> Option<Unit> {
        self.backing.pop_timedwait(deadline)
    }

    /// Removes a specific unit. Returns `Err(SyncError::NotFound)` if absent.
    pub fn remove(&self, unit: &Unit, consumer_id: Option<ThreadId>) -> Result<(), SyncError> {
        self.check_consumer(consumer_id)?;
        if self.backing.remove(unit) {
            Ok(())
        } else {
            Err(SyncError::NotFound)
        }
    }

    /// Backing's queued count only.
    #[must_use]
    pub fn size(&self) -> usize {
        self.backing.size()
    }

    /// `size() + num_blocked + num_migrations`, each loaded with acquire
    /// semantics. The sum is not atomic across the three loads; callers must
    /// treat it as an approximation consistent with some recent interleaving.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.size()
            + self.num_blocked.load_acquire().max(0) as usize
            + self.num_migrations.load_acquire().max(0) as usize
    }

    /// Atomic increment of `num_scheds`, called by a scheduler acquiring this
    /// pool.
    pub fn retain(&self) {
        self.num_scheds.increment();
    }

    /// Atomic decrement of `num_scheds`, returning the new value.
    ///
    /// # Panics
    ///
    /// Panics if `num_scheds` was already zero; an unmatched `release` is a
    /// programmer error.
    pub fn release(&self) -> i32 {
        assert!(
            self.num_scheds.load_acquire() > 0,
            "pool release with num_scheds already zero"
        );
        self.num_scheds.decrement()
    }

    /// Current scheduler retention count.
    #[must_use]
    pub fn num_scheds(&self) -> i32 {
        self.num_scheds.load_acquire()
    }

    /// Called by the synchronization layer when a ULT bound to this pool
    /// transitions to BLOCKED.
    pub fn inc_num_blocked(&self) {
        self.num_blocked.increment();
    }

    /// Called by the synchronization layer when a ULT bound to this pool
    /// transitions out of BLOCKED.
    pub fn dec_num_blocked(&self) {
        self.num_blocked.decrement();
    }

    /// Current count of ULTs owned-but-not-queued because they are BLOCKED.
    #[must_use]
    pub fn num_blocked(&self) -> i32 {
        self.num_blocked.load_acquire()
    }

    /// Brackets the start of an in-flight migration toward this pool so
    /// `total_size` does not transiently undercount.
    pub fn inc_num_migrations(&self) {
        self.num_migrations.increment();
    }

    /// Brackets the end of an in-flight migration.
    pub fn dec_num_migrations(&self) {
        self.num_migrations.decrement();
    }

    /// Current count of ULTs in flight toward this pool via migration.
    #[must_use]
    pub fn num_migrations(&self) -> i32 {
        self.num_migrations.load_acquire()
    }

    /// Debug-time liveness check: a pool is eligible for teardown once
    /// `num_scheds == 0 ∧ total_size == 0`. Rust's ownership model reclaims
    /// the pool automatically when its last `Arc` drops; this exists only to
    /// let callers assert the original spec's teardown precondition still
    /// held at the point they intended to stop using the pool.
    pub fn assert_teardown_ready(&self) {
        assert!(
            self.num_scheds() == 0 && self.total_size() == 0,
            "pool torn down with outstanding schedulers or queued/blocked/migrating units"
        );
        self.torn_down.store(true, Ordering::Relaxed);
    }
}

// `Ult` needs a small private hook so `Pool::add_thread` can set state
// without exposing a public "force READY" method on `Ult` itself.
impl Ult {
    pub(crate) fn mark_ready_relaxed(&self) {
        self.set_state_relaxed(crate::core::ult::UltState::Ready);
    }
}
