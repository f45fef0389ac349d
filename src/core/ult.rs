//! ULT (user-level thread) descriptor and scheduling state.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Condvar as WakeCondvar, Mutex as WakeMutex};

use crate::core::error::SyncError;
use crate::core::pool::Pool;

static NEXT_ULT_ID: AtomicU64 = AtomicU64::new(1);

/// Scheduling state of a ULT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UltState {
    /// Queued in a pool, eligible to be popped by a scheduler.
    Ready = 0,
    /// Popped from a pool and currently executing on an execution stream.
    Running = 1,
    /// Absent from every pool, accounted in its home pool's `num_blocked`.
    Blocked = 2,
    /// Finished; will never run again.
    Terminated = 3,
}

impl From<u8> for UltState {
    fn from(v: u8) -> Self {
        match v {
            0 => UltState::Ready,
            1 => UltState::Running,
            2 => UltState::Blocked,
            _ => UltState::Terminated,
        }
    }
}

/// A user-level thread descriptor.
///
/// Holds a non-owning ([`Weak`]) back-reference to the pool it returns to when
/// readied, per the invariant that a ULT's lifetime must not keep a pool alive.
/// Suspension/resumption here is realized by parking the calling native thread
/// on an internal wake primitive; a real cooperative scheduler would replace
/// this with a stack switch back to its run loop, but the pool/condvar
/// accounting this exercises (BLOCKED/READY transitions, `num_blocked`,
/// re-push) is identical either way.
pub struct Ult {
    id: u64,
    state: AtomicU8,
    pool: Weak<Pool>,
    woken: WakeMutex<bool>,
    wake_cv: WakeCondvar,
}

/// The handle used to place a ULT into a pool. The pool never dereferences it,
/// only passes it to the backing store's operations.
pub type Unit = Arc<Ult>;

impl Ult {
    /// Creates a new ULT descriptor bound to `pool`, in the READY state.
    #[must_use]
    pub fn new(pool: &Arc<Pool>) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_ULT_ID.fetch_add(1, Ordering::Relaxed),
            state: AtomicU8::new(UltState::Ready as u8),
            pool: Arc::downgrade(pool),
            woken: WakeMutex::new(false),
            wake_cv: WakeCondvar::new(),
        })
    }

    /// This ULT's identity, stable for its lifetime.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current scheduling state.
    #[must_use]
    pub fn state(&self) -> UltState {
        UltState::from(self.state.load(Ordering::Relaxed))
    }

    /// The pool this ULT returns to when readied, if it still exists.
    #[must_use]
    pub fn pool(&self) -> Option<Arc<Pool>> {
        self.pool.upgrade()
    }

    /// RUNNING → BLOCKED: stores BLOCKED and increments the home pool's
    /// `num_blocked`.
    pub fn set_blocked(&self) {
        self.state.store(UltState::Blocked as u8, Ordering::Relaxed);
        if let Some(pool) = self.pool() {
            pool.inc_num_blocked();
        }
    }

    /// BLOCKED → READY: decrements the home pool's `num_blocked`, then stores
    /// READY and pushes this ULT back into its home pool via
    /// [`Pool::add_thread`].
    ///
    /// # Panics
    ///
    /// Panics if the home pool has already been dropped; a ULT is not
    /// expected to outlive the pool it belongs to.
    pub fn set_ready(self: &Arc<Self>) -> Result<(), SyncError> {
        let pool = self.pool().expect("ULT outlived its pool");
        pool.dec_num_blocked();
        pool.add_thread(self, None)
    }

    /// Suspends the calling native thread until [`Ult::wake`] is called.
    /// This is the suspension point a real scheduler's cooperative yield
    /// would implement with a stack switch instead.
    pub fn suspend(&self) {
        let mut woken = self.woken.lock();
        while !*woken {
            self.wake_cv.wait(&mut woken);
        }
        *woken = false;
    }

    /// Wakes a native thread parked in [`Ult::suspend`].
    pub(crate) fn wake(&self) {
        let mut woken = self.woken.lock();
        *woken = true;
        self.wake_cv.notify_one();
    }
}

impl std::fmt::Debug for Ult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ult")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

thread_local! {
    static CURRENT_ULT: RefCell<Option<Arc<Ult>>> = const { RefCell::new(None) };
}

/// Returns the ULT the calling native thread is currently running as, if any.
///
/// This is the "runtime-local context" consumed, not defined, by this core: a
/// real scheduler would populate [`with_current_ult`] around each context
/// switch into a ULT.
#[must_use]
pub fn current_ult() -> Option<Arc<Ult>> {
    CURRENT_ULT.with(|c| c.borrow().clone())
}

/// Installs `ult` as the current native thread's ULT for the duration of `f`.
pub fn with_current_ult<R>(ult: Arc<Ult>, f: impl FnOnce() -> R) -> R {
    CURRENT_ULT.with(|c| *c.borrow_mut() = Some(ult));
    let result = f();
    CURRENT_ULT.with(|c| *c.borrow_mut() = None);
    result
}
