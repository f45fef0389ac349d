//! Condition variable binding ULTs and external native threads into one FIFO
//! waiter queue.
//!
//! Unlike [`crate::rwlock::RwLock`] or [`crate::once::Once`], this type is not
//! a thin `parking_lot` re-export: the pool/condvar core requires a condition
//! variable that can wake a ULT by re-pushing it into its home pool *and* wake
//! a plain native thread by flipping a polled flag, both through the same
//! FIFO order. `parking_lot::Condvar` only knows about native threads, so the
//! waiter queue here is hand-rolled, using this crate's own [`Mutex`] for its
//! internal lock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::core::error::SyncError;
use crate::core::ult::{current_ult, Ult};
use crate::mutex::{Mutex, MutexGuard};

#[derive(Clone)]
enum Waiter {
    /// A cooperatively scheduled ULT, blocked and accounted in its home pool.
    Ult(Arc<Ult>),
    /// A plain native thread, spinning on a shared flag.
    External(Arc<AtomicBool>),
}

impl Waiter {
    /// Makes this waiter eligible to run again: re-pushes a ULT into its home
    /// pool, or flips an external thread's flag.
    fn wake(self) {
        match self {
            Waiter::Ult(ult) => {
                // `set_ready` decrements `num_blocked` and re-pushes the unit;
                // `wake` resumes the native thread standing in for this ULT's
                // suspended execution (see `core::ult` for why both are needed
                // absent a real stackful scheduler).
                ult.set_ready().expect("ULT outlived its pool while waiting");
                ult.wake();
            }
            Waiter::External(flag) => {
                flag.store(true, Ordering::Release);
            }
        }
    }
}

#[derive(Default)]
struct State {
    /// Identity of the external mutex all current waiters agreed on.
    waiter_mutex: Option<usize>,
    waiters: VecDeque<Waiter>,
}

/// A FIFO condition variable that can hold both ULTs and native threads in
/// its waiter queue, bound to a single external mutex for as long as any
/// waiter is queued.
pub struct Condvar {
    state: Mutex<State>,
}

impl Default for Condvar {
    fn default() -> Self {
        Self::new()
    }
}

impl Condvar {
    /// Creates an empty condition variable, bound to no mutex.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Number of waiters currently queued.
    #[must_use]
    pub fn num_waiters(&self) -> usize {
        self.state.spinlock().waiters.len()
    }

    /// Blocks the caller until woken by [`Condvar::signal`] or
    /// [`Condvar::broadcast`], or returns `Err(SyncError::InvMutex)` if
    /// `mutex` differs from whichever mutex earlier waiters are bound to.
    ///
    /// `guard` is unlocked for the duration of the wait and re-locked before
    /// this returns, exactly like [`parking_lot::Condvar::wait`]; on the
    /// `InvMutex` error path the guard is left locked and untouched.
    ///
    /// If the calling native thread is currently running as a ULT (per
    /// [`current_ult`]), it is marked BLOCKED and accounted in its home
    /// pool's `num_blocked` until woken. Otherwise the caller busy-polls a
    /// flag on its own stack frame — the "external thread" path.
    ///
    /// # Errors
    ///
    /// `SyncError::InvMutex` if a waiter already queued on this condvar used
    /// a different mutex.
    pub fn wait<T>(&self, mutex: &Mutex<T>, guard: &mut MutexGuard<'_, T>) -> Result<(), SyncError> {
        let ult = current_ult();
        let waiter = match &ult {
            Some(u) => Waiter::Ult(Arc::clone(u)),
            None => Waiter::External(Arc::new(AtomicBool::new(false))),
        };

        {
            let mut state = self.state.spinlock();
            match state.waiter_mutex {
                None => state.waiter_mutex = Some(mutex.id()),
                Some(id) if id == mutex.id() => {}
                Some(_) => return Err(SyncError::InvMutex),
            }
            state.waiters.push_back(waiter.clone());
            if let Some(u) = &ult {
                u.set_blocked();
            }
            trace!(waiters = state.waiters.len(), "cond_wait: enqueued");
            // `state` (cond.mutex) is released here, before the user mutex,
            // per the spec's step 5 ordering.
        }

        parking_lot::MutexGuard::unlocked(guard, || match waiter {
            Waiter::Ult(u) => u.suspend(),
            Waiter::External(flag) => {
                while !flag.load(Ordering::Acquire) {
                    std::hint::spin_loop();
                }
            }
        });
        Ok(())
    }

    /// Wakes the single longest-waiting waiter, if any. A no-op if the queue
    /// is empty.
    pub fn signal(&self) {
        let mut state = self.state.spinlock();
        let Some(waiter) = state.waiters.pop_front() else {
            return;
        };
        if state.waiters.is_empty() {
            state.waiter_mutex = None;
        }
        drop(state);
        trace!("cond_signal: waking one waiter");
        waiter.wake();
    }

    /// Wakes every queued waiter, in FIFO order, and clears the queue.
    pub fn broadcast(&self) {
        let mut state = self.state.spinlock();
        let waiters = std::mem::take(&mut state.waiters);
        state.waiter_mutex = None;
        drop(state);
        trace!(count = waiters.len(), "cond_broadcast: waking all waiters");
        for waiter in waiters {
            waiter.wake();
        }
    }
}

impl Drop for Condvar {
    fn drop(&mut self) {
        debug_assert!(
            self.state.spinlock().waiters.is_empty(),
            "Condvar dropped with waiters still queued"
        );
    }
}

impl std::fmt::Debug for Condvar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condvar")
            .field("num_waiters", &self.num_waiters())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pool::{AccessMode, FifoBacking, Pool};
    use crate::core::ult::with_current_ult;
    use std::thread;
    use std::time::Duration;

    /// Scenario 1 in §8: basic signal between two native threads.
    #[test]
    fn basic_signal_wakes_single_waiter() {
        let mutex = Arc::new(Mutex::new(false));
        let cond = Arc::new(Condvar::new());

        let (m2, c2) = (Arc::clone(&mutex), Arc::clone(&cond));
        let waiter = thread::spawn(move || {
            let mut guard = m2.lock();
            while !*guard {
                c2.wait(&m2, &mut guard).unwrap();
            }
            *guard
        });

        thread::sleep(Duration::from_millis(20));
        {
            let mut guard = mutex.lock();
            *guard = true;
            cond.signal();
        }

        assert!(waiter.join().unwrap());
        assert_eq!(cond.num_waiters(), 0);
    }

    /// Scenario 2 in §8: broadcast wakes every queued waiter.
    #[test]
    fn broadcast_wakes_all_waiters() {
        let mutex = Arc::new(Mutex::new(false));
        let cond = Arc::new(Condvar::new());
        let mut handles = Vec::new();

        for _ in 0..3 {
            let (m, c) = (Arc::clone(&mutex), Arc::clone(&cond));
            handles.push(thread::spawn(move || {
                let mut guard = m.lock();
                while !*guard {
                    c.wait(&m, &mut guard).unwrap();
                }
            }));
        }

        thread::sleep(Duration::from_millis(30));
        assert_eq!(cond.num_waiters(), 3);
        {
            let mut guard = mutex.lock();
            *guard = true;
            cond.broadcast();
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cond.num_waiters(), 0);
    }

    /// Scenario 4 in §8: a second waiter on a different mutex is rejected and
    /// not enqueued.
    #[test]
    fn mismatched_mutex_is_rejected() {
        let cond = Condvar::new();
        let m1 = Mutex::new(0);
        let m2 = Mutex::new(0);

        thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let mut guard = m1.lock();
                cond.wait(&m1, &mut guard).unwrap();
            });
            thread::sleep(Duration::from_millis(20));
            assert_eq!(cond.num_waiters(), 1);

            let mut guard2 = m2.lock();
            let result = cond.wait(&m2, &mut guard2);
            assert_eq!(result, Err(SyncError::InvMutex));
            assert_eq!(cond.num_waiters(), 1);
            drop(guard2);

            cond.signal();
            handle.join().unwrap();
        });
    }

    /// Scenario 3 in §8: an external thread and a simulated ULT share the
    /// waiter queue; signalling wakes them in FIFO order.
    #[test]
    fn mixed_external_and_ult_waiters_wake_in_fifo_order() {
        let pool = Pool::new(Box::new(FifoBacking::new()), AccessMode::Mpmc);
        let ult = Ult::new(&pool);
        let mutex = Arc::new(Mutex::new(0));
        let cond = Arc::new(Condvar::new());

        // External waiter E queues first.
        let (m_e, c_e) = (Arc::clone(&mutex), Arc::clone(&cond));
        let external = thread::spawn(move || {
            let mut guard = m_e.lock();
            c_e.wait(&m_e, &mut guard).unwrap();
        });
        thread::sleep(Duration::from_millis(20));
        assert_eq!(cond.num_waiters(), 1);

        // ULT waiter B queues second, running "as" the ULT via the
        // thread-local context this core consumes but doesn't populate itself.
        let (m_b, c_b, ult_b) = (Arc::clone(&mutex), Arc::clone(&cond), Arc::clone(&ult));
        let ult_thread = thread::spawn(move || {
            with_current_ult(Arc::clone(&ult_b), || {
                let mut guard = m_b.lock();
                c_b.wait(&m_b, &mut guard).unwrap();
            });
        });
        thread::sleep(Duration::from_millis(20));
        assert_eq!(cond.num_waiters(), 2);
        assert_eq!(ult.state(), crate::core::ult::UltState::Blocked);
        assert_eq!(pool.num_blocked(), 1);

        // Signal wakes E first (FIFO); B remains queued.
        cond.signal();
        external.join().unwrap();
        assert_eq!(cond.num_waiters(), 1);
        assert_eq!(ult.state(), crate::core::ult::UltState::Blocked);

        // Signal again wakes B; the pool regains the re-pushed unit.
        cond.signal();
        ult_thread.join().unwrap();
        assert_eq!(cond.num_waiters(), 0);
        assert_eq!(ult.state(), crate::core::ult::UltState::Ready);
        assert_eq!(pool.num_blocked(), 0);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn producer_consumer_queue() {
        const NUM_ITEMS: usize = 50;
        let queue = Arc::new((Mutex::new(Vec::<usize>::new()), Condvar::new()));

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..NUM_ITEMS {
                    let (lock, cvar) = &*queue;
                    lock.lock().push(i);
                    cvar.signal();
                }
            })
        };

        let (lock, cvar) = &*queue;
        let mut received = Vec::new();
        while received.len() < NUM_ITEMS {
            let mut guard = lock.lock();
            while guard.is_empty() {
                cvar.wait(lock, &mut guard).unwrap();
            }
            while let Some(item) = guard.pop() {
                received.push(item);
            }
        }
        producer.join().unwrap();
        received.sort_unstable();
        assert_eq!(received, (0..NUM_ITEMS).collect::<Vec<_>>());
    }
}
