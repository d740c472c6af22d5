//! Generate-once gate.
//!
//! Each artifact owns one [`GenerationGate`]. The first caller to reach it
//! runs the generator; concurrent callers block on a condition variable until
//! the value is ready and then share it. If the generator panics the gate
//! falls back to [`Phase::Pending`] and the next waiter takes over.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, OnceLock, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Generating,
    Ready,
}

pub struct GenerationGate<T> {
    phase: Mutex<Phase>,
    ready: Condvar,
    value: OnceLock<T>,
    done: AtomicBool,
}

impl<T> GenerationGate<T> {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Pending),
            ready: Condvar::new(),
            value: OnceLock::new(),
            done: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> Phase {
        *self.lock()
    }

    /// Non-blocking readiness check.
    pub fn is_ready(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// The value, if generation has completed.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Return the value, running `generate` if nobody has produced it yet.
    ///
    /// Blocks while another thread is generating.
    pub fn get_or_generate<F>(&self, generate: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.value.get() {
            return value;
        }

        {
            let mut phase = self.lock();
            loop {
                match *phase {
                    Phase::Generating => {
                        phase = self
                            .ready
                            .wait(phase)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                    Phase::Ready => {
                        if let Some(value) = self.value.get() {
                            return value;
                        }
                        break;
                    }
                    Phase::Pending => break,
                }
            }
            *phase = Phase::Generating;
        }

        let reset = ResetOnUnwind { gate: self };
        let value = self.value.get_or_init(generate);
        std::mem::forget(reset);

        *self.lock() = Phase::Ready;
        self.done.store(true, Ordering::Release);
        self.ready.notify_all();
        value
    }
}

impl<T> Default for GenerationGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct ResetOnUnwind<'a, T> {
    gate: &'a GenerationGate<T>,
}

impl<T> Drop for ResetOnUnwind<'_, T> {
    fn drop(&mut self) {
        *self.gate.lock() = Phase::Pending;
        self.gate.ready.notify_all();
    }
}
