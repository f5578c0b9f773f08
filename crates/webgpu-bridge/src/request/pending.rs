use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{Operation, RequestError, WaitPolicy};

/// One in-flight single-shot request.
///
/// Created together with its [`Completion`]; the completion goes to whoever
/// issues the GPU call, the `PendingRequest` stays with the caller, which
/// blocks in [`wait`](Self::wait) until the completion fires.
///
/// The state moves `Pending -> Completed` (or `Pending -> Abandoned` if the
/// completion is dropped unfired) exactly once. Both transitions happen under
/// the same mutex the waiter checks, so a completion that fires before the
/// caller starts waiting is never missed.
#[derive(Debug)]
pub struct PendingRequest<T> {
    operation: Operation,
    shared: Arc<Shared<T>>,
}

/// Single-use token that finishes a [`PendingRequest`].
///
/// `Send` whenever `T` is, so it may be completed from any thread.
#[derive(Debug)]
pub struct Completion<T> {
    operation: Operation,
    shared: Option<Arc<Shared<T>>>,
}

#[derive(Debug)]
struct Shared<T> {
    state: Mutex<State<T>>,
    finished: Condvar,
}

#[derive(Debug)]
enum State<T> {
    Pending,
    Completed(T),
    Abandoned,
}

impl<T> PendingRequest<T> {
    /// Creates a pending request and the completion that finishes it.
    pub fn new(operation: Operation) -> (Self, Completion<T>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending),
            finished: Condvar::new(),
        });

        let completion = Completion {
            operation,
            shared: Some(Arc::clone(&shared)),
        };
        (Self { operation, shared }, completion)
    }

    /// Creates a pending request and hands its completion to `issue`.
    pub fn issue<F>(operation: Operation, issue: F) -> Self
    where
        F: FnOnce(Completion<T>),
    {
        let (pending, completion) = Self::new(operation);
        log::debug!("issuing {operation}");
        issue(completion);
        pending
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns true once the completion has fired or been dropped.
    pub fn is_finished(&self) -> bool {
        !matches!(*self.shared.lock(), State::Pending)
    }

    /// Blocks until the completion fires and returns its value.
    ///
    /// There is no timeout: a completion that is kept alive but never fired
    /// blocks forever.
    pub fn wait(self) -> Result<T, RequestError> {
        let guard = self.shared.lock();
        let mut state = self
            .shared
            .finished
            .wait_while(guard, |s| matches!(s, State::Pending))
            .unwrap_or_else(PoisonError::into_inner);

        take(&mut state, self.operation)
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T, RequestError> {
        let guard = self.shared.lock();
        let (mut state, _) = self
            .shared
            .finished
            .wait_timeout_while(guard, timeout, |s| matches!(s, State::Pending))
            .unwrap_or_else(PoisonError::into_inner);

        if matches!(*state, State::Pending) {
            log::warn!("{} timed out after {timeout:?}", self.operation);
            return Err(RequestError::TimedOut {
                operation: self.operation,
                after: timeout,
            });
        }
        take(&mut state, self.operation)
    }

    /// Waits according to `policy`.
    pub fn wait_for(self, policy: WaitPolicy) -> Result<T, RequestError> {
        match policy {
            WaitPolicy::Forever => self.wait(),
            WaitPolicy::Timeout(timeout) => self.wait_timeout(timeout),
        }
    }
}

impl<T> Completion<T> {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Records `value` and wakes the waiter.
    pub fn complete(mut self, value: T) {
        if let Some(shared) = self.shared.take() {
            log::debug!("{} completed", self.operation);
            shared.finish(State::Completed(value));
        }
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            log::warn!("{} dropped without completing", self.operation);
            shared.finish(State::Abandoned);
        }
    }
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, outcome: State<T>) {
        {
            let mut state = self.lock();
            if matches!(*state, State::Pending) {
                *state = outcome;
            }
        }
        self.finished.notify_all();
    }
}

/// Moves the result out of a finished state.
fn take<T>(state: &mut State<T>, operation: Operation) -> Result<T, RequestError> {
    match std::mem::replace(state, State::Abandoned) {
        State::Completed(value) => Ok(value),
        State::Abandoned | State::Pending => Err(RequestError::Abandoned { operation }),
    }
}
