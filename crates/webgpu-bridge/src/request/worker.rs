use std::thread;

use super::{Completion, Operation};

/// Runs `work` on a fresh named thread and fires `completion` with its result.
///
/// wgpu hands back futures rather than callbacks; driving the future here
/// gives it the callback shape: the completion fires once, on a thread the
/// caller did not create. If the thread cannot be spawned, or `work` panics,
/// the completion is dropped and the request is abandoned.
pub(crate) fn complete_on_worker<T, F>(completion: Completion<T>, work: F)
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let operation: Operation = completion.operation();
    let spawned = thread::Builder::new()
        .name(format!("webgpu-bridge: {operation}"))
        .spawn(move || {
            let value = work();
            completion.complete(value);
        });

    if let Err(e) = spawned {
        log::error!("could not start worker for {operation}: {e}");
    }
}

/// Like [`complete_on_worker`], but the thread belongs to `scope`, so `work`
/// may borrow from the caller.
///
/// Returns the handle so the caller can join it; a panic in `work` then comes
/// back through the join instead of being re-raised when the scope ends.
pub(crate) fn complete_on_scoped_worker<'scope, T, F>(
    scope: &'scope thread::Scope<'scope, '_>,
    completion: Completion<T>,
    work: F,
) -> Option<thread::ScopedJoinHandle<'scope, ()>>
where
    T: Send + 'scope,
    F: FnOnce() -> T + Send + 'scope,
{
    let operation: Operation = completion.operation();
    let spawned = thread::Builder::new()
        .name(format!("webgpu-bridge: {operation}"))
        .spawn_scoped(scope, move || {
            let value = work();
            completion.complete(value);
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("could not start worker for {operation}: {e}");
            None
        }
    }
}
