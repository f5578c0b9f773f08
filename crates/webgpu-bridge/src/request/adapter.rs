use std::thread;

use super::worker::{complete_on_scoped_worker, complete_on_worker};
use super::{
    AdapterOptions, Completion, Operation, PendingRequest, RequestError, RequestStatus, Response,
    WaitPolicy,
};

/// Blocks until an adapter request issued by `issue` completes.
///
/// `issue` starts the asynchronous request and must arrange for the
/// completion to fire exactly once with the callback's status and adapter.
pub fn request_adapter_with<A, F>(wait: WaitPolicy, issue: F) -> Result<A, RequestError>
where
    F: FnOnce(Completion<Response<A>>),
{
    let operation = Operation::RequestAdapter;
    let result = PendingRequest::issue(operation, issue)
        .wait_for(wait)?
        .into_result(operation);

    if let Err(e) = &result {
        log::warn!("{e}");
    }
    result
}

/// Requests a wgpu adapter and blocks until it is available.
///
/// When `compatible_surface` is given the adapter must be able to present to it.
/// The worker then borrows the surface, so this call always waits until the
/// worker is done with it: a [`WaitPolicy::Timeout`] in `options` is ignored.
pub fn request_adapter(
    instance: &wgpu::Instance,
    options: &AdapterOptions,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> Result<wgpu::Adapter, RequestError> {
    let power_preference = options.power_preference;
    let force_fallback_adapter = options.force_fallback_adapter;

    let adapter = match compatible_surface {
        None => {
            let instance = instance.clone();
            request_adapter_with(options.wait, move |completion| {
                complete_on_worker(completion, move || {
                    find_adapter(&instance, power_preference, force_fallback_adapter, None)
                });
            })?
        }
        Some(surface) => request_adapter_borrowing(options.wait, surface, |surface| {
            find_adapter(
                instance,
                power_preference,
                force_fallback_adapter,
                Some(surface),
            )
        })?,
    };

    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);
    Ok(adapter)
}

/// Runs an adapter request whose issuer borrows `resource` on a scoped worker.
///
/// Returns only after the worker has exited, so `resource` is never used after
/// the caller regains control. For the same reason the wait is unbounded.
fn request_adapter_borrowing<R, A, F>(
    wait: WaitPolicy,
    resource: &R,
    work: F,
) -> Result<A, RequestError>
where
    R: Sync + ?Sized,
    A: Send,
    F: FnOnce(&R) -> Response<A> + Send,
{
    if let WaitPolicy::Timeout(timeout) = wait {
        log::debug!("ignoring {timeout:?} adapter timeout: the request borrows a surface");
    }

    thread::scope(|scope| {
        let mut worker = None;
        let result = request_adapter_with(WaitPolicy::Forever, |completion| {
            worker = complete_on_scoped_worker(scope, completion, move || work(resource));
        });

        if let Some(handle) = worker {
            if handle.join().is_err() {
                log::error!("adapter request worker panicked");
            }
        }
        result
    })
}

fn find_adapter(
    instance: &wgpu::Instance,
    power_preference: wgpu::PowerPreference,
    force_fallback_adapter: bool,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> Response<wgpu::Adapter> {
    let found = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference,
        force_fallback_adapter,
        compatible_surface,
    }));

    match found {
        Ok(adapter) => Response::success(adapter),
        Err(e) => Response::failure(RequestStatus::Unavailable, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct FakeAdapter(&'static str);

    #[test]
    fn returns_adapter_from_callback_thread() {
        let adapter = request_adapter_with(WaitPolicy::Forever, |completion| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(3));
                completion.complete(Response::success(FakeAdapter("discrete")));
            });
        })
        .unwrap();

        assert_eq!(adapter, FakeAdapter("discrete"));
    }

    #[test]
    fn unavailable_status_is_a_failure() {
        let err = request_adapter_with::<FakeAdapter, _>(WaitPolicy::Forever, |completion| {
            completion.complete(Response::failure(
                RequestStatus::Unavailable,
                "no adapter matches the surface",
            ));
        })
        .unwrap_err();

        assert!(matches!(
            err,
            RequestError::Failed {
                operation: Operation::RequestAdapter,
                status: RequestStatus::Unavailable,
                ..
            }
        ));
    }

    #[test]
    fn never_issued_request_is_abandoned() {
        let err =
            request_adapter_with::<FakeAdapter, _>(WaitPolicy::Forever, drop).unwrap_err();
        assert!(matches!(err, RequestError::Abandoned { .. }));
    }

    // ── borrowed surface ──────────────────────────────────────────────────

    /// Stands in for a surface; records whether a worker is still using it.
    #[derive(Default)]
    struct BorrowedSurface {
        in_use: AtomicBool,
        uses: AtomicUsize,
    }

    #[test]
    fn borrowed_surface_is_released_before_returning() {
        let surface = BorrowedSurface::default();

        // The worker outlives the requested timeout by far.
        let adapter = request_adapter_borrowing(
            WaitPolicy::Timeout(Duration::from_millis(1)),
            &surface,
            |surface| {
                surface.in_use.store(true, Ordering::SeqCst);
                surface.uses.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(30));
                surface.in_use.store(false, Ordering::SeqCst);
                Response::success(FakeAdapter("integrated"))
            },
        )
        .unwrap();

        assert_eq!(adapter, FakeAdapter("integrated"));
        assert!(!surface.in_use.load(Ordering::SeqCst));
        assert_eq!(surface.uses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn borrowed_surface_worker_panic_is_a_value() {
        let surface = BorrowedSurface::default();

        let result = request_adapter_borrowing::<_, FakeAdapter, _>(
            WaitPolicy::Forever,
            &surface,
            |_| panic!("driver crashed while querying the surface"),
        );

        assert!(matches!(result, Err(RequestError::Abandoned { .. })));
    }

    #[test]
    fn instance_without_backends_reports_failure() {
        // No backends means no adapter; that must come back as a value.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::empty(),
            ..Default::default()
        });
        let result = request_adapter(&instance, &AdapterOptions::default(), None);
        assert!(matches!(result, Err(RequestError::Failed { .. })));
    }
}
