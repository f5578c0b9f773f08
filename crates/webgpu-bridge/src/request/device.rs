use super::worker::complete_on_worker;
use super::{Completion, DeviceOptions, Operation, PendingRequest, RequestError, Response, WaitPolicy};

/// Blocks until a device request issued by `issue` completes.
pub fn request_device_with<D, F>(wait: WaitPolicy, issue: F) -> Result<D, RequestError>
where
    F: FnOnce(Completion<Response<D>>),
{
    let operation = Operation::RequestDevice;
    let result = PendingRequest::issue(operation, issue)
        .wait_for(wait)?
        .into_result(operation);

    if let Err(e) = &result {
        log::warn!("{e}");
    }
    result
}

/// Requests a logical device and its queue from `adapter`, blocking until done.
pub fn request_device(
    adapter: &wgpu::Adapter,
    options: &DeviceOptions,
) -> Result<(wgpu::Device, wgpu::Queue), RequestError> {
    let adapter = adapter.clone();
    let options = options.clone();

    request_device_with(options.wait, move |completion| {
        complete_on_worker(completion, move || {
            let requested = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some(options.label.as_str()),
                required_features: options.required_features,
                required_limits: options.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: options.memory_hints.clone(),
                trace: wgpu::Trace::Off,
            }));
            Response::from(requested)
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestStatus;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct FakeDevice {
        queue: u32,
    }

    #[test]
    fn returns_device_from_callback_thread() {
        let device = request_device_with(WaitPolicy::Forever, |completion| {
            thread::spawn(move || completion.complete(Response::success(FakeDevice { queue: 1 })));
        })
        .unwrap();

        assert_eq!(device, FakeDevice { queue: 1 });
    }

    #[test]
    fn error_status_carries_message() {
        let err = request_device_with::<FakeDevice, _>(WaitPolicy::Forever, |completion| {
            completion.complete(Response::failure(
                RequestStatus::Error,
                "requested limit exceeds adapter",
            ));
        })
        .unwrap_err();

        match err {
            RequestError::Failed {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, Operation::RequestDevice);
                assert_eq!(status, RequestStatus::Error);
                assert_eq!(message.as_deref(), Some("requested limit exceeds adapter"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn slow_driver_hits_timeout() {
        let (tx, rx) = std::sync::mpsc::channel::<Completion<Response<FakeDevice>>>();

        let err = request_device_with(
            WaitPolicy::Timeout(Duration::from_millis(10)),
            move |completion| tx.send(completion).unwrap(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RequestError::TimedOut {
                operation: Operation::RequestDevice,
                ..
            }
        ));

        // The driver finishes later; nothing observes it.
        rx.recv()
            .unwrap()
            .complete(Response::success(FakeDevice { queue: 2 }));
    }
}
