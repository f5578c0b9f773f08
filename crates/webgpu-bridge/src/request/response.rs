use super::{Operation, RequestError};

/// Status reported by a request callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RequestStatus {
    Success,
    /// No adapter or device matching the request exists.
    Unavailable,
    Error,
    Unknown,
}

/// Everything a single request callback delivers.
///
/// The payload is only meaningful together with [`RequestStatus::Success`].
#[derive(Debug)]
pub struct Response<T> {
    pub status: RequestStatus,
    pub payload: Option<T>,
    pub message: Option<String>,
}

impl<T> Response<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: RequestStatus::Success,
            payload: Some(payload),
            message: None,
        }
    }

    pub fn failure(status: RequestStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: None,
            message: Some(message.into()),
        }
    }

    /// Keeps the payload only when the status is a success.
    pub(crate) fn into_result(self, operation: Operation) -> Result<T, RequestError> {
        match (self.status, self.payload) {
            (RequestStatus::Success, Some(payload)) => Ok(payload),
            (RequestStatus::Success, None) => Err(RequestError::Failed {
                operation,
                status: RequestStatus::Success,
                message: Some("completed without a result".to_string()),
            }),
            (status, _) => Err(RequestError::Failed {
                operation,
                status,
                message: self.message,
            }),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Response<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(e) => Response::failure(RequestStatus::Error, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_yields_payload() {
        let r = Response::success(7).into_result(Operation::RequestAdapter);
        assert_eq!(r.unwrap(), 7);
    }

    #[test]
    fn payload_is_ignored_without_success() {
        let response = Response {
            status: RequestStatus::Unavailable,
            payload: Some(7),
            message: None,
        };
        let err = response.into_result(Operation::RequestAdapter).unwrap_err();
        assert!(matches!(
            err,
            RequestError::Failed {
                status: RequestStatus::Unavailable,
                ..
            }
        ));
    }

    #[test]
    fn failure_keeps_message() {
        let err = Response::<()>::failure(RequestStatus::Error, "limits too high")
            .into_result(Operation::RequestDevice)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "device request failed with status Error: limits too high"
        );
    }

    #[test]
    fn success_without_payload_fails() {
        let response = Response::<u8> {
            status: RequestStatus::Success,
            payload: None,
            message: None,
        };
        assert!(response.into_result(Operation::RequestDevice).is_err());
    }
}
