//! Blocking wrappers for single-shot GPU requests.
//!
//! The GPU API answers adapter, device and compilation-info requests through a
//! completion that fires once, on some thread, later. Each wrapper here:
//! - creates a [`PendingRequest`] and hands its [`Completion`] to the issuer
//! - blocks on the request's mutex + condvar until the completion fires
//! - turns the delivered status and payload into a `Result`
//!
//! The `*_with` functions take the issuer as a closure, so any callback-style
//! API can be wrapped; the plain functions issue through wgpu.

mod adapter;
mod compilation;
mod device;
mod error;
mod options;
mod pending;
mod response;
mod worker;

pub use adapter::{request_adapter, request_adapter_with};
pub use compilation::{
    validate_shader, validate_shader_with, CompilationMessage, CompilationOutcome, MessageKind,
    ShaderCompileError, SourceLocation,
};
pub use device::{request_device, request_device_with};
pub use error::{Operation, RequestError};
pub use options::{AdapterOptions, DeviceOptions, WaitPolicy};
pub use pending::{Completion, PendingRequest};
pub use response::{RequestStatus, Response};
