//! WebGPU bridge crate.
//!
//! Two independent pieces live here:
//! - [`surface`] turns a native window into a GPU surface by dispatching on the
//!   window's windowing subsystem at runtime
//! - [`request`] turns the GPU API's single-shot callback requests (adapter,
//!   device, shader compilation info) into blocking calls
//!
//! Window creation, event polling and rendering belong to the application.

pub mod logging;
pub mod request;
pub mod surface;

pub use request::{
    AdapterOptions, CompilationMessage, CompilationOutcome, Completion, DeviceOptions,
    MessageKind, PendingRequest, RequestError, RequestStatus, ShaderCompileError, WaitPolicy,
};
pub use surface::{
    create_surface, MetalLayerHost, NativeWindow, SurfaceError, SurfaceInstance, SurfaceResolver,
    Subsystem,
};
