//! Native window → GPU surface resolution.
//!
//! This module is responsible for:
//! - asking a window which windowing subsystem and native objects back it
//! - building the matching surface-source struct of the descriptor chain
//! - submitting the chain to a GPU instance (wgpu, or any [`SurfaceInstance`])

pub mod descriptor;
mod error;
mod instance;
mod layer;
mod native;
mod resolver;

pub use error::SurfaceError;
#[cfg(target_os = "macos")]
pub use layer::AppKitLayerHost;
pub use layer::MetalLayerHost;
pub use native::{NativeWindow, Subsystem};
pub use resolver::{create_surface, SurfaceInstance, SurfaceResolver};
