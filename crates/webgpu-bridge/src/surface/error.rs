use raw_window_handle::HandleError;
use thiserror::Error;

use super::Subsystem;

/// Why no surface was produced for a window.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The window could not report its native handles.
    #[error("window system query failed: {0}")]
    NativeQuery(#[from] HandleError),

    /// The window and display handles belong to different subsystems.
    #[error("{window} window reported a {display} display")]
    MismatchedHandles {
        window: &'static str,
        display: &'static str,
    },

    /// An X11 window reported no display connection.
    #[error("X11 window has no display connection")]
    MissingDisplay,

    /// An X11 window id does not fit the descriptor's 32-bit field.
    #[error("X11 window id {0:#x} does not fit in 32 bits")]
    WindowIdOutOfRange(u64),

    /// No backend for this subsystem is compiled in (or it was disabled).
    #[error("{0} windows are not supported by this build")]
    Unsupported(Subsystem),

    /// A Cocoa window was given but no layer host is available.
    #[error("no Metal layer host is available on this platform")]
    NoLayerHost,

    /// The layer host could not attach a layer to the content view.
    #[error("failed to attach a CAMetalLayer to the content view")]
    LayerAttach,

    /// The GPU instance did not create a surface from the descriptor.
    #[error("GPU instance rejected the {0} surface descriptor")]
    Rejected(Subsystem),
}
