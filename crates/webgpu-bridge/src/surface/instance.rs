use std::ffi::c_void;
use std::num::NonZeroIsize;
use std::ptr::NonNull;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WaylandDisplayHandle, WaylandWindowHandle, Win32WindowHandle, WindowHandle,
    WindowsDisplayHandle, XlibDisplayHandle, XlibWindowHandle,
};

use super::descriptor::{ChainedSource, SurfaceDescriptor};
use super::SurfaceInstance;

impl SurfaceInstance for wgpu::Instance {
    type Surface = wgpu::Surface<'static>;

    unsafe fn create_surface_from_descriptor(
        &self,
        descriptor: &SurfaceDescriptor<'_>,
    ) -> Option<wgpu::Surface<'static>> {
        // SAFETY: the caller guarantees the chained native objects outlive the surface.
        let target = match unsafe { surface_target(descriptor) } {
            Ok(target) => target,
            Err(reason) => {
                log::warn!("cannot hand descriptor to wgpu: {reason}");
                return None;
            }
        };

        // SAFETY: as above.
        match unsafe { self.create_surface_unsafe(target) } {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::warn!("wgpu failed to create surface: {e}");
                None
            }
        }
    }
}

/// Raw handles rebuilt from a chain entry, presented as a window to wgpu.
struct ChainedWindow {
    window: RawWindowHandle,
    display: RawDisplayHandle,
}

impl HasWindowHandle for ChainedWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        // SAFETY: validity of the native objects is the caller's contract on
        // `create_surface_from_descriptor`.
        Ok(unsafe { WindowHandle::borrow_raw(self.window) })
    }
}

impl HasDisplayHandle for ChainedWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        // SAFETY: see `window_handle`.
        Ok(unsafe { DisplayHandle::borrow_raw(self.display) })
    }
}

/// Decodes the descriptor chain into wgpu's surface target.
///
/// # Safety
///
/// The native objects referenced by the descriptor must outlive any surface
/// created from the returned target.
unsafe fn surface_target(
    descriptor: &SurfaceDescriptor<'_>,
) -> Result<wgpu::SurfaceTargetUnsafe, &'static str> {
    let source = descriptor
        .source()
        .ok_or("unrecognized chained struct type")?;

    let window = match source {
        ChainedSource::Xlib(d) => {
            let display = NonNull::new(d.display).ok_or("null X11 display")?;
            ChainedWindow {
                window: XlibWindowHandle::new(d.window.into()).into(),
                display: XlibDisplayHandle::new(Some(display), 0).into(),
            }
        }
        ChainedSource::Wayland(d) => ChainedWindow {
            window: WaylandWindowHandle::new(NonNull::new(d.surface).ok_or("null wl_surface")?)
                .into(),
            display: WaylandDisplayHandle::new(NonNull::new(d.display).ok_or("null wl_display")?)
                .into(),
        },
        ChainedSource::WindowsHwnd(d) => {
            let hwnd = NonZeroIsize::new(d.hwnd as isize).ok_or("null HWND")?;
            let mut handle = Win32WindowHandle::new(hwnd);
            handle.hinstance = NonZeroIsize::new(d.hinstance as isize);
            ChainedWindow {
                window: handle.into(),
                display: WindowsDisplayHandle::new().into(),
            }
        }
        ChainedSource::MetalLayer(d) => return metal_layer_target(d.layer),
    };

    // SAFETY: forwarded from the caller.
    unsafe { wgpu::SurfaceTargetUnsafe::from_window(&window) }
        .map_err(|_| "raw handles were not accepted")
}

#[cfg(target_vendor = "apple")]
fn metal_layer_target(layer: *mut c_void) -> Result<wgpu::SurfaceTargetUnsafe, &'static str> {
    if layer.is_null() {
        return Err("null CAMetalLayer");
    }
    Ok(wgpu::SurfaceTargetUnsafe::CoreAnimationLayer(layer))
}

#[cfg(not(target_vendor = "apple"))]
fn metal_layer_target(_: *mut c_void) -> Result<wgpu::SurfaceTargetUnsafe, &'static str> {
    Err("Metal layers need an Apple target")
}
