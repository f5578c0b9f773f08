use std::ffi::{CStr, CString};
use std::fmt;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use super::descriptor::{SurfaceDescriptor, SurfaceSource};
use super::layer::{self, MetalLayerHost};
use super::{NativeWindow, Subsystem, SurfaceError};

/// A GPU instance that can build a surface from a descriptor chain.
pub trait SurfaceInstance {
    type Surface;

    /// Submits `descriptor` to the instance's surface-creation entry point.
    /// `None` means the instance declined it.
    ///
    /// # Safety
    ///
    /// The native objects the descriptor points at must be valid now and must
    /// outlive the returned surface.
    unsafe fn create_surface_from_descriptor(
        &self,
        descriptor: &SurfaceDescriptor<'_>,
    ) -> Option<Self::Surface>;
}

/// Builds the surface source for a window of the backend's subsystem.
type DescribeFn = fn(&SurfaceResolver, &NativeWindow) -> Result<SurfaceSource, SurfaceError>;

#[derive(Copy, Clone)]
struct Backend {
    subsystem: Subsystem,
    describe: DescribeFn,
}

/// Backends compiled into this build, selected by Cargo feature and target.
const COMPILED_BACKENDS: &[Backend] = &[
    #[cfg(all(feature = "x11", unix, not(target_vendor = "apple")))]
    Backend {
        subsystem: Subsystem::X11,
        describe: describe_xlib,
    },
    #[cfg(all(feature = "wayland", unix, not(target_vendor = "apple")))]
    Backend {
        subsystem: Subsystem::Wayland,
        describe: describe_wayland,
    },
    #[cfg(all(feature = "cocoa", target_os = "macos"))]
    Backend {
        subsystem: Subsystem::Cocoa,
        describe: describe_metal_layer,
    },
    #[cfg(all(feature = "win32", windows))]
    Backend {
        subsystem: Subsystem::Win32,
        describe: describe_windows_hwnd,
    },
];

/// Resolves native windows into GPU surfaces.
///
/// Dispatch is a table lookup on the window's runtime [`Subsystem`]. A subsystem
/// missing from the table (not compiled in, removed with [`without`](Self::without),
/// or [`Subsystem::Unsupported`]) yields [`SurfaceError::Unsupported`].
pub struct SurfaceResolver {
    backends: Vec<Backend>,
    layer_host: Option<Box<dyn MetalLayerHost>>,
    label: Option<CString>,
}

impl SurfaceResolver {
    /// Resolver over every compiled-in backend, with the platform's layer host.
    pub fn new() -> Self {
        Self {
            backends: COMPILED_BACKENDS.to_vec(),
            layer_host: layer::platform_layer_host(),
            label: None,
        }
    }

    /// Sets the label carried by the descriptor envelope.
    pub fn with_label(mut self, label: &CStr) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    /// Replaces the layer host used by the Cocoa backend.
    pub fn with_layer_host(mut self, host: impl MetalLayerHost + 'static) -> Self {
        self.layer_host = Some(Box::new(host));
        self
    }

    /// Removes a backend from the dispatch table.
    pub fn without(mut self, subsystem: Subsystem) -> Self {
        self.backends.retain(|b| b.subsystem != subsystem);
        self
    }

    /// Returns true if windows of `subsystem` can be resolved.
    pub fn supports(&self, subsystem: Subsystem) -> bool {
        self.backend(subsystem).is_some()
    }

    /// Builds the surface source for `native` without submitting it.
    ///
    /// For Cocoa windows this attaches the Metal layer to the content view.
    pub fn describe(&self, native: &NativeWindow) -> Result<SurfaceSource, SurfaceError> {
        let subsystem = native.subsystem();
        let backend = self
            .backend(subsystem)
            .ok_or(SurfaceError::Unsupported(subsystem))?;

        log::debug!("describing {subsystem} surface");
        (backend.describe)(self, native)
    }

    /// Queries `window` and creates a surface for it on `instance`.
    ///
    /// # Safety
    ///
    /// `window` must outlive the returned surface.
    pub unsafe fn create_surface<W, I>(
        &self,
        window: &W,
        instance: &I,
    ) -> Result<I::Surface, SurfaceError>
    where
        W: HasWindowHandle + HasDisplayHandle + ?Sized,
        I: SurfaceInstance + ?Sized,
    {
        let native = NativeWindow::query(window).inspect_err(|e| {
            log::warn!("surface creation failed: {e}");
        })?;
        // SAFETY: forwarded from the caller.
        unsafe { self.create_surface_for(&native, instance) }
    }

    /// Creates a surface for already-queried native handles.
    ///
    /// # Safety
    ///
    /// The native objects in `native` must outlive the returned surface.
    pub unsafe fn create_surface_for<I>(
        &self,
        native: &NativeWindow,
        instance: &I,
    ) -> Result<I::Surface, SurfaceError>
    where
        I: SurfaceInstance + ?Sized,
    {
        let result = self.describe(native).and_then(|source| {
            let descriptor = SurfaceDescriptor::new(&source, self.label.as_deref());
            // SAFETY: forwarded from the caller.
            unsafe { instance.create_surface_from_descriptor(&descriptor) }
                .ok_or(SurfaceError::Rejected(source.subsystem()))
        });

        if let Err(e) = &result {
            log::warn!("surface creation failed: {e}");
        }
        result
    }

    fn backend(&self, subsystem: Subsystem) -> Option<&Backend> {
        self.backends.iter().find(|b| b.subsystem == subsystem)
    }
}

impl Default for SurfaceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SurfaceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backends: Vec<Subsystem> = self.backends.iter().map(|b| b.subsystem).collect();
        f.debug_struct("SurfaceResolver")
            .field("backends", &backends)
            .field("layer_host", &self.layer_host.is_some())
            .field("label", &self.label)
            .finish()
    }
}

/// Creates a surface for `window` with a default [`SurfaceResolver`].
///
/// # Safety
///
/// `window` must outlive the returned surface.
pub unsafe fn create_surface<W, I>(window: &W, instance: &I) -> Result<I::Surface, SurfaceError>
where
    W: HasWindowHandle + HasDisplayHandle + ?Sized,
    I: SurfaceInstance + ?Sized,
{
    // SAFETY: forwarded from the caller.
    unsafe { SurfaceResolver::new().create_surface(window, instance) }
}

#[cfg(any(test, all(feature = "x11", unix, not(target_vendor = "apple"))))]
fn describe_xlib(_: &SurfaceResolver, native: &NativeWindow) -> Result<SurfaceSource, SurfaceError> {
    let NativeWindow::X11 { display, window } = *native else {
        return Err(SurfaceError::Unsupported(native.subsystem()));
    };
    let window = u32::try_from(window).map_err(|_| SurfaceError::WindowIdOutOfRange(window))?;
    Ok(SurfaceSource::xlib(display.as_ptr(), window))
}

#[cfg(any(test, all(feature = "wayland", unix, not(target_vendor = "apple"))))]
fn describe_wayland(
    _: &SurfaceResolver,
    native: &NativeWindow,
) -> Result<SurfaceSource, SurfaceError> {
    let NativeWindow::Wayland { surface, display } = *native else {
        return Err(SurfaceError::Unsupported(native.subsystem()));
    };
    Ok(SurfaceSource::wayland(display.as_ptr(), surface.as_ptr()))
}

/// The layer must be attached before its pointer goes into the descriptor.
#[cfg(any(test, all(feature = "cocoa", target_os = "macos")))]
fn describe_metal_layer(
    resolver: &SurfaceResolver,
    native: &NativeWindow,
) -> Result<SurfaceSource, SurfaceError> {
    let NativeWindow::Cocoa { ns_view } = *native else {
        return Err(SurfaceError::Unsupported(native.subsystem()));
    };
    let host = resolver
        .layer_host
        .as_deref()
        .ok_or(SurfaceError::NoLayerHost)?;
    let layer = host.attach_layer(ns_view).ok_or(SurfaceError::LayerAttach)?;
    Ok(SurfaceSource::metal_layer(layer.as_ptr()))
}

#[cfg(any(test, all(feature = "win32", windows)))]
fn describe_windows_hwnd(
    _: &SurfaceResolver,
    native: &NativeWindow,
) -> Result<SurfaceSource, SurfaceError> {
    use std::ffi::c_void;

    let NativeWindow::Win32 { hinstance, hwnd } = *native else {
        return Err(SurfaceError::Unsupported(native.subsystem()));
    };
    let hinstance = hinstance.map_or(std::ptr::null_mut(), |h| h.get() as *mut c_void);
    Ok(SurfaceSource::windows_hwnd(hinstance, hwnd.get() as *mut c_void))
}
