use std::ffi::c_void;
use std::ptr::NonNull;

/// Supplies the compositing layer a Metal surface renders into.
///
/// The Cocoa backend calls [`attach_layer`](Self::attach_layer) before it builds
/// its descriptor; the returned layer pointer is what the descriptor carries.
pub trait MetalLayerHost: Send + Sync {
    /// Creates a `CAMetalLayer`, marks `ns_view` as layer-backed and installs the
    /// layer on it. Returns the installed layer, or `None` if nothing was attached.
    ///
    /// Must be called on the thread that owns the view (the main thread for AppKit).
    fn attach_layer(&self, ns_view: NonNull<c_void>) -> Option<NonNull<c_void>>;
}

/// AppKit implementation of [`MetalLayerHost`].
#[cfg(target_os = "macos")]
#[derive(Debug, Default, Copy, Clone)]
pub struct AppKitLayerHost;

#[cfg(target_os = "macos")]
impl MetalLayerHost for AppKitLayerHost {
    fn attach_layer(&self, ns_view: NonNull<c_void>) -> Option<NonNull<c_void>> {
        use objc2::rc::Retained;
        use objc2_app_kit::NSView;
        use objc2_quartz_core::CAMetalLayer;

        // SAFETY: `ns_view` comes from the window's AppKit handle and the trait
        // requires the call to happen on the view's thread.
        let view: &NSView = unsafe { ns_view.cast::<NSView>().as_ref() };
        let layer = CAMetalLayer::new();

        // The view keeps its own reference to the layer once installed.
        #[allow(unused_unsafe)]
        unsafe {
            view.setWantsLayer(true);
            view.setLayer(Some(&layer));
        }

        NonNull::new(Retained::as_ptr(&layer).cast_mut().cast::<c_void>())
    }
}

/// The layer host for the current platform, if it has one.
pub(crate) fn platform_layer_host() -> Option<Box<dyn MetalLayerHost>> {
    #[cfg(target_os = "macos")]
    {
        Some(Box::new(AppKitLayerHost))
    }
    #[cfg(not(target_os = "macos"))]
    {
        None
    }
}
