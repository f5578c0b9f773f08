//! Surface descriptor chain, laid out as `webgpu.h` expects it.
//!
//! Every surface-source struct starts with a [`ChainedStruct`] header whose
//! `s_type` tells the consumer which concrete struct follows. The generic
//! [`SurfaceDescriptor`] envelope points at that header through
//! `next_in_chain`. Field order and widths here are the contract; the consumer
//! reinterprets memory based on `s_type` alone.

use std::ffi::{c_char, c_void, CStr};
use std::marker::PhantomData;
use std::ptr;

use super::Subsystem;

/// Chained-struct type tag (`WGPUSType`).
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SType(pub u32);

impl SType {
    pub const INVALID: SType = SType(0x0000_0000);
    pub const SURFACE_DESCRIPTOR_FROM_METAL_LAYER: SType = SType(0x0000_0001);
    pub const SURFACE_DESCRIPTOR_FROM_WINDOWS_HWND: SType = SType(0x0000_0002);
    pub const SURFACE_DESCRIPTOR_FROM_XLIB_WINDOW: SType = SType(0x0000_0003);
    pub const SURFACE_DESCRIPTOR_FROM_WAYLAND_SURFACE: SType = SType(0x0000_0008);
}

/// `WGPUChainedStruct`.
#[repr(C)]
#[derive(Debug)]
pub struct ChainedStruct {
    pub next: *const ChainedStruct,
    pub s_type: SType,
}

impl ChainedStruct {
    const fn head(s_type: SType) -> Self {
        Self {
            next: ptr::null(),
            s_type,
        }
    }
}

/// `WGPUSurfaceDescriptorFromXlibWindow`.
#[repr(C)]
#[derive(Debug)]
pub struct SurfaceDescriptorFromXlibWindow {
    pub chain: ChainedStruct,
    pub display: *mut c_void,
    pub window: u32,
}

/// `WGPUSurfaceDescriptorFromWaylandSurface`.
#[repr(C)]
#[derive(Debug)]
pub struct SurfaceDescriptorFromWaylandSurface {
    pub chain: ChainedStruct,
    pub display: *mut c_void,
    pub surface: *mut c_void,
}

/// `WGPUSurfaceDescriptorFromMetalLayer`.
#[repr(C)]
#[derive(Debug)]
pub struct SurfaceDescriptorFromMetalLayer {
    pub chain: ChainedStruct,
    pub layer: *mut c_void,
}

/// `WGPUSurfaceDescriptorFromWindowsHWND`.
#[repr(C)]
#[derive(Debug)]
pub struct SurfaceDescriptorFromWindowsHwnd {
    pub chain: ChainedStruct,
    pub hinstance: *mut c_void,
    pub hwnd: *mut c_void,
}

/// One backend's surface-source struct.
///
/// Constructors always write the matching `s_type`, so the header and the
/// payload cannot disagree.
#[derive(Debug)]
pub enum SurfaceSource {
    Xlib(SurfaceDescriptorFromXlibWindow),
    Wayland(SurfaceDescriptorFromWaylandSurface),
    MetalLayer(SurfaceDescriptorFromMetalLayer),
    WindowsHwnd(SurfaceDescriptorFromWindowsHwnd),
}

impl SurfaceSource {
    pub fn xlib(display: *mut c_void, window: u32) -> Self {
        SurfaceSource::Xlib(SurfaceDescriptorFromXlibWindow {
            chain: ChainedStruct::head(SType::SURFACE_DESCRIPTOR_FROM_XLIB_WINDOW),
            display,
            window,
        })
    }

    pub fn wayland(display: *mut c_void, surface: *mut c_void) -> Self {
        SurfaceSource::Wayland(SurfaceDescriptorFromWaylandSurface {
            chain: ChainedStruct::head(SType::SURFACE_DESCRIPTOR_FROM_WAYLAND_SURFACE),
            display,
            surface,
        })
    }

    pub fn metal_layer(layer: *mut c_void) -> Self {
        SurfaceSource::MetalLayer(SurfaceDescriptorFromMetalLayer {
            chain: ChainedStruct::head(SType::SURFACE_DESCRIPTOR_FROM_METAL_LAYER),
            layer,
        })
    }

    pub fn windows_hwnd(hinstance: *mut c_void, hwnd: *mut c_void) -> Self {
        SurfaceSource::WindowsHwnd(SurfaceDescriptorFromWindowsHwnd {
            chain: ChainedStruct::head(SType::SURFACE_DESCRIPTOR_FROM_WINDOWS_HWND),
            hinstance,
            hwnd,
        })
    }

    /// The chain header at offset zero of the populated struct.
    pub fn chain(&self) -> &ChainedStruct {
        match self {
            SurfaceSource::Xlib(d) => &d.chain,
            SurfaceSource::Wayland(d) => &d.chain,
            SurfaceSource::MetalLayer(d) => &d.chain,
            SurfaceSource::WindowsHwnd(d) => &d.chain,
        }
    }

    pub fn s_type(&self) -> SType {
        self.chain().s_type
    }

    /// Subsystem whose windows produce this kind of source.
    pub fn subsystem(&self) -> Subsystem {
        match self {
            SurfaceSource::Xlib(_) => Subsystem::X11,
            SurfaceSource::Wayland(_) => Subsystem::Wayland,
            SurfaceSource::MetalLayer(_) => Subsystem::Cocoa,
            SurfaceSource::WindowsHwnd(_) => Subsystem::Win32,
        }
    }
}

/// `WGPUSurfaceDescriptor`: the generic envelope handed to the instance.
///
/// Borrows the source it points at for `'a`.
#[repr(C)]
#[derive(Debug)]
pub struct SurfaceDescriptor<'a> {
    next_in_chain: *const ChainedStruct,
    label: *const c_char,
    _source: PhantomData<&'a SurfaceSource>,
}

impl<'a> SurfaceDescriptor<'a> {
    /// Wraps `source` with an optional label (`NULL` when absent).
    pub fn new(source: &'a SurfaceSource, label: Option<&'a CStr>) -> Self {
        Self {
            next_in_chain: ptr::from_ref(source.chain()),
            label: label.map_or(ptr::null(), CStr::as_ptr),
            _source: PhantomData,
        }
    }

    pub fn next_in_chain(&self) -> *const ChainedStruct {
        self.next_in_chain
    }

    pub fn label(&self) -> Option<&'a CStr> {
        if self.label.is_null() {
            return None;
        }
        // SAFETY: non-null labels come from a `&'a CStr` in `new`.
        Some(unsafe { CStr::from_ptr(self.label) })
    }

    /// Follows `next_in_chain` and reinterprets it by its `s_type`, the way
    /// the GPU API does. Returns `None` for an unknown tag.
    pub fn source(&self) -> Option<ChainedSource<'a>> {
        let head = self.next_in_chain;
        if head.is_null() {
            return None;
        }

        // SAFETY: `new` points `next_in_chain` at the header embedded at offset
        // zero of a `#[repr(C)]` source struct borrowed for `'a`, whose type is
        // the one named by that header's `s_type`.
        unsafe {
            let chained = match (*head).s_type {
                SType::SURFACE_DESCRIPTOR_FROM_XLIB_WINDOW => {
                    ChainedSource::Xlib(&*head.cast::<SurfaceDescriptorFromXlibWindow>())
                }
                SType::SURFACE_DESCRIPTOR_FROM_WAYLAND_SURFACE => {
                    ChainedSource::Wayland(&*head.cast::<SurfaceDescriptorFromWaylandSurface>())
                }
                SType::SURFACE_DESCRIPTOR_FROM_METAL_LAYER => {
                    ChainedSource::MetalLayer(&*head.cast::<SurfaceDescriptorFromMetalLayer>())
                }
                SType::SURFACE_DESCRIPTOR_FROM_WINDOWS_HWND => {
                    ChainedSource::WindowsHwnd(&*head.cast::<SurfaceDescriptorFromWindowsHwnd>())
                }
                _ => return None,
            };
            Some(chained)
        }
    }
}

/// A decoded chain entry, borrowed from the descriptor.
#[derive(Debug, Copy, Clone)]
pub enum ChainedSource<'a> {
    Xlib(&'a SurfaceDescriptorFromXlibWindow),
    Wayland(&'a SurfaceDescriptorFromWaylandSurface),
    MetalLayer(&'a SurfaceDescriptorFromMetalLayer),
    WindowsHwnd(&'a SurfaceDescriptorFromWindowsHwnd),
}

impl ChainedSource<'_> {
    pub fn s_type(&self) -> SType {
        match self {
            ChainedSource::Xlib(d) => d.chain.s_type,
            ChainedSource::Wayland(d) => d.chain.s_type,
            ChainedSource::MetalLayer(d) => d.chain.s_type,
            ChainedSource::WindowsHwnd(d) => d.chain.s_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, offset_of, size_of};

    // ── layout ────────────────────────────────────────────────────────────

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn chained_struct_layout() {
        assert_eq!(size_of::<SType>(), 4);
        assert_eq!(offset_of!(ChainedStruct, next), 0);
        assert_eq!(offset_of!(ChainedStruct, s_type), 8);
        assert_eq!(size_of::<ChainedStruct>(), 16);
        assert_eq!(align_of::<ChainedStruct>(), 8);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn envelope_layout() {
        assert_eq!(offset_of!(SurfaceDescriptor<'_>, next_in_chain), 0);
        assert_eq!(offset_of!(SurfaceDescriptor<'_>, label), 8);
        assert_eq!(size_of::<SurfaceDescriptor<'_>>(), 16);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn source_layouts() {
        assert_eq!(offset_of!(SurfaceDescriptorFromXlibWindow, chain), 0);
        assert_eq!(offset_of!(SurfaceDescriptorFromXlibWindow, display), 16);
        assert_eq!(offset_of!(SurfaceDescriptorFromXlibWindow, window), 24);
        assert_eq!(size_of::<SurfaceDescriptorFromXlibWindow>(), 32);

        assert_eq!(offset_of!(SurfaceDescriptorFromWaylandSurface, display), 16);
        assert_eq!(offset_of!(SurfaceDescriptorFromWaylandSurface, surface), 24);
        assert_eq!(size_of::<SurfaceDescriptorFromWaylandSurface>(), 32);

        assert_eq!(offset_of!(SurfaceDescriptorFromMetalLayer, layer), 16);
        assert_eq!(size_of::<SurfaceDescriptorFromMetalLayer>(), 24);

        assert_eq!(offset_of!(SurfaceDescriptorFromWindowsHwnd, hinstance), 16);
        assert_eq!(offset_of!(SurfaceDescriptorFromWindowsHwnd, hwnd), 24);
        assert_eq!(size_of::<SurfaceDescriptorFromWindowsHwnd>(), 32);
    }

    // ── chain ─────────────────────────────────────────────────────────────

    #[test]
    fn constructors_write_matching_tags() {
        let p = 0x1000 as *mut c_void;
        assert_eq!(
            SurfaceSource::xlib(p, 7).s_type(),
            SType::SURFACE_DESCRIPTOR_FROM_XLIB_WINDOW
        );
        assert_eq!(
            SurfaceSource::wayland(p, p).s_type(),
            SType::SURFACE_DESCRIPTOR_FROM_WAYLAND_SURFACE
        );
        assert_eq!(
            SurfaceSource::metal_layer(p).s_type(),
            SType::SURFACE_DESCRIPTOR_FROM_METAL_LAYER
        );
        assert_eq!(
            SurfaceSource::windows_hwnd(p, p).s_type(),
            SType::SURFACE_DESCRIPTOR_FROM_WINDOWS_HWND
        );
    }

    #[test]
    fn header_is_the_struct_address() {
        let source = SurfaceSource::wayland(0x10 as *mut c_void, 0x20 as *mut c_void);
        let SurfaceSource::Wayland(inner) = &source else {
            panic!("wrong variant");
        };
        let descriptor = SurfaceDescriptor::new(&source, None);
        assert_eq!(
            descriptor.next_in_chain().cast::<u8>(),
            ptr::from_ref(inner).cast::<u8>()
        );
        assert!(unsafe { (*descriptor.next_in_chain()).next.is_null() });
    }

    #[test]
    fn decoding_reads_back_the_fields() {
        let source = SurfaceSource::xlib(0x1000 as *mut c_void, 0x2a);
        let descriptor = SurfaceDescriptor::new(&source, None);

        match descriptor.source() {
            Some(ChainedSource::Xlib(x)) => {
                assert_eq!(x.display as usize, 0x1000);
                assert_eq!(x.window, 0x2a);
            }
            other => panic!("unexpected chain entry: {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_does_not_decode() {
        let mut source = SurfaceSource::metal_layer(0x1000 as *mut c_void);
        if let SurfaceSource::MetalLayer(m) = &mut source {
            m.chain.s_type = SType(0x7fff);
        }
        assert!(SurfaceDescriptor::new(&source, None).source().is_none());
    }

    #[test]
    fn label_is_null_unless_given() {
        let source = SurfaceSource::metal_layer(0x1000 as *mut c_void);
        assert!(SurfaceDescriptor::new(&source, None).label().is_none());

        let label = c"main window";
        let descriptor = SurfaceDescriptor::new(&source, Some(label));
        assert_eq!(descriptor.label(), Some(label));
    }
}
