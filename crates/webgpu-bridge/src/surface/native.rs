use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroIsize;
use std::ptr::NonNull;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};

use super::SurfaceError;

/// Windowing subsystem a window belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Subsystem {
    X11,
    Wayland,
    Cocoa,
    Win32,
    /// Any subsystem the bridge has no descriptor for (XCB, Web, Android, ...).
    Unsupported,
}

impl Subsystem {
    /// The four subsystems the bridge knows how to describe.
    pub const BACKENDS: [Subsystem; 4] = [
        Subsystem::X11,
        Subsystem::Wayland,
        Subsystem::Cocoa,
        Subsystem::Win32,
    ];
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subsystem::X11 => "X11",
            Subsystem::Wayland => "Wayland",
            Subsystem::Cocoa => "Cocoa",
            Subsystem::Win32 => "Win32",
            Subsystem::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Native objects backing a window, as reported by the windowing system.
///
/// Pointers are borrowed from the window; they stay valid only as long as the
/// window does.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NativeWindow {
    /// Xlib `Display*` and the `Window` XID.
    X11 {
        display: NonNull<c_void>,
        window: u64,
    },
    /// `wl_surface*` and `wl_display*`.
    Wayland {
        surface: NonNull<c_void>,
        display: NonNull<c_void>,
    },
    /// The window's content `NSView*`.
    Cocoa { ns_view: NonNull<c_void> },
    /// Module `HINSTANCE` (may be absent) and `HWND`.
    Win32 {
        hinstance: Option<NonZeroIsize>,
        hwnd: NonZeroIsize,
    },
    /// A window handle kind with no matching backend.
    Unsupported { kind: &'static str },
}

impl NativeWindow {
    /// Queries the native objects behind `window`.
    ///
    /// Fails when the window cannot report its handles (e.g. it is suspended
    /// or already destroyed) or reports an inconsistent window/display pair.
    pub fn query<W>(window: &W) -> Result<Self, SurfaceError>
    where
        W: HasWindowHandle + HasDisplayHandle + ?Sized,
    {
        let raw_window = window.window_handle()?.as_raw();
        let raw_display = window.display_handle()?.as_raw();
        Self::from_raw(raw_window, raw_display)
    }

    /// Classifies a raw window/display handle pair.
    pub fn from_raw(window: RawWindowHandle, display: RawDisplayHandle) -> Result<Self, SurfaceError> {
        match (window, display) {
            (RawWindowHandle::Xlib(w), RawDisplayHandle::Xlib(d)) => {
                let display = d.display.ok_or(SurfaceError::MissingDisplay)?;
                Ok(NativeWindow::X11 {
                    display,
                    window: u64::from(w.window),
                })
            }
            (RawWindowHandle::Wayland(w), RawDisplayHandle::Wayland(d)) => {
                Ok(NativeWindow::Wayland {
                    surface: w.surface,
                    display: d.display,
                })
            }
            (RawWindowHandle::AppKit(w), RawDisplayHandle::AppKit(_)) => {
                Ok(NativeWindow::Cocoa { ns_view: w.ns_view })
            }
            (RawWindowHandle::Win32(w), RawDisplayHandle::Windows(_)) => Ok(NativeWindow::Win32 {
                hinstance: w.hinstance,
                hwnd: w.hwnd,
            }),
            (
                w @ (RawWindowHandle::Xlib(_)
                | RawWindowHandle::Wayland(_)
                | RawWindowHandle::AppKit(_)
                | RawWindowHandle::Win32(_)),
                d,
            ) => Err(SurfaceError::MismatchedHandles {
                window: window_kind(&w),
                display: display_kind(&d),
            }),
            (w, _) => Ok(NativeWindow::Unsupported {
                kind: window_kind(&w),
            }),
        }
    }

    /// Returns the subsystem tag used for dispatch.
    pub fn subsystem(&self) -> Subsystem {
        match self {
            NativeWindow::X11 { .. } => Subsystem::X11,
            NativeWindow::Wayland { .. } => Subsystem::Wayland,
            NativeWindow::Cocoa { .. } => Subsystem::Cocoa,
            NativeWindow::Win32 { .. } => Subsystem::Win32,
            NativeWindow::Unsupported { .. } => Subsystem::Unsupported,
        }
    }
}

fn window_kind(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::Xlib(_) => "Xlib",
        RawWindowHandle::Xcb(_) => "XCB",
        RawWindowHandle::Wayland(_) => "Wayland",
        RawWindowHandle::AppKit(_) => "AppKit",
        RawWindowHandle::UiKit(_) => "UIKit",
        RawWindowHandle::Win32(_) => "Win32",
        RawWindowHandle::WinRt(_) => "WinRT",
        RawWindowHandle::AndroidNdk(_) => "Android",
        RawWindowHandle::Web(_)
        | RawWindowHandle::WebCanvas(_)
        | RawWindowHandle::WebOffscreenCanvas(_) => "Web",
        _ => "other",
    }
}

fn display_kind(handle: &RawDisplayHandle) -> &'static str {
    match handle {
        RawDisplayHandle::Xlib(_) => "Xlib",
        RawDisplayHandle::Xcb(_) => "XCB",
        RawDisplayHandle::Wayland(_) => "Wayland",
        RawDisplayHandle::AppKit(_) => "AppKit",
        RawDisplayHandle::Windows(_) => "Windows",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{
        AppKitDisplayHandle, AppKitWindowHandle, WaylandDisplayHandle, WaylandWindowHandle,
        WebDisplayHandle, WebWindowHandle, Win32WindowHandle, WindowsDisplayHandle,
        XlibDisplayHandle, XlibWindowHandle,
    };

    fn fake_ptr(addr: usize) -> NonNull<c_void> {
        NonNull::new(addr as *mut c_void).unwrap()
    }

    #[test]
    fn xlib_pair_is_x11() {
        let native = NativeWindow::from_raw(
            XlibWindowHandle::new(0x2a).into(),
            XlibDisplayHandle::new(Some(fake_ptr(0x1000)), 0).into(),
        )
        .unwrap();

        assert_eq!(
            native,
            NativeWindow::X11 {
                display: fake_ptr(0x1000),
                window: 0x2a
            }
        );
        assert_eq!(native.subsystem(), Subsystem::X11);
    }

    #[test]
    fn xlib_without_display_fails() {
        let err = NativeWindow::from_raw(
            XlibWindowHandle::new(0x2a).into(),
            XlibDisplayHandle::new(None, 0).into(),
        )
        .unwrap_err();
        assert!(matches!(err, SurfaceError::MissingDisplay));
    }

    #[test]
    fn wayland_pair_keeps_both_pointers() {
        let native = NativeWindow::from_raw(
            WaylandWindowHandle::new(fake_ptr(0x10)).into(),
            WaylandDisplayHandle::new(fake_ptr(0x20)).into(),
        )
        .unwrap();

        assert_eq!(
            native,
            NativeWindow::Wayland {
                surface: fake_ptr(0x10),
                display: fake_ptr(0x20)
            }
        );
    }

    #[test]
    fn appkit_is_cocoa() {
        let native = NativeWindow::from_raw(
            AppKitWindowHandle::new(fake_ptr(0x30)).into(),
            AppKitDisplayHandle::new().into(),
        )
        .unwrap();
        assert_eq!(native.subsystem(), Subsystem::Cocoa);
    }

    #[test]
    fn win32_keeps_optional_hinstance() {
        let hwnd = NonZeroIsize::new(0x40).unwrap();
        let native = NativeWindow::from_raw(
            Win32WindowHandle::new(hwnd).into(),
            WindowsDisplayHandle::new().into(),
        )
        .unwrap();

        assert_eq!(
            native,
            NativeWindow::Win32 {
                hinstance: None,
                hwnd
            }
        );
        assert_eq!(native.subsystem(), Subsystem::Win32);
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let err = NativeWindow::from_raw(
            XlibWindowHandle::new(1).into(),
            WaylandDisplayHandle::new(fake_ptr(0x20)).into(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            SurfaceError::MismatchedHandles {
                window: "Xlib",
                display: "Wayland"
            }
        ));
    }

    #[test]
    fn web_window_is_unsupported() {
        let native = NativeWindow::from_raw(
            WebWindowHandle::new(1).into(),
            WebDisplayHandle::new().into(),
        )
        .unwrap();

        assert_eq!(native, NativeWindow::Unsupported { kind: "Web" });
        assert_eq!(native.subsystem(), Subsystem::Unsupported);
    }
}
