/*
 * Platform-agnostic value types used by the chrome engine.
 *
 * Native handles and window procedures are carried as opaque integers so the
 * classifier, remapper and state store compile (and are tested) on every
 * host. The Win32 backend converts them to `HWND` / `WNDPROC` at the edge.
 */

/// Opaque native window identifier. The OS owns the window's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Opaque reference to a window procedure (a function address on Win32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcedureRef(pub isize);

impl ProcedureRef {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen-space rectangle; `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Frame margins extended into the client area (DWM shadow affordance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    pub const ZERO: Margins = Margins {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };

    pub const fn bottom_only(bottom: i32) -> Self {
        Self {
            left: 0,
            right: 0,
            top: 0,
            bottom,
        }
    }
}

/// A monitor edge, used for auto-hide taskbar queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// The system metrics the engine needs, resolved per DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemMetric {
    SizeFrameWidth,
    SizeFrameHeight,
    PaddedBorderWidth,
}

/// DPI-scaled thickness of the resize band on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeBorder {
    pub width: i32,
    pub height: i32,
}

/// Tunables applied to every decorated window on the engine's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeConfig {
    /// Report the title-bar band as the native caption instead of client area.
    /// Off by default: the host UI layer decides about caption clicks itself
    /// and calls `begin_interactive_move` for unconsumed presses.
    pub native_caption: bool,
    /// Bottom frame margin extended at install so the drop shadow survives.
    pub shadow_margin_px: i32,
    /// Strip left free on an auto-hide taskbar edge while maximized.
    pub auto_hide_taskbar_inset_px: i32,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            native_caption: false,
            shadow_margin_px: 1,
            auto_hide_taskbar_inset_px: 1,
        }
    }
}
