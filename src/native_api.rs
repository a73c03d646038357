/*
 * The seam between the chrome engine and the native window manager.
 *
 * `ChromeEngine` never touches the OS directly; every query and side effect
 * goes through this trait. The Win32 backend implements it with windows-rs,
 * and the unit tests implement it with an in-memory window manager that
 * records every call.
 *
 * All methods are called on the thread that owns the window's message loop.
 */
use crate::types::{Margins, Point, ProcedureRef, Rect, ScreenEdge, SystemMetric, WindowHandle};
use crate::window_common::RawMessage;

pub trait NativeWindowApi {
    /// True while `handle` names a live window.
    fn is_window(&self, handle: WindowHandle) -> bool;

    /// True when the calling thread owns `handle`'s message queue.
    fn is_owned_by_current_thread(&self, handle: WindowHandle) -> bool;

    /// The engine's substituted frame procedure.
    fn frame_procedure(&self) -> ProcedureRef;

    /// The engine's substituted child procedure.
    fn child_procedure(&self) -> ProcedureRef;

    /// The procedure currently installed on `handle`.
    fn window_procedure(&self, handle: WindowHandle) -> ProcedureRef;

    /// Installs `procedure` on `handle` and returns the one it replaced.
    fn replace_window_procedure(&self, handle: WindowHandle, procedure: ProcedureRef)
    -> ProcedureRef;

    /// Invokes `procedure` for `handle` (the `CallWindowProc` path).
    fn call_procedure(&self, procedure: ProcedureRef, handle: WindowHandle, msg: RawMessage)
    -> isize;

    /// Invokes the system default procedure, bypassing every subclass.
    fn default_procedure(&self, handle: WindowHandle, msg: RawMessage) -> isize;

    /// First child window in z-order, if any.
    fn first_child(&self, handle: WindowHandle) -> Option<WindowHandle>;

    /// Window rectangle in screen coordinates.
    fn window_rect(&self, handle: WindowHandle) -> Option<Rect>;

    fn is_maximized(&self, handle: WindowHandle) -> bool;

    /// Full rectangle of the monitor nearest to `handle`.
    fn monitor_rect(&self, handle: WindowHandle) -> Option<Rect>;

    /// True when an auto-hide taskbar is docked on `edge` of `monitor`.
    fn is_auto_hide_taskbar(&self, edge: ScreenEdge, monitor: Rect) -> bool;

    /// DPI of the monitor `handle` is on; legacy systems report the global DPI.
    fn dpi_of(&self, handle: WindowHandle) -> u32;

    /// `metric` scaled for `dpi`; legacy systems ignore `dpi`.
    fn scaled_metric(&self, metric: SystemMetric, dpi: u32) -> i32;

    fn screen_to_client(&self, handle: WindowHandle, point: Point) -> Option<Point>;

    fn cursor_position(&self) -> Option<Point>;

    /// Enqueues `msg` on `handle`'s queue; never dispatches synchronously.
    fn post_message(&self, handle: WindowHandle, msg: RawMessage) -> bool;

    fn release_capture(&self);

    fn extend_frame_into_client_area(&self, handle: WindowHandle, margins: Margins);

    /// Asks the window manager to recompute the non-client area now.
    fn refresh_frame(&self, handle: WindowHandle);

    /// Requests rounded window corners; ignored where unsupported.
    fn request_rounded_corners(&self, handle: WindowHandle);

    /// Reads `rgrc[0]` of the `NCCALCSIZE_PARAMS` carried by `lparam`.
    ///
    /// # Safety
    /// `lparam` must come from a `WM_NCCALCSIZE` message with a non-zero
    /// `wparam` that is still being dispatched.
    unsafe fn proposed_client_rect(&self, lparam: isize) -> Rect;

    /// Writes `rgrc[0]` of the `NCCALCSIZE_PARAMS` carried by `lparam`.
    ///
    /// # Safety
    /// Same contract as [`NativeWindowApi::proposed_client_rect`].
    unsafe fn set_proposed_client_rect(&self, lparam: isize, rect: Rect);
}
