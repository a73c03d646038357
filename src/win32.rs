/*
 * Win32 backend for the chrome engine.
 *
 * Implements `NativeWindowApi` on top of windows-rs, provides the two
 * substituted window procedures, and owns the engine instance of each UI
 * thread. The per-monitor DPI exports of user32 are resolved once per process
 * and cached; systems without them fall back to the device-context DPI and
 * unscaled system metrics.
 */
use crate::controls::dpi_handler::{
    EXPORT_GET_DPI_FOR_WINDOW, EXPORT_GET_SYSTEM_METRICS_FOR_DPI, dpi_or_fallback,
    resolve_dpi_capabilities,
};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::interceptor::ChromeEngine;
use crate::native_api::NativeWindowApi;
use crate::types::{
    ChromeConfig, Margins, Point, ProcedureRef, Rect, ScreenEdge, SystemMetric, WindowHandle,
};
use crate::window_common::RawMessage;

use std::ffi::c_void;
use std::sync::OnceLock;

use windows::Win32::{
    Foundation::{HMODULE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
    Graphics::Dwm::{DWMWINDOWATTRIBUTE, DwmExtendFrameIntoClientArea, DwmSetWindowAttribute},
    Graphics::Gdi::{
        GetDC, GetDeviceCaps, GetMonitorInfoW, LOGPIXELSX, MONITOR_DEFAULTTONEAREST, MONITORINFO,
        MonitorFromWindow, ReleaseDC, ScreenToClient,
    },
    System::LibraryLoader::{GetModuleHandleW, GetProcAddress},
    System::Threading::GetCurrentThreadId,
    UI::Controls::MARGINS,
    UI::Input::KeyboardAndMouse::ReleaseCapture,
    UI::Shell::{
        ABE_BOTTOM, ABE_LEFT, ABE_RIGHT, ABE_TOP, ABM_GETAUTOHIDEBAR, APPBARDATA, SHAppBarMessage,
    },
    UI::WindowsAndMessaging::{
        CallWindowProcW, DefWindowProcW, GW_CHILD, GWLP_WNDPROC, GetCursorPos, GetSystemMetrics,
        GetWindow, GetWindowLongPtrW, GetWindowRect, GetWindowThreadProcessId, IsWindow, IsZoomed,
        NCCALCSIZE_PARAMS, PostMessageW, SM_CXPADDEDBORDER, SM_CXSIZEFRAME, SM_CYSIZEFRAME,
        SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
        SYSTEM_METRICS_INDEX, SetWindowLongPtrW, SetWindowPos, WNDPROC,
    },
};
use windows::core::{PCSTR, w};

const DWMWA_WINDOW_CORNER_PREFERENCE: DWMWINDOWATTRIBUTE = DWMWINDOWATTRIBUTE(33);
const DWMWCP_ROUND: u32 = 2;

type WindowProcFn = unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;
type GetDpiForWindowFn = unsafe extern "system" fn(HWND) -> u32;
type GetSystemMetricsForDpiFn = unsafe extern "system" fn(i32, u32) -> i32;

thread_local! {
    // One engine per UI thread: window procedures always run on the thread
    // that owns the window, so this is the table they will consult.
    static ENGINE: ChromeEngine<Win32WindowApi> =
        ChromeEngine::new(Win32WindowApi, ChromeConfig::default());
}

pub(crate) fn with_engine<T>(f: impl FnOnce(&ChromeEngine<Win32WindowApi>) -> T) -> T {
    ENGINE.with(f)
}

impl From<HWND> for WindowHandle {
    fn from(hwnd: HWND) -> Self {
        WindowHandle(hwnd.0 as isize)
    }
}

impl From<WindowHandle> for HWND {
    fn from(handle: WindowHandle) -> Self {
        HWND(handle.0 as *mut c_void)
    }
}

fn rect_from_win32(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

fn rect_to_win32(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn to_wndproc(procedure: ProcedureRef) -> WNDPROC {
    if procedure.is_null() {
        None
    } else {
        Some(unsafe { std::mem::transmute::<isize, WindowProcFn>(procedure.0) })
    }
}

/// Substituted procedure of a decorated frame.
unsafe extern "system" fn chrome_frame_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let raw = RawMessage::new(msg, wparam.0, lparam.0);
    match ENGINE.try_with(|engine| engine.handle_frame_message(hwnd.into(), raw)) {
        Ok(result) => LRESULT(result),
        // Thread is shutting down and the engine is gone.
        Err(_) => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// Substituted procedure of a frame's content child.
unsafe extern "system" fn chrome_child_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let raw = RawMessage::new(msg, wparam.0, lparam.0);
    match ENGINE.try_with(|engine| engine.handle_child_message(hwnd.into(), raw)) {
        Ok(result) => LRESULT(result),
        Err(_) => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

#[derive(Clone, Copy)]
struct DpiFunctions {
    get_dpi_for_window: Option<GetDpiForWindowFn>,
    get_system_metrics_for_dpi: Option<GetSystemMetricsForDpiFn>,
}

impl DpiFunctions {
    const LEGACY: DpiFunctions = DpiFunctions {
        get_dpi_for_window: None,
        get_system_metrics_for_dpi: None,
    };
}

/// Resolved on first use and never again; safe because the table is immutable.
fn dpi_functions() -> &'static DpiFunctions {
    static DPI_FUNCTIONS: OnceLock<DpiFunctions> = OnceLock::new();
    DPI_FUNCTIONS.get_or_init(resolve_dpi_functions)
}

fn resolve_dpi_functions() -> DpiFunctions {
    let module = match user32_module() {
        Ok(module) => module,
        Err(err) => {
            log::debug!("[Dpi] {err}; using legacy DPI queries");
            return DpiFunctions::LEGACY;
        }
    };

    let capabilities = resolve_dpi_capabilities(|name| user32_export(module, name).is_some());
    if capabilities.is_legacy() {
        log::debug!("[Dpi] per-monitor DPI exports unavailable; using legacy DPI queries");
    } else {
        log::debug!("[Dpi] resolved DPI capabilities: {capabilities:?}");
    }

    DpiFunctions {
        get_dpi_for_window: user32_export(module, EXPORT_GET_DPI_FOR_WINDOW)
            .map(|ptr| unsafe { std::mem::transmute::<*const c_void, GetDpiForWindowFn>(ptr) }),
        get_system_metrics_for_dpi: user32_export(module, EXPORT_GET_SYSTEM_METRICS_FOR_DPI).map(
            |ptr| unsafe { std::mem::transmute::<*const c_void, GetSystemMetricsForDpiFn>(ptr) },
        ),
    }
}

fn user32_module() -> PlatformResult<HMODULE> {
    let module = unsafe { GetModuleHandleW(w!("user32.dll")) }?;
    if module.is_invalid() {
        return Err(PlatformError::InitializationFailed(
            "user32.dll module handle is null".to_string(),
        ));
    }
    Ok(module)
}

fn user32_export(module: HMODULE, name: &str) -> Option<*const c_void> {
    let name = format!("{name}\0");
    unsafe { GetProcAddress(module, PCSTR(name.as_ptr())) }.map(|func| func as *const c_void)
}

fn device_context_dpi(hwnd: HWND) -> u32 {
    unsafe {
        let hdc = GetDC(Some(hwnd));
        if hdc.is_invalid() {
            return 0;
        }
        let dpi = GetDeviceCaps(Some(hdc), LOGPIXELSX);
        let _ = ReleaseDC(Some(hwnd), hdc);
        dpi.max(0) as u32
    }
}

fn metric_index(metric: SystemMetric) -> SYSTEM_METRICS_INDEX {
    match metric {
        SystemMetric::SizeFrameWidth => SM_CXSIZEFRAME,
        SystemMetric::SizeFrameHeight => SM_CYSIZEFRAME,
        SystemMetric::PaddedBorderWidth => SM_CXPADDEDBORDER,
    }
}

fn app_bar_edge(edge: ScreenEdge) -> u32 {
    match edge {
        ScreenEdge::Top => ABE_TOP,
        ScreenEdge::Bottom => ABE_BOTTOM,
        ScreenEdge::Left => ABE_LEFT,
        ScreenEdge::Right => ABE_RIGHT,
    }
}

fn to_margins(margins: Margins) -> MARGINS {
    MARGINS {
        cxLeftWidth: margins.left,
        cxRightWidth: margins.right,
        cyTopHeight: margins.top,
        cyBottomHeight: margins.bottom,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Win32WindowApi;

impl NativeWindowApi for Win32WindowApi {
    fn is_window(&self, handle: WindowHandle) -> bool {
        !handle.is_null() && unsafe { IsWindow(Some(handle.into())) }.as_bool()
    }

    fn is_owned_by_current_thread(&self, handle: WindowHandle) -> bool {
        unsafe { GetWindowThreadProcessId(handle.into(), None) == GetCurrentThreadId() }
    }

    fn frame_procedure(&self) -> ProcedureRef {
        #[allow(clippy::fn_to_numeric_cast)]
        ProcedureRef(chrome_frame_proc as isize)
    }

    fn child_procedure(&self) -> ProcedureRef {
        #[allow(clippy::fn_to_numeric_cast)]
        ProcedureRef(chrome_child_proc as isize)
    }

    fn window_procedure(&self, handle: WindowHandle) -> ProcedureRef {
        ProcedureRef(unsafe { GetWindowLongPtrW(handle.into(), GWLP_WNDPROC) })
    }

    fn replace_window_procedure(
        &self,
        handle: WindowHandle,
        procedure: ProcedureRef,
    ) -> ProcedureRef {
        ProcedureRef(unsafe { SetWindowLongPtrW(handle.into(), GWLP_WNDPROC, procedure.0) })
    }

    fn call_procedure(
        &self,
        procedure: ProcedureRef,
        handle: WindowHandle,
        msg: RawMessage,
    ) -> isize {
        let hwnd: HWND = handle.into();
        let (wparam, lparam) = (WPARAM(msg.wparam), LPARAM(msg.lparam));
        let result = match to_wndproc(procedure) {
            Some(proc_fn) => unsafe {
                CallWindowProcW(Some(proc_fn), hwnd, msg.msg, wparam, lparam)
            },
            None => unsafe { DefWindowProcW(hwnd, msg.msg, wparam, lparam) },
        };
        result.0
    }

    fn default_procedure(&self, handle: WindowHandle, msg: RawMessage) -> isize {
        unsafe {
            DefWindowProcW(
                handle.into(),
                msg.msg,
                WPARAM(msg.wparam),
                LPARAM(msg.lparam),
            )
        }
        .0
    }

    fn first_child(&self, handle: WindowHandle) -> Option<WindowHandle> {
        unsafe { GetWindow(handle.into(), GW_CHILD) }
            .ok()
            .filter(|child| !child.is_invalid())
            .map(WindowHandle::from)
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(handle.into(), &mut rect) }.ok()?;
        Some(rect_from_win32(rect))
    }

    fn is_maximized(&self, handle: WindowHandle) -> bool {
        unsafe { IsZoomed(handle.into()) }.as_bool()
    }

    fn monitor_rect(&self, handle: WindowHandle) -> Option<Rect> {
        unsafe {
            let monitor = MonitorFromWindow(handle.into(), MONITOR_DEFAULTTONEAREST);
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if GetMonitorInfoW(monitor, &mut info).as_bool() {
                Some(rect_from_win32(info.rcMonitor))
            } else {
                None
            }
        }
    }

    fn is_auto_hide_taskbar(&self, edge: ScreenEdge, monitor: Rect) -> bool {
        let mut data = APPBARDATA {
            cbSize: std::mem::size_of::<APPBARDATA>() as u32,
            uEdge: app_bar_edge(edge),
            rc: rect_to_win32(monitor),
            ..Default::default()
        };
        unsafe { SHAppBarMessage(ABM_GETAUTOHIDEBAR, &mut data) != 0 }
    }

    fn dpi_of(&self, handle: WindowHandle) -> u32 {
        let hwnd: HWND = handle.into();
        let per_window = dpi_functions()
            .get_dpi_for_window
            .map(|get_dpi| unsafe { get_dpi(hwnd) });
        dpi_or_fallback(per_window, || device_context_dpi(hwnd))
    }

    fn scaled_metric(&self, metric: SystemMetric, dpi: u32) -> i32 {
        let index = metric_index(metric);
        match dpi_functions().get_system_metrics_for_dpi {
            Some(metrics_for_dpi) => unsafe { metrics_for_dpi(index.0, dpi) },
            None => unsafe { GetSystemMetrics(index) },
        }
    }

    fn screen_to_client(&self, handle: WindowHandle, point: Point) -> Option<Point> {
        let mut pt = POINT {
            x: point.x,
            y: point.y,
        };
        if unsafe { ScreenToClient(handle.into(), &mut pt) }.as_bool() {
            Some(Point::new(pt.x, pt.y))
        } else {
            None
        }
    }

    fn cursor_position(&self) -> Option<Point> {
        let mut pt = POINT::default();
        unsafe { GetCursorPos(&mut pt) }.ok()?;
        Some(Point::new(pt.x, pt.y))
    }

    fn post_message(&self, handle: WindowHandle, msg: RawMessage) -> bool {
        unsafe {
            PostMessageW(
                Some(handle.into()),
                msg.msg,
                WPARAM(msg.wparam),
                LPARAM(msg.lparam),
            )
        }
        .is_ok()
    }

    fn release_capture(&self) {
        if let Err(err) = unsafe { ReleaseCapture() } {
            log::trace!("[Chrome] ReleaseCapture failed: {err:?}");
        }
    }

    fn extend_frame_into_client_area(&self, handle: WindowHandle, margins: Margins) {
        let margins = to_margins(margins);
        if let Err(err) = unsafe { DwmExtendFrameIntoClientArea(handle.into(), &margins) } {
            log::debug!("[Chrome] DwmExtendFrameIntoClientArea failed for {handle:?}: {err:?}");
        }
    }

    fn refresh_frame(&self, handle: WindowHandle) {
        let flags = SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE;
        if let Err(err) = unsafe { SetWindowPos(handle.into(), None, 0, 0, 0, 0, flags) } {
            log::debug!("[Chrome] SetWindowPos(SWP_FRAMECHANGED) failed for {handle:?}: {err:?}");
        }
    }

    fn request_rounded_corners(&self, handle: WindowHandle) {
        let preference = DWMWCP_ROUND;
        // Windows 10 rejects the attribute; square corners are the fallback.
        let _ = unsafe {
            DwmSetWindowAttribute(
                handle.into(),
                DWMWA_WINDOW_CORNER_PREFERENCE,
                &preference as *const _ as *const c_void,
                std::mem::size_of_val(&preference) as u32,
            )
        };
    }

    unsafe fn proposed_client_rect(&self, lparam: isize) -> Rect {
        let params = unsafe { &*(lparam as *const NCCALCSIZE_PARAMS) };
        rect_from_win32(params.rgrc[0])
    }

    unsafe fn set_proposed_client_rect(&self, lparam: isize, rect: Rect) {
        let params = unsafe { &mut *(lparam as *mut NCCALCSIZE_PARAMS) };
        params.rgrc[0] = rect_to_win32(rect);
    }
}
