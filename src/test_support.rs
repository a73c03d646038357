/*
 * In-memory window manager used by the unit tests.
 *
 * Every side effect the engine asks for is appended to an ordered event log,
 * so tests can assert both outcomes (which procedure is installed) and
 * ordering (what happened before the original handler saw WM_NCDESTROY).
 */
use crate::native_api::NativeWindowApi;
use crate::types::{Margins, Point, ProcedureRef, Rect, ScreenEdge, SystemMetric, WindowHandle};
use crate::window_common::{HTCLIENT, RawMessage, WM_NCCALCSIZE, WM_NCHITTEST};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub(crate) const FRAME_PROC: ProcedureRef = ProcedureRef(0xF000);
pub(crate) const CHILD_PROC: ProcedureRef = ProcedureRef(0xC000);

/// Result the mock "original" procedures return for anything they handle.
pub(crate) const ORIGINAL_RESULT: isize = 0x5A;

/// Non-client insets the mock default handler applies on WM_NCCALCSIZE.
pub(crate) const DEFAULT_NC_INSETS: Rect = Rect::new(8, 31, 8, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiEvent {
    ReplaceProcedure {
        handle: WindowHandle,
        procedure: ProcedureRef,
    },
    CallProcedure {
        procedure: ProcedureRef,
        handle: WindowHandle,
        msg: u32,
    },
    DefaultProcedure {
        handle: WindowHandle,
        msg: u32,
    },
    Post {
        handle: WindowHandle,
        msg: RawMessage,
    },
    ReleaseCapture,
    ExtendFrame {
        handle: WindowHandle,
        margins: Margins,
    },
    RefreshFrame {
        handle: WindowHandle,
    },
    RoundedCorners {
        handle: WindowHandle,
    },
}

#[derive(Debug, Clone)]
struct MockWindow {
    procedure: ProcedureRef,
    rect: Rect,
    maximized: bool,
    children: Vec<WindowHandle>,
    foreign_thread: bool,
    procedure_unreadable: bool,
}

#[derive(Debug)]
pub(crate) struct MockWindowApi {
    windows: RefCell<HashMap<WindowHandle, MockWindow>>,
    next_handle: Cell<isize>,
    events: RefCell<Vec<ApiEvent>>,
    metrics: RefCell<HashMap<SystemMetric, i32>>,
    dpi: Cell<u32>,
    cursor: Cell<Option<Point>>,
    monitor: Cell<Option<Rect>>,
    auto_hide_edges: RefCell<Vec<ScreenEdge>>,
    calc_params: RefCell<HashMap<isize, Rect>>,
    next_lparam: Cell<isize>,
}

impl MockWindowApi {
    pub(crate) fn new() -> Self {
        let metrics = HashMap::from([
            (SystemMetric::SizeFrameWidth, 4),
            (SystemMetric::SizeFrameHeight, 4),
            (SystemMetric::PaddedBorderWidth, 4),
        ]);
        Self {
            windows: RefCell::new(HashMap::new()),
            next_handle: Cell::new(0x100),
            events: RefCell::new(Vec::new()),
            metrics: RefCell::new(metrics),
            dpi: Cell::new(96),
            cursor: Cell::new(None),
            monitor: Cell::new(Some(Rect::new(0, 0, 1920, 1080))),
            auto_hide_edges: RefCell::new(Vec::new()),
            calc_params: RefCell::new(HashMap::new()),
            next_lparam: Cell::new(0x7000),
        }
    }

    pub(crate) fn add_window(&self, rect: Rect) -> WindowHandle {
        let handle = WindowHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 0x100);
        self.windows.borrow_mut().insert(
            handle,
            MockWindow {
                procedure: Self::native_procedure_of(handle),
                rect,
                maximized: false,
                children: Vec::new(),
                foreign_thread: false,
                procedure_unreadable: false,
            },
        );
        handle
    }

    pub(crate) fn add_child(&self, parent: WindowHandle) -> WindowHandle {
        let rect = self.window_rect(parent).unwrap_or_default();
        let child = self.add_window(rect);
        if let Some(window) = self.windows.borrow_mut().get_mut(&parent) {
            window.children.push(child);
        }
        child
    }

    /// The procedure a mock window starts out with.
    pub(crate) fn native_procedure_of(handle: WindowHandle) -> ProcedureRef {
        ProcedureRef(0x1_0000 + handle.0)
    }

    pub(crate) fn destroy_window(&self, handle: WindowHandle) {
        self.windows.borrow_mut().remove(&handle);
    }

    pub(crate) fn set_maximized(&self, handle: WindowHandle, maximized: bool) {
        if let Some(window) = self.windows.borrow_mut().get_mut(&handle) {
            window.maximized = maximized;
        }
    }

    pub(crate) fn set_foreign_thread(&self, handle: WindowHandle) {
        if let Some(window) = self.windows.borrow_mut().get_mut(&handle) {
            window.foreign_thread = true;
        }
    }

    /// Makes reads of `handle`'s procedure come back null.
    pub(crate) fn set_procedure_unreadable(&self, handle: WindowHandle) {
        if let Some(window) = self.windows.borrow_mut().get_mut(&handle) {
            window.procedure_unreadable = true;
        }
    }

    /// Lists an existing window as a child of `parent` as well.
    pub(crate) fn adopt_child(&self, parent: WindowHandle, child: WindowHandle) {
        if let Some(window) = self.windows.borrow_mut().get_mut(&parent) {
            window.children.push(child);
        }
    }

    /// Overrides a metric's value at 96 DPI.
    pub(crate) fn set_metric(&self, metric: SystemMetric, value: i32) {
        self.metrics.borrow_mut().insert(metric, value);
    }

    pub(crate) fn set_dpi(&self, dpi: u32) {
        self.dpi.set(dpi);
    }

    pub(crate) fn set_cursor(&self, cursor: Option<Point>) {
        self.cursor.set(cursor);
    }

    pub(crate) fn set_auto_hide_edges(&self, edges: &[ScreenEdge]) {
        *self.auto_hide_edges.borrow_mut() = edges.to_vec();
    }

    /// Registers an `NCCALCSIZE_PARAMS` stand-in and returns its lparam.
    pub(crate) fn calc_size_lparam(&self, proposed: Rect) -> isize {
        let lparam = self.next_lparam.get();
        self.next_lparam.set(lparam + 0x10);
        self.calc_params.borrow_mut().insert(lparam, proposed);
        lparam
    }

    pub(crate) fn calc_size_result(&self, lparam: isize) -> Option<Rect> {
        self.calc_params.borrow().get(&lparam).copied()
    }

    pub(crate) fn current_procedure(&self, handle: WindowHandle) -> ProcedureRef {
        self.window_procedure(handle)
    }

    pub(crate) fn events(&self) -> Vec<ApiEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    /// Position of the first event matching `predicate`.
    pub(crate) fn position_of(&self, predicate: impl Fn(&ApiEvent) -> bool) -> Option<usize> {
        self.events.borrow().iter().position(predicate)
    }

    fn record(&self, event: ApiEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl NativeWindowApi for MockWindowApi {
    fn is_window(&self, handle: WindowHandle) -> bool {
        self.windows.borrow().contains_key(&handle)
    }

    fn is_owned_by_current_thread(&self, handle: WindowHandle) -> bool {
        self.windows
            .borrow()
            .get(&handle)
            .is_some_and(|window| !window.foreign_thread)
    }

    fn frame_procedure(&self) -> ProcedureRef {
        FRAME_PROC
    }

    fn child_procedure(&self) -> ProcedureRef {
        CHILD_PROC
    }

    fn window_procedure(&self, handle: WindowHandle) -> ProcedureRef {
        self.windows
            .borrow()
            .get(&handle)
            .filter(|window| !window.procedure_unreadable)
            .map_or(ProcedureRef(0), |window| window.procedure)
    }

    fn replace_window_procedure(
        &self,
        handle: WindowHandle,
        procedure: ProcedureRef,
    ) -> ProcedureRef {
        self.record(ApiEvent::ReplaceProcedure { handle, procedure });
        match self.windows.borrow_mut().get_mut(&handle) {
            Some(window) => std::mem::replace(&mut window.procedure, procedure),
            None => ProcedureRef(0),
        }
    }

    fn call_procedure(
        &self,
        procedure: ProcedureRef,
        handle: WindowHandle,
        msg: RawMessage,
    ) -> isize {
        self.record(ApiEvent::CallProcedure {
            procedure,
            handle,
            msg: msg.msg,
        });
        match msg.msg {
            WM_NCCALCSIZE if msg.wparam != 0 => {
                if let Some(rect) = self.calc_params.borrow_mut().get_mut(&msg.lparam) {
                    rect.left += DEFAULT_NC_INSETS.left;
                    rect.top += DEFAULT_NC_INSETS.top;
                    rect.right -= DEFAULT_NC_INSETS.right;
                    rect.bottom -= DEFAULT_NC_INSETS.bottom;
                }
                ORIGINAL_RESULT
            }
            WM_NCHITTEST => HTCLIENT,
            _ => ORIGINAL_RESULT,
        }
    }

    fn default_procedure(&self, handle: WindowHandle, msg: RawMessage) -> isize {
        self.record(ApiEvent::DefaultProcedure {
            handle,
            msg: msg.msg,
        });
        0
    }

    fn first_child(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.windows
            .borrow()
            .get(&handle)
            .and_then(|window| window.children.first().copied())
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.windows.borrow().get(&handle).map(|window| window.rect)
    }

    fn is_maximized(&self, handle: WindowHandle) -> bool {
        self.windows
            .borrow()
            .get(&handle)
            .is_some_and(|window| window.maximized)
    }

    fn monitor_rect(&self, _handle: WindowHandle) -> Option<Rect> {
        self.monitor.get()
    }

    fn is_auto_hide_taskbar(&self, edge: ScreenEdge, _monitor: Rect) -> bool {
        self.auto_hide_edges.borrow().contains(&edge)
    }

    fn dpi_of(&self, _handle: WindowHandle) -> u32 {
        self.dpi.get()
    }

    fn scaled_metric(&self, metric: SystemMetric, dpi: u32) -> i32 {
        let base = self.metrics.borrow().get(&metric).copied().unwrap_or(0);
        base * dpi as i32 / 96
    }

    fn screen_to_client(&self, handle: WindowHandle, point: Point) -> Option<Point> {
        // Mock windows have no non-client area: the client origin is the window origin.
        self.window_rect(handle)
            .map(|rect| Point::new(point.x - rect.left, point.y - rect.top))
    }

    fn cursor_position(&self) -> Option<Point> {
        self.cursor.get()
    }

    fn post_message(&self, handle: WindowHandle, msg: RawMessage) -> bool {
        self.record(ApiEvent::Post { handle, msg });
        self.is_window(handle)
    }

    fn release_capture(&self) {
        self.record(ApiEvent::ReleaseCapture);
    }

    fn extend_frame_into_client_area(&self, handle: WindowHandle, margins: Margins) {
        self.record(ApiEvent::ExtendFrame { handle, margins });
    }

    fn refresh_frame(&self, handle: WindowHandle) {
        self.record(ApiEvent::RefreshFrame { handle });
    }

    fn request_rounded_corners(&self, handle: WindowHandle) {
        self.record(ApiEvent::RoundedCorners { handle });
    }

    unsafe fn proposed_client_rect(&self, lparam: isize) -> Rect {
        self.calc_params
            .borrow()
            .get(&lparam)
            .copied()
            .unwrap_or_default()
    }

    unsafe fn set_proposed_client_rect(&self, lparam: isize, rect: Rect) {
        self.calc_params.borrow_mut().insert(lparam, rect);
    }
}
