/*
 * The chrome interception engine.
 *
 * `ChromeEngine` substitutes the window procedure of a frame (and of its
 * first content child), keeps one state record per substituted window, and
 * answers the non-client messages that make an application-drawn title bar
 * behave like a native one. Everything else is forwarded to the procedure
 * that was installed before us.
 *
 * Re-entrancy: the original procedure, the default procedure and most window
 * manager calls can dispatch nested messages back into this engine. State is
 * therefore only ever borrowed inside short closures; values needed after a
 * call out are copied first.
 */
use crate::controls::{
    child_proxy_handler::passes_through_to_frame,
    dpi_handler::{resize_border, scale_factor_for_dpi},
    hit_test_handler::{HitTestInput, HitZone, classify},
    message_router::{FrameRoute, resolve_frame_route},
    nc_calc_handler::{MaximizedFrame, remap_client_rect},
};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::native_api::NativeWindowApi;
use crate::state_store::{ChildLinkState, DecorationDiagnostics, DecorationState, StateStore};
use crate::types::{ChromeConfig, Margins, Point, ProcedureRef, WindowHandle};
use crate::window_common::{
    HTCAPTION, HTCLIENT, HTTRANSPARENT, RawMessage, WM_MOUSEMOVE, WM_NCCALCSIZE, WM_NCDESTROY,
    WM_NCHITTEST, WM_NCLBUTTONDOWN, make_lparam, signed_hiword_from_lparam,
    signed_loword_from_lparam,
};
use std::cell::Cell;

pub struct ChromeEngine<A: NativeWindowApi> {
    api: A,
    config: Cell<ChromeConfig>,
    frames: StateStore<DecorationState>,
    children: StateStore<ChildLinkState>,
}

impl<A: NativeWindowApi> ChromeEngine<A> {
    pub fn new(api: A, config: ChromeConfig) -> Self {
        Self {
            api,
            config: Cell::new(config),
            frames: StateStore::new(),
            children: StateStore::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> ChromeConfig {
        self.config.get()
    }

    /// Takes effect on the next message for every decorated window.
    pub fn set_config(&self, config: ChromeConfig) {
        self.config.set(config);
    }

    pub fn is_installed(&self, handle: WindowHandle) -> bool {
        self.frames.contains(handle)
    }

    pub fn delegated_child(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.frames.with_record(handle, |state| state.child).flatten()
    }

    /*
     * Decorates `handle`. A second call for an installed window only updates
     * the title-bar height; the procedure is never substituted twice.
     */
    pub fn install(&self, handle: WindowHandle, title_bar_height_px: i32) -> PlatformResult<()> {
        log::debug!("[Chrome] install for {handle:?}, title bar height {title_bar_height_px}px");

        if handle.is_null() || !self.api.is_window(handle) {
            log::warn!("[Chrome] install: {handle:?} is null or not a live window");
            return Err(PlatformError::InvalidHandle(format!(
                "{handle:?} is null or not a live window"
            )));
        }
        if !self.api.is_owned_by_current_thread(handle) {
            log::warn!("[Chrome] install: {handle:?} belongs to another thread's message loop");
            return Err(PlatformError::OperationFailed(format!(
                "install for {handle:?} must run on the thread that owns the window"
            )));
        }

        let updated = self.frames.with_record_mut(handle, |state| {
            state.title_bar_height_px = title_bar_height_px;
        });
        if updated.is_some() {
            log::debug!("[Chrome] {handle:?} already decorated; updated title bar height");
            return Ok(());
        }

        // The record must exist before the substitution so the first message
        // routed to our procedure finds it.
        let original = self.api.window_procedure(handle);
        self.frames
            .attach(handle, DecorationState::new(original, title_bar_height_px));

        let ours = self.api.frame_procedure();
        let previous = self.api.replace_window_procedure(handle, ours);
        if previous != original {
            log::warn!(
                "[Chrome] {handle:?}: procedure changed during install (read {original:?}, replaced {previous:?})"
            );
        }
        let current = self.api.window_procedure(handle);
        if current != ours {
            log::warn!(
                "[Chrome] {handle:?}: procedure substitution did not take (current {current:?}, expected {ours:?})"
            );
        }

        if let Some(child) = self.delegate_child(handle) {
            self.frames.with_record_mut(handle, |state| state.child = Some(child));
        }

        let shadow = self.config.get().shadow_margin_px;
        self.api
            .extend_frame_into_client_area(handle, Margins::bottom_only(shadow));
        self.api.refresh_frame(handle);

        log::debug!("[Chrome] install complete for {handle:?}");
        Ok(())
    }

    fn delegate_child(&self, frame: WindowHandle) -> Option<WindowHandle> {
        let Some(child) = self.api.first_child(frame) else {
            log::debug!("[ChildProxy] {frame:?} has no child window; skipping delegation");
            return None;
        };
        if self.children.contains(child) {
            log::debug!("[ChildProxy] {child:?} is already delegated; skipping");
            return None;
        }

        let original = self.api.window_procedure(child);
        if original.is_null() {
            log::debug!("[ChildProxy] could not read the procedure of {child:?}; skipping");
            return None;
        }

        self.children
            .attach(child, ChildLinkState::new(original, frame));
        self.api
            .replace_window_procedure(child, self.api.child_procedure());
        log::debug!("[ChildProxy] delegated {child:?} of {frame:?} (original {original:?})");
        Some(child)
    }

    /// Reverses `install`. No-op for windows that are not decorated.
    pub fn uninstall(&self, handle: WindowHandle) {
        if self.teardown(handle).is_none() {
            return;
        }
        if self.api.is_window(handle) {
            self.api
                .extend_frame_into_client_area(handle, Margins::ZERO);
            self.api.refresh_frame(handle);
        }
        log::debug!("[Chrome] uninstalled from {handle:?}");
    }

    /*
     * Restores the child (if any) strictly before the frame: restoring the
     * frame may produce layout messages that expect the child to be native.
     */
    fn teardown(&self, frame: WindowHandle) -> Option<DecorationState> {
        let child = self.frames.with_record(frame, |state| state.child)?;
        if let Some(child) = child {
            self.restore_child(child);
        }

        let state = self.frames.detach(frame)?;
        if self.api.is_window(frame) {
            self.restore_procedure(frame, self.api.frame_procedure(), state.original_procedure());
        }
        Some(state)
    }

    fn restore_child(&self, child: WindowHandle) {
        let Some(link) = self.children.detach(child) else {
            return;
        };
        if self.api.is_window(child) {
            self.restore_procedure(child, self.api.child_procedure(), link.original_procedure());
        }
        log::debug!("[ChildProxy] restored {child:?}");
    }

    fn restore_procedure(&self, handle: WindowHandle, ours: ProcedureRef, original: ProcedureRef) {
        let current = self.api.window_procedure(handle);
        if current != ours {
            log::warn!(
                "[Chrome] {handle:?} was subclassed again after install ({current:?}); restoring anyway"
            );
        }
        self.api.replace_window_procedure(handle, original);
    }

    pub fn set_title_bar_height(&self, handle: WindowHandle, px: i32) {
        self.frames
            .with_record_mut(handle, |state| state.title_bar_height_px = px);
    }

    pub fn set_force_client_hit_test(&self, handle: WindowHandle, enabled: bool) {
        self.frames
            .with_record_mut(handle, |state| state.force_client_hit_test = enabled);
    }

    /*
     * Hands an unconsumed title-bar press to the window manager's modal move
     * loop. The caption press is posted, never sent: the loop starts on the
     * next pump cycle instead of re-entering the current handler.
     */
    pub fn begin_interactive_move(&self, handle: WindowHandle) {
        if handle.is_null() || !self.api.is_window(handle) {
            return;
        }
        let Some(cursor) = self.api.cursor_position() else {
            log::debug!("[Chrome] begin_interactive_move: cursor position unavailable");
            return;
        };
        let msg = RawMessage::new(
            WM_NCLBUTTONDOWN,
            HTCAPTION as usize,
            make_lparam(cursor.x, cursor.y),
        );
        if !self.api.post_message(handle, msg) {
            log::debug!("[Chrome] begin_interactive_move: post to {handle:?} failed");
        }
    }

    pub fn diagnostics(&self, handle: WindowHandle) -> Option<DecorationDiagnostics> {
        self.frames
            .with_record(handle, |state| state.diagnostics(handle))
    }

    pub fn debug_snapshot(&self, handle: WindowHandle) -> String {
        match self.diagnostics(handle) {
            Some(diagnostics) => diagnostics.to_string(),
            None => format!("NO STATE for hwnd={:#x}", handle.0),
        }
    }

    /// Rounded corners and a drop shadow for an undecorated popup dialog.
    pub fn apply_dialog_style(&self, handle: WindowHandle) {
        if handle.is_null() || !self.api.is_window(handle) {
            return;
        }
        self.api.request_rounded_corners(handle);
        let shadow = self.config.get().shadow_margin_px;
        self.api
            .extend_frame_into_client_area(handle, Margins::bottom_only(shadow));
    }

    pub fn scale_factor(&self, handle: WindowHandle) -> f32 {
        scale_factor_for_dpi(self.api.dpi_of(handle))
    }

    /// Entry point of the substituted frame procedure.
    pub fn handle_frame_message(&self, handle: WindowHandle, msg: RawMessage) -> isize {
        let original = self.frames.with_record_mut(handle, |state| {
            state.counters.messages = state.counters.messages.wrapping_add(1);
            if msg.msg == WM_NCCALCSIZE {
                state.counters.calc_size = state.counters.calc_size.wrapping_add(1);
            }
            state.original_procedure()
        });
        let Some(original) = original else {
            log::trace!("[Chrome] message {:#06x} for undecorated {handle:?}", msg.msg);
            return self.api.default_procedure(handle, msg);
        };

        match resolve_frame_route(msg.msg, msg.wparam) {
            FrameRoute::CalcClientArea => self.on_calc_client_area(handle, original, msg),
            FrameRoute::HitTest => self.on_hit_test(handle, msg),
            FrameRoute::CaptionPress => {
                // The previous procedure may swallow the press; only the system
                // default starts the native drag/snap loop reliably.
                self.api.release_capture();
                self.api.default_procedure(handle, msg)
            }
            FrameRoute::CaptionDoubleClick => self.api.default_procedure(handle, msg),
            FrameRoute::NonClientMouseMove => {
                self.forward_pointer_move(handle, msg);
                self.api.call_procedure(original, handle, msg)
            }
            FrameRoute::Destroy => {
                log::debug!("[Chrome] WM_NCDESTROY for {handle:?}; tearing down");
                self.teardown(handle);
                self.api.call_procedure(original, handle, msg)
            }
            FrameRoute::Forward => self.api.call_procedure(original, handle, msg),
        }
    }

    fn on_calc_client_area(&self, handle: WindowHandle, original: ProcedureRef, msg: RawMessage) -> isize {
        // SAFETY: routed only for WM_NCCALCSIZE with a non-zero wparam, which
        // is being dispatched right now.
        let original_top = unsafe { self.api.proposed_client_rect(msg.lparam) }.top;
        let result = self.api.call_procedure(original, handle, msg);
        let computed = unsafe { self.api.proposed_client_rect(msg.lparam) };

        let maximized = self.api.is_maximized(handle).then(|| MaximizedFrame {
            frame_inset: resize_border(&self.api, handle).height,
            monitor: self.api.monitor_rect(handle),
            auto_hide_inset: self.config.get().auto_hide_taskbar_inset_px,
        });

        let remapped = remap_client_rect(original_top, computed, maximized, |edge, monitor| {
            self.api.is_auto_hide_taskbar(edge, monitor)
        });
        unsafe { self.api.set_proposed_client_rect(msg.lparam, remapped) };
        result
    }

    /*
     * Answered entirely here; the original procedure never sees a hit test.
     * Without a window rectangle or state there is nothing to classify, so the
     * classifier's default zone is returned.
     */
    fn on_hit_test(&self, handle: WindowHandle, msg: RawMessage) -> isize {
        let Some(window_rect) = self.api.window_rect(handle) else {
            log::trace!("[Chrome] no window rect for {handle:?}; hit test reports client");
            return HTCLIENT;
        };
        let Some((title_bar_height_px, force_client)) = self.frames.with_record(handle, |state| {
            (state.title_bar_height_px, state.force_client_hit_test)
        }) else {
            return HTCLIENT;
        };

        let cursor = Point::new(
            signed_loword_from_lparam(msg.lparam),
            signed_hiword_from_lparam(msg.lparam),
        );
        let zone = classify(&HitTestInput {
            cursor,
            window_rect,
            border: resize_border(&self.api, handle),
            is_maximized: self.api.is_maximized(handle),
            title_bar_height_px,
            native_caption: self.config.get().native_caption,
            force_client,
        });

        self.frames.with_record_mut(handle, |state| {
            let counters = &mut state.counters;
            counters.hit_tests = counters.hit_tests.wrapping_add(1);
            counters.last_cursor_y = cursor.y;
            counters.last_window_top = window_rect.top;
            if zone.is_border() {
                counters.border_hits = counters.border_hits.wrapping_add(1);
            } else if zone == HitZone::Caption {
                counters.caption_hits = counters.caption_hits.wrapping_add(1);
            } else {
                counters.client_hits = counters.client_hits.wrapping_add(1);
            }
        });

        zone.to_raw()
    }

    /*
     * The host UI layer tracks the pointer from client mouse moves only, so
     * non-client moves are mirrored as a posted WM_MOUSEMOVE in client
     * coordinates.
     */
    fn forward_pointer_move(&self, handle: WindowHandle, msg: RawMessage) {
        let screen = Point::new(
            signed_loword_from_lparam(msg.lparam),
            signed_hiword_from_lparam(msg.lparam),
        );
        if let Some(local) = self.api.screen_to_client(handle, screen) {
            let mouse_move = RawMessage::new(WM_MOUSEMOVE, 0, make_lparam(local.x, local.y));
            self.api.post_message(handle, mouse_move);
        }
    }

    /// Entry point of the substituted child procedure.
    pub fn handle_child_message(&self, child: WindowHandle, msg: RawMessage) -> isize {
        let Some(link) = self.children.lookup(child) else {
            log::trace!("[ChildProxy] message {:#06x} for undelegated {child:?}", msg.msg);
            return self.api.default_procedure(child, msg);
        };

        match msg.msg {
            WM_NCHITTEST if self.child_passes_through(link.parent, msg.lparam) => HTTRANSPARENT,
            WM_NCDESTROY => {
                self.restore_child(child);
                self.frames.with_record_mut(link.parent, |state| {
                    if state.child == Some(child) {
                        state.child = None;
                    }
                });
                self.api
                    .call_procedure(link.original_procedure(), child, msg)
            }
            _ => self
                .api
                .call_procedure(link.original_procedure(), child, msg),
        }
    }

    fn child_passes_through(&self, parent: WindowHandle, lparam: isize) -> bool {
        if !self.frames.contains(parent) {
            return false;
        }
        let maximized = self.api.is_maximized(parent);
        let Some(parent_rect) = self.api.window_rect(parent) else {
            return false;
        };
        let cursor = Point::new(
            signed_loword_from_lparam(lparam),
            signed_hiword_from_lparam(lparam),
        );
        let border_height = resize_border(&self.api, parent).height;
        passes_through_to_frame(cursor, parent_rect, border_height, maximized)
    }
}
