/*
 * Public entry point for applications hosting a decorated window.
 *
 * `ChromeInterface` is a thin handle onto the engine owned by the calling
 * thread, which must be the thread running the window's message loop. The
 * handle is `!Send`, so it cannot be moved to a thread whose engine would
 * never see the window's messages. Windows can be passed either as
 * `WindowHandle` or as a windows-rs `HWND`.
 */
use crate::error::Result as PlatformResult;
use crate::state_store::DecorationDiagnostics;
use crate::types::{ChromeConfig, WindowHandle};
use crate::win32::with_engine;
use std::marker::PhantomData;

#[derive(Debug)]
pub struct ChromeInterface {
    _thread_bound: PhantomData<*const ()>,
}

impl Default for ChromeInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromeInterface {
    pub fn new() -> Self {
        log::debug!("[Chrome] interface created on thread {:?}", std::thread::current().id());
        Self {
            _thread_bound: PhantomData,
        }
    }

    /// Creates the interface and applies `config` to this thread's engine.
    pub fn with_config(config: ChromeConfig) -> Self {
        let interface = Self::new();
        interface.configure(config);
        interface
    }

    /// Subclasses `window` (and its first child) so the application can draw
    /// its own title bar of `title_bar_height_px` physical pixels. Calling it
    /// again for an already decorated window only updates the height.
    pub fn install(
        &self,
        window: impl Into<WindowHandle>,
        title_bar_height_px: i32,
    ) -> PlatformResult<()> {
        let handle = window.into();
        with_engine(|engine| engine.install(handle, title_bar_height_px))
    }

    /// Restores the original procedures and the default frame. No-op for
    /// windows that were never decorated.
    pub fn uninstall(&self, window: impl Into<WindowHandle>) {
        let handle = window.into();
        with_engine(|engine| engine.uninstall(handle));
    }

    pub fn set_title_bar_height(&self, window: impl Into<WindowHandle>, px: i32) {
        let handle = window.into();
        with_engine(|engine| engine.set_title_bar_height(handle, px));
    }

    pub fn set_force_client_hit_test(&self, window: impl Into<WindowHandle>, enabled: bool) {
        let handle = window.into();
        with_engine(|engine| engine.set_force_client_hit_test(handle, enabled));
    }

    /// Starts a system-driven window move from the current cursor position,
    /// as if the user had pressed the mouse on a native caption.
    pub fn begin_interactive_move(&self, window: impl Into<WindowHandle>) {
        let handle = window.into();
        with_engine(|engine| engine.begin_interactive_move(handle));
    }

    pub fn debug_snapshot(&self, window: impl Into<WindowHandle>) -> String {
        let handle = window.into();
        with_engine(|engine| engine.debug_snapshot(handle))
    }

    pub fn diagnostics(&self, window: impl Into<WindowHandle>) -> Option<DecorationDiagnostics> {
        let handle = window.into();
        with_engine(|engine| engine.diagnostics(handle))
    }

    /// Requests rounded corners where the compositor supports them.
    pub fn apply_dialog_style(&self, window: impl Into<WindowHandle>) {
        let handle = window.into();
        with_engine(|engine| engine.apply_dialog_style(handle));
    }

    /// DPI of `window` relative to 96.
    pub fn scale_factor(&self, window: impl Into<WindowHandle>) -> f32 {
        let handle = window.into();
        with_engine(|engine| engine.scale_factor(handle))
    }

    /// Replaces this thread's engine configuration. Takes effect for the next
    /// message handled; already decorated windows are not refreshed.
    pub fn configure(&self, config: ChromeConfig) {
        with_engine(|engine| engine.set_config(config));
    }

    pub fn config(&self) -> ChromeConfig {
        with_engine(|engine| engine.config())
    }

    pub fn is_installed(&self, window: impl Into<WindowHandle>) -> bool {
        let handle = window.into();
        with_engine(|engine| engine.is_installed(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_applies_to_this_threads_engine() {
        // Arrange
        let interface = ChromeInterface::new();
        let config = ChromeConfig {
            native_caption: true,
            ..ChromeConfig::default()
        };
        // Act
        interface.configure(config);
        // Assert
        assert_eq!(interface.config(), config);
        assert_eq!(ChromeInterface::new().config(), config);
    }

    #[test]
    fn snapshot_for_undecorated_handle_reports_no_state() {
        let interface = ChromeInterface::default();

        assert!(!interface.is_installed(WindowHandle(0x1234)));
        assert_eq!(
            interface.debug_snapshot(WindowHandle(0x1234)),
            "NO STATE for hwnd=0x1234"
        );
    }
}
