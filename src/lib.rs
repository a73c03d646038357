/*
 * Public entry point for the windeco crate: a window-chrome interception
 * layer that lets a Win32 application draw its own title bar while keeping
 * native resize borders, snapping, shadows and maximize behavior.
 *
 * The engine itself (`ChromeEngine`) and everything it decides with are
 * portable and tested against an in-memory window manager. The Win32 backend
 * and the thread-confined public facade in `app` compile only on Windows.
 */
#[cfg(target_os = "windows")]
pub mod app;
pub(crate) mod controls;
pub mod error;
pub mod interceptor;
pub mod native_api;
mod state_store;
#[cfg(test)]
mod test_support;
pub mod types;
#[cfg(target_os = "windows")]
mod win32;
pub(crate) mod window_common;

#[cfg(target_os = "windows")]
pub use app::ChromeInterface;
pub use error::{PlatformError, Result as PlatformResult};
pub use interceptor::ChromeEngine;
pub use native_api::NativeWindowApi;
pub use state_store::{DecorationCounters, DecorationDiagnostics};
pub use types::{
    ChromeConfig, Margins, Point, ProcedureRef, Rect, ResizeBorder, ScreenEdge, SystemMetric,
    WindowHandle,
};
pub use window_common::RawMessage;
