/*
 * DPI resolution helpers.
 *
 * The per-monitor DPI exports of user32 are looked up once per process by the
 * Win32 backend; this module holds the portable half: which capabilities were
 * found, how a missing capability degrades, and the DPI-scaled resize border
 * every hit-test and remap decision is based on.
 */
// Capability probing is driven by the Win32 backend.
#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

use crate::native_api::NativeWindowApi;
use crate::types::{ResizeBorder, SystemMetric, WindowHandle};

pub(crate) const BASE_DPI: u32 = 96;

pub(crate) const EXPORT_GET_DPI_FOR_WINDOW: &str = "GetDpiForWindow";
pub(crate) const EXPORT_GET_SYSTEM_METRICS_FOR_DPI: &str = "GetSystemMetricsForDpi";

/// Which per-monitor DPI exports the running OS provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct DpiCapabilities {
    pub per_window_dpi: bool,
    pub metrics_for_dpi: bool,
}

impl DpiCapabilities {
    pub(crate) fn is_legacy(self) -> bool {
        !self.per_window_dpi && !self.metrics_for_dpi
    }
}

pub(crate) fn resolve_dpi_capabilities(has_export: impl Fn(&str) -> bool) -> DpiCapabilities {
    DpiCapabilities {
        per_window_dpi: has_export(EXPORT_GET_DPI_FOR_WINDOW),
        metrics_for_dpi: has_export(EXPORT_GET_SYSTEM_METRICS_FOR_DPI),
    }
}

/*
 * Picks the per-window DPI when available, else the device-context DPI.
 * A zero from either source (window being torn down, no display) reads as 96.
 */
pub(crate) fn dpi_or_fallback(per_window: Option<u32>, legacy: impl FnOnce() -> u32) -> u32 {
    let dpi = match per_window {
        Some(dpi) => dpi,
        None => legacy(),
    };
    if dpi == 0 { BASE_DPI } else { dpi }
}

pub(crate) fn scale_factor_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / BASE_DPI as f32
}

/// Sizing frame plus padded border, per axis, at the window's current DPI.
pub(crate) fn resize_border<A: NativeWindowApi>(api: &A, handle: WindowHandle) -> ResizeBorder {
    let dpi = api.dpi_of(handle);
    resize_border_for_dpi(api, dpi)
}

pub(crate) fn resize_border_for_dpi<A: NativeWindowApi>(api: &A, dpi: u32) -> ResizeBorder {
    let padded = api.scaled_metric(SystemMetric::PaddedBorderWidth, dpi);
    ResizeBorder {
        width: api.scaled_metric(SystemMetric::SizeFrameWidth, dpi) + padded,
        height: api.scaled_metric(SystemMetric::SizeFrameHeight, dpi) + padded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockWindowApi;

    #[test]
    fn resolve_dpi_capabilities_detects_each_export() {
        let caps = resolve_dpi_capabilities(|name| name == EXPORT_GET_DPI_FOR_WINDOW);
        assert!(caps.per_window_dpi);
        assert!(!caps.metrics_for_dpi);
        assert!(!caps.is_legacy());

        let legacy = resolve_dpi_capabilities(|_| false);
        assert!(legacy.is_legacy());
    }

    #[test]
    fn dpi_falls_back_to_device_context_when_per_window_query_is_missing() {
        assert_eq!(dpi_or_fallback(Some(144), || unreachable!()), 144);
        assert_eq!(dpi_or_fallback(None, || 120), 120);
        assert_eq!(dpi_or_fallback(None, || 0), BASE_DPI);
        assert_eq!(dpi_or_fallback(Some(0), || 120), BASE_DPI);
    }

    #[test]
    fn resize_border_sums_frame_and_padding() {
        let api = MockWindowApi::new();
        api.set_metric(SystemMetric::SizeFrameWidth, 4);
        api.set_metric(SystemMetric::SizeFrameHeight, 5);
        api.set_metric(SystemMetric::PaddedBorderWidth, 4);

        let border = resize_border_for_dpi(&api, 96);

        assert_eq!(border, ResizeBorder { width: 8, height: 9 });
    }

    #[test]
    fn resize_border_scales_with_dpi() {
        let api = MockWindowApi::new();
        let handle = api.add_window(crate::types::Rect::new(0, 0, 800, 600));
        api.set_dpi(192);

        let border = resize_border(&api, handle);

        // Mock metrics are 4 + 4 at 96 DPI and scale linearly.
        assert_eq!(border, ResizeBorder { width: 16, height: 16 });
        assert_eq!(scale_factor_for_dpi(192), 2.0);
    }
}
