/*
 * WM_NCCALCSIZE remapping.
 *
 * The default handler shrinks the proposed rectangle by the caption and the
 * borders. We put the top edge back so the client area extends under the
 * title bar, keeping the side and bottom borders the window manager computed.
 *
 * A maximized window overhangs the monitor by the frame border, so its top is
 * pushed back down by that amount. Edges that then coincide with a monitor
 * edge hosting an auto-hide taskbar give up a thin strip, otherwise the shell
 * treats the window as fullscreen and the taskbar can no longer be summoned.
 */
use crate::types::{Rect, ScreenEdge};

#[derive(Debug, Clone, Copy)]
pub(crate) struct MaximizedFrame {
    /// DPI-scaled sizing frame plus padded border.
    pub frame_inset: i32,
    pub monitor: Option<Rect>,
    pub auto_hide_inset: i32,
}

pub(crate) fn remap_client_rect(
    original_top: i32,
    computed: Rect,
    maximized: Option<MaximizedFrame>,
    is_auto_hide_taskbar: impl Fn(ScreenEdge, Rect) -> bool,
) -> Rect {
    let mut rect = computed;
    rect.top = original_top;

    let Some(frame) = maximized else {
        return rect;
    };

    rect.top += frame.frame_inset;

    if let Some(monitor) = frame.monitor {
        let inset = frame.auto_hide_inset;
        if rect.top == monitor.top && is_auto_hide_taskbar(ScreenEdge::Top, monitor) {
            rect.top += inset;
        }
        if rect.bottom == monitor.bottom && is_auto_hide_taskbar(ScreenEdge::Bottom, monitor) {
            rect.bottom -= inset;
        }
        if rect.left == monitor.left && is_auto_hide_taskbar(ScreenEdge::Left, monitor) {
            rect.left += inset;
        }
        if rect.right == monitor.right && is_auto_hide_taskbar(ScreenEdge::Right, monitor) {
            rect.right -= inset;
        }
    }

    rect
}
