use crate::window_common::{
    HTCAPTION, WM_NCCALCSIZE, WM_NCDESTROY, WM_NCHITTEST, WM_NCLBUTTONDBLCLK, WM_NCLBUTTONDOWN,
    WM_NCMOUSEMOVE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameRoute {
    /// `WM_NCCALCSIZE` with a rectangle to remap.
    CalcClientArea,
    HitTest,
    /// Caption press: start the native modal move loop.
    CaptionPress,
    /// Caption double-click: native maximize/restore.
    CaptionDoubleClick,
    NonClientMouseMove,
    Destroy,
    Forward,
}

pub(crate) fn resolve_frame_route(msg: u32, wparam: usize) -> FrameRoute {
    let on_caption = wparam as isize == HTCAPTION;
    match msg {
        // A zero wparam asks only for the client rectangle; the default answer is fine.
        WM_NCCALCSIZE if wparam != 0 => FrameRoute::CalcClientArea,
        WM_NCHITTEST => FrameRoute::HitTest,
        WM_NCLBUTTONDOWN if on_caption => FrameRoute::CaptionPress,
        WM_NCLBUTTONDBLCLK if on_caption => FrameRoute::CaptionDoubleClick,
        WM_NCMOUSEMOVE => FrameRoute::NonClientMouseMove,
        WM_NCDESTROY => FrameRoute::Destroy,
        _ => FrameRoute::Forward,
    }
}
