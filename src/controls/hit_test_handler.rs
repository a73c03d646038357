/*
 * Non-client hit-test classification for a decorated frame.
 *
 * Pure: given the cursor, the window rectangle, the DPI-scaled resize border
 * and the window state, returns the zone the window manager should act on.
 * Corners are tested before edges, so a point inside two edge bands always
 * resolves to the corner.
 */
use crate::types::{Point, Rect, ResizeBorder};
use crate::window_common::{
    HTBOTTOM, HTBOTTOMLEFT, HTBOTTOMRIGHT, HTCAPTION, HTCLIENT, HTLEFT, HTRIGHT, HTTOP, HTTOPLEFT,
    HTTOPRIGHT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HitZone {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    /// The application-drawn title-bar band, reported as client area.
    TitleBar,
    /// The title-bar band reported as the native caption.
    Caption,
    Client,
}

impl HitZone {
    pub(crate) fn is_border(self) -> bool {
        !matches!(self, HitZone::TitleBar | HitZone::Caption | HitZone::Client)
    }

    /// The `HT*` code answered to `WM_NCHITTEST`.
    pub(crate) fn to_raw(self) -> isize {
        match self {
            HitZone::TopLeft => HTTOPLEFT,
            HitZone::Top => HTTOP,
            HitZone::TopRight => HTTOPRIGHT,
            HitZone::Left => HTLEFT,
            HitZone::Right => HTRIGHT,
            HitZone::BottomLeft => HTBOTTOMLEFT,
            HitZone::Bottom => HTBOTTOM,
            HitZone::BottomRight => HTBOTTOMRIGHT,
            HitZone::Caption => HTCAPTION,
            HitZone::TitleBar | HitZone::Client => HTCLIENT,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct HitTestInput {
    pub cursor: Point,
    pub window_rect: Rect,
    pub border: ResizeBorder,
    pub is_maximized: bool,
    pub title_bar_height_px: i32,
    pub native_caption: bool,
    pub force_client: bool,
}

pub(crate) fn classify(input: &HitTestInput) -> HitZone {
    let HitTestInput {
        cursor: pt,
        window_rect: rect,
        border,
        ..
    } = *input;

    // A maximized window has no resize affordance.
    if !input.is_maximized {
        let on_left = pt.x < rect.left + border.width;
        let on_right = pt.x >= rect.right - border.width;
        let on_top = pt.y < rect.top + border.height;
        let on_bottom = pt.y >= rect.bottom - border.height;

        let zone = match (on_top, on_bottom, on_left, on_right) {
            (true, _, true, _) => Some(HitZone::TopLeft),
            (true, _, _, true) => Some(HitZone::TopRight),
            (_, true, true, _) => Some(HitZone::BottomLeft),
            (_, true, _, true) => Some(HitZone::BottomRight),
            (_, _, true, _) => Some(HitZone::Left),
            (_, _, _, true) => Some(HitZone::Right),
            (true, _, _, _) => Some(HitZone::Top),
            (_, true, _, _) => Some(HitZone::Bottom),
            _ => None,
        };
        if let Some(zone) = zone {
            return zone;
        }
    }

    if pt.y < rect.top + input.title_bar_height_px {
        return if input.native_caption && !input.force_client {
            HitZone::Caption
        } else {
            HitZone::TitleBar
        };
    }

    HitZone::Client
}
