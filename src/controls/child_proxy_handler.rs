/*
 * Hit-test transparency for the frame's content child.
 *
 * A full-bleed child (the host's render surface) would otherwise answer
 * WM_NCHITTEST itself and swallow the top resize band. Inside that band the
 * child answers HTTRANSPARENT so the window manager retries against the
 * frame, whose classifier then reports Top / TopLeft / TopRight. Everywhere
 * else the child keeps its own answer, so title-bar clicks still reach the
 * host UI layer.
 */
use crate::types::{Point, Rect};

pub(crate) fn passes_through_to_frame(
    cursor: Point,
    frame_rect: Rect,
    border_height: i32,
    frame_maximized: bool,
) -> bool {
    !frame_maximized && cursor.y < frame_rect.top + border_height
}
