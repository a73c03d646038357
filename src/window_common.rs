/*
 * Common window-message vocabulary shared by the engine and its backends.
 *
 * The numeric values are the Win32 ones. They are declared here rather than
 * imported from windows-rs so that message routing and hit-test logic stay
 * portable and unit-testable off Windows.
 */

// Window messages the engine intercepts or synthesizes.
pub(crate) const WM_NCDESTROY: u32 = 0x0082;
pub(crate) const WM_NCCALCSIZE: u32 = 0x0083;
pub(crate) const WM_NCHITTEST: u32 = 0x0084;
pub(crate) const WM_NCMOUSEMOVE: u32 = 0x00A0;
pub(crate) const WM_NCLBUTTONDOWN: u32 = 0x00A1;
pub(crate) const WM_NCLBUTTONDBLCLK: u32 = 0x00A3;
pub(crate) const WM_MOUSEMOVE: u32 = 0x0200;

// Hit-test results returned from WM_NCHITTEST.
pub(crate) const HTTRANSPARENT: isize = -1;
pub(crate) const HTCLIENT: isize = 1;
pub(crate) const HTCAPTION: isize = 2;
pub(crate) const HTLEFT: isize = 10;
pub(crate) const HTRIGHT: isize = 11;
pub(crate) const HTTOP: isize = 12;
pub(crate) const HTTOPLEFT: isize = 13;
pub(crate) const HTTOPRIGHT: isize = 14;
pub(crate) const HTBOTTOM: isize = 15;
pub(crate) const HTBOTTOMLEFT: isize = 16;
pub(crate) const HTBOTTOMRIGHT: isize = 17;

/// One message as delivered to a window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub const fn new(msg: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            msg,
            wparam,
            lparam,
        }
    }
}

// Coordinates in mouse messages are signed 16-bit words; multi-monitor
// layouts routinely produce negative screen positions.
#[inline]
pub(crate) fn signed_loword_from_lparam(lparam: isize) -> i32 {
    (lparam & 0xFFFF) as u16 as i16 as i32
}
#[inline]
pub(crate) fn signed_hiword_from_lparam(lparam: isize) -> i32 {
    ((lparam >> 16) & 0xFFFF) as u16 as i16 as i32
}

/// Equivalent of `MAKELPARAM(x, y)`.
#[inline]
pub(crate) fn make_lparam(x: i32, y: i32) -> isize {
    let packed = ((y as u16 as u32) << 16) | (x as u16 as u32);
    packed as isize
}
