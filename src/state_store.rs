/*
 * Per-window state for decorated frames and their delegated children.
 *
 * Records are kept in a table keyed by the native handle. A record lives from
 * `attach` to the matching `detach`, independently of whether the handle is
 * still valid; detaching an unknown (or already destroyed) handle is a no-op.
 *
 * The table uses `RefCell` and is therefore `!Sync`: it belongs to the thread
 * running the window's message loop. Borrows are never held across calls into
 * the window manager, because those calls can re-enter the engine with nested
 * messages for the same window.
 */
use crate::types::{ProcedureRef, WindowHandle};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Diagnostic counters; they never influence behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecorationCounters {
    pub messages: u32,
    pub calc_size: u32,
    pub hit_tests: u32,
    pub caption_hits: u32,
    pub client_hits: u32,
    pub border_hits: u32,
    pub last_cursor_y: i32,
    pub last_window_top: i32,
}

/// State attached to a decorated frame window.
#[derive(Debug, Clone)]
pub(crate) struct DecorationState {
    original_procedure: ProcedureRef,
    pub title_bar_height_px: i32,
    pub force_client_hit_test: bool,
    pub child: Option<WindowHandle>,
    pub counters: DecorationCounters,
}

impl DecorationState {
    pub(crate) fn new(original_procedure: ProcedureRef, title_bar_height_px: i32) -> Self {
        Self {
            original_procedure,
            title_bar_height_px,
            force_client_hit_test: false,
            child: None,
            counters: DecorationCounters::default(),
        }
    }

    /// Captured once at install and never replaced.
    pub(crate) fn original_procedure(&self) -> ProcedureRef {
        self.original_procedure
    }

    pub(crate) fn diagnostics(&self, handle: WindowHandle) -> DecorationDiagnostics {
        DecorationDiagnostics {
            handle,
            counters: self.counters,
            title_bar_height_px: self.title_bar_height_px,
            force_client_hit_test: self.force_client_hit_test,
        }
    }
}

/// State attached to the delegated content child of a frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChildLinkState {
    original_procedure: ProcedureRef,
    pub parent: WindowHandle,
}

impl ChildLinkState {
    pub(crate) fn new(original_procedure: ProcedureRef, parent: WindowHandle) -> Self {
        Self {
            original_procedure,
            parent,
        }
    }

    pub(crate) fn original_procedure(&self) -> ProcedureRef {
        self.original_procedure
    }
}

/// Snapshot rendered by `debug_snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationDiagnostics {
    pub handle: WindowHandle,
    pub counters: DecorationCounters,
    pub title_bar_height_px: i32,
    pub force_client_hit_test: bool,
}

impl fmt::Display for DecorationDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        write!(
            f,
            "anyMsg={} nccalcsize={} hitTest={} caption={} client={} border={} \
             tbH={} lastPtY={} lastWinTop={} forced={}",
            c.messages,
            c.calc_size,
            c.hit_tests,
            c.caption_hits,
            c.client_hits,
            c.border_hits,
            self.title_bar_height_px,
            c.last_cursor_y,
            c.last_window_top,
            self.force_client_hit_test as i32
        )
    }
}

#[derive(Debug)]
pub(crate) struct StateStore<R> {
    records: RefCell<HashMap<WindowHandle, R>>,
}

impl<R> Default for StateStore<R> {
    fn default() -> Self {
        Self {
            records: RefCell::new(HashMap::new()),
        }
    }
}

impl<R> StateStore<R> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attaches `record` to `handle`, returning any record it displaced.
    pub(crate) fn attach(&self, handle: WindowHandle, record: R) -> Option<R> {
        self.records.borrow_mut().insert(handle, record)
    }

    pub(crate) fn detach(&self, handle: WindowHandle) -> Option<R> {
        self.records.borrow_mut().remove(&handle)
    }

    pub(crate) fn contains(&self, handle: WindowHandle) -> bool {
        self.records.borrow().contains_key(&handle)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /*
     * Runs `f` against the record for `handle`. The closure must not call back
     * into the window manager; copy what it needs out and act afterwards.
     */
    pub(crate) fn with_record<T>(&self, handle: WindowHandle, f: impl FnOnce(&R) -> T) -> Option<T> {
        self.records.borrow().get(&handle).map(f)
    }

    pub(crate) fn with_record_mut<T>(
        &self,
        handle: WindowHandle,
        f: impl FnOnce(&mut R) -> T,
    ) -> Option<T> {
        self.records.borrow_mut().get_mut(&handle).map(f)
    }
}

impl<R: Clone> StateStore<R> {
    pub(crate) fn lookup(&self, handle: WindowHandle) -> Option<R> {
        self.records.borrow().get(&handle).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: WindowHandle = WindowHandle(0x100);

    #[test]
    fn attach_lookup_detach_round_trip() {
        // Arrange
        let store = StateStore::new();
        // Act
        let displaced = store.attach(FRAME, DecorationState::new(ProcedureRef(0x10), 30));
        // Assert
        assert!(displaced.is_none());
        assert!(store.contains(FRAME));
        let record = store.lookup(FRAME).expect("record attached");
        assert_eq!(record.original_procedure(), ProcedureRef(0x10));
        assert_eq!(record.title_bar_height_px, 30);

        let detached = store.detach(FRAME);
        assert!(detached.is_some());
        assert!(!store.contains(FRAME));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn detach_of_unknown_handle_is_a_no_op() {
        let store: StateStore<ChildLinkState> = StateStore::new();
        assert!(store.detach(WindowHandle(0xDEAD)).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn with_record_mut_updates_in_place() {
        let store = StateStore::new();
        store.attach(FRAME, DecorationState::new(ProcedureRef(0x10), 30));

        let updated = store.with_record_mut(FRAME, |state| {
            state.title_bar_height_px = 48;
            state.counters.messages += 1;
        });

        assert!(updated.is_some());
        let height = store.with_record(FRAME, |state| state.title_bar_height_px);
        assert_eq!(height, Some(48));
        assert_eq!(
            store.with_record_mut(WindowHandle(0x200), |state| state.force_client_hit_test = true),
            None
        );
    }

    #[test]
    fn diagnostics_render_all_counters() {
        let mut state = DecorationState::new(ProcedureRef(0x10), 32);
        state.counters.messages = 7;
        state.counters.hit_tests = 3;
        state.counters.client_hits = 2;
        state.counters.border_hits = 1;
        state.counters.last_cursor_y = 20;
        state.counters.last_window_top = 0;
        state.force_client_hit_test = true;

        let text = state.diagnostics(FRAME).to_string();

        assert_eq!(
            text,
            "anyMsg=7 nccalcsize=0 hitTest=3 caption=0 client=2 border=1 \
             tbH=32 lastPtY=20 lastWinTop=0 forced=1"
        );
    }
}
