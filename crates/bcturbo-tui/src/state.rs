//! Shared UI state bridging screens, the app model, and the backend.
//!
//! Screens never hold the bridge directly: they issue requests and pull
//! replies through this state, which the app model also drains on each
//! tick for cross-cutting effects (toasts, navigation). All snapshots are
//! overwritten wholesale, never merged, so a reply landing after the user
//! navigated away simply refreshes the snapshot the next render reads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bcturbo_bridge::{BridgeClient, BridgeReply, BridgeRequest};
use bcturbo_core::Result;
use bcturbo_core::models::{
    FolderKind, FolderSelection, ImportSummary, LookupReply, LookupRequest, SimulationRequest,
    SimulationResult,
};

/// Max undrained notices kept before the oldest is dropped.
const NOTICE_RING_CAPACITY: usize = 64;

/// Severity of a user-facing notice (rendered as a toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn new(severity: NoticeSeverity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// Both folder slots of the cockpit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSlots {
    pub database: FolderSelection,
    pub result: FolderSelection,
}

/// Shared state handed to every screen's `update`/`view`/`tick`.
pub struct UiSharedState {
    bridge: BridgeClient,
    folders: Mutex<FolderSlots>,
    simulation: Mutex<Option<SimulationResult>>,
    notices: Mutex<VecDeque<Notice>>,
    lookup_mail: Mutex<Vec<(u64, Result<LookupReply>)>>,
    import_mail: Mutex<Vec<Result<ImportSummary>>>,
    calc_in_flight: AtomicBool,
    db_select_in_flight: AtomicBool,
    pending_calc_seq: AtomicU64,
}

impl UiSharedState {
    #[must_use]
    pub fn new(bridge: BridgeClient) -> Arc<Self> {
        Arc::new(Self {
            bridge,
            folders: Mutex::new(FolderSlots::default()),
            simulation: Mutex::new(None),
            notices: Mutex::new(VecDeque::with_capacity(NOTICE_RING_CAPACITY)),
            lookup_mail: Mutex::new(Vec::new()),
            import_mail: Mutex::new(Vec::new()),
            calc_in_flight: AtomicBool::new(false),
            db_select_in_flight: AtomicBool::new(false),
            pending_calc_seq: AtomicU64::new(0),
        })
    }

    // ── Folders ──────────────────────────────────────────────────

    #[must_use]
    pub fn folders(&self) -> FolderSlots {
        self.folders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn set_folder(&self, kind: FolderKind, selection: FolderSelection) {
        let mut slots = self
            .folders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match kind {
            FolderKind::Db => slots.database = selection,
            FolderKind::Result => slots.result = selection,
        }
    }

    /// Hard precondition for the lookup flow.
    #[must_use]
    pub fn database_selected(&self) -> bool {
        self.folders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .database
            .is_selected()
    }

    // ── Simulation snapshot ──────────────────────────────────────

    #[must_use]
    pub fn simulation_snapshot(&self) -> Option<SimulationResult> {
        self.simulation
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Replace the displayed snapshot wholesale.
    pub fn set_simulation(&self, result: SimulationResult) {
        let mut snapshot = self
            .simulation
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *snapshot = Some(result);
    }

    // ── Notices ──────────────────────────────────────────────────

    pub fn push_notice(&self, severity: NoticeSeverity, text: impl Into<String>) {
        let mut ring = self
            .notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if ring.len() >= NOTICE_RING_CAPACITY {
            let _ = ring.pop_front();
        }
        ring.push_back(Notice::new(severity, text));
    }

    /// Drain pending notices (FIFO). Called by the app model each tick.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    // ── Bridge requests ──────────────────────────────────────────

    /// Queue a folder picker call.
    pub fn request_folder(&self, kind: FolderKind) {
        if kind == FolderKind::Db {
            self.db_select_in_flight.store(true, Ordering::Relaxed);
        }
        let _ = self.bridge.submit(BridgeRequest::SelectFolder { kind });
    }

    /// Queue a lookup and return its generation sequence.
    pub fn request_lookup(&self, request: LookupRequest) -> u64 {
        let seq = self.bridge.begin_lookup();
        let _ = self.bridge.submit(BridgeRequest::Lookup { seq, request });
        seq
    }

    /// Whether `seq` is still the newest issued lookup generation.
    #[must_use]
    pub fn lookup_is_latest(&self, seq: u64) -> bool {
        self.bridge.lookup_is_latest(seq)
    }

    /// Queue a simulation run.
    pub fn request_calculate(&self, request: SimulationRequest) {
        let seq = self.bridge.begin_calculation();
        self.pending_calc_seq.store(seq, Ordering::Relaxed);
        self.calc_in_flight.store(true, Ordering::Relaxed);
        let _ = self.bridge.submit(BridgeRequest::Calculate { seq, request });
    }

    pub fn request_import(&self) {
        let _ = self.bridge.submit(BridgeRequest::ImportAsis);
    }

    pub fn request_export(&self) {
        let _ = self.bridge.submit(BridgeRequest::ExportResults);
    }

    // ── Reply routing ────────────────────────────────────────────

    /// Drain raw bridge replies. Only the app model calls this.
    #[must_use]
    pub fn drain_bridge_replies(&self) -> Vec<BridgeReply> {
        self.bridge.drain_replies()
    }

    /// Whether `seq` is still the newest issued calculation generation.
    #[must_use]
    pub fn calculation_is_latest(&self, seq: u64) -> bool {
        self.bridge.calculation_is_latest(seq)
    }

    pub fn deliver_lookup_reply(&self, seq: u64, outcome: Result<LookupReply>) {
        self.lookup_mail
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((seq, outcome));
    }

    #[must_use]
    pub fn take_lookup_replies(&self) -> Vec<(u64, Result<LookupReply>)> {
        std::mem::take(
            &mut *self
                .lookup_mail
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    pub fn deliver_import_reply(&self, outcome: Result<ImportSummary>) {
        self.import_mail
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(outcome);
    }

    #[must_use]
    pub fn take_import_replies(&self) -> Vec<Result<ImportSummary>> {
        std::mem::take(
            &mut *self
                .import_mail
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    // ── In-flight flags ──────────────────────────────────────────

    #[must_use]
    pub fn calc_in_flight(&self) -> bool {
        self.calc_in_flight.load(Ordering::Relaxed)
    }

    pub fn clear_calc_in_flight(&self) {
        self.calc_in_flight.store(false, Ordering::Relaxed);
    }

    #[must_use]
    pub fn db_select_in_flight(&self) -> bool {
        self.db_select_in_flight.load(Ordering::Relaxed)
    }

    pub fn clear_db_select_in_flight(&self) {
        self.db_select_in_flight.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcturbo_bridge::DemoBackend;

    fn test_state() -> Arc<UiSharedState> {
        let bridge = BridgeClient::spawn(Arc::new(DemoBackend::bare()));
        UiSharedState::new(bridge)
    }

    #[test]
    fn folders_start_not_selected() {
        let state = test_state();
        assert!(!state.database_selected());
        let slots = state.folders();
        assert!(!slots.database.is_selected());
        assert!(!slots.result.is_selected());
    }

    #[test]
    fn set_folder_updates_the_right_slot() {
        let state = test_state();
        state.set_folder(
            FolderKind::Db,
            FolderSelection::selected("/data/sap".into()),
        );
        assert!(state.database_selected());
        assert!(!state.folders().result.is_selected());
    }

    #[test]
    fn simulation_snapshot_overwritten_wholesale() {
        let state = test_state();
        assert!(state.simulation_snapshot().is_none());

        let mut first = SimulationResult::default();
        first.summary.total_rows = 1;
        state.set_simulation(first);

        let mut second = SimulationResult::default();
        second.summary.total_rows = 9;
        state.set_simulation(second);

        let snapshot = state.simulation_snapshot().unwrap();
        assert_eq!(snapshot.summary.total_rows, 9);
    }

    #[test]
    fn notices_drain_in_order_and_stay_bounded() {
        let state = test_state();
        for i in 0..(NOTICE_RING_CAPACITY + 8) {
            state.push_notice(NoticeSeverity::Info, format!("n{i}"));
        }
        let drained = state.take_notices();
        assert_eq!(drained.len(), NOTICE_RING_CAPACITY);
        assert_eq!(drained[0].text, "n8");
        assert!(state.take_notices().is_empty());
    }

    #[test]
    fn lookup_mailbox_round_trip() {
        let state = test_state();
        state.deliver_lookup_reply(
            3,
            Ok(LookupReply::NotFound {
                message: "sem dados".into(),
            }),
        );
        let replies = state.take_lookup_replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].0, 3);
        assert!(state.take_lookup_replies().is_empty());
    }

    #[test]
    fn calc_in_flight_flag_round_trip() {
        let state = test_state();
        assert!(!state.calc_in_flight());
        state.request_calculate(SimulationRequest::default());
        assert!(state.calc_in_flight());
        state.clear_calc_in_flight();
        assert!(!state.calc_in_flight());
    }

    #[test]
    fn lookup_generations_supersede() {
        let state = test_state();
        let first = state.request_lookup(LookupRequest {
            code: "100345".into(),
            ..LookupRequest::default()
        });
        let second = state.request_lookup(LookupRequest {
            code: "200771".into(),
            ..LookupRequest::default()
        });
        assert!(!state.lookup_is_latest(first));
        assert!(state.lookup_is_latest(second));
    }
}
