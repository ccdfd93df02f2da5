//! The backend boundary consumed by the cockpit.
//!
//! Five calls, all request/reply shaped. Status-level outcomes
//! (`not_found`, backend `error` envelopes) live inside the reply types;
//! an `Err` from a method means the call itself failed (transport-level),
//! which the UI surfaces as an error notification.

use bcturbo_core::Result;
use bcturbo_core::models::{
    CalculateReply, ExportReply, FolderKind, FolderSelection, ImportSummary, LookupReply,
    LookupRequest, SimulationRequest,
};

/// The backend surface the cockpit consumes.
///
/// Implementations run on the bridge worker thread, so blocking calls
/// (dialogs, file reads) are fine here — the UI thread never waits.
pub trait BackendApi: Send + Sync {
    /// Open the folder picker for the given slot.
    fn select_folder(&self, kind: FolderKind) -> Result<FolderSelection>;

    /// Look up complementary SAP/IMS data for a code.
    fn lookup(&self, request: &LookupRequest) -> Result<LookupReply>;

    /// Run the costing simulation over the loaded AS-IS/TO-BE data.
    fn calculate(&self, request: &SimulationRequest) -> Result<CalculateReply>;

    /// Import the AS-IS/TO-BE scenario file.
    fn import_asis(&self) -> Result<ImportSummary>;

    /// Export the latest simulation results.
    fn export_results(&self) -> Result<ExportReply>;
}
