//! Payload types for the backend bridge boundary.
//!
//! Every shape here is JSON-faithful to what the legacy backend produced:
//! the lookup reply is a tagged `status` object, the calculation reply is
//! either an error envelope or a full simulation result, and all nested
//! fields tolerate absence (partial responses are valid — absent keys
//! simply leave the corresponding UI state untouched).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sentinel label shown when a folder picker was dismissed.
pub const NOT_SELECTED: &str = "Not Selected";

/// Row status value the backend emits for rows with an improvement.
pub const ROW_STATUS_OK: &str = "OK";

/// Keys of the lookup reply's data map. The backend owns this vocabulary;
/// the cockpit only checks presence and copies values through.
pub mod lookup_keys {
    pub const SUPPLIER: &str = "Nome Fornecedor";
    pub const CARRIER: &str = "Transportadora";
    pub const SUPPLIER_STATE: &str = "Estado Fornecedor";
    pub const VEHICLE: &str = "Veiculo a ser Utilizado";
    pub const ORIGIN_CITY: &str = "Cidade Fornecedor";
    pub const DESTINATION: &str = "Destino Materiais";
    pub const FLOW_TYPE: &str = "Tipo de Fluxo";
}

// ──────────────────────────────────────────────────────────────────────
// Folder selection
// ──────────────────────────────────────────────────────────────────────

/// Which folder slot a picker call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    /// The SAP/IMS database folder gating the lookup flow.
    Db,
    /// The destination folder for exported results.
    Result,
}

impl FolderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Result => "result",
        }
    }
}

/// Outcome of a folder picker call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSelection {
    /// Full path, absent when the dialog was dismissed.
    pub path: Option<PathBuf>,
    /// Display label: the folder's base name, or the sentinel.
    pub label: String,
}

impl FolderSelection {
    /// A selection pointing at `path`, labelled with its base name.
    #[must_use]
    pub fn selected(path: PathBuf) -> Self {
        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            path: Some(path),
            label,
        }
    }

    /// The dismissed-dialog sentinel.
    #[must_use]
    pub fn not_selected() -> Self {
        Self {
            path: None,
            label: NOT_SELECTED.to_string(),
        }
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.path.is_some()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FolderSelection {
    fn default() -> Self {
        Self::not_selected()
    }
}

// ──────────────────────────────────────────────────────────────────────
// SAP/IMS lookup
// ──────────────────────────────────────────────────────────────────────

/// Request for the SAP/IMS complementary-data lookup. Built fresh from the
/// current form values at fire time; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub code: String,
    pub plant: String,
    pub origin: String,
    pub destination: String,
}

impl LookupRequest {
    /// True when the lookup code is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// Reply of the lookup call, tagged by `status` exactly as the backend
/// serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupReply {
    /// Complementary data found. The map may be partial.
    Success {
        #[serde(default)]
        data: BTreeMap<String, String>,
    },
    /// The code is unknown to the database.
    NotFound { message: String },
    /// The backend failed while looking up.
    Error { message: String },
}

// ──────────────────────────────────────────────────────────────────────
// Simulation
// ──────────────────────────────────────────────────────────────────────

/// The full form field map sent to the calculation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default)]
    pub cod_projeto: String,
    #[serde(default)]
    pub cod_sap: String,
    #[serde(default)]
    pub fornecedor: String,
    #[serde(default)]
    pub planta: String,
    #[serde(default)]
    pub origem: String,
    #[serde(default)]
    pub destino: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub fluxo: String,
    #[serde(default)]
    pub transportadora: String,
    #[serde(default)]
    pub veiculo: String,
    #[serde(default)]
    pub qme_tobe: String,
}

/// One detail row of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    pub row: u64,
    pub pn: String,
    #[serde(default)]
    pub qme_asis: f64,
    #[serde(default)]
    pub mdr_asis: Option<String>,
    #[serde(default)]
    pub qme_tobe: f64,
    #[serde(default)]
    pub mdr_tobe: Option<String>,
    #[serde(default)]
    pub vol_asis: f64,
    #[serde(default)]
    pub vol_tobe: f64,
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub status: String,
}

impl RowResult {
    /// Whether the row renders the OK badge; anything else is warning-styled.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ROW_STATUS_OK
    }
}

/// Aggregate figures for a simulation run. Monthly maps are keyed by the
/// full Portuguese month name (see [`crate::format::MONTHS`]); missing
/// months render as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub matched_rows: u64,
    #[serde(default)]
    pub unmatched_rows: u64,
    #[serde(default)]
    pub saving_12_meses: f64,
    #[serde(default)]
    pub monthly_qme_asis: BTreeMap<String, f64>,
    #[serde(default)]
    pub monthly_qme_tobe: BTreeMap<String, f64>,
    #[serde(default)]
    pub total_qme_asis: f64,
    #[serde(default)]
    pub total_qme_tobe: f64,
}

/// AS-IS/TO-BE part-number matching sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingSummary {
    #[serde(default)]
    pub matched: BTreeSet<String>,
    #[serde(default)]
    pub unmatched: BTreeSet<String>,
}

/// A whole simulation run as received from the backend. Held only as the
/// latest snapshot; each new run overwrites it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub summary: SimulationSummary,
    #[serde(default)]
    pub results: Vec<RowResult>,
    #[serde(default)]
    pub matching: MatchingSummary,
}

/// Reply of the calculate call: either a full result or an error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalculateReply {
    Success(SimulationResult),
    Error { message: String },
}

// ──────────────────────────────────────────────────────────────────────
// AS-IS import
// ──────────────────────────────────────────────────────────────────────

/// Status discriminant of an import attempt. Unknown statuses collapse to
/// [`ImportStatus::Other`], which clears all rendered sub-sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Error,
    Cancel,
    #[serde(other)]
    Other,
}

/// QME totals and distinct MDR collections for both scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    #[serde(rename = "AS_IS_QME_Total", default)]
    pub as_is_qme_total: Option<i64>,
    #[serde(rename = "AS_IS_MDR_Distinct", default)]
    pub as_is_mdr_distinct: Vec<String>,
    #[serde(rename = "TO_BE_QME_Total", default)]
    pub to_be_qme_total: Option<i64>,
    #[serde(rename = "TO_BE_MDR_Distinct", default)]
    pub to_be_mdr_distinct: Vec<String>,
}

/// Detail block of a successful import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDetails {
    #[serde(default)]
    pub rows: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub sample_pns: Vec<String>,
    #[serde(default)]
    pub stats: ImportStats,
}

/// Outcome of the AS-IS file import, discarded after rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub status: ImportStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<ImportDetails>,
}

// ──────────────────────────────────────────────────────────────────────
// Export
// ──────────────────────────────────────────────────────────────────────

/// Reply of the export call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportReply {
    Success {
        message: String,
        #[serde(default)]
        filepath: Option<PathBuf>,
    },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_selection_label_is_base_name() {
        let sel = FolderSelection::selected(PathBuf::from("/data/sap/base_2025"));
        assert!(sel.is_selected());
        assert_eq!(sel.label, "base_2025");

        let none = FolderSelection::not_selected();
        assert!(!none.is_selected());
        assert_eq!(none.label, NOT_SELECTED);
    }

    #[test]
    fn lookup_request_blank_detection() {
        let mut req = LookupRequest::default();
        assert!(req.is_blank());
        req.code = "   ".to_string();
        assert!(req.is_blank());
        req.code = " 100345 ".to_string();
        assert!(!req.is_blank());
    }

    #[test]
    fn lookup_reply_wire_shapes() {
        let json = r#"{"status":"success","data":{"Nome Fornecedor":"FORNECEDOR XYZ LTDA","Transportadora":"DHL Supply Chain"}}"#;
        let reply: LookupReply = serde_json::from_str(json).unwrap();
        match reply {
            LookupReply::Success { data } => {
                assert_eq!(
                    data.get(lookup_keys::SUPPLIER).map(String::as_str),
                    Some("FORNECEDOR XYZ LTDA")
                );
                assert!(!data.contains_key(lookup_keys::FLOW_TYPE));
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        let json = r#"{"status":"not_found","message":"sem dados"}"#;
        let reply: LookupReply = serde_json::from_str(json).unwrap();
        assert!(matches!(reply, LookupReply::NotFound { message } if message == "sem dados"));
    }

    #[test]
    fn calculate_reply_error_envelope() {
        let json = r#"{"status":"error","message":"Carregue o arquivo AS IS/TO BE antes de simular!"}"#;
        let reply: CalculateReply = serde_json::from_str(json).unwrap();
        assert!(matches!(reply, CalculateReply::Error { .. }));
    }

    #[test]
    fn simulation_result_tolerates_partial_payloads() {
        // The distilled example payload: no matching block, no monthly maps.
        let json = r#"{
            "status": "success",
            "summary": {"total_rows": 3, "saving_12_meses": 1200},
            "results": [{"row":1,"pn":"A1","qme_asis":10,"qme_tobe":8,
                         "vol_asis":5,"vol_tobe":4,"savings":100,"status":"OK"}]
        }"#;
        let reply: CalculateReply = serde_json::from_str(json).unwrap();
        let CalculateReply::Success(result) = reply else {
            panic!("expected success");
        };
        assert_eq!(result.summary.total_rows, 3);
        assert_eq!(result.summary.matched_rows, 0);
        assert!(result.summary.monthly_qme_asis.is_empty());
        assert_eq!(result.results.len(), 1);
        assert!(result.results[0].is_ok());
        assert!(result.results[0].mdr_asis.is_none());
        assert!(result.matching.matched.is_empty());
    }

    #[test]
    fn import_status_unknown_collapses_to_other() {
        let summary: ImportSummary =
            serde_json::from_str(r#"{"status":"weird"}"#).unwrap();
        assert_eq!(summary.status, ImportStatus::Other);
        assert!(summary.details.is_none());
    }

    #[test]
    fn import_stats_legacy_key_names() {
        let json = r#"{
            "status": "success",
            "filename": "asis.xlsx",
            "message": "6 PNs carregados.",
            "details": {
                "rows": 6,
                "sample_pns": ["A1", "B2"],
                "stats": {
                    "AS_IS_QME_Total": 1200,
                    "AS_IS_MDR_Distinct": ["MDR-1", "MDR-2"],
                    "TO_BE_QME_Total": 900,
                    "TO_BE_MDR_Distinct": []
                }
            }
        }"#;
        let summary: ImportSummary = serde_json::from_str(json).unwrap();
        let details = summary.details.unwrap();
        assert_eq!(details.stats.as_is_qme_total, Some(1200));
        assert_eq!(details.stats.as_is_mdr_distinct.len(), 2);
        assert!(details.stats.to_be_mdr_distinct.is_empty());
    }

    #[test]
    fn row_status_badge_two_state() {
        let ok = RowResult {
            row: 1,
            pn: "A1".into(),
            qme_asis: 0.0,
            mdr_asis: None,
            qme_tobe: 0.0,
            mdr_tobe: None,
            vol_asis: 0.0,
            vol_tobe: 0.0,
            savings: 0.0,
            status: "OK".into(),
        };
        assert!(ok.is_ok());
        let warn = RowResult {
            status: "Sem melhoria".into(),
            ..ok
        };
        assert!(!warn.is_ok());
    }
}
