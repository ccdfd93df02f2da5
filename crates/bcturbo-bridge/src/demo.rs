//! In-process demo backend implementing the bridge boundary with canned
//! data, mirroring the legacy backend's mock responses.
//!
//! Folder pickers resolve to preset paths (no native dialog in a
//! terminal), the SAP/IMS lookup answers from a small static table, and
//! the calculator replays the legacy row math over a built-in
//! AS-IS/TO-BE dataset. Export writes a timestamped CSV into the result
//! folder so the whole flow is exercisable end to end.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use bcturbo_core::models::{
    CalculateReply, ExportReply, FolderKind, FolderSelection, ImportDetails, ImportStats,
    ImportStatus, ImportSummary, LookupReply, LookupRequest, MatchingSummary, RowResult,
    SimulationRequest, SimulationResult, SimulationSummary, lookup_keys,
};
use bcturbo_core::{Config, Error, Result, format};

use crate::api::BackendApi;

/// Cubic meters per QME unit used by the demo volume estimate.
const VOLUME_PER_UNIT: f64 = 0.1;

/// Freight rate applied per cubic meter saved, from the legacy mock math.
const FREIGHT_RATE_PER_M3: f64 = 100.0;

/// Row status for rows without an improvement, legacy wording.
const STATUS_NO_IMPROVEMENT: &str = "Sem melhoria";

/// Sample PNs listed in the import summary.
const SAMPLE_PN_LIMIT: usize = 5;

/// One row of the built-in AS-IS/TO-BE dataset.
struct AsisRow {
    pn: &'static str,
    qme_asis: f64,
    mdr_asis: Option<&'static str>,
    /// `None` models a PN present only in the AS-IS scenario (unmatched).
    qme_tobe: Option<f64>,
    mdr_tobe: Option<&'static str>,
}

const ASIS_DATASET: &[AsisRow] = &[
    AsisRow {
        pn: "PN-88001",
        qme_asis: 240.0,
        mdr_asis: Some("MDR-SUL"),
        qme_tobe: Some(300.0),
        mdr_tobe: Some("MDR-SUL"),
    },
    AsisRow {
        pn: "PN-88002",
        qme_asis: 180.0,
        mdr_asis: Some("MDR-SUL"),
        qme_tobe: Some(150.0),
        mdr_tobe: Some("MDR-OESTE"),
    },
    AsisRow {
        pn: "PN-88003",
        qme_asis: 96.0,
        mdr_asis: None,
        qme_tobe: Some(120.0),
        mdr_tobe: Some("MDR-OESTE"),
    },
    AsisRow {
        pn: "PN-88104",
        qme_asis: 420.0,
        mdr_asis: Some("MDR-NORTE"),
        qme_tobe: Some(420.0),
        mdr_tobe: None,
    },
    AsisRow {
        pn: "PN-88105",
        qme_asis: 60.0,
        mdr_asis: Some("MDR-NORTE"),
        qme_tobe: None,
        mdr_tobe: None,
    },
    AsisRow {
        pn: "PN-88230",
        qme_asis: 310.0,
        mdr_asis: Some("MDR-SUL"),
        qme_tobe: Some(360.0),
        mdr_tobe: Some("MDR-SUL"),
    },
];

struct DemoState {
    asis_loaded: bool,
    last_results: Option<Vec<RowResult>>,
}

/// Demo implementation of [`BackendApi`].
pub struct DemoBackend {
    preset_database: Option<PathBuf>,
    preset_result: Option<PathBuf>,
    latency: Option<Duration>,
    export_prefix: String,
    state: Mutex<DemoState>,
}

impl DemoBackend {
    /// Build a demo backend from the cockpit configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            preset_database: config
                .database_folder
                .clone()
                .or_else(|| Some(PathBuf::from("/data/bcturbo/sap_ims"))),
            preset_result: config.result_folder.clone(),
            latency: config.demo_latency(),
            export_prefix: config.export_file_prefix.clone(),
            state: Mutex::new(DemoState {
                asis_loaded: false,
                last_results: None,
            }),
        }
    }

    /// Demo backend with no latency and no preset folders, for tests.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            preset_database: None,
            preset_result: None,
            latency: None,
            export_prefix: bcturbo_core::config::DEFAULT_EXPORT_PREFIX.to_string(),
            state: Mutex::new(DemoState {
                asis_loaded: false,
                last_results: None,
            }),
        }
    }

    /// Override the result folder preset (used by tests to export into a
    /// temp directory).
    #[must_use]
    pub fn with_result_folder(mut self, path: PathBuf) -> Self {
        self.preset_result = Some(path);
        self
    }

    /// Override the database folder preset.
    #[must_use]
    pub fn with_database_folder(mut self, path: PathBuf) -> Self {
        self.preset_database = Some(path);
        self
    }

    fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, DemoState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// The static lookup table: code → complementary data map.
    fn lookup_table(code: &str) -> Option<BTreeMap<String, String>> {
        let entries: &[(&str, &str)] = match code {
            "100345" => &[
                (lookup_keys::SUPPLIER, "FORNECEDOR XYZ LTDA"),
                (lookup_keys::CARRIER, "DHL Supply Chain"),
                (lookup_keys::SUPPLIER_STATE, "MG"),
                (lookup_keys::VEHICLE, "Truck"),
                (lookup_keys::ORIGIN_CITY, "Betim"),
                (lookup_keys::DESTINATION, "Curitiba - CKD"),
                (lookup_keys::FLOW_TYPE, "Milk Run"),
            ],
            // Partial record: exercises the absent-keys-leave-fields path.
            "200771" => &[
                (lookup_keys::SUPPLIER, "AUTOPEÇAS BETA S.A."),
                (lookup_keys::CARRIER, "JSL Logística"),
                (lookup_keys::SUPPLIER_STATE, "SP"),
                (lookup_keys::VEHICLE, "Carreta"),
            ],
            _ => return None,
        };
        Some(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn build_result(request: &SimulationRequest) -> SimulationResult {
        let default_tobe: f64 = request.qme_tobe.trim().parse().unwrap_or(0.0);

        let mut results = Vec::with_capacity(ASIS_DATASET.len());
        let mut matched = BTreeSet::new();
        let mut unmatched = BTreeSet::new();
        let mut total_qme_asis = 0.0;
        let mut total_qme_tobe = 0.0;
        let mut saving_12_meses = 0.0;

        for (idx, row) in ASIS_DATASET.iter().enumerate() {
            let qme_tobe = row.qme_tobe.unwrap_or(default_tobe);
            if row.qme_tobe.is_some() {
                matched.insert(row.pn.to_string());
            } else {
                unmatched.insert(row.pn.to_string());
            }

            let vol_asis = row.qme_asis * VOLUME_PER_UNIT;
            let vol_tobe = qme_tobe * VOLUME_PER_UNIT;
            let savings = (vol_asis - vol_tobe).max(0.0) * FREIGHT_RATE_PER_M3;
            let status = if qme_tobe > row.qme_asis {
                bcturbo_core::models::ROW_STATUS_OK
            } else {
                STATUS_NO_IMPROVEMENT
            };

            total_qme_asis += row.qme_asis;
            total_qme_tobe += qme_tobe;
            saving_12_meses += savings;

            results.push(RowResult {
                row: idx as u64 + 1,
                pn: row.pn.to_string(),
                qme_asis: row.qme_asis,
                mdr_asis: row.mdr_asis.map(str::to_string),
                qme_tobe,
                mdr_tobe: row.mdr_tobe.map(str::to_string),
                vol_asis,
                vol_tobe,
                savings,
                status: status.to_string(),
            });
        }

        // Even distribution across the year; the UI never recomputes these.
        let monthly_qme_asis: BTreeMap<String, f64> = format::MONTHS
            .iter()
            .map(|m| ((*m).to_string(), total_qme_asis / 12.0))
            .collect();
        let monthly_qme_tobe: BTreeMap<String, f64> = format::MONTHS
            .iter()
            .map(|m| ((*m).to_string(), total_qme_tobe / 12.0))
            .collect();

        let total_rows = results.len() as u64;
        SimulationResult {
            message: format!("Simulação concluída para {total_rows} PNs."),
            summary: SimulationSummary {
                total_rows,
                matched_rows: matched.len() as u64,
                unmatched_rows: unmatched.len() as u64,
                saving_12_meses,
                monthly_qme_asis,
                monthly_qme_tobe,
                total_qme_asis,
                total_qme_tobe,
            },
            results,
            matching: MatchingSummary { matched, unmatched },
        }
    }

    fn import_summary() -> ImportSummary {
        let mut as_is_mdr: BTreeSet<&str> = BTreeSet::new();
        let mut to_be_mdr: BTreeSet<&str> = BTreeSet::new();
        let mut as_is_total = 0.0;
        let mut to_be_total = 0.0;
        for row in ASIS_DATASET {
            as_is_total += row.qme_asis;
            to_be_total += row.qme_tobe.unwrap_or(0.0);
            if let Some(mdr) = row.mdr_asis {
                as_is_mdr.insert(mdr);
            }
            if let Some(mdr) = row.mdr_tobe {
                to_be_mdr.insert(mdr);
            }
        }

        let sample_pns: Vec<String> = ASIS_DATASET
            .iter()
            .take(SAMPLE_PN_LIMIT)
            .map(|row| row.pn.to_string())
            .collect();

        ImportSummary {
            status: ImportStatus::Success,
            filename: Some("asis_tobe_demo.csv".to_string()),
            message: Some(format!("{} PNs carregados.", ASIS_DATASET.len())),
            details: Some(ImportDetails {
                rows: ASIS_DATASET.len() as u64,
                columns: vec![
                    "PN".to_string(),
                    "AS_IS_QME".to_string(),
                    "AS_IS_MDR".to_string(),
                    "TO_BE_QME".to_string(),
                    "TO_BE_MDR".to_string(),
                ],
                sample_pns,
                stats: ImportStats {
                    as_is_qme_total: Some(as_is_total as i64),
                    as_is_mdr_distinct: as_is_mdr.iter().map(|s| (*s).to_string()).collect(),
                    to_be_qme_total: Some(to_be_total as i64),
                    to_be_mdr_distinct: to_be_mdr.iter().map(|s| (*s).to_string()).collect(),
                },
            }),
        }
    }

    fn write_export(&self, rows: &[RowResult]) -> Result<(PathBuf, String)> {
        let Some(folder) = self.preset_result.clone() else {
            return Err(Error::ResultFolderNotSelected);
        };
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{}_{timestamp}.csv", self.export_prefix);
        let filepath = folder.join(&filename);

        let mut file = std::fs::File::create(&filepath)?;
        writeln!(
            file,
            "row,pn,qme_asis,mdr_asis,qme_tobe,mdr_tobe,vol_asis,vol_tobe,savings,status"
        )?;
        for row in rows {
            writeln!(
                file,
                "{},{},{},{},{},{},{:.2},{:.2},{:.2},{}",
                row.row,
                row.pn,
                row.qme_asis,
                row.mdr_asis.as_deref().unwrap_or(""),
                row.qme_tobe,
                row.mdr_tobe.as_deref().unwrap_or(""),
                row.vol_asis,
                row.vol_tobe,
                row.savings,
                row.status,
            )?;
        }
        Ok((filepath, filename))
    }
}

impl BackendApi for DemoBackend {
    fn select_folder(&self, kind: FolderKind) -> Result<FolderSelection> {
        self.simulate_latency();
        let preset = match kind {
            FolderKind::Db => self.preset_database.clone(),
            FolderKind::Result => self.preset_result.clone(),
        };
        Ok(preset.map_or_else(FolderSelection::not_selected, FolderSelection::selected))
    }

    fn lookup(&self, request: &LookupRequest) -> Result<LookupReply> {
        self.simulate_latency();
        let code = request.code.trim();
        Ok(Self::lookup_table(code).map_or_else(
            || LookupReply::NotFound {
                message: format!("Código {code} não encontrado na base SAP/IMS."),
            },
            |data| LookupReply::Success { data },
        ))
    }

    fn calculate(&self, request: &SimulationRequest) -> Result<CalculateReply> {
        self.simulate_latency();
        let mut state = self.lock_state();
        if !state.asis_loaded {
            return Ok(CalculateReply::Error {
                message: Error::AsisNotLoaded.to_string(),
            });
        }
        let result = Self::build_result(request);
        state.last_results = Some(result.results.clone());
        Ok(CalculateReply::Success(result))
    }

    fn import_asis(&self) -> Result<ImportSummary> {
        self.simulate_latency();
        let mut state = self.lock_state();
        state.asis_loaded = true;
        Ok(Self::import_summary())
    }

    fn export_results(&self) -> Result<ExportReply> {
        self.simulate_latency();
        let rows = {
            let state = self.lock_state();
            state.last_results.clone()
        };
        let Some(rows) = rows else {
            return Ok(ExportReply::Error {
                message: Error::NothingToExport.to_string(),
            });
        };
        if self.preset_result.is_none() {
            return Ok(ExportReply::Error {
                message: Error::ResultFolderNotSelected.to_string(),
            });
        }
        match self.write_export(&rows) {
            Ok((filepath, filename)) => Ok(ExportReply::Success {
                message: format!("Arquivo exportado: {filename}"),
                filepath: Some(filepath),
            }),
            Err(err) => Ok(ExportReply::Error {
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SimulationRequest {
        SimulationRequest {
            cod_sap: "100345".into(),
            qme_tobe: "100".into(),
            ..SimulationRequest::default()
        }
    }

    #[test]
    fn lookup_known_code_returns_full_map() {
        let backend = DemoBackend::bare();
        let reply = backend
            .lookup(&LookupRequest {
                code: " 100345 ".into(),
                ..LookupRequest::default()
            })
            .unwrap();
        let LookupReply::Success { data } = reply else {
            panic!("expected success");
        };
        assert_eq!(
            data.get(lookup_keys::CARRIER).map(String::as_str),
            Some("DHL Supply Chain")
        );
        assert_eq!(data.len(), 7);
    }

    #[test]
    fn lookup_partial_code_omits_keys() {
        let backend = DemoBackend::bare();
        let reply = backend
            .lookup(&LookupRequest {
                code: "200771".into(),
                ..LookupRequest::default()
            })
            .unwrap();
        let LookupReply::Success { data } = reply else {
            panic!("expected success");
        };
        assert!(data.contains_key(lookup_keys::SUPPLIER));
        assert!(!data.contains_key(lookup_keys::ORIGIN_CITY));
        assert!(!data.contains_key(lookup_keys::FLOW_TYPE));
    }

    #[test]
    fn lookup_unknown_code_not_found() {
        let backend = DemoBackend::bare();
        let reply = backend
            .lookup(&LookupRequest {
                code: "999999".into(),
                ..LookupRequest::default()
            })
            .unwrap();
        assert!(matches!(reply, LookupReply::NotFound { message } if message.contains("999999")));
    }

    #[test]
    fn calculate_before_import_is_an_error_envelope() {
        let backend = DemoBackend::bare();
        let reply = backend.calculate(&request()).unwrap();
        assert!(matches!(
            reply,
            CalculateReply::Error { message } if message.contains("AS IS/TO BE")
        ));
    }

    #[test]
    fn calculate_after_import_matches_dataset() {
        let backend = DemoBackend::bare();
        let _ = backend.import_asis().unwrap();
        let reply = backend.calculate(&request()).unwrap();
        let CalculateReply::Success(result) = reply else {
            panic!("expected success");
        };
        assert_eq!(result.summary.total_rows, ASIS_DATASET.len() as u64);
        assert_eq!(
            result.summary.matched_rows + result.summary.unmatched_rows,
            result.summary.total_rows
        );
        assert!(result.matching.unmatched.contains("PN-88105"));
        // Rows come back in dataset order.
        assert_eq!(result.results[0].pn, "PN-88001");
        assert_eq!(result.results[0].row, 1);
        // Monthly quantities distribute the totals evenly.
        let jan = result.summary.monthly_qme_asis["Janeiro"];
        assert!((jan * 12.0 - result.summary.total_qme_asis).abs() < 1e-6);
    }

    #[test]
    fn row_status_follows_legacy_rule() {
        let backend = DemoBackend::bare();
        let _ = backend.import_asis().unwrap();
        let CalculateReply::Success(result) = backend.calculate(&request()).unwrap() else {
            panic!("expected success");
        };
        for row in &result.results {
            if row.qme_tobe > row.qme_asis {
                assert_eq!(row.status, "OK", "pn {}", row.pn);
            } else {
                assert_eq!(row.status, STATUS_NO_IMPROVEMENT, "pn {}", row.pn);
            }
        }
    }

    #[test]
    fn import_summary_has_stats_and_samples() {
        let backend = DemoBackend::bare();
        let summary = backend.import_asis().unwrap();
        assert_eq!(summary.status, ImportStatus::Success);
        let details = summary.details.unwrap();
        assert_eq!(details.rows, ASIS_DATASET.len() as u64);
        assert!(details.stats.as_is_qme_total.unwrap() > 0);
        assert!(!details.stats.as_is_mdr_distinct.is_empty());
        assert_eq!(details.sample_pns.len(), SAMPLE_PN_LIMIT);
    }

    #[test]
    fn export_without_results_fails() {
        let backend = DemoBackend::bare();
        let reply = backend.export_results().unwrap();
        assert!(matches!(
            reply,
            ExportReply::Error { message } if message == "Nenhum resultado para exportar!"
        ));
    }

    #[test]
    fn export_without_result_folder_fails() {
        let backend = DemoBackend::bare();
        let _ = backend.import_asis().unwrap();
        let _ = backend.calculate(&request()).unwrap();
        let reply = backend.export_results().unwrap();
        assert!(matches!(
            reply,
            ExportReply::Error { message } if message == "Selecione a pasta de resultados primeiro!"
        ));
    }

    #[test]
    fn export_writes_csv_into_result_folder() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DemoBackend::bare().with_result_folder(dir.path().to_path_buf());
        let _ = backend.import_asis().unwrap();
        let _ = backend.calculate(&request()).unwrap();

        let reply = backend.export_results().unwrap();
        let ExportReply::Success { message, filepath } = reply else {
            panic!("expected success");
        };
        assert!(message.starts_with("Arquivo exportado: BC_Turbo_Results_"));
        let filepath = filepath.unwrap();
        let contents = std::fs::read_to_string(&filepath).unwrap();
        assert!(contents.starts_with("row,pn,"));
        assert_eq!(contents.lines().count(), ASIS_DATASET.len() + 1);
    }

    #[test]
    fn folder_selection_uses_presets() {
        let backend = DemoBackend::bare().with_database_folder("/data/sap".into());
        let db = backend.select_folder(FolderKind::Db).unwrap();
        assert!(db.is_selected());
        assert_eq!(db.label, "sap");
        let result = backend.select_folder(FolderKind::Result).unwrap();
        assert!(!result.is_selected());
        assert_eq!(result.label, bcturbo_core::models::NOT_SELECTED);
    }
}
