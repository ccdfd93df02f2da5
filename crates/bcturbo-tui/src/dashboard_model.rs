//! Pure view model for the results dashboard — the rendering contract.
//!
//! `DashboardView::from_result` is a pure function of the latest
//! `SimulationResult`: building it twice from the same input yields the
//! same strings (idempotence), summary figures are written verbatim,
//! monthly savings distribute the annual figure evenly, and the annual
//! total columns echo the backend-supplied totals rather than recomputing
//! them client-side.

use bcturbo_core::format::{MONTHS, format_brl, format_decimal_br, format_qty};
use bcturbo_core::models::{RowResult, SimulationResult};

/// Placeholder rendered for absent MDR codes.
const MDR_PLACEHOLDER: &str = "-";

/// Two-state status badge: `OK`, or warning styling for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Ok,
    Warning,
}

/// One fully formatted detail row, in received order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRowView {
    pub row: String,
    pub pn: String,
    pub qme_asis: String,
    pub mdr_asis: String,
    pub qme_tobe: String,
    pub mdr_tobe: String,
    pub vol_asis: String,
    pub vol_tobe: String,
    pub savings: String,
    pub badge: StatusBadge,
    pub status_label: String,
}

/// Fully formatted dashboard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    // Summary cards
    pub total_rows: String,
    pub matched_rows: String,
    pub unmatched_rows: String,
    pub annual_saving: String,

    // Monthly aggregation table (12 cells each, January first)
    pub monthly_qme_asis: Vec<String>,
    pub monthly_qme_tobe: Vec<String>,
    pub monthly_saving: Vec<String>,

    // Annual total column (backend-supplied, not recomputed)
    pub total_qme_asis: String,
    pub total_qme_tobe: String,
    pub total_saving: String,

    // Detail table, in received order
    pub detail_rows: Vec<DetailRowView>,
}

impl DashboardView {
    /// Build the view from the latest simulation snapshot.
    #[must_use]
    pub fn from_result(result: &SimulationResult) -> Self {
        let summary = &result.summary;

        let monthly_qme_asis = MONTHS
            .iter()
            .map(|month| {
                format_qty(summary.monthly_qme_asis.get(*month).copied().unwrap_or(0.0))
            })
            .collect();
        let monthly_qme_tobe = MONTHS
            .iter()
            .map(|month| {
                format_qty(summary.monthly_qme_tobe.get(*month).copied().unwrap_or(0.0))
            })
            .collect();

        // Equal distribution of the annual saving; the total column echoes
        // the backend figure instead of re-summing the cells.
        let per_month = summary.saving_12_meses / 12.0;
        let monthly_saving = (0..MONTHS.len()).map(|_| format_brl(per_month)).collect();

        Self {
            total_rows: summary.total_rows.to_string(),
            matched_rows: summary.matched_rows.to_string(),
            unmatched_rows: summary.unmatched_rows.to_string(),
            annual_saving: format!("R$ {}", format_decimal_br(summary.saving_12_meses, 0)),
            monthly_qme_asis,
            monthly_qme_tobe,
            monthly_saving,
            total_qme_asis: format_qty(summary.total_qme_asis),
            total_qme_tobe: format_qty(summary.total_qme_tobe),
            total_saving: format_brl(summary.saving_12_meses),
            detail_rows: result.results.iter().map(detail_row).collect(),
        }
    }
}

fn detail_row(row: &RowResult) -> DetailRowView {
    let badge = if row.is_ok() {
        StatusBadge::Ok
    } else {
        StatusBadge::Warning
    };
    DetailRowView {
        row: row.row.to_string(),
        pn: row.pn.clone(),
        qme_asis: format_qty(row.qme_asis),
        mdr_asis: mdr_label(row.mdr_asis.as_deref()),
        qme_tobe: format_qty(row.qme_tobe),
        mdr_tobe: mdr_label(row.mdr_tobe.as_deref()),
        vol_asis: format_qty(row.vol_asis),
        vol_tobe: format_qty(row.vol_tobe),
        savings: format_brl(row.savings),
        badge,
        status_label: row.status.clone(),
    }
}

/// Literal `-` for absent (or blank) MDR codes.
fn mdr_label(mdr: Option<&str>) -> String {
    match mdr {
        Some(code) if !code.trim().is_empty() => code.to_string(),
        _ => MDR_PLACEHOLDER.to_string(),
    }
}
