//! Pure view model for the AS-IS import summary panel.
//!
//! Four-way branch on the import status: success renders the file line
//! plus whichever stats are present (totals only when supplied, distinct
//! counts only when the collection is non-empty, samples only when
//! non-empty); error renders the backend message; cancel renders a fixed
//! notice; anything else clears every sub-section. A failed bridge call
//! is folded into the error branch using the failure's string form.

use bcturbo_core::Result;
use bcturbo_core::models::{ImportStats, ImportStatus, ImportSummary};

/// Fixed notice shown when the file dialog was cancelled.
pub const CANCELLED_NOTICE: &str = "Seleção cancelada";

/// Rendered state of the import panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportPanel {
    /// Nothing to show (initial state, or an unknown status cleared it).
    #[default]
    Hidden,
    /// Successful import with conditional stat lines.
    Success {
        file_line: String,
        asis_lines: Vec<String>,
        tobe_lines: Vec<String>,
        sample_line: Option<String>,
    },
    /// Import failed; message rendered in error styling.
    Error { message: String },
    /// The user dismissed the file dialog.
    Cancelled,
}

impl ImportPanel {
    /// Build the panel from an import summary.
    #[must_use]
    pub fn from_summary(summary: &ImportSummary) -> Self {
        match summary.status {
            ImportStatus::Success => Self::success_panel(summary),
            ImportStatus::Error => Self::Error {
                message: summary.message.clone().unwrap_or_default(),
            },
            ImportStatus::Cancel => Self::Cancelled,
            ImportStatus::Other => Self::Hidden,
        }
    }

    /// Build the panel from a bridge outcome; failures render as errors.
    #[must_use]
    pub fn from_outcome(outcome: &Result<ImportSummary>) -> Self {
        match outcome {
            Ok(summary) => Self::from_summary(summary),
            Err(err) => Self::Error {
                message: err.to_string(),
            },
        }
    }

    fn success_panel(summary: &ImportSummary) -> Self {
        let filename = summary.filename.as_deref().unwrap_or_default();
        let message = summary.message.as_deref().unwrap_or_default();
        let file_line = format!("{filename} - {message}");

        let (asis_lines, tobe_lines, sample_line) = summary.details.as_ref().map_or_else(
            || (Vec::new(), Vec::new(), None),
            |details| {
                let asis_lines = scenario_lines(
                    details.stats.as_is_qme_total,
                    &details.stats.as_is_mdr_distinct,
                );
                let tobe_lines = scenario_lines(
                    details.stats.to_be_qme_total,
                    &details.stats.to_be_mdr_distinct,
                );
                let sample_line = if details.sample_pns.is_empty() {
                    None
                } else {
                    Some(format!("Exemplos de PNs: {}", details.sample_pns.join(", ")))
                };
                (asis_lines, tobe_lines, sample_line)
            },
        );

        Self::Success {
            file_line,
            asis_lines,
            tobe_lines,
            sample_line,
        }
    }

    /// Whether the panel renders anything at all.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Stat lines for one scenario: the QME total only when present, the MDR
/// distinct count only when the collection is non-empty.
fn scenario_lines(qme_total: Option<i64>, mdr_distinct: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(2);
    if let Some(total) = qme_total {
        lines.push(format!(
            "QME Total: {}",
            bcturbo_core::format::format_decimal_br(total as f64, 0)
        ));
    }
    if !mdr_distinct.is_empty() {
        lines.push(format!("MDR Distintos: {}", mdr_distinct.len()));
    }
    lines
}
