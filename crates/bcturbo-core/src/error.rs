//! Error types for the BC Turbo cockpit.
//!
//! User-facing messages keep the wording of the legacy backend so the
//! notifications the cockpit surfaces read exactly like the original tool.

use thiserror::Error;

/// Result type alias for cockpit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the cockpit and its backend bridge.
#[derive(Debug, Error)]
pub enum Error {
    // ── Precondition failures (recoverable by user action) ──────────
    #[error("Selecione a pasta Database primeiro!")]
    DatabaseFolderNotSelected,

    #[error("Selecione a pasta de resultados primeiro!")]
    ResultFolderNotSelected,

    #[error("Carregue o arquivo AS IS/TO BE antes de simular!")]
    AsisNotLoaded,

    #[error("Nenhum resultado para exportar!")]
    NothingToExport,

    // ── File handling ───────────────────────────────────────────────
    #[error("Erro ao ler arquivo: {0}")]
    FileRead(String),

    #[error("Erro ao abrir diálogo: {0}")]
    DialogFailed(String),

    // ── Transport / backend ─────────────────────────────────────────
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Bridge unavailable: {0}")]
    BridgeUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
