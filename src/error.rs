//! # src/error.rs
//!
//! Definiert den zentralen Fehlertyp für die gesamte gastro-voucher-core-
//! Bibliothek. Verwendet `thiserror` zur einfachen Erstellung von
//! aussagekräftigen Fehlern und zur automatischen Konvertierung der
//! untergeordneten Fehlertypen.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::services::voucher_registry::RegistryError;

/// Der zentrale Fehlertyp für alle Operationen der Bibliothek.
///
/// Dieser Enum fasst Fehler aus allen Modulen (Registry-Taxonomie, Ledger,
/// Serialisierung) an einem Ort zusammen und bildet die einheitliche
/// Fehler-API der Bibliothek.
#[derive(Error, Debug)]
pub enum VoucherCoreError {
    /// Eine Zurückweisung aus der Registry-Zustandsmaschine.
    /// Kapselt den spezifischeren `RegistryError`-Typ.
    #[error("Registry Error: {0}")]
    Registry(#[from] RegistryError),

    /// Ein Fehler aus dem externen Saldo-Ledger.
    #[error("Ledger Error: {0}")]
    Ledger(#[from] LedgerError),

    /// Ein Fehler bei der Verarbeitung von JSON (Serialisierung oder
    /// Deserialisierung von Registry-Snapshots).
    #[error("JSON Processing Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ein allgemeiner Fehler, der für verschiedene Zwecke verwendet werden
    /// kann.
    #[error("Generic error: {0}")]
    Generic(String),
}
