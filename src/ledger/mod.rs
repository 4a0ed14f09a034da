//! # src/ledger/mod.rs
//!
//! Definiert die Abstraktionen für die externen Kollaborateure der Registry:
//! das generische Saldo-Ledger (Gutschrift, Vernichtung, Saldo-Abfrage) und
//! die Zugriffskontrolle (Administrator-Prüfung, Pause-Schalter).
//! Beide werden als korrekt und atomar vorausgesetzt; die Entkopplung über
//! Traits hält die Kernlogik von der konkreten Umsetzung frei.

use thiserror::Error;

use crate::models::voucher_class::{AccountId, Amount, VoucherId};

pub mod memory_ledger;

/// Ein generischer Fehler-Typ für alle Ledger-Operationen.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Das Konto hält weniger Einheiten, als vernichtet werden sollen.
    #[error("Insufficient balance: account '{account}' holds {available} units of voucher {voucher_id}, but {needed} are needed.")]
    InsufficientBalance {
        account: AccountId,
        voucher_id: VoucherId,
        available: Amount,
        needed: Amount,
    },

    /// Ein unerwarteter Fehler im Ledger-Backend.
    #[error("Ledger error: {0}")]
    Generic(String),
}

/// Die Schnittstelle zum externen semi-fungiblen Saldo-Ledger.
/// Jede Methode ist eine atomare Operation.
pub trait BalanceLedger {
    /// Schreibt `amount` Einheiten der Klasse `voucher_id` dem Konto gut.
    fn credit(
        &mut self,
        account: &str,
        voucher_id: VoucherId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Schreibt mehrere Klassen in einem einzigen, aggregierten Vorgang gut.
    /// Die Standard-Implementierung iteriert über `credit`; Backends mit
    /// nativer Batch-Unterstützung können sie überschreiben.
    fn credit_batch(
        &mut self,
        account: &str,
        voucher_ids: &[VoucherId],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        for (voucher_id, amount) in voucher_ids.iter().zip(amounts) {
            self.credit(account, *voucher_id, *amount)?;
        }
        Ok(())
    }

    /// Vernichtet `amount` Einheiten aus dem Bestand des Kontos.
    /// Muss bei unzureichendem Saldo mit `InsufficientBalance` fehlschlagen.
    fn destroy(
        &mut self,
        account: &str,
        voucher_id: VoucherId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Liefert den aktuellen Bestand des Kontos für eine Klasse.
    fn balance_of(&self, account: &str, voucher_id: VoucherId) -> Amount;
}

/// Die Schnittstelle zur Zugriffskontrolle der Registry.
pub trait AccessControl {
    /// Prüft, ob der Aufrufer der administrative Akteur ist.
    fn is_administrator(&self, caller: &str) -> bool;

    /// Der prozessweite Pause-Schalter. Solange er gesetzt ist, schlagen
    /// Erstellung und Prägung sofort fehl; Einlösung und Status-Wechsel
    /// bleiben möglich.
    fn is_paused(&self) -> bool;
}
