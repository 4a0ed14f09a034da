//! # src/ledger/memory_ledger.rs
//!
//! Referenz-Implementierungen der Kollaborateur-Traits: ein In-Memory-Ledger
//! für Salden und eine statische Zugriffskontrolle mit einem einzelnen
//! Administrator. Beide sind serialisierbar, damit die CLI den gesamten
//! Zustand als JSON-Datei führen kann.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{AccessControl, BalanceLedger, LedgerError};
use crate::models::voucher_class::{AccountId, Amount, VoucherId};

/// Ein einfaches, vollständig im Speicher gehaltenes Saldo-Ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    /// Salden, gruppiert nach Konto und Gutschein-Klasse.
    balances: HashMap<AccountId, HashMap<VoucherId, Amount>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BalanceLedger for InMemoryLedger {
    fn credit(
        &mut self,
        account: &str,
        voucher_id: VoucherId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let balance = self
            .balances
            .entry(account.to_string())
            .or_default()
            .entry(voucher_id)
            .or_insert(0);
        *balance = balance.checked_add(amount).ok_or_else(|| {
            LedgerError::Generic(format!(
                "Balance overflow for account '{}' on voucher {}.",
                account, voucher_id
            ))
        })?;
        Ok(())
    }

    fn destroy(
        &mut self,
        account: &str,
        voucher_id: VoucherId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(account, voucher_id);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.to_string(),
                voucher_id,
                available,
                needed: amount,
            });
        }
        if let Some(per_voucher) = self.balances.get_mut(account) {
            if let Some(balance) = per_voucher.get_mut(&voucher_id) {
                *balance -= amount;
            }
        }
        Ok(())
    }

    fn balance_of(&self, account: &str, voucher_id: VoucherId) -> Amount {
        self.balances
            .get(account)
            .and_then(|per_voucher| per_voucher.get(&voucher_id))
            .copied()
            .unwrap_or(0)
    }
}

/// Zugriffskontrolle mit genau einem Administrator und einem Pause-Flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAccessControl {
    admin: AccountId,
    paused: bool,
}

impl StaticAccessControl {
    /// Erstellt eine Zugriffskontrolle mit dem gegebenen Administrator,
    /// initial nicht pausiert.
    pub fn new(admin: &str) -> Self {
        Self {
            admin: admin.to_string(),
            paused: false,
        }
    }

    /// Setzt oder löst den prozessweiten Pause-Schalter.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

impl AccessControl for StaticAccessControl {
    fn is_administrator(&self, caller: &str) -> bool {
        self.admin == caller
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
