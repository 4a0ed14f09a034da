//! # gastro_voucher_lib
//!
//! Die Kernlogik eines Systems für restaurant-gebundene, semi-fungible
//! Rabatt-Gutscheine: die Lebenszyklus-Zustandsmaschine einer Gutschein-
//! Klasse (Erstellung, Prägung, Einlösung, Status-Wechsel) samt
//! Supply-Buchführung und per-Restaurant-Index. Saldo-Verwaltung und
//! Zugriffskontrolle sind als externe Kollaborateure über Traits
//! angebunden.

// Deklariert die Hauptmodule der Bibliothek und macht sie öffentlich.
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod test_utils;

// Re-exportiert die wichtigsten öffentlichen Typen für eine einfachere
// Nutzung. Anstatt `gastro_voucher_lib::services::voucher_registry::VoucherRegistry`
// können Benutzer nun `gastro_voucher_lib::VoucherRegistry` schreiben.

// Fehler
pub use error::VoucherCoreError;

// Modelle
pub use models::event::RegistryEvent;
pub use models::voucher_class::{AccountId, Amount, NewVoucherClassData, VoucherClass, VoucherId};

// Kollaborateure
pub use ledger::memory_ledger::{InMemoryLedger, StaticAccessControl};
pub use ledger::{AccessControl, BalanceLedger, LedgerError};

// Services
pub use services::restaurant_index::{RestaurantIndex, MAX_VOUCHERS_PER_RESTAURANT};
pub use services::utils::{Clock, SystemClock};
pub use services::voucher_registry::{
    from_json, to_json, RegistryError, VoucherRegistry, MAX_BATCH_SIZE,
};
