//! # src/models/event.rs
//!
//! Definiert die nach außen gerichteten Benachrichtigungen der Registry.
//! Jede erfolgreiche Zustandsänderung erzeugt genau einen Eintrag im
//! append-only Ereignis-Log; fehlgeschlagene Operationen erzeugen keinen.
//! Externe Indexer konsumieren dieses Log in Einfüge-Reihenfolge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::voucher_class::{AccountId, Amount, VoucherId};

/// Eine Benachrichtigung über eine erfolgreiche Zustandsänderung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// Eine neue Gutschein-Klasse wurde angelegt. Trägt alle bei der
    /// Erstellung fixierten Felder, damit Indexer keinen Rückgriff auf
    /// den Registry-Zustand benötigen.
    VoucherCreated {
        voucher_id: VoucherId,
        owner: AccountId,
        dish_name: String,
        price: u64,
        max_supply: Amount,
        sale_start: DateTime<Utc>,
        sale_end: DateTime<Utc>,
        use_by: DateTime<Utc>,
        metadata_uri: String,
    },
    /// Einheiten einer Gutschein-Klasse wurden eingelöst (vernichtet).
    VoucherRedeemed {
        voucher_id: VoucherId,
        redeemer: AccountId,
        amount: Amount,
    },
    /// Der Eigentümer hat die Einlösbarkeit umgeschaltet.
    VoucherStatusChanged {
        voucher_id: VoucherId,
        is_active: bool,
    },
    /// Die Registry-weite Metadaten-URI wurde geändert.
    RegistryMetadataChanged { metadata_uri: String },
}
