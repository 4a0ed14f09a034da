//! # src/models/voucher_class.rs
//!
//! Definiert die zentrale Datenstruktur einer Gutschein-Klasse sowie die
//! zugehörigen Typ-Aliase. Eine `VoucherClass` beschreibt ein von einem
//! Restaurant herausgegebenes, semi-fungibles Rabatt-Angebot mit fester
//! Auflage, Verkaufsfenster und Einlösefrist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Eindeutige Kennung einer Gutschein-Klasse.
pub type VoucherId = u64;

/// Identität eines Akteurs (Administrator, Restaurant oder Kunde).
/// Für diesen Kern ist die Identität ein opaker String; Signaturen oder
/// Schlüssel-Ableitungen finden auf dieser Ebene nicht statt.
pub type AccountId = String;

/// Eine Stückzahl von Gutschein-Einheiten.
pub type Amount = u64;

/// Der vollständige Zustand einer Gutschein-Klasse.
///
/// Alle Felder außer `current_supply` und `is_active` sind nach der
/// Erstellung unveränderlich. `current_supply` ist die *ausstehende*
/// Stückzahl (geprägt minus eingelöst), nicht die jemals geprägte Menge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherClass {
    /// Die Identität des herausgebenden Restaurants. Wird bei der
    /// Erstellung gesetzt und danach nie wieder verändert.
    pub owner: AccountId,
    /// Der Name des beworbenen Gerichts. Nie leer.
    pub dish_name: String,
    /// Der Preis in der kleinsten Währungseinheit. Rein informativ;
    /// dieser Kern zieht keine Zahlungen ein.
    pub price: u64,
    /// Die Obergrenze für die ausstehende Stückzahl.
    pub max_supply: Amount,
    /// Die aktuell ausstehende Stückzahl (geprägt minus eingelöst).
    pub current_supply: Amount,
    /// Beginn des Verkaufsfensters (inklusiv).
    pub sale_start: DateTime<Utc>,
    /// Ende des Verkaufsfensters (inklusiv).
    pub sale_end: DateTime<Utc>,
    /// Einlösefrist: nach diesem Zeitpunkt ist keine Einlösung mehr möglich.
    pub use_by: DateTime<Utc>,
    /// Schaltet die Einlösbarkeit. Nur vom Eigentümer veränderbar.
    pub is_active: bool,
    /// URI zu den beschreibenden Metadaten. Nie leer.
    pub metadata_uri: String,
}

impl VoucherClass {
    /// Die noch prägbare Stückzahl, bezogen auf die *ausstehende* Menge.
    ///
    /// Da `current_supply` bei Einlösungen sinkt, kann eine vollständig
    /// eingelöste Klasse innerhalb ihres Verkaufsfensters erneut bis zur
    /// Obergrenze geprägt werden.
    pub fn remaining_supply(&self) -> Amount {
        self.max_supply - self.current_supply
    }
}

/// Bündelt alle Eingabedaten zur Erstellung einer neuen Gutschein-Klasse.
/// Dies vereinfacht die Signatur von `VoucherRegistry::create_voucher_class`.
#[derive(Debug, Clone)]
pub struct NewVoucherClassData {
    pub voucher_id: VoucherId,
    pub dish_name: String,
    pub price: u64,
    pub max_supply: Amount,
    pub sale_start: DateTime<Utc>,
    pub sale_end: DateTime<Utc>,
    pub use_by: DateTime<Utc>,
    pub metadata_uri: String,
}
