//! # src/test_utils.rs
//!
//! Zentrale Hilfsfunktionen für alle Tests (intern und extern): eine
//! fixierte Uhr, ein gemeinsamer Basis-Zeitpunkt und Fabriken für
//! Registry, Ledger und Zugriffskontrolle.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lazy_static::lazy_static;

use crate::ledger::memory_ledger::{InMemoryLedger, StaticAccessControl};
use crate::models::voucher_class::{NewVoucherClassData, VoucherId};
use crate::services::utils::Clock;
use crate::services::voucher_registry::VoucherRegistry;

/// Die Identität des administrativen Akteurs in den Tests. Sie ist zugleich
/// der Eigentümer aller erstellten Klassen, da die Erstellung den Aufrufer
/// als Restaurant einträgt.
pub const ADMIN: &str = "bistro_admin";

/// Ein Kunde, der Einheiten erhält und einlöst.
pub const CUSTOMER: &str = "customer_1";

lazy_static! {
    /// Der Basis-Zeitpunkt `t0` aller Test-Szenarien.
    pub static ref T0: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
}

/// Eine Uhr, die immer denselben Zeitpunkt liefert.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Eine fixierte Uhr, die `days` Tage nach `t0` steht.
pub fn clock_at_days(days: i64) -> FixedClock {
    FixedClock(*T0 + Duration::days(days))
}

/// Standard-Daten für eine Test-Klasse: Verkaufsfenster `[t0, t0 + 7d]`,
/// Einlösefrist `t0 + 14d`, Auflage 10.
pub fn default_class_data(voucher_id: VoucherId) -> NewVoucherClassData {
    NewVoucherClassData {
        voucher_id,
        dish_name: "Ramen Deluxe".to_string(),
        price: 1250,
        max_supply: 10,
        sale_start: *T0,
        sale_end: *T0 + Duration::days(7),
        use_by: *T0 + Duration::days(14),
        metadata_uri: format!("ipfs://voucher-meta/{}", voucher_id),
    }
}

/// Erstellt eine frische Registry samt Ledger und Zugriffskontrolle
/// (Administrator `ADMIN`, nicht pausiert).
pub fn setup() -> (VoucherRegistry, InMemoryLedger, StaticAccessControl) {
    (
        VoucherRegistry::new(),
        InMemoryLedger::new(),
        StaticAccessControl::new(ADMIN),
    )
}

/// Wie `setup`, aber mit einer bereits erstellten Klasse unter der
/// gegebenen Kennung.
pub fn setup_with_class(
    voucher_id: VoucherId,
) -> (VoucherRegistry, InMemoryLedger, StaticAccessControl) {
    let (mut registry, ledger, access) = setup();
    registry
        .create_voucher_class(&access, ADMIN, default_class_data(voucher_id))
        .unwrap();
    (registry, ledger, access)
}
