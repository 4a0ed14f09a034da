//! # Integrationstests für den gesamten Gutschein-Lebenszyklus
//!
//! Deckt das Kern-Szenario ab: Erstellung, Prägung innerhalb des
//! Verkaufsfensters bis zur Auflage, Einlösung vor der Frist und die
//! Netto-Buchführung der ausstehenden Stückzahl.

use chrono::Duration;
use gastro_voucher_lib::test_utils::{
    clock_at_days, setup_with_class, FixedClock, ADMIN, CUSTOMER, T0,
};
use gastro_voucher_lib::{
    from_json, to_json, BalanceLedger, LedgerError, RegistryError, RegistryEvent, VoucherCoreError,
};

#[test]
fn full_mint_and_redeem_scenario() {
    // Klasse 1: Auflage 10, Verkaufsfenster [t0, t0+7d], Frist t0+14d.
    let (mut registry, mut ledger, access) = setup_with_class(1);

    // 1. Prägung von 10 Einheiten an Tag 1 gelingt und schöpft die Auflage aus.
    registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 1, CUSTOMER, 10)
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 10);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 10);

    // 2. Eine weitere Einheit überschreitet die Auflage.
    let err = registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 1, CUSTOMER, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::ExceedsMaxSupply {
            voucher_id: 1,
            requested: 1,
            remaining: 0,
        })
    ));

    // 3. Einlösung an Tag 8: das Verkaufsfenster ist zu, die Frist nicht.
    registry
        .redeem_units(&mut ledger, &clock_at_days(8), CUSTOMER, 1, 10)
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 0);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 0);

    // 4. Eine erneute Einlösung scheitert am leeren Bestand.
    let err = registry
        .redeem_units(&mut ledger, &clock_at_days(8), CUSTOMER, 1, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::InsufficientUnits {
            voucher_id: 1,
            available: 0,
            needed: 1,
        })
    ));

    // 5. Genau eine Einlöse-Benachrichtigung (plus die der Erstellung).
    let redeemed: Vec<_> = registry
        .events()
        .iter()
        .filter(|e| matches!(e, RegistryEvent::VoucherRedeemed { .. }))
        .collect();
    assert_eq!(redeemed.len(), 1);
}

#[test]
fn minting_is_gated_by_the_sale_window() {
    let (mut registry, mut ledger, access) = setup_with_class(1);

    // Vor dem Fenster, trotz voller Restauflage.
    let before = FixedClock(*T0 - Duration::hours(1));
    let err = registry
        .mint_units(&access, &mut ledger, &before, ADMIN, 1, CUSTOMER, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::InvalidSalePeriod)
    ));

    // Nach dem Fenster.
    let err = registry
        .mint_units(&access, &mut ledger, &clock_at_days(8), ADMIN, 1, CUSTOMER, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::InvalidSalePeriod)
    ));

    // Beide Fenstergrenzen sind inklusiv.
    registry
        .mint_units(&access, &mut ledger, &FixedClock(*T0), ADMIN, 1, CUSTOMER, 1)
        .unwrap();
    registry
        .mint_units(&access, &mut ledger, &clock_at_days(7), ADMIN, 1, CUSTOMER, 1)
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 2);
}

#[test]
fn minting_requires_the_owner_and_a_positive_amount() {
    let (mut registry, mut ledger, access) = setup_with_class(1);

    let err = registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), "not_the_owner", 1, CUSTOMER, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::NotVoucherOwner(1))
    ));

    let err = registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 1, CUSTOMER, 0)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::InvalidAmount)
    ));

    let err = registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 99, CUSTOMER, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::VoucherNotFound(99))
    ));
}

#[test]
fn redemption_fails_after_the_use_by_date() {
    let (mut registry, mut ledger, access) = setup_with_class(1);
    registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 1, CUSTOMER, 5)
        .unwrap();

    // Exakt zur Frist ist die Einlösung noch möglich.
    registry
        .redeem_units(&mut ledger, &clock_at_days(14), CUSTOMER, 1, 1)
        .unwrap();

    // Danach nicht mehr, trotz Bestand und aktiver Klasse.
    let after = FixedClock(*T0 + Duration::days(14) + Duration::seconds(1));
    let err = registry
        .redeem_units(&mut ledger, &after, CUSTOMER, 1, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::VoucherExpired(1))
    ));
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 4);
}

#[test]
fn outstanding_supply_allows_reminting_after_redemption() {
    let (mut registry, mut ledger, access) = setup_with_class(1);

    // 1. Auflage vollständig prägen und noch im Fenster wieder einlösen.
    registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 1, CUSTOMER, 10)
        .unwrap();
    registry
        .redeem_units(&mut ledger, &clock_at_days(2), CUSTOMER, 1, 10)
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 0);

    // 2. `current_supply` zählt nur ausstehende Einheiten, daher darf die
    // Klasse erneut bis zur Auflage geprägt werden.
    registry
        .mint_units(&access, &mut ledger, &clock_at_days(3), ADMIN, 1, CUSTOMER, 10)
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 10);
}

#[test]
fn supply_stays_within_bounds_across_mixed_sequences() {
    let (mut registry, mut ledger, access) = setup_with_class(1);
    let clock = clock_at_days(1);

    let steps: &[(bool, u64)] = &[
        (true, 4),
        (true, 6),
        (false, 3),
        (true, 2),
        (false, 7),
        (true, 8),
    ];
    for (is_mint, amount) in steps {
        if *is_mint {
            registry
                .mint_units(&access, &mut ledger, &clock, ADMIN, 1, CUSTOMER, *amount)
                .unwrap();
        } else {
            registry
                .redeem_units(&mut ledger, &clock, CUSTOMER, 1, *amount)
                .unwrap();
        }
        let class = registry.voucher_class(1).unwrap();
        assert!(class.current_supply <= class.max_supply);
        // Registry und Ledger bleiben im Gleichschritt.
        assert_eq!(class.current_supply, ledger.balance_of(CUSTOMER, 1));
    }
}

#[test]
fn a_failing_ledger_rolls_the_supply_change_back() {
    /// Ein Ledger, das jede Gutschrift ablehnt.
    struct RejectingLedger;

    impl BalanceLedger for RejectingLedger {
        fn credit(&mut self, _: &str, _: u64, _: u64) -> Result<(), LedgerError> {
            Err(LedgerError::Generic("credit rejected".to_string()))
        }
        fn destroy(&mut self, _: &str, _: u64, _: u64) -> Result<(), LedgerError> {
            Err(LedgerError::Generic("destroy rejected".to_string()))
        }
        fn balance_of(&self, _: &str, _: u64) -> u64 {
            0
        }
    }

    let (mut registry, _ledger, access) = setup_with_class(1);
    let mut rejecting = RejectingLedger;

    let err = registry
        .mint_units(&access, &mut rejecting, &clock_at_days(1), ADMIN, 1, CUSTOMER, 5)
        .unwrap_err();
    assert!(matches!(err, VoucherCoreError::Ledger(_)));

    // Die Supply-Änderung wurde zurückgerollt; die Operation war
    // ganz-oder-gar-nicht.
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 0);
}

#[test]
fn registry_snapshot_round_trips_through_json() {
    // 1. Einen nicht-trivialen Zustand aufbauen.
    let (mut registry, mut ledger, access) = setup_with_class(1);
    registry
        .mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, 1, CUSTOMER, 3)
        .unwrap();
    registry.set_active(ADMIN, 1, false).unwrap();

    // 2. Serialisieren und zurücklesen.
    let json_string = to_json(&registry).unwrap();
    let restored = from_json(&json_string).unwrap();

    // 3. Klassen, Index und Ereignis-Log überleben den Snapshot verlustfrei.
    assert_eq!(registry, restored);
}
