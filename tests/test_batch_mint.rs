//! # Integrationstests für die Batch-Prägung
//!
//! Der Batch-Pfad wendet pro Paar dieselben Prüfungen an wie die
//! Einzel-Prägung (einschließlich des Verkaufsfensters) und ist atomar:
//! Entweder werden alle Paare gutgeschrieben, oder keines.

use chrono::Duration;
use gastro_voucher_lib::test_utils::{
    clock_at_days, default_class_data, setup, setup_with_class, FixedClock, ADMIN, CUSTOMER, T0,
};
use gastro_voucher_lib::{BalanceLedger, RegistryError, VoucherCoreError};

fn assert_registry_err(result: Result<(), VoucherCoreError>, expected: RegistryError) {
    match result.unwrap_err() {
        VoucherCoreError::Registry(err) => assert_eq!(err, expected),
        other => panic!("Expected a registry error, but got {:?}", other),
    }
}

#[test]
fn batch_structural_checks() {
    let (mut registry, mut ledger, access) = setup_with_class(1);
    let clock = clock_at_days(1);

    // Leerer Batch.
    assert_registry_err(
        registry.batch_mint_units(&access, &mut ledger, &clock, ADMIN, CUSTOMER, &[], &[]),
        RegistryError::EmptyArrays,
    );

    // Ungleich lange Listen.
    assert_registry_err(
        registry.batch_mint_units(&access, &mut ledger, &clock, ADMIN, CUSTOMER, &[1], &[1, 2]),
        RegistryError::ArraysLengthMismatch { ids: 1, amounts: 2 },
    );

    // 101 Einträge überschreiten die Batch-Obergrenze.
    let ids = vec![1u64; 101];
    let amounts = vec![1u64; 101];
    assert_registry_err(
        registry.batch_mint_units(&access, &mut ledger, &clock, ADMIN, CUSTOMER, &ids, &amounts),
        RegistryError::BatchTooLarge(101),
    );

    // Keine der Zurückweisungen hat Zustand hinterlassen.
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 0);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 0);
}

#[test]
fn a_valid_batch_credits_every_pair() {
    // 1. Drei Klassen anlegen.
    let (mut registry, mut ledger, access) = setup();
    for id in 1..=3 {
        registry
            .create_voucher_class(&access, ADMIN, default_class_data(id))
            .unwrap();
    }

    // 2. Ein Batch über alle drei Klassen.
    registry
        .batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(1),
            ADMIN,
            CUSTOMER,
            &[1, 2, 3],
            &[2, 5, 10],
        )
        .unwrap();

    // 3. Jede Supply und jeder Saldo ist fortgeschrieben.
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 2);
    assert_eq!(registry.voucher_class(2).unwrap().current_supply, 5);
    assert_eq!(registry.voucher_class(3).unwrap().current_supply, 10);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 2);
    assert_eq!(ledger.balance_of(CUSTOMER, 2), 5);
    assert_eq!(ledger.balance_of(CUSTOMER, 3), 10);
}

#[test]
fn duplicate_ids_in_a_batch_are_capped_cumulatively() {
    let (mut registry, mut ledger, access) = setup_with_class(1);

    // 6 + 5 Einheiten derselben Klasse überschreiten die Auflage von 10,
    // obwohl jedes Paar für sich genommen passen würde.
    let err = registry
        .batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(1),
            ADMIN,
            CUSTOMER,
            &[1, 1],
            &[6, 5],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherCoreError::Registry(RegistryError::ExceedsMaxSupply { voucher_id: 1, .. })
    ));

    // Atomar: auch das erste Paar wurde nicht angewendet.
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 0);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 0);

    // Innerhalb der Auflage sind Duplikate zulässig.
    registry
        .batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(1),
            ADMIN,
            CUSTOMER,
            &[1, 1],
            &[6, 4],
        )
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 10);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 10);
}

#[test]
fn a_failing_pair_leaves_no_partial_state() {
    // Klasse 1 existiert, Klasse 2 nicht: Das zweite Paar lässt den ganzen
    // Batch scheitern, bevor irgendetwas mutiert wurde.
    let (mut registry, mut ledger, access) = setup_with_class(1);

    assert_registry_err(
        registry.batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(1),
            ADMIN,
            CUSTOMER,
            &[1, 2],
            &[3, 3],
        ),
        RegistryError::VoucherNotFound(2),
    );
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 0);
    assert_eq!(ledger.balance_of(CUSTOMER, 1), 0);

    // Ein fremder Aufrufer scheitert an jedem Paar.
    assert_registry_err(
        registry.batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(1),
            "not_the_owner",
            CUSTOMER,
            &[1],
            &[1],
        ),
        RegistryError::NotVoucherOwner(1),
    );

    // Eine Null-Menge ebenso.
    assert_registry_err(
        registry.batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(1),
            ADMIN,
            CUSTOMER,
            &[1],
            &[0],
        ),
        RegistryError::InvalidAmount,
    );
}

#[test]
fn batch_minting_enforces_the_sale_window() {
    let (mut registry, mut ledger, access) = setup_with_class(1);

    // Die gewählte Policy: Der Batch-Pfad prüft das Verkaufsfenster genauso
    // wie die Einzel-Prägung.
    let before = FixedClock(*T0 - Duration::hours(1));
    assert_registry_err(
        registry.batch_mint_units(&access, &mut ledger, &before, ADMIN, CUSTOMER, &[1], &[1]),
        RegistryError::InvalidSalePeriod,
    );
    assert_registry_err(
        registry.batch_mint_units(
            &access,
            &mut ledger,
            &clock_at_days(8),
            ADMIN,
            CUSTOMER,
            &[1],
            &[1],
        ),
        RegistryError::InvalidSalePeriod,
    );

    // Innerhalb des Fensters gelingt derselbe Batch.
    registry
        .batch_mint_units(&access, &mut ledger, &clock_at_days(1), ADMIN, CUSTOMER, &[1], &[1])
        .unwrap();
    assert_eq!(registry.voucher_class(1).unwrap().current_supply, 1);
}
