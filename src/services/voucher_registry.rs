//! # src/services/voucher_registry.rs
//!
//! Das Herzstück der Bibliothek: die Zustandsmaschine für den Lebenszyklus
//! von Gutschein-Klassen samt Supply-Buchführung. Die `VoucherRegistry`
//! besitzt die Abbildung von Kennung auf Klassen-Zustand, erzwingt die
//! Regeln für Erstellung, Prägung, Einlösung und Status-Wechsel und hält
//! den `RestaurantIndex` konsistent. Saldo-Mutationen delegiert sie an das
//! externe `BalanceLedger`; Administrator- und Pause-Prüfungen an die
//! `AccessControl`.
//!
//! Jede mutierende Operation validiert vollständig, bevor sie Zustand
//! anfasst, und ist damit ganz-oder-gar-nicht: Schlägt der Ledger-Aufruf
//! nach der Supply-Änderung fehl, wird die Änderung zurückgerollt.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::VoucherCoreError;
use crate::ledger::{AccessControl, BalanceLedger};
use crate::models::event::RegistryEvent;
use crate::models::voucher_class::{Amount, NewVoucherClassData, VoucherClass, VoucherId};
use crate::services::restaurant_index::RestaurantIndex;
use crate::services::utils::Clock;

/// Die maximale Anzahl von Einträgen in einem Batch-Prägevorgang.
pub const MAX_BATCH_SIZE: usize = 100;

/// Die Fehler-Taxonomie der Registry. Jede Variante ist eine eigenständige,
/// für den Aufrufer terminale Zurückweisung; eine automatische Wiederholung
/// findet nicht statt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Der Gericht-Name darf bei der Erstellung nicht leer sein.
    #[error("Dish name must not be empty.")]
    EmptyDishName,

    /// Die Metadaten-URI darf nicht leer sein.
    #[error("Metadata URI must not be empty.")]
    EmptyMetadataUri,

    /// Der Preis muss positiv sein.
    #[error("Price must be greater than zero.")]
    InvalidPrice,

    /// Die maximale Auflage muss positiv sein.
    #[error("Maximum supply must be greater than zero.")]
    InvalidSupply,

    /// Das Verkaufsfenster ist ungültig: entweder ist die Reihenfolge
    /// `sale_start < sale_end` bei der Erstellung verletzt, oder der
    /// Prägezeitpunkt liegt außerhalb des Fensters.
    #[error("Sale period is invalid or not currently open.")]
    InvalidSalePeriod,

    /// Die Einlösefrist muss strikt nach dem Ende des Verkaufsfensters liegen.
    #[error("Use-by date must lie strictly after the end of the sale period.")]
    UseByBeforeSaleEnd,

    /// Das Restaurant hat die Obergrenze von 100 Gutschein-Klassen erreicht.
    #[error("Restaurant has reached the maximum number of voucher classes.")]
    MaxVouchersReached,

    /// Die Kennung ist bereits vergeben; eine Klasse wird nie neu erstellt
    /// oder einem anderen Eigentümer zugewiesen.
    #[error("Voucher class with id {0} already exists.")]
    VoucherAlreadyExists(VoucherId),

    /// Unter der Kennung existiert keine Gutschein-Klasse.
    #[error("Voucher class with id {0} does not exist.")]
    VoucherNotFound(VoucherId),

    /// Der Aufrufer ist nicht der Eigentümer der Klasse.
    #[error("Caller is not the owner of voucher class {0}.")]
    NotVoucherOwner(VoucherId),

    /// Der Aufrufer ist nicht der administrative Akteur.
    #[error("Caller is not the registry administrator.")]
    NotAdministrator,

    /// Die Stückzahl muss positiv sein.
    #[error("Amount must be greater than zero.")]
    InvalidAmount,

    /// Der Aufrufer hält weniger Einheiten, als er einlösen will, oder die
    /// ausstehende Menge der Klasse deckt die Einlösung nicht.
    #[error("Insufficient units of voucher {voucher_id}: {available} available, {needed} needed.")]
    InsufficientUnits {
        voucher_id: VoucherId,
        available: Amount,
        needed: Amount,
    },

    /// Die Einlösefrist der Klasse ist abgelaufen.
    #[error("Voucher class {0} has expired.")]
    VoucherExpired(VoucherId),

    /// Die Klasse ist deaktiviert und kann nicht eingelöst werden.
    #[error("Voucher class {0} is not active.")]
    VoucherInactive(VoucherId),

    /// Die Prägung würde die maximale Auflage überschreiten.
    #[error("Minting {requested} units of voucher {voucher_id} exceeds the maximum supply ({remaining} remaining).")]
    ExceedsMaxSupply {
        voucher_id: VoucherId,
        requested: Amount,
        remaining: Amount,
    },

    /// Kennungs- und Mengen-Liste eines Batches sind ungleich lang.
    #[error("Ids and amounts arrays differ in length ({ids} vs {amounts}).")]
    ArraysLengthMismatch { ids: usize, amounts: usize },

    /// Ein Batch darf nicht leer sein.
    #[error("Batch arrays must not be empty.")]
    EmptyArrays,

    /// Ein Batch darf höchstens 100 Einträge umfassen.
    #[error("Batch of {0} entries exceeds the maximum batch size.")]
    BatchTooLarge(usize),

    /// Die Registry ist pausiert; Erstellung und Prägung sind gesperrt.
    #[error("Registry is paused.")]
    Paused,

    /// Eine mutierende Operation wurde betreten, während eine andere noch
    /// nicht abgeschlossen war.
    #[error("Reentrant call into a mutating registry operation.")]
    ReentrantCall,
}

/// Die zentrale Verwaltungsstruktur für alle Gutschein-Klassen.
///
/// Sie hält den In-Memory-Zustand (Klassen, Index, Ereignis-Log) und wird
/// als expliziter Store in jede Operation hineingereicht; einen ambienten
/// globalen Zustand gibt es nicht. Das erlaubt Tests mit isolierten
/// Registries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoucherRegistry {
    /// Der Zustand jeder Gutschein-Klasse, nach Kennung.
    classes: HashMap<VoucherId, VoucherClass>,
    /// Der per-Restaurant-Index für Aufzählung und Paginierung.
    index: RestaurantIndex,
    /// Die Registry-weite Metadaten-URI.
    metadata_uri: String,
    /// Das append-only Log der nach außen gerichteten Benachrichtigungen.
    events: Vec<RegistryEvent>,
    /// Reentrancy-Schutz: gesetzt, solange eine mutierende Operation läuft.
    /// Rein transient, überlebt keine Serialisierung.
    #[serde(skip)]
    mutation_in_progress: bool,
}

impl VoucherRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mutierende Operationen ---

    /// Erstellt eine neue Gutschein-Klasse.
    ///
    /// Nur der administrative Akteur darf erstellen; der Aufrufer wird als
    /// Eigentümer (Restaurant) der Klasse eingetragen. Die neue Klasse
    /// startet mit `current_supply = 0` und `is_active = true` und wird im
    /// `RestaurantIndex` registriert.
    pub fn create_voucher_class(
        &mut self,
        access: &dyn AccessControl,
        caller: &str,
        data: NewVoucherClassData,
    ) -> Result<(), VoucherCoreError> {
        self.enter()?;
        let result = self.create_voucher_class_inner(access, caller, data);
        self.exit();
        result
    }

    fn create_voucher_class_inner(
        &mut self,
        access: &dyn AccessControl,
        caller: &str,
        data: NewVoucherClassData,
    ) -> Result<(), VoucherCoreError> {
        // 1. Prozess- und Rollen-Gates.
        if access.is_paused() {
            return Err(RegistryError::Paused.into());
        }
        if !access.is_administrator(caller) {
            return Err(RegistryError::NotAdministrator.into());
        }

        // 2. Feld-Validierung. Gleiche Fenstergrenzen werden abgelehnt,
        // damit keine Fenster der Länge null entstehen.
        if data.dish_name.is_empty() {
            return Err(RegistryError::EmptyDishName.into());
        }
        if data.metadata_uri.is_empty() {
            return Err(RegistryError::EmptyMetadataUri.into());
        }
        if data.price == 0 {
            return Err(RegistryError::InvalidPrice.into());
        }
        if data.max_supply == 0 {
            return Err(RegistryError::InvalidSupply.into());
        }
        if data.sale_start >= data.sale_end {
            return Err(RegistryError::InvalidSalePeriod.into());
        }
        if data.sale_end >= data.use_by {
            return Err(RegistryError::UseByBeforeSaleEnd.into());
        }

        // 3. Eindeutigkeit der Kennung und Kapazität des Restaurants.
        if self.classes.contains_key(&data.voucher_id) {
            return Err(RegistryError::VoucherAlreadyExists(data.voucher_id).into());
        }
        if !self.index.has_capacity(caller) {
            return Err(RegistryError::MaxVouchersReached.into());
        }

        // 4. Zustand anlegen: Klasse, Index-Eintrag, Benachrichtigung.
        let class = VoucherClass {
            owner: caller.to_string(),
            dish_name: data.dish_name,
            price: data.price,
            max_supply: data.max_supply,
            current_supply: 0,
            sale_start: data.sale_start,
            sale_end: data.sale_end,
            use_by: data.use_by,
            is_active: true,
            metadata_uri: data.metadata_uri,
        };
        self.events.push(RegistryEvent::VoucherCreated {
            voucher_id: data.voucher_id,
            owner: class.owner.clone(),
            dish_name: class.dish_name.clone(),
            price: class.price,
            max_supply: class.max_supply,
            sale_start: class.sale_start,
            sale_end: class.sale_end,
            use_by: class.use_by,
            metadata_uri: class.metadata_uri.clone(),
        });
        self.classes.insert(data.voucher_id, class);
        self.index.record_creation(caller, data.voucher_id);
        Ok(())
    }

    /// Prägt `amount` Einheiten einer Klasse in den Bestand von `recipient`.
    ///
    /// Nur der Eigentümer darf prägen, nur innerhalb des Verkaufsfensters
    /// (beide Grenzen inklusiv), und nie über die maximale Auflage hinaus.
    pub fn mint_units(
        &mut self,
        access: &dyn AccessControl,
        ledger: &mut dyn BalanceLedger,
        clock: &dyn Clock,
        caller: &str,
        voucher_id: VoucherId,
        recipient: &str,
        amount: Amount,
    ) -> Result<(), VoucherCoreError> {
        self.enter()?;
        let result = self.mint_units_inner(access, ledger, clock, caller, voucher_id, recipient, amount);
        self.exit();
        result
    }

    fn mint_units_inner(
        &mut self,
        access: &dyn AccessControl,
        ledger: &mut dyn BalanceLedger,
        clock: &dyn Clock,
        caller: &str,
        voucher_id: VoucherId,
        recipient: &str,
        amount: Amount,
    ) -> Result<(), VoucherCoreError> {
        if access.is_paused() {
            return Err(RegistryError::Paused.into());
        }

        // 1. Validierung gegen den aktuellen Klassen-Zustand.
        let class = self
            .classes
            .get_mut(&voucher_id)
            .ok_or(RegistryError::VoucherNotFound(voucher_id))?;
        if class.owner != caller {
            return Err(RegistryError::NotVoucherOwner(voucher_id).into());
        }
        if amount == 0 {
            return Err(RegistryError::InvalidAmount.into());
        }
        let now = clock.now();
        if now < class.sale_start || now > class.sale_end {
            return Err(RegistryError::InvalidSalePeriod.into());
        }
        let new_supply = class
            .current_supply
            .checked_add(amount)
            .filter(|supply| *supply <= class.max_supply)
            .ok_or(RegistryError::ExceedsMaxSupply {
                voucher_id,
                requested: amount,
                remaining: class.remaining_supply(),
            })?;

        // 2. Supply fortschreiben, dann Gutschrift im Ledger. Schlägt die
        // Gutschrift fehl, wird die Supply-Änderung zurückgerollt.
        class.current_supply = new_supply;
        if let Err(ledger_err) = ledger.credit(recipient, voucher_id, amount) {
            if let Some(class) = self.classes.get_mut(&voucher_id) {
                class.current_supply -= amount;
            }
            return Err(ledger_err.into());
        }
        Ok(())
    }

    /// Prägt mehrere Klassen in einem Vorgang in den Bestand von `recipient`.
    ///
    /// Für jedes Paar gelten dieselben Prüfungen wie bei der Einzel-Prägung,
    /// einschließlich des Verkaufsfensters. Taucht eine Kennung mehrfach im
    /// Batch auf, wird die Auflage gegen die Summe ihrer Mengen geprüft.
    /// Der Batch ist atomar: Entweder werden alle Supplies fortgeschrieben
    /// und alle Paare in einem aggregierten Ledger-Vorgang gutgeschrieben,
    /// oder nichts davon.
    pub fn batch_mint_units(
        &mut self,
        access: &dyn AccessControl,
        ledger: &mut dyn BalanceLedger,
        clock: &dyn Clock,
        caller: &str,
        recipient: &str,
        voucher_ids: &[VoucherId],
        amounts: &[Amount],
    ) -> Result<(), VoucherCoreError> {
        self.enter()?;
        let result =
            self.batch_mint_units_inner(access, ledger, clock, caller, recipient, voucher_ids, amounts);
        self.exit();
        result
    }

    fn batch_mint_units_inner(
        &mut self,
        access: &dyn AccessControl,
        ledger: &mut dyn BalanceLedger,
        clock: &dyn Clock,
        caller: &str,
        recipient: &str,
        voucher_ids: &[VoucherId],
        amounts: &[Amount],
    ) -> Result<(), VoucherCoreError> {
        if access.is_paused() {
            return Err(RegistryError::Paused.into());
        }

        // 1. Struktur-Prüfungen des Batches.
        if voucher_ids.is_empty() && amounts.is_empty() {
            return Err(RegistryError::EmptyArrays.into());
        }
        if voucher_ids.len() != amounts.len() {
            return Err(RegistryError::ArraysLengthMismatch {
                ids: voucher_ids.len(),
                amounts: amounts.len(),
            }
            .into());
        }
        if voucher_ids.len() > MAX_BATCH_SIZE {
            return Err(RegistryError::BatchTooLarge(voucher_ids.len()).into());
        }

        // 2. Alle Paare validieren, bevor irgendetwas mutiert wird. Die
        // geplanten Zuwächse werden pro Kennung aufsummiert, damit auch
        // Duplikate im Batch die Auflage kumulativ einhalten.
        let now = clock.now();
        let mut planned: HashMap<VoucherId, Amount> = HashMap::new();
        for (voucher_id, amount) in voucher_ids.iter().zip(amounts) {
            let class = self
                .classes
                .get(voucher_id)
                .ok_or(RegistryError::VoucherNotFound(*voucher_id))?;
            if class.owner != caller {
                return Err(RegistryError::NotVoucherOwner(*voucher_id).into());
            }
            if *amount == 0 {
                return Err(RegistryError::InvalidAmount.into());
            }
            if now < class.sale_start || now > class.sale_end {
                return Err(RegistryError::InvalidSalePeriod.into());
            }

            let planned_total = planned.entry(*voucher_id).or_insert(0);
            *planned_total = planned_total
                .checked_add(*amount)
                .filter(|total| {
                    class
                        .current_supply
                        .checked_add(*total)
                        .is_some_and(|supply| supply <= class.max_supply)
                })
                .ok_or(RegistryError::ExceedsMaxSupply {
                    voucher_id: *voucher_id,
                    requested: *amount,
                    remaining: class.remaining_supply(),
                })?;
        }

        // 3. Alle Supplies fortschreiben, dann eine einzige aggregierte
        // Gutschrift. Schlägt sie fehl, werden alle Zuwächse zurückgerollt.
        for (voucher_id, increment) in &planned {
            if let Some(class) = self.classes.get_mut(voucher_id) {
                class.current_supply += increment;
            }
        }
        if let Err(ledger_err) = ledger.credit_batch(recipient, voucher_ids, amounts) {
            for (voucher_id, increment) in &planned {
                if let Some(class) = self.classes.get_mut(voucher_id) {
                    class.current_supply -= increment;
                }
            }
            return Err(ledger_err.into());
        }
        Ok(())
    }

    /// Löst `amount` Einheiten aus dem Bestand des Aufrufers ein.
    ///
    /// Die Einlösung ist bis einschließlich `use_by` möglich, erfordert eine
    /// aktive Klasse und ausreichenden Saldo. `current_supply` sinkt um die
    /// eingelöste Menge (Netto-Buchführung); die Einheiten werden im Ledger
    /// vernichtet. Der Pause-Schalter gilt hier bewusst nicht.
    pub fn redeem_units(
        &mut self,
        ledger: &mut dyn BalanceLedger,
        clock: &dyn Clock,
        caller: &str,
        voucher_id: VoucherId,
        amount: Amount,
    ) -> Result<(), VoucherCoreError> {
        self.enter()?;
        let result = self.redeem_units_inner(ledger, clock, caller, voucher_id, amount);
        self.exit();
        result
    }

    fn redeem_units_inner(
        &mut self,
        ledger: &mut dyn BalanceLedger,
        clock: &dyn Clock,
        caller: &str,
        voucher_id: VoucherId,
        amount: Amount,
    ) -> Result<(), VoucherCoreError> {
        // 1. Validierung.
        let class = self
            .classes
            .get_mut(&voucher_id)
            .ok_or(RegistryError::VoucherNotFound(voucher_id))?;
        if amount == 0 {
            return Err(RegistryError::InvalidAmount.into());
        }
        if !class.is_active {
            return Err(RegistryError::VoucherInactive(voucher_id).into());
        }
        if clock.now() > class.use_by {
            return Err(RegistryError::VoucherExpired(voucher_id).into());
        }
        let balance = ledger.balance_of(caller, voucher_id);
        if balance < amount {
            return Err(RegistryError::InsufficientUnits {
                voucher_id,
                available: balance,
                needed: amount,
            }
            .into());
        }
        // Saldo und Supply laufen bei korrektem Ledger im Gleichschritt;
        // die Unterlauf-Prüfung hält die Invariante trotzdem explizit ein.
        if class.current_supply < amount {
            return Err(RegistryError::InsufficientUnits {
                voucher_id,
                available: class.current_supply,
                needed: amount,
            }
            .into());
        }

        // 2. Supply senken, Einheiten vernichten, Benachrichtigung anhängen.
        class.current_supply -= amount;
        if let Err(ledger_err) = ledger.destroy(caller, voucher_id, amount) {
            if let Some(class) = self.classes.get_mut(&voucher_id) {
                class.current_supply += amount;
            }
            return Err(ledger_err.into());
        }
        self.events.push(RegistryEvent::VoucherRedeemed {
            voucher_id,
            redeemer: caller.to_string(),
            amount,
        });
        Ok(())
    }

    /// Schaltet die Einlösbarkeit einer Klasse um. Nur der Eigentümer darf
    /// das; Zeit- oder Supply-Bedingungen gibt es nicht, und der
    /// Pause-Schalter gilt nicht.
    pub fn set_active(
        &mut self,
        caller: &str,
        voucher_id: VoucherId,
        active: bool,
    ) -> Result<(), VoucherCoreError> {
        self.enter()?;
        let result = self.set_active_inner(caller, voucher_id, active);
        self.exit();
        result
    }

    fn set_active_inner(
        &mut self,
        caller: &str,
        voucher_id: VoucherId,
        active: bool,
    ) -> Result<(), VoucherCoreError> {
        let class = self
            .classes
            .get_mut(&voucher_id)
            .ok_or(RegistryError::VoucherNotFound(voucher_id))?;
        if class.owner != caller {
            return Err(RegistryError::NotVoucherOwner(voucher_id).into());
        }
        class.is_active = active;
        self.events.push(RegistryEvent::VoucherStatusChanged {
            voucher_id,
            is_active: active,
        });
        Ok(())
    }

    /// Setzt die Registry-weite Metadaten-URI. Nur der administrative Akteur
    /// darf das; der Pause-Schalter gilt nicht.
    pub fn set_registry_metadata(
        &mut self,
        access: &dyn AccessControl,
        caller: &str,
        metadata_uri: &str,
    ) -> Result<(), VoucherCoreError> {
        self.enter()?;
        let result = self.set_registry_metadata_inner(access, caller, metadata_uri);
        self.exit();
        result
    }

    fn set_registry_metadata_inner(
        &mut self,
        access: &dyn AccessControl,
        caller: &str,
        metadata_uri: &str,
    ) -> Result<(), VoucherCoreError> {
        if !access.is_administrator(caller) {
            return Err(RegistryError::NotAdministrator.into());
        }
        if metadata_uri.is_empty() {
            return Err(RegistryError::EmptyMetadataUri.into());
        }
        self.metadata_uri = metadata_uri.to_string();
        self.events.push(RegistryEvent::RegistryMetadataChanged {
            metadata_uri: metadata_uri.to_string(),
        });
        Ok(())
    }

    // --- Lesende Abfragen ---

    /// Der vollständige Zustand einer Klasse, oder `None`.
    pub fn voucher_class(&self, voucher_id: VoucherId) -> Option<&VoucherClass> {
        self.classes.get(&voucher_id)
    }

    /// Alle Kennungen eines Restaurants in Erstellungs-Reihenfolge.
    pub fn restaurant_voucher_ids(&self, restaurant: &str) -> &[VoucherId] {
        self.index.ids_for(restaurant)
    }

    /// Ein paginierter Ausschnitt der Kennungen eines Restaurants.
    pub fn restaurant_vouchers_paginated(
        &self,
        restaurant: &str,
        offset: usize,
        limit: usize,
    ) -> Vec<VoucherId> {
        self.index.paginated(restaurant, offset, limit)
    }

    /// Der per-Restaurant-Index.
    pub fn index(&self) -> &RestaurantIndex {
        &self.index
    }

    /// Das append-only Ereignis-Log in Einfüge-Reihenfolge.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Die Registry-weite Metadaten-URI.
    pub fn registry_metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    // --- Reentrancy-Schutz ---

    fn enter(&mut self) -> Result<(), RegistryError> {
        if self.mutation_in_progress {
            return Err(RegistryError::ReentrantCall);
        }
        self.mutation_in_progress = true;
        Ok(())
    }

    fn exit(&mut self) {
        self.mutation_in_progress = false;
    }
}

/// Serialisiert eine `VoucherRegistry` in einen formatierten JSON-String.
pub fn to_json(registry: &VoucherRegistry) -> Result<String, VoucherCoreError> {
    let json_str = serde_json::to_string_pretty(registry)?;
    Ok(json_str)
}

/// Nimmt einen JSON-String entgegen und deserialisiert ihn in eine
/// `VoucherRegistry`.
pub fn from_json(json_str: &str) -> Result<VoucherRegistry, VoucherCoreError> {
    let registry: VoucherRegistry = serde_json::from_str(json_str)?;
    Ok(registry)
}
