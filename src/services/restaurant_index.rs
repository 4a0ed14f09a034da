//! # src/services/restaurant_index.rs
//!
//! Führt pro Restaurant die geordnete, append-only Liste seiner
//! Gutschein-Klassen sowie ein begleitendes Positions-Lookup für
//! O(1)-Mitgliedschaftstests. Der Index wird ausschließlich als
//! Seiteneffekt einer erfolgreichen Erstellung in der Registry befüllt;
//! einen Löschpfad gibt es nicht.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::voucher_class::{AccountId, VoucherId};

/// Die maximale Anzahl von Gutschein-Klassen pro Restaurant.
pub const MAX_VOUCHERS_PER_RESTAURANT: usize = 100;

/// Der per-Restaurant-Index über alle erstellten Gutschein-Klassen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantIndex {
    /// Die Kennungen pro Restaurant, in Erstellungs-Reihenfolge.
    vouchers: HashMap<AccountId, Vec<VoucherId>>,
    /// 1-basierte Position jeder Kennung in der Liste ihres Restaurants.
    /// 0 bedeutet "nicht enthalten" (siehe `position`).
    positions: HashMap<AccountId, HashMap<VoucherId, u64>>,
}

impl RestaurantIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Die Anzahl der für das Restaurant registrierten Klassen.
    pub fn count(&self, restaurant: &str) -> usize {
        self.vouchers.get(restaurant).map_or(0, Vec::len)
    }

    /// Prüft, ob das Restaurant noch unterhalb der Obergrenze liegt.
    pub fn has_capacity(&self, restaurant: &str) -> bool {
        self.count(restaurant) < MAX_VOUCHERS_PER_RESTAURANT
    }

    /// Die 1-basierte Position einer Kennung in der Liste des Restaurants,
    /// oder 0, wenn sie dort nicht enthalten ist.
    pub fn position(&self, restaurant: &str, voucher_id: VoucherId) -> u64 {
        self.positions
            .get(restaurant)
            .and_then(|per_voucher| per_voucher.get(&voucher_id))
            .copied()
            .unwrap_or(0)
    }

    /// O(1)-Mitgliedschaftstest über das Positions-Lookup.
    pub fn contains(&self, restaurant: &str, voucher_id: VoucherId) -> bool {
        self.position(restaurant, voucher_id) != 0
    }

    /// Alle Kennungen des Restaurants in Erstellungs-Reihenfolge.
    /// Für ein unbekanntes Restaurant eine leere Sequenz.
    pub fn ids_for(&self, restaurant: &str) -> &[VoucherId] {
        self.vouchers
            .get(restaurant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ein paginierter Ausschnitt der Kennungen des Restaurants.
    ///
    /// Liegt `offset` auf oder hinter dem Ende der Liste, ist das Ergebnis
    /// leer; andernfalls werden bis zu `limit` Einträge ab `offset`
    /// geliefert, begrenzt auf die vorhandene Länge.
    pub fn paginated(&self, restaurant: &str, offset: usize, limit: usize) -> Vec<VoucherId> {
        let ids = self.ids_for(restaurant);
        if offset >= ids.len() {
            return Vec::new();
        }
        let end = offset.saturating_add(limit).min(ids.len());
        ids[offset..end].to_vec()
    }

    /// Registriert eine neu erstellte Klasse für ihr Restaurant.
    ///
    /// Die Registry stellt vor dem Aufruf sicher, dass Kapazität vorhanden
    /// und die Kennung neu ist; hier wird das nur noch als Invariante
    /// abgesichert.
    pub(crate) fn record_creation(&mut self, restaurant: &str, voucher_id: VoucherId) {
        debug_assert!(self.has_capacity(restaurant));
        debug_assert!(!self.contains(restaurant, voucher_id));

        let ids = self.vouchers.entry(restaurant.to_string()).or_default();
        ids.push(voucher_id);
        let position = ids.len() as u64;
        self.positions
            .entry(restaurant.to_string())
            .or_default()
            .insert(voucher_id, position);
    }
}
