//! # src/services/mod.rs
//!
//! Bündelt die Fachlogik-Module der Bibliothek.

pub mod restaurant_index;
pub mod utils;
pub mod voucher_registry;
