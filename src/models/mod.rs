//! # src/models/mod.rs
//!
//! Bündelt die Datenmodelle der Bibliothek.

pub mod event;
pub mod voucher_class;
