//! # src/services/utils.rs
//!
//! Enthält allgemeine Hilfsabstraktionen, derzeit die Uhr-Schnittstelle.

use chrono::{DateTime, Utc};

/// Liefert die aktuelle Zeit für die zeitabhängigen Registry-Prüfungen
/// (Verkaufsfenster, Einlösefrist).
///
/// Die Entkopplung über einen Trait macht die Fenster-Prüfungen in Tests
/// deterministisch: Produktionscode übergibt `SystemClock`, Tests eine
/// fixierte Uhr.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Die Systemuhr (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
