//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Der Auth-Service arbeitet ausschliesslich
//! gegen diesen Trait; die SQLite-Implementierung liegt in `sqlite/`.

use buchregal_core::BenutzerId;

use crate::error::DbResult;
use crate::models::{BenutzerRecord, NeuerBenutzer};

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://buchregal.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://buchregal.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
///
/// Einzige Quelle der Wahrheit fuer Anmeldedaten. Die Eindeutigkeit des
/// Benutzernamens wird hier erzwungen: `erstellen` muss Pruefung und Insert
/// atomar ausfuehren (UNIQUE-Constraint, kein Check-then-Insert).
#[allow(async_fn_in_trait)]
pub trait BenutzerRepository: Send + Sync {
    /// Einen Benutzer anhand seiner ID laden
    async fn laden(&self, id: BenutzerId) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seines Namens laden
    async fn laden_nach_name(&self, username: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Einen neuen Benutzer anlegen
    ///
    /// Gibt `DbError::Eindeutigkeit` zurueck wenn der Name bereits vergeben
    /// ist. Bei zwei gleichzeitigen Aufrufen mit demselben Namen gewinnt
    /// genau einer.
    async fn erstellen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer loeschen
    ///
    /// Wird von diesem Kern selbst nie aufgerufen; externe Verwalter (und
    /// Tests fuer veraltete Sessions) benoetigen die Operation.
    async fn loeschen(&self, id: BenutzerId) -> DbResult<bool>;

    /// Alle Benutzer auflisten (sortiert nach Name)
    async fn auflisten(&self) -> DbResult<Vec<BenutzerRecord>>;
}
