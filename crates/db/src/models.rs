//! Datenbankmodelle fuer Buchregal
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Domain-Typen getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use buchregal_core::BenutzerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Benutzer-Datensatz aus der Datenbank
///
/// `salt` und `password_hash` sind hex-kodiert (32 bzw. 256 Zeichen).
/// Das Salt wird einmalig bei der Erstellung erzeugt und aendert sich nie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: BenutzerId,
    pub username: String,
    pub salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub username: &'a str,
    pub salt: &'a str,
    pub password_hash: &'a str,
}
