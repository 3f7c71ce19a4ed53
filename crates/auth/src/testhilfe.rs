//! In-Memory BenutzerRepository fuer Tests

use std::sync::Mutex;

use buchregal_core::BenutzerId;
use buchregal_db::{
    models::{BenutzerRecord, NeuerBenutzer},
    BenutzerRepository, DbError, DbResult,
};
use chrono::Utc;

/// Minimaler In-Memory-Store. Pruefung und Insert laufen unter einem Lock,
/// damit die Eindeutigkeitsgarantie des echten Stores nachgebildet wird.
#[derive(Default)]
pub struct TestBenutzerRepo {
    benutzer: Mutex<Vec<BenutzerRecord>>,
}

impl BenutzerRepository for TestBenutzerRepo {
    async fn laden(&self, id: BenutzerId) -> DbResult<Option<BenutzerRecord>> {
        Ok(self
            .benutzer
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn laden_nach_name(&self, username: &str) -> DbResult<Option<BenutzerRecord>> {
        Ok(self
            .benutzer
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn erstellen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let mut benutzer = self.benutzer.lock().unwrap();
        if benutzer.iter().any(|u| u.username == daten.username) {
            return Err(DbError::Eindeutigkeit(format!(
                "Benutzername '{}' bereits vergeben",
                daten.username
            )));
        }
        let record = BenutzerRecord {
            id: BenutzerId::new(),
            username: daten.username.to_string(),
            salt: daten.salt.to_string(),
            password_hash: daten.password_hash.to_string(),
            created_at: Utc::now(),
        };
        benutzer.push(record.clone());
        Ok(record)
    }

    async fn loeschen(&self, id: BenutzerId) -> DbResult<bool> {
        let mut benutzer = self.benutzer.lock().unwrap();
        let vorher = benutzer.len();
        benutzer.retain(|u| u.id != id);
        Ok(benutzer.len() < vorher)
    }

    async fn auflisten(&self) -> DbResult<Vec<BenutzerRecord>> {
        let mut alle = self.benutzer.lock().unwrap().clone();
        alle.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(alle)
    }
}
