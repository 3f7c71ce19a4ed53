//! Kontoverwaltung – Anlegen und Registrierung
//!
//! Das Anlegen erzeugt Salt und Hash und persistiert den Datensatz. Die
//! Eindeutigkeit des Namens erzwingt der Store beim Insert; die Vorab-
//! Pruefung in `registrieren` liefert nur die freundlichere Meldung.

use std::sync::Arc;

use buchregal_db::{models::NeuerBenutzer, BenutzerRecord, BenutzerRepository};

use crate::error::{AuthError, AuthResult};
use crate::passwort::{hash_ableiten_async, salz_generieren};

/// Verwaltet das Anlegen von Benutzerkonten
pub struct KontoVerwaltung<R: BenutzerRepository> {
    repo: Arc<R>,
}

impl<R: BenutzerRepository> KontoVerwaltung<R> {
    pub fn neu(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Legt ein Konto an: Salt erzeugen, Hash ableiten, persistieren
    ///
    /// Der Insert ist der einzige Schreibzugriff; ein abgebrochener Request
    /// hinterlaesst keinen halben Datensatz.
    pub async fn anlegen(&self, username: &str, geheimnis: &str) -> AuthResult<BenutzerRecord> {
        let salz = salz_generieren()?;
        let hash = hash_ableiten_async(geheimnis.to_string(), salz.clone()).await?;

        match self
            .repo
            .erstellen(NeuerBenutzer {
                username,
                salt: &salz,
                password_hash: &hash,
            })
            .await
        {
            Ok(benutzer) => {
                tracing::info!(
                    benutzer_id = %benutzer.id,
                    username = %benutzer.username,
                    "Neues Konto angelegt"
                );
                Ok(benutzer)
            }
            Err(e) if e.ist_eindeutigkeit() => {
                Err(AuthError::BenutzernameVergeben(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Registrierung (Signup) mit Passwort-Bestaetigung
    ///
    /// Reihenfolge wie im Formular: erst vergebener Name, dann
    /// Bestaetigungsfehler. Das Rennen zwischen Vorab-Pruefung und Insert
    /// faengt der UNIQUE-Constraint des Stores ab.
    pub async fn registrieren(
        &self,
        username: &str,
        geheimnis: &str,
        bestaetigung: &str,
    ) -> AuthResult<BenutzerRecord> {
        if self.repo.laden_nach_name(username).await?.is_some() {
            return Err(AuthError::BenutzernameVergeben(username.to_string()));
        }
        if geheimnis != bestaetigung {
            return Err(AuthError::PasswoerterVerschieden);
        }
        self.anlegen(username, geheimnis).await
    }
}
