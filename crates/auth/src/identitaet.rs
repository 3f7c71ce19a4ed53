//! Session-Identitaet
//!
//! Bindet einen angemeldeten Benutzer an eine Sitzung. In der Sitzung liegt
//! nur das minimale Token (die Benutzer-Id) – keine Geheimnisse und keine
//! Profildaten, die gegen den Store veralten koennten. Die request-bezogene
//! Benutzersicht wird bei jedem Request frisch aus dem Store rekonstruiert.
//!
//! Serialisierung und Deserialisierung sind gewoehnliche Funktionen, die von
//! der Session-Schicht explizit aufgerufen werden – keine registrierten
//! Callbacks.

use std::sync::Arc;

use buchregal_core::{BenutzerId, SitzungsId};
use buchregal_db::{BenutzerRecord, BenutzerRepository};
use serde::{Deserialize, Serialize};

use crate::anmeldung::Authentifizierer;
use crate::error::AuthResult;
use crate::gast::GastRichtlinie;
use crate::session::SitzungsStore;

/// Rolle, die jedem angemeldeten Benutzer zugewiesen wird
pub const STANDARD_ROLLE: &str = "editor";

/// Minimales Token im Sitzungs-Store: nur der Verweis auf den Benutzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub benutzer_id: BenutzerId,
}

/// Request-bezogene Sicht auf den angemeldeten Benutzer
///
/// Wird pro Request aus dem Token rekonstruiert und am Ende des Requests
/// verworfen; nie persistiert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AngemeldeterBenutzer {
    pub username: String,
    pub rolle: String,
}

/// Reduziert einen Benutzer-Datensatz auf das Session-Token
pub fn token_serialisieren(benutzer: &BenutzerRecord) -> SessionToken {
    SessionToken {
        benutzer_id: benutzer.id,
    }
}

/// Rekonstruiert die Benutzersicht aus einem Session-Token
///
/// Verweist das Token auf einen inzwischen geloeschten Benutzer, ergibt das
/// `None` (anonym) – eine veraltete Sitzung ist kein Fehler. Nur echte
/// Store-Fehler werden propagiert.
pub async fn token_deserialisieren<R: BenutzerRepository>(
    repo: &R,
    token: &SessionToken,
) -> AuthResult<Option<AngemeldeterBenutzer>> {
    let Some(benutzer) = repo.laden(token.benutzer_id).await? else {
        tracing::debug!(
            benutzer_id = %token.benutzer_id,
            "Session-Token verweist auf geloeschten Benutzer"
        );
        return Ok(None);
    };

    Ok(Some(AngemeldeterBenutzer {
        username: benutzer.username,
        rolle: STANDARD_ROLLE.to_string(),
    }))
}

/// Verwaltet die Zustandsuebergaenge einer Sitzung
/// (anonym -> angemeldet -> abgemeldet)
pub struct IdentitaetsManager<R: BenutzerRepository> {
    authentifizierer: Authentifizierer<R>,
    repo: Arc<R>,
    sitzungen: Arc<SitzungsStore>,
}

impl<R: BenutzerRepository> IdentitaetsManager<R> {
    pub fn neu(repo: Arc<R>, gast: GastRichtlinie, sitzungen: Arc<SitzungsStore>) -> Self {
        Self {
            authentifizierer: Authentifizierer::neu(Arc::clone(&repo), gast),
            repo,
            sitzungen,
        }
    }

    /// Gibt den Sitzungs-Store zurueck
    pub fn sitzungen(&self) -> &Arc<SitzungsStore> {
        &self.sitzungen
    }

    /// Meldet einen Benutzer an
    ///
    /// Nach erfolgreicher Verifikation wird das Token mit einem einzigen
    /// Schreibzugriff in der Sitzung hinterlegt; ein Abbruch davor
    /// hinterlaesst keine halb angemeldete Sitzung.
    pub async fn anmelden(
        &self,
        sitzung: &SitzungsId,
        username: &str,
        geheimnis: &str,
    ) -> AuthResult<BenutzerRecord> {
        let benutzer = self.authentifizierer.verifizieren(username, geheimnis).await?;

        self.sitzungen
            .token_setzen(sitzung, token_serialisieren(&benutzer))
            .await;

        tracing::info!(
            benutzer_id = %benutzer.id,
            username = %benutzer.username,
            "Benutzer angemeldet"
        );
        Ok(benutzer)
    }

    /// Meldet die Sitzung ab
    ///
    /// Das Token ist bereits entfernt wenn der Aufruf zurueckkehrt; kein
    /// nachfolgender Request akzeptiert es noch.
    pub async fn abmelden(&self, sitzung: &SitzungsId) {
        self.sitzungen.token_leeren(sitzung).await;
        tracing::info!("Benutzer abgemeldet");
    }

    /// Rekonstruiert die Benutzersicht fuer den aktuellen Request
    ///
    /// Ergibt `None` fuer unbekannte, abgelaufene und anonyme Sitzungen
    /// sowie fuer Tokens auf geloeschte Benutzer.
    pub async fn aktueller_benutzer(
        &self,
        sitzung: &SitzungsId,
    ) -> AuthResult<Option<AngemeldeterBenutzer>> {
        let Some(daten) = self.sitzungen.laden(sitzung).await else {
            return Ok(None);
        };
        let Some(token) = daten.token else {
            return Ok(None);
        };
        token_deserialisieren(self.repo.as_ref(), &token).await
    }

    /// Hinterlegt eine Einmal-Nachricht in der Sitzung
    pub async fn nachricht_setzen(&self, sitzung: &SitzungsId, text: impl Into<String>) {
        self.sitzungen.nachricht_setzen(sitzung, text).await;
    }

    /// Holt die Einmal-Nachricht ab (Lesen leert den Slot)
    pub async fn nachricht_abholen(&self, sitzung: &SitzungsId) -> Option<String> {
        self.sitzungen.nachricht_abholen(sitzung).await
    }
}
