//! Authentifizierer – die Verify-Funktion
//!
//! Ein explizit konstruierter Wert mit injizierten Abhaengigkeiten
//! (Repository + Gast-Richtlinie). Es gibt keine prozessweite
//! Strategie-Registrierung; die Routing-Schicht bekommt den Wert uebergeben.

use std::sync::Arc;

use buchregal_db::{BenutzerRecord, BenutzerRepository};

use crate::error::{AuthError, AuthResult};
use crate::gast::GastRichtlinie;
use crate::passwort::passwort_pruefen_async;

/// Entscheidet ueber Annahme oder Ablehnung eines Anmeldeversuchs
pub struct Authentifizierer<R: BenutzerRepository> {
    repo: Arc<R>,
    gast: GastRichtlinie,
}

impl<R: BenutzerRepository> Authentifizierer<R> {
    pub fn neu(repo: Arc<R>, gast: GastRichtlinie) -> Self {
        Self { repo, gast }
    }

    /// Prueft behaupteten Namen und Geheimnis
    ///
    /// Ablauf:
    /// 1. Benutzer nach Namen laden.
    /// 2. Fehlt er, darf die Gast-Richtlinie das Gast-Konto bereitstellen
    ///    (der einzige Seiteneffekt dieser Funktion).
    /// 3. Hash aus Geheimnis und gespeichertem Salt ableiten; Annahme nur
    ///    bei Gleichheit.
    /// 4. Sonst generische Ablehnung – unbekannter Name und falsches
    ///    Passwort sind von aussen nicht unterscheidbar.
    pub async fn verifizieren(&self, username: &str, geheimnis: &str) -> AuthResult<BenutzerRecord> {
        let mut benutzer = self.repo.laden_nach_name(username).await?;

        if benutzer.is_none() {
            benutzer = self.gast.bereitstellen(self.repo.as_ref(), username).await?;
        }

        let Some(benutzer) = benutzer else {
            return Err(AuthError::UngueltigeAnmeldedaten);
        };

        let korrekt = passwort_pruefen_async(
            geheimnis.to_string(),
            benutzer.salt.clone(),
            benutzer.password_hash.clone(),
        )
        .await?;

        if !korrekt {
            tracing::warn!(username = %benutzer.username, "Fehlgeschlagener Anmeldeversuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        Ok(benutzer)
    }
}
