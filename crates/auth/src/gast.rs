//! Gast-Bootstrap-Richtlinie
//!
//! Beim allerersten Anmeldeversuch mit dem reservierten Gast-Namen wird das
//! Gast-Konto mit einem festen, allgemein bekannten Passwort angelegt
//! (bewusst schwach, nur fuer das Gast-Konto, kein allgemeiner
//! Registrierungs-Bypass). Die Richtlinie ist bewusst ein eigener,
//! testbarer Baustein und laesst sich per Konfiguration abschalten.

use buchregal_db::{models::NeuerBenutzer, BenutzerRecord, BenutzerRepository};

use crate::error::AuthResult;
use crate::passwort::{hash_ableiten_async, salz_generieren};

/// Reservierter Name des Gast-Kontos
pub const GAST_NAME: &str = "guest";

/// Festes Passwort des Gast-Kontos
pub const GAST_PASSWORT: &str = "letmein";

/// Richtlinie fuer die einmalige Gast-Bereitstellung
#[derive(Debug, Clone)]
pub struct GastRichtlinie {
    aktiviert: bool,
}

impl GastRichtlinie {
    pub fn neu(aktiviert: bool) -> Self {
        Self { aktiviert }
    }

    /// Gibt true zurueck wenn die Richtlinie fuer diesen Namen greift
    pub fn gilt_fuer(&self, username: &str) -> bool {
        self.aktiviert && username == GAST_NAME
    }

    /// Stellt das Gast-Konto bereit, falls die Richtlinie greift
    ///
    /// Gibt `None` zurueck wenn die Richtlinie nicht greift. Verlieren wir
    /// das Rennen gegen einen gleichzeitigen Bootstrap, gilt der bereits
    /// angelegte Datensatz (der UNIQUE-Constraint des Stores entscheidet).
    pub async fn bereitstellen<R: BenutzerRepository>(
        &self,
        repo: &R,
        username: &str,
    ) -> AuthResult<Option<BenutzerRecord>> {
        if !self.gilt_fuer(username) {
            return Ok(None);
        }

        let salz = salz_generieren()?;
        let hash = hash_ableiten_async(GAST_PASSWORT.to_string(), salz.clone()).await?;

        match repo
            .erstellen(NeuerBenutzer {
                username: GAST_NAME,
                salt: &salz,
                password_hash: &hash,
            })
            .await
        {
            Ok(benutzer) => {
                tracing::info!(benutzer_id = %benutzer.id, "Gast-Konto angelegt");
                Ok(Some(benutzer))
            }
            Err(e) if e.ist_eindeutigkeit() => {
                tracing::debug!("Gast-Konto existiert bereits (gleichzeitiger Bootstrap)");
                Ok(repo.laden_nach_name(GAST_NAME).await?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for GastRichtlinie {
    fn default() -> Self {
        Self { aktiviert: true }
    }
}
