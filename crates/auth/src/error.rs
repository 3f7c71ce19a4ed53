//! Fehlertypen fuer den Auth-Kern

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Kern
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Authentifizierung ---
    /// Bewusst generisch: unterscheidet nicht zwischen unbekanntem
    /// Benutzernamen und falschem Passwort (keine Benutzer-Enumeration).
    #[error("Benutzername oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    // --- Registrierung ---
    #[error("Benutzername bereits vergeben: {0}")]
    BenutzernameVergeben(String),

    #[error("Die Passwoerter stimmen nicht ueberein")]
    PasswoerterVerschieden,

    // --- Entropie ---
    #[error("Entropiequelle nicht verfuegbar: {0}")]
    Entropie(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] buchregal_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler als Benutzermeldung gerendert wird.
    /// Alles andere (Datenbank, Entropie, Intern) ist ein Infrastrukturfehler
    /// und beendet den Request mit Status 500.
    pub fn ist_benutzerfehler(&self) -> bool {
        matches!(
            self,
            Self::UngueltigeAnmeldedaten | Self::BenutzernameVergeben(_) | Self::PasswoerterVerschieden
        )
    }
}

/// Result-Alias fuer den Auth-Kern
pub type AuthResult<T> = Result<T, AuthError>;
