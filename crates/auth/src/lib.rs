//! buchregal-auth – Authentifizierungs-Kern
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit PBKDF2-HMAC-SHA-512 (Salt + Hash getrennt, hex)
//! - Authentifizierer (Verify-Funktion mit injizierten Abhaengigkeiten)
//! - Gast-Bootstrap als eigenstaendige, abschaltbare Richtlinie
//! - Kontoverwaltung (Anlegen, Registrierung mit Passwort-Bestaetigung)
//! - Session-Identitaet (Token-Serialisierung, Anmelden/Abmelden,
//!   request-bezogene Benutzersicht)
//! - Sitzungs-Store (in-memory mit TTL und Einmal-Nachrichten)

pub mod anmeldung;
pub mod error;
pub mod gast;
pub mod identitaet;
pub mod konten;
pub mod passwort;
pub mod session;

#[cfg(test)]
pub(crate) mod testhilfe;

// Bequeme Re-Exporte
pub use anmeldung::Authentifizierer;
pub use error::{AuthError, AuthResult};
pub use gast::{GastRichtlinie, GAST_NAME, GAST_PASSWORT};
pub use identitaet::{
    token_deserialisieren, token_serialisieren, AngemeldeterBenutzer, IdentitaetsManager,
    SessionToken, STANDARD_ROLLE,
};
pub use konten::KontoVerwaltung;
pub use passwort::{hash_ableiten, passwort_pruefen, salz_generieren};
pub use session::{Sitzung, SitzungsStore};
