//! Gemeinsame Identifikationstypen fuer Buchregal
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Benutzer-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenutzerId(pub Uuid);

impl BenutzerId {
    /// Erstellt eine neue zufaellige BenutzerId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for BenutzerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BenutzerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "benutzer:{}", self.0)
    }
}

/// Eindeutige Sitzungs-ID
///
/// Wird als Cookie-Wert an den Browser ausgegeben. Der Wert besteht aus
/// 32 Zufallsbytes (URL-sicheres Base64) und traegt selbst keinerlei
/// Benutzerinformation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitzungsId(pub String);

impl SitzungsId {
    /// Generiert eine neue kryptografisch zufaellige SitzungsId
    pub fn generieren() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Gibt den Cookie-Wert zurueck
    pub fn als_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SitzungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sitzung:{}", self.0)
    }
}

impl From<&str> for SitzungsId {
    fn from(wert: &str) -> Self {
        Self(wert.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benutzer_id_eindeutig() {
        let a = BenutzerId::new();
        let b = BenutzerId::new();
        assert_ne!(a, b, "Zwei neue BenutzerIds muessen verschieden sein");
    }

    #[test]
    fn benutzer_id_display() {
        let id = BenutzerId(Uuid::nil());
        assert!(id.to_string().starts_with("benutzer:"));
    }

    #[test]
    fn sitzungs_id_eindeutig() {
        let a = SitzungsId::generieren();
        let b = SitzungsId::generieren();
        assert_ne!(a, b);
    }

    #[test]
    fn sitzungs_id_ist_url_sicher() {
        let id = SitzungsId::generieren();
        assert!(!id.als_str().is_empty());
        assert!(id
            .als_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let uid = BenutzerId::new();
        let json = serde_json::to_string(&uid).unwrap();
        let uid2: BenutzerId = serde_json::from_str(&json).unwrap();
        assert_eq!(uid, uid2);
    }
}
