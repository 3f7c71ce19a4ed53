//! Passwort-Hashing mit PBKDF2-HMAC-SHA-512
//!
//! Salt und Hash werden getrennt gespeichert, beide hex-kodiert mit fester
//! Breite. Die Ableitung ist deterministisch: gleiches (Geheimnis, Salt)
//! ergibt immer denselben Hash. Der Arbeitsfaktor liegt in ITERATIONEN.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;

use crate::error::{AuthError, AuthResult};

/// Salt-Laenge in Bytes (hex-kodiert: 32 Zeichen)
pub const SALZ_BYTES: usize = 16;

/// PBKDF2-Iterationen
pub const ITERATIONEN: u32 = 10_000;

/// Laenge des abgeleiteten Hashes in Bytes (hex-kodiert: 256 Zeichen)
pub const HASH_BYTES: usize = 128;

/// Generiert ein neues zufaelliges Salt (hex-kodiert)
///
/// Schlaegt nur fehl wenn die Entropiequelle des Betriebssystems nicht
/// verfuegbar ist. Das ist ein Infrastrukturfehler, kein Benutzerfehler.
pub fn salz_generieren() -> AuthResult<String> {
    let mut bytes = [0u8; SALZ_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Entropie(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Leitet den Passwort-Hash aus Geheimnis und Salt ab (hex-kodiert)
pub fn hash_ableiten(geheimnis: &str, salz: &str) -> String {
    let mut abgeleitet = [0u8; HASH_BYTES];
    pbkdf2_hmac::<Sha512>(
        geheimnis.as_bytes(),
        salz.as_bytes(),
        ITERATIONEN,
        &mut abgeleitet,
    );
    hex::encode(abgeleitet)
}

/// Wie `hash_ableiten`, aber auf einen Blocking-Worker ausgelagert
///
/// Die KDF ist absichtlich teuer und darf den Request-Pool nicht blockieren.
pub async fn hash_ableiten_async(geheimnis: String, salz: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || hash_ableiten(&geheimnis, &salz))
        .await
        .map_err(|e| AuthError::intern(format!("KDF-Task fehlgeschlagen: {e}")))
}

/// Prueft ein Passwort gegen gespeichertes Salt und Hash
pub fn passwort_pruefen(geheimnis: &str, salz: &str, erwarteter_hash: &str) -> bool {
    hash_ableiten(geheimnis, salz) == erwarteter_hash
}

/// Wie `passwort_pruefen`, aber auf einen Blocking-Worker ausgelagert
pub async fn passwort_pruefen_async(
    geheimnis: String,
    salz: String,
    erwarteter_hash: String,
) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || passwort_pruefen(&geheimnis, &salz, &erwarteter_hash))
        .await
        .map_err(|e| AuthError::intern(format!("KDF-Task fehlgeschlagen: {e}")))
}
