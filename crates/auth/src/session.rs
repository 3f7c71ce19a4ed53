//! Sitzungs-Verwaltung
//!
//! In-Memory-Store fuer Sitzungen, adressiert ueber die Cookie-SitzungsId.
//! Eine Sitzung traegt hoechstens ein Session-Token (den Verweis auf den
//! angemeldeten Benutzer) und hoechstens eine Einmal-Nachricht. Schreiben
//! gilt last-write-wins; ein Hintergrund-Task bereinigt abgelaufene
//! Sitzungen automatisch.

use std::{collections::HashMap, sync::Arc, time::Duration};

use buchregal_core::SitzungsId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::identitaet::SessionToken;

/// Standard-Sitzungs-Lebensdauer: 24 Stunden
const SITZUNG_TTL_SEKUNDEN: i64 = 24 * 60 * 60;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Eine aktive Sitzung
#[derive(Debug, Clone)]
pub struct Sitzung {
    /// Cookie-Wert der Sitzung
    pub id: SitzungsId,
    /// Verweis auf den angemeldeten Benutzer (None = anonym)
    pub token: Option<SessionToken>,
    /// Einmal-Nachricht (Lesen leert den Slot)
    pub nachricht: Option<String>,
    /// Zeitpunkt der Sitzungs-Erstellung
    pub erstellt_am: DateTime<Utc>,
    /// Zeitpunkt des Sitzungs-Ablaufs
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Sitzung {
    /// Gibt `true` zurueck wenn die Sitzung noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }
}

/// In-Memory Sitzungs-Store mit TTL-Unterstuetzung
#[derive(Debug)]
pub struct SitzungsStore {
    ttl_sekunden: i64,
    sitzungen: RwLock<HashMap<SitzungsId, Sitzung>>,
}

impl SitzungsStore {
    /// Erstellt einen neuen leeren Store mit Standard-TTL
    pub fn neu() -> Arc<Self> {
        Self::mit_ttl_sekunden(SITZUNG_TTL_SEKUNDEN)
    }

    /// Erstellt einen Store mit eigener TTL
    pub fn mit_ttl_sekunden(ttl_sekunden: i64) -> Arc<Self> {
        Arc::new(Self {
            ttl_sekunden,
            sitzungen: RwLock::new(HashMap::new()),
        })
    }

    /// Startet den Cleanup-Task fuer einen bestehenden Store
    pub fn neu_mit_cleanup(store: Arc<Self>) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Sitzungen bereinigt");
                }
            }
        });
        store
    }

    fn frische_sitzung(&self, id: SitzungsId) -> Sitzung {
        let jetzt = Utc::now();
        Sitzung {
            id,
            token: None,
            nachricht: None,
            erstellt_am: jetzt,
            laeuft_ab_am: jetzt + chrono::Duration::seconds(self.ttl_sekunden),
        }
    }

    /// Erstellt eine neue anonyme Sitzung mit frischer Id
    pub async fn erstellen(&self) -> Sitzung {
        let sitzung = self.frische_sitzung(SitzungsId::generieren());
        self.sitzungen
            .write()
            .await
            .insert(sitzung.id.clone(), sitzung.clone());
        tracing::debug!(sitzung = %sitzung.id, "Neue Sitzung erstellt");
        sitzung
    }

    /// Laedt eine Sitzung; abgelaufene und unbekannte ergeben `None`
    pub async fn laden(&self, id: &SitzungsId) -> Option<Sitzung> {
        let sitzungen = self.sitzungen.read().await;
        match sitzungen.get(id) {
            Some(s) if s.ist_gueltig() => Some(s.clone()),
            _ => None,
        }
    }

    /// Setzt das Token einer Sitzung (last-write-wins)
    ///
    /// Existiert die Sitzung nicht mehr, wird sie unter derselben Id frisch
    /// angelegt – der Store kennt nur get/set/clear-Semantik.
    pub async fn token_setzen(&self, id: &SitzungsId, token: SessionToken) {
        let mut sitzungen = self.sitzungen.write().await;
        let sitzung = sitzungen
            .entry(id.clone())
            .or_insert_with(|| self.frische_sitzung(id.clone()));
        if !sitzung.ist_gueltig() {
            *sitzung = self.frische_sitzung(id.clone());
        }
        sitzung.token = Some(token);
    }

    /// Entfernt das Token einer Sitzung
    ///
    /// Laeuft vollstaendig unter dem Write-Lock: sobald der Aufruf
    /// zurueckkehrt, wird das alte Token von keinem Request mehr akzeptiert.
    pub async fn token_leeren(&self, id: &SitzungsId) {
        let mut sitzungen = self.sitzungen.write().await;
        if let Some(sitzung) = sitzungen.get_mut(id) {
            sitzung.token = None;
        }
    }

    /// Hinterlegt eine Einmal-Nachricht (ueberschreibt eine vorhandene)
    pub async fn nachricht_setzen(&self, id: &SitzungsId, text: impl Into<String>) {
        let mut sitzungen = self.sitzungen.write().await;
        let sitzung = sitzungen
            .entry(id.clone())
            .or_insert_with(|| self.frische_sitzung(id.clone()));
        sitzung.nachricht = Some(text.into());
    }

    /// Holt die Einmal-Nachricht ab; Lesen leert den Slot
    pub async fn nachricht_abholen(&self, id: &SitzungsId) -> Option<String> {
        let mut sitzungen = self.sitzungen.write().await;
        sitzungen.get_mut(id).and_then(|s| s.nachricht.take())
    }

    /// Bereinigt abgelaufene Sitzungen, gibt die Anzahl der entfernten zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut sitzungen = self.sitzungen.write().await;
        let vorher = sitzungen.len();
        sitzungen.retain(|_, s| s.laeuft_ab_am > jetzt);
        vorher - sitzungen.len()
    }

    /// Gibt die Anzahl der aktiven (nicht abgelaufenen) Sitzungen zurueck
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        let sitzungen = self.sitzungen.read().await;
        sitzungen.values().filter(|s| s.laeuft_ab_am > jetzt).count()
    }
}
