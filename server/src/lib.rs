//! buchregal-server – Bibliotheks-Root
//!
//! Deklariert die Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod routen;

use anyhow::Result;
use buchregal_db::{repository::DatabaseConfig, BenutzerRepository, SqliteDb};
use tokio::net::TcpListener;

use config::ServerConfig;
use routen::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen (inkl. Migrationen)
    /// 2. Auth-Dienste mit ihren Abhaengigkeiten konstruieren
    /// 3. HTTP-Listener starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let db = SqliteDb::oeffnen(&DatabaseConfig {
            url: self.config.datenbank.url.clone(),
            max_verbindungen: self.config.datenbank.max_verbindungen,
            sqlite_wal: self.config.datenbank.wal,
        })
        .await?;

        let benutzer = db.auflisten().await?;
        tracing::info!(
            anzahl = benutzer.len(),
            namen = ?benutzer.iter().map(|b| b.username.as_str()).collect::<Vec<_>>(),
            "Benutzerbestand geladen"
        );

        let state = AppState::neu(db, &self.config);
        let app = routen::router(state);

        let adresse = self.config.http_bind_adresse();
        let listener = TcpListener::bind(&adresse).await?;
        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %adresse,
            "HTTP-Server gestartet"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            })
            .await?;

        Ok(())
    }
}
