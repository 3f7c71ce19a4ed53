//! SQLite-Implementierung des BenutzerRepository

use buchregal_core::BenutzerId;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::repository::BenutzerRepository;
use crate::sqlite::pool::SqliteDb;

impl BenutzerRepository for SqliteDb {
    async fn laden(&self, id: BenutzerId) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, username, salt, password_hash, created_at
             FROM users WHERE id = ?",
        )
        .bind(id.inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn laden_nach_name(&self, username: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, username, salt, password_hash, created_at
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn erstellen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let id = BenutzerId::new();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, salt, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.inner().to_string())
        .bind(daten.username)
        .bind(daten.salt)
        .bind(daten.password_hash)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                DbError::Eindeutigkeit(format!(
                    "Benutzername '{}' bereits vergeben",
                    daten.username
                ))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id,
            username: daten.username.to_string(),
            salt: daten.salt.to_string(),
            password_hash: daten.password_hash.to_string(),
            created_at: now,
        })
    }

    async fn loeschen(&self, id: BenutzerId) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.inner().to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn auflisten(&self) -> DbResult<Vec<BenutzerRecord>> {
        let rows = sqlx::query(
            "SELECT id, username, salt, password_hash, created_at
             FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_benutzer).collect()
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID '{id_str}': {e}")))?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    Ok(BenutzerRecord {
        id: BenutzerId(id),
        username: row.try_get("username")?,
        salt: row.try_get("salt")?,
        password_hash: row.try_get("password_hash")?,
        created_at,
    })
}
