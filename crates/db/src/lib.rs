//! buchregal-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit, das die
//! Benutzer-Datenzugriffe hinter einer einheitlichen Schnittstelle
//! abstrahiert. Als Backend dient SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use models::{BenutzerRecord, NeuerBenutzer};
pub use repository::BenutzerRepository;
pub use sqlite::SqliteDb;
