//! SQLite-Backend-Implementierung des Repository-Traits

pub mod benutzer;
pub mod pool;

pub use pool::SqliteDb;
