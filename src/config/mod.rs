/// Database connection and schema management
pub mod database;

/// Initial employee roster loading from config.toml
pub mod employees;
