//! Database configuration module for the gallon ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables and indexes based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements
//! from the entity models, ensuring that the database schema matches the Rust struct
//! definitions without requiring manual SQL.

use crate::entities::{Employee, GallonTransaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
///
/// Looks for `DATABASE_URL` and falls back to a local `SQLite` file that is
/// created on first use (`mode=rwc`).
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/gallon_ledger.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the `SQLite` database using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates the employee and transaction tables plus their secondary indexes
/// using `SeaORM`'s schema generation from the entity definitions.
///
/// Every statement runs with `IF NOT EXISTS`, so calling this on every
/// startup against an existing database is harmless.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut employee_table = schema.create_table_from_entity(Employee);
    employee_table.if_not_exists();
    let mut transaction_table = schema.create_table_from_entity(GallonTransaction);
    transaction_table.if_not_exists();

    db.execute(builder.build(&employee_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    for mut index in schema.create_index_from_entity(Employee) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }
    for mut index in schema.create_index_from_entity(GallonTransaction) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}
