//! Shared test utilities for the gallon ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test employees and journal records with sensible defaults.

use crate::{
    core::{employee, transaction},
    entities::{self, EmployeeStatus, TransactionKind},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an in-memory database served by exactly one pooled connection.
///
/// Each pooled connection to `sqlite::memory:` opens its own private
/// database, so tests that spawn concurrent tasks against shared state must
/// pin the pool to a single connection.
pub async fn setup_single_connection_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test employee with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `badge` - Badge identifier
/// * `name` - Employee full name
///
/// # Defaults
/// * `department`: "Production"
/// * `position`: "Operator"
/// * `monthly_quota`: 10
/// * `status`: active
pub async fn create_test_employee(
    db: &DatabaseConnection,
    badge: &str,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(
        db,
        employee::NewEmployee {
            employee_id: badge.to_string(),
            name: name.to_string(),
            department: Some("Production".to_string()),
            position: Some("Operator".to_string()),
            monthly_quota: 10,
            status: EmployeeStatus::Active,
        },
    )
    .await
}

/// Creates a test employee with a custom quota and status.
/// Use this when you need to test specific employee configurations.
pub async fn create_custom_employee(
    db: &DatabaseConnection,
    badge: &str,
    name: &str,
    monthly_quota: i32,
    status: EmployeeStatus,
) -> Result<entities::employee::Model> {
    employee::create_employee(
        db,
        employee::NewEmployee {
            employee_id: badge.to_string(),
            name: name.to_string(),
            department: None,
            position: None,
            monthly_quota,
            status,
        },
    )
    .await
}

/// Appends a `take` journal record directly, bypassing the quota gate.
/// Use this to build history without moving the usage counter.
pub async fn create_test_take(
    db: &DatabaseConnection,
    employee_id: i64,
    quantity: i32,
    date: NaiveDate,
) -> Result<entities::gallon_transaction::Model> {
    transaction::record_transaction(db, employee_id, quantity, date, TransactionKind::Take, None)
        .await
}

/// Rewrites an employee's stored quota state, bypassing all validation.
/// Tests use this to simulate usage accumulated in an earlier month.
pub async fn set_quota_state(
    db: &DatabaseConnection,
    id: i64,
    current_usage: i32,
    last_reset_date: Option<NaiveDate>,
) -> Result<()> {
    let stored = get_stored_employee(db, id).await?;
    let mut active: entities::employee::ActiveModel = stored.into();
    active.current_usage = Set(current_usage);
    active.last_reset_date = Set(last_reset_date);
    active.update(db).await?;
    Ok(())
}

/// Fetches an employee row that the test expects to exist.
pub async fn get_stored_employee(
    db: &DatabaseConnection,
    id: i64,
) -> Result<entities::employee::Model> {
    crate::core::employee::get_employee_by_id(db, id)
        .await?
        .ok_or(Error::EmployeeNotFound { id })
}

/// Builds an unsaved employee model for pure-function tests.
#[must_use]
pub fn offline_employee(monthly_quota: i32, current_usage: i32) -> entities::employee::Model {
    let now = Utc::now();
    entities::employee::Model {
        id: 1,
        employee_id: "EMP001".to_string(),
        name: "Ahmad Wijaya".to_string(),
        department: Some("Production".to_string()),
        position: Some("Operator".to_string()),
        monthly_quota,
        current_usage,
        last_reset_date: Some(now.date_naive()),
        status: EmployeeStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

/// Builds an unsaved journal record for formatting tests.
#[must_use]
pub fn offline_transaction(
    quantity: i32,
    date: NaiveDate,
    kind: TransactionKind,
    notes: Option<String>,
) -> entities::gallon_transaction::Model {
    entities::gallon_transaction::Model {
        id: 1,
        employee_id: 1,
        quantity,
        transaction_date: date,
        transaction_type: kind,
        notes,
        created_at: Utc::now(),
    }
}

/// Sets up a complete test environment with one active employee.
/// Returns (db, employee) for common test scenarios.
pub async fn setup_with_employee() -> Result<(DatabaseConnection, entities::employee::Model)> {
    let db = setup_test_db().await?;
    let employee = create_test_employee(&db, "EMP001", "Ahmad Wijaya").await?;
    Ok((db, employee))
}
