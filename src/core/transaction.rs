//! Dispensing journal - append-only records of every gallon movement.
//!
//! Records are only ever appended here; nothing in the crate updates or
//! deletes them individually. History disappears solely through the cascade
//! when its employee row is deleted.

use chrono::NaiveDate;
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, Set, prelude::*};

use crate::{
    core::quota::month_bounds,
    entities::{GallonTransaction, TransactionKind, gallon_transaction},
    errors::{Error, Result},
};

/// Appends one journal record. Generic over the connection so a caller that
/// is mid-transaction (the take path) writes the record atomically with its
/// quota movement.
///
/// `quantity` must be positive regardless of kind; an adjustment's direction
/// lives in its note, not in the sign.
pub async fn record_transaction<C>(
    conn: &C,
    employee_id: i64,
    quantity: i32,
    transaction_date: NaiveDate,
    transaction_type: TransactionKind,
    notes: Option<String>,
) -> Result<gallon_transaction::Model>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let record = gallon_transaction::ActiveModel {
        employee_id: Set(employee_id),
        quantity: Set(quantity),
        transaction_date: Set(transaction_date),
        transaction_type: Set(transaction_type),
        notes: Set(notes),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    record.insert(conn).await.map_err(Into::into)
}

/// The newest records for one employee, most recent first. Records sharing a
/// `transaction_date` fall back to insertion order, newest first, so the
/// listing is stable across reads.
pub async fn recent_transactions(
    db: &DatabaseConnection,
    employee_id: i64,
    limit: u64,
) -> Result<Vec<gallon_transaction::Model>> {
    GallonTransaction::find()
        .filter(gallon_transaction::Column::EmployeeId.eq(employee_id))
        .order_by_desc(gallon_transaction::Column::TransactionDate)
        .order_by_desc(gallon_transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[derive(FromQueryResult)]
struct QuantitySum {
    total: Option<i64>,
}

/// Total gallons dispensed to an employee during `today`'s calendar month.
///
/// Sums `take` records only; adjustments redefine the ledger position but
/// are not water leaving the cooler.
pub async fn gallons_taken_in_month(
    db: &DatabaseConnection,
    employee_id: i64,
    today: NaiveDate,
) -> Result<i64> {
    let (month_start, next_month_start) = month_bounds(today);

    let sum = GallonTransaction::find()
        .select_only()
        .column_as(gallon_transaction::Column::Quantity.sum(), "total")
        .filter(gallon_transaction::Column::EmployeeId.eq(employee_id))
        .filter(gallon_transaction::Column::TransactionType.eq(TransactionKind::Take))
        .filter(gallon_transaction::Column::TransactionDate.gte(month_start))
        .filter(gallon_transaction::Column::TransactionDate.lt(next_month_start))
        .into_model::<QuantitySum>()
        .one(db)
        .await?;

    Ok(sum.and_then(|row| row.total).unwrap_or(0))
}
