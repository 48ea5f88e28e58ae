//! Quota ledger business logic - time-aware quota state and consumption gating.
//!
//! This module owns the per-employee quota contract: the lazy monthly reset,
//! the derived remaining quota, the public badge lookup, and the atomic
//! consumption path. Quota state read without [`ensure_current_period`] is
//! stale by definition, so every operation here runs the reset check before
//! touching quota fields. Consumption serializes per employee through a
//! single conditional UPDATE rather than an in-process lock, which keeps the
//! guarantee intact across processes sharing one database.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{Condition, DatabaseTransaction, Set, TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{
    core::transaction::record_transaction,
    entities::{Employee, EmployeeStatus, TransactionKind, employee},
    errors::{Error, FieldError, Result},
};

/// Read projection of an employee with the derived remaining quota.
///
/// Only produced by operations that have already run the reset check, so the
/// quota fields always describe the active period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeView {
    /// Database id
    pub id: i64,
    /// Badge identifier
    pub employee_id: String,
    /// Employee full name
    pub name: String,
    /// Department/division
    pub department: Option<String>,
    /// Job position
    pub position: Option<String>,
    /// Monthly gallon quota
    pub monthly_quota: i32,
    /// Gallons consumed this period
    pub current_usage: i32,
    /// Gallons still available this period
    pub remaining_quota: i32,
    /// Date of the most recent reset
    pub last_reset_date: Option<NaiveDate>,
    /// Employee status
    pub status: EmployeeStatus,
    /// When the employee was created
    pub created_at: chrono::DateTime<Utc>,
    /// When the employee was last modified
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<employee::Model> for EmployeeView {
    fn from(employee: employee::Model) -> Self {
        let remaining_quota = remaining_quota(&employee);
        Self {
            id: employee.id,
            employee_id: employee.employee_id,
            name: employee.name,
            department: employee.department,
            position: employee.position,
            monthly_quota: employee.monthly_quota,
            current_usage: employee.current_usage,
            remaining_quota,
            last_reset_date: employee.last_reset_date,
            status: employee.status,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

/// Result of a successful take: the refreshed employee plus the quantity that
/// was dispensed and the quota left afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TakeReceipt {
    /// Employee state after the take
    pub employee: EmployeeView,
    /// Gallons dispensed by this take
    pub quantity: i32,
    /// Gallons still available after this take
    pub remaining_quota: i32,
}

/// Returns true when the employee's quota period is stale: either no reset
/// was ever recorded, or the recorded reset falls in a different calendar
/// month than `today`. Day-of-month is irrelevant, so the reset fires at most
/// once per distinct month.
#[must_use]
pub fn needs_quota_reset(last_reset_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_reset_date
        .is_none_or(|last| last.year() != today.year() || last.month() != today.month())
}

/// Derived remaining quota: `max(0, monthly_quota - current_usage)`.
///
/// Only meaningful on a model that has passed [`ensure_current_period`];
/// stale models produce stale numbers.
#[must_use]
pub fn remaining_quota(employee: &employee::Model) -> i32 {
    (employee.monthly_quota - employee.current_usage).max(0)
}

/// First day of `today`'s month and first day of the following month.
pub(crate) fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    #[allow(clippy::expect_used)] // First day of any valid month/year is always valid
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .expect("first day of the current month is always valid");

    #[allow(clippy::expect_used)] // First day of any valid month/year is always valid
    let next_month_start = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .expect("first day of the next month is always valid");

    (month_start, next_month_start)
}

/// Applies the lazy monthly reset if it is due and returns the stored state.
///
/// This is the explicit two-step contract every quota read or mutation must
/// go through: callers pass the employee they loaded, and receive back a
/// model whose quota fields describe the current calendar month.
///
/// The reset itself is one conditional UPDATE guarded by "`last_reset_date`
/// outside the current month", so concurrent calls for the same employee in
/// the same month converge on `current_usage = 0, last_reset_date = today`
/// no matter how they interleave. Generic over the connection so it runs
/// inside an enclosing database transaction when the caller has one open.
pub async fn ensure_current_period<C>(
    conn: &C,
    employee: employee::Model,
) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let today = Utc::now().date_naive();
    if !needs_quota_reset(employee.last_reset_date, today) {
        return Ok(employee);
    }

    let (month_start, next_month_start) = month_bounds(today);
    Employee::update_many()
        .col_expr(employee::Column::CurrentUsage, Expr::value(0))
        .col_expr(employee::Column::LastResetDate, Expr::value(today))
        .col_expr(employee::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(employee::Column::Id.eq(employee.id))
        .filter(
            Condition::any()
                .add(employee::Column::LastResetDate.is_null())
                .add(employee::Column::LastResetDate.lt(month_start))
                .add(employee::Column::LastResetDate.gte(next_month_start)),
        )
        .exec(conn)
        .await?;

    // Re-read so the caller observes the stored state regardless of which
    // racing call actually performed the reset.
    Employee::find_by_id(employee.id)
        .one(conn)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee.id })
}

/// Resolves an *active* employee by badge identifier for the public scanner
/// flow, refreshing the quota period before building the view.
///
/// Unknown badges and inactive employees both surface as
/// [`Error::NotFoundOrInactive`]; a scanning client cannot tell them apart.
pub async fn lookup_by_badge(db: &DatabaseConnection, badge: &str) -> Result<EmployeeView> {
    let employee = Employee::find()
        .filter(employee::Column::EmployeeId.eq(badge))
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .one(db)
        .await?
        .ok_or(Error::NotFoundOrInactive)?;

    let employee = ensure_current_period(db, employee).await?;
    Ok(employee.into())
}

/// Dispenses `quantity` gallons against an employee's quota.
///
/// The sufficiency check and the usage increment are a single conditional
/// UPDATE, and the `take` record is appended in the same database
/// transaction: either the quota moves *and* the record exists, or neither
/// does. Storage failures inside that critical section surface as
/// [`Error::TransactionFailed`] after a full rollback.
///
/// This path holds a trusted employee id, so unlike [`lookup_by_badge`] it
/// distinguishes [`Error::EmployeeNotFound`] from [`Error::NotActive`].
pub async fn take_gallons(
    db: &DatabaseConnection,
    employee_id: i64,
    quantity: i32,
) -> Result<TakeReceipt> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let receipt = match take_in_txn(&txn, employee_id, quantity).await {
        Ok(receipt) => receipt,
        // Dropping the uncommitted transaction rolls the increment back, so
        // a failed append can never leave a decrement without its record.
        Err(Error::Database(source)) => return Err(Error::TransactionFailed { source }),
        Err(other) => return Err(other),
    };

    txn.commit()
        .await
        .map_err(|source| Error::TransactionFailed { source })?;

    Ok(receipt)
}

async fn take_in_txn(
    txn: &DatabaseTransaction,
    employee_id: i64,
    quantity: i32,
) -> Result<TakeReceipt> {
    let employee = Employee::find_by_id(employee_id)
        .one(txn)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee_id })?;

    if employee.status != EmployeeStatus::Active {
        return Err(Error::NotActive {
            employee_id: employee.employee_id,
        });
    }

    let employee = ensure_current_period(txn, employee).await?;
    let today = Utc::now().date_naive();

    // Atomic increment-if-sufficient: the check and the increment are one
    // statement, so two racing takes for the same employee cannot both pass
    // the check and jointly over-draw the quota.
    let update = Employee::update_many()
        .col_expr(
            employee::Column::CurrentUsage,
            Expr::col(employee::Column::CurrentUsage).add(quantity),
        )
        .col_expr(employee::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(employee::Column::Id.eq(employee.id))
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .filter(
            Expr::col(employee::Column::MonthlyQuota)
                .sub(Expr::col(employee::Column::CurrentUsage))
                .gte(quantity),
        )
        .exec(txn)
        .await?;

    if update.rows_affected == 0 {
        return Err(Error::InsufficientQuota {
            remaining: remaining_quota(&employee),
        });
    }

    record_transaction(
        txn,
        employee.id,
        quantity,
        today,
        TransactionKind::Take,
        None,
    )
    .await?;

    let employee = Employee::find_by_id(employee.id)
        .one(txn)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee.id })?;

    let remaining_quota = remaining_quota(&employee);
    Ok(TakeReceipt {
        employee: employee.into(),
        quantity,
        remaining_quota,
    })
}

/// Redefines an employee's current usage directly, recording the change as
/// an `admin_adjustment` transaction with `quantity = |delta|` and the given
/// note. A no-op adjustment (usage unchanged) writes nothing.
///
/// This is the administrative escape hatch out of the exhausted state; it
/// applies regardless of employee status and, like a take, runs the reset
/// check first and commits the usage change and its record as one unit.
pub async fn adjust_usage(
    db: &DatabaseConnection,
    employee_id: i64,
    new_usage: i32,
    notes: Option<String>,
) -> Result<EmployeeView> {
    if new_usage < 0 {
        return Err(Error::Validation {
            errors: vec![FieldError::new(
                "current_usage",
                "Current usage cannot be negative.",
            )],
        });
    }

    let txn = db.begin().await?;

    let employee = Employee::find_by_id(employee_id)
        .one(&txn)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee_id })?;

    let employee = ensure_current_period(&txn, employee).await?;
    let delta = new_usage - employee.current_usage;
    if delta == 0 {
        txn.commit().await?;
        return Ok(employee.into());
    }

    let today = Utc::now().date_naive();
    let mut active: employee::ActiveModel = employee.into();
    active.current_usage = Set(new_usage);
    active.updated_at = Set(Utc::now());
    let employee = active.update(&txn).await?;

    record_transaction(
        &txn,
        employee.id,
        delta.abs(),
        today,
        TransactionKind::AdminAdjustment,
        notes,
    )
    .await?;

    txn.commit().await?;
    Ok(employee.into())
}
