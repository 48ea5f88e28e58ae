//! Usage reporting - the combined employee detail view and its text
//! rendering helpers.
//!
//! A report is what an admin sees when they open one employee: the refreshed
//! quota state, the newest slice of the dispensing journal, and the dispensed
//! total for the running month computed from the journal itself rather than
//! from the counter.

use chrono::Utc;
use sea_orm::prelude::*;
use serde::Serialize;

use crate::{
    core::{
        employee::get_employee_by_id,
        quota::{EmployeeView, ensure_current_period},
        transaction::{gallons_taken_in_month, recent_transactions},
    },
    entities::gallon_transaction,
    errors::{Error, Result},
};

/// History records included when the caller does not ask for a count.
pub const DEFAULT_HISTORY_LIMIT: u64 = 10;

/// Detail view for a single employee.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeReport {
    /// Employee with refreshed quota state
    pub employee: EmployeeView,
    /// Newest journal records, most recent first
    pub recent_transactions: Vec<gallon_transaction::Model>,
    /// Gallons dispensed this calendar month per the journal
    pub taken_this_month: i64,
}

/// Builds the detail view for one employee, refreshing the quota period
/// first so the view and the journal agree on the month.
pub async fn employee_report(
    db: &DatabaseConnection,
    id: i64,
    history_limit: Option<u64>,
) -> Result<EmployeeReport> {
    let employee = get_employee_by_id(db, id)
        .await?
        .ok_or(Error::EmployeeNotFound { id })?;
    let employee = ensure_current_period(db, employee).await?;

    let limit = history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let recent = recent_transactions(db, employee.id, limit).await?;
    let taken = gallons_taken_in_month(db, employee.id, Utc::now().date_naive()).await?;

    Ok(EmployeeReport {
        employee: employee.into(),
        recent_transactions: recent,
        taken_this_month: taken,
    })
}

/// Usage as a percentage of quota, clamped to `0.0..=100.0` so an overdrawn
/// counter (possible through an admin adjustment) still renders sanely.
#[must_use]
pub fn usage_percent(view: &EmployeeView) -> f64 {
    if view.monthly_quota <= 0 {
        return 0.0;
    }
    (f64::from(view.current_usage) / f64::from(view.monthly_quota) * 100.0).clamp(0.0, 100.0)
}

/// Renders a fixed-width usage gauge like `[████░░░░░░]`.
#[must_use]
pub fn format_usage_bar(view: &EmployeeView, width: usize) -> String {
    let fraction = usage_percent(view) / 100.0;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((width as f64) * fraction).round() as usize;
    let filled = filled.min(width);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// One journal record as a display line: date, quantity, kind, and the note
/// when present.
#[must_use]
pub fn format_transaction_line(record: &gallon_transaction::Model) -> String {
    let mut line = format!(
        "{}  {:>3} gal  {}",
        record.transaction_date, record.quantity, record.transaction_type
    );
    if let Some(notes) = &record.notes {
        line.push_str("  (");
        line.push_str(notes);
        line.push(')');
    }
    line
}
