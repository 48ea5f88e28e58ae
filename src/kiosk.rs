//! Kiosk surface - the terminal scan-and-dispense loop.
//!
//! This is the water cooler station interface: an operator scans a badge,
//! sees the employee card with the month's usage gauge, and optionally
//! dispenses gallons against the quota. All quota decisions live in
//! [`crate::core::quota`]; this module only parses input and renders output,
//! so everything except the loop itself is a pure function.

use std::io::{self, Write};

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::{
    core::{
        quota::{self, EmployeeView},
        report, transaction,
    },
    entities::gallon_transaction,
    errors::{Error, Result},
};

/// Most gallons a single scan may dispense, regardless of remaining quota.
pub const MAX_TAKE_PER_SCAN: i32 = 10;

/// Journal lines shown under the employee card.
const HISTORY_LINES: u64 = 5;

/// Gauge width used on the employee card.
const GAUGE_WIDTH: usize = 10;

/// Outcome of parsing the quantity prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityInput {
    /// Blank input; the scan ends without dispensing
    Skip,
    /// A quantity between 1 and the per-scan maximum
    Take(i32),
    /// Anything else, with the message to show the operator
    Invalid(String),
}

/// Parses the operator's answer to the quantity prompt.
#[must_use]
pub fn parse_quantity_input(raw: &str, max_take: i32) -> QuantityInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return QuantityInput::Skip;
    }

    match trimmed.parse::<i32>() {
        Ok(quantity) if (1..=max_take).contains(&quantity) => QuantityInput::Take(quantity),
        Ok(_) | Err(_) => {
            QuantityInput::Invalid(format!("Please enter a number between 1 and {max_take}."))
        }
    }
}

/// Per-scan cap: the remaining quota bounded by [`MAX_TAKE_PER_SCAN`].
#[must_use]
pub fn max_take_for(view: &EmployeeView) -> i32 {
    view.remaining_quota.min(MAX_TAKE_PER_SCAN)
}

/// Renders the employee card shown after a successful scan.
#[must_use]
pub fn render_employee_card(view: &EmployeeView) -> String {
    let mut card = String::new();
    card.push_str("========================================\n");
    card.push_str(&format!("{} ({})\n", view.name, view.employee_id));
    match (&view.department, &view.position) {
        (Some(department), Some(position)) => {
            card.push_str(&format!("{department} - {position}\n"));
        }
        (Some(department), None) => card.push_str(&format!("{department}\n")),
        (None, Some(position)) => card.push_str(&format!("{position}\n")),
        (None, None) => {}
    }
    card.push_str(&format!(
        "Usage: {}/{} gal {}\n",
        view.current_usage,
        view.monthly_quota,
        report::format_usage_bar(view, GAUGE_WIDTH)
    ));
    card.push_str(&format!(
        "Remaining this month: {} gallon(s)\n",
        view.remaining_quota
    ));
    if let Some(last_reset) = view.last_reset_date {
        card.push_str(&format!("Last reset: {last_reset}\n"));
    }
    card.push_str("========================================");
    card
}

/// Renders the recent-history block shown under the card.
#[must_use]
pub fn render_history(records: &[gallon_transaction::Model]) -> String {
    let mut out = String::from("Recent transactions:");
    for record in records {
        out.push('\n');
        out.push_str("  ");
        out.push_str(&report::format_transaction_line(record));
    }
    out
}

/// Errors the kiosk reports to the operator and keeps running after.
/// Everything else is an infrastructure failure that ends the session.
///
/// `EmployeeNotFound` is in the list because an admin can delete an employee
/// between the scan and the take; the operator just scans again.
fn is_recoverable(err: &Error) -> bool {
    matches!(
        err,
        Error::NotFoundOrInactive
            | Error::EmployeeNotFound { .. }
            | Error::NotActive { .. }
            | Error::InsufficientQuota { .. }
            | Error::InvalidQuantity { .. }
            | Error::TransactionFailed { .. }
    )
}

/// Runs the scan loop on stdin/stdout until the operator types `exit` or
/// input reaches end of file.
///
/// Domain errors (unknown badge, exhausted quota, a failed take) are printed
/// with the same wording the employee-facing station always used, and the
/// loop continues. Database failures propagate to the caller.
pub async fn run(db: &DatabaseConnection) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();

    println!("Gallon ledger kiosk. Scan a badge to begin.");
    loop {
        print!("\nBadge ID (or 'exit' to quit): ");
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let badge = line.trim().to_string();
        if badge.is_empty() {
            continue;
        }
        if badge.eq_ignore_ascii_case("exit") || badge.eq_ignore_ascii_case("quit") {
            break;
        }

        match quota::lookup_by_badge(db, &badge).await {
            Ok(view) => handle_scan(db, &view).await?,
            Err(err) if is_recoverable(&err) => {
                warn!(badge = %badge, "rejected scan: {err}");
                println!("❌ {err}");
            }
            Err(err) => return Err(err),
        }
    }

    info!("kiosk session ended");
    Ok(())
}

async fn handle_scan(db: &DatabaseConnection, view: &EmployeeView) -> Result<()> {
    println!("{}", render_employee_card(view));

    let history = transaction::recent_transactions(db, view.id, HISTORY_LINES).await?;
    if !history.is_empty() {
        println!("{}", render_history(&history));
    }

    let max_take = max_take_for(view);
    if max_take == 0 {
        println!("No gallons remaining this month.");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("Take gallons [1-{max_take}] (Enter to skip): ");
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_quantity_input(&line, max_take) {
            QuantityInput::Skip => return Ok(()),
            QuantityInput::Invalid(message) => println!("❌ {message}"),
            QuantityInput::Take(quantity) => {
                match quota::take_gallons(db, view.id, quantity).await {
                    Ok(receipt) => {
                        info!(
                            employee_id = %receipt.employee.employee_id,
                            quantity = receipt.quantity,
                            remaining = receipt.remaining_quota,
                            "dispensed gallons"
                        );
                        println!(
                            "✅ Successfully dispensed {} gallon(s) to {}. Remaining quota: {}",
                            receipt.quantity, receipt.employee.name, receipt.remaining_quota
                        );
                    }
                    Err(err) if is_recoverable(&err) => println!("❌ {err}"),
                    Err(err) => return Err(err),
                }
                return Ok(());
            }
        }
    }
}
