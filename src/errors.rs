//! Unified error types for the gallon ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors are plain
//! values handed back to the caller; the core modules never log or swallow
//! them. The public-facing lookup deliberately collapses "no such badge" and
//! "inactive employee" into a single [`Error::NotFoundOrInactive`] so a
//! scanner client cannot enumerate inactive staff, while internal paths that
//! already hold a trusted employee id keep the two cases distinct.

use std::fmt;

use sea_orm::DbErr;
use thiserror::Error;

/// A single failed validation rule, keyed by the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the rule applies to (e.g. `"name"`, `"monthly_quota"`)
    pub field: &'static str,
    /// Human-readable message for that field
    pub message: String,
}

impl FieldError {
    /// Builds a field error from a field name and message.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Unified error type for ledger operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Public badge lookup failed: the identifier is unknown *or* the
    /// employee is inactive. The two cases are intentionally
    /// indistinguishable on this path.
    #[error("Employee not found or inactive. Please check the ID and try again.")]
    NotFoundOrInactive,

    /// An internal/admin reference to an employee row did not resolve.
    #[error("Employee {id} not found.")]
    EmployeeNotFound {
        /// Database id that failed to resolve
        id: i64,
    },

    /// The employee resolved but is not active at the point of a
    /// quota-consuming action.
    #[error("Employee is not active.")]
    NotActive {
        /// Badge identifier of the inactive employee
        employee_id: String,
    },

    /// A consumption was requested with a non-positive quantity.
    #[error("Invalid quantity {quantity}: must be a positive number of gallons.")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// The requested quantity exceeds the remaining quota. Carries the actual
    /// remaining amount so callers can report it.
    #[error("Insufficient quota. Only {remaining} gallons remaining this month.")]
    InsufficientQuota {
        /// Gallons still available this month
        remaining: i32,
    },

    /// Admin input violated one or more field constraints; nothing was
    /// persisted.
    #[error("Validation failed: {}", format_field_errors(.errors))]
    Validation {
        /// Per-field rule violations
        errors: Vec<FieldError>,
    },

    /// Storage failed inside the atomic consume+record step. The whole
    /// consumption was rolled back; the caller should treat it as if nothing
    /// happened and advise a retry.
    #[error("Transaction failed. Please try again.")]
    TransactionFailed {
        /// Underlying storage error
        #[source]
        source: DbErr,
    },

    /// Storage-layer failure outside the consume+record critical section.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// I/O error (kiosk terminal, config files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
