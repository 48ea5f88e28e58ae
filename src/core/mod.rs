/// Employee administration - validated CRUD, roster pagination, and seeding
pub mod employee;

/// Quota ledger - monthly reset, remaining quota, and atomic consumption
pub mod quota;

/// Usage reporting - employee detail views and text rendering helpers
pub mod report;

/// Dispensing journal - append-only transaction records and month totals
pub mod transaction;
