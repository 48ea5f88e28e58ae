//! Employee entity - Represents a quota-bearing employee.
//!
//! Each employee carries the state the quota ledger operates on: the monthly
//! gallon cap, the usage accumulated in the active period, and the date of
//! the last quota reset. The badge identifier (`employee_id`) is the opaque
//! string produced by a barcode scan and is immutable after creation.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an employee may consume quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    /// Employee may scan and take gallons
    #[sea_orm(string_value = "active")]
    Active,
    /// Employee is hidden from the public scanner and may not consume
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl EmployeeStatus {
    /// The stored string form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err("Employee status must be either active or inactive.".to_string()),
        }
    }
}

/// Employee database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Badge identifier from the barcode/card, immutable after creation
    #[sea_orm(unique)]
    pub employee_id: String,
    /// Employee full name
    pub name: String,
    /// Department/division, free text
    pub department: Option<String>,
    /// Job position, free text
    pub position: Option<String>,
    /// Monthly gallon quota, admin-settable within [1, 100]
    pub monthly_quota: i32,
    /// Gallons consumed in the active quota period
    pub current_usage: i32,
    /// Date of the most recent quota reset; `None` forces a reset on first touch
    pub last_reset_date: Option<Date>,
    /// Employee status gating consumption
    #[sea_orm(indexed)]
    pub status: EmployeeStatus,
    /// When the employee was created
    pub created_at: DateTimeUtc,
    /// When the employee was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many gallon transactions
    #[sea_orm(has_many = "super::gallon_transaction::Entity")]
    GallonTransactions,
}

impl Related<super::gallon_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GallonTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
