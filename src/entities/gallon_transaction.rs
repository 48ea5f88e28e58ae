//! Gallon transaction entity - Immutable audit record of quota events.
//!
//! Each record ties a quantity of gallons to the employee whose quota it
//! affected, with the effective calendar date kept separate from the row's
//! creation timestamp. Records are written exactly once by a successful take
//! or an administrative adjustment and are only ever removed by the cascade
//! when their owning employee is deleted.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of event produced a transaction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Gallons dispensed against the employee's quota
    #[sea_orm(string_value = "take")]
    Take,
    /// Usage redefined directly by an administrator
    #[sea_orm(string_value = "admin_adjustment")]
    AdminAdjustment,
}

impl TransactionKind {
    /// The stored string form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Take => "take",
            Self::AdminAdjustment => "admin_adjustment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gallon transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gallon_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the employee this transaction belongs to
    #[sea_orm(indexed)]
    pub employee_id: i64,
    /// Number of gallons, always positive
    pub quantity: i32,
    /// Effective date of the event (distinct from the creation timestamp)
    #[sea_orm(indexed)]
    pub transaction_date: Date,
    /// Whether this was a take or an administrative adjustment
    pub transaction_type: TransactionKind,
    /// Optional free-text note (e.g. the reason for an adjustment)
    pub notes: Option<String>,
    /// When the record was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between GallonTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one employee; deleting the employee
    /// deletes its transactions
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
