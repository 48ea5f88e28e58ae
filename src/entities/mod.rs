//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod employee;
pub mod gallon_transaction;

// Re-export specific types to avoid conflicts
pub use employee::{
    Column as EmployeeColumn, Entity as Employee, EmployeeStatus, Model as EmployeeModel,
};
pub use gallon_transaction::{
    Column as GallonTransactionColumn, Entity as GallonTransaction,
    Model as GallonTransactionModel, TransactionKind,
};
