//! Employee roster loading from config.toml
//!
//! This module provides functionality to load the initial employee roster
//! from a TOML configuration file. The employees defined in config.toml are
//! used to seed the database on first run or when employees are missing;
//! badges already registered are never overwritten.

use crate::core::employee::NewEmployee;
use crate::entities::EmployeeStatus;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of employees to seed
    pub employees: Vec<EmployeeSeed>,
}

/// Seed entry for a single employee
#[derive(Debug, Deserialize, Clone)]
pub struct EmployeeSeed {
    /// Badge identifier, unique across the roster
    pub employee_id: String,
    /// Employee full name
    pub name: String,
    /// Department/division
    #[serde(default)]
    pub department: Option<String>,
    /// Job position
    #[serde(default)]
    pub position: Option<String>,
    /// Monthly gallon quota, defaults to 10
    #[serde(default = "default_monthly_quota")]
    pub monthly_quota: i32,
    /// Employee status, defaults to active
    #[serde(default = "default_status")]
    pub status: EmployeeStatus,
}

fn default_monthly_quota() -> i32 {
    10
}

fn default_status() -> EmployeeStatus {
    EmployeeStatus::Active
}

impl From<EmployeeSeed> for NewEmployee {
    fn from(seed: EmployeeSeed) -> Self {
        Self {
            employee_id: seed.employee_id,
            name: seed.name,
            department: seed.department,
            position: seed.position,
            monthly_quota: seed.monthly_quota,
            status: seed.status,
        }
    }
}

/// Loads the employee roster from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the employee roster from the default location (./config.toml)
///
/// # Errors
/// Returns an error if the file is missing or does not parse.
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_employee_roster() {
        let toml_str = r#"
            [[employees]]
            employee_id = "EMP001"
            name = "Ahmad Wijaya"
            department = "Production"
            position = "Manager"
            monthly_quota = 15

            [[employees]]
            employee_id = "EMP005"
            name = "Rahmat Hidayat"
            department = "Distribution"
            position = "Operator"
            monthly_quota = 12
            status = "inactive"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.employees.len(), 2);
        assert_eq!(config.employees[0].employee_id, "EMP001");
        assert_eq!(config.employees[0].name, "Ahmad Wijaya");
        assert_eq!(config.employees[0].monthly_quota, 15);
        assert_eq!(config.employees[0].status, EmployeeStatus::Active);

        assert_eq!(config.employees[1].employee_id, "EMP005");
        assert_eq!(config.employees[1].status, EmployeeStatus::Inactive);
    }

    #[test]
    fn test_parse_applies_defaults() {
        let toml_str = r#"
            [[employees]]
            employee_id = "EMP010"
            name = "Dewi Lestari"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let seed = &config.employees[0];
        assert_eq!(seed.monthly_quota, 10);
        assert_eq!(seed.status, EmployeeStatus::Active);
        assert_eq!(seed.department, None);
        assert_eq!(seed.position, None);
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let toml_str = r#"
            [[employees]]
            employee_id = "EMP001"
            name = "Ahmad Wijaya"
            status = "retired"
        "#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("does-not-exist.toml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_seed_converts_to_new_employee() {
        let seed = EmployeeSeed {
            employee_id: "EMP002".to_string(),
            name: "Siti Nurhaliza".to_string(),
            department: Some("Quality Control".to_string()),
            position: Some("Supervisor".to_string()),
            monthly_quota: 10,
            status: EmployeeStatus::Active,
        };

        let new: NewEmployee = seed.into();
        assert_eq!(new.employee_id, "EMP002");
        assert_eq!(new.department.as_deref(), Some("Quality Control"));
        assert_eq!(new.monthly_quota, 10);
    }
}
