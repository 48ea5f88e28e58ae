//! Employee administration - validated CRUD, the paginated roster, and
//! startup seeding.
//!
//! Everything here is the back-office side of the ledger: it manages who has
//! a quota, never how the quota is spent. Input strings are trimmed and
//! blank optionals collapse to `None` before validation, so `"  "` and an
//! absent field store identically.

use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    core::quota::{EmployeeView, ensure_current_period},
    entities::{Employee, EmployeeStatus, employee},
    errors::{Error, FieldError, Result},
};

/// Employees shown per roster page when the caller does not pick a size.
pub const DEFAULT_PAGE_SIZE: u64 = 15;

/// Upper length for badge, name, department and position fields.
const MAX_FIELD_LENGTH: usize = 255;

const MIN_MONTHLY_QUOTA: i32 = 1;
const MAX_MONTHLY_QUOTA: i32 = 100;

/// Input for [`create_employee`]. The badge identifier is chosen here and
/// never changes afterwards.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Badge identifier, unique across all employees
    pub employee_id: String,
    /// Employee full name
    pub name: String,
    /// Department/division, blank treated as absent
    pub department: Option<String>,
    /// Job position, blank treated as absent
    pub position: Option<String>,
    /// Monthly gallon quota, 1 to 100
    pub monthly_quota: i32,
    /// Initial status
    pub status: EmployeeStatus,
}

/// Input for [`update_employee`]: a full replacement of the editable fields.
/// The badge identifier is immutable and `current_usage` is untouched, so
/// shrinking the quota below what is already used simply leaves zero
/// remaining for the rest of the month.
#[derive(Debug, Clone)]
pub struct EmployeeUpdate {
    /// Employee full name
    pub name: String,
    /// Department/division, blank treated as absent
    pub department: Option<String>,
    /// Job position, blank treated as absent
    pub position: Option<String>,
    /// Monthly gallon quota, 1 to 100
    pub monthly_quota: i32,
    /// Employee status
    pub status: EmployeeStatus,
}

/// One page of the employee roster, newest employees first, with every view
/// refreshed through the monthly reset check.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeePage {
    /// Employees on this page
    pub employees: Vec<EmployeeView>,
    /// 1-based page number that was fetched
    pub page: u64,
    /// Page size the roster paginates by
    pub per_page: u64,
    /// Total employees across all pages
    pub total_items: u64,
    /// Total page count
    pub total_pages: u64,
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn validate_profile(
    name: &str,
    department: Option<&str>,
    position: Option<&str>,
    monthly_quota: i32,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(FieldError::new("name", "Employee name is required."));
    } else if name.chars().count() > MAX_FIELD_LENGTH {
        errors.push(FieldError::new(
            "name",
            "Employee name cannot exceed 255 characters.",
        ));
    }

    if let Some(department) = department
        && department.chars().count() > MAX_FIELD_LENGTH
    {
        errors.push(FieldError::new(
            "department",
            "Department cannot exceed 255 characters.",
        ));
    }

    if let Some(position) = position
        && position.chars().count() > MAX_FIELD_LENGTH
    {
        errors.push(FieldError::new(
            "position",
            "Position cannot exceed 255 characters.",
        ));
    }

    if monthly_quota < MIN_MONTHLY_QUOTA {
        errors.push(FieldError::new(
            "monthly_quota",
            "Monthly quota must be at least 1 gallon.",
        ));
    } else if monthly_quota > MAX_MONTHLY_QUOTA {
        errors.push(FieldError::new(
            "monthly_quota",
            "Monthly quota cannot exceed 100 gallons.",
        ));
    }

    errors
}

/// Registers a new employee with a fresh quota period: zero usage and a
/// reset stamped today.
///
/// All field problems, including a badge identifier that is already taken,
/// come back together in one [`Error::Validation`]. The unique index on the
/// badge column backstops the duplicate check if two creates race.
pub async fn create_employee(
    db: &DatabaseConnection,
    new: NewEmployee,
) -> Result<employee::Model> {
    let employee_id = new.employee_id.trim().to_string();
    let name = new.name.trim().to_string();
    let department = normalize_optional(new.department);
    let position = normalize_optional(new.position);

    let mut errors = validate_profile(
        &name,
        department.as_deref(),
        position.as_deref(),
        new.monthly_quota,
    );

    if employee_id.is_empty() {
        errors.push(FieldError::new("employee_id", "Employee ID is required."));
    } else if employee_id.chars().count() > MAX_FIELD_LENGTH {
        errors.push(FieldError::new(
            "employee_id",
            "Employee ID cannot exceed 255 characters.",
        ));
    } else if get_employee_by_badge(db, &employee_id).await?.is_some() {
        errors.push(FieldError::new(
            "employee_id",
            "This Employee ID is already registered.",
        ));
    }

    if !errors.is_empty() {
        return Err(Error::Validation { errors });
    }

    let now = Utc::now();
    let model = employee::ActiveModel {
        employee_id: Set(employee_id),
        name: Set(name),
        department: Set(department),
        position: Set(position),
        monthly_quota: Set(new.monthly_quota),
        current_usage: Set(0),
        last_reset_date: Set(Some(now.date_naive())),
        status: Set(new.status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Replaces an employee's editable fields after validation. Usage and the
/// reset date carry over unchanged.
pub async fn update_employee(
    db: &DatabaseConnection,
    id: i64,
    update: EmployeeUpdate,
) -> Result<employee::Model> {
    let employee = Employee::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::EmployeeNotFound { id })?;

    let name = update.name.trim().to_string();
    let department = normalize_optional(update.department);
    let position = normalize_optional(update.position);

    let errors = validate_profile(
        &name,
        department.as_deref(),
        position.as_deref(),
        update.monthly_quota,
    );
    if !errors.is_empty() {
        return Err(Error::Validation { errors });
    }

    let mut active: employee::ActiveModel = employee.into();
    active.name = Set(name);
    active.department = Set(department);
    active.position = Set(position);
    active.monthly_quota = Set(update.monthly_quota);
    active.status = Set(update.status);
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Deletes an employee. The foreign key cascade removes their entire
/// dispensing history with them.
pub async fn delete_employee(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = Employee::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::EmployeeNotFound { id });
    }
    Ok(())
}

/// Fetches an employee by database id without touching quota state.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Fetches an employee by badge identifier regardless of status. This is the
/// administrative lookup; the public scanner path goes through
/// [`crate::core::quota::lookup_by_badge`].
pub async fn get_employee_by_badge(
    db: &DatabaseConnection,
    badge: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::EmployeeId.eq(badge))
        .one(db)
        .await
        .map_err(Into::into)
}

/// One page of the roster, newest first. Every employee on the page passes
/// through [`ensure_current_period`] before the view is built, so a page
/// render after a month rollover also performs the pending resets.
///
/// `page` is 1-based; zero is treated as the first page, and pages past the
/// end come back empty with the totals intact. `per_page` falls back to
/// [`DEFAULT_PAGE_SIZE`].
pub async fn list_employees(
    db: &DatabaseConnection,
    page: u64,
    per_page: Option<u64>,
) -> Result<EmployeePage> {
    let page = page.max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let paginator = Employee::find()
        .order_by_desc(employee::Column::CreatedAt)
        .order_by_desc(employee::Column::Id)
        .paginate(db, per_page);

    let totals = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;

    let mut employees = Vec::with_capacity(models.len());
    for model in models {
        let refreshed = ensure_current_period(db, model).await?;
        employees.push(refreshed.into());
    }

    Ok(EmployeePage {
        employees,
        page,
        per_page,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}

/// Creates every seed employee whose badge is not registered yet. Existing
/// badges are left exactly as they are, so re-running the seed never
/// clobbers live quota state. Returns how many employees were created.
pub async fn seed_initial_employees(
    db: &DatabaseConnection,
    seeds: Vec<NewEmployee>,
) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if get_employee_by_badge(db, seed.employee_id.trim())
            .await?
            .is_some()
        {
            debug!(employee_id = %seed.employee_id, "seed employee already registered, skipping");
            continue;
        }

        let employee = create_employee(db, seed).await?;
        info!(
            employee_id = %employee.employee_id,
            name = %employee.name,
            monthly_quota = employee.monthly_quota,
            "seeded employee"
        );
        created += 1;
    }
    Ok(created)
}
