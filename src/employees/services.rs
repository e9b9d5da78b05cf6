use time::Date;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::employees::dto::EmployeeRequest;
use crate::employees::repo::EMPLOYEE_EXISTS;
use crate::employees::repo_types::{Employee, EmployeeChanges, EmployeeFilter, Gender, NewEmployee};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::{is_valid_email, parse_date, present, INVALID_EMAIL};

pub const MIN_SALARY: f64 = 1000.0;
pub const ANOTHER_EMPLOYEE_EXISTS: &str = "Another employee already exists with this email";

fn not_found(eid: &str) -> ApiError {
    ApiError::not_found(format!("Employee not found with id: {eid}"))
}

/// A malformed id cannot match any record, so it is reported as not found.
fn parse_id(eid: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(eid.trim()).map_err(|_| not_found(eid))
}

fn check_email(email: &str) -> ApiResult<String> {
    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err(ApiError::validation(INVALID_EMAIL));
    }
    Ok(email.to_lowercase())
}

fn check_salary(salary: f64) -> ApiResult<f64> {
    if !salary.is_finite() || salary < MIN_SALARY {
        return Err(ApiError::validation("Salary must be at least 1000"));
    }
    Ok(salary)
}

fn check_gender(gender: &str) -> ApiResult<Gender> {
    gender
        .parse()
        .map_err(|_| ApiError::validation("Gender must be Male, Female, or Other"))
}

fn check_date(raw: &str) -> ApiResult<Date> {
    parse_date(raw).ok_or_else(|| {
        ApiError::validation("date_of_joining must be a valid date (YYYY-MM-DD)")
    })
}

async fn upload_photo(st: &AppState, source: &str) -> ApiResult<String> {
    st.uploader.upload(source).await.map_err(|e| {
        warn!(error = %e, "photo upload failed");
        ApiError::Upload(format!("Photo upload failed: {e:#}"))
    })
}

#[instrument(skip(st))]
pub async fn get_all(st: &AppState) -> ApiResult<Vec<Employee>> {
    st.employees.list(&EmployeeFilter::default()).await
}

#[instrument(skip(st))]
pub async fn find_by_id(st: &AppState, eid: &str) -> ApiResult<Employee> {
    let id = parse_id(eid)?;
    st.employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(eid))
}

#[instrument(skip(st))]
pub async fn search(
    st: &AppState,
    designation: Option<String>,
    department: Option<String>,
) -> ApiResult<Vec<Employee>> {
    let filter = EmployeeFilter {
        designation: present(designation),
        department: present(department),
    };
    if filter.designation.is_none() && filter.department.is_none() {
        return Err(ApiError::validation(
            "Please provide designation or department to search",
        ));
    }
    st.employees.list(&filter).await
}

#[instrument(skip(st, req), fields(email = ?req.email))]
pub async fn add(st: &AppState, req: EmployeeRequest) -> ApiResult<Employee> {
    let (
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(designation),
        Some(salary),
        Some(date_of_joining),
        Some(department),
    ) = (
        present(req.first_name),
        present(req.last_name),
        present(req.email),
        present(req.designation),
        req.salary,
        present(req.date_of_joining),
        present(req.department),
    )
    else {
        return Err(ApiError::validation(
            "first_name, last_name, email, designation, salary, date_of_joining, and department are required",
        ));
    };

    let email = check_email(&email)?;
    let salary = check_salary(salary)?;
    let gender = present(req.gender).as_deref().map(check_gender).transpose()?;
    let date_of_joining = check_date(&date_of_joining)?;

    if st.employees.find_by_email(&email, None).await?.is_some() {
        warn!(%email, "employee email already in use");
        return Err(ApiError::conflict(EMPLOYEE_EXISTS));
    }

    let employee_photo = match present(req.employee_photo) {
        Some(src) => Some(upload_photo(st, &src).await?),
        None => None,
    };

    let emp = st
        .employees
        .insert(NewEmployee {
            first_name,
            last_name,
            email,
            gender,
            designation,
            salary,
            date_of_joining,
            department,
            employee_photo,
        })
        .await?;

    info!(employee_id = %emp.id, "employee created");
    Ok(emp)
}

#[instrument(skip(st, req))]
pub async fn update(st: &AppState, eid: &str, req: EmployeeRequest) -> ApiResult<Employee> {
    let id = parse_id(eid)?;
    let current = st
        .employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(eid))?;

    let email = match present(req.email) {
        Some(raw) => {
            let email = check_email(&raw)?;
            if st.employees.find_by_email(&email, Some(id)).await?.is_some() {
                warn!(%email, employee_id = %id, "employee email already in use");
                return Err(ApiError::conflict(ANOTHER_EMPLOYEE_EXISTS));
            }
            Some(email)
        }
        None => None,
    };

    let mut changes = EmployeeChanges {
        first_name: present(req.first_name),
        last_name: present(req.last_name),
        email,
        gender: present(req.gender).as_deref().map(check_gender).transpose()?,
        designation: present(req.designation),
        salary: req.salary.map(check_salary).transpose()?,
        date_of_joining: present(req.date_of_joining)
            .as_deref()
            .map(check_date)
            .transpose()?,
        department: present(req.department),
        employee_photo: None,
    };

    if let Some(src) = present(req.employee_photo) {
        changes.employee_photo = Some(upload_photo(st, &src).await?);
    }

    if changes.is_empty() {
        return Ok(current);
    }

    let emp = st
        .employees
        .update(id, changes)
        .await
        .map_err(|e| match e {
            ApiError::Conflict(_) => ApiError::conflict(ANOTHER_EMPLOYEE_EXISTS),
            other => other,
        })?
        .ok_or_else(|| not_found(eid))?;

    info!(employee_id = %emp.id, "employee updated");
    Ok(emp)
}

#[instrument(skip(st))]
pub async fn delete(st: &AppState, eid: &str) -> ApiResult<String> {
    let id = parse_id(eid)?;
    if !st.employees.delete(id).await? {
        return Err(not_found(eid));
    }
    info!(employee_id = %id, "employee deleted");
    Ok(format!("Employee with id {eid} deleted successfully"))
}
