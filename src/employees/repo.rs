use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::employees::repo_types::{Employee, EmployeeChanges, EmployeeFilter, NewEmployee};
use crate::error::{ApiError, ApiResult};

pub const EMPLOYEE_EXISTS: &str = "Employee already exists with this email";

const COLUMNS: &str = "id, first_name, last_name, email, gender, designation, salary, \
                       date_of_joining, department, employee_photo, created_at, updated_at";

#[async_trait]
pub trait EmployeeRepo: Send + Sync {
    async fn list(&self, filter: &EmployeeFilter) -> ApiResult<Vec<Employee>>;

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Employee>>;

    /// Find an employee holding `email`, ignoring the one with id `except`.
    async fn find_by_email(&self, email: &str, except: Option<Uuid>)
        -> ApiResult<Option<Employee>>;

    /// Duplicate email is a `Conflict`.
    async fn insert(&self, emp: NewEmployee) -> ApiResult<Employee>;

    /// Applies `changes` to the row and returns it, or `None` if it is gone.
    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> ApiResult<Option<Employee>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> ApiResult<bool>;
}

#[derive(Clone)]
pub struct PgEmployeeRepo {
    db: PgPool,
}

impl PgEmployeeRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_err(e: sqlx::Error) -> ApiError {
    if is_unique_violation(&e) {
        ApiError::conflict(EMPLOYEE_EXISTS)
    } else {
        e.into()
    }
}

#[async_trait]
impl EmployeeRepo for PgEmployeeRepo {
    async fn list(&self, filter: &EmployeeFilter) -> ApiResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM employees
            WHERE ($1::text IS NULL OR designation = $1)
              AND ($2::text IS NULL OR department = $2)
            ORDER BY created_at ASC
            "#
        ))
        .bind(filter.designation.as_deref())
        .bind(filter.department.as_deref())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_email(
        &self,
        email: &str,
        except: Option<Uuid>,
    ) -> ApiResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM employees
            WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#
        ))
        .bind(email)
        .bind(except)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, emp: NewEmployee) -> ApiResult<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees (first_name, last_name, email, gender, designation,
                                   salary, date_of_joining, department, employee_photo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&emp.first_name)
        .bind(&emp.last_name)
        .bind(&emp.email)
        .bind(emp.gender)
        .bind(&emp.designation)
        .bind(emp.salary)
        .bind(emp.date_of_joining)
        .bind(&emp.department)
        .bind(emp.employee_photo.as_deref())
        .fetch_one(&self.db)
        .await
        .map_err(map_write_err)
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> ApiResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees SET
                first_name      = COALESCE($2, first_name),
                last_name       = COALESCE($3, last_name),
                email           = COALESCE($4, email),
                gender          = COALESCE($5, gender),
                designation     = COALESCE($6, designation),
                salary          = COALESCE($7, salary),
                date_of_joining = COALESCE($8, date_of_joining),
                department      = COALESCE($9, department),
                employee_photo  = COALESCE($10, employee_photo),
                updated_at      = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.gender)
        .bind(changes.designation)
        .bind(changes.salary)
        .bind(changes.date_of_joining)
        .bind(changes.department)
        .bind(changes.employee_photo)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_err)
    }

    async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        let res = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
