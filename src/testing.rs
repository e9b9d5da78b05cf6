//! In-memory collaborators for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::{UserRepo, USER_EXISTS};
use crate::auth::repo_types::{NewUser, User};
use crate::employees::repo::{EmployeeRepo, EMPLOYEE_EXISTS};
use crate::employees::repo_types::{Employee, EmployeeChanges, EmployeeFilter, NewEmployee};
use crate::error::{ApiError, ApiResult};
use crate::uploads::PhotoUploader;

#[derive(Default)]
pub struct MemoryUserRepo {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> ApiResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> ApiResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(ApiError::conflict(USER_EXISTS));
        }
        let row = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryEmployeeRepo {
    rows: Mutex<Vec<Employee>>,
}

#[async_trait]
impl EmployeeRepo for MemoryEmployeeRepo {
    async fn list(&self, filter: &EmployeeFilter) -> ApiResult<Vec<Employee>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Employee>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
        except: Option<Uuid>,
    ) -> ApiResult<Option<Employee>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|e| e.email == email && Some(e.id) != except)
            .cloned())
    }

    async fn insert(&self, emp: NewEmployee) -> ApiResult<Employee> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|e| e.email == emp.email) {
            return Err(ApiError::conflict(EMPLOYEE_EXISTS));
        }
        let now = OffsetDateTime::now_utc();
        let row = Employee {
            id: Uuid::new_v4(),
            first_name: emp.first_name,
            last_name: emp.last_name,
            email: emp.email,
            gender: emp.gender,
            designation: emp.designation,
            salary: emp.salary,
            date_of_joining: emp.date_of_joining,
            department: emp.department,
            employee_photo: emp.employee_photo,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> ApiResult<Option<Employee>> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &changes.email {
            if rows.iter().any(|e| &e.email == email && e.id != id) {
                return Err(ApiError::conflict(EMPLOYEE_EXISTS));
            }
        }
        let Some(row) = rows.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        changes.apply_to(row);
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        Ok(rows.len() != before)
    }
}

/// Never reports an existing user up front, so duplicates reach `create`.
#[derive(Default)]
pub struct BlindUserRepo(MemoryUserRepo);

#[async_trait]
impl UserRepo for BlindUserRepo {
    async fn find_by_username_or_email(&self, _: &str, _: &str) -> ApiResult<Option<User>> {
        Ok(None)
    }

    async fn create(&self, user: NewUser) -> ApiResult<User> {
        self.0.create(user).await
    }
}

/// Never reports an email as taken, so duplicates reach the write. With
/// `losing_updates` every update finds its row gone.
#[derive(Default)]
pub struct BlindEmployeeRepo {
    inner: MemoryEmployeeRepo,
    lose_updates: bool,
}

impl BlindEmployeeRepo {
    pub fn losing_updates() -> Self {
        Self {
            inner: MemoryEmployeeRepo::default(),
            lose_updates: true,
        }
    }
}

#[async_trait]
impl EmployeeRepo for BlindEmployeeRepo {
    async fn list(&self, filter: &EmployeeFilter) -> ApiResult<Vec<Employee>> {
        self.inner.list(filter).await
    }

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Employee>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, _: &str, _: Option<Uuid>) -> ApiResult<Option<Employee>> {
        Ok(None)
    }

    async fn insert(&self, emp: NewEmployee) -> ApiResult<Employee> {
        self.inner.insert(emp).await
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> ApiResult<Option<Employee>> {
        if self.lose_updates {
            return Ok(None);
        }
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        self.inner.delete(id).await
    }
}

/// Echoes the source back under a fake CDN host, or fails with a fixed reason.
pub struct FakeUploader {
    fail_with: Option<String>,
}

impl FakeUploader {
    pub fn ok() -> Self {
        Self { fail_with: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl PhotoUploader for FakeUploader {
    async fn upload(&self, source: &str) -> anyhow::Result<String> {
        match &self.fail_with {
            Some(reason) => Err(anyhow::anyhow!(reason.clone())),
            None => Ok(format!("https://cdn.fake.local/{source}")),
        }
    }
}
