use async_graphql::{SimpleObject, ID};

use crate::employees::repo_types::Employee;
use crate::validation::rfc3339;

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Employee", rename_fields = "snake_case")]
pub struct EmployeeView {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<String>,
    pub designation: String,
    pub salary: f64,
    /// `YYYY-MM-DD`
    pub date_of_joining: String,
    pub department: String,
    pub employee_photo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Employee> for EmployeeView {
    fn from(e: Employee) -> Self {
        Self {
            id: ID(e.id.to_string()),
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            gender: e.gender.map(|g| g.to_string()),
            designation: e.designation,
            salary: e.salary,
            date_of_joining: e.date_of_joining.to_string(),
            department: e.department,
            employee_photo: e.employee_photo,
            created_at: rfc3339(e.created_at),
            updated_at: rfc3339(e.updated_at),
        }
    }
}

/// Raw `addEmployee` / `updateEmployee` arguments, before validation.
#[derive(Debug, Clone, Default)]
pub struct EmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub date_of_joining: Option<String>,
    pub department: Option<String>,
    pub employee_photo: Option<String>,
}
