use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    // Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(()),
        }
    }
}

/// Employee record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String, // always lower-case
    pub gender: Option<Gender>,
    pub designation: String,
    pub salary: f64,
    pub date_of_joining: Date,
    pub department: String,
    pub employee_photo: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated fields for an employee that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub designation: String,
    pub salary: f64,
    pub date_of_joining: Date,
    pub department: String,
    pub employee_photo: Option<String>,
}

/// Sparse update: `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub date_of_joining: Option<Date>,
    pub department: Option<String>,
    pub employee_photo: Option<String>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the supplied fields to `emp` in place.
    pub fn apply_to(self, emp: &mut Employee) {
        if let Some(v) = self.first_name {
            emp.first_name = v;
        }
        if let Some(v) = self.last_name {
            emp.last_name = v;
        }
        if let Some(v) = self.email {
            emp.email = v;
        }
        if let Some(v) = self.gender {
            emp.gender = Some(v);
        }
        if let Some(v) = self.designation {
            emp.designation = v;
        }
        if let Some(v) = self.salary {
            emp.salary = v;
        }
        if let Some(v) = self.date_of_joining {
            emp.date_of_joining = v;
        }
        if let Some(v) = self.department {
            emp.department = v;
        }
        if let Some(v) = self.employee_photo {
            emp.employee_photo = Some(v);
        }
    }
}

/// Conjunctive exact-match filter; `None` fields are not constrained.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub designation: Option<String>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, emp: &Employee) -> bool {
        self.designation
            .as_deref()
            .map_or(true, |d| emp.designation == d)
            && self
                .department
                .as_deref()
                .map_or(true, |d| emp.department == d)
    }
}
