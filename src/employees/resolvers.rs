use async_graphql::{Context, Object, Result, ID};

use crate::employees::dto::{EmployeeRequest, EmployeeView};
use crate::employees::services;
use crate::state::AppState;

#[derive(Default)]
pub struct EmployeeQuery;

#[Object(rename_args = "snake_case")]
impl EmployeeQuery {
    async fn get_all_employees(&self, ctx: &Context<'_>) -> Result<Vec<EmployeeView>> {
        let st = ctx.data::<AppState>()?;
        let rows = services::get_all(st).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_employee_by_id(&self, ctx: &Context<'_>, eid: ID) -> Result<EmployeeView> {
        let st = ctx.data::<AppState>()?;
        Ok(services::find_by_id(st, &eid).await?.into())
    }

    /// Exact match on whichever of the two is given; both must match if both are.
    async fn search_employee_by_designation_or_department(
        &self,
        ctx: &Context<'_>,
        designation: Option<String>,
        department: Option<String>,
    ) -> Result<Vec<EmployeeView>> {
        let st = ctx.data::<AppState>()?;
        let rows = services::search(st, designation, department).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct EmployeeMutation;

#[Object(rename_args = "snake_case")]
impl EmployeeMutation {
    /// `employee_photo` may be an image URL, a base64 data URI or bare base64.
    #[allow(clippy::too_many_arguments)]
    async fn add_employee(
        &self,
        ctx: &Context<'_>,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
        gender: Option<String>,
        designation: Option<String>,
        salary: Option<f64>,
        date_of_joining: Option<String>,
        department: Option<String>,
        employee_photo: Option<String>,
    ) -> Result<EmployeeView> {
        let st = ctx.data::<AppState>()?;
        let req = EmployeeRequest {
            first_name,
            last_name,
            email,
            gender,
            designation,
            salary,
            date_of_joining,
            department,
            employee_photo,
        };
        Ok(services::add(st, req).await?.into())
    }

    /// Only the arguments that are supplied are changed.
    #[allow(clippy::too_many_arguments)]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        eid: ID,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
        gender: Option<String>,
        designation: Option<String>,
        salary: Option<f64>,
        date_of_joining: Option<String>,
        department: Option<String>,
        employee_photo: Option<String>,
    ) -> Result<EmployeeView> {
        let st = ctx.data::<AppState>()?;
        let req = EmployeeRequest {
            first_name,
            last_name,
            email,
            gender,
            designation,
            salary,
            date_of_joining,
            department,
            employee_photo,
        };
        Ok(services::update(st, &eid, req).await?.into())
    }

    async fn delete_employee(&self, ctx: &Context<'_>, eid: ID) -> Result<String> {
        let st = ctx.data::<AppState>()?;
        Ok(services::delete(st, &eid).await?)
    }
}
