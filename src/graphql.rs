use async_graphql::{http::GraphiQLSource, EmptySubscription, MergedObject, Schema};
use axum::{extract::State, response::Html, Json};
use tracing::{info_span, Instrument};

use crate::auth::{AuthMutation, AuthQuery};
use crate::employees::{EmployeeMutation, EmployeeQuery};
use crate::state::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AuthQuery, EmployeeQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutation, EmployeeMutation);

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> ApiSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}

pub async fn graphql_handler(
    State(schema): State<ApiSchema>,
    Json(req): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let span = info_span!(
        "graphql",
        operation = req.operation_name.as_deref().unwrap_or("anonymous")
    );
    let resp = schema.execute(req).instrument(span).await;
    if resp.is_err() {
        tracing::debug!(errors = ?resp.errors, "graphql request finished with errors");
    }
    Json(resp)
}

pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
