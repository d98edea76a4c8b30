//! REST endpoints driving the task lifecycle engine.
//!
//! Route paths match the original frontend's fetch calls, so the
//! surviving client keeps working against this backend unchanged.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::query::UpcomingTask;
use crate::service::{FilterParams, TaskService, UserContext};
use crate::types::{SignupInput, Task, TaskInput, UserProfile, YearStatistics};

/// Query string carrying only the user id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

impl UserQuery {
    fn ctx(&self) -> UserContext {
        UserContext::new(self.user_id.clone())
    }
}

/// Body for the AddTask command: the original client posts the user id
/// alongside a single task payload under `tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTaskBody {
    user_id: String,
    tasks: TaskInput,
}

/// Body for the sweep command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SweepBody {
    user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepResponse {
    updated: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    user_id: String,
    query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterQuery {
    user_id: String,
    statuses: Option<String>,
    importances: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsQuery {
    user_id: String,
    year: i32,
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_value("taskId", "malformed task id"))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn signup(
    State(service): State<TaskService>,
    Json(input): Json<SignupInput>,
) -> ApiResult<Json<serde_json::Value>> {
    service.signup(&input)?;
    Ok(Json(serde_json::json!({ "userId": input.user_id })))
}

async fn profile(
    State(service): State<TaskService>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(service.profile(&q.ctx())?))
}

async fn add_task(
    State(service): State<TaskService>,
    Json(body): Json<AddTaskBody>,
) -> ApiResult<Json<Task>> {
    let ctx = UserContext::new(body.user_id);
    Ok(Json(service.create_task(&ctx, &body.tasks)?))
}

async fn update_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
    Query(q): Query<UserQuery>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    let task_id = parse_task_id(&task_id)?;
    Ok(Json(service.edit_task(&q.ctx(), &task_id, &input)?))
}

async fn delete_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let task_id = parse_task_id(&task_id)?;
    service.delete_task(&q.ctx(), &task_id)?;
    Ok(Json(serde_json::json!({ "deleted": task_id })))
}

async fn complete_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Task>> {
    let task_id = parse_task_id(&task_id)?;
    Ok(Json(service.complete_task(&q.ctx(), &task_id)?))
}

async fn sweep(
    State(service): State<TaskService>,
    Json(body): Json<SweepBody>,
) -> ApiResult<Json<SweepResponse>> {
    let ctx = UserContext::new(body.user_id);
    let updated = service.sweep(&ctx)?;
    Ok(Json(SweepResponse { updated }))
}

async fn upcoming_active(
    State(service): State<TaskService>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Vec<UpcomingTask>>> {
    Ok(Json(service.list_upcoming_active(&q.ctx())?))
}

async fn by_category(
    State(service): State<TaskService>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<BTreeMap<String, Vec<Task>>>> {
    Ok(Json(service.list_by_category(&q.ctx())?))
}

async fn by_calendar(
    State(service): State<TaskService>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(service.list_calendar(&q.ctx())?))
}

async fn search(
    State(service): State<TaskService>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let ctx = UserContext::new(q.user_id);
    Ok(Json(service.search(&ctx, &q.query)?))
}

async fn filter(
    State(service): State<TaskService>,
    Query(q): Query<FilterQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let ctx = UserContext::new(q.user_id.clone());
    let params = FilterParams::from_labels(
        q.statuses.as_deref(),
        q.importances.as_deref(),
        q.start_date,
        q.end_date,
    )?;
    Ok(Json(service.filter(&ctx, &params)?))
}

async fn statistics(
    State(service): State<TaskService>,
    Query(q): Query<StatisticsQuery>,
) -> ApiResult<Json<YearStatistics>> {
    let ctx = UserContext::new(q.user_id.clone());
    Ok(Json(service.year_statistics(&ctx, q.year)?))
}

/// Build the router with all routes.
pub fn build_router(service: TaskService) -> Router {
    // Permissive CORS: the frontend is served from a separate dev origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Commands
        .route("/api/signup", post(signup))
        .route("/api/user/AddTask", post(add_task))
        .route("/api/tasks/UpdateTask/{task_id}", put(update_task))
        .route("/api/tasks/DeleteTask/{task_id}", delete(delete_task))
        .route("/api/tasks/CompleteTask/{task_id}", post(complete_task))
        .route("/api/user/tasks/updateStatusToNotFinished", put(sweep))
        // Queries
        .route("/api/user/profile", get(profile))
        .route("/api/user/tasks/lastSevenDays/Active", get(upcoming_active))
        .route("/api/user/tasks/by-category", get(by_category))
        .route("/api/user/tasks/by-calendar", get(by_calendar))
        .route("/api/user/tasks/search", get(search))
        .route("/api/user/tasks/filter", get(filter))
        .route("/api/user/statistics", get(statistics))
        .route("/api/health", get(health))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
