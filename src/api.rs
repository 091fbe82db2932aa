//! HTTP surface for the student registry.
//!
//! This module exposes a compact Axum router over a single resource collection:
//!
//! - `POST /students` – Validate `{name, age, address: {city, country}}` and insert it. Returns
//!   `201 {"id": ...}`; schema violations return `422 {"detail": ...}`.
//! - `GET /students` – List students, optionally filtered by `country` (exact match) and `age`
//!   (inclusive lower bound). Returns `{"data": [...]}` capped at the configured list limit.
//! - `GET /students/{id}` – Fetch one student.
//! - `PATCH /students/{id}` – Set only the supplied fields. Returns `{}`.
//! - `DELETE /students/{id}` – Remove one student.
//! - `GET /health` – Ping the backing store.
//! - `GET /metrics` – Request counters since startup.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Unknown and malformed identifiers both answer `404 {"detail": "Student not found"}`.

use crate::metrics::MetricsSnapshot;
use crate::students::{
    Address, NewStudent, Student, StudentApi, StudentError, StudentFilter, StudentPatch,
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the student API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: StudentApi + 'static,
{
    Router::new()
        .route(
            "/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/:id",
            get(fetch_student::<S>)
                .patch(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route("/health", get(health::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Wire representation of a stored student.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentResponse {
    /// Hex-encoded identifier assigned by the store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in whole years.
    pub age: i64,
    /// Embedded address.
    pub address: Address,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_hex(),
            name: student.name,
            age: student.age,
            address: student.address,
        }
    }
}

/// Response body for `POST /students`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// Identifier of the new student.
    pub id: String,
}

/// Response body for `GET /students`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    /// Matching students in store order.
    pub data: Vec<StudentResponse>,
}

/// Response body carrying a human-readable message (deletes and errors).
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    /// Message describing the outcome.
    pub detail: String,
}

/// Query string accepted by `GET /students`.
#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Exact match on `address.country`; blank means no constraint.
    #[serde(default)]
    country: Option<String>,
    /// Inclusive minimum age.
    #[serde(default)]
    age: Option<i64>,
}

impl From<ListQuery> for StudentFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            country: query.country.filter(|country| !country.is_empty()),
            min_age: query.age,
        }
    }
}

/// Insert a new student.
async fn create_student<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError>
where
    S: StudentApi,
{
    let Json(student) =
        payload.map_err(|rejection| StudentError::Validation(rejection.body_text()))?;
    let id = service.create(student).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_hex() })))
}

/// List students matching the optional `country` and `age` filters.
async fn list_students<S>(
    State(service): State<Arc<S>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError>
where
    S: StudentApi,
{
    let Query(query) =
        query.map_err(|rejection| StudentError::Validation(rejection.body_text()))?;
    let students = service.list(query.into()).await?;
    Ok(Json(ListResponse {
        data: students.into_iter().map(StudentResponse::from).collect(),
    }))
}

/// Fetch a single student by identifier.
async fn fetch_student<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<StudentResponse>, AppError>
where
    S: StudentApi,
{
    let student = service.fetch(&id).await?;
    Ok(Json(student.into()))
}

/// Set the supplied fields on a student, leaving the rest untouched.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPatch>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: StudentApi,
{
    let Json(patch) =
        payload.map_err(|rejection| StudentError::Validation(rejection.body_text()))?;
    service.update(&id, patch).await?;
    Ok(Json(json!({})))
}

/// Remove a student.
async fn delete_student<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, AppError>
where
    S: StudentApi,
{
    service.delete(&id).await?;
    Ok(Json(DetailResponse {
        detail: "Student deleted successfully".into(),
    }))
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Report whether the backing store answers; `503` when it does not.
async fn health<S>(State(service): State<Arc<S>>) -> (StatusCode, Json<HealthResponse>)
where
    S: StudentApi,
{
    let snapshot = service.store_health().await;
    let (status, label) = if snapshot.reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        status,
        Json(HealthResponse {
            status: label,
            store_reachable: snapshot.reachable,
            error: snapshot.error,
        }),
    )
}

/// Return request counters collected since startup.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: StudentApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "create_student",
                method: "POST",
                path: "/students",
                description: "Create a student. Every field is required. Response returns { \"id\": string }.",
                request_example: Some(json!({
                    "name": "Ann",
                    "age": 20,
                    "address": { "city": "Oslo", "country": "NO" }
                })),
            },
            CommandDescriptor {
                name: "list_students",
                method: "GET",
                path: "/students?country=&age=",
                description: "List students, optionally filtered by exact country and minimum age (inclusive).",
                request_example: None,
            },
            CommandDescriptor {
                name: "fetch_student",
                method: "GET",
                path: "/students/{id}",
                description: "Fetch one student by identifier.",
                request_example: None,
            },
            CommandDescriptor {
                name: "update_student",
                method: "PATCH",
                path: "/students/{id}",
                description: "Set only the supplied fields; omitted or null fields are left untouched.",
                request_example: Some(json!({ "age": 21 })),
            },
            CommandDescriptor {
                name: "delete_student",
                method: "DELETE",
                path: "/students/{id}",
                description: "Delete one student by identifier.",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Report whether the document store is reachable.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(StudentError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StudentError::NotFound => StatusCode::NOT_FOUND,
            StudentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StudentError::Store(error) => {
                tracing::error!(error = %error, "Store request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = DetailResponse {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StudentError> for AppError {
    fn from(inner: StudentError) -> Self {
        Self(inner)
    }
}
