/// Task endpoints
///
/// Owner-scoped CRUD over the caller's tasks. Listing only ever returns the
/// caller's own tasks; single-task operations first check that the task
/// exists (404) and then that the caller owns it (403) — in that order, so a
/// missing task and a foreign task stay distinguishable.
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task owned by the caller
/// - `GET /tasks` - List the caller's tasks
/// - `GET /tasks/:id` - Fetch one task
/// - `PUT /tasks/:id` - Replace a task's editable fields
/// - `DELETE /tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{middleware::CurrentUser, ownership::require_owner},
    models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Task create/update body
///
/// Updates submit the full editable field set; creation falls back to the
/// defaults for anything omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    /// Short title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Progress state (default: todo)
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority level (default: medium)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Optional due date
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Creates a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "description": "Quarterly numbers",
///   "priority": "high",
///   "deadline": "2026-12-31T23:59:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `401`: missing/invalid token
/// - `422`: validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: user.id,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            deadline: req.deadline,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists the caller's tasks, newest first
///
/// # Endpoint
///
/// `GET /tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, user.id).await?;

    Ok(Json(tasks))
}

/// Fetches a single task
///
/// # Endpoint
///
/// `GET /tasks/:id`
///
/// # Errors
///
/// - `401`: missing/invalid token
/// - `403`: task belongs to another user
/// - `404`: task does not exist
pub async fn get_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_owner(user.id, task.owner_id)?;

    Ok(Json(task))
}

/// Replaces a task's editable fields
///
/// # Endpoint
///
/// `PUT /tasks/:id`
///
/// # Errors
///
/// - `401`: missing/invalid token
/// - `403`: task belongs to another user
/// - `404`: task does not exist
/// - `422`: validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    // Existence first, then ownership
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_owner(user.id, task.owner_id)?;

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            deadline: req.deadline,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a task
///
/// # Endpoint
///
/// `DELETE /tasks/:id`
///
/// # Errors
///
/// - `401`: missing/invalid token
/// - `403`: task belongs to another user
/// - `404`: task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    // Existence first, then ownership
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_owner(user.id, task.owner_id)?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request_defaults() {
        let req: TaskRequest = serde_json::from_str(r#"{"title": "t"}"#).expect("Should parse");

        assert_eq!(req.title, "t");
        assert_eq!(req.description, "");
        assert_eq!(req.status, TaskStatus::Todo);
        assert_eq!(req.priority, TaskPriority::Medium);
        assert!(req.deadline.is_none());
    }

    #[test]
    fn test_task_request_full_body() {
        let req: TaskRequest = serde_json::from_str(
            r#"{
                "title": "Write report",
                "description": "Quarterly numbers",
                "status": "in_progress",
                "priority": "high",
                "deadline": "2026-12-31T23:59:00Z"
            }"#,
        )
        .expect("Should parse");

        assert_eq!(req.status, TaskStatus::InProgress);
        assert_eq!(req.priority, TaskPriority::High);
        assert!(req.deadline.is_some());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_task_request_rejects_empty_title() {
        let req: TaskRequest = serde_json::from_str(r#"{"title": ""}"#).expect("Should parse");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_task_request_rejects_unknown_status() {
        let result = serde_json::from_str::<TaskRequest>(r#"{"title": "t", "status": "done"}"#);
        assert!(result.is_err());
    }
}
