use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskRequest, Task, TaskQuery, UpdateTaskRequest},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Retrieves the authenticated user's tasks, oldest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in-progress` or `completed`.
/// - `search` (optional): case-insensitive substring of the title or description.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `400 Bad Request`: Unknown status value or a search term containing NUL.
/// - `401 Unauthorized` / `403 Forbidden`: Missing or invalid token.
/// - `500 Internal Server Error`: For database errors.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let TaskQuery { status, search } = query_params.into_inner();
    let search_pattern = search_pattern(search.as_deref())?;

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, status, user_id, created_at, updated_at
         FROM tasks
         WHERE user_id = $1
           AND ($2::task_status IS NULL OR status = $2)
           AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
         ORDER BY created_at ASC",
    )
    .bind(user.id())
    .bind(status)
    .bind(search_pattern)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters (required).
/// - `description`: 1 to 1000 characters (required).
/// - `status`: `pending`, `in-progress` or `completed` (required).
///
/// ## Responses:
/// - `201 Created`: The new `Task`.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized` / `403 Forbidden`: Missing or invalid token.
/// - `500 Internal Server Error`: For database errors.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let CreateTaskRequest {
        title,
        description,
        status,
    } = task_data.into_inner();

    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (title, description, status, user_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, title, description, status, user_id, created_at, updated_at",
    )
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(user.id())
    .fetch_one(&**pool)
    .await?;

    log::info!("User {} created task {}", user.id(), task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task by id.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `404 Not Found`: The task does not exist, belongs to someone else, or the id is not a UUID.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, status, user_id, created_at, updated_at
         FROM tasks WHERE id = $1 AND user_id = $2",
    )
    .bind(task_id.into_inner())
    .bind(user.id())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Updates any of `title`, `description` and `status` on a task the caller owns.
///
/// Fields left out of the body keep their stored values. Unknown fields are ignored.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `400 Bad Request`: No updatable field present, or a present field is invalid.
/// - `404 Not Found`: The task does not exist or belongs to someone else.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    if !task_data.has_changes() {
        return Err(AppError::BadRequest(
            "At least one field (title, description, or status) is required to update".into(),
        ));
    }
    task_data.validate()?;
    let UpdateTaskRequest {
        title,
        description,
        status,
    } = task_data.into_inner();
    let task_id = task_id.into_inner();

    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET title = COALESCE($1, title),
             description = COALESCE($2, description),
             status = COALESCE($3, status),
             updated_at = NOW()
         WHERE id = $4 AND user_id = $5
         RETURNING id, title, description, status, user_id, created_at, updated_at",
    )
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(task_id)
    .bind(user.id())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(task_not_found)?;

    log::info!("User {} updated task {}", user.id(), task_id);
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: `{ "message": "Task deleted successfully" }`.
/// - `404 Not Found`: The task does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user.id())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(task_not_found());
    }

    log::info!("User {} deleted task {}", user.id(), task_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

// Same answer for "missing" and "owned by someone else".
fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Turns the `search` parameter into an ILIKE pattern. Blank terms mean no filter.
fn search_pattern(search: Option<&str>) -> Result<Option<String>, AppError> {
    let term = match search.map(str::trim) {
        Some(term) if !term.is_empty() => term,
        _ => return Ok(None),
    };
    if term.contains('\0') {
        return Err(AppError::BadRequest(
            "Search term must not contain NUL characters".into(),
        ));
    }
    Ok(Some(format!("%{}%", escape_like(term))))
}

/// Escapes `%`, `_` and `\` so user input matches literally inside an ILIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
