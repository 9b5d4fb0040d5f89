use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Identifier of the user who owns the task.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task. All fields are required.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200), custom = "no_nul_characters")]
    pub title: String,

    /// Must be between 1 and 1000 characters.
    #[validate(length(min = 1, max = 1000), custom = "no_nul_characters")]
    pub description: String,

    pub status: TaskStatus,
}

/// Payload for a partial task update. Absent fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200), custom = "no_nul_characters")]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 1000), custom = "no_nul_characters")]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    /// True when at least one updatable field is present.
    pub fn has_changes(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.status.is_some()
    }
}

/// Postgres `TEXT` cannot hold `\0`.
pub fn no_nul_characters(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut error = ValidationError::new("nul_character");
        error.message = Some("must not contain NUL characters".into());
        return Err(error);
    }
    Ok(())
}

/// Query parameters for filtering the task list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"completed\"").unwrap(),
            TaskStatus::Completed
        );
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"in_progress\"").is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: "Quarterly numbers".to_string(),
            status: TaskStatus::Pending,
            user_id: 3,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["userId"], 3);
        assert_eq!(json["status"], "pending");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_create_task_validation() {
        let valid_input = CreateTaskRequest {
            title: "Valid Task".to_string(),
            description: "Valid Description".to_string(),
            status: TaskStatus::Pending,
        };
        assert!(valid_input.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: "".to_string(),
            description: "Valid Description".to_string(),
            status: TaskStatus::Pending,
        };
        assert!(empty_title.validate().is_err());

        let empty_description = CreateTaskRequest {
            title: "Valid Task".to_string(),
            description: "".to_string(),
            status: TaskStatus::Pending,
        };
        assert!(empty_description.validate().is_err());

        let long_title = CreateTaskRequest {
            title: "a".repeat(201),
            description: "Valid Description".to_string(),
            status: TaskStatus::Completed,
        };
        assert!(long_title.validate().is_err());

        let long_description = CreateTaskRequest {
            title: "Valid Task".to_string(),
            description: "b".repeat(1001),
            status: TaskStatus::InProgress,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_nul_characters_rejected() {
        let nul_title = CreateTaskRequest {
            title: "a\0b".to_string(),
            description: "Valid Description".to_string(),
            status: TaskStatus::Pending,
        };
        assert!(nul_title.validate().is_err());

        let nul_description = UpdateTaskRequest {
            description: Some("\0".to_string()),
            ..Default::default()
        };
        assert!(nul_description.validate().is_err());

        assert!(no_nul_characters("plain text").is_ok());
    }

    #[test]
    fn test_create_task_requires_every_field() {
        let missing_status = r#"{ "title": "t", "description": "d" }"#;
        assert!(serde_json::from_str::<CreateTaskRequest>(missing_status).is_err());

        let missing_description = r#"{ "title": "t", "status": "pending" }"#;
        assert!(serde_json::from_str::<CreateTaskRequest>(missing_description).is_err());
    }

    #[test]
    fn test_update_task_request() {
        assert!(!UpdateTaskRequest::default().has_changes());

        // The client sends the whole task back, id included.
        let from_client: UpdateTaskRequest = serde_json::from_str(
            r#"{ "id": "abc", "title": "New", "description": "Desc", "status": "completed" }"#,
        )
        .unwrap();
        assert!(from_client.has_changes());
        assert_eq!(from_client.status, Some(TaskStatus::Completed));
        assert!(from_client.validate().is_ok());

        let status_only = UpdateTaskRequest {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        assert!(status_only.has_changes());
        assert!(status_only.validate().is_ok());

        let empty_title = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());
    }
}
