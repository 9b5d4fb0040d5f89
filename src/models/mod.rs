pub mod task;
pub mod user;

pub use task::{CreateTaskRequest, Task, TaskQuery, TaskStatus, UpdateTaskRequest};
pub use user::{normalize_email, User, UserCredentials};
