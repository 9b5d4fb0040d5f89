pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::{auth::AuthMiddleware, error};

/// Registers the `/auth` and `/tasks` scopes. Mount under `/api`.
///
/// Only `/tasks` sits behind `AuthMiddleware`. Both scopes answer malformed
/// bodies, query strings and paths with the JSON error format.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
