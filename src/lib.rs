#![doc = "The `taskdeck` library crate."]
#![doc = ""]
#![doc = "A task-management REST API: users register and log in to obtain a JWT, then"]
#![doc = "create, list, update and delete their own tasks. This crate holds the domain"]
#![doc = "models, authentication, routing, persistence bootstrap and error handling."]
#![doc = "The binary (`main.rs`) wires them into an actix-web server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
