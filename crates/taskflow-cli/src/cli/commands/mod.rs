pub mod auth;
pub mod config;
pub mod projects;
pub mod tasks;
pub mod users;
