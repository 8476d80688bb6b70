//! Movie review web application backed by Postgres stored routines.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod templates;
