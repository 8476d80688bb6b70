use axum::{
    extract::FromRef,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::Key;
use serde_json::{json, Value};
use std::sync::Arc;
use tera::Tera;
use tower_http::trace::TraceLayer;

use crate::db::MovieStore;
use crate::session::SessionUser;
use crate::templates;

pub mod auth;
pub mod movies;
pub mod recommendations;
pub mod reviews;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub templates: Arc<Tera>,
    session_key: Key,
}

impl AppState {
    /// Builds state from a review store and a cookie signing key, compiling
    /// the template environment once at startup
    pub fn new(store: Arc<dyn MovieStore>, session_key: Key) -> anyhow::Result<Self> {
        let templates = Arc::new(templates::build()?);
        Ok(Self {
            store,
            templates,
            session_key,
        })
    }
}

/// Lets the signed cookie jar pull its key out of the shared state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.session_key.clone()
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(movies::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/movie/:movie_id", get(movies::movie_detail))
        .route("/api/submit_review", post(reviews::submit_review))
        .route("/recommendations", get(recommendations::recommendations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Base template context for a page render; every page shows the signed-in
/// user in its navigation
pub(crate) fn page_context(user: &Option<SessionUser>) -> tera::Context {
    let mut ctx = tera::Context::new();
    ctx.insert("user", user);
    ctx
}
