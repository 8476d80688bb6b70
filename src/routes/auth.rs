use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::error::AppResult;
use crate::session::{Session, SessionUser};
use crate::templates;

use super::{page_context, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    // Accepted but never checked; the user table carries no credential
    // material.
    #[allow(dead_code)]
    pub password: String,
}

/// Shows the login form
pub async fn login_form(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Html<String>> {
    let mut ctx = page_context(&session.user());
    ctx.insert("error", &None::<String>);
    templates::render(&state.templates, "login.html", &ctx)
}

/// Handles a login form submission
///
/// The user is looked up by username alone. A match starts a session and
/// redirects to the index; anything else re-renders the form with an error.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match state.store.find_user_by_username(&form.username).await? {
        Some(user) => {
            tracing::info!(user_id = user.user_id, username = %user.username, "User logged in");
            let jar = session.log_in(&SessionUser {
                user_id: user.user_id,
                username: user.username,
            });
            Ok((jar, Redirect::to("/")).into_response())
        }
        None => {
            tracing::debug!(username = %form.username, "Login failed for unknown username");
            let mut ctx = page_context(&None);
            ctx.insert("error", "Invalid credentials");
            Ok(templates::render(&state.templates, "login.html", &ctx)?.into_response())
        }
    }
}

/// Clears the session and returns to the index
pub async fn logout(session: Session) -> (SignedCookieJar, Redirect) {
    (session.log_out(), Redirect::to("/"))
}
