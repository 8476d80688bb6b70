use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppResult;
use crate::session::Session;
use crate::templates;

use super::{page_context, AppState};

/// Renders the movies recommended for the session user
///
/// The id set comes from the recommendation routine; movie details are then
/// fetched with a single parameterized membership query.
pub async fn recommendations(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    let Some(user) = session.user() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let ids = state.store.recommendation_ids(user.user_id).await?;
    tracing::debug!(
        user_id = user.user_id,
        count = ids.len(),
        "Fetched recommendation ids"
    );

    let movies = if ids.is_empty() {
        Vec::new()
    } else {
        state.store.movies_by_ids(ids).await?
    };

    let mut ctx = page_context(&Some(user));
    ctx.insert("movies", &movies);
    Ok(templates::render(&state.templates, "recommendations.html", &ctx)?.into_response())
}
