use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::error::{AppError, AppResult};
use crate::models::format_avg_rating;
use crate::session::Session;
use crate::templates;

use super::{page_context, AppState};

/// Lists every movie in the catalog with its average rating, newest release
/// first
pub async fn index(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let movies = state.store.list_movies().await?;

    let mut ctx = page_context(&session.user());
    ctx.insert("movies", &movies);
    templates::render(&state.templates, "index.html", &ctx)
}

/// Shows a single movie with its reviews and average rating
pub async fn movie_detail(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<i64>,
) -> AppResult<Html<String>> {
    let movie = state
        .store
        .movie_by_id(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;
    let reviews = state.store.reviews_for_movie(movie_id).await?;
    let avg_rating = state.store.average_rating(movie_id).await?;

    let mut ctx = page_context(&session.user());
    ctx.insert("movie", &movie);
    ctx.insert("reviews", &reviews);
    ctx.insert("avg_rating", &format_avg_rating(avg_rating.as_ref()));
    templates::render(&state.templates, "movie_detail.html", &ctx)
}
