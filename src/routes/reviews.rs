use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::db::SubmitOutcome;
use crate::error::{AppError, AppResult};
use crate::session::Session;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub movie_id: i64,
    pub rating: f64,
    #[serde(default)]
    pub review_text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub message: String,
}

/// Submits a review on behalf of the session user
///
/// The submission routine owns validation; a rejection rolls the transaction
/// back and surfaces as a 400 with the routine's message.
pub async fn submit_review(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<SubmitReviewResponse>)> {
    let user = session.user().ok_or(AppError::Unauthorized)?;

    let outcome = state
        .store
        .submit_review(
            user.user_id,
            request.movie_id,
            request.rating,
            &request.review_text,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    match outcome {
        SubmitOutcome::Rejected(message) => {
            tracing::warn!(
                user_id = user.user_id,
                movie_id = request.movie_id,
                message = %message,
                "Review rejected"
            );
            Err(AppError::ReviewRejected(message))
        }
        SubmitOutcome::Accepted(message) => {
            tracing::info!(
                user_id = user.user_id,
                movie_id = request.movie_id,
                "Review submitted"
            );
            Ok((StatusCode::CREATED, Json(SubmitReviewResponse { message })))
        }
    }
}
