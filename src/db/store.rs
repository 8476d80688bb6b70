use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::{Movie, MovieSummary, RecommendedMovie, ReviewWithAuthor, User};

/// Marker token the `submit_review` routine embeds in rejection messages
pub const REJECTION_MARKER: &str = "Error";

/// Outcome of a review submission, as reported by the database routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The routine accepted the review and the transaction was committed
    Accepted(String),
    /// The routine reported a validation failure and the transaction was
    /// rolled back
    Rejected(String),
}

impl SubmitOutcome {
    /// Classifies a routine status message by the rejection marker
    fn from_message(message: String) -> Self {
        if message.contains(REJECTION_MARKER) {
            SubmitOutcome::Rejected(message)
        } else {
            SubmitOutcome::Accepted(message)
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SubmitOutcome::Accepted(message) | SubmitOutcome::Rejected(message) => message,
        }
    }
}

/// The external database collaborator
///
/// All aggregate logic (average ratings, review validation, recommendation
/// ranking) lives in stored routines owned by the database. This trait is
/// the narrow typed contract the application depends on; handlers and tests
/// never see SQL.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Looks up a user record by username for login
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;

    /// All movies with their derived average rating, newest release first
    async fn list_movies(&self) -> Result<Vec<MovieSummary>, sqlx::Error>;

    /// A single movie by id
    async fn movie_by_id(&self, movie_id: i64) -> Result<Option<Movie>, sqlx::Error>;

    /// Reviews for a movie, most recent first
    async fn reviews_for_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error>;

    /// Derived average rating via `get_avg_rating`; NULL when unreviewed
    async fn average_rating(&self, movie_id: i64) -> Result<Option<BigDecimal>, sqlx::Error>;

    /// Forwards a review to the `submit_review` routine inside a transaction
    async fn submit_review(
        &self,
        user_id: i64,
        movie_id: i64,
        rating: f64,
        review_text: &str,
    ) -> Result<SubmitOutcome, sqlx::Error>;

    /// Movie ids produced by the `get_recommendations` routine for a user
    async fn recommendation_ids(&self, user_id: i64) -> Result<Vec<i64>, sqlx::Error>;

    /// Full details for a set of recommended movie ids
    async fn movies_by_ids(&self, movie_ids: Vec<i64>) -> Result<Vec<RecommendedMovie>, sqlx::Error>;
}

/// PostgreSQL-backed store
///
/// Owns a connection pool; every operation acquires a pooled connection for
/// the duration of one statement (or one transaction for submissions).
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    /// Connects a pooled store to the given database
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username
            FROM "user"
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_movies(&self) -> Result<Vec<MovieSummary>, sqlx::Error> {
        sqlx::query_as::<_, MovieSummary>(
            r#"
            SELECT m.movie_id, m.title, m.release_year, m.genre,
                   get_avg_rating(m.movie_id) AS avg_rating
            FROM movie m
            ORDER BY m.release_year DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn movie_by_id(&self, movie_id: i64) -> Result<Option<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            r#"
            SELECT movie_id, title, release_year, genre
            FROM movie
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn reviews_for_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.review_id, r.rating, r.review_text, r.review_date, u.username
            FROM review r
            JOIN "user" u ON r.user_id = u.user_id
            WHERE r.movie_id = $1
            ORDER BY r.review_date DESC
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn average_rating(&self, movie_id: i64) -> Result<Option<BigDecimal>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<BigDecimal>>("SELECT get_avg_rating($1)")
            .bind(movie_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn submit_review(
        &self,
        user_id: i64,
        movie_id: i64,
        rating: f64,
        review_text: &str,
    ) -> Result<SubmitOutcome, sqlx::Error> {
        // Errors propagate with the transaction unfinished; dropping it
        // rolls back.
        let mut tx = self.pool.begin().await?;

        let message: String =
            sqlx::query_scalar::<_, String>("SELECT submit_review($1, $2, $3::numeric, $4)")
                .bind(user_id)
                .bind(movie_id)
                .bind(rating)
                .bind(review_text)
                .fetch_one(&mut *tx)
                .await?;

        let outcome = SubmitOutcome::from_message(message);
        match &outcome {
            SubmitOutcome::Rejected(_) => tx.rollback().await?,
            SubmitOutcome::Accepted(_) => tx.commit().await?,
        }

        Ok(outcome)
    }

    async fn recommendation_ids(&self, user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        // The routine returns a NULL collection for users it cannot score.
        let ids = sqlx::query_scalar::<_, Option<Vec<i64>>>("SELECT get_recommendations($1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(ids.unwrap_or_default())
    }

    async fn movies_by_ids(
        &self,
        movie_ids: Vec<i64>,
    ) -> Result<Vec<RecommendedMovie>, sqlx::Error> {
        sqlx::query_as::<_, RecommendedMovie>(
            r#"
            SELECT movie_id, title, genre,
                   get_avg_rating(movie_id) AS avg_rating
            FROM movie
            WHERE movie_id = ANY($1)
            "#,
        )
        .bind(movie_ids)
        .fetch_all(&self.pool)
        .await
    }
}
