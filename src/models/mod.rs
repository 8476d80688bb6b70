use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// Display sentinel for a movie that has no reviews yet
pub const NO_RATING: &str = "N/A";

/// An application user, as read from the `"user"` table
///
/// Users are provisioned outside this system; the application only looks
/// them up by username at login.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
}

/// A movie row without rating information
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub release_year: i32,
    pub genre: String,
}

/// A movie row joined with its derived average rating, as listed on the
/// index page
///
/// `avg_rating` is computed by the database's `get_avg_rating` routine and is
/// NULL for movies without reviews; it serializes as a display string so the
/// sentinel and rounding rules live in one place rather than in templates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieSummary {
    pub movie_id: i64,
    pub title: String,
    pub release_year: i32,
    pub genre: String,
    #[serde(serialize_with = "serialize_avg_rating")]
    pub avg_rating: Option<BigDecimal>,
}

/// A review row joined with the reviewer's username
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithAuthor {
    pub review_id: i64,
    #[serde(serialize_with = "serialize_rating")]
    pub rating: BigDecimal,
    pub review_text: String,
    pub review_date: DateTime<Utc>,
    pub username: String,
}

/// A movie returned by the recommendation routine, with its average rating
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecommendedMovie {
    pub movie_id: i64,
    pub title: String,
    pub genre: String,
    #[serde(serialize_with = "serialize_avg_rating")]
    pub avg_rating: Option<BigDecimal>,
}

/// Formats a rating to one decimal place, e.g. "4.3"
pub fn format_rating(value: &BigDecimal) -> String {
    value.with_scale_round(1, RoundingMode::HalfUp).to_string()
}

/// Formats a nullable average rating, substituting the "N/A" sentinel when a
/// movie has no reviews
pub fn format_avg_rating(avg: Option<&BigDecimal>) -> String {
    match avg {
        Some(value) => format_rating(value),
        None => NO_RATING.to_string(),
    }
}

fn serialize_avg_rating<S: Serializer>(
    avg: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_avg_rating(avg.as_ref()))
}

fn serialize_rating<S: Serializer>(rating: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_rating(rating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn decimal(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_avg_rating_none_is_sentinel() {
        assert_eq!(format_avg_rating(None), "N/A");
    }

    #[test]
    fn test_format_avg_rating_rounds_to_one_decimal() {
        assert_eq!(format_avg_rating(Some(&decimal("4.25"))), "4.3");
        assert_eq!(format_avg_rating(Some(&decimal("3.333333"))), "3.3");
    }

    #[test]
    fn test_format_rating_pads_whole_numbers() {
        assert_eq!(format_rating(&decimal("4")), "4.0");
        assert_eq!(format_rating(&decimal("5.0")), "5.0");
    }

    #[test]
    fn test_movie_summary_serializes_missing_average_as_sentinel() {
        let summary = MovieSummary {
            movie_id: 1,
            title: "Heat".to_string(),
            release_year: 1995,
            genre: "Crime".to_string(),
            avg_rating: None,
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["avg_rating"], "N/A");
        assert_eq!(value["title"], "Heat");
    }

    #[test]
    fn test_movie_summary_serializes_average_as_display_string() {
        let summary = MovieSummary {
            movie_id: 2,
            title: "Alien".to_string(),
            release_year: 1979,
            genre: "Horror".to_string(),
            avg_rating: Some(decimal("4.4545")),
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["avg_rating"], "4.5");
    }

    #[test]
    fn test_review_serializes_rating_and_date() {
        let review = ReviewWithAuthor {
            review_id: 7,
            rating: decimal("4.5"),
            review_text: "Holds up.".to_string(),
            review_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            username: "alice".to_string(),
        };

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["rating"], "4.5");
        assert_eq!(value["username"], "alice");
        assert!(value["review_date"].as_str().unwrap().starts_with("2024-05-01"));
    }
}
