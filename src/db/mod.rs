pub mod store;

pub use store::MovieStore;
pub use store::PgMovieStore;
pub use store::SubmitOutcome;
