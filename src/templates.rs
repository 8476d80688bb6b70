use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppResult;

/// Compiles the template environment
///
/// The glob is anchored to the manifest directory so templates resolve the
/// same way under `cargo run` and under tests.
pub fn build() -> tera::Result<Tera> {
    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html"))
}

/// Renders a named template into an HTML response
pub fn render(templates: &Tera, name: &str, ctx: &Context) -> AppResult<Html<String>> {
    Ok(Html(templates.render(name, ctx)?))
}
