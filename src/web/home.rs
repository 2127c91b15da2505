use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AppState, WebError, pages};

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    success: Option<String>,
}

/// GET / — the latest workshop with its signup form, or an empty-state
/// page when none exists. `?success=true` shows the post-submission
/// banner.
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, WebError> {
    let Some(workshop) = state
        .store
        .latest_workshop()
        .await
        .map_err(WebError::database)?
    else {
        return Ok(Html(pages::no_workshop()));
    };

    let signup_count = state
        .store
        .count_signups(workshop.id)
        .await
        .map_err(WebError::database)?;

    let success = query.success.as_deref() == Some("true");

    Ok(Html(pages::home(&workshop, signup_count, success)))
}
