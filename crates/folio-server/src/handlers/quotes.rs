//! Quotes API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use folio_notes::{Quote, quote_categories, quotes_in_category};
use serde::Deserialize;

use crate::error::ServerError;
use crate::handlers::check_limit;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Query for GET /api/quotes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuotesParams {
    category: Option<String>,
    limit: Option<usize>,
}

/// Query for GET /api/quotes/random.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RandomParams {
    category: Option<String>,
}

/// Handle GET /api/quotes/categories.
pub(crate) async fn get_categories(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let snapshot = state.vault.snapshot();
    Json(quote_categories(snapshot.quotes()))
}

/// Handle GET /api/quotes/random.
pub(crate) async fn random_quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomParams>,
) -> Result<Json<Quote>, ServerError> {
    let snapshot = state.vault.snapshot();
    let category = params.category.filter(|c| !c.is_empty());
    let quote = folio_notes::random_quote(snapshot.quotes(), category.as_deref(), &mut rand::rng())
        .cloned()
        .ok_or(ServerError::NoQuotes(category))?;
    Ok(Json(quote))
}

/// Handle GET /api/quotes.
pub(crate) async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuotesParams>,
) -> Result<Json<Vec<Quote>>, ServerError> {
    let limit = check_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT)?;
    let snapshot = state.vault.snapshot();

    let quotes = match params.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => quotes_in_category(snapshot.quotes(), category)
            .into_iter()
            .take(limit)
            .cloned()
            .collect(),
        None => snapshot.quotes().iter().take(limit).cloned().collect(),
    };
    Ok(Json(quotes))
}
