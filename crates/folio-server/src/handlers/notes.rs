//! Notes API endpoints.
//!
//! Listing, search, statistics, structure, group trees and single notes
//! with their navigation context.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use folio_notes::{NavigationContext, NoteFilter, NoteStats, NoteSummary};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::handlers::check_limit;
use crate::state::AppState;

const LIST_DEFAULT_LIMIT: usize = 100;
const LIST_MAX_LIMIT: usize = 500;
const SEARCH_DEFAULT_LIMIT: usize = 20;
const SEARCH_MAX_LIMIT: usize = 50;
const SEARCH_MIN_QUERY_CHARS: usize = 2;

/// Query for GET /api/notes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    category: Option<String>,
    group: Option<String>,
    limit: Option<usize>,
}

/// Query for GET /api/notes/groups.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupsParams {
    category: Option<String>,
}

/// Query for GET /api/notes/search.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    q: Option<String>,
    limit: Option<usize>,
}

/// Response for GET /api/notes/{id}.
#[derive(Serialize)]
pub(crate) struct NoteResponse {
    id: String,
    title: String,
    content: String,
    category: String,
    group: Option<String>,
    path: String,
    links: Vec<String>,
    word_count: usize,
    /// Position in the group's tree, if the note is reachable from a root.
    navigation: Option<NavigationContext>,
}

/// Response for POST /api/notes/cache/invalidate.
#[derive(Serialize)]
pub(crate) struct InvalidateResponse {
    message: String,
}

/// Handle GET /api/notes.
pub(crate) async fn list_notes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<NoteSummary>>, ServerError> {
    let limit = check_limit(params.limit, LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT)?;
    let filter = NoteFilter {
        category: params.category,
        group: params.group,
        limit: Some(limit),
    };

    let notes = state.vault.list(&filter);
    Ok(Json(notes.iter().map(|n| NoteSummary::from(n.as_ref())).collect()))
}

/// Handle GET /api/notes/stats.
pub(crate) async fn get_stats(State(state): State<Arc<AppState>>) -> Json<NoteStats> {
    Json(state.vault.stats())
}

/// Handle GET /api/notes/categories.
pub(crate) async fn get_categories(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.vault.categories())
}

/// Handle GET /api/notes/groups.
pub(crate) async fn get_groups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupsParams>,
) -> Json<Vec<String>> {
    Json(state.vault.groups(params.category.as_deref()))
}

/// Handle GET /api/notes/structure.
pub(crate) async fn get_structure(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.vault.snapshot();
    Json(snapshot.structure()).into_response()
}

/// Handle GET /api/notes/tree/{group}.
pub(crate) async fn get_group_tree(
    State(state): State<Arc<AppState>>,
    Path(group): Path<String>,
) -> Result<Response, ServerError> {
    let snapshot = state.vault.snapshot();
    let tree = snapshot
        .group_tree(&group)
        .ok_or(ServerError::GroupNotFound(group))?;
    Ok(Json(tree).into_response())
}

/// Handle GET /api/notes/search.
pub(crate) async fn search_notes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<NoteSummary>>, ServerError> {
    let query = params.q.unwrap_or_default();
    if query.trim().chars().count() < SEARCH_MIN_QUERY_CHARS {
        return Err(ServerError::Validation(format!(
            "q must be at least {SEARCH_MIN_QUERY_CHARS} characters"
        )));
    }
    let limit = check_limit(params.limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT)?;

    let notes = state.vault.search(&query, limit);
    Ok(Json(notes.iter().map(|n| NoteSummary::from(n.as_ref())).collect()))
}

/// Handle GET /api/notes/{id}.
pub(crate) async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ServerError> {
    let snapshot = state.vault.snapshot();
    let note = snapshot
        .store()
        .get(&id)
        .ok_or_else(|| ServerError::NoteNotFound(id.clone()))?;

    Ok(Json(NoteResponse {
        id: note.id.clone(),
        title: note.title.clone(),
        content: note.content.clone(),
        category: note.category.clone(),
        group: note.group.clone(),
        path: note.path.clone(),
        links: note.links.clone(),
        word_count: note.word_count,
        navigation: snapshot.navigation_for(&id),
    }))
}

/// Handle POST /api/notes/cache/invalidate.
pub(crate) async fn invalidate_cache(State(state): State<Arc<AppState>>) -> Json<InvalidateResponse> {
    let count = state.vault.invalidate();
    Json(InvalidateResponse {
        message: format!("Cache invalidated, {count} entries cleared"),
    })
}
