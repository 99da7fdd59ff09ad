//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::community::screens::{search_community, SearchCategory, TransferFilter};
use crate::community::{
    CreateEventRequest, CreatePostRequest, CreateTransferRequest, Event, Post, SearchHit,
    Transfer, User,
};
use crate::error::Error;
use crate::server::state::AppState;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/posts", get(posts_handler).post(create_post_handler))
        .route("/api/posts/:id/like", post(like_handler))
        .route("/api/events", get(events_handler).post(create_event_handler))
        .route("/api/events/:id/join", post(join_handler))
        .route(
            "/api/transfers",
            get(transfers_handler).post(create_transfer_handler),
        )
        .route("/api/search", get(search_handler))
        .route("/api/profile", get(profile_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn failure(status: StatusCode, code: &str, error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

fn from_error(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    match &err {
        Error::Validation(_) => failure(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
        Error::NotFound(_) => failure(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        _ => {
            tracing::error!(error = %err, "request failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", err.to_string())
        }
    }
}

fn from_rejection(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    failure(StatusCode::BAD_REQUEST, "INVALID_BODY", rejection.body_text())
}

/// GET /api/posts
async fn posts_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    Json(state.repo.posts())
}

/// POST /api/posts
async fn create_post_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let Json(req) = payload.map_err(from_rejection)?;
    let new_post = req.validate().map_err(from_error)?;
    let post = state.repo.create_post(new_post).map_err(from_error)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Toggle the like flag on a post
///
/// POST /api/posts/:id/like
async fn like_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Post>> {
    state
        .repo
        .toggle_post_like(&id)
        .map(Json)
        .map_err(from_error)
}

/// GET /api/events
async fn events_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Event>> {
    Json(state.repo.events())
}

/// POST /api/events
async fn create_event_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let Json(req) = payload.map_err(from_rejection)?;
    let new_event = req.validate().map_err(from_error)?;
    let event = state.repo.create_event(new_event).map_err(from_error)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Join or leave an event
///
/// POST /api/events/:id/join
async fn join_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    state
        .repo
        .toggle_event_join(&id)
        .map(Json)
        .map_err(from_error)
}

#[derive(Debug, Deserialize)]
pub struct TransferQuery {
    #[serde(default)]
    pub kind: Option<String>,
}

/// GET /api/transfers?kind=
async fn transfers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransferQuery>,
) -> ApiResult<Json<Vec<Transfer>>> {
    let filter = match query.kind.as_deref() {
        Some(kind) => TransferFilter::from_str(kind)
            .map_err(|e| failure(StatusCode::BAD_REQUEST, "INVALID_QUERY", e))?,
        None => TransferFilter::All,
    };

    let transfers = state
        .repo
        .transfers()
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();
    Ok(Json(transfers))
}

/// POST /api/transfers
async fn create_transfer_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTransferRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transfer>)> {
    let Json(req) = payload.map_err(from_rejection)?;
    let new_transfer = req.validate().map_err(from_error)?;
    let transfer = state.repo.create_transfer(new_transfer).map_err(from_error)?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/search?q=&category=
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<SearchHit>>> {
    let category = match query.category.as_deref() {
        Some(category) => SearchCategory::from_str(category)
            .map_err(|e| failure(StatusCode::BAD_REQUEST, "INVALID_QUERY", e))?,
        None => SearchCategory::All,
    };

    Ok(Json(search_community(
        state.repo.as_ref(),
        &query.q,
        category,
    )))
}

/// Profile response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
    /// Posts written by the user, newest first
    pub posts: Vec<Post>,
}

/// GET /api/profile
async fn profile_handler(State(state): State<Arc<AppState>>) -> Json<ProfileResponse> {
    let user = state.repo.current_user();
    let posts = state
        .repo
        .posts()
        .into_iter()
        .filter(|p| p.user.id == user.id)
        .collect();
    Json(ProfileResponse { user, posts })
}
