//! Author endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::Envelope;
use crate::db::repos::{Author, AuthorRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{AuthorDraft, AuthorPatch, Pagination, PaginationParams};

/// Create author request
#[derive(Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: NaiveDate,
}

/// Update author request; absent fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateAuthorRequest {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Author response
#[derive(Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: NaiveDate,
}

impl From<Author> for AuthorResponse {
    fn from(a: Author) -> Self {
        Self {
            id: a.id,
            name: a.name,
            biography: a.biography,
            birth_date: a.birth_date,
        }
    }
}

/// GET /authors - list authors with pagination
async fn list_authors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Envelope<Vec<AuthorResponse>>>, ApiError> {
    let page = Pagination::from(params);
    let authors = AuthorRepo::new(&state.pool).list(page).await?;

    Ok(Json(Envelope::paged(
        authors.into_iter().map(AuthorResponse::from).collect(),
        page,
    )))
}

/// GET /authors/{id}
async fn get_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<AuthorResponse>>, ApiError> {
    let author = AuthorRepo::new(&state.pool).get(id).await?;
    Ok(Json(Envelope::data(author.into())))
}

/// POST /authors
async fn create_author(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthorResponse>>), ApiError> {
    let draft = AuthorDraft::new(req.name, req.biography, req.birth_date)?;
    let author = AuthorRepo::new(&state.pool).create(draft).await?;

    Ok((StatusCode::CREATED, Json(Envelope::data(author.into()))))
}

/// PUT /authors/{id}
async fn update_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UpdateAuthorRequest>,
) -> Result<Json<Envelope<AuthorResponse>>, ApiError> {
    let patch = AuthorPatch {
        name: req.name,
        biography: req.biography,
        birth_date: req.birth_date,
    };
    patch.validate()?;

    let author = AuthorRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(Envelope::data(author.into())))
}

/// DELETE /authors/{id} - cascades to the author's books and reviews
async fn delete_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<AuthorResponse>>, ApiError> {
    let author = AuthorRepo::new(&state.pool).delete(id).await?;
    Ok(Json(Envelope::data(author.into())))
}

/// Author routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
}
