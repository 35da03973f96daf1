//! Book endpoints
//!
//! List and get include the author in the response; the repository
//! loads it in the same query.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::authors::AuthorResponse;
use super::common::Envelope;
use crate::db::repos::{Book, BookRepo, BookWithAuthor};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{BookDraft, BookPatch, Pagination, PaginationParams};

/// Create book request
#[derive(Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub isbn: String,
    pub publication_year: i32,
    pub description: Option<String>,
    pub author_id: i64,
}

/// Update book request; absent fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub author_id: Option<i64>,
}

/// Book response; `author` is present wherever the repository
/// materialized it (list, get, create, update)
#[derive(Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub publication_year: i32,
    pub description: Option<String>,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
}

impl From<BookWithAuthor> for BookResponse {
    fn from(b: BookWithAuthor) -> Self {
        Self {
            id: b.book.id,
            title: b.book.title,
            isbn: b.book.isbn,
            publication_year: b.book.publication_year,
            description: b.book.description,
            author_id: b.book.author_id,
            author: Some(b.author.into()),
        }
    }
}

impl From<Book> for BookResponse {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            isbn: b.isbn,
            publication_year: b.publication_year,
            description: b.description,
            author_id: b.author_id,
            author: None,
        }
    }
}

/// GET /books - list books with their authors
async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Envelope<Vec<BookResponse>>>, ApiError> {
    let page = Pagination::from(params);
    let books = BookRepo::new(&state.pool).list(page).await?;

    Ok(Json(Envelope::paged(
        books.into_iter().map(BookResponse::from).collect(),
        page,
    )))
}

/// GET /books/{id}
async fn get_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<BookResponse>>, ApiError> {
    let book = BookRepo::new(&state.pool).get(id).await?;
    Ok(Json(Envelope::data(book.into())))
}

/// POST /books
async fn create_book(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<Envelope<BookResponse>>), ApiError> {
    let draft = BookDraft::new(
        req.title,
        req.isbn,
        req.publication_year,
        req.description,
        req.author_id,
    )?;
    let book = BookRepo::new(&state.pool).create(draft).await?;

    Ok((StatusCode::CREATED, Json(Envelope::data(book.into()))))
}

/// PUT /books/{id}
async fn update_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UpdateBookRequest>,
) -> Result<Json<Envelope<BookResponse>>, ApiError> {
    let patch = BookPatch {
        title: req.title,
        isbn: req.isbn,
        publication_year: req.publication_year,
        description: req.description,
        author_id: req.author_id,
    };
    patch.validate()?;

    let book = BookRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(Envelope::data(book.into())))
}

/// DELETE /books/{id} - cascades to the book's reviews
async fn delete_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<BookResponse>>, ApiError> {
    let book = BookRepo::new(&state.pool).delete(id).await?;
    Ok(Json(Envelope::data(book.into())))
}

/// Book routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
}
