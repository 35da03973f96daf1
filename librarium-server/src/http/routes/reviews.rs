//! Review endpoints, nested under their book for list/create.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::Envelope;
use crate::db::repos::{Review, ReviewRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{ReviewDraft, ReviewPatch};

/// Create review request
#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: String,
    pub date_posted: DateTime<Utc>,
}

/// Update review request; absent fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub date_posted: Option<DateTime<Utc>>,
}

/// Review response
#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub book_id: i64,
    pub rating: i32,
    pub comment: String,
    pub date_posted: String,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            book_id: r.book_id,
            rating: r.rating,
            comment: r.comment,
            date_posted: r.date_posted.to_rfc3339(),
        }
    }
}

/// GET /books/{id}/reviews - 404 when the book does not exist
async fn list_reviews_for_book(
    State(state): State<Arc<AppState>>,
    ValidId(book_id): ValidId,
) -> Result<Json<Envelope<Vec<ReviewResponse>>>, ApiError> {
    let reviews = ReviewRepo::new(&state.pool).list_for_book(book_id).await?;

    Ok(Json(Envelope::data(
        reviews.into_iter().map(ReviewResponse::from).collect(),
    )))
}

/// POST /books/{id}/reviews
async fn create_review(
    State(state): State<Arc<AppState>>,
    ValidId(book_id): ValidId,
    ValidJson(req): ValidJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Envelope<ReviewResponse>>), ApiError> {
    let draft = ReviewDraft::new(req.rating, req.comment, req.date_posted)?;
    let review = ReviewRepo::new(&state.pool).create(book_id, draft).await?;

    Ok((StatusCode::CREATED, Json(Envelope::data(review.into()))))
}

/// PUT /reviews/{id}
async fn update_review(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UpdateReviewRequest>,
) -> Result<Json<Envelope<ReviewResponse>>, ApiError> {
    let patch = ReviewPatch {
        rating: req.rating,
        comment: req.comment,
        date_posted: req.date_posted,
    };
    // Range check up front so a bad rating never reaches the database
    patch.validated_rating()?;

    let review = ReviewRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(Envelope::data(review.into())))
}

/// DELETE /reviews/{id}
async fn delete_review(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<ReviewResponse>>, ApiError> {
    let review = ReviewRepo::new(&state.pool).delete(id).await?;
    Ok(Json(Envelope::data(review.into())))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/books/{id}/reviews",
            get(list_reviews_for_book).post(create_review),
        )
        .route("/reviews/{id}", delete(delete_review).put(update_review))
}
