//! Custom Axum extractors
//!
//! These exist so parse failures surface as the standard `{"error"}`
//! envelope with a 400 rather than the framework's default rejection.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// Path id that parsed to a positive integer
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i64> = Path::from_request_parts(parts, state).await.map_err(|_| {
            ApiError::Validation(ValidationError::Malformed {
                reason: "id must be a positive integer".into(),
            })
        })?;

        if id < 1 {
            return Err(ApiError::Validation(ValidationError::Malformed {
                reason: "id must be a positive integer".into(),
            }));
        }

        Ok(Self(id))
    }
}

/// JSON body whose deserialization failure is a 400 validation error
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(ValidationError::Malformed {
                reason: rejection.body_text(),
            })),
        }
    }
}
