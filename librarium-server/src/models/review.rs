//! Review payload validation
//!
//! The rating bound lives in the `Rating` newtype so an out-of-range
//! value cannot reach a repository at all.

use chrono::{DateTime, Utc};

use super::ValidationError;

/// Inclusive rating bounds
const RATING_MIN: i32 = 1;
const RATING_MAX: i32 = 5;

/// Star rating, always within [1,5]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                min: RATING_MIN as i64,
                max: RATING_MAX as i64,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Validated payload for creating a review
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub rating: Rating,
    pub comment: String,
    pub date_posted: DateTime<Utc>,
}

impl ReviewDraft {
    pub fn new(
        rating: i32,
        comment: String,
        date_posted: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let rating = Rating::new(rating)?;
        if comment.trim().is_empty() {
            return Err(ValidationError::Empty { field: "comment" });
        }
        Ok(Self {
            rating,
            comment,
            date_posted,
        })
    }
}

/// Partial update for a review
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub date_posted: Option<DateTime<Utc>>,
}

impl ReviewPatch {
    /// Validate present fields, returning the checked rating if any.
    pub fn validated_rating(&self) -> Result<Option<Rating>, ValidationError> {
        if let Some(comment) = &self.comment {
            if comment.trim().is_empty() {
                return Err(ValidationError::Empty { field: "comment" });
            }
        }
        self.rating.map(Rating::new).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(1).unwrap().value(), 1);
        assert_eq!(Rating::new(5).unwrap().value(), 5);
    }

    #[test]
    fn draft_requires_comment() {
        let err = ReviewDraft::new(4, "  ".into(), Utc::now()).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "comment" }));
    }

    #[test]
    fn draft_rejects_out_of_range_rating_first() {
        let err = ReviewDraft::new(9, "great".into(), Utc::now()).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn patch_rating_is_checked_when_present() {
        let patch = ReviewPatch {
            rating: Some(6),
            ..Default::default()
        };
        assert!(patch.validated_rating().is_err());

        let patch = ReviewPatch {
            rating: Some(3),
            ..Default::default()
        };
        assert_eq!(patch.validated_rating().unwrap().unwrap().value(), 3);

        let patch = ReviewPatch::default();
        assert!(patch.validated_rating().unwrap().is_none());
    }
}
