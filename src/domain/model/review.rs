use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const MIN_GRADE: i32 = 1;
pub const MAX_GRADE: i32 = 5;

/// A product review. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub author: String,
    pub product_id: Uuid,
    pub content: String,
    pub grade: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Review submission payload.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub author: String,
    pub product_id: Uuid,
    pub content: String,
    pub grade: Option<i32>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), String> {
        if self.author.trim().is_empty() {
            return Err("Review author cannot be empty".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Review content cannot be empty".to_string());
        }
        if let Some(grade) = self.grade {
            if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
                return Err(format!(
                    "Grade must be between {} and {}",
                    MIN_GRADE, MAX_GRADE
                ));
            }
        }
        Ok(())
    }

    pub fn into_review(self, id: Uuid, created_at: DateTime<Utc>) -> Review {
        Review {
            id,
            author: self.author,
            product_id: self.product_id,
            content: self.content,
            grade: self.grade,
            created_at,
        }
    }
}
