//! Business review model.

use serde::Serialize;

/// A review left on a business listing. Reviews are never edited; they are
/// removed only when their business is deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub business_id: i64,
    pub username: String,
    pub rating: i32,
    pub comment: String,
}
