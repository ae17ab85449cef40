//! Community post (동네생활) model.

use serde::Serialize;

use super::RegionTriple;

/// A neighborhood community post. Posts are write-once: no edit or delete.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Author username
    pub user: String,
    #[serde(flatten)]
    pub region: RegionTriple,
    pub image_url: Option<String>,
}
