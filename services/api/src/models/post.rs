//! Post model and request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::media::{MediaAsset, MediaAssetMeta};

/// Post entity with full media payloads, returned by single-item fetches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub media: Vec<MediaAsset>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post with media payload bytes omitted, returned by list endpoints and
/// mutation responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub media: Vec<MediaAssetMeta>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            media: post.media.into_iter().map(MediaAssetMeta::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Validated post fields, ready for persistence
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub media: Vec<MediaAsset>,
}

/// Incoming create/update body for a post
///
/// Fields are optional so that missing values surface as validation errors
/// with a useful message rather than body-parse rejections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub media: Option<Vec<MediaAsset>>,
}
