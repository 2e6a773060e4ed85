//! Embedded media models
//!
//! Media files live inside their owning content item as base64 payloads plus
//! metadata. List endpoints return [`MediaAssetMeta`], the same entry with
//! the payload bytes stripped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A media file embedded in a content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    /// Base64-encoded file contents
    pub data: String,
    /// Server-generated unique filename
    pub filename: String,
    /// Filename as uploaded by the client
    pub original_name: String,
    pub mime_type: String,
    /// Size of the original file in bytes
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Media metadata without the encoded payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaAssetMeta {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<MediaAsset> for MediaAssetMeta {
    fn from(asset: MediaAsset) -> Self {
        Self {
            filename: asset.filename,
            original_name: asset.original_name,
            mime_type: asset.mime_type,
            size: asset.size,
            uploaded_at: asset.uploaded_at,
        }
    }
}
