//! Media codec
//!
//! Uploaded files are carried inside their content item as base64 text plus
//! metadata. The codec owns the type/size policy: only the fixed image and
//! video allow-list is accepted, and each file is capped at a configured
//! maximum (10 MiB by default).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;

use crate::models::MediaAsset;

/// Accepted media content types
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    // Videos
    "video/mp4",
    "video/avi",
    "video/mov",
    "video/wmv",
    "video/webm",
    "video/quicktime",
];

const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Why a media payload was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("File exceeds the {max} byte limit ({size} bytes)")]
    TooLarge { size: usize, max: usize },
    #[error("Declared size {declared} does not match payload size {actual}")]
    SizeMismatch { declared: i64, actual: usize },
}

/// Encodes uploads into embeddable assets and decodes them back into
/// renderable data URIs
#[derive(Debug, Clone)]
pub struct MediaCodec {
    max_file_bytes: usize,
}

impl Default for MediaCodec {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl MediaCodec {
    /// Create a codec honoring the `MEDIA_MAX_FILE_BYTES` override
    pub fn from_env() -> Self {
        let max_file_bytes = std::env::var("MEDIA_MAX_FILE_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_FILE_BYTES);

        Self { max_file_bytes }
    }

    /// Encode raw upload bytes into an embeddable asset
    pub fn encode(
        &self,
        bytes: &[u8],
        mime_type: &str,
        original_name: &str,
    ) -> Result<MediaAsset, MediaError> {
        if !ALLOWED_MIME_TYPES.contains(&mime_type) {
            return Err(MediaError::UnsupportedType(mime_type.to_string()));
        }

        if bytes.len() > self.max_file_bytes {
            return Err(MediaError::TooLarge {
                size: bytes.len(),
                max: self.max_file_bytes,
            });
        }

        Ok(MediaAsset {
            data: BASE64.encode(bytes),
            filename: generate_unique_filename(original_name),
            original_name: original_name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as i64,
            uploaded_at: Utc::now(),
        })
    }

    /// Reconstruct an inline data URI from a stored payload
    ///
    /// Malformed base64 and unsupported types are both refused as
    /// `UnsupportedType`; there is nothing else that can go wrong here.
    pub fn decode(&self, data: &str, mime_type: &str) -> Result<String, MediaError> {
        if !ALLOWED_MIME_TYPES.contains(&mime_type) {
            return Err(MediaError::UnsupportedType(mime_type.to_string()));
        }

        BASE64
            .decode(data)
            .map_err(|_| MediaError::UnsupportedType(mime_type.to_string()))?;

        Ok(format!("data:{};base64,{}", mime_type, data))
    }

    /// Check an asset submitted inside a content body against the policy
    pub fn validate_asset(&self, asset: &MediaAsset) -> Result<(), MediaError> {
        if !ALLOWED_MIME_TYPES.contains(&asset.mime_type.as_str()) {
            return Err(MediaError::UnsupportedType(asset.mime_type.clone()));
        }

        let decoded = BASE64
            .decode(&asset.data)
            .map_err(|_| MediaError::UnsupportedType(asset.mime_type.clone()))?;

        if decoded.len() > self.max_file_bytes {
            return Err(MediaError::TooLarge {
                size: decoded.len(),
                max: self.max_file_bytes,
            });
        }

        // The declared size is client-supplied; trust the payload instead
        if asset.size != decoded.len() as i64 {
            return Err(MediaError::SizeMismatch {
                declared: asset.size,
                actual: decoded.len(),
            });
        }

        Ok(())
    }
}

/// Generate a collision-resistant filename, keeping the original extension
fn generate_unique_filename(original_name: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(13)
        .map(char::from)
        .collect();
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("bin");

    format!("{}-{}.{}", timestamp, token, extension)
}
