//! Input validation utilities
//!
//! All checks run before anything touches storage. Content fields follow the
//! site's document shape: trimmed required title/description with length
//! bounds, and at most five media entries per item.

use regex::Regex;
use std::sync::OnceLock;

use crate::media::MediaCodec;
use crate::models::MediaAsset;

/// Maximum number of media files per content item
pub const MAX_MEDIA_ITEMS: usize = 5;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Passwords nobody should be allowed to bootstrap with
const FORBIDDEN_PASSWORDS: &[&str] = &["password", "password1", "admin123", "12345678"];

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 50 {
        return Err("Username must be at most 50 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        return Err(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        );
    }

    Ok(())
}

/// Validate a bootstrap password
///
/// The site used to ship with a fixed default; well-known weak values are
/// refused outright.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if FORBIDDEN_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        return Err("Password is too common, choose another".to_string());
    }

    Ok(())
}

/// Validate and trim a content title
pub fn validate_title(title: Option<&str>) -> Result<String, String> {
    let title = title.unwrap_or("").trim();

    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(format!("Title cannot exceed {} characters", MAX_TITLE_CHARS));
    }

    Ok(title.to_string())
}

/// Validate and trim a content description
pub fn validate_description(description: Option<&str>) -> Result<String, String> {
    let description = description.unwrap_or("").trim();

    if description.is_empty() {
        return Err("Description is required".to_string());
    }

    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_CHARS
        ));
    }

    Ok(description.to_string())
}

/// Validate a content item's media list against the codec policy
pub fn validate_media(media: &[MediaAsset], codec: &MediaCodec) -> Result<(), String> {
    if media.len() > MAX_MEDIA_ITEMS {
        return Err(format!(
            "Cannot have more than {} media files",
            MAX_MEDIA_ITEMS
        ));
    }

    for asset in media {
        if asset.data.is_empty() || asset.filename.is_empty() {
            return Err("Invalid media format".to_string());
        }

        codec.validate_asset(asset).map_err(|e| e.to_string())?;
    }

    Ok(())
}
