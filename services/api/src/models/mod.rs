//! Data models for the content service

pub mod admin;
pub mod media;
pub mod post;
pub mod work;

pub use admin::{Admin, AdminPublic, hash_password};
pub use media::{MediaAsset, MediaAssetMeta};
pub use post::{NewPost, Post, PostPayload, PostSummary};
pub use work::{NewWork, Work, WorkCategory, WorkPayload, WorkStatus, WorkSummary};
