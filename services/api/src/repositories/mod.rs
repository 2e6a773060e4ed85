//! Repositories for database operations
//!
//! Every query function returns explicit typed DTOs; nothing downstream
//! relies on implicit row shapes.

pub mod admin;
pub mod post;
pub mod work;

pub use admin::AdminRepository;
pub use post::PostRepository;
pub use work::WorkRepository;

/// SQL fragment producing the media list with payload bytes stripped.
///
/// List views keep the metadata of each entry but drop the base64 `data`
/// key, so listing stays cheap regardless of how large the blobs are.
pub(crate) const MEDIA_META_SQL: &str = "COALESCE((SELECT jsonb_agg(elem - 'data' ORDER BY ord) \
     FROM jsonb_array_elements(media) WITH ORDINALITY AS m(elem, ord)), '[]'::jsonb)";
