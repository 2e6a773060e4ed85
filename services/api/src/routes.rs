//! HTTP routes and handlers
//!
//! Reads are public. Every mutating content handler and the upload handler
//! starts by calling [`authorize`]; nothing else may write.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthFailure, authorize, bootstrap_admin};
use crate::error::{ApiError, ApiResult};
use crate::media::MediaCodec;
use crate::models::{
    AdminPublic, MediaAsset, NewPost, NewWork, PostPayload, PostSummary, WorkPayload, WorkStatus,
    WorkSummary,
};
use crate::state::AppState;
use crate::validation;

/// Generous enough for five 10 MiB files arriving base64-encoded
const MAX_BODY_BYTES: usize = 80 * 1024 * 1024;

/// Request for admin login
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response for a successful login
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for the one-time bootstrap
#[derive(Deserialize)]
pub struct SetupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Create the router for the content service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/setup", post(setup))
        .route("/upload", post(upload_media))
        .route("/content/posts", get(list_posts).post(create_post))
        .route(
            "/content/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/content/works", get(list_works).post(create_work))
        .route(
            "/content/works/:id",
            get(get_work).put(update_work).delete(delete_work),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool).await.is_ok();
    let status = if database { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "newars-api",
        "database": database,
    }))
}

/// Admin login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthFailure> {
    let session = state
        .auth_gate
        .authenticate(&payload.username, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
    }))
}

/// One-time bootstrap: create the first admin account
///
/// Refuses once any admin exists. Credentials are caller-supplied and
/// validated; there is no built-in default.
pub async fn setup(
    State(state): State<AppState>,
    Json(payload): Json<SetupRequest>,
) -> ApiResult<impl IntoResponse> {
    let admin =
        bootstrap_admin(&state.admin_repository, &payload.username, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(AdminPublic::from(admin))))
}

/// Encode uploaded files into embeddable media assets
pub async fn upload_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;

    let mut assets: Vec<MediaAsset> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }

        if assets.len() >= validation::MAX_MEDIA_ITEMS {
            return Err(ApiError::Validation(format!(
                "Cannot upload more than {} media files",
                validation::MAX_MEDIA_ITEMS
            )));
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .ok_or_else(|| ApiError::Validation("Missing file content type".to_string()))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

        let asset = state
            .media_codec
            .encode(&bytes, &mime_type, &original_name)?;
        assets.push(asset);
    }

    if assets.is_empty() {
        return Err(ApiError::Validation("No files uploaded".to_string()));
    }

    info!("{} uploaded {} media file(s)", user.username, assets.len());

    Ok(Json(json!({
        "files": assets,
        "message": format!("{} file(s) uploaded successfully", assets.len()),
    })))
}

// Posts

/// List posts, newest first, without media payload bytes
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let posts = state.post_repository.list().await?;
    Ok(Json(posts))
}

/// Fetch a single post with full media
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let post = state
        .post_repository
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(post))
}

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PostPayload>,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;
    let new_post = validate_post_payload(payload, &state.media_codec)?;

    let post = state.post_repository.create(&new_post).await?;
    info!("{} created post {}", user.username, post.id);

    Ok((StatusCode::CREATED, Json(PostSummary::from(post))))
}

/// Update a post
pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostPayload>,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;
    let new_post = validate_post_payload(payload, &state.media_codec)?;

    let post = state
        .post_repository
        .update(id, &new_post)
        .await?
        .ok_or(ApiError::NotFound("Post"))?;
    info!("{} updated post {}", user.username, post.id);

    Ok(Json(PostSummary::from(post)))
}

/// Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;

    if !state.post_repository.delete(id).await? {
        return Err(ApiError::NotFound("Post"));
    }
    info!("{} deleted post {}", user.username, id);

    Ok(Json(json!({"message": "Post deleted successfully"})))
}

// Works

/// List works, newest first, without media payload bytes
pub async fn list_works(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let works = state.work_repository.list().await?;
    Ok(Json(works))
}

/// Fetch a single work with full media
pub async fn get_work(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let work = state
        .work_repository
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Work"))?;

    Ok(Json(work))
}

/// Create a work
pub async fn create_work(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WorkPayload>,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;
    let new_work = validate_work_payload(payload, &state.media_codec)?;

    let work = state.work_repository.create(&new_work).await?;
    info!("{} created work {}", user.username, work.id);

    Ok((StatusCode::CREATED, Json(WorkSummary::from(work))))
}

/// Update a work
pub async fn update_work(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkPayload>,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;
    let new_work = validate_work_payload(payload, &state.media_codec)?;

    let work = state
        .work_repository
        .update(id, &new_work)
        .await?
        .ok_or(ApiError::NotFound("Work"))?;
    info!("{} updated work {}", user.username, work.id);

    Ok(Json(WorkSummary::from(work)))
}

/// Delete a work
pub async fn delete_work(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = authorize(&state.token_service, &headers)?;

    if !state.work_repository.delete(id).await? {
        return Err(ApiError::NotFound("Work"));
    }
    info!("{} deleted work {}", user.username, id);

    Ok(Json(json!({"message": "Work deleted successfully"})))
}

fn validate_post_payload(payload: PostPayload, codec: &MediaCodec) -> ApiResult<NewPost> {
    let title = validation::validate_title(payload.title.as_deref()).map_err(ApiError::Validation)?;
    let description = validation::validate_description(payload.description.as_deref())
        .map_err(ApiError::Validation)?;
    let media = payload.media.unwrap_or_default();
    validation::validate_media(&media, codec).map_err(ApiError::Validation)?;

    Ok(NewPost {
        title,
        description,
        media,
    })
}

fn validate_work_payload(payload: WorkPayload, codec: &MediaCodec) -> ApiResult<NewWork> {
    let title = validation::validate_title(payload.title.as_deref()).map_err(ApiError::Validation)?;
    let description = validation::validate_description(payload.description.as_deref())
        .map_err(ApiError::Validation)?;

    let category = payload
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Category is required".to_string()))?
        .parse()
        .map_err(ApiError::Validation)?;

    let status = match payload.status.as_deref() {
        Some(s) => s.parse().map_err(ApiError::Validation)?,
        None => WorkStatus::default(),
    };

    let completed_date = payload
        .completed_date
        .ok_or_else(|| ApiError::Validation("Completed date is required".to_string()))?;

    let media = payload.media.unwrap_or_default();
    validation::validate_media(&media, codec).map_err(ApiError::Validation)?;

    Ok(NewWork {
        title,
        description,
        category,
        status,
        completed_date,
        media,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaAsset;
    use chrono::Utc;

    fn codec() -> MediaCodec {
        MediaCodec::default()
    }

    fn png_asset() -> MediaAsset {
        codec().encode(b"pixels", "image/png", "photo.png").unwrap()
    }

    #[test]
    fn post_payload_with_an_oversized_title_is_a_validation_error() {
        let payload = PostPayload {
            title: Some("x".repeat(201)),
            description: Some("A description".to_string()),
            media: None,
        };

        assert!(matches!(
            validate_post_payload(payload, &codec()),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn post_payload_with_six_media_entries_is_a_validation_error() {
        let payload = PostPayload {
            title: Some("Gallery".to_string()),
            description: Some("Photos from the festival".to_string()),
            media: Some(vec![png_asset(); 6]),
        };

        assert!(matches!(
            validate_post_payload(payload, &codec()),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn post_payload_is_trimmed_on_the_way_through() {
        let payload = PostPayload {
            title: Some("  Indra Jatra  ".to_string()),
            description: Some("  The festival of Indra  ".to_string()),
            media: Some(vec![png_asset()]),
        };

        let new_post = validate_post_payload(payload, &codec()).unwrap();
        assert_eq!(new_post.title, "Indra Jatra");
        assert_eq!(new_post.description, "The festival of Indra");
        assert_eq!(new_post.media.len(), 1);
    }

    #[test]
    fn work_payload_without_a_category_is_a_validation_error() {
        let payload = WorkPayload {
            title: Some("Language classes".to_string()),
            description: Some("Weekly Nepal Bhasa classes".to_string()),
            category: None,
            status: None,
            completed_date: Some(Utc::now()),
            media: None,
        };

        assert!(matches!(
            validate_work_payload(payload, &codec()),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn work_payload_with_an_unknown_category_is_a_validation_error() {
        let payload = WorkPayload {
            title: Some("Language classes".to_string()),
            description: Some("Weekly Nepal Bhasa classes".to_string()),
            category: Some("Basket Weaving".to_string()),
            status: None,
            completed_date: Some(Utc::now()),
            media: None,
        };

        assert!(matches!(
            validate_work_payload(payload, &codec()),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn work_payload_without_a_completed_date_is_a_validation_error() {
        let payload = WorkPayload {
            title: Some("Language classes".to_string()),
            description: Some("Weekly Nepal Bhasa classes".to_string()),
            category: Some("Educational Programs".to_string()),
            status: None,
            completed_date: None,
            media: None,
        };

        assert!(matches!(
            validate_work_payload(payload, &codec()),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn work_status_defaults_to_completed_when_omitted() {
        let payload = WorkPayload {
            title: Some("Archive digitization".to_string()),
            description: Some("Scanning community records".to_string()),
            category: Some("Documentation".to_string()),
            status: None,
            completed_date: Some(Utc::now()),
            media: None,
        };

        let new_work = validate_work_payload(payload, &codec()).unwrap();
        assert_eq!(new_work.status, WorkStatus::Completed);
    }

    #[test]
    fn work_status_string_is_parsed() {
        let payload = WorkPayload {
            title: Some("Community kitchen".to_string()),
            description: Some("Ongoing weekly service".to_string()),
            category: Some("Community Service".to_string()),
            status: Some("ongoing".to_string()),
            completed_date: Some(Utc::now()),
            media: None,
        };

        let new_work = validate_work_payload(payload, &codec()).unwrap();
        assert_eq!(new_work.status, WorkStatus::Ongoing);
    }
}
