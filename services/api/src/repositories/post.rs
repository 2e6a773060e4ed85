//! Post repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::MEDIA_META_SQL;
use crate::models::{MediaAsset, MediaAssetMeta, NewPost, Post, PostSummary};

/// Post repository
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all posts, newest first, with media payload bytes omitted
    pub async fn list(&self) -> DatabaseResult<Vec<PostSummary>> {
        let query = format!(
            "SELECT id, title, description, {MEDIA_META_SQL} AS media, created_at, updated_at \
             FROM posts ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.into_iter().map(|row| summary_from_row(&row)).collect())
    }

    /// Fetch a single post with its full media payloads
    pub async fn get(&self, id: Uuid) -> DatabaseResult<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, media, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(|row| post_from_row(&row)))
    }

    /// Insert a validated post
    pub async fn create(&self, new_post: &NewPost) -> DatabaseResult<Post> {
        let row = sqlx::query(
            r#"
            INSERT INTO posts (title, description, media)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, media, created_at, updated_at
            "#,
        )
        .bind(&new_post.title)
        .bind(&new_post.description)
        .bind(Json(&new_post.media))
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let post = post_from_row(&row);
        info!("Post created: {}", post.id);
        Ok(post)
    }

    /// Replace a post's fields, refreshing `updated_at`
    ///
    /// Last writer wins; there is no conflict detection between sessions.
    pub async fn update(&self, id: Uuid, new_post: &NewPost) -> DatabaseResult<Option<Post>> {
        let row = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, description = $3, media = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, media, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&new_post.title)
        .bind(&new_post.description)
        .bind(Json(&new_post.media))
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(|row| post_from_row(&row)))
    }

    /// Delete a post; returns whether a row existed
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        if result.rows_affected() > 0 {
            info!("Post deleted: {}", id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn post_from_row(row: &sqlx::postgres::PgRow) -> Post {
    let media: Json<Vec<MediaAsset>> = row.get("media");

    Post {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        media: media.0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn summary_from_row(row: &sqlx::postgres::PgRow) -> PostSummary {
    let media: Json<Vec<MediaAssetMeta>> = row.get("media");

    PostSummary {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        media: media.0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
