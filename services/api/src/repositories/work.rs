//! Work repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::MEDIA_META_SQL;
use crate::models::{
    MediaAsset, MediaAssetMeta, NewWork, Work, WorkCategory, WorkStatus, WorkSummary,
};

/// Work repository
#[derive(Clone)]
pub struct WorkRepository {
    pool: PgPool,
}

impl WorkRepository {
    /// Create a new work repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all works, newest first, with media payload bytes omitted
    pub async fn list(&self) -> DatabaseResult<Vec<WorkSummary>> {
        let query = format!(
            "SELECT id, title, description, category, status, completed_date, \
             {MEDIA_META_SQL} AS media, created_at, updated_at \
             FROM works ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.into_iter().map(|row| summary_from_row(&row)).collect())
    }

    /// Fetch a single work with its full media payloads
    pub async fn get(&self, id: Uuid) -> DatabaseResult<Option<Work>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, category, status, completed_date,
                   media, created_at, updated_at
            FROM works
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(|row| work_from_row(&row)))
    }

    /// Insert a validated work
    pub async fn create(&self, new_work: &NewWork) -> DatabaseResult<Work> {
        let row = sqlx::query(
            r#"
            INSERT INTO works (title, description, category, status, completed_date, media)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, category, status, completed_date,
                      media, created_at, updated_at
            "#,
        )
        .bind(&new_work.title)
        .bind(&new_work.description)
        .bind(new_work.category.as_str())
        .bind(new_work.status.as_str())
        .bind(new_work.completed_date)
        .bind(Json(&new_work.media))
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let work = work_from_row(&row);
        info!("Work created: {}", work.id);
        Ok(work)
    }

    /// Replace a work's fields, refreshing `updated_at`
    ///
    /// Last writer wins; there is no conflict detection between sessions.
    pub async fn update(&self, id: Uuid, new_work: &NewWork) -> DatabaseResult<Option<Work>> {
        let row = sqlx::query(
            r#"
            UPDATE works
            SET title = $2, description = $3, category = $4, status = $5,
                completed_date = $6, media = $7, updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, category, status, completed_date,
                      media, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&new_work.title)
        .bind(&new_work.description)
        .bind(new_work.category.as_str())
        .bind(new_work.status.as_str())
        .bind(new_work.completed_date)
        .bind(Json(&new_work.media))
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(|row| work_from_row(&row)))
    }

    /// Delete a work; returns whether a row existed
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM works WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        if result.rows_affected() > 0 {
            info!("Work deleted: {}", id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Stored category/status strings predate the enum validation; unrecognized
/// values degrade to `Other` / `completed` the way the site always rendered
/// them.
fn category_column(row: &sqlx::postgres::PgRow) -> WorkCategory {
    row.get::<String, _>("category")
        .parse()
        .unwrap_or(WorkCategory::Other)
}

fn status_column(row: &sqlx::postgres::PgRow) -> WorkStatus {
    row.get::<String, _>("status").parse().unwrap_or_default()
}

fn work_from_row(row: &sqlx::postgres::PgRow) -> Work {
    let media: Json<Vec<MediaAsset>> = row.get("media");

    Work {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: category_column(row),
        status: status_column(row),
        completed_date: row.get("completed_date"),
        media: media.0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn summary_from_row(row: &sqlx::postgres::PgRow) -> WorkSummary {
    let media: Json<Vec<MediaAssetMeta>> = row.get("media");

    WorkSummary {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: category_column(row),
        status: status_column(row),
        completed_date: row.get("completed_date"),
        media: media.0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
