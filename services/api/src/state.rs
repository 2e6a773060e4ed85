//! Application state shared across handlers
//!
//! Everything here is constructed once in `main` and injected; there is no
//! process-global connection handle.

use sqlx::PgPool;

use crate::auth::AuthGate;
use crate::media::MediaCodec;
use crate::repositories::{AdminRepository, PostRepository, WorkRepository};
use crate::token::TokenService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub admin_repository: AdminRepository,
    pub post_repository: PostRepository,
    pub work_repository: WorkRepository,
    pub token_service: TokenService,
    pub auth_gate: AuthGate<AdminRepository>,
    pub media_codec: MediaCodec,
}

impl AppState {
    pub fn new(pool: PgPool, token_service: TokenService, media_codec: MediaCodec) -> Self {
        let admin_repository = AdminRepository::new(pool.clone());
        let auth_gate = AuthGate::new(admin_repository.clone(), token_service.clone());

        Self {
            db_pool: pool.clone(),
            admin_repository,
            post_repository: PostRepository::new(pool.clone()),
            work_repository: WorkRepository::new(pool),
            token_service,
            auth_gate,
            media_codec,
        }
    }
}
