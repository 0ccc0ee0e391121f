/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - db: PgPool, id_codec: IdCodec, auth: AuthService, media: MediaStore
 * - Held by Clone (internals are Arc / cheap to clone)
 */
use std::sync::Arc;

use crate::services::{auth::AuthService, id_codec::IdCodec, media::MediaStore};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub id_codec: IdCodec,
    pub auth: Arc<AuthService>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        id_codec: IdCodec,
        auth: Arc<AuthService>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            db,
            id_codec,
            auth,
            media,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // media is a trait object; skip it rather than requiring Debug from impls
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("id_codec", &self.id_codec)
            .field("auth", &self.auth)
            .finish()
    }
}
