/*
 * Responsibility
 * - process-level services shared through AppState
 */
pub mod auth;
pub mod id_codec;
pub mod media;
