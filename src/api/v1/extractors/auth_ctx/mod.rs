/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - provide handlers with the authenticated request context (AuthCtx)
 * - HTTP / axum specifics stay in core; the type definition lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
