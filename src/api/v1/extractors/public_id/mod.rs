/*!
 * Public id extractor
 *
 * Responsibility:
 * - receive the path segment as a public id and decode it to the internal id
 * - decode failures become 400 (the id never reaches a handler malformed)
 *
 * Public API:
 * - PublicId<T>
 * - PublicProductId
 */

mod core;
mod types;

pub use core::PublicId;
pub use types::PublicProductId;
