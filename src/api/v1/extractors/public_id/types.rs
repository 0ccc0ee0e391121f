/*
 * Responsibility
 * - per-resource tagged id aliases
 */
use super::core::PublicId;

// products
pub enum ProductTag {}
pub type PublicProductId = PublicId<ProductTag>;
