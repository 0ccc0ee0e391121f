/*
 * Responsibility
 * - store access modules (free functions over &PgPool)
 */
pub mod error;
pub mod product_repo;
