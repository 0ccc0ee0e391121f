/*
 * Responsibility
 * - products CRUD with document-store semantics
 * - open caller-supplied fields live in the JSONB `attrs` column; typed
 *   columns carry the fields with their own transition rules
 * - every read resolves the owner (join against users) in the same statement
 * - merge/approve/set_views are single statements, so each is atomic at the
 *   document level
 */
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

/// A product row with its owner's public fields resolved.
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithOwnerRow {
    #[sqlx(rename = "productId")]
    pub product_id: i64,

    pub images: Vec<String>,
    pub approved: bool,
    pub views: i64,

    /// Open attribute document, merged verbatim from request bodies.
    pub attrs: Value,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,

    #[sqlx(rename = "ownerId")]
    pub owner_id: Uuid,
    #[sqlx(rename = "ownerName")]
    pub owner_name: String,
    #[sqlx(rename = "ownerImageUrl")]
    pub owner_image_url: Option<String>,
}

// Shared projection: product columns + resolved owner public fields.
const PRODUCT_WITH_OWNER: &str = r#"
    p."productId", p.images, p.approved, p.views, p.attrs,
    p."createdAt", p."updatedAt",
    u."userId" AS "ownerId", u."userName" AS "ownerName", u."imageUrl" AS "ownerImageUrl"
"#;

/// List products matching an opaque filter document, most-viewed first.
///
/// The filter is matched by containment against the product document with its
/// typed columns and open attrs flattened into one object, so `approved`,
/// `views` and arbitrary attr keys all participate. `{}` matches everything.
pub async fn find(db: &PgPool, filter: &Value) -> Result<Vec<ProductWithOwnerRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductWithOwnerRow>(&format!(
        r#"
        SELECT {PRODUCT_WITH_OWNER}
        FROM products p
        JOIN users u ON u."userId" = p."ownerId"
        WHERE ((to_jsonb(p) - 'attrs') || p.attrs) @> $1
        ORDER BY p.views DESC
        "#
    ))
    .bind(filter)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn find_by_id(
    db: &PgPool,
    product_id: i64,
) -> Result<Option<ProductWithOwnerRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductWithOwnerRow>(&format!(
        r#"
        SELECT {PRODUCT_WITH_OWNER}
        FROM products p
        JOIN users u ON u."userId" = p."ownerId"
        WHERE p."productId" = $1
        "#
    ))
    .bind(product_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Insert a new product; returns the store-assigned id.
///
/// Callers wanting the owner-resolved document re-read via `find_by_id` —
/// a second, non-atomic store operation by design.
pub async fn create(
    db: &PgPool,
    owner_id: Uuid,
    images: &[String],
    attrs: &Value,
) -> Result<i64, RepoError> {
    let product_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO products ("ownerId", images, attrs)
        VALUES ($1, $2, $3)
        RETURNING "productId"
        "#,
    )
    .bind(owner_id)
    .bind(images.to_vec())
    .bind(attrs)
    .fetch_one(db)
    .await?;

    Ok(product_id)
}

/// Shallow merge of caller-supplied fields into the document.
///
/// - `images`: replaced wholesale when supplied
/// - `attrs`: per-key replacement (`||`), absent keys untouched
pub async fn update(
    db: &PgPool,
    product_id: i64,
    images: Option<Vec<String>>,
    attrs: &Value,
) -> Result<Option<ProductWithOwnerRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductWithOwnerRow>(&format!(
        r#"
        UPDATE products AS p
        SET
            images = COALESCE($2, p.images),
            attrs = p.attrs || $3,
            "updatedAt" = now()
        FROM users u
        WHERE p."productId" = $1 AND u."userId" = p."ownerId"
        RETURNING {PRODUCT_WITH_OWNER}
        "#
    ))
    .bind(product_id)
    .bind(images)
    .bind(attrs)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Flip the product to approved. Idempotent: re-approving stays approved.
pub async fn approve(
    db: &PgPool,
    product_id: i64,
) -> Result<Option<ProductWithOwnerRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductWithOwnerRow>(&format!(
        r#"
        UPDATE products AS p
        SET approved = TRUE, "updatedAt" = now()
        FROM users u
        WHERE p."productId" = $1 AND u."userId" = p."ownerId"
        RETURNING {PRODUCT_WITH_OWNER}
        "#
    ))
    .bind(product_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Absolute assignment of the view counter (last write wins; no increment).
pub async fn set_views(
    db: &PgPool,
    product_id: i64,
    views: i64,
) -> Result<Option<ProductWithOwnerRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductWithOwnerRow>(&format!(
        r#"
        UPDATE products AS p
        SET views = $2, "updatedAt" = now()
        FROM users u
        WHERE p."productId" = $1 AND u."userId" = p."ownerId"
        RETURNING {PRODUCT_WITH_OWNER}
        "#
    ))
    .bind(product_id)
    .bind(views)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, product_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM products
        WHERE "productId" = $1
        "#,
    )
    .bind(product_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
