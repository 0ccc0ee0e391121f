/*
 * Responsibility
 * - /products resource handlers (list/get/create/update/delete/approve/views)
 * - path ids are public ids, decoded by the PublicProductId extractor
 * - capability requirements are declared in routes.rs; handlers only read the
 *   AuthCtx the guard stored
 * - read-like store failures go to the generic error pipeline; write-like
 *   failures (update/delete) collapse to 400 {"success": false}
 */
use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use crate::{
    api::v1::{
        dto::products::{
            DeleteProductResponse, OwnerResponse, ProductPatch, ProductResponse,
            RecordViewsRequest, coerce_scalar, strip_reserved,
        },
        extractors::{AuthCtxExtractor, PublicProductId},
    },
    error::AppError,
    repos::product_repo,
    services::media::{MAX_IMAGE_SLOTS, MediaError, fill_slots},
    state::AppState,
};

/// Multipart field name carrying the image files.
const IMAGE_FIELD: &str = "images";

/// Store failures on the write path (update/delete) answer this uniform
/// client error instead of the generic error pipeline.
pub struct WriteFailed;

impl IntoResponse for WriteFailed {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "success": false }))).into_response()
    }
}

fn row_to_response(
    state: &AppState,
    row: product_repo::ProductWithOwnerRow,
) -> Result<ProductResponse, AppError> {
    let public_id = state.id_codec.encode(row.product_id)?;

    let attrs = match row.attrs {
        Value::Object(attrs) => attrs,
        _ => Map::new(),
    };

    Ok(ProductResponse {
        id: public_id,
        owner: OwnerResponse {
            id: row.owner_id,
            user_name: row.owner_name,
            image_url: row.owner_image_url,
        },
        images: row.images,
        approved: row.approved,
        views: row.views,
        created_at: row.created_at,
        updated_at: row.updated_at,
        attrs,
    })
}

fn optional_response(
    state: &AppState,
    row: Option<product_repo::ProductWithOwnerRow>,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    // An unresolved id answers JSON null; not-found is not an error here.
    Ok(Json(row.map(|r| row_to_response(state, r)).transpose()?))
}

/// Opaque query filter -> containment document, values coerced
/// JSON-scalar-or-string. No schema validation (intentional).
fn filter_document(params: HashMap<String, String>) -> Value {
    let mut doc = Map::new();
    for (key, value) in params {
        doc.insert(key, coerce_scalar(value));
    }
    Value::Object(doc)
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let filter = filter_document(params);
    let rows = product_repo::find(&state.db, &filter).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}

pub async fn get_product(
    State(state): State<AppState>,
    product_id: PublicProductId,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    let row = product_repo::find_by_id(&state.db, product_id.id).await?;
    optional_response(&state, row)
}

pub async fn create_product(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    mut multipart: Multipart,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    let mut uploaded: Vec<String> = Vec::new();
    let mut attrs = Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("INVALID_MULTIPART", "malformed multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            // The upload boundary caps at 4 files; extras are ignored.
            if uploaded.len() >= MAX_IMAGE_SLOTS {
                continue;
            }

            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::bad_request("INVALID_MULTIPART", "unreadable file field"))?;

            let url = state
                .media
                .put(&file_name, content_type.as_deref(), data.to_vec())
                .await
                .map_err(media_error)?;
            uploaded.push(url);
        } else if !name.is_empty() {
            let text = field
                .text()
                .await
                .map_err(|_| AppError::bad_request("INVALID_MULTIPART", "unreadable text field"))?;
            attrs.insert(name, coerce_scalar(text));
        }
    }

    strip_reserved(&mut attrs);
    attrs.remove(IMAGE_FIELD); // images come from the files, never from text

    let images = fill_slots(uploaded);
    let product_id =
        product_repo::create(&state.db, ctx.user_id, &images, &Value::Object(attrs)).await?;

    // Follow-up owner-resolved read. Not atomic with the insert: a concurrent
    // delete can make this miss, which answers null rather than failing.
    let row = product_repo::find_by_id(&state.db, product_id).await?;
    optional_response(&state, row)
}

fn media_error(err: MediaError) -> AppError {
    match err {
        MediaError::UnsupportedFormat(format) => {
            AppError::bad_request("UNSUPPORTED_FORMAT", format!("unsupported format: {format}"))
        }
        err => {
            tracing::error!(error = ?err, "media upload failed");
            AppError::Internal
        }
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    product_id: PublicProductId,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Option<ProductResponse>>, WriteFailed> {
    let patch = ProductPatch::from_body(body).map_err(|_| WriteFailed)?;

    let row = product_repo::update(
        &state.db,
        product_id.id,
        patch.images,
        &Value::Object(patch.attrs),
    )
    .await
    .map_err(|err| {
        tracing::warn!(error = ?err, "product update failed");
        WriteFailed
    })?;

    let res = row
        .map(|r| row_to_response(&state, r))
        .transpose()
        .map_err(|_| WriteFailed)?;
    Ok(Json(res))
}

pub async fn delete_product(
    State(state): State<AppState>,
    product_id: PublicProductId,
) -> Result<Json<DeleteProductResponse>, WriteFailed> {
    // No prior-existence check: removing an unknown id still answers success.
    let _removed = product_repo::delete(&state.db, product_id.id)
        .await
        .map_err(|err| {
            tracing::warn!(error = ?err, "product delete failed");
            WriteFailed
        })?;

    let id = state.id_codec.encode(product_id.id).map_err(|_| WriteFailed)?;
    Ok(Json(DeleteProductResponse { id, success: true }))
}

pub async fn approve_product(
    State(state): State<AppState>,
    product_id: PublicProductId,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    let row = product_repo::approve(&state.db, product_id.id).await?;
    optional_response(&state, row)
}

pub async fn record_views(
    State(state): State<AppState>,
    product_id: PublicProductId,
    Json(req): Json<RecordViewsRequest>,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    // Absolute assignment; concurrent callers overwrite each other (accepted).
    let row = product_repo::set_views(&state.db, product_id.id, req.views).await?;
    optional_response(&state, row)
}

// Collection-level PUT/DELETE and single-resource POST have no meaning for
// this resource; they are permanent fixed rejections, even for admins.

pub async fn collection_put_not_supported() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        "PUT operation not supported on /products",
    )
}

pub async fn collection_delete_not_supported() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        "DELETE operation not supported on /products",
    )
}

pub async fn product_post_not_supported(Path(product_id): Path<String>) -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        format!("POST operation not supported on /products/{product_id}"),
    )
}

#[cfg(test)]
mod tests;
