/*
 * Responsibility
 * - Products request/response DTOs
 * - the open-mapping contract: bodies and filters are opaque key/value
 *   documents, passed through without schema validation (intentional);
 *   only the reserved keys below are enforced
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Keys whose state changes only through dedicated operations (or never):
/// dropped from open merge bodies so create/update cannot touch them.
/// - `owner`/`ownerId`: set once at creation, immutable from this layer
/// - `approved`: changes only via the approve operation
/// - `views`: changes only via the record-view operation
const RESERVED_KEYS: &[&str] = &[
    "id",
    "productId",
    "owner",
    "ownerId",
    "approved",
    "views",
    "createdAt",
    "updatedAt",
];

/// Owner public fields, resolved into every product representation.
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub user_name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String, // encoded
    pub owner: OwnerResponse,
    pub images: Vec<String>,
    pub approved: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Open attribute document, returned verbatim at the top level.
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct RecordViewsRequest {
    /// Absolute assignment, not an increment.
    pub views: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub id: String,
    pub success: bool,
}

/// An update body split into the typed `images` replacement and the open
/// attrs merge document.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub images: Option<Vec<String>>,
    pub attrs: Map<String, Value>,
}

impl ProductPatch {
    pub fn from_body(mut body: Map<String, Value>) -> Result<Self, &'static str> {
        strip_reserved(&mut body);

        let images = match body.remove("images") {
            None => None,
            Some(v) => Some(
                serde_json::from_value::<Vec<String>>(v)
                    .map_err(|_| "images must be an array of strings")?,
            ),
        };

        Ok(Self { images, attrs: body })
    }
}

/// Drop the keys the open-mapping contract must not let through.
pub fn strip_reserved(attrs: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        attrs.remove(*key);
    }
}

/// Coerce a raw text value (query param / multipart text field): JSON values
/// parse to their typed form, everything else stays a string. This keeps
/// `approved=true` and `views=42` comparable against the stored document.
pub fn coerce_scalar(raw: String) -> Value {
    match serde_json::from_str::<Value>(&raw) {
        Ok(v) => v,
        Err(_) => Value::String(raw),
    }
}
