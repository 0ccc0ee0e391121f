/*
 * Responsibility
 * - v1 URL structure
 * - the authorization matrix for /products lives here, grouped by the
 *   capability each route requires; guards are composed with route_layer so
 *   denial happens before any handler runs
 */
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{health::health, products};
use crate::middleware::auth::capability::{Capability, guard};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes(state))
}

/// The /products matrix:
///
/// | path              | verb   | capability    |
/// |-------------------|--------|---------------|
/// | /                 | GET    | public        |
/// | /                 | POST   | authenticated |
/// | /                 | PUT    | admin (fixed rejection) |
/// | /                 | DELETE | admin (fixed rejection) |
/// | /{id}             | GET    | public        |
/// | /{id}             | POST   | admin (fixed rejection) |
/// | /{id}             | PUT    | authenticated |
/// | /{id}             | DELETE | authenticated |
/// | /approve/{id}     | POST   | admin         |
/// | /views/{id}       | POST   | public        |
fn product_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(products::list_products))
        .route("/{product_id}", get(products::get_product))
        .route("/views/{product_id}", post(products::record_views))
        .route_layer(from_fn_with_state(
            (state.clone(), Capability::Public),
            guard,
        ));

    let authenticated = Router::new()
        .route("/", post(products::create_product))
        .route(
            "/{product_id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route_layer(from_fn_with_state(
            (state.clone(), Capability::Authenticated),
            guard,
        ));

    let admin = Router::new()
        .route(
            "/",
            put(products::collection_put_not_supported)
                .delete(products::collection_delete_not_supported),
        )
        .route("/{product_id}", post(products::product_post_not_supported))
        .route("/approve/{product_id}", post(products::approve_product))
        .route_layer(from_fn_with_state((state, Capability::Admin), guard));

    public.merge(authenticated).merge(admin)
}
