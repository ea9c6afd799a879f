//! Router assembly: REST API, WebSocket endpoint, docs, and middleware.

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::OriginPolicy;
use crate::ws::handler::ws_handler;

/// Builds the full application router over `state`.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.origin_policy);

    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Translates the origin policy into a CORS layer for read-only access.
#[must_use]
pub fn cors_layer(policy: &OriginPolicy) -> CorsLayer {
    match policy {
        OriginPolicy::Any => CorsLayer::permissive(),
        OriginPolicy::AllowList(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin, "ignoring unparsable allowed origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any)
        }
    }
}
