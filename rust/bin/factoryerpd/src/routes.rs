//! Route registration — collects all module routes + system endpoints.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::cors::CorsLayer;

use crate::auth_middleware::{self, JwtState};

/// Build the complete router with all routes.
///
/// Module routes are already `Router<()>` (each module called
/// `.with_state()` internally) and get nested under `/{module_name}`.
/// CORS is owned per route group: the layer here covers only the
/// system endpoints, each module brings its own. A global layer would
/// stack a second `Access-Control-Allow-Origin` onto responses whose
/// module already set one, which browsers reject.
pub fn build_router(jwt_state: Arc<JwtState>, module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .layer(CorsLayer::permissive());

    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    app.layer(middleware::from_fn_with_state(
        jwt_state,
        auth_middleware::auth_middleware,
    ))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "factoryerpd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::options;
    use jsonwebtoken::{DecodingKey, Validation};
    use tower::ServiceExt;

    fn jwt_state() -> Arc<JwtState> {
        Arc::new(JwtState {
            decoding_key: DecodingKey::from_secret(b"test-secret-test-secret"),
            validation: Validation::default(),
        })
    }

    #[tokio::test]
    async fn module_owned_cors_headers_stay_single_valued() {
        // A module route that writes its own CORS header, like the
        // order intake endpoint does.
        let module = Router::new().route(
            "/orders/intake",
            options(|| async {
                (
                    StatusCode::OK,
                    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                )
            }),
        );
        let app = build_router(jwt_state(), vec![("mfg", module)]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/mfg/orders/intake")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let origins: Vec<_> = response
            .headers()
            .get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .iter()
            .collect();
        assert_eq!(origins, vec!["*"]);
    }

    #[tokio::test]
    async fn system_routes_carry_cors() {
        let app = build_router(jwt_state(), vec![]);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .iter()
                .count(),
            1
        );
    }
}
