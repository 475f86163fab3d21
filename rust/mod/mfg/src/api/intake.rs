//! The order intake & production initiation endpoint.
//!
//! Unlike the rest of the module this endpoint resolves its own bearer
//! token (it is public to the binary's JWT middleware) and answers with
//! a flat `{"error", "details"?}` envelope, because it is called by a
//! browser-hosted dashboard from arbitrary origins. Processing is
//! strictly sequential; the only concession to hardening is a bounded
//! request timeout.

use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    AUTHORIZATION,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde::Deserialize;
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::api::AppState;
use crate::model::{IntakeResult, OrderFields};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/intake", post(intake).options(preflight))
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
}

/// Headers promised to browser callers on every intake response.
fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
        ),
        (
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ),
    ]
}

async fn preflight() -> Response {
    (StatusCode::OK, cors_headers()).into_response()
}

/// Intake failure taxonomy. Every variant maps to one status code and
/// one `{"error", "details"?}` body.
#[derive(Debug)]
pub enum IntakeError {
    AuthRequired,
    InvalidToken,
    NoTenant,
    Validation(String),
    BackendOperation(String),
    Internal(String),
}

impl IntakeError {
    fn status(&self) -> StatusCode {
        match self {
            IntakeError::AuthRequired | IntakeError::InvalidToken => StatusCode::UNAUTHORIZED,
            IntakeError::NoTenant | IntakeError::Validation(_) => StatusCode::BAD_REQUEST,
            IntakeError::BackendOperation(_) | IntakeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            IntakeError::AuthRequired => json!({"error": "Authorization header required"}),
            IntakeError::InvalidToken => json!({"error": "Invalid or expired token"}),
            IntakeError::NoTenant => {
                json!({"error": "No factory is assigned to this user"})
            }
            IntakeError::Validation(msg) => json!({"error": msg}),
            IntakeError::BackendOperation(details) => {
                json!({"error": "Order intake failed", "details": details})
            }
            IntakeError::Internal(details) => {
                json!({"error": "Internal server error", "details": details})
            }
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        (self.status(), cors_headers(), axum::Json(self.body())).into_response()
    }
}

/// Raw request body. Everything optional so that missing fields can be
/// reported collectively instead of failing on the first one.
#[derive(Debug, Deserialize)]
struct IntakeRequest {
    customer_name: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    product_model_id: Option<String>,
    quantity: Option<i64>,
    price_per_unit: Option<f64>,
    delivery_date: Option<String>,
    advance_payment: Option<f64>,
    color: Option<String>,
    size: Option<String>,
    notes: Option<String>,
}

impl IntakeRequest {
    /// Validate and apply the defaulting policy: missing advance → 0,
    /// missing optional strings → null.
    fn into_fields(self) -> Result<OrderFields, IntakeError> {
        let mut missing = Vec::new();
        if self.customer_name.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("customer_name");
        }
        if self.product_model_id.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("product_model_id");
        }
        if self.quantity.is_none() {
            missing.push("quantity");
        }
        if self.price_per_unit.is_none() {
            missing.push("price_per_unit");
        }
        if !missing.is_empty() {
            return Err(IntakeError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let quantity = self.quantity.unwrap_or_default();
        if quantity <= 0 {
            return Err(IntakeError::Validation(
                "quantity must be a positive integer".into(),
            ));
        }
        let price_per_unit = self.price_per_unit.unwrap_or_default();
        if price_per_unit <= 0.0 {
            return Err(IntakeError::Validation(
                "price_per_unit must be positive".into(),
            ));
        }
        let advance_payment = self.advance_payment.unwrap_or(0.0);
        if advance_payment < 0.0 {
            return Err(IntakeError::Validation(
                "advance_payment cannot be negative".into(),
            ));
        }

        Ok(OrderFields {
            customer_name: self.customer_name.unwrap_or_default(),
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            product_model_id: self.product_model_id.unwrap_or_default(),
            quantity,
            price_per_unit,
            delivery_date: self.delivery_date,
            advance_payment,
            color: self.color,
            size: self.size,
            notes: self.notes,
        })
    }
}

async fn intake(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, IntakeError> {
    let token = bearer_token(&headers)?;

    let identity = state
        .identity
        .resolve(token)
        .map_err(|_| IntakeError::InvalidToken)?;

    let factory_id = state
        .tenants
        .factory_for_user(&identity.id)
        .map_err(|e| IntakeError::Internal(e.to_string()))?
        .ok_or(IntakeError::NoTenant)?;

    let request: IntakeRequest = serde_json::from_slice(&body)
        .map_err(|e| IntakeError::Validation(format!("invalid request body: {}", e)))?;
    let fields = request.into_fields()?;

    let result = state
        .service
        .create_order_and_initiate_production(&factory_id, &fields)
        .map_err(|e| {
            warn!(user = %identity.id, factory = %factory_id, error = %e, "order intake failed");
            IntakeError::BackendOperation(e.to_string())
        })?;

    info!(
        user = %identity.id,
        order = %result.order_number,
        lot = %result.lot_number,
        "order intake succeeded"
    );
    Ok(success_response(&result))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, IntakeError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(IntakeError::AuthRequired)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(IntakeError::AuthRequired)
}

fn success_response(result: &IntakeResult) -> Response {
    (
        StatusCode::OK,
        cors_headers(),
        axum::Json(json!({
            "success": true,
            "message": "Order created and production initiated",
            "order_id": result.order_id,
            "order_number": result.order_number,
            "lot_id": result.lot_id,
            "lot_number": result.lot_number,
            "operations_created": result.operations_created,
            "materials_reserved": result.materials_reserved,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use factoryerp_core::{RejectAll, StaticResolver, StaticTenant};

    use crate::api::{AppState, MfgState, build_router};
    use crate::service::testutil::{seeded_factory, test_service};

    fn app(factory_id: Option<String>) -> (Router, AppState) {
        let service = test_service();
        let state = Arc::new(MfgState {
            service,
            identity: Arc::new(StaticResolver("u1".to_string())),
            tenants: Arc::new(StaticTenant(factory_id)),
        });
        (build_router(state.clone()), state)
    }

    fn post_intake(body: serde_json::Value, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/orders/intake")
            .header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn valid_body(model_id: &str) -> serde_json::Value {
        serde_json::json!({
            "customer_name": "Acme",
            "product_model_id": model_id,
            "quantity": 10,
            "price_per_unit": 12.5,
            "advance_payment": 100.0,
        })
    }

    #[tokio::test]
    async fn options_preflight_is_open() {
        let (app, _) = app(None);
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/orders/intake")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            "authorization, x-client-info, apikey, content-type"
        );
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "POST, OPTIONS"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn missing_authorization_header_is_401() {
        let (app, _) = app(Some("f1".to_string()));
        let response = app
            .oneshot(post_intake(valid_body("m1"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Authorization header required");
    }

    #[tokio::test]
    async fn rejected_token_is_401() {
        let service = test_service();
        let state = Arc::new(MfgState {
            service,
            identity: Arc::new(RejectAll),
            tenants: Arc::new(StaticTenant(Some("f1".to_string()))),
        });
        let response = build_router(state)
            .oneshot(post_intake(valid_body("m1"), Some("Bearer bad")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn user_without_factory_is_400() {
        let (app, _) = app(None);
        let response = app
            .oneshot(post_intake(valid_body("m1"), Some("Bearer t")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("factory"));
    }

    #[tokio::test]
    async fn missing_fields_are_reported_collectively() {
        let (app, _) = app(Some("f1".to_string()));
        let response = app
            .oneshot(post_intake(
                serde_json::json!({"customer_name": "Acme"}),
                Some("Bearer t"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("product_model_id"));
        assert!(error.contains("quantity"));
        assert!(error.contains("price_per_unit"));
    }

    #[tokio::test]
    async fn happy_path_echoes_the_result_fields() {
        let service = test_service();
        let (factory_id, model_id, _) = seeded_factory(&service);
        let state = Arc::new(MfgState {
            service: service.clone(),
            identity: Arc::new(StaticResolver("u1".to_string())),
            tenants: Arc::new(StaticTenant(Some(factory_id))),
        });
        let response = build_router(state)
            .oneshot(post_intake(valid_body(&model_id), Some("Bearer t")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["order_number"], "ORD-0001");
        assert_eq!(body["lot_number"], "LOT-0001");
        assert_eq!(body["operations_created"], 3);
        assert_eq!(body["materials_reserved"], true);
        assert!(body["order_id"].as_str().is_some());
        assert!(body["lot_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn backend_failure_is_500_and_leaves_no_rows() {
        let service = test_service();
        let (factory_id, model_id, _) = seeded_factory(&service);
        let state = Arc::new(MfgState {
            service: service.clone(),
            identity: Arc::new(StaticResolver("u1".to_string())),
            tenants: Arc::new(StaticTenant(Some(factory_id.clone()))),
        });
        let app = build_router(state);

        // 300 units need more material than is in stock.
        let mut body = valid_body(&model_id);
        body["quantity"] = serde_json::json!(300);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_intake(body.clone(), Some("Bearer t")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let payload = json_body(response).await;
            assert_eq!(payload["error"], "Order intake failed");
            assert!(payload["details"].as_str().unwrap().contains("insufficient"));
        }

        let orders = service
            .list_orders(&factory_id, &factoryerp_core::ListParams::default())
            .unwrap();
        assert_eq!(orders.total, 0);
    }
}
