use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use modkit::{ModuleCtx, ModuleCtxBuilder, RestHostModule};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::XRequestId;
use api_ingress::ApiIngress;

fn ctx() -> ModuleCtx {
    ModuleCtxBuilder::new(CancellationToken::new())
        .build()
        .for_module("api_ingress")
}

// Full host stack with one extra route echoing the request id.
fn test_app() -> Router {
    let ingress = ApiIngress::default();
    let router = ingress.rest_prepare(&ctx(), Router::new()).unwrap();
    let router = router.route("/echo", get(echo_handler));
    ingress.rest_finalize(&ctx(), router).unwrap()
}

async fn echo_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({"request_id": request_id}))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = test_app()
        .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header.is_empty());

    let json = body_json(response).await;
    assert_eq!(json["request_id"], header.as_str());
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    assert_eq!(body_json(response).await["request_id"], "abc-123");
}

#[tokio::test]
async fn unknown_route_is_problem_with_request_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .header("x-request-id", "error-test-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
    let json = body_json(response).await;
    assert_eq!(json["status"], 404);
    assert_eq!(json["detail"], "No route for /nope");
    assert_eq!(json["request_id"], "error-test-123");
}
