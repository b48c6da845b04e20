use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::get,
    Router,
};
use modkit::{ModuleCtx, ModuleCtxBuilder, OpenApiRegistry, RestHostModule};
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;
use utoipa::openapi::path::{OperationBuilder, PathItem, PathsBuilder};
use utoipa::openapi::{HttpMethod, OpenApiBuilder};

use api_ingress::{ApiIngress, ApiIngressConfig};

fn ctx() -> ModuleCtx {
    ModuleCtxBuilder::new(CancellationToken::new())
        .build()
        .for_module("api_ingress")
}

fn finalize(ingress: &ApiIngress) -> Router {
    let router = ingress.rest_prepare(&ctx(), Router::new()).unwrap();
    let router = router.route("/api/v1/ideas", get(|| async { "[]" }));
    ingress.rest_finalize(&ctx(), router).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = finalize(&ApiIngress::default());
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "healthy");
}

#[tokio::test]
async fn openapi_json_contains_registered_fragments() {
    let ingress = ApiIngress::default();
    ingress.register_openapi(
        OpenApiBuilder::new()
            .paths(PathsBuilder::new().path(
                "/api/v1/ideas",
                PathItem::new(
                    HttpMethod::Get,
                    OperationBuilder::new().operation_id(Some("list_ideas")),
                ),
            ))
            .build(),
    );
    let app = finalize(&ingress);

    let resp = app
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert_eq!(doc["info"]["title"], "The Way Forward API");
    assert_eq!(
        doc["paths"]["/api/v1/ideas"]["get"]["operationId"],
        "list_ideas"
    );
}

#[tokio::test]
async fn docs_disabled_hides_openapi() {
    let ingress = ApiIngress::new(ApiIngressConfig {
        enable_docs: false,
        ..Default::default()
    });
    let resp = finalize(&ingress)
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_listed_origin_with_credentials() {
    let app = finalize(&ApiIngress::default());
    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/ideas")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let h = resp.headers();
    assert_eq!(
        h.get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        h.get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn cors_ignores_unlisted_origin() {
    let app = finalize(&ApiIngress::default());
    let resp = app
        .oneshot(
            Request::get("/api/v1/ideas")
                .header("origin", "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn cors_exposes_range_headers() {
    let app = finalize(&ApiIngress::default());
    let resp = app
        .oneshot(
            Request::get("/api/v1/ideas")
                .header("origin", "https://the-way-forward.quest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let exposed = resp
        .headers()
        .get("access-control-expose-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-range"));
    assert!(exposed.contains("range"));
}
