use std::sync::Arc;

use axum::body::Body;
use axum::http::header::COOKIE;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use tower::ServiceExt;

use super::*;
use crate::routes::app;
use crate::services::cookies::encode_discovered_orgs;
use crate::state::test_helpers::test_app_state;
use crate::stytch::mock::MockProvider;

async fn get(mock: &Arc<MockProvider>, uri: &str, cookies: &str) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if !cookies.is_empty() {
        builder = builder.header(COOKIE, cookies);
    }
    let req = builder.body(Body::empty()).unwrap();
    app(test_app_state(mock.clone())).oneshot(req).await.unwrap()
}

async fn json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn session_returns_member_and_roles() {
    let mock = Arc::new(MockProvider::new());
    let resp = get(&mock, "/api/session", "stytch_session=sess-1").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["member"]["member_id"], "member-1");
    assert_eq!(body["organization"]["organization_id"], "org-1");
    assert_eq!(body["is_admin"], true);
    assert_eq!(mock.args("authenticate_session"), vec![vec!["sess-1".to_owned()]]);
}

#[tokio::test]
async fn session_without_cookie_is_401() {
    let mock = Arc::new(MockProvider::new());
    let resp = get(&mock, "/api/session", "").await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn session_rejected_by_provider_is_401() {
    let mock = Arc::new(MockProvider::new().failing(&["authenticate_session"]));
    let resp = get(&mock, "/api/session", "stytch_session=expired").await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn organizations_marks_current_org() {
    let mock = Arc::new(MockProvider::new());
    let resp = get(&mock, "/api/organizations", "stytch_session=sess-1").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], "org-1");
    assert_eq!(entries[0]["current"], true);
    assert_eq!(entries[1]["id"], "org-2");
    assert_eq!(entries[1]["current"], false);
    assert_eq!(mock.calls(), vec!["authenticate_session", "list_discovered_organizations"]);
}

#[tokio::test]
async fn organizations_provider_failure_is_502() {
    let mock = Arc::new(MockProvider::new().failing(&["list_discovered_organizations"]));
    let resp = get(&mock, "/api/organizations", "stytch_session=sess-1").await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn discovered_organizations_reads_cookie() {
    let mock = Arc::new(MockProvider::new());
    let orgs = vec![DiscoveredOrg {
        id: Some("org-1".into()),
        name: Some("Acme".into()),
        status: Some("active_member".into()),
    }];
    let cookie = format!("discovered_orgs={}", encode_discovered_orgs(&orgs));
    let resp = get(&mock, "/api/discovery/organizations", &cookie).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await, serde_json::json!([{ "id": "org-1", "name": "Acme", "status": "active_member" }]));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn discovered_organizations_malformed_cookie_is_empty() {
    let mock = Arc::new(MockProvider::new());
    let resp = get(&mock, "/api/discovery/organizations", "discovered_orgs=%5Bnope").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await, serde_json::json!([]));
}

#[tokio::test]
async fn healthz_is_ok() {
    let mock = Arc::new(MockProvider::new());
    let resp = get(&mock, "/healthz", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
}
