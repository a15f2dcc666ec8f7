//! 守卫跳转行为的端到端测试

use admin_api::api::middleware::enforce;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{Request as HttpRequest, StatusCode};
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use clubnet_auth_core::Claims;
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain, PermissionGuard, RoleGuard};
use clubnet_common::UserId;
use tower::ServiceExt;

async fn ok() -> &'static str {
    "OK"
}

fn claims(roles: Vec<&str>, permissions: Vec<&str>) -> Claims {
    Claims::new(
        &UserId::new(),
        permissions.into_iter().map(String::from).collect(),
        roles.into_iter().map(String::from).collect(),
        3600,
        "access",
        "iss",
        "aud",
    )
}

fn app(chain: GuardChain, injected: Option<Claims>) -> Router {
    let router = Router::new()
        .route("/api/users", get(ok))
        .route_layer(from_fn(move |req, next| {
            enforce(chain.clone(), req, next)
        }));

    match injected {
        Some(claims) => router.layer(from_fn(move |mut req: Request, next: Next| {
            let claims = claims.clone();
            async move {
                req.extensions_mut().insert(claims);
                let response: Response = next.run(req).await;
                response
            }
        })),
        None => router,
    }
}

fn admin_chain() -> GuardChain {
    GuardChain::new()
        .with(AuthenticationGuard)
        .with(RoleGuard::any_of(["Admin", "Manager"]))
}

#[tokio::test]
async fn anonymous_request_redirects_to_login_and_keeps_intended_url() {
    let response = app(admin_chain(), None)
        .oneshot(
            HttpRequest::builder()
                .uri("/api/users?page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/auth/login?redirect=%2Fapi%2Fusers%3Fpage%3D2"
    );
}

#[tokio::test]
async fn wrong_role_redirects_to_unauthorized() {
    let response = app(admin_chain(), Some(claims(vec!["Viewer"], vec![])))
        .oneshot(
            HttpRequest::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/unauthorized");
}

#[tokio::test]
async fn matching_role_is_allowed() {
    let response = app(admin_chain(), Some(claims(vec!["Manager"], vec![])))
        .oneshot(
            HttpRequest::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn permission_all_of_denies_partial_grants() {
    let chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(PermissionGuard::all_of(["clubs:write", "clubs:delete"]));

    let response = app(chain, Some(claims(vec![], vec!["clubs:write"])))
        .oneshot(
            HttpRequest::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/unauthorized");
}

#[tokio::test]
async fn refresh_token_does_not_authenticate() {
    let mut refresh_claims = claims(vec!["Admin"], vec![]);
    refresh_claims.token_type = "refresh".to_string();

    let response = app(admin_chain(), Some(refresh_claims))
        .oneshot(
            HttpRequest::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/auth/login"));
}
