//! 认证与守卫中间件
//!
//! attach_claims 只负责解析并附加 Claims；拒绝与跳转由守卫链决定

use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use clubnet_auth_core::Claims;
use clubnet_auth_core::guard::{GuardChain, GuardDecision, RouteContext};
use tracing::debug;

use crate::state::AppState;

/// 认证 Claims 提取器
///
/// 用于从请求中获取已验证的 Claims，应在 attach_claims 之后使用
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing claims in request extensions (attach_claims may not have run)",
            ))
    }
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// JWT 解析中间件
///
/// 有效 access token 注入 Claims；无 token 或无效 token 按匿名处理
pub async fn attach_claims(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.token_service.validate_access_token(token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }

    next.run(request).await
}

/// 守卫执行中间件
///
/// 拒绝转换为 303 跳转；守卫内部错误按问题响应返回
pub async fn enforce(chain: GuardChain, request: Request, next: Next) -> Response {
    let claims = request.extensions().get::<Claims>().cloned();
    let ctx = RouteContext::new(request.uri().path(), request.uri().to_string());

    match chain.evaluate(claims.as_ref(), &ctx).await {
        Ok(GuardDecision::Allow) => next.run(request).await,
        Ok(GuardDecision::Deny { redirect }) => {
            let location = redirect.location();
            debug!(%location, uri = %ctx.original_uri, "Guard denied request");
            Redirect::to(&location).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use clubnet_auth_core::guard::AuthenticationGuard;
    use tower::ServiceExt;

    async fn handler() -> impl IntoResponse {
        "OK"
    }

    fn guarded_app() -> Router {
        let chain = GuardChain::new().with(AuthenticationGuard);
        Router::new().route("/admin", get(handler)).route_layer(
            middleware::from_fn(move |req, next| enforce(chain.clone(), req, next)),
        )
    }

    #[tokio::test]
    async fn test_anonymous_request_redirects_to_login_with_intended_url() {
        let app = guarded_app();

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/auth/login?redirect=%2Fadmin"
        );
    }

    #[tokio::test]
    async fn test_claims_in_extensions_allow_request() {
        let chain = GuardChain::new().with(AuthenticationGuard);
        let claims = Claims::new(
            &clubnet_common::UserId::new(),
            vec![],
            vec![],
            3600,
            "access",
            "iss",
            "aud",
        );

        let inject = move |mut req: Request, next: Next| {
            let claims = claims.clone();
            async move {
                req.extensions_mut().insert(claims);
                next.run(req).await
            }
        };

        let app = Router::new()
            .route("/admin", get(handler))
            .route_layer(middleware::from_fn(move |req, next| {
                enforce(chain.clone(), req, next)
            }))
            .layer(middleware::from_fn(inject));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
