//! Axum router configuration for membership and account endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_membership, login, set_password};
use crate::adapters::http::state::AppState;

/// Create the account router, mounted under `/api`.
///
/// # Routes
/// - `GET /membership` - Membership lookup by email
/// - `POST /auth/login` - Login
/// - `POST /auth/set-password` - Set a password with an activation token
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/membership", get(get_membership))
        .route("/auth/login", post(login))
        .route("/auth/set-password", post(set_password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::http::state::test_support::{test_app, TestApp};
    use crate::domain::account::{ActivationToken, Credentials, PasswordHash};
    use crate::domain::foundation::{EmailAddress, Timestamp};
    use crate::domain::membership::Membership;
    use crate::ports::{ActivationTokenRepository, CredentialRepository, MembershipRepository};

    fn router(app: &TestApp) -> Router {
        Router::new().nest("/api", account_routes()).with_state(app.state.clone())
    }

    fn email() -> EmailAddress {
        EmailAddress::parse("a@x.com").unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn active_member(app: &TestApp) {
        let membership = Membership::activate(email(), "monthly", Timestamp::now());
        app.memberships.upsert(&membership).await.unwrap();
    }

    #[tokio::test]
    async fn membership_lookup_reports_active() {
        let app = test_app(None);
        active_member(&app).await;

        let response = router(&app)
            .oneshot(Request::builder().uri("/api/membership?email=A%40x.com").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["active"], true);
        assert_eq!(json["membership"]["planId"], "monthly");
    }

    #[tokio::test]
    async fn membership_lookup_for_unknown_email() {
        let app = test_app(None);

        let response = router(&app)
            .oneshot(Request::builder().uri("/api/membership?email=b%40x.com").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["active"], false);
        assert!(json["membership"].is_null());
    }

    #[tokio::test]
    async fn membership_lookup_requires_email() {
        let app = test_app(None);

        let response = router(&app)
            .oneshot(Request::builder().uri("/api/membership").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "email_required");
    }

    #[tokio::test]
    async fn login_without_password_set() {
        let app = test_app(None);
        active_member(&app).await;

        let response = router(&app)
            .oneshot(post_json("/api/auth/login", r#"{"email":"a@x.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["planId"], "monthly");
        assert_eq!(json["hasPassword"], false);
    }

    #[tokio::test]
    async fn login_rejects_inactive_membership() {
        let app = test_app(None);

        let response = router(&app)
            .oneshot(post_json("/api/auth/login", r#"{"email":"a@x.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error_code"], "membership_inactive");
    }

    #[tokio::test]
    async fn login_requires_email() {
        let app = test_app(None);

        let response = router(&app)
            .oneshot(post_json("/api/auth/login", r#"{"email":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "email_required");
    }

    #[tokio::test]
    async fn login_checks_password_once_set() {
        let app = test_app(None);
        active_member(&app).await;
        app.credentials
            .upsert(&Credentials {
                email: email(),
                password: PasswordHash::derive("secret1").unwrap(),
            })
            .await
            .unwrap();

        let missing = router(&app)
            .oneshot(post_json("/api/auth/login", r#"{"email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(missing).await["error_code"], "password_required");

        let wrong = router(&app)
            .oneshot(post_json("/api/auth/login", r#"{"email":"a@x.com","password":"nope"}"#))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await["error_code"], "invalid_password");

        let right = router(&app)
            .oneshot(post_json("/api/auth/login", r#"{"email":"a@x.com","password":"secret1"}"#))
            .await
            .unwrap();
        assert_eq!(right.status(), StatusCode::OK);
        assert_eq!(body_json(right).await["hasPassword"], true);
    }

    #[tokio::test]
    async fn set_password_redeems_token_once() {
        let app = test_app(None);
        let token = ActivationToken::issue(email(), Timestamp::now());
        app.tokens.insert(&token).await.unwrap();
        let body = format!(r#"{{"token":"{}","password":"secret1"}}"#, token.token);

        let first = router(&app).oneshot(post_json("/api/auth/set-password", &body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(body_json(first).await["email"], "a@x.com");
        assert!(app.credentials.find_by_email(&email()).await.unwrap().is_some());

        let second = router(&app).oneshot(post_json("/api/auth/set-password", &body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(second).await["error_code"], "already_used");
    }

    #[tokio::test]
    async fn set_password_rejects_short_password() {
        let app = test_app(None);
        let token = ActivationToken::issue(email(), Timestamp::now());
        app.tokens.insert(&token).await.unwrap();
        let body = format!(r#"{{"token":"{}","password":"123"}}"#, token.token);

        let response = router(&app).oneshot(post_json("/api/auth/set-password", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "password_too_short");
    }

    #[tokio::test]
    async fn set_password_requires_token() {
        let app = test_app(None);

        let response = router(&app)
            .oneshot(post_json("/api/auth/set-password", r#"{"password":"secret1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "token_required");
    }
}
