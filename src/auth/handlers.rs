use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, PublicAccount, RegisterCompanyResponse, RegisterRequest,
            RegisterUserResponse,
        },
        services::{self, Registrant},
    },
    error::{json_body, ApiError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register-user", post(register_user))
        .route("/register-company", post(register_company))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), ApiError> {
    let payload = json_body(payload, Registrant::Individual.failure())?;
    let account = services::register(&state, Registrant::Individual, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterUserResponse {
            message: "User created successfully!",
            user: PublicAccount {
                id: account.id,
                email: account.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn register_company(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterCompanyResponse>), ApiError> {
    let payload = json_body(payload, Registrant::Organization.failure())?;
    let account = services::register(&state, Registrant::Organization, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterCompanyResponse {
            message: "Company created successfully!",
            company: PublicAccount {
                id: account.id,
                email: account.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload = json_body(payload, services::LOGIN_FAILED)?;
    let outcome = services::login(&state, payload).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token: outcome.token,
        is_company: outcome.is_organization,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{extract::FromRef, http::Method};
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        auth::jwt::JwtKeys,
        test_support::{call, call_raw},
    };

    async fn post_json(state: &AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        call(state, Method::POST, uri, Some(body)).await
    }

    #[tokio::test]
    async fn register_login_scenario() {
        let state = AppState::fake();

        let (status, body) = post_json(
            &state,
            "/register-user",
            json!({ "name": "Ana", "email": "ana@x.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User created successfully!");
        assert_eq!(body["user"]["email"], "ana@x.com");
        assert!(body["user"]["id"].is_string());
        assert!(!body.to_string().contains("password"));
        assert!(!body.to_string().contains("pw123"));

        let (status, body) = post_json(
            &state,
            "/login",
            json!({ "email": "ana@x.com", "password": "wrong" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");

        let (status, body) = post_json(
            &state,
            "/login",
            json!({ "email": "ana@x.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["isCompany"], false);
        let token = body["token"].as_str().unwrap();
        assert!(!token.is_empty());
        let claims = JwtKeys::from_ref(&state).verify(token).unwrap();
        assert!(!claims.is_organization);
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() {
        let state = AppState::fake();
        let (status, body) = post_json(
            &state,
            "/login",
            json!({ "email": "nobody@x.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn register_company_then_login_as_company() {
        let state = AppState::fake();
        let (status, body) = post_json(
            &state,
            "/register-company",
            json!({
                "name": "Acme Recycling",
                "email": "acme@x.com",
                "password": "pw123",
                "cnpj": "12.345.678/0001-90"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Company created successfully!");
        assert_eq!(body["company"]["email"], "acme@x.com");
        assert!(body.get("user").is_none());

        let (status, body) = post_json(
            &state,
            "/login",
            json!({ "email": "acme@x.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isCompany"], true);
    }

    #[tokio::test]
    async fn register_company_without_cnpj_is_bad_request() {
        let state = AppState::fake();
        let (status, body) = post_json(
            &state,
            "/register-company",
            json!({ "name": "Acme", "email": "acme@x.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "CNPJ is required for companies" }));
    }

    #[tokio::test]
    async fn duplicate_registration_reports_details() {
        let state = AppState::fake();
        let payload = json!({ "name": "Ana", "email": "ana@x.com", "password": "pw123" });
        let (status, _) = post_json(&state, "/register-user", payload.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = post_json(&state, "/register-user", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User registration failed");
        assert!(body["details"].as_str().unwrap().contains("already registered"));
    }

    #[tokio::test]
    async fn login_without_password_is_bad_request() {
        let state = AppState::fake();
        let (status, body) = post_json(&state, "/login", json!({ "email": "ana@x.com" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email and password are required");
    }

    #[tokio::test]
    async fn wrong_field_type_is_json_bad_request() {
        let state = AppState::fake();
        let (status, body) = post_json(
            &state,
            "/register-user",
            json!({ "name": 5, "email": "ana@x.com", "password": "pw123" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User registration failed");
        assert!(body["details"].as_str().unwrap().contains("name"));

        let (status, body) = post_json(
            &state,
            "/register-company",
            json!({ "name": "Acme", "email": "acme@x.com", "password": "pw123", "cnpj": 123 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Company registration failed");
    }

    #[tokio::test]
    async fn missing_body_is_json_bad_request() {
        let state = AppState::fake();
        for (uri, failure) in [
            ("/register-user", "User registration failed"),
            ("/register-company", "Company registration failed"),
            ("/login", "Login failed"),
        ] {
            let (status, text) = call_raw(&state, Method::POST, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let body: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(body["error"], failure);
            assert!(body["details"].as_str().unwrap().contains("Content-Type"));
        }
    }
}
