//! Token login and logout.
//!
//! ```text
//! POST /api/auth/token/login/  {"email": "...", "password": "..."}
//! POST /api/auth/token/logout/
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::responses::TokenResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "vpupkin@yandex.ru")]
    #[serde(default)]
    pub email: String,
    #[schema(example = "Qwerty123")]
    #[serde(default)]
    pub password: String,
}

fn credentials_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::field(field, "required", err.to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unable to log in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/token/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(credentials_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        auth_token: token.as_str().to_owned(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("Token" = []))
)]
#[post("/auth/token/logout/")]
pub async fn logout(
    state: web::Data<HttpState>,
    context: RequestContext,
) -> ApiResult<HttpResponse> {
    let token = context.require_token()?;
    state.login.logout(token).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthToken, ErrorCode};
    use crate::inbound::http::error::json_config;
    use crate::inbound::http::test_utils::{MockPorts, TEST_TOKEN, actor, auth_header};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};
    use serde_json::{Value, json};

    #[given("credentials with a blank email")]
    fn blank_email() -> (String, String) {
        ("   ".to_owned(), "Qwerty123".to_owned())
    }

    #[when("the credentials are validated")]
    fn credentials_are_validated(raw: (String, String)) -> Result<LoginCredentials, Error> {
        LoginCredentials::try_from_parts(&raw.0, &raw.1).map_err(credentials_error)
    }

    #[then("the email field is reported")]
    fn email_field_is_reported(result: Result<LoginCredentials, Error>) {
        let err = result.expect_err("blank email is rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "email");
    }

    #[rstest]
    fn blank_email_is_a_field_error() {
        email_field_is_reported(credentials_are_validated(blank_email()));
    }

    async fn call(ports: MockPorts, req: actix_test::TestRequest) -> (StatusCode, Option<Value>) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .app_data(json_config())
                .service(web::scope("/api").service(login).service(logout)),
        )
        .await;
        let res = actix_test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, serde_json::from_slice(&body).ok())
    }

    #[actix_web::test]
    async fn login_returns_the_token_key() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_login()
            .withf(|creds| creds.email() == "cook@foodgram.test" && creds.password() == "Qwerty123")
            .times(1)
            .return_once(|_| Ok(AuthToken::from_presented(TEST_TOKEN)));

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(json!({"email": "cook@foodgram.test", "password": "Qwerty123"}));
        let (status, body) = call(ports, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(json!({"auth_token": TEST_TOKEN})));
    }

    #[actix_web::test]
    async fn bad_credentials_are_a_bad_request() {
        let mut ports = MockPorts::default();
        ports.login.expect_login().return_once(|_| {
            Err(Error::field(
                "non_field_errors",
                "invalid_credentials",
                "unable to log in with provided credentials",
            ))
        });

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(json!({"email": "cook@foodgram.test", "password": "nope-nope"}));
        let (status, body) = call(ports, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.expect("json")["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn logout_revokes_the_presented_token() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(actor(4));
        ports
            .login
            .expect_logout()
            .withf(|token| token.as_str() == TEST_TOKEN)
            .times(1)
            .return_once(|_| Ok(()));

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/token/logout/")
            .insert_header(auth_header());
        let (status, _) = call(ports, req).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn logout_without_a_token_is_unauthorized() {
        let req = actix_test::TestRequest::post().uri("/api/auth/token/logout/");
        let (status, body) = call(MockPorts::default(), req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.expect("json")["code"], "unauthorized");
    }
}
