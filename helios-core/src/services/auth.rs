//! Auth service - `/auth` endpoints
//!
//! Every request here opts out of refresh-and-replay: a 401 from an auth
//! endpoint means the credentials were wrong, not that a token expired.
//! Persisting the result is the session manager's job.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{AuthResponse, LoginCredentials, User};
use crate::http::{ApiClient, ApiRequest};

pub const LOGIN_PATH: &str = "/auth/login";
pub const GOOGLE_PATH: &str = "/auth/google";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const ME_PATH: &str = "/auth/me";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";
pub const VERIFY_EMAIL_PATH: &str = "/auth/verify-email";

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetBody<'a> {
    token: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        let request = ApiRequest::post(LOGIN_PATH).json(credentials)?.without_refresh();
        self.client.send(request).await
    }

    /// Exchange an identity-provider credential for a session
    pub async fn login_with_google(&self, credential: &str) -> Result<AuthResponse> {
        let request = ApiRequest::post(GOOGLE_PATH)
            .json(&TokenBody { token: credential })?
            .without_refresh();
        self.client.send(request).await
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse> {
        let request = ApiRequest::post(REGISTER_PATH)
            .json(&RegisterBody {
                email,
                password,
                name,
            })?
            .without_refresh();
        self.client.send(request).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.client
            .send_unit(ApiRequest::post(LOGOUT_PATH).without_refresh())
            .await
    }

    /// The user behind the stored access token
    ///
    /// Unlike the other auth calls this one may refresh: an expired access
    /// token with a valid refresh token still restores the session.
    pub async fn me(&self) -> Result<User> {
        self.client.send(ApiRequest::get(ME_PATH)).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let request = ApiRequest::post(FORGOT_PASSWORD_PATH)
            .json(&EmailBody { email })?
            .without_refresh();
        self.client.send_unit(request).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let request = ApiRequest::post(RESET_PASSWORD_PATH)
            .json(&ResetBody {
                token,
                new_password,
            })?
            .without_refresh();
        self.client.send_unit(request).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        let request = ApiRequest::post(VERIFY_EMAIL_PATH)
            .json(&TokenBody { token })?
            .without_refresh();
        self.client.send_unit(request).await
    }
}
