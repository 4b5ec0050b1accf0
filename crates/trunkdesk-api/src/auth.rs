// Bearer-token authentication
//
// `POST /api/auth/login` exchanges a username/password for a token and the
// user's role. The token is then supplied to the client through a
// `TokenProvider`, which the session store implements.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse};

/// Source of the bearer token attached to authenticated requests.
///
/// Returning `None` sends the request without an `Authorization` header;
/// the server answers 401 and the caller sees [`Error::Unauthorized`].
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<SecretString>;
}

/// Fixed token, for one-shot tools and tests.
#[derive(Clone, Default)]
pub struct StaticToken(Option<SecretString>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(SecretString::from(token.into())))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        self.0.clone()
    }
}

impl ApiClient {
    /// Authenticate with username/password.
    ///
    /// Never sends a bearer header. Any non-success status, including the
    /// server's 401 "Invalid credentials", becomes [`Error::Authentication`].
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.url("auth/login")?;
        debug!("logging in at {}", url);

        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let login: LoginResponse =
            resp.json().await.map_err(|e| Error::Authentication {
                message: format!("malformed login response: {e}"),
            })?;

        debug!(username = %login.username, role = %login.role, "login successful");
        Ok(login)
    }
}
