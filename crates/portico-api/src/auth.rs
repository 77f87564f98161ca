use secrecy::{ExposeSecret, SecretString};

/// HTTP Basic credentials for the Data Plane API.
///
/// The Data Plane API authenticates every request independently; there is
/// no session or token exchange, so the client attaches these per request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Attach the `Authorization: Basic ...` header to a request.
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}
