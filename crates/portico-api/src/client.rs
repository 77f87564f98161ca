// Async HTTP client for the HAProxy Data Plane API (v3).
//
// Base path: /v3/services/haproxy/
// Auth: HTTP Basic on every request
//
// Configuration objects are addressed generically through `ConfigObject`;
// transactions and the configuration version have dedicated methods.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::{ItemBody, ListBody};
use crate::objects::{ConfigObject, Scope};
use crate::transaction::Transaction;
use crate::transport::TransportConfig;

const SERVICE_ROOT: &str = "/v3/services/haproxy";
const TRANSACTION_PARAM: &str = "transaction_id";

// ── Error response shape from the Data Plane API ─────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the HAProxy Data Plane API.
///
/// Every call is a single request/response pair. Mutations accept an
/// optional transaction id; when given, the change is staged in that
/// transaction rather than applied.
pub struct DataplaneClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl DataplaneClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, credentials, and transport config.
    ///
    /// `base_url` may be the bare endpoint (`https://lb:5555`) or already
    /// include the `/v3/services/haproxy` service root.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Ensure the base URL ends with `/v3/services/haproxy/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with(SERVICE_ROOT) {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}{SERVICE_ROOT}/"));
        }

        Ok(url)
    }

    /// The normalized service root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments to the service root.
    fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments.iter().map(|s| s.as_ref()));
        Ok(url)
    }

    fn object_url<T: ConfigObject>(&self, scope: Scope<'_>, name: Option<&str>) -> Result<Url, Error> {
        let mut segments = T::KIND.collection_segments(scope)?;
        if let Some(name) = name {
            segments.push(name.to_owned());
        }
        self.url(&segments)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        debug!("{method} {url} params={query:?}");

        let mut request = self.credentials.apply(self.http.request(method, url));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: "Data Plane API rejected the configured credentials".into(),
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    fn transaction_query(transaction: Option<&str>) -> Vec<(&'static str, String)> {
        transaction
            .map(|id| vec![(TRANSACTION_PARAM, id.to_owned())])
            .unwrap_or_default()
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Configuration version ────────────────────────────────────────

    /// Current configuration version. Required to open a transaction.
    ///
    /// `GET configuration/version` returns a bare integer as text.
    pub async fn configuration_version(&self) -> Result<i64, Error> {
        let url = self.url(&["configuration", "version"])?;
        let resp = self.send(Method::GET, url, &[], None).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let raw = resp.text().await?;
        raw.trim()
            .parse()
            .map_err(|_| Error::InvalidVersion { raw })
    }

    // ── Transactions ─────────────────────────────────────────────────

    /// Open a transaction against `version`.
    ///
    /// A stale version is rejected by the Data Plane with HTTP 409, which
    /// surfaces as [`Error::VersionConflict`]; re-read the version and retry.
    pub async fn begin_transaction(&self, version: i64) -> Result<Transaction, Error> {
        let url = self.url(&["transactions"])?;
        let resp = self
            .send(
                Method::POST,
                url,
                &[("version", version.to_string())],
                None,
            )
            .await?;

        Self::handle_response(resp).await.map_err(|err| match err {
            Error::Api {
                status: 409,
                message,
                ..
            } => Error::VersionConflict { version, message },
            other => other,
        })
    }

    /// Atomically apply every change staged in the transaction.
    pub async fn commit_transaction(&self, id: &str) -> Result<(), Error> {
        let url = self.url(&["transactions", id])?;
        let resp = self.send(Method::PUT, url, &[], None).await?;
        Self::handle_empty(resp).await
    }

    /// Discard the transaction and everything staged in it.
    pub async fn close_transaction(&self, id: &str) -> Result<(), Error> {
        let url = self.url(&["transactions", id])?;
        let resp = self.send(Method::DELETE, url, &[], None).await?;
        Self::handle_empty(resp).await
    }

    // ── Configuration objects ────────────────────────────────────────

    /// List every object of kind `T` in `scope`.
    ///
    /// With a transaction id, the listing reflects changes staged in it.
    pub async fn list<T: ConfigObject>(
        &self,
        scope: Scope<'_>,
        transaction: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.object_url::<T>(scope, None)?;
        let resp = self
            .send(Method::GET, url, &Self::transaction_query(transaction), None)
            .await?;
        let body: ListBody<T> = Self::handle_response(resp).await?;
        Ok(body.into_items())
    }

    /// Fetch a single object of kind `T` by name.
    pub async fn get<T: ConfigObject>(
        &self,
        scope: Scope<'_>,
        name: &str,
        transaction: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.object_url::<T>(scope, Some(name))?;
        let resp = self
            .send(Method::GET, url, &Self::transaction_query(transaction), None)
            .await?;
        let body: ItemBody<T> = Self::handle_response(resp).await?;
        Ok(body.into_item())
    }

    /// Create `object` in `scope`.
    pub async fn create<T: ConfigObject>(
        &self,
        scope: Scope<'_>,
        object: &T,
        transaction: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.object_url::<T>(scope, None)?;
        let body = serde_json::to_value(object).map_err(|e| Error::Deserialization {
            message: format!("failed to encode {}: {e}", T::KIND),
            body: String::new(),
        })?;
        let resp = self
            .send(
                Method::POST,
                url,
                &Self::transaction_query(transaction),
                Some(&body),
            )
            .await?;
        Self::handle_empty(resp).await
    }

    /// Delete the object of kind `T` named `name` from `scope`.
    pub async fn delete<T: ConfigObject>(
        &self,
        scope: Scope<'_>,
        name: &str,
        transaction: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.object_url::<T>(scope, Some(name))?;
        let resp = self
            .send(
                Method::DELETE,
                url,
                &Self::transaction_query(transaction),
                None,
            )
            .await?;
        Self::handle_empty(resp).await
    }
}
