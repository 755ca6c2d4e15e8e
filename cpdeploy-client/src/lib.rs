//! HTTP client for the cPanel UAPI.
//!
//! Wraps the small slice of UAPI needed to drive a git deployment:
//! `VersionControl` for branch updates, `VersionControlDeployment` for
//! creating and listing deployments, and `Fileman` for reading deploy logs.
//! Every call goes through the same GET envelope handling, so endpoint
//! methods stay one-liners in their own modules.

mod deployments;
mod error;
mod fileman;
mod sse;
mod version_control;

use cpdeploy_core::dto::uapi::UapiResponse;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use error::{ClientError, Result};
pub use fileman::split_remote_path;
pub use sse::{EventStream, SseEvent};

/// cPanel API token credentials.
///
/// The token never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Renders the `Authorization` header value for UAPI token auth.
    fn header_value(&self) -> String {
        format!("cpanel {}:{}", self.username, self.token)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Client for the cPanel UAPI endpoints involved in a deployment.
///
/// Cheap to clone; the underlying [`reqwest::Client`] is shared.
#[derive(Debug, Clone)]
pub struct CpanelClient {
    base_url: String,
    repository_root: String,
    credentials: Credentials,
    client: reqwest::Client,
}

impl CpanelClient {
    /// Creates a new client rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Host portion of the UAPI endpoint, e.g.
    ///   `https://server.example:2083`. Trailing slashes are trimmed.
    /// * `repository_root` - Absolute path of the managed repository on the
    ///   server; sent with every call.
    /// * `credentials` - API token credentials for the cPanel account.
    pub fn new(base_url: &str, repository_root: &str, credentials: Credentials) -> Self {
        Self::with_client(base_url, repository_root, credentials, reqwest::Client::new())
    }

    /// Like [`CpanelClient::new`] but reusing an existing [`reqwest::Client`].
    pub fn with_client(
        base_url: &str,
        repository_root: &str,
        credentials: Credentials,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            repository_root: repository_root.to_string(),
            credentials,
            client,
        }
    }

    /// The base URL this client targets, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a UAPI call and unwraps the response envelope.
    ///
    /// Every UAPI function is a GET under `/execute/<Module>/<function>`;
    /// `repository_root` is appended to the query string alongside any
    /// call-specific `params`.
    pub(crate) async fn execute<T>(
        &self,
        module: &str,
        function: &str,
        params: &[(&str, &str)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/execute/{}/{}", self.base_url, module, function);
        debug!("Sending UAPI request to: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.credentials.header_value())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("repository_root", self.repository_root.as_str())])
            .query(params)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response<T>(response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::http(status, body));
        }

        let body = response.text().await?;
        let envelope: UapiResponse<T> =
            serde_json::from_str(&body).map_err(|err| ClientError::Parse(err.to_string()))?;

        if !envelope.status {
            return Err(ClientError::api(envelope.error_list()));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Parse("UAPI response carried no data".to_string()))
    }
}
