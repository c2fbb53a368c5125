//! REST transport for the scheduler's HTTP API.
//!
//! Thin wrapper over a hyper client: one request per call, no pooled
//! sessions beyond what the legacy client provides, no retries. Error
//! mapping is the contract here — 404 and 204 become the absence
//! variants of [`RemoteError`], everything else non-2xx becomes
//! [`RemoteError::Api`] with the body text preserved.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::RemoteClient;
use crate::error::{RemoteError, RemoteResult};
use crate::types::{RemoteJob, RemoteNode, UpdateNode};

/// Auth token header understood by the scheduler's REST daemon.
const AUTH_HEADER: &str = "x-auth-token";

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the scheduler's REST daemon, e.g. `http://ctl:6820`.
    pub base_url: String,
    /// Token sent in the auth header, when the daemon requires one.
    pub auth_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RestConfig {
    /// Config with a 10s timeout and no auth token.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the auth token.
    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct NodesEnvelope {
    #[serde(default)]
    nodes: Vec<RemoteNode>,
}

#[derive(Deserialize)]
struct JobsEnvelope {
    #[serde(default)]
    jobs: Vec<RemoteJob>,
}

/// REST implementation of [`RemoteClient`].
pub struct RestClient {
    config: RestConfig,
    http: Client<HttpConnector, Full<Bytes>>,
}

impl RestClient {
    /// Create a client for the daemon described by `config`.
    pub fn new(config: RestConfig) -> Self {
        let http = Client::builder(TokioExecutor::new()).build_http();
        Self { config, http }
    }

    async fn send(
        &self,
        method: http::Method,
        path: &str,
        body: Option<Bytes>,
    ) -> RemoteResult<Bytes> {
        let uri = format!("{}{}", self.config.base_url, path);
        let mut builder = http::Request::builder()
            .method(method)
            .uri(&uri)
            .header("user-agent", "gridlink/0.1");
        if let Some(token) = &self.config.auth_token {
            builder = builder.header(AUTH_HEADER, token);
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Full::new(body)),
            None => builder.body(Full::new(Bytes::new())),
        }
        .map_err(|e| RemoteError::Http(e.to_string()))?;

        debug!(%uri, "remote scheduler request");
        let resp = tokio::time::timeout(self.config.timeout, self.http.request(req))
            .await
            .map_err(|_| RemoteError::Http(format!("request timed out: {uri}")))?
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?
            .to_bytes();
        classify(status, body, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        let body = self.send(http::Method::GET, path, None).await?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Map a response status onto the error taxonomy.
fn classify(status: http::StatusCode, body: Bytes, path: &str) -> RemoteResult<Bytes> {
    match status {
        http::StatusCode::NOT_FOUND => Err(RemoteError::NotFound(path.to_string())),
        http::StatusCode::NO_CONTENT => Err(RemoteError::NoContent),
        s if s.is_success() => Ok(body),
        s => Err(RemoteError::Api {
            status: s.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        }),
    }
}

#[async_trait]
impl RemoteClient for RestClient {
    async fn get_node(&self, name: &str) -> RemoteResult<RemoteNode> {
        self.get_json(&format!("/nodes/{name}")).await
    }

    async fn list_nodes(&self) -> RemoteResult<Vec<RemoteNode>> {
        let envelope: NodesEnvelope = self.get_json("/nodes").await?;
        Ok(envelope.nodes)
    }

    async fn list_jobs(&self) -> RemoteResult<Vec<RemoteJob>> {
        let envelope: JobsEnvelope = self.get_json("/jobs").await?;
        Ok(envelope.jobs)
    }

    async fn update_node(&self, name: &str, update: &UpdateNode) -> RemoteResult<()> {
        let body = serde_json::to_vec(update).map_err(|e| RemoteError::Decode(e.to_string()))?;
        match self
            .send(
                http::Method::POST,
                &format!("/nodes/{name}"),
                Some(Bytes::from(body)),
            )
            .await
        {
            // 204 on a write means "applied, nothing to return".
            Ok(_) | Err(RemoteError::NoContent) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_trailing_slash() {
        let config = RestConfig::new("http://ctl:6820/");
        assert_eq!(config.base_url, "http://ctl:6820");
    }

    #[test]
    fn config_builders() {
        let config = RestConfig::new("http://ctl:6820")
            .with_auth_token("secret")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn classify_not_found() {
        let got = classify(http::StatusCode::NOT_FOUND, Bytes::new(), "/nodes/n0");
        assert_eq!(got, Err(RemoteError::NotFound("/nodes/n0".into())));
    }

    #[test]
    fn classify_no_content() {
        let got = classify(http::StatusCode::NO_CONTENT, Bytes::new(), "/nodes");
        assert_eq!(got, Err(RemoteError::NoContent));
    }

    #[test]
    fn classify_server_error() {
        let got = classify(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(b"boom"),
            "/jobs",
        );
        assert_eq!(
            got,
            Err(RemoteError::Api {
                status: 500,
                message: "boom".into(),
            })
        );
    }

    #[test]
    fn classify_success_passes_body() {
        let got = classify(http::StatusCode::OK, Bytes::from_static(b"{}"), "/nodes");
        assert_eq!(got.unwrap(), Bytes::from_static(b"{}"));
    }

    #[test]
    fn envelopes_tolerate_missing_collections() {
        let nodes: NodesEnvelope = serde_json::from_str("{}").unwrap();
        assert!(nodes.nodes.is_empty());
        let jobs: JobsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(jobs.jobs.is_empty());
    }
}
