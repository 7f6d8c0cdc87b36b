//! HTTP session seam.
//!
//! Everything above this module talks to the site through [`HttpSession`],
//! so the engine can be driven by an in-memory site in tests. The production
//! implementation wraps a cookie-carrying `reqwest::Client`; one client is one
//! server-side session.

use async_trait::async_trait;
use azubi_core::{AzubiError, ClientConfig, Result};
use reqwest::Client;
use std::sync::Arc;

/// Ordered `name=value` pairs of an urlencoded form body.
pub type FormFields = Vec<(String, String)>;

/// Status and decoded body of one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single logical session with the site (cookies live inside).
#[async_trait]
pub trait HttpSession: Send + Sync {
    async fn get(&self, url: &str) -> Result<PageResponse>;

    async fn post_form(
        &self,
        url: &str,
        form: &FormFields,
        headers: &[(&str, &str)],
    ) -> Result<PageResponse>;
}

/// Opens fresh sessions; `login` asks for a new one on every attempt.
pub trait SessionFactory: Send + Sync {
    fn open_session(&self) -> Result<Arc<dyn HttpSession>>;
}

/// Production session backed by `reqwest` with a cookie store.
pub struct ReqwestSession {
    client: Client,
}

impl ReqwestSession {
    pub fn new(user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent.to_string());
        }
        let client = builder
            .build()
            .map_err(|err| AzubiError::transport(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }

    async fn into_page(response: reqwest::Response) -> Result<PageResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| AzubiError::transport(format!("Failed to read response body: {err}")))?;
        Ok(PageResponse { status, body })
    }
}

#[async_trait]
impl HttpSession for ReqwestSession {
    async fn get(&self, url: &str) -> Result<PageResponse> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AzubiError::transport(format!("GET {url} failed: {err}")))?;
        Self::into_page(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &FormFields,
        headers: &[(&str, &str)],
    ) -> Result<PageResponse> {
        tracing::debug!("POST {} ({} fields)", url, form.len());
        let mut request = self.client.post(url).form(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|err| AzubiError::transport(format!("POST {url} failed: {err}")))?;
        Self::into_page(response).await
    }
}

/// Opens a [`ReqwestSession`] per login using the configured user agent.
#[derive(Debug, Clone)]
pub struct ReqwestSessionFactory {
    user_agent: Option<String>,
}

impl ReqwestSessionFactory {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
        }
    }
}

impl SessionFactory for ReqwestSessionFactory {
    fn open_session(&self) -> Result<Arc<dyn HttpSession>> {
        Ok(Arc::new(ReqwestSession::new(self.user_agent.as_deref())?))
    }
}
