//! HTTP exchange with the management API.
//!
//! The dispatch engine only talks to the [`Transport`] trait; [`HttpTransport`]
//! is the `reqwest` implementation used by the binary.

use crate::constants;
use crate::error::Error;
use crate::invocation::ConnectionContext;
use crate::logging;
use reqwest::header::HeaderValue;
use reqwest::Method;
use std::time::Instant;

/// A fully resolved request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Performs one request/response exchange.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends `request` using the credentials in `connection`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    async fn send(
        &self,
        request: &HttpRequest,
        connection: &ConnectionContext,
    ) -> Result<HttpResponse, Error>;
}

/// Installs the process-wide rustls crypto provider. Safe to call repeatedly.
pub fn install_crypto_provider() {
    #[cfg(not(windows))]
    let _ = rustls::crypto::ring::default_provider().install_default();
    #[cfg(windows)]
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// `reqwest` transport. Certificate validation is disabled because cluster
/// locators commonly run with self-signed certificates.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, Error> {
        install_crypto_provider();
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("cluster-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &HttpRequest,
        connection: &ConnectionContext,
    ) -> Result<HttpResponse, Error> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(
                constants::HEADER_ACCEPT,
                HeaderValue::from_static(constants::CONTENT_TYPE_JSON),
            );

        if connection.use_token_auth {
            builder = builder.bearer_auth(&connection.password);
        } else if !connection.username.is_empty() || !connection.password.is_empty() {
            builder = builder.basic_auth(&connection.username, Some(&connection.password));
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(
                    constants::HEADER_CONTENT_TYPE,
                    HeaderValue::from_static(constants::CONTENT_TYPE_JSON),
                )
                .body(body.clone());
        }

        let built = builder.build()?;
        logging::log_request(
            request.method.as_str(),
            &request.url,
            Some(built.headers()),
            request.body.as_deref(),
        );

        let started = Instant::now();
        let response = self.client.execute(built).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        logging::log_response(
            status,
            started.elapsed().as_millis(),
            Some(&headers),
            Some(&body),
            logging::get_max_body_len(),
        );

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let not_found = HttpResponse {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }

    #[test]
    fn test_get_request_has_no_body() {
        let request = HttpRequest::get("https://locator:7070/management/v1/members");
        assert_eq!(request.method, Method::GET);
        assert!(request.body.is_none());
    }
}
