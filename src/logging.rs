//! Request and response logging utilities with automatic credential redaction.
//!
//! Authorization and cookie headers are always logged as `[REDACTED]`.
//! Response bodies are truncated at [`get_max_body_len`] characters.

use crate::constants;
use tracing::{debug, info, trace};

/// Redacts sensitive values from strings
#[must_use]
pub fn redact_sensitive_value(value: &str) -> String {
    if value.is_empty() {
        value.to_string()
    } else {
        "[REDACTED]".to_string()
    }
}

fn log_headers(label: &str, headers: &reqwest::header::HeaderMap) {
    debug!(target: "cluster_cli::transport", "{label}:");
    for (name, value) in headers {
        let header_str = name.as_str();
        let display_value = if constants::is_auth_header(header_str) {
            redact_sensitive_value(&String::from_utf8_lossy(value.as_bytes()))
        } else {
            String::from_utf8_lossy(value.as_bytes()).to_string()
        };
        debug!(
            target: "cluster_cli::transport",
            "  {}: {}",
            header_str,
            display_value
        );
    }
}

/// Logs an HTTP request with optional headers and body
pub fn log_request(
    method: &str,
    url: &str,
    headers: Option<&reqwest::header::HeaderMap>,
    body: Option<&str>,
) {
    info!(
        target: "cluster_cli::transport",
        "→ {} {}",
        method.to_uppercase(),
        url
    );

    if let Some(header_map) = headers {
        log_headers("Request headers", header_map);
    }

    if let Some(body_content) = body {
        trace!(
            target: "cluster_cli::transport",
            "Request body: {}",
            body_content
        );
    }
}

/// Logs an HTTP response with optional headers and body
pub fn log_response(
    status: u16,
    duration_ms: u128,
    headers: Option<&reqwest::header::HeaderMap>,
    body: Option<&str>,
    max_body_len: usize,
) {
    info!(
        target: "cluster_cli::transport",
        "← {} ({}ms)",
        status,
        duration_ms
    );

    if let Some(header_map) = headers {
        log_headers("Response headers", header_map);
    }

    log_response_body(body, max_body_len);
}

fn log_response_body(body: Option<&str>, max_body_len: usize) {
    let Some(body_content) = body else {
        return;
    };

    if body_content.chars().count() > max_body_len {
        let truncated: String = body_content.chars().take(max_body_len).collect();
        trace!(
            target: "cluster_cli::transport",
            "Response body: {} (truncated at {} chars)",
            truncated,
            max_body_len
        );
    } else {
        trace!(
            target: "cluster_cli::transport",
            "Response body: {}",
            body_content
        );
    }
}

/// Gets the maximum body length from `CLUSTER_CLI_LOG_MAX_BODY`
#[must_use]
pub fn get_max_body_len() -> usize {
    std::env::var(constants::ENV_LOG_MAX_BODY)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1000)
}
