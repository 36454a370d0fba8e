//! Turns an endpoint descriptor and the user's options into a concrete request.

use crate::catalog::{EndpointDescriptor, ParamLocation};
use crate::error::Error;
use reqwest::Method;
use std::collections::HashMap;
use std::str::FromStr;

/// A request with every parameter substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    /// URL template with path parameters substituted and the query string appended.
    pub path: String,
    pub body: Option<String>,
}

/// Builds the request for `descriptor` from options keyed `--<paramName>`.
///
/// Declared parameters that were not given are skipped. Required parameters
/// are expected to have been validated already.
///
/// # Errors
///
/// Returns an error if the HTTP method is invalid, or the underlying I/O
/// error if an `@file` body cannot be read.
pub fn build_request(
    descriptor: &EndpointDescriptor,
    parameters: &HashMap<String, String>,
) -> Result<PreparedRequest, Error> {
    let method = Method::from_str(&descriptor.http_method).map_err(|_| {
        Error::schema_error(format!(
            "invalid HTTP method '{}' for '{}'",
            descriptor.http_method, descriptor.command_name
        ))
    })?;

    let mut path = descriptor.url_template.clone();
    let mut query = Vec::new();
    let mut body = None;

    for param in &descriptor.parameters {
        let Some(value) = parameters.get(&format!("--{}", param.name)) else {
            continue;
        };

        match param.location {
            ParamLocation::Path => {
                path = path.replace(
                    &format!("{{{}}}", param.name),
                    &urlencoding::encode(value),
                );
            }
            ParamLocation::Query => {
                query.push(format!(
                    "{}={}",
                    urlencoding::encode(&param.name),
                    urlencoding::encode(value)
                ));
            }
            ParamLocation::Body => {
                body = Some(resolve_body(value)?);
            }
        }
    }

    if !query.is_empty() {
        path.push('?');
        path.push_str(&query.join("&"));
    }

    Ok(PreparedRequest { method, path, body })
}

/// Resolves a body option: inline JSON text, or `@path` for a file's contents.
/// The path may use `~` and `$VAR`.
///
/// # Errors
///
/// Returns a validation error if the path names an unset variable, and the
/// I/O error unchanged if the file cannot be read.
pub fn resolve_body(value: &str) -> Result<String, Error> {
    let Some(file) = value.strip_prefix('@') else {
        return Ok(value.to_string());
    };

    let expanded = shellexpand::full(file).map_err(|e| Error::invalid_body_path(file, e))?;
    tracing::debug!(
        target: "cluster_cli::request",
        "reading request body from {}",
        expanded
    );
    Ok(std::fs::read_to_string(expanded.as_ref())?)
}
