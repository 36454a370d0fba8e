use super::schema::SampleGenerator;
use super::{EndpointCatalog, EndpointDescriptor, ParamLocation, ParamSpec};
use crate::constants;
use crate::error::Error;
use crate::invocation::ConnectionContext;
use crate::transport::{HttpRequest, Transport};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Top-level shape of the API description document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDocs {
    #[serde(default)]
    base_path: Option<String>,
    #[serde(default)]
    auth_token_enabled: Value,
    #[serde(default)]
    paths: Map<String, Value>,
    #[serde(default)]
    definitions: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOperation {
    summary: Option<String>,
    operation_id: Option<String>,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    #[serde(rename = "x-jqFilter")]
    jq_filter: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    name: String,
    #[serde(rename = "in")]
    location: String,
    #[serde(default)]
    required: bool,
    schema: Option<Value>,
}

/// Fetches the API description and builds the catalog.
///
/// Exactly one GET is sent to `{base_address}/management/experimental/api-docs`.
///
/// # Errors
///
/// Returns a discovery error if the endpoint cannot be reached or the body is
/// not a valid description, and an HTTP error for non-success statuses.
#[allow(clippy::future_not_send)]
pub async fn build_catalog<T: Transport>(
    transport: &T,
    connection: &ConnectionContext,
) -> Result<EndpointCatalog, Error> {
    let url = format!("{}{}", connection.base_address, constants::DISCOVERY_PATH);
    let response = transport
        .send(&HttpRequest::get(url.clone()), connection)
        .await
        .map_err(|e| Error::unreachable(&url, e))?;

    if !response.is_success() {
        return Err(Error::http_status(&url, response.status, &response.body));
    }

    let catalog = parse_catalog(&response.body)?;
    info!(
        target: "cluster_cli::catalog",
        "discovered {} commands from {url}",
        catalog.len()
    );
    Ok(catalog)
}

/// Parses an API description document into a catalog.
///
/// A body schema that cannot be expanded only affects its own parameter: the
/// reason is kept on the [`ParamSpec`] and the rest of the catalog is built.
///
/// # Errors
///
/// Returns a discovery error for malformed JSON or operations.
pub fn parse_catalog(body: &str) -> Result<EndpointCatalog, Error> {
    let docs: ApiDocs =
        serde_json::from_str(body).map_err(|e| Error::invalid_response(body, e))?;

    let base_path = docs
        .base_path
        .as_deref()
        .unwrap_or(constants::DEFAULT_BASE_PATH);
    let mut catalog = EndpointCatalog::new(base_path, is_enabled(&docs.auth_token_enabled));
    let samples = SampleGenerator::new(&docs.definitions);

    for (path, item) in &docs.paths {
        let Value::Object(methods) = item else {
            debug!(target: "cluster_cli::catalog", "skipping non-object path item '{path}'");
            continue;
        };

        for (method, operation) in methods {
            let method = method.to_lowercase();
            if !constants::HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let raw: RawOperation = serde_json::from_value(operation.clone())
                .map_err(|e| Error::invalid_response(body, e))?;
            if let Some(descriptor) = transform_operation(path, &method, raw, &samples) {
                catalog.insert(descriptor);
            }
        }
    }

    Ok(catalog)
}

fn schema_reason(err: Error) -> String {
    match err {
        Error::Internal { message, .. } => message.into_owned(),
        other => other.to_string(),
    }
}

fn is_enabled(flag: &Value) -> bool {
    match flag {
        Value::Bool(enabled) => *enabled,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn transform_operation(
    path: &str,
    method: &str,
    raw: RawOperation,
    samples: &SampleGenerator<'_>,
) -> Option<EndpointDescriptor> {
    let Some(command_name) = raw
        .summary
        .filter(|s| !s.trim().is_empty())
        .or(raw.operation_id)
    else {
        warn!(
            target: "cluster_cli::catalog",
            "skipping {} {path}: operation has neither summary nor operationId",
            method.to_uppercase()
        );
        return None;
    };

    let mut parameters = Vec::with_capacity(raw.parameters.len());
    for param in raw.parameters {
        let Some(location) = ParamLocation::parse(&param.location) else {
            debug!(
                target: "cluster_cli::catalog",
                "'{command_name}': ignoring {} parameter '{}'",
                param.location,
                param.name
            );
            continue;
        };

        let mut spec = ParamSpec::new(param.name, location, param.required);
        if location == ParamLocation::Body {
            if let Some(schema) = &param.schema {
                spec = match samples.sample(schema) {
                    Ok(sample) => spec.with_body_sample(sample),
                    Err(err) => {
                        let reason = schema_reason(err);
                        warn!(
                            target: "cluster_cli::catalog",
                            "'{command_name}': no sample for --{}: {reason}",
                            spec.name
                        );
                        spec.with_sample_error(reason)
                    }
                };
            }
        }
        parameters.push(spec);
    }

    Some(EndpointDescriptor {
        http_method: method.to_uppercase(),
        url_template: path.to_string(),
        command_name,
        parameters,
        default_filter: raw.jq_filter.filter(|f| !f.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_entry_per_operation() {
        let docs = json!({
            "paths": {
                "/v1/members": {
                    "get": {"summary": "list members", "x-jqFilter": ".result[]"}
                },
                "/v1/regions": {
                    "get": {"summary": "list regions"},
                    "post": {"summary": "create region"},
                    "parameters": [{"name": "ignored", "in": "query"}]
                }
            }
        });
        let catalog = parse_catalog(&docs.to_string()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.base_path(), "/management");
        assert!(!catalog.token_auth_enabled());

        let create = catalog.get("create region").unwrap();
        assert_eq!(create.http_method, "POST");
        assert_eq!(create.url_template, "/v1/regions");
        assert_eq!(
            catalog.get("list members").unwrap().default_filter.as_deref(),
            Some(".result[]")
        );
    }

    #[test]
    fn test_operation_id_fallback_and_skip() {
        let docs = json!({
            "paths": {
                "/a": {"get": {"operationId": "getA"}},
                "/b": {"get": {"parameters": []}}
            }
        });
        let catalog = parse_catalog(&docs.to_string()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("getA").is_some());
    }

    #[test]
    fn test_token_auth_flag_and_base_path() {
        let docs = json!({"authTokenEnabled": "TRUE", "basePath": "/mgmt/", "paths": {}});
        let catalog = parse_catalog(&docs.to_string()).unwrap();
        assert!(catalog.token_auth_enabled());
        assert_eq!(catalog.base_path(), "/mgmt");
    }

    #[test]
    fn test_unsupported_locations_are_dropped() {
        let docs = json!({
            "paths": {
                "/v1/members/{id}": {
                    "get": {
                        "summary": "describe member",
                        "parameters": [
                            {"name": "id", "in": "path", "required": true},
                            {"name": "X-Trace", "in": "header"}
                        ]
                    }
                }
            }
        });
        let catalog = parse_catalog(&docs.to_string()).unwrap();
        let params = &catalog.get("describe member").unwrap().parameters;
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].location, ParamLocation::Path);
        assert!(params[0].required);
    }

    #[test]
    fn test_malformed_json_reports_body() {
        let err = parse_catalog("not json").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid response not json"));
    }
}
