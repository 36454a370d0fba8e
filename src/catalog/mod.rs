//! Endpoint catalog discovered from the management API description.
//!
//! The catalog maps each human command name (e.g. `"list members"`) to the
//! endpoint that implements it. It is rebuilt on every run and never cached.

pub mod discovery;
pub mod schema;

pub use discovery::{build_catalog, parse_catalog};

use crate::constants;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Where a parameter goes in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Body,
}

impl ParamLocation {
    /// Parses the `in` field of a declared parameter. Unsupported locations yield `None`.
    #[must_use]
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            constants::PARAM_LOCATION_PATH => Some(Self::Path),
            constants::PARAM_LOCATION_QUERY => Some(Self::Query),
            constants::PARAM_LOCATION_BODY => Some(Self::Body),
            _ => None,
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Path => constants::PARAM_LOCATION_PATH,
            Self::Query => constants::PARAM_LOCATION_QUERY,
            Self::Body => constants::PARAM_LOCATION_BODY,
        };
        f.write_str(name)
    }
}

/// A declared endpoint parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    /// Sample request body, only for body parameters with a schema.
    pub body_sample: Option<Value>,
    /// Why the body schema could not be expanded. Reported when the command's
    /// usage is requested.
    pub sample_error: Option<String>,
}

impl ParamSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParamLocation, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
            body_sample: None,
            sample_error: None,
        }
    }

    #[must_use]
    pub fn with_body_sample(mut self, sample: Value) -> Self {
        self.body_sample = Some(sample);
        self
    }

    #[must_use]
    pub fn with_sample_error(mut self, reason: impl Into<String>) -> Self {
        self.sample_error = Some(reason.into());
        self
    }
}

/// One operation of the management API.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    /// Uppercase HTTP method, e.g. `"GET"`.
    pub http_method: String,
    /// Path template relative to the management base path, e.g. `"/v1/regions/{id}"`.
    pub url_template: String,
    pub command_name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParamSpec>,
    /// Filter applied in table mode when the user gives none.
    pub default_filter: Option<String>,
}

impl EndpointDescriptor {
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParamSpec> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn optional_parameters(&self) -> impl Iterator<Item = &ParamSpec> {
        self.parameters.iter().filter(|p| !p.required)
    }

    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }
}

/// Collapses runs of whitespace so `"list   members "` and `"list members"` match.
#[must_use]
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All operations advertised by the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointCatalog {
    endpoints: BTreeMap<String, EndpointDescriptor>,
    token_auth_enabled: bool,
    base_path: String,
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            token_auth_enabled: false,
            base_path: constants::DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl EndpointCatalog {
    #[must_use]
    pub fn new(base_path: impl Into<String>, token_auth_enabled: bool) -> Self {
        Self {
            endpoints: BTreeMap::new(),
            token_auth_enabled,
            base_path: base_path.into().trim_end_matches('/').to_string(),
        }
    }

    /// Adds a descriptor under its command name. A later descriptor with the
    /// same name replaces the earlier one.
    pub fn insert(&mut self, descriptor: EndpointDescriptor) {
        let key = normalize_phrase(&descriptor.command_name);
        if let Some(previous) = self.endpoints.insert(key, descriptor) {
            tracing::warn!(
                target: "cluster_cli::catalog",
                "command '{}' ({} {}) was redefined by a later operation",
                previous.command_name,
                previous.http_method,
                previous.url_template
            );
        }
    }

    #[must_use]
    pub fn get(&self, phrase: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.get(&normalize_phrase(phrase))
    }

    /// Command names in lexical (byte) order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Whether the remote API accepts bearer tokens.
    #[must_use]
    pub const fn token_auth_enabled(&self) -> bool {
        self.token_auth_enabled
    }

    /// Prefix placed before every operation's URL template.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}
