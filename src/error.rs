use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{kind}: {message}")]
    Internal {
        kind: ErrorKind,
        message: Cow<'static, str>,
        context: Option<ErrorContext>,
    },
}

/// Broad category of a domain error, used for display and structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The discovery endpoint could not be reached or returned garbage.
    Discovery,
    /// The command phrase did not resolve to an operation.
    Command,
    /// A required parameter was missing or malformed.
    Validation,
    /// A body schema could not be turned into a sample.
    Schema,
    /// The filter expression failed to parse or evaluate.
    Filter,
    /// The remote API reported a failure inside its own payload.
    Remote,
    /// The remote API answered with a non-success HTTP status.
    Http,
    /// Local configuration problem (targets, config file, transport setup).
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovery => "Discovery",
            Self::Command => "Command",
            Self::Validation => "Validation",
            Self::Schema => "Schema",
            Self::Filter => "Filter",
            Self::Remote => "Remote",
            Self::Http => "HTTP",
            Self::Config => "Configuration",
        };
        f.write_str(name)
    }
}

/// Extra information attached to a domain error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// A hint printed after the message.
    pub suggestion: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn with_suggestion(suggestion: impl Into<String>) -> Self {
        Self {
            suggestion: Some(suggestion.into()),
        }
    }
}

/// JSON representation of an error for structured output
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonError {
    pub error_type: String,
    pub message: String,
    pub context: Option<String>,
}

impl Error {
    fn internal(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Internal {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Attaches a suggestion to a domain error. Other variants are returned unchanged.
    #[must_use]
    pub fn with_suggestion(self, suggestion: impl Into<String>) -> Self {
        match self {
            Self::Internal { kind, message, .. } => Self::Internal {
                kind,
                message,
                context: Some(ErrorContext::with_suggestion(suggestion)),
            },
            other => other,
        }
    }

    /// The discovery endpoint could not be contacted.
    #[must_use]
    pub fn unreachable(url: &str, cause: impl fmt::Display) -> Self {
        Self::internal(
            ErrorKind::Discovery,
            format!("unable to reach {url}: {cause}"),
        )
    }

    /// The discovery endpoint answered with something that is not an API description.
    #[must_use]
    pub fn invalid_response(body: &str, cause: impl fmt::Display) -> Self {
        Self::internal(
            ErrorKind::Discovery,
            format!("invalid response {body}: {cause}"),
        )
    }

    #[must_use]
    pub fn unknown_command(command: &str) -> Self {
        Self::internal(ErrorKind::Command, format!("invalid command '{command}'"))
    }

    #[must_use]
    pub fn missing_target() -> Self {
        Self::internal(ErrorKind::Config, "no target specified")
            .with_suggestion("Pass a cluster URL or alias as the first argument, or set CLUSTER_CLI_TARGET.")
    }

    #[must_use]
    pub fn unknown_target(target: &str) -> Self {
        Self::internal(ErrorKind::Config, format!("unknown target '{target}'")).with_suggestion(
            format!("Add a [targets.{target}] entry to config.toml or pass the cluster URL directly."),
        )
    }

    #[must_use]
    pub fn missing_parameter(name: &str) -> Self {
        Self::internal(
            ErrorKind::Validation,
            format!("required parameter '{name}' not specified"),
        )
        .with_suggestion(format!("Pass --{name} <value>, or -h to see the command usage."))
    }

    /// An `@file` body path could not be expanded.
    #[must_use]
    pub fn invalid_body_path(path: &str, cause: impl fmt::Display) -> Self {
        Self::internal(
            ErrorKind::Validation,
            format!("cannot expand body file path '{path}': {cause}"),
        )
    }

    #[must_use]
    pub fn schema_error(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::internal(ErrorKind::Schema, reason)
    }

    #[must_use]
    pub fn filter_error(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::internal(ErrorKind::Filter, reason)
    }

    /// A failure reported by the remote API inside an otherwise readable payload.
    #[must_use]
    pub fn remote(status_code: &str, message: &str) -> Self {
        Self::internal(ErrorKind::Remote, format!("{status_code}: {message}"))
    }

    #[must_use]
    pub fn http_status(url: &str, status: u16, body: &str) -> Self {
        let body = if body.is_empty() {
            crate::constants::EMPTY_RESPONSE
        } else {
            body
        };
        Self::internal(ErrorKind::Http, format!("{url} returned {status}: {body}"))
    }

    #[must_use]
    pub fn invalid_config(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::internal(ErrorKind::Config, reason)
    }

    /// Returns the domain kind for `Internal` errors.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Internal { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Convert error to JSON representation for structured output
    #[must_use]
    pub fn to_json(&self) -> JsonError {
        let (error_type, message, context) = match self {
            Self::Internal {
                kind,
                message,
                context,
            } => (
                kind.to_string(),
                message.to_string(),
                context.as_ref().and_then(|c| c.suggestion.clone()),
            ),
            Self::Io(io_err) => {
                let context = match io_err.kind() {
                    std::io::ErrorKind::NotFound => Some(crate::constants::ERR_FILE_NOT_FOUND),
                    std::io::ErrorKind::PermissionDenied => Some(crate::constants::ERR_PERMISSION),
                    _ => None,
                };
                (
                    "FileSystem".to_string(),
                    io_err.to_string(),
                    context.map(str::to_string),
                )
            }
            Self::Network(req_err) => {
                let context = if req_err.is_connect() {
                    Some(crate::constants::ERR_CONNECTION)
                } else if req_err.is_timeout() {
                    Some(crate::constants::ERR_TIMEOUT)
                } else {
                    None
                };
                (
                    "Network".to_string(),
                    req_err.to_string(),
                    context.map(str::to_string),
                )
            }
            Self::Json(json_err) => (
                "JSONParsing".to_string(),
                json_err.to_string(),
                Some(crate::constants::ERR_JSON_SYNTAX.to_string()),
            ),
            Self::Toml(toml_err) => (
                "TOMLParsing".to_string(),
                toml_err.to_string(),
                Some(crate::constants::ERR_TOML_SYNTAX.to_string()),
            ),
        };

        JsonError {
            error_type,
            message,
            context,
        }
    }
}
