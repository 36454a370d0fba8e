//! Sequences one run: discover, resolve, validate, call, format.

use crate::catalog::{build_catalog, normalize_phrase, EndpointDescriptor, ParamLocation};
use crate::constants;
use crate::engine::request::build_request;
use crate::error::Error;
use crate::format::{format_response, JsonFilter, OutputMode, TableLayout};
use crate::invocation::{Invocation, UserCommand};
use crate::suggestions;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use serde_json::Value;
use std::fmt::Write as _;
use tracing::{debug, info};

/// What a run produced, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command list. `unresolved` holds the phrase that matched nothing.
    Commands {
        names: Vec<String>,
        unresolved: Option<String>,
    },
    /// Usage synopsis for one command.
    Help(String),
    /// Formatted response body; empty when the server sent no body.
    Response(String),
}

impl Outcome {
    /// The error to report after listing commands for an unresolved phrase.
    #[must_use]
    pub fn unresolved_error(&self) -> Option<Error> {
        match self {
            Self::Commands {
                names,
                unresolved: Some(phrase),
            } => Some(suggestions::unknown_command_error(
                phrase,
                names.iter().map(String::as_str),
            )),
            _ => None,
        }
    }
}

/// Runs the invocation against the remote API.
///
/// Exactly one discovery request is sent. At most one operation request
/// follows, and only after every required parameter has been supplied.
///
/// # Errors
///
/// Every failure is terminal: discovery, validation, body file I/O,
/// transport, remote status, and formatting errors are all returned as-is.
#[allow(clippy::future_not_send)]
pub async fn dispatch<T: Transport>(
    invocation: &Invocation,
    transport: &T,
    filter: &dyn JsonFilter,
    layout: &TableLayout,
) -> Result<Outcome, Error> {
    let catalog = build_catalog(transport, &invocation.connection).await?;
    let command = &invocation.command;
    let phrase = normalize_phrase(&command.command);
    let names = || -> Vec<String> { catalog.command_names().map(str::to_string).collect() };

    if phrase.is_empty() || phrase == constants::COMMANDS_PHRASE {
        return Ok(Outcome::Commands {
            names: names(),
            unresolved: None,
        });
    }

    let Some(descriptor) = catalog.get(&phrase) else {
        return Ok(Outcome::Commands {
            names: names(),
            unresolved: Some(phrase),
        });
    };

    if command.wants_help() {
        return Ok(Outcome::Help(usage(descriptor)?));
    }

    validate_required(descriptor, command)?;
    log_undeclared_options(descriptor, command);

    let prepared = build_request(descriptor, &command.parameters)?;
    let url = format!(
        "{}{}{}",
        invocation.connection.base_address,
        catalog.base_path(),
        prepared.path
    );
    let connection = invocation
        .connection
        .with_token_auth(catalog.token_auth_enabled());

    info!(
        target: "cluster_cli::dispatch",
        command = %descriptor.command_name,
        method = %prepared.method,
        "calling {url}"
    );
    let request = HttpRequest {
        method: prepared.method,
        url,
        body: prepared.body,
    };
    let response = transport.send(&request, &connection).await?;
    check_remote_status(&request.url, &response)?;

    let mode = output_mode(command, descriptor);
    let output = format_response(&response.body, &mode, filter, layout)?;
    Ok(Outcome::Response(output))
}

/// Usage synopsis: the command, required options inline, optional options
/// bracketed, then a sample body for every body parameter that has one.
///
/// # Errors
///
/// Returns a schema error if a body parameter's schema could not be
/// expanded, and a JSON error if a sample cannot be serialized.
pub fn usage(descriptor: &EndpointDescriptor) -> Result<String, Error> {
    let mut text = descriptor.command_name.clone();
    for param in descriptor.required_parameters() {
        let _ = write!(text, " --{0} <{0}>", param.name);
    }
    for param in descriptor.optional_parameters() {
        let _ = write!(text, " [--{0} <{0}>]", param.name);
    }

    for param in &descriptor.parameters {
        if param.location != ParamLocation::Body {
            continue;
        }
        if let Some(reason) = &param.sample_error {
            return Err(Error::schema_error(format!(
                "'{}' --{}: {reason}",
                descriptor.command_name, param.name
            )));
        }
        if let Some(sample) = &param.body_sample {
            let _ = write!(
                text,
                "\n\n--{}:\n{}",
                param.name,
                serde_json::to_string_pretty(sample)?
            );
        }
    }
    Ok(text)
}

/// Fails on the first required parameter without a non-empty value.
///
/// # Errors
///
/// Returns a validation error naming the missing parameter.
pub fn validate_required(
    descriptor: &EndpointDescriptor,
    command: &UserCommand,
) -> Result<(), Error> {
    for param in descriptor.required_parameters() {
        let supplied = command
            .parameter(&param.name)
            .is_some_and(|value| !value.trim().is_empty());
        if !supplied {
            return Err(Error::missing_parameter(&param.name));
        }
    }
    Ok(())
}

fn log_undeclared_options(descriptor: &EndpointDescriptor, command: &UserCommand) {
    for key in command.parameters.keys() {
        if constants::is_universal_option(key) {
            continue;
        }
        let declared = key
            .strip_prefix("--")
            .is_some_and(|name| descriptor.declares(name));
        if !declared {
            debug!(
                target: "cluster_cli::dispatch",
                "'{}' does not declare option '{key}'; ignoring it",
                descriptor.command_name
            );
        }
    }
}

/// Rejects responses whose payload reports a failure status, then
/// non-success HTTP statuses.
///
/// # Errors
///
/// Returns a remote error for a failing `statusCode`, otherwise an HTTP
/// error for non-2xx responses.
pub fn check_remote_status(url: &str, response: &HttpResponse) -> Result<(), Error> {
    if let Ok(Value::Object(payload)) = serde_json::from_str::<Value>(&response.body) {
        if let Some(code) = payload
            .get(constants::FIELD_STATUS_CODE)
            .and_then(Value::as_str)
        {
            if !constants::SUCCESS_STATUS_CODES.contains(&code) {
                let message = payload
                    .get(constants::FIELD_STATUS_MESSAGE)
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let error = Error::remote(code, message);
                return Err(if code.starts_with("UNAUTH") {
                    error.with_suggestion(constants::ERR_API_CREDENTIALS)
                } else {
                    error
                });
            }
        }
    }

    if response.is_success() {
        return Ok(());
    }
    let error = Error::http_status(url, response.status, &response.body);
    Err(if matches!(response.status, 401 | 403) {
        error.with_suggestion(constants::ERR_API_CREDENTIALS)
    } else {
        error
    })
}

/// Chooses the output mode from `-t/--table` and `--jq`.
///
/// Table mode without an expression falls back to the command's default
/// filter, then to identity.
#[must_use]
pub fn output_mode(command: &UserCommand, descriptor: &EndpointDescriptor) -> OutputMode {
    let default_expression = || {
        descriptor
            .default_filter
            .clone()
            .unwrap_or_else(|| constants::IDENTITY_FILTER.to_string())
    };

    if let Some(value) = command.option(&[constants::OPT_TABLE_SHORT, constants::OPT_TABLE_LONG]) {
        return if value == constants::FLAG_PRESENT {
            OutputMode::Table(default_expression())
        } else {
            OutputMode::Table(value.to_string())
        };
    }

    match command.option(&[constants::OPT_JQ]) {
        Some(value) if value == constants::FLAG_PRESENT => OutputMode::Filtered(default_expression()),
        Some(value) => OutputMode::Filtered(value.to_string()),
        None => OutputMode::Json,
    }
}
