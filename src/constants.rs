//! Centralized string constants for the cluster CLI
//!
//! This module contains commonly used string literals to:
//! - Reduce string duplication
//! - Improve maintainability
//! - Ensure consistency across the codebase

// HTTP Headers
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

// Content Types
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Discovery
pub const DISCOVERY_PATH: &str = "/management/experimental/api-docs";
pub const DEFAULT_BASE_PATH: &str = "/management";
pub const DEFINITION_REF_PREFIX: &str = "#/definitions/";

// Maximum chain of `$ref` hops when expanding body schemas into samples
pub const MAX_SCHEMA_DEPTH: usize = 32;

// Sample placeholders for body schemas
pub const SAMPLE_STRING: &str = "string";
pub const SAMPLE_INTEGER: i64 = 0;

// Universal options recognised in every command
pub const OPT_HELP_SHORT: &str = "-h";
pub const OPT_HELP_LONG: &str = "--help";
pub const OPT_TABLE_SHORT: &str = "-t";
pub const OPT_TABLE_LONG: &str = "--table";
pub const OPT_JQ: &str = "--jq";
pub const OPT_USER_SHORT: &str = "-u";
pub const OPT_USER_LONG: &str = "--user";
pub const OPT_PASSWORD_SHORT: &str = "-p";
pub const OPT_PASSWORD_LONG: &str = "--password";

/// Value recorded for flags given without a value.
pub const FLAG_PRESENT: &str = "true";

/// Command phrase that lists all available operations.
pub const COMMANDS_PHRASE: &str = "commands";

// Filter engine in-band signals
pub const SIGNAL_HALT: &str = "HALT:";
pub const SIGNAL_STDERR: &str = "STDERR:";
pub const IDENTITY_FILTER: &str = ".";

// Table rendering
pub const MIN_COLUMN_WIDTH: usize = 5;
pub const DEFAULT_TERMINAL_WIDTH: usize = 120;
pub const ELLIPSIS: char = '…';
pub const COLUMN_SEPARATOR: char = '|';
pub const VALUE_COLUMN: &str = "value";

// Remote status field inspected after every operation call
pub const FIELD_STATUS_CODE: &str = "statusCode";
pub const FIELD_STATUS_MESSAGE: &str = "statusMessage";
pub const SUCCESS_STATUS_CODES: &[&str] = &["OK", "ACCEPTED", "IN_PROGRESS"];

// Environment Variables
pub const ENV_TARGET: &str = "CLUSTER_CLI_TARGET";
pub const ENV_USERNAME: &str = "CLUSTER_CLI_USERNAME";
pub const ENV_PASSWORD: &str = "CLUSTER_CLI_PASSWORD";
pub const ENV_CONFIG_DIR: &str = "CLUSTER_CLI_CONFIG_DIR";
pub const ENV_LOG: &str = "CLUSTER_CLI_LOG";
pub const ENV_LOG_FORMAT: &str = "CLUSTER_CLI_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "CLUSTER_CLI_LOG_FILE";
pub const ENV_LOG_MAX_BODY: &str = "CLUSTER_CLI_LOG_MAX_BODY";
pub const ENV_TABLE_WIDTH: &str = "CLUSTER_CLI_TABLE_WIDTH";
pub const ENV_COLUMNS: &str = "COLUMNS";

// Files
pub const CONFIG_FILENAME: &str = "config.toml";
pub const CONFIG_DIR_NAME: &str = "cluster-cli";

// Common Response Messages
pub const EMPTY_RESPONSE: &str = "(empty response)";

// Error Context Messages
pub const ERR_CONNECTION: &str = "Check that the cluster locator is running and accessible.";
pub const ERR_TIMEOUT: &str = "The cluster may be slow or unresponsive. Try again later.";
pub const ERR_FILE_NOT_FOUND: &str = "Check that the file path is correct and the file exists.";
pub const ERR_PERMISSION: &str = "Check file permissions or run with appropriate privileges.";
pub const ERR_JSON_SYNTAX: &str = "Check that your request body or response contains valid JSON.";
pub const ERR_TOML_SYNTAX: &str = "Check that your configuration file is valid TOML syntax.";
pub const ERR_API_CREDENTIALS: &str = "Check the username and password for this cluster.";

// HTTP Methods
pub const HTTP_METHODS: &[&str] = &["get", "post", "put", "delete", "patch", "head", "options"];

// Parameter Locations
pub const PARAM_LOCATION_PATH: &str = "path";
pub const PARAM_LOCATION_QUERY: &str = "query";
pub const PARAM_LOCATION_BODY: &str = "body";

// Schema Types
pub const SCHEMA_TYPE_STRING: &str = "string";
pub const SCHEMA_TYPE_NUMBER: &str = "number";
pub const SCHEMA_TYPE_INTEGER: &str = "integer";
pub const SCHEMA_TYPE_BOOLEAN: &str = "boolean";
pub const SCHEMA_TYPE_ARRAY: &str = "array";
pub const SCHEMA_TYPE_OBJECT: &str = "object";

/// Check if a header name carries credentials and must not be logged
#[must_use]
pub fn is_auth_header(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "authorization" | "proxy-authorization" | "cookie" | "set-cookie"
    )
}

/// Returns true when the option key is one of the universal options
/// rather than an endpoint parameter.
#[must_use]
pub fn is_universal_option(key: &str) -> bool {
    matches!(
        key,
        OPT_HELP_SHORT
            | OPT_HELP_LONG
            | OPT_TABLE_SHORT
            | OPT_TABLE_LONG
            | OPT_JQ
            | OPT_USER_SHORT
            | OPT_USER_LONG
            | OPT_PASSWORD_SHORT
            | OPT_PASSWORD_LONG
    )
}
