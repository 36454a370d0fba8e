//! Per-run invocation model.
//!
//! Everything a single run needs is gathered into an [`Invocation`] built once
//! in `main` and passed by reference to the dispatch engine. Nothing here is
//! global or mutable after construction.

use crate::constants;
use std::collections::HashMap;
use std::fmt;

/// The user's command phrase and the options given after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCommand {
    /// Space-joined verb phrase, e.g. `"list members"`.
    pub command: String,

    /// Option flag (as typed, e.g. `"--name"` or `"-h"`) to value.
    /// Flags given without a value map to [`constants::FLAG_PRESENT`].
    pub parameters: HashMap<String, String>,
}

impl UserCommand {
    #[must_use]
    pub fn new(command: impl Into<String>, parameters: HashMap<String, String>) -> Self {
        Self {
            command: command.into(),
            parameters,
        }
    }

    /// Looks up the value of `--<name>`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(&format!("--{name}")).map(String::as_str)
    }

    /// Returns the first value found under any of `keys`.
    #[must_use]
    pub fn option(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.parameters.get(*key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn has_option(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.parameters.contains_key(*key))
    }

    #[must_use]
    pub fn wants_help(&self) -> bool {
        self.has_option(&[constants::OPT_HELP_SHORT, constants::OPT_HELP_LONG])
    }
}

/// Where and how to reach the management API.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Locator address, e.g. `https://locator.example.com:7070`.
    pub base_address: String,
    pub username: String,
    pub password: String,
    /// Send the password as a bearer token instead of basic credentials.
    pub use_token_auth: bool,
}

impl ConnectionContext {
    #[must_use]
    pub fn new(
        base_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_address: base_address.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            use_token_auth: false,
        }
    }

    /// Returns a copy with token authentication switched on or off.
    #[must_use]
    pub fn with_token_auth(&self, enabled: bool) -> Self {
        Self {
            use_token_auth: enabled,
            ..self.clone()
        }
    }
}

// Keep the password out of debug logs.
impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("base_address", &self.base_address)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("use_token_auth", &self.use_token_auth)
            .finish()
    }
}

/// Everything known about the current run.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Target as typed (URL or configured alias).
    pub target: String,
    pub command: UserCommand,
    pub connection: ConnectionContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_with(pairs: &[(&str, &str)]) -> UserCommand {
        let parameters = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        UserCommand::new("list members", parameters)
    }

    #[test]
    fn test_parameter_lookup_uses_double_dash_prefix() {
        let command = command_with(&[("--name", "server1"), ("-h", "true")]);
        assert_eq!(command.parameter("name"), Some("server1"));
        assert_eq!(command.parameter("h"), None);
        assert!(command.wants_help());
    }

    #[test]
    fn test_option_returns_first_matching_key() {
        let command = command_with(&[("--table", ".result[]")]);
        assert_eq!(command.option(&["-t", "--table"]), Some(".result[]"));
        assert!(!command.has_option(&["--jq"]));
    }

    #[test]
    fn test_connection_context_trims_trailing_slash() {
        let connection = ConnectionContext::new("https://locator:7070/", "admin", "secret");
        assert_eq!(connection.base_address, "https://locator:7070");
        assert!(!connection.use_token_auth);
        assert!(connection.with_token_auth(true).use_token_auth);
    }

    #[test]
    fn test_connection_context_debug_redacts_password() {
        let connection = ConnectionContext::new("https://locator:7070", "admin", "secret");
        let debug = format!("{connection:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
