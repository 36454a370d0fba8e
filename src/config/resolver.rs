use crate::config::is_url;
use crate::config::models::{GlobalConfig, TargetConfig};
use crate::constants;
use crate::error::Error;
use crate::invocation::{ConnectionContext, UserCommand};

/// Resolves a target and credentials into a [`ConnectionContext`].
pub struct ConnectionResolver<'a> {
    /// Global configuration containing named targets
    global_config: Option<&'a GlobalConfig>,
    /// Username from `CLUSTER_CLI_USERNAME`
    env_username: Option<String>,
    /// Password from `CLUSTER_CLI_PASSWORD`
    env_password: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Default for ConnectionResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ConnectionResolver<'a> {
    /// Creates a resolver reading credential overrides from the environment
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_config: None,
            env_username: non_empty(std::env::var(constants::ENV_USERNAME).ok()),
            env_password: non_empty(std::env::var(constants::ENV_PASSWORD).ok()),
        }
    }

    /// Sets the global configuration used to look up target aliases
    #[must_use]
    pub fn with_global_config(mut self, config: &'a GlobalConfig) -> Self {
        self.global_config = Some(config);
        self
    }

    /// Sets the environment credentials explicitly (overrides the process environment)
    #[must_use]
    pub fn with_env_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.env_username = non_empty(username);
        self.env_password = non_empty(password);
        self
    }

    /// Resolves the connection according to the priority hierarchy:
    /// 1. `-u/--user` and `-p/--password` on the command line
    /// 2. Environment variables: `CLUSTER_CLI_USERNAME`, `CLUSTER_CLI_PASSWORD`
    /// 3. Credentials stored with the target in `config.toml`
    ///
    /// The target is either a URL or an alias from `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no target is given or the alias is unknown.
    pub fn resolve(&self, target: &str, command: &UserCommand) -> Result<ConnectionContext, Error> {
        let target = target.trim();
        if target.is_empty() {
            return Err(Error::missing_target());
        }

        let stored = self.lookup(target)?;
        let url = stored.map_or(target, |t| t.url.as_str());

        let username = cli_value(command, &[constants::OPT_USER_SHORT, constants::OPT_USER_LONG])
            .or_else(|| self.env_username.clone())
            .or_else(|| stored.and_then(|t| t.username.clone()))
            .unwrap_or_default();
        let password = cli_value(
            command,
            &[constants::OPT_PASSWORD_SHORT, constants::OPT_PASSWORD_LONG],
        )
        .or_else(|| self.env_password.clone())
        .or_else(|| stored.and_then(|t| t.password.clone()))
        .unwrap_or_default();

        tracing::debug!(
            target: "cluster_cli::config",
            target_name = %target,
            url = %url,
            has_username = !username.is_empty(),
            has_password = !password.is_empty(),
            "resolved connection"
        );
        Ok(ConnectionContext::new(url, username, password))
    }

    fn lookup(&self, target: &str) -> Result<Option<&'a TargetConfig>, Error> {
        if is_url(target) {
            return Ok(None);
        }
        self.global_config
            .and_then(|config| config.targets.get(target))
            .map(Some)
            .ok_or_else(|| Error::unknown_target(target))
    }
}

/// A credential option counts only when it was given a value.
fn cli_value(command: &UserCommand, keys: &[&str]) -> Option<String> {
    command
        .option(keys)
        .filter(|v| *v != constants::FLAG_PRESENT && !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> GlobalConfig {
        let mut targets = HashMap::new();
        targets.insert(
            "prod".to_string(),
            TargetConfig {
                url: "https://locator.prod:7070/".to_string(),
                username: Some("stored-user".to_string()),
                password: Some("stored-pass".to_string()),
            },
        );
        GlobalConfig { targets }
    }

    fn command(pairs: &[(&str, &str)]) -> UserCommand {
        UserCommand::new(
            "list members",
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_alias_uses_stored_credentials() {
        let config = config();
        let resolver = ConnectionResolver::new()
            .with_global_config(&config)
            .with_env_credentials(None, None);
        let connection = resolver.resolve("prod", &command(&[])).unwrap();
        assert_eq!(connection.base_address, "https://locator.prod:7070");
        assert_eq!(connection.username, "stored-user");
        assert_eq!(connection.password, "stored-pass");
    }

    #[test]
    fn test_environment_beats_config() {
        let config = config();
        let resolver = ConnectionResolver::new()
            .with_global_config(&config)
            .with_env_credentials(Some("env-user".into()), None);
        let connection = resolver.resolve("prod", &command(&[])).unwrap();
        assert_eq!(connection.username, "env-user");
        assert_eq!(connection.password, "stored-pass");
    }

    #[test]
    fn test_command_line_beats_environment() {
        let config = config();
        let resolver = ConnectionResolver::new()
            .with_global_config(&config)
            .with_env_credentials(Some("env-user".into()), Some("env-pass".into()));
        let connection = resolver
            .resolve("prod", &command(&[("-u", "cli-user"), ("--password", "cli-pass")]))
            .unwrap();
        assert_eq!(connection.username, "cli-user");
        assert_eq!(connection.password, "cli-pass");
    }

    #[test]
    fn test_valueless_credential_flag_is_ignored() {
        let resolver = ConnectionResolver::new().with_env_credentials(Some("env-user".into()), None);
        let connection = resolver
            .resolve("http://localhost:7070", &command(&[("-u", "true")]))
            .unwrap();
        assert_eq!(connection.username, "env-user");
    }

    #[test]
    fn test_url_target_needs_no_config() {
        let resolver = ConnectionResolver::new().with_env_credentials(None, None);
        let connection = resolver.resolve("http://localhost:7070", &command(&[])).unwrap();
        assert_eq!(connection.base_address, "http://localhost:7070");
        assert!(connection.username.is_empty());
    }

    #[test]
    fn test_unknown_alias_and_missing_target() {
        let resolver = ConnectionResolver::new().with_env_credentials(None, None);
        let err = resolver.resolve("staging", &command(&[])).unwrap_err();
        assert!(err.to_string().contains("unknown target 'staging'"));
        assert!(resolver.resolve("", &command(&[])).is_err());
    }
}
