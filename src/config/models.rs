use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Contents of `config.toml`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Named clusters, addressable by alias on the command line.
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// One named cluster.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TargetConfig {
    /// Locator address, e.g. `https://locator.example.com:7070`.
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
