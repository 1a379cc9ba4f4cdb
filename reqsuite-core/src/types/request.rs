use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::template::Environment;
use crate::types::RequestBody;

/// The validated input contract handed to the engine by the (out-of-scope)
/// loader: every request keyed by its unique name, plus the environment the
/// placeholder resolver is bound to. Immutable for the lifetime of one run.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RequestSet {
    #[serde(default)]
    pub requests: BTreeMap<String, RequestDefinition>,
    #[serde(default)]
    pub environment: Environment,
}

/// A single named request. The name itself lives in the enclosing
/// [`RequestSet`] map, not in the definition body.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestDefinition {
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RequestConfig>,
}

impl RequestDefinition {
    /// Dependency names, empty when no config block is present.
    pub fn requires(&self) -> &[String] {
        self.config
            .as_ref()
            .map(|c| c.require.as_slice())
            .unwrap_or(&[])
    }

    pub fn delay(&self) -> Option<Duration> {
        self.config.as_ref().and_then(|c| c.delay)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.as_ref().and_then(|c| c.timeout)
    }

    /// Additional attempts after the first failure; total attempts are
    /// `retries + 1`.
    pub fn retries(&self) -> u32 {
        self.config.as_ref().map(|c| c.retries).unwrap_or(0)
    }
}

/// Per-request execution configuration. `class` and `tags` are grouping
/// labels only and never affect behavior.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub require: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}
