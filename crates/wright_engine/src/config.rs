//! Stack configuration.
//!
//! Configuration lives in a per-stack YAML file (`Pulumi.<stack>.yaml`) whose
//! `config` section maps namespaced keys (`project:key`) to values:
//!
//! ```yaml
//! config:
//!   01-solution:nginxTitle: Hello
//!   01-solution:nginxBody: From stackwright
//!   civo:token:
//!     secure: AAABAG...
//! ```
//!
//! Values marked `secure` are encrypted by the external engine and are never
//! decrypted here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Plain(Value),
    /// Ciphertext of a secret value.
    Secure(String),
}

#[derive(Debug, Deserialize)]
struct StackConfigFile {
    #[serde(default)]
    config: BTreeMap<String, serde_yaml::Value>,
}

/// All configuration values of one stack, keyed by `namespace:key`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a stack settings file.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        debug!("Loading stack configuration from {:?}", path);
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| EngineError::ConfigFile {
            path: source.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &source)
    }

    /// Parse configuration from the contents of a stack settings file.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, source: &str) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::ConfigFile {
            path: source.to_string(),
            message,
        };

        let file: Option<StackConfigFile> =
            serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let mut config = Self::new();

        for (key, raw) in file.map(|f| f.config).unwrap_or_default() {
            let value = match secure_ciphertext(&raw) {
                Some(ciphertext) => ConfigValue::Secure(ciphertext),
                None => ConfigValue::Plain(
                    serde_json::to_value(&raw).map_err(|e| invalid(e.to_string()))?,
                ),
            };
            config.values.insert(key, value);
        }

        Ok(config)
    }

    /// Set a plain value under a fully-qualified key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), ConfigValue::Plain(value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Apply a `key=value` override. Keys without a namespace land in `default_namespace`.
    pub fn apply_override(
        &mut self,
        assignment: &str,
        default_namespace: &str,
    ) -> EngineResult<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| EngineError::InvalidOverride(assignment.to_string()))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(EngineError::InvalidOverride(assignment.to_string()));
        }

        let full_key = qualify(default_namespace, key);
        if self.values.contains_key(&full_key) {
            debug!("Overriding configuration value {}", full_key);
        }
        self.set(full_key, value.to_string());
        Ok(())
    }

    pub fn get(&self, full_key: &str) -> Option<&ConfigValue> {
        self.values.get(full_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// View of the values in one namespace.
    pub fn namespace<'a>(&'a self, namespace: &str) -> Config<'a> {
        Config {
            namespace: namespace.to_string(),
            values: self,
        }
    }
}

fn secure_ciphertext(raw: &serde_yaml::Value) -> Option<String> {
    match raw {
        serde_yaml::Value::Mapping(map) if map.len() == 1 => {
            map.get("secure").and_then(|v| v.as_str()).map(str::to_string)
        }
        _ => None,
    }
}

fn qualify(namespace: &str, key: &str) -> String {
    if key.contains(':') {
        key.to_string()
    } else {
        format!("{}:{}", namespace, key)
    }
}

/// Configuration lookups scoped to a namespace (the project name by default).
#[derive(Debug, Clone)]
pub struct Config<'a> {
    namespace: String,
    values: &'a StackConfig,
}

impl<'a> Config<'a> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully-qualified key for `key`.
    pub fn full_key(&self, key: &str) -> String {
        qualify(&self.namespace, key)
    }

    /// Read a value as a string, failing on secrets.
    pub fn try_get(&self, key: &str) -> EngineResult<Option<String>> {
        let full_key = self.full_key(key);
        match self.values.get(&full_key) {
            None => Ok(None),
            Some(ConfigValue::Secure(_)) => Err(EngineError::SecretValue(full_key)),
            Some(ConfigValue::Plain(Value::String(s))) => Ok(Some(s.clone())),
            Some(ConfigValue::Plain(Value::Null)) => Ok(None),
            Some(ConfigValue::Plain(other)) => Ok(Some(other.to_string())),
        }
    }

    /// Read a value as a string. Secrets read as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Read a value that must be present.
    pub fn require(&self, key: &str) -> EngineResult<String> {
        self.try_get(key)?
            .ok_or_else(|| EngineError::ConfigMissing(self.full_key(key)))
    }

    pub fn get_bool(&self, key: &str) -> EngineResult<Option<bool>> {
        self.parse(key, |raw| raw.parse::<bool>().map_err(|e| e.to_string()))
    }

    pub fn get_i64(&self, key: &str) -> EngineResult<Option<i64>> {
        self.parse(key, |raw| raw.parse::<i64>().map_err(|e| e.to_string()))
    }

    /// Deserialize a structured value.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> EngineResult<Option<T>> {
        let full_key = self.full_key(key);
        let value = match self.values.get(&full_key) {
            None => return Ok(None),
            Some(ConfigValue::Secure(_)) => return Err(EngineError::SecretValue(full_key)),
            Some(ConfigValue::Plain(value)) => value.clone(),
        };

        // Overrides from the command line arrive as JSON text.
        let value = match value {
            Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
            other => other,
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| EngineError::ConfigInvalid {
                key: full_key,
                message: e.to_string(),
            })
    }

    fn parse<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> EngineResult<Option<T>> {
        match self.try_get(key)? {
            None => Ok(None),
            Some(raw) => parse(raw.trim())
                .map(Some)
                .map_err(|message| EngineError::ConfigInvalid {
                    key: self.full_key(key),
                    message,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const STACK_FILE: &str = r#"
config:
  01-solution:nginxTitle: Hello
  01-solution:replicas: 3
  01-solution:enabled: "true"
  01-solution:labels:
    app: nginx
  civo:token:
    secure: AAABAGZvbw==
"#;

    #[test]
    fn test_parse_stack_file() {
        let config = StackConfig::from_yaml_str(STACK_FILE).unwrap();
        assert_eq!(config.len(), 5);
        assert_eq!(
            config.get("civo:token"),
            Some(&ConfigValue::Secure("AAABAGZvbw==".to_string()))
        );
    }

    #[test]
    fn test_empty_file() {
        let config = StackConfig::from_yaml_str("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let err = StackConfig::from_yaml_str("config: [not, a, map").unwrap_err();
        assert!(matches!(&err, EngineError::ConfigFile { path, .. } if path == "<inline>"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Pulumi.prod.yaml");

        let err = StackConfig::from_file(&path).unwrap_err();
        assert!(matches!(
            &err,
            EngineError::ConfigFile { path: p, .. } if p.ends_with("Pulumi.prod.yaml")
        ));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_namespaced_lookup() {
        let stack = StackConfig::from_yaml_str(STACK_FILE).unwrap();
        let config = stack.namespace("01-solution");

        assert_eq!(config.get("nginxTitle"), Some("Hello".to_string()));
        assert_eq!(config.get("01-solution:nginxTitle"), Some("Hello".to_string()));
        assert_eq!(config.get("nginxBody"), None);
        assert_eq!(config.get_i64("replicas").unwrap(), Some(3));
        assert_eq!(config.get_bool("enabled").unwrap(), Some(true));
    }

    #[test]
    fn test_require_missing() {
        let stack = StackConfig::new();
        let err = stack.namespace("01-solution").require("nginxBody").unwrap_err();
        assert!(matches!(err, EngineError::ConfigMissing(key) if key == "01-solution:nginxBody"));
    }

    #[test]
    fn test_secret_is_not_readable() {
        let stack = StackConfig::from_yaml_str(STACK_FILE).unwrap();
        let config = stack.namespace("civo");

        assert!(matches!(config.require("token"), Err(EngineError::SecretValue(_))));
        assert_eq!(config.get("token"), None);
    }

    #[test]
    fn test_invalid_number() {
        let stack = StackConfig::new().with("app:replicas", "many");
        let err = stack.namespace("app").get_i64("replicas").unwrap_err();
        assert!(matches!(err, EngineError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_get_object() {
        #[derive(Deserialize)]
        struct Labels {
            app: String,
        }

        let stack = StackConfig::from_yaml_str(STACK_FILE).unwrap();
        let labels: Labels = stack
            .namespace("01-solution")
            .get_object("labels")
            .unwrap()
            .unwrap();
        assert_eq!(labels.app, "nginx");
    }

    #[test]
    fn test_apply_override() {
        let mut stack = StackConfig::from_yaml_str(STACK_FILE).unwrap();
        stack.apply_override("nginxTitle=Overridden", "01-solution").unwrap();
        stack.apply_override("other:key=a=b", "01-solution").unwrap();

        assert_eq!(
            stack.namespace("01-solution").get("nginxTitle"),
            Some("Overridden".to_string())
        );
        assert_eq!(stack.namespace("other").get("key"), Some("a=b".to_string()));
        assert!(stack.apply_override("missing-separator", "01-solution").is_err());
        assert!(stack.apply_override("=value", "01-solution").is_err());
    }
}
