//! Resource engine trait and declaration types.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineResult;
use crate::output::OutputRef;

/// Type token prefix shared by all provider resources.
pub const PROVIDER_TYPE_PREFIX: &str = "pulumi:providers:";

/// Options that change how the engine treats a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOptions {
    /// Logical name of the explicit provider to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Logical names of resources that must be created first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Protect the resource from deletion.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub protect: bool,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct the resource at an explicit provider.
    pub fn provider(mut self, provider: &Resource) -> Self {
        self.provider = Some(provider.name().to_string());
        self
    }

    /// Add an explicit dependency.
    pub fn depends_on(mut self, resource: &Resource) -> Self {
        self.depends_on.push(resource.name().to_string());
        self
    }

    pub fn protect(mut self) -> Self {
        self.protect = true;
        self
    }
}

/// A resource declaration handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub urn: String,
    #[serde(rename = "type")]
    pub type_token: String,
    pub name: String,
    pub properties: Value,
    #[serde(default)]
    pub options: ResourceOptions,
}

impl ResourceRequest {
    /// Look up a top-level property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// What the engine reports back for an accepted declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredResource {
    pub urn: String,
    /// Provider-assigned ID, unknown until the engine has created the resource.
    pub id: Option<String>,
}

/// Handle to a declared resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    type_token: String,
    urn: String,
    id: Option<String>,
}

impl Resource {
    pub fn new(
        name: impl Into<String>,
        type_token: impl Into<String>,
        registered: RegisteredResource,
    ) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
            urn: registered.urn,
            id: registered.id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_token(&self) -> &str {
        &self.type_token
    }

    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// ID reported at registration time, if the engine knew it.
    pub fn known_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether this resource configures a provider.
    pub fn is_provider(&self) -> bool {
        self.type_token.starts_with(PROVIDER_TYPE_PREFIX)
    }

    /// Reference to the resource's provider-assigned ID.
    pub fn id(&self) -> OutputRef {
        self.output("id")
    }

    /// Reference to a top-level output property.
    pub fn output(&self, property: &str) -> OutputRef {
        OutputRef::new(&self.name).field(property)
    }
}

/// Receives resource declarations and stack outputs.
///
/// Implementations either hand the declarations to an external provisioning
/// engine or record them. All creation, diffing and retry semantics belong to
/// the implementation; callers only propagate the errors it returns.
#[async_trait]
pub trait ResourceEngine: Send + Sync {
    /// Register a resource declaration.
    async fn register_resource(
        &self,
        request: &ResourceRequest,
    ) -> EngineResult<RegisteredResource>;

    /// Register the stack's exported outputs. Called once, after all declarations.
    async fn register_outputs(&self, outputs: &BTreeMap<String, Value>) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, type_token: &str) -> Resource {
        Resource::new(
            name,
            type_token,
            RegisteredResource {
                urn: format!("urn:pulumi:dev::test::{}::{}", type_token, name),
                id: None,
            },
        )
    }

    #[test]
    fn test_resource_outputs() {
        let firewall = resource("firewall", "civo:index/firewall:Firewall");
        assert_eq!(firewall.id().expression(), "firewall.id");
        assert_eq!(firewall.output("region").expression(), "firewall.region");
        assert!(!firewall.is_provider());
        assert!(firewall.known_id().is_none());
    }

    #[test]
    fn test_resource_options_builder() {
        let provider = resource("k8s", "pulumi:providers:kubernetes");
        let config_map = resource("cm", "kubernetes:core/v1:ConfigMap");

        let options = ResourceOptions::new()
            .provider(&provider)
            .depends_on(&config_map)
            .protect();

        assert!(provider.is_provider());
        assert_eq!(options.provider.as_deref(), Some("k8s"));
        assert_eq!(options.depends_on, vec!["cm".to_string()]);
        assert!(options.protect);
    }

    #[test]
    fn test_default_options_serialize_empty() {
        let value = serde_json::to_value(ResourceOptions::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
