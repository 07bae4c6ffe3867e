//! Kubernetes provider configuration.

use serde::Serialize;

use wright_engine::{EngineResult, Input, Resource, ResourceOptions, RunContext};

use crate::cloud::Cloud;

/// Arguments for an explicit Kubernetes provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderArgs {
    /// Kubeconfig contents (not a path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Input<String>>,
    /// Default namespace for namespaced resources without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_server_side_apply: Option<Input<bool>>,
}

/// A declared Kubernetes provider.
#[derive(Debug, Clone)]
pub struct Provider {
    resource: Resource,
}

impl Provider {
    pub fn type_token() -> String {
        Cloud::Kubernetes.provider_type()
    }

    pub async fn new(
        ctx: &mut RunContext,
        name: &str,
        args: &ProviderArgs,
        options: ResourceOptions,
    ) -> EngineResult<Self> {
        let resource = ctx.register(&Self::type_token(), name, args, options).await?;
        Ok(Self { resource })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Options directing a resource at this provider.
    pub fn options(&self) -> ResourceOptions {
        ResourceOptions::new().provider(&self.resource)
    }
}
