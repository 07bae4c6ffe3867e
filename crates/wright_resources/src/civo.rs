//! Civo resources.

use serde::Serialize;
use tracing::debug;

use wright_engine::{EngineResult, Input, OutputRef, Resource, ResourceOptions, RunContext};

use crate::cloud::Cloud;

/// Arguments for a Civo firewall.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Input<String>>,
    /// Open the default ingress rules (SSH, HTTP, HTTPS, Kubernetes API).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_default_rules: Option<Input<bool>>,
}

/// A declared Civo firewall.
#[derive(Debug, Clone)]
pub struct Firewall {
    resource: Resource,
}

impl Firewall {
    pub fn type_token() -> String {
        Cloud::Civo.type_token("index/firewall", "Firewall")
    }

    pub async fn new(
        ctx: &mut RunContext,
        name: &str,
        args: &FirewallArgs,
        options: ResourceOptions,
    ) -> EngineResult<Self> {
        let resource = ctx.register(&Self::type_token(), name, args, options).await?;
        Ok(Self { resource })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn id(&self) -> OutputRef {
        self.resource.id()
    }
}

/// Node pool of a Civo cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterPoolsArgs {
    /// Instance size, e.g. `g4s.kube.medium`.
    pub size: Input<String>,
    pub node_count: Input<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Input<String>>,
}

/// Arguments for a Civo managed Kubernetes cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Input<String>>,
    pub firewall_id: Input<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Input<String>>,
    /// `flannel` or `cilium`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cni: Option<Input<String>>,
    /// Comma-separated marketplace applications; a leading `-` removes a default one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_kubeconfig: Option<Input<bool>>,
    pub pools: KubernetesClusterPoolsArgs,
}

/// A declared Civo Kubernetes cluster.
#[derive(Debug, Clone)]
pub struct KubernetesCluster {
    resource: Resource,
}

impl KubernetesCluster {
    pub fn type_token() -> String {
        Cloud::Civo.type_token("index/kubernetesCluster", "KubernetesCluster")
    }

    pub async fn new(
        ctx: &mut RunContext,
        name: &str,
        args: &KubernetesClusterArgs,
        options: ResourceOptions,
    ) -> EngineResult<Self> {
        debug!("Civo cluster {} uses firewall {:?}", name, args.firewall_id);
        let resource = ctx.register(&Self::type_token(), name, args, options).await?;
        Ok(Self { resource })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn name(&self) -> OutputRef {
        self.resource.output("name")
    }

    /// Admin kubeconfig, populated when `write_kubeconfig` is set.
    pub fn kubeconfig(&self) -> OutputRef {
        self.resource.output("kubeconfig")
    }
}
