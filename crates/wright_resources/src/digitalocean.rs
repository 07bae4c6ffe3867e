//! DigitalOcean resources.

use serde::Serialize;

use wright_engine::{EngineResult, Input, OutputRef, Resource, ResourceOptions, RunContext};

use crate::cloud::Cloud;

/// Default node pool of a DigitalOcean cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterNodePoolArgs {
    pub name: Input<String>,
    /// Droplet size slug, e.g. `s-2vcpu-2gb`.
    pub size: Input<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<Input<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<Input<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_nodes: Option<Input<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<Input<i32>>,
}

/// Arguments for a DigitalOcean managed Kubernetes cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Input<String>>,
    pub region: Input<String>,
    /// Version slug, e.g. `1.31.1-do.5`.
    pub version: Input<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_uuid: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_upgrade: Option<Input<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ha: Option<Input<bool>>,
    /// Delete load balancers and volumes created by the cluster on destroy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy_all_associated_resources: Option<Input<bool>>,
    pub node_pool: KubernetesClusterNodePoolArgs,
}

/// A declared DigitalOcean Kubernetes cluster.
#[derive(Debug, Clone)]
pub struct KubernetesCluster {
    resource: Resource,
}

impl KubernetesCluster {
    pub fn type_token() -> String {
        Cloud::DigitalOcean.type_token("index/kubernetesCluster", "KubernetesCluster")
    }

    pub async fn new(
        ctx: &mut RunContext,
        name: &str,
        args: &KubernetesClusterArgs,
        options: ResourceOptions,
    ) -> EngineResult<Self> {
        let resource = ctx.register(&Self::type_token(), name, args, options).await?;
        Ok(Self { resource })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn name(&self) -> OutputRef {
        self.resource.output("name")
    }

    /// Raw kubeconfig of the cluster's `index`-th credential set.
    pub fn raw_kubeconfig(&self, index: usize) -> OutputRef {
        self.resource
            .output("kubeConfigs")
            .index(index)
            .field("rawConfig")
    }
}
