//! Kubernetes API objects.
//!
//! Any `k8s-openapi` object can be declared; the type token is derived from
//! its API group, version and kind (`kubernetes:apps/v1:Deployment`). Objects
//! in the core group use `core` as their group.

use serde::Serialize;
use tracing::debug;

use wright_engine::{EngineResult, OutputRef, Resource, ResourceOptions, RunContext};

use crate::cloud::Cloud;

/// Type token for a Kubernetes object type.
pub fn type_token<K: k8s_openapi::Resource>() -> String {
    let group = if K::GROUP.is_empty() { "core" } else { K::GROUP };
    Cloud::Kubernetes.type_token(&format!("{}/{}", group, K::VERSION), K::KIND)
}

/// A declared Kubernetes object.
#[derive(Debug, Clone)]
pub struct KubernetesObject {
    resource: Resource,
    kind: &'static str,
}

impl KubernetesObject {
    /// Declare `object` as a resource.
    pub async fn new<K>(
        ctx: &mut RunContext,
        name: &str,
        object: &K,
        options: ResourceOptions,
    ) -> EngineResult<Self>
    where
        K: k8s_openapi::Resource + Serialize,
    {
        debug!("Declaring {} {} ({})", K::KIND, name, K::API_VERSION);
        let resource = ctx.register(&type_token::<K>(), name, object, options).await?;
        Ok(Self {
            resource,
            kind: K::KIND,
        })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    /// Name the object ends up with in the cluster.
    pub fn metadata_name(&self) -> OutputRef {
        self.resource.output("metadata").field("name")
    }

    pub fn output(&self, property: &str) -> OutputRef {
        self.resource.output(property)
    }
}
