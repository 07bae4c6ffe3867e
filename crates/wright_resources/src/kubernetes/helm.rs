//! Helm releases.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use wright_engine::{EngineResult, Input, Resource, ResourceOptions, RunContext};

use crate::cloud::Cloud;

/// Chart repository options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOptsArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Input<String>>,
}

/// Arguments for a Helm v3 release.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Input<String>>,
    pub chart: Input<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Input<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_namespace: Option<Input<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_opts: Option<RepositoryOptsArgs>,
    /// Chart values, merged over the chart defaults.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Value>,
}

/// A declared Helm release.
#[derive(Debug, Clone)]
pub struct Release {
    resource: Resource,
}

impl Release {
    pub fn type_token() -> String {
        Cloud::Kubernetes.type_token("helm.sh/v3", "Release")
    }

    pub async fn new(
        ctx: &mut RunContext,
        name: &str,
        args: &ReleaseArgs,
        options: ResourceOptions,
    ) -> EngineResult<Self> {
        let resource = ctx.register(&Self::type_token(), name, args, options).await?;
        Ok(Self { resource })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }
}
