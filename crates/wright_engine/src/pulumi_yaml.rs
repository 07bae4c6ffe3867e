//! Pulumi YAML emitter.
//!
//! Compiles declarations into a `Pulumi.yaml` program for the YAML runtime.
//! References become `${resource.property}` interpolations, providers and
//! explicit dependencies become resource options. The external engine then
//! resolves the dependency graph, diffs state and provisions the resources.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::engine::{RegisteredResource, ResourceEngine, ResourceRequest};
use crate::error::{EngineError, EngineResult};
use crate::output::interpolate;

/// File name of a project definition.
pub const PROJECT_FILE: &str = "Pulumi.yaml";

const HEADER: &str = "# Generated by stackwright - do not edit manually.\n";

/// Resource options in YAML form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YamlResourceOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protect: Option<bool>,
}

impl YamlResourceOptions {
    pub fn is_empty(&self) -> bool {
        self.provider.is_none() && self.depends_on.is_empty() && self.protect.is_none()
    }
}

/// One resource in a YAML program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YamlResource {
    #[serde(rename = "type")]
    pub type_token: String,
    #[serde(default, skip_serializing_if = "is_empty_object")]
    pub properties: Value,
    #[serde(default, skip_serializing_if = "YamlResourceOptions::is_empty")]
    pub options: YamlResourceOptions,
}

fn is_empty_object(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// A `Pulumi.yaml` project using the YAML runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulumiYamlProject {
    pub name: String,
    pub runtime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, YamlResource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Value>,
}

impl PulumiYamlProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runtime: "yaml".to_string(),
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a project from a `Pulumi.yaml` file.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path)?;
        let project: PulumiYamlProject = serde_yaml::from_str(&content)?;
        Ok(project)
    }

    pub fn to_yaml_string(&self) -> EngineResult<String> {
        Ok(format!("{}{}", HEADER, serde_yaml::to_string(self)?))
    }

    /// Write `Pulumi.yaml` into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> EngineResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(PROJECT_FILE);
        fs::write(&path, self.to_yaml_string()?)?;
        info!("Wrote {} resource(s) to {:?}", self.resources.len(), path);
        Ok(path)
    }
}

/// Engine that emits a Pulumi YAML program.
#[derive(Clone)]
pub struct PulumiYamlEngine {
    project: Arc<RwLock<PulumiYamlProject>>,
}

impl PulumiYamlEngine {
    pub fn new(project: PulumiYamlProject) -> Self {
        Self {
            project: Arc::new(RwLock::new(project)),
        }
    }

    /// Snapshot of the program emitted so far.
    pub fn project(&self) -> PulumiYamlProject {
        self.project.read().clone()
    }

    pub fn write_to(&self, dir: &Path) -> EngineResult<PathBuf> {
        self.project.read().write_to(dir)
    }
}

fn interpolation(name: &str) -> String {
    format!("${{{}}}", name)
}

#[async_trait]
impl ResourceEngine for PulumiYamlEngine {
    async fn register_resource(
        &self,
        request: &ResourceRequest,
    ) -> EngineResult<RegisteredResource> {
        let mut project = self.project.write();
        if project.resources.contains_key(&request.name) {
            return Err(EngineError::DuplicateResource(request.name.clone()));
        }

        let resource = YamlResource {
            type_token: request.type_token.clone(),
            properties: interpolate(&request.properties),
            options: YamlResourceOptions {
                provider: request.options.provider.as_deref().map(interpolation),
                depends_on: request
                    .options
                    .depends_on
                    .iter()
                    .map(|name| interpolation(name))
                    .collect(),
                protect: request.options.protect.then_some(true),
            },
        };

        debug!("Emitting {} as {}", request.name, request.type_token);
        project.resources.insert(request.name.clone(), resource);

        Ok(RegisteredResource {
            urn: request.urn.clone(),
            id: None,
        })
    }

    async fn register_outputs(&self, outputs: &BTreeMap<String, Value>) -> EngineResult<()> {
        let mut project = self.project.write();
        project.outputs = outputs
            .iter()
            .map(|(name, value)| (name.clone(), interpolate(value)))
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResourceOptions;
    use serde_json::json;
    use tempfile::tempdir;

    fn request(name: &str, properties: Value, options: ResourceOptions) -> ResourceRequest {
        ResourceRequest {
            urn: format!("urn:pulumi:dev::demo::t:i:T::{}", name),
            type_token: "t:i:T".to_string(),
            name: name.to_string(),
            properties,
            options,
        }
    }

    #[tokio::test]
    async fn test_emits_interpolations_and_options() {
        let engine = PulumiYamlEngine::new(PulumiYamlProject::new("demo"));
        let options = ResourceOptions {
            provider: Some("k8s".to_string()),
            depends_on: vec!["base".to_string()],
            protect: true,
        };

        let properties = json!({ "kubeconfig": { "$ref": "ref.outputs[\"kubeconfig\"]" } });
        engine
            .register_resource(&request("app", properties, options))
            .await
            .unwrap();

        let project = engine.project();
        let app = &project.resources["app"];
        assert_eq!(app.properties["kubeconfig"], json!("${ref.outputs[\"kubeconfig\"]}"));
        assert_eq!(app.options.provider.as_deref(), Some("${k8s}"));
        assert_eq!(app.options.depends_on, vec!["${base}".to_string()]);
        assert_eq!(app.options.protect, Some(true));
    }

    #[tokio::test]
    async fn test_rejects_duplicates() {
        let engine = PulumiYamlEngine::new(PulumiYamlProject::new("demo"));
        engine
            .register_resource(&request("a", json!({}), ResourceOptions::new()))
            .await
            .unwrap();

        let err = engine
            .register_resource(&request("a", json!({}), ResourceOptions::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateResource(_)));
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let engine = PulumiYamlEngine::new(
            PulumiYamlProject::new("demo").with_description("Demo project"),
        );
        engine
            .register_resource(&request("a", json!({ "region": "LON1" }), ResourceOptions::new()))
            .await
            .unwrap();
        let mut outputs = BTreeMap::new();
        outputs.insert("aId".to_string(), json!({ "$ref": "a.id" }));
        engine.register_outputs(&outputs).await.unwrap();

        let path = engine.write_to(dir.path()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Generated by stackwright"));
        assert!(content.contains("runtime: yaml"));
        assert!(!content.contains("options"));

        let project = PulumiYamlProject::from_file(&path).unwrap();
        assert_eq!(project, engine.project());
        assert_eq!(project.outputs["aId"], json!("${a.id}"));
    }
}
