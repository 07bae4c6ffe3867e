//! Run context handed to programs.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, StackConfig};
use crate::engine::{ResourceEngine, ResourceOptions, ResourceRequest, Resource};
use crate::error::{EngineError, EngineResult};
use crate::output::referenced_resources;

/// Stack-level settings for one run.
#[derive(Debug, Clone)]
pub struct StackSettings {
    /// Stack name (e.g., "dev")
    pub stack: String,
    /// Stack configuration
    pub config: StackConfig,
}

impl StackSettings {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            config: StackConfig::new(),
        }
    }

    pub fn with_config(mut self, config: StackConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for StackSettings {
    fn default() -> Self {
        Self::new("dev")
    }
}

/// Context through which a program declares resources and exports outputs.
pub struct RunContext {
    run_id: Uuid,
    project: String,
    stack: String,
    config: StackConfig,
    engine: Arc<dyn ResourceEngine>,
    resources: Vec<Resource>,
    exports: BTreeMap<String, Value>,
}

impl RunContext {
    pub fn new(
        project: impl Into<String>,
        settings: StackSettings,
        engine: Arc<dyn ResourceEngine>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            project: project.into(),
            stack: settings.stack,
            config: settings.config,
            engine,
            resources: Vec::new(),
            exports: BTreeMap::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Configuration in the project namespace.
    pub fn config(&self) -> Config<'_> {
        self.config.namespace(&self.project)
    }

    /// Configuration in another namespace (e.g., a provider's).
    pub fn config_namespace(&self, namespace: &str) -> Config<'_> {
        self.config.namespace(namespace)
    }

    /// Resources declared so far, in declaration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name() == name)
    }

    pub fn exports(&self) -> &BTreeMap<String, Value> {
        &self.exports
    }

    /// URN the engine will assign to a resource.
    pub fn urn(&self, type_token: &str, name: &str) -> String {
        format!(
            "urn:pulumi:{}::{}::{}::{}",
            self.stack, self.project, type_token, name
        )
    }

    /// Declare a resource.
    ///
    /// `args` must serialize to an object. Every output reference inside it,
    /// the provider and the explicit dependencies must name resources declared
    /// earlier in the same run.
    pub async fn register<A: Serialize + ?Sized>(
        &mut self,
        type_token: &str,
        name: &str,
        args: &A,
        options: ResourceOptions,
    ) -> EngineResult<Resource> {
        validate_name(name)?;
        if self.resource(name).is_some() {
            return Err(EngineError::DuplicateResource(name.to_string()));
        }

        let properties = match serde_json::to_value(args)? {
            Value::Null => Value::Object(serde_json::Map::new()),
            value @ Value::Object(_) => value,
            other => {
                return Err(EngineError::InvalidArguments {
                    name: name.to_string(),
                    message: format!("expected an object, got {}", other),
                })
            }
        };

        for referenced in referenced_resources(&properties) {
            self.ensure_declared(name, &referenced)?;
        }
        if let Some(provider) = &options.provider {
            self.ensure_declared(name, provider)?;
            if !self.resource(provider).is_some_and(Resource::is_provider) {
                return Err(EngineError::InvalidProvider(provider.clone()));
            }
        }
        for dependency in &options.depends_on {
            self.ensure_declared(name, dependency)?;
        }

        let request = ResourceRequest {
            urn: self.urn(type_token, name),
            type_token: type_token.to_string(),
            name: name.to_string(),
            properties,
            options,
        };

        info!("Declaring {} {}", type_token, name);
        debug!("Properties for {}: {}", name, request.properties);

        let registered = self.engine.register_resource(&request).await?;
        let resource = Resource::new(name, type_token, registered);
        self.resources.push(resource.clone());
        Ok(resource)
    }

    /// Export a named stack output. Exporting the same name again replaces the value.
    pub fn export<V: Serialize>(&mut self, name: impl Into<String>, value: V) -> EngineResult<()> {
        let name = name.into();
        let value = serde_json::to_value(value)?;

        for referenced in referenced_resources(&value) {
            self.ensure_declared(&name, &referenced)?;
        }

        debug!("Exporting output {}", name);
        if self.exports.insert(name.clone(), value).is_some() {
            warn!("Output {} exported more than once, keeping the last value", name);
        }
        Ok(())
    }

    /// Hand the exports to the engine.
    pub(crate) async fn complete(&self) -> EngineResult<()> {
        info!("Registering {} stack output(s)", self.exports.len());
        self.engine.register_outputs(&self.exports).await
    }

    fn ensure_declared(&self, declaring: &str, referenced: &str) -> EngineResult<()> {
        if self.resource(referenced).is_none() {
            return Err(EngineError::UnknownReference {
                resource: declaring.to_string(),
                reference: referenced.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("project", &self.project)
            .field("stack", &self.stack)
            .field("resources", &self.resources.iter().map(Resource::name).collect::<Vec<_>>())
            .field("exports", &self.exports.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Logical names are used inside engine expressions, so they may not contain
/// characters that have meaning there.
fn validate_name(name: &str) -> EngineResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(EngineError::InvalidName(name.to_string()));
    }
    Ok(())
}
