//! Recording resource engine.
//!
//! Captures every declaration instead of provisioning it. Backs the `preview`
//! command and doubles as the engine for tests: failures can be injected per
//! resource name or type token to exercise error propagation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::engine::{RegisteredResource, ResourceEngine, ResourceRequest};
use crate::error::{EngineError, EngineResult};
use crate::output::interpolate;

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub method: String,
    /// Resource name for `register_resource` calls.
    pub resource: Option<String>,
    pub type_token: Option<String>,
    /// Whether the engine rejected the call.
    pub failed: bool,
}

/// Everything a run declared, with references rendered as `${...}` expressions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub resources: Vec<ResourceRequest>,
    pub outputs: BTreeMap<String, Value>,
}

/// Engine that records declarations.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    /// Accepted declarations, in order.
    resources: Arc<RwLock<Vec<ResourceRequest>>>,
    /// Registered stack outputs.
    outputs: Arc<RwLock<Option<BTreeMap<String, Value>>>>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Failures keyed by resource name or type token.
    failures: Arc<RwLock<HashMap<String, String>>>,
    /// Failure to return from `register_outputs`.
    outputs_failure: Arc<RwLock<Option<String>>>,
    /// Assign synthetic IDs instead of leaving them unknown.
    assign_ids: bool,
    id_counter: Arc<AtomicUsize>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report synthetic IDs (`<name>-<n>`) for accepted resources.
    pub fn with_ids(mut self) -> Self {
        self.assign_ids = true;
        self
    }

    /// Fail registration of the resource with this name or type token.
    pub fn simulate_failure(self, target: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.write().insert(target.into(), message.into());
        self
    }

    /// Fail output registration.
    pub fn simulate_outputs_failure(self, message: impl Into<String>) -> Self {
        *self.outputs_failure.write() = Some(message.into());
        self
    }

    /// Accepted declarations.
    pub fn resources(&self) -> Vec<ResourceRequest> {
        self.resources.read().clone()
    }

    /// Accepted declaration by name.
    pub fn resource(&self, name: &str) -> Option<ResourceRequest> {
        self.resources.read().iter().find(|r| r.name == name).cloned()
    }

    /// Registered outputs, if the run got that far.
    pub fn outputs(&self) -> Option<BTreeMap<String, Value>> {
        self.outputs.read().clone()
    }

    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.captured_calls.read().iter().any(|c| c.method == method)
    }

    /// Names of every resource the program tried to declare, including rejected ones.
    pub fn attempted_names(&self) -> Vec<String> {
        self.captured_calls
            .read()
            .iter()
            .filter_map(|c| c.resource.clone())
            .collect()
    }

    /// Snapshot of the run for display.
    pub fn plan(&self) -> Plan {
        Plan {
            resources: self
                .resources
                .read()
                .iter()
                .map(|r| ResourceRequest {
                    properties: interpolate(&r.properties),
                    ..r.clone()
                })
                .collect(),
            outputs: self
                .outputs
                .read()
                .as_ref()
                .map(|outputs| {
                    outputs
                        .iter()
                        .map(|(k, v)| (k.clone(), interpolate(v)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    fn record_call(&self, call: CapturedCall) {
        self.captured_calls.write().push(call);
    }

    fn failure_for(&self, request: &ResourceRequest) -> Option<String> {
        let failures = self.failures.read();
        failures
            .get(&request.name)
            .or_else(|| failures.get(&request.type_token))
            .cloned()
    }
}

impl std::fmt::Debug for RecordingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingEngine")
            .field("resources", &self.resources.read().len())
            .field("calls", &self.captured_calls.read().len())
            .finish()
    }
}

#[async_trait]
impl ResourceEngine for RecordingEngine {
    async fn register_resource(
        &self,
        request: &ResourceRequest,
    ) -> EngineResult<RegisteredResource> {
        let failure = self.failure_for(request);
        self.record_call(CapturedCall {
            method: "register_resource".to_string(),
            resource: Some(request.name.clone()),
            type_token: Some(request.type_token.clone()),
            failed: failure.is_some(),
        });

        if let Some(message) = failure {
            return Err(EngineError::RegistrationFailed {
                name: request.name.clone(),
                message,
            });
        }

        debug!("Recorded {}", request.urn);
        self.resources.write().push(request.clone());

        let id = self.assign_ids.then(|| {
            let n = self.id_counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("{}-{}", request.name, n)
        });

        Ok(RegisteredResource {
            urn: request.urn.clone(),
            id,
        })
    }

    async fn register_outputs(&self, outputs: &BTreeMap<String, Value>) -> EngineResult<()> {
        let failure = self.outputs_failure.read().clone();
        self.record_call(CapturedCall {
            method: "register_outputs".to_string(),
            resource: None,
            type_token: None,
            failed: failure.is_some(),
        });

        if let Some(message) = failure {
            return Err(EngineError::OutputsFailed(message));
        }

        *self.outputs.write() = Some(outputs.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResourceOptions;
    use serde_json::json;

    fn request(name: &str, type_token: &str) -> ResourceRequest {
        ResourceRequest {
            urn: format!("urn:pulumi:dev::test::{}::{}", type_token, name),
            type_token: type_token.to_string(),
            name: name.to_string(),
            properties: json!({ "parent": { "$ref": "other.id" } }),
            options: ResourceOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_records_requests() {
        let engine = RecordingEngine::new();
        let registered = engine
            .register_resource(&request("a", "test:index:Thing"))
            .await
            .unwrap();

        assert_eq!(registered.urn, "urn:pulumi:dev::test::test:index:Thing::a");
        assert!(registered.id.is_none());
        assert_eq!(engine.resources().len(), 1);
        assert!(engine.was_called("register_resource"));
    }

    #[tokio::test]
    async fn test_synthetic_ids() {
        let engine = RecordingEngine::new().with_ids();
        let first = engine.register_resource(&request("a", "t:i:T")).await.unwrap();
        let second = engine.register_resource(&request("b", "t:i:T")).await.unwrap();

        assert_eq!(first.id.as_deref(), Some("a-1"));
        assert_eq!(second.id.as_deref(), Some("b-2"));
    }

    #[tokio::test]
    async fn test_failure_by_type_token() {
        let engine = RecordingEngine::new().simulate_failure("t:i:Broken", "boom");

        assert!(engine.register_resource(&request("ok", "t:i:T")).await.is_ok());
        let err = engine
            .register_resource(&request("bad", "t:i:Broken"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::RegistrationFailed { message, .. } if message == "boom"
        ));
        assert_eq!(engine.resources().len(), 1);
        assert_eq!(engine.attempted_names(), vec!["ok".to_string(), "bad".to_string()]);
        assert!(engine.get_calls()[1].failed);
    }

    #[tokio::test]
    async fn test_outputs_failure() {
        let engine = RecordingEngine::new().simulate_outputs_failure("state locked");
        let err = engine.register_outputs(&BTreeMap::new()).await.unwrap_err();

        assert!(matches!(err, EngineError::OutputsFailed(_)));
        assert!(engine.outputs().is_none());
    }

    #[tokio::test]
    async fn test_plan_interpolates_references() {
        let engine = RecordingEngine::new();
        engine.register_resource(&request("a", "t:i:T")).await.unwrap();
        let mut outputs = BTreeMap::new();
        outputs.insert("aId".to_string(), json!({ "$ref": "a.id" }));
        engine.register_outputs(&outputs).await.unwrap();

        let plan = engine.plan();
        assert_eq!(plan.resources[0].properties, json!({ "parent": "${other.id}" }));
        assert_eq!(plan.outputs["aId"], json!("${a.id}"));
    }
}
