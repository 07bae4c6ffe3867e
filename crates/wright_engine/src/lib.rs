//! # wright_engine
//!
//! Run context and resource engine boundary for stackwright programs.
//!
//! Programs declare resources through a [`RunContext`]; the context validates
//! each declaration locally and hands it to a [`ResourceEngine`]. Provisioning,
//! state and dependency scheduling belong to the engine.
//!
//! # Features
//!
//! - **Typed inputs**: literal values or references to other resources' outputs
//! - **Stack configuration**: `Pulumi.<stack>.yaml` files plus overrides
//! - **Recording engine**: previews and test doubles with failure injection
//! - **Pulumi YAML engine**: compiles declarations into a `Pulumi.yaml` program
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wright_engine::{RecordingEngine, ResourceOptions, RunContext, StackSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = RecordingEngine::new();
//!     let mut ctx = RunContext::new("demo", StackSettings::new("dev"), Arc::new(engine.clone()));
//!
//!     let firewall = ctx
//!         .register(
//!             "civo:index/firewall:Firewall",
//!             "firewall",
//!             &serde_json::json!({ "region": "LON1" }),
//!             ResourceOptions::new(),
//!         )
//!         .await?;
//!     ctx.export("firewallId", firewall.id())?;
//!
//!     println!("{:#?}", engine.plan());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod output;
pub mod program;
pub mod pulumi_yaml;
pub mod recording;

pub use config::{Config, ConfigValue, StackConfig};
pub use context::{RunContext, StackSettings};
pub use engine::{RegisteredResource, Resource, ResourceEngine, ResourceOptions, ResourceRequest};
pub use error::{EngineError, EngineResult};
pub use output::{Input, OutputRef, PathSegment};
pub use program::{run_program, DeclaredResource, RunSummary, StackProgram};
pub use pulumi_yaml::{PulumiYamlEngine, PulumiYamlProject, YamlResource, YamlResourceOptions};
pub use recording::{CapturedCall, Plan, RecordingEngine};
