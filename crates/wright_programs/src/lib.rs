//! # wright_programs
//!
//! Cluster and application provisioning programs.
//!
//! Each program is a flat list of declarations: build the argument record,
//! declare the resource, propagate any error, export the outputs downstream
//! stacks consume.
//!
//! | Program        | Project       | Exports                |
//! |----------------|---------------|------------------------|
//! | `civo-cluster` | `00-solution` | `name`, `kubeconfig`   |
//! | `do-cluster`   | `00-solution` | `name`, `kubeconfig`   |
//! | `nginx-app`    | `01-solution` | `serviceName`          |
//!
//! `nginx-app` reads `nginxTitle` and `nginxBody` from the stack
//! configuration and deploys onto the cluster whose kubeconfig the
//! `00-solution` stack exports.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wright_engine::{run_program, RecordingEngine, StackSettings};
//! use wright_programs::ProgramRegistry;
//!
//! let registry = ProgramRegistry::standard();
//! let program = registry.get_required("civo-cluster")?;
//! let engine = RecordingEngine::new();
//! let settings = StackSettings::new("dev");
//! let summary = run_program(program.as_ref(), Arc::new(engine.clone()), settings).await?;
//! ```

pub mod civo_cluster;
pub mod do_cluster;
pub mod error;
pub mod nginx_app;
pub mod registry;

pub use civo_cluster::CivoCluster;
pub use do_cluster::DoCluster;
pub use error::{ProgramError, ProgramResult};
pub use nginx_app::NginxApp;
pub use registry::ProgramRegistry;
