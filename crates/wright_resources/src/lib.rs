//! # wright_resources
//!
//! Typed resource arguments for stackwright programs.
//!
//! Each resource type pairs an argument record with a handle constructor that
//! declares it through a [`wright_engine::RunContext`]. Handles expose the
//! outputs other declarations or stack exports refer to.
//!
//! ## Providers
//!
//! - Civo: firewalls and managed Kubernetes clusters
//! - DigitalOcean: managed Kubernetes clusters
//! - Kubernetes: explicit providers, any `k8s-openapi` object, Helm releases
//! - Stack references to outputs of other stacks
//!
//! ## Example
//!
//! ```rust,no_run
//! use wright_engine::{EngineResult, ResourceOptions, RunContext};
//! use wright_resources::civo::{Firewall, FirewallArgs};
//!
//! async fn declare(ctx: &mut RunContext) -> EngineResult<()> {
//!     let firewall = Firewall::new(
//!         ctx,
//!         "firewall",
//!         &FirewallArgs {
//!             region: Some("LON1".into()),
//!             ..Default::default()
//!         },
//!         ResourceOptions::new(),
//!     )
//!     .await?;
//!     ctx.export("firewallId", firewall.id())
//! }
//! ```

pub mod civo;
pub mod cloud;
pub mod digitalocean;
pub mod kubernetes;
pub mod stack_reference;

pub use cloud::Cloud;
pub use stack_reference::{StackReference, StackReferenceArgs, STACK_REFERENCE_TYPE};
