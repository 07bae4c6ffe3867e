//! References to the outputs of other stacks.

use serde::Serialize;
use tracing::info;

use wright_engine::{EngineResult, Input, OutputRef, Resource, ResourceOptions, RunContext};

/// Type token of stack references.
pub const STACK_REFERENCE_TYPE: &str = "pulumi:pulumi:StackReference";

/// Arguments for a stack reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackReferenceArgs {
    /// Fully-qualified stack name, `<org>/<project>/<stack>`.
    pub name: Input<String>,
}

/// A reference to a separately managed stack.
#[derive(Debug, Clone)]
pub struct StackReference {
    resource: Resource,
}

impl StackReference {
    pub async fn new(
        ctx: &mut RunContext,
        name: &str,
        args: &StackReferenceArgs,
        options: ResourceOptions,
    ) -> EngineResult<Self> {
        info!("Referencing stack {:?} as {}", args.name, name);
        let resource = ctx.register(STACK_REFERENCE_TYPE, name, args, options).await?;
        Ok(Self { resource })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Output `key` exported by the referenced stack.
    pub fn output(&self, key: &str) -> OutputRef {
        self.resource.output("outputs").key(key)
    }
}
