//! DigitalOcean Kubernetes cluster.

use async_trait::async_trait;

use wright_engine::{EngineResult, ResourceOptions, RunContext, StackProgram};
use wright_resources::digitalocean::{
    KubernetesCluster, KubernetesClusterArgs, KubernetesClusterNodePoolArgs,
};

pub const REGION: &str = "fra1";
pub const VERSION: &str = "1.31.1-do.5";
pub const NODE_POOL_NAME: &str = "default";
pub const NODE_SIZE: &str = "s-2vcpu-2gb";
pub const NODE_COUNT: i32 = 1;

/// Single-node cluster in Frankfurt. Exports `name` and `kubeconfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoCluster;

#[async_trait]
impl StackProgram for DoCluster {
    fn name(&self) -> &str {
        "do-cluster"
    }

    fn project(&self) -> &str {
        "00-solution"
    }

    fn description(&self) -> &str {
        "DigitalOcean Kubernetes cluster in fra1 with a single default node pool"
    }

    async fn run(&self, ctx: &mut RunContext) -> EngineResult<()> {
        let cluster = KubernetesCluster::new(
            ctx,
            "do-cluster",
            &KubernetesClusterArgs {
                region: REGION.into(),
                version: VERSION.into(),
                destroy_all_associated_resources: Some(true.into()),
                node_pool: KubernetesClusterNodePoolArgs {
                    name: NODE_POOL_NAME.into(),
                    size: NODE_SIZE.into(),
                    node_count: Some(NODE_COUNT.into()),
                    ..Default::default()
                },
                ..Default::default()
            },
            ResourceOptions::new(),
        )
        .await?;

        ctx.export("name", cluster.name())?;
        ctx.export("kubeconfig", cluster.raw_kubeconfig(0))?;
        Ok(())
    }
}
