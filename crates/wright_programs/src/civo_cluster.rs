//! Civo Kubernetes cluster behind a firewall.

use async_trait::async_trait;

use wright_engine::{EngineResult, ResourceOptions, RunContext, StackProgram};
use wright_resources::civo::{
    Firewall, FirewallArgs, KubernetesCluster, KubernetesClusterArgs, KubernetesClusterPoolsArgs,
};

pub const REGION: &str = "LON1";
pub const KUBERNETES_VERSION: &str = "1.28.7-k3s1";
pub const CNI: &str = "cilium";
/// Swap the NodePort Traefik for the load-balanced one and add the autoscaler.
pub const APPLICATIONS: &str = "-traefik2-nodeport,civo-cluster-autoscaler,traefik2-loadbalancer";
pub const NODE_SIZE: &str = "g4s.kube.medium";
pub const NODE_COUNT: i32 = 1;

/// Firewall plus a single-node Civo cluster. Exports `name` and `kubeconfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CivoCluster;

#[async_trait]
impl StackProgram for CivoCluster {
    fn name(&self) -> &str {
        "civo-cluster"
    }

    fn project(&self) -> &str {
        "00-solution"
    }

    fn description(&self) -> &str {
        "Civo Kubernetes cluster in LON1 behind a firewall with default rules"
    }

    async fn run(&self, ctx: &mut RunContext) -> EngineResult<()> {
        let firewall = Firewall::new(
            ctx,
            "firewall",
            &FirewallArgs {
                create_default_rules: Some(true.into()),
                region: Some(REGION.into()),
                ..Default::default()
            },
            ResourceOptions::new(),
        )
        .await?;

        let cluster = KubernetesCluster::new(
            ctx,
            "cluster",
            &KubernetesClusterArgs {
                firewall_id: firewall.id().into(),
                region: Some(REGION.into()),
                cni: Some(CNI.into()),
                applications: Some(APPLICATIONS.into()),
                kubernetes_version: Some(KUBERNETES_VERSION.into()),
                write_kubeconfig: Some(true.into()),
                pools: KubernetesClusterPoolsArgs {
                    size: NODE_SIZE.into(),
                    node_count: NODE_COUNT.into(),
                    label: None,
                },
                ..Default::default()
            },
            ResourceOptions::new(),
        )
        .await?;

        ctx.export("name", cluster.name())?;
        ctx.export("kubeconfig", cluster.kubeconfig())?;
        Ok(())
    }
}
