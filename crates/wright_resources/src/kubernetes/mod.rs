//! Kubernetes resources: provider, API objects and Helm releases.

pub mod helm;
pub mod object;
pub mod provider;

pub use helm::{Release, ReleaseArgs, RepositoryOptsArgs};
pub use object::KubernetesObject;
pub use provider::{Provider, ProviderArgs};

/// Service types accepted by `spec.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSpecType {
    ClusterIp,
    NodePort,
    LoadBalancer,
    ExternalName,
}

impl ServiceSpecType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceSpecType::ClusterIp => "ClusterIP",
            ServiceSpecType::NodePort => "NodePort",
            ServiceSpecType::LoadBalancer => "LoadBalancer",
            ServiceSpecType::ExternalName => "ExternalName",
        }
    }
}

impl std::fmt::Display for ServiceSpecType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
