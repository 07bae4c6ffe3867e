//! Provider package definitions.

use serde::{Deserialize, Serialize};

/// Provider packages the programs declare resources from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cloud {
    Civo,
    DigitalOcean,
    Kubernetes,
}

impl Cloud {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cloud::Civo => "civo",
            Cloud::DigitalOcean => "digitalocean",
            Cloud::Kubernetes => "kubernetes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "civo" => Some(Cloud::Civo),
            "digitalocean" | "do" => Some(Cloud::DigitalOcean),
            "kubernetes" | "k8s" => Some(Cloud::Kubernetes),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Cloud::Civo, Cloud::DigitalOcean, Cloud::Kubernetes]
    }

    /// Package name used in type tokens.
    pub fn package(&self) -> &'static str {
        self.as_str()
    }

    /// Build a resource type token, e.g. `civo:index/firewall:Firewall`.
    pub fn type_token(&self, module: &str, kind: &str) -> String {
        format!("{}:{}:{}", self.package(), module, kind)
    }

    /// Type token of the package's provider resource.
    pub fn provider_type(&self) -> String {
        format!("{}{}", wright_engine::engine::PROVIDER_TYPE_PREFIX, self.package())
    }

    /// Package a type token belongs to. Provider resources map to their package.
    pub fn of_type_token(type_token: &str) -> Option<Self> {
        let package = type_token
            .strip_prefix(wright_engine::engine::PROVIDER_TYPE_PREFIX)
            .unwrap_or_else(|| type_token.split(':').next().unwrap_or_default());
        Self::from_str(package)
    }
}

impl std::fmt::Display for Cloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tokens() {
        assert_eq!(
            Cloud::Civo.type_token("index/firewall", "Firewall"),
            "civo:index/firewall:Firewall"
        );
        assert_eq!(Cloud::Kubernetes.provider_type(), "pulumi:providers:kubernetes");
    }

    #[test]
    fn test_of_type_token() {
        assert_eq!(
            Cloud::of_type_token("digitalocean:index/kubernetesCluster:KubernetesCluster"),
            Some(Cloud::DigitalOcean)
        );
        assert_eq!(Cloud::of_type_token("pulumi:providers:kubernetes"), Some(Cloud::Kubernetes));
        assert_eq!(Cloud::of_type_token("pulumi:pulumi:StackReference"), None);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(Cloud::from_str("DO"), Some(Cloud::DigitalOcean));
        assert_eq!(Cloud::from_str("k8s"), Some(Cloud::Kubernetes));
        assert_eq!(Cloud::from_str("aws"), None);
        assert_eq!(Cloud::all().len(), 3);
    }
}
