//! Nginx serving a configurable page on a cluster from another stack.
//!
//! The cluster's kubeconfig comes from the `kubeconfig` output of the cluster
//! stack. The page lives in a ConfigMap mounted over nginx's `index.html`;
//! Stakater Reloader restarts the deployment whenever the ConfigMap changes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use serde_json::json;
use tracing::info;

use wright_engine::{EngineResult, ResourceOptions, RunContext, StackProgram};
use wright_resources::kubernetes::{
    KubernetesObject, Provider, ProviderArgs, Release, ReleaseArgs, RepositoryOptsArgs,
    ServiceSpecType,
};
use wright_resources::{StackReference, StackReferenceArgs};

pub const DEFAULT_CLUSTER_STACK: &str = "dirien/00-solution/dev";
pub const TITLE_KEY: &str = "nginxTitle";
pub const BODY_KEY: &str = "nginxBody";

pub const CONFIG_MAP_NAME: &str = "nginx-config";
pub const DEPLOYMENT_NAME: &str = "nginx-deployment";
pub const SERVICE_NAME: &str = "nginx-service";
pub const APP_LABEL: &str = "nginx";
pub const IMAGE: &str = "nginx:latest";
pub const CONTAINER_PORT: i32 = 80;
pub const SERVICE_PORT: i32 = 8080;
pub const RELOADER_ANNOTATION: &str = "reloader.stakater.com/auto";
pub const RELOADER_REPO: &str = "https://stakater.github.io/stakater-charts";

const PAGE_KEY: &str = "index.html";
const HTML_VOLUME: &str = "nginx-html";
const HTML_MOUNT_PATH: &str = "/usr/share/nginx/html/index.html";

/// Render the page served by nginx.
pub fn index_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
</head>
<body>
    <h1>{body}</h1>
</body>
</html>
"#
    )
}

/// Nginx deployment, LoadBalancer service and Reloader release. Exports `serviceName`.
#[derive(Debug, Clone)]
pub struct NginxApp {
    cluster_stack: String,
}

impl NginxApp {
    pub fn new(cluster_stack: impl Into<String>) -> Self {
        Self {
            cluster_stack: cluster_stack.into(),
        }
    }

    pub fn cluster_stack(&self) -> &str {
        &self.cluster_stack
    }
}

impl Default for NginxApp {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_STACK)
    }
}

fn config_map(title: &str, body: &str) -> ConfigMap {
    ConfigMap {
        metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta {
            name: Some(CONFIG_MAP_NAME.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(PAGE_KEY.to_string(), index_html(title, body))])),
        ..Default::default()
    }
}

fn deployment() -> serde_json::Result<Deployment> {
    serde_json::from_value(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": DEPLOYMENT_NAME,
            "annotations": {
                RELOADER_ANNOTATION: "true"
            }
        },
        "spec": {
            "replicas": 1,
            "selector": {
                "matchLabels": { "app": APP_LABEL }
            },
            "template": {
                "metadata": {
                    "labels": { "app": APP_LABEL }
                },
                "spec": {
                    "containers": [{
                        "name": APP_LABEL,
                        "image": IMAGE,
                        "ports": [{ "containerPort": CONTAINER_PORT }],
                        "volumeMounts": [{
                            "name": HTML_VOLUME,
                            "mountPath": HTML_MOUNT_PATH,
                            "subPath": PAGE_KEY
                        }]
                    }],
                    "volumes": [{
                        "name": HTML_VOLUME,
                        "configMap": {
                            "name": CONFIG_MAP_NAME,
                            "items": [{ "key": PAGE_KEY, "path": PAGE_KEY }]
                        }
                    }]
                }
            }
        }
    }))
}

fn service() -> serde_json::Result<Service> {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": SERVICE_NAME },
        "spec": {
            "selector": { "app": APP_LABEL },
            "type": ServiceSpecType::LoadBalancer.as_str(),
            "ports": [{
                "port": SERVICE_PORT,
                "targetPort": CONTAINER_PORT
            }]
        }
    }))
}

fn reloader_release() -> ReleaseArgs {
    ReleaseArgs {
        chart: "reloader".into(),
        namespace: Some("reloader".into()),
        create_namespace: Some(true.into()),
        repository_opts: Some(RepositoryOptsArgs {
            repo: Some(RELOADER_REPO.into()),
            ..Default::default()
        }),
        values: BTreeMap::from([("reloader".to_string(), json!({ "reloadOnCreate": true }))]),
        ..Default::default()
    }
}

#[async_trait]
impl StackProgram for NginxApp {
    fn name(&self) -> &str {
        "nginx-app"
    }

    fn project(&self) -> &str {
        "01-solution"
    }

    fn description(&self) -> &str {
        "Nginx with a configurable page, a LoadBalancer service and Stakater Reloader"
    }

    async fn run(&self, ctx: &mut RunContext) -> EngineResult<()> {
        let title = ctx.config().require(TITLE_KEY)?;
        let body = ctx.config().require(BODY_KEY)?;

        let kubeconfig = StackReference::new(
            ctx,
            "kubeconfig",
            &StackReferenceArgs {
                name: self.cluster_stack.as_str().into(),
            },
            ResourceOptions::new(),
        )
        .await?;

        let provider = Provider::new(
            ctx,
            "do_k8s_provider",
            &ProviderArgs {
                enable_server_side_apply: Some(true.into()),
                kubeconfig: Some(kubeconfig.output("kubeconfig").into()),
                ..Default::default()
            },
            ResourceOptions::new(),
        )
        .await?;

        KubernetesObject::new(ctx, "nginxConfigMap", &config_map(&title, &body), provider.options())
            .await?;

        KubernetesObject::new(ctx, "nginxDeployment", &deployment()?, provider.options())
            .await?;

        let service = KubernetesObject::new(ctx, "nginxService", &service()?, provider.options())
            .await?;

        Release::new(ctx, "reloader", &reloader_release(), provider.options())
            .await?;

        info!("Nginx will be reachable on port {} of {}", SERVICE_PORT, SERVICE_NAME);
        ctx.export("serviceName", service.metadata_name())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    #[test]
    fn test_index_html() {
        let page = index_html("Hello", "World");
        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains("    <title>Hello</title>\n"));
        assert!(page.contains("    <h1>World</h1>\n"));
        assert!(page.ends_with("</html>\n"));
    }

    #[test]
    fn test_deployment_spec() {
        let deployment = deployment().unwrap();
        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(1));

        let pod = spec.template.spec.unwrap();
        let container = &pod.containers[0];
        assert_eq!(container.image.as_deref(), Some(IMAGE));
        assert_eq!(container.ports.as_ref().unwrap()[0].container_port, 80);

        let mount = &container.volume_mounts.as_ref().unwrap()[0];
        assert_eq!(mount.mount_path, HTML_MOUNT_PATH);
        assert_eq!(mount.sub_path.as_deref(), Some("index.html"));
    }

    #[test]
    fn test_service_spec() {
        let service = service().unwrap();
        let spec = service.spec.unwrap();
        assert_eq!(spec.type_.as_deref(), Some("LoadBalancer"));

        let port = &spec.ports.unwrap()[0];
        assert_eq!(port.port, 8080);
        assert_eq!(port.target_port, Some(IntOrString::Int(80)));
    }

    #[test]
    fn test_config_map_page() {
        let config_map = config_map("T", "B");
        assert_eq!(config_map.metadata.name.as_deref(), Some(CONFIG_MAP_NAME));
        assert_eq!(config_map.data.unwrap()["index.html"], index_html("T", "B"));
    }
}
