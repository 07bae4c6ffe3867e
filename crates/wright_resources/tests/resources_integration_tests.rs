//! Integration tests for typed resource declarations.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::json;
use wright_engine::{EngineError, RecordingEngine, ResourceOptions, RunContext, StackSettings};
use wright_resources::civo::{
    Firewall, FirewallArgs, KubernetesCluster, KubernetesClusterArgs, KubernetesClusterPoolsArgs,
};
use wright_resources::kubernetes::{KubernetesObject, Provider, ProviderArgs};
use wright_resources::{Cloud, StackReference, StackReferenceArgs};

fn context(engine: &RecordingEngine) -> RunContext {
    RunContext::new("resources", StackSettings::new("dev"), Arc::new(engine.clone()))
}

#[tokio::test]
async fn test_cluster_references_firewall() {
    let engine = RecordingEngine::new();
    let mut ctx = context(&engine);

    let firewall = Firewall::new(
        &mut ctx,
        "firewall",
        &FirewallArgs {
            region: Some("LON1".into()),
            ..Default::default()
        },
        ResourceOptions::new(),
    )
    .await
    .unwrap();

    let cluster = KubernetesCluster::new(
        &mut ctx,
        "cluster",
        &KubernetesClusterArgs {
            firewall_id: firewall.id().into(),
            pools: KubernetesClusterPoolsArgs {
                size: "g4s.kube.small".into(),
                node_count: 1.into(),
                label: None,
            },
            ..Default::default()
        },
        ResourceOptions::new(),
    )
    .await
    .unwrap();

    assert_eq!(cluster.kubeconfig().expression(), "cluster.kubeconfig");
    let recorded = engine.resource("cluster").unwrap();
    assert_eq!(recorded.type_token, "civo:index/kubernetesCluster:KubernetesCluster");
    assert_eq!(recorded.properties["firewallId"], json!({ "$ref": "firewall.id" }));
    assert_eq!(Cloud::of_type_token(&recorded.type_token), Some(Cloud::Civo));
}

#[tokio::test]
async fn test_kubernetes_object_through_provider() {
    let engine = RecordingEngine::new();
    let mut ctx = context(&engine);

    let reference = StackReference::new(
        &mut ctx,
        "upstream",
        &StackReferenceArgs {
            name: "org/cluster/dev".into(),
        },
        ResourceOptions::new(),
    )
    .await
    .unwrap();

    let provider = Provider::new(
        &mut ctx,
        "k8s",
        &ProviderArgs {
            kubeconfig: Some(reference.output("kubeconfig").into()),
            ..Default::default()
        },
        ResourceOptions::new(),
    )
    .await
    .unwrap();

    let config_map = ConfigMap {
        metadata: ObjectMeta {
            name: Some("settings".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([("key".to_string(), "value".to_string())])),
        ..Default::default()
    };

    let object = KubernetesObject::new(&mut ctx, "settings", &config_map, provider.options())
        .await
        .unwrap();

    assert_eq!(object.kind(), "ConfigMap");
    assert_eq!(object.metadata_name().expression(), "settings.metadata.name");

    let recorded = engine.resource("settings").unwrap();
    assert_eq!(recorded.type_token, "kubernetes:core/v1:ConfigMap");
    assert_eq!(recorded.properties["apiVersion"], json!("v1"));
    assert_eq!(recorded.properties["data"], json!({ "key": "value" }));
    assert_eq!(recorded.options.provider.as_deref(), Some("k8s"));

    let provider_request = engine.resource("k8s").unwrap();
    assert_eq!(
        provider_request.properties["kubeconfig"],
        json!({ "$ref": "upstream.outputs[\"kubeconfig\"]" })
    );
}

#[tokio::test]
async fn test_object_requires_declared_provider() {
    let engine = RecordingEngine::new();
    let mut ctx = context(&engine);

    let options = ResourceOptions {
        provider: Some("missing".to_string()),
        ..Default::default()
    };
    let err = KubernetesObject::new(&mut ctx, "settings", &ConfigMap::default(), options)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::UnknownReference { .. }));
    assert_eq!(engine.call_count(), 0);
}
