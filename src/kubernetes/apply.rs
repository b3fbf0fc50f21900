// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Server-side apply of raw declarative documents

use std::time::Duration;

use async_trait::async_trait;
use kube::api::{Api, DynamicObject, GroupVersionKind, Patch, PatchParams};
use kube::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::constants::api_poll::{POLL_INTERVAL_SECS, POLL_MAX_ATTEMPTS};
use crate::constants::FIELD_MANAGER;
use crate::error::{MetalupError, Result};
use crate::kubernetes::discovery::wait_for_api;
use crate::resources::{ManifestApplier, ManifestConfig, ResourceHandle};

/// The identifying head of a declarative document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestHead {
    api_version: String,
    kind: String,
    metadata: ManifestMeta,
}

#[derive(Debug, Deserialize)]
struct ManifestMeta {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

impl ManifestHead {
    fn gvk(&self) -> GroupVersionKind {
        let (group, version) = match self.api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", self.api_version.as_str()),
        };

        GroupVersionKind {
            group: group.to_string(),
            version: version.to_string(),
            kind: self.kind.clone(),
        }
    }
}

/// Manifest applier backed by server-side apply against the API server.
///
/// Reapplying the same document under the same field manager converges to the
/// same state.
pub struct ApiApplier {
    client: Client,
    api_poll_attempts: u32,
    api_poll_interval: Duration,
}

impl ApiApplier {
    pub fn new(client: Client) -> Self {
        ApiApplier {
            client,
            api_poll_attempts: POLL_MAX_ATTEMPTS,
            api_poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
        }
    }

    /// Override the API discovery poll attempts and interval
    pub fn with_api_poll(mut self, attempts: u32, interval: Duration) -> Self {
        self.api_poll_attempts = attempts;
        self.api_poll_interval = interval;
        self
    }
}

#[async_trait]
impl ManifestApplier for ApiApplier {
    #[instrument(skip(self, manifest, depends_on), fields(manifest = %manifest.name))]
    async fn apply(
        &self,
        manifest: &ManifestConfig,
        depends_on: &[&ResourceHandle],
    ) -> Result<ResourceHandle> {
        let doc: serde_json::Value = serde_yaml::from_str(&manifest.yaml)
            .map_err(|e| MetalupError::ManifestError(format!("{}: {}", manifest.name, e)))?;
        let head: ManifestHead = serde_json::from_value(doc.clone())
            .map_err(|e| MetalupError::ManifestError(format!("{}: {}", manifest.name, e)))?;

        if !depends_on.is_empty() {
            let deps = depends_on
                .iter()
                .map(|handle| handle.name())
                .collect::<Vec<_>>()
                .join(", ");
            debug!("{} depends on: {}", manifest.name, deps);
        }

        let gvk = head.gvk();
        let resource = wait_for_api(
            &self.client,
            &gvk,
            self.api_poll_attempts,
            self.api_poll_interval,
        )
        .await?;

        let api: Api<DynamicObject> = match head.metadata.namespace.as_deref() {
            Some(namespace) => Api::namespaced_with(self.client.clone(), namespace, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        };

        let params = PatchParams::apply(FIELD_MANAGER).force();
        api.patch(&head.metadata.name, &params, &Patch::Apply(&doc))
            .await?;

        info!("Applied {} {}", head.kind, head.metadata.name);

        Ok(ResourceHandle::new(manifest.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        api_group_list_json, applied_json, core_api_versions_json, empty_api_group_list_json,
        metallb_api_resources_json, MockApiServer,
    };

    fn pool_manifest() -> ManifestConfig {
        ManifestConfig {
            name: "metallb-ipaddresspool".to_string(),
            yaml: r#"apiVersion: metallb.io/v1beta1
kind: IPAddressPool
metadata:
  name: default-pool
  namespace: metallb-system
spec:
  addresses:
  - 172.18.255.200-172.18.255.250
"#
            .to_string(),
        }
    }

    fn mock_with_metallb_apis() -> MockApiServer {
        MockApiServer::new()
            .on_get("/api", 200, &core_api_versions_json())
            .on_get("/apis", 200, &api_group_list_json())
            .on_get(
                "/apis/metallb.io/v1beta1",
                200,
                &metallb_api_resources_json(),
            )
    }

    #[tokio::test]
    async fn test_apply_patches_pool_with_server_side_apply() {
        let mock = mock_with_metallb_apis().on_patch(
            "/apis/metallb.io/v1beta1/namespaces/metallb-system/ipaddresspools/default-pool",
            200,
            &applied_json("IPAddressPool", "default-pool", "metallb-system"),
        );
        let applier = ApiApplier::new(mock.clone().into_client())
            .with_api_poll(1, Duration::from_millis(1));

        let handle = applier.apply(&pool_manifest(), &[]).await.unwrap();

        assert_eq!(handle.name(), "metallb-ipaddresspool");
        let patch = mock
            .requests()
            .into_iter()
            .find(|r| r.method == "PATCH")
            .expect("no PATCH request recorded");
        assert_eq!(
            patch.path,
            "/apis/metallb.io/v1beta1/namespaces/metallb-system/ipaddresspools/default-pool"
        );
        assert!(patch.body.contains("172.18.255.200-172.18.255.250"));
    }

    #[tokio::test]
    async fn test_apply_rejects_document_without_api_version() {
        let mock = mock_with_metallb_apis();
        let applier = ApiApplier::new(mock.clone().into_client())
            .with_api_poll(1, Duration::from_millis(1));
        let manifest = ManifestConfig {
            name: "broken".to_string(),
            yaml: "kind: IPAddressPool\nmetadata:\n  name: default-pool\n".to_string(),
        };

        let err = applier.apply(&manifest, &[]).await.unwrap_err();

        assert!(matches!(err, MetalupError::ManifestError(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_apply_gives_up_when_api_never_registers() {
        let mock = MockApiServer::new()
            .on_get("/api", 200, &core_api_versions_json())
            .on_get("/apis", 200, &empty_api_group_list_json());
        let applier = ApiApplier::new(mock.clone().into_client())
            .with_api_poll(2, Duration::from_millis(1));

        let err = applier.apply(&pool_manifest(), &[]).await.unwrap_err();

        assert!(matches!(err, MetalupError::ApiNotAvailable(_)));
        assert!(!mock.requests().iter().any(|r| r.method == "PATCH"));
    }

    #[test]
    fn test_manifest_head_splits_group_and_version() {
        let head: ManifestHead = serde_yaml::from_str(&pool_manifest().yaml).unwrap();

        let gvk = head.gvk();
        assert_eq!(gvk.group, "metallb.io");
        assert_eq!(gvk.version, "v1beta1");
        assert_eq!(gvk.kind, "IPAddressPool");
    }

    #[test]
    fn test_manifest_head_handles_core_api_version() {
        let head: ManifestHead =
            serde_yaml::from_str("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: test\n")
                .unwrap();

        let gvk = head.gvk();
        assert_eq!(gvk.group, "");
        assert_eq!(gvk.version, "v1");
    }
}
