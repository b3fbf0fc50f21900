// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation and kubeconfig loading

use std::path::Path;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use tracing::debug;

use crate::error::{MetalupError, Result};

/// Create a Kubernetes client, preferring an explicit kubeconfig when given
pub async fn create_client(kubeconfig: Option<&Path>) -> Result<Client> {
    match kubeconfig {
        Some(path) => {
            debug!("Using kubeconfig at {}", path.display());
            let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                MetalupError::KubeconfigError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            create_client_from_kubeconfig(&contents).await
        }
        None => Ok(Client::try_default().await?),
    }
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| MetalupError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config = KConfig::from_custom_kubeconfig(parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| MetalupError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| MetalupError::KubeconfigError(format!("Failed to create client: {}", e)))
}
