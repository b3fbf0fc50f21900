// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetalupError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("helm invocation failed: {0}")]
    HelmError(String),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid manifest: {0}")]
    ManifestError(String),

    #[error("API not available: {0}")]
    ApiNotAvailable(String),
}

pub type Result<T> = std::result::Result<T, MetalupError>;
