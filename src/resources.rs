// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Collaborator contracts for chart installation and manifest application.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Opaque handle to a resource that has been provisioned on the cluster.
///
/// Handles are only ever passed back into dependent calls; callers never
/// inspect them beyond logging. Holding one proves the producing call
/// completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    name: String,
}

impl ResourceHandle {
    pub fn new(name: impl Into<String>) -> Self {
        ResourceHandle { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A chart installation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmChartConfig {
    /// Release name
    pub name: String,
    /// Namespace to install into
    pub namespace: String,
    /// Chart name within the repository
    pub chart_name: String,
    /// Chart repository URL
    pub repository_url: String,
    /// Chart version
    pub version: String,
    /// Create the namespace if it does not exist
    pub create_namespace: bool,
    /// Optional values file passed to the install
    pub values_file: Option<PathBuf>,
    /// Block until the release reports ready
    pub wait: bool,
    /// Upper bound on the wait, in seconds
    pub timeout_secs: u64,
}

/// A raw manifest application request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    /// Name used for logging and progress reporting
    pub name: String,
    /// The declarative document to apply
    pub yaml: String,
}

/// Installs packaged charts onto the cluster.
#[async_trait]
pub trait ChartInstaller {
    /// Install (or upgrade) a chart release. Blocks until the installer
    /// reports readiness or its bounded timeout elapses when the request asks
    /// for it. Errors are returned to the caller unmodified.
    async fn install(&self, chart: &HelmChartConfig) -> Result<ResourceHandle>;
}

/// Applies raw declarative documents to the cluster.
#[async_trait]
pub trait ManifestApplier {
    /// Apply a document, optionally after the given resources have been
    /// provisioned. Reapplying the same document converges to the same state.
    async fn apply(
        &self,
        manifest: &ManifestConfig,
        depends_on: &[&ResourceHandle],
    ) -> Result<ResourceHandle>;
}
