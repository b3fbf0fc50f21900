// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::info;

use metalup::config::Config;
use metalup::helm::HelmCli;
use metalup::kubernetes::{create_client, ApiApplier};
use metalup::metallb::deploy_metallb;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting MetalLB provisioner");

    // Load configuration
    let config = Config::from_env();
    info!(
        "Configuration loaded: chart_version={} ip_range={}",
        config.chart_version, config.ip_range
    );

    // Create Kubernetes client
    let client = create_client(config.kubeconfig.as_deref()).await?;
    info!("Connected to Kubernetes cluster");

    let installer = HelmCli::new();
    let applier = ApiApplier::new(client);

    deploy_metallb(&installer, &applier, &config).await?;

    Ok(())
}
