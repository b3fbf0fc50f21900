// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! MetalLB provisioning: the chart release plus the address pool and the L2
//! advertisement that announces it.

use tracing::{info, instrument};

use crate::config::Config;
use crate::constants::metallb;
use crate::error::Result;
use crate::resources::{ChartInstaller, HelmChartConfig, ManifestApplier, ManifestConfig};

/// The chart installation request for the configured version
pub fn chart_config(config: &Config) -> HelmChartConfig {
    HelmChartConfig {
        name: metallb::RELEASE_NAME.to_string(),
        namespace: metallb::NAMESPACE.to_string(),
        chart_name: metallb::CHART_NAME.to_string(),
        repository_url: metallb::REPOSITORY_URL.to_string(),
        version: config.chart_version.clone(),
        create_namespace: true,
        values_file: config.values_file.clone(),
        wait: true,
        timeout_secs: metallb::INSTALL_TIMEOUT_SECS,
    }
}

/// Render the IPAddressPool document for the given address range.
/// The range string is embedded as-is; the MetalLB webhook validates it.
pub fn ip_address_pool_yaml(namespace: &str, ip_range: &str) -> String {
    format!(
        r#"apiVersion: metallb.io/v1beta1
kind: IPAddressPool
metadata:
  name: {}
  namespace: {}
spec:
  addresses:
  - {}
"#,
        metallb::POOL_NAME,
        namespace,
        ip_range
    )
}

/// Render the L2Advertisement document announcing the default pool
pub fn l2_advertisement_yaml(namespace: &str) -> String {
    format!(
        r#"apiVersion: metallb.io/v1beta1
kind: L2Advertisement
metadata:
  name: {}
  namespace: {}
spec:
  ipAddressPools:
  - {}
"#,
        metallb::ADVERTISEMENT_NAME,
        namespace,
        metallb::POOL_NAME
    )
}

/// Provision MetalLB onto the cluster.
///
/// Installs the chart, then declares the address pool and the L2
/// advertisement, each depending on the chart release. Steps run strictly in
/// order and the first failure aborts the run; the cluster keeps whatever was
/// provisioned before the failure and the run can safely be repeated.
#[instrument(skip(installer, applier, config))]
pub async fn deploy_metallb<I, A>(installer: &I, applier: &A, config: &Config) -> Result<()>
where
    I: ChartInstaller + Sync,
    A: ManifestApplier + Sync,
{
    info!(
        "Deploying MetalLB version {} with IP range: {}",
        config.chart_version, config.ip_range
    );

    let release = installer.install(&chart_config(config)).await?;
    info!("MetalLB operator deployed successfully");

    applier
        .apply(
            &ManifestConfig {
                name: "metallb-ipaddresspool".to_string(),
                yaml: ip_address_pool_yaml(metallb::NAMESPACE, &config.ip_range),
            },
            &[&release],
        )
        .await?;
    info!("MetalLB IPAddressPool created successfully");

    applier
        .apply(
            &ManifestConfig {
                name: "metallb-l2advertisement".to_string(),
                yaml: l2_advertisement_yaml(metallb::NAMESPACE),
            },
            &[&release],
        )
        .await?;
    info!("MetalLB L2Advertisement created successfully");
    info!("MetalLB is now ready to assign external IPs to LoadBalancer services");

    Ok(())
}
