// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Chart installation via the helm binary

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::error::{MetalupError, Result};
use crate::resources::{ChartInstaller, HelmChartConfig, ResourceHandle};

/// Chart installer backed by the `helm` binary.
pub struct HelmCli {
    binary: String,
}

impl HelmCli {
    pub fn new() -> Self {
        HelmCli {
            binary: "helm".to_string(),
        }
    }

    /// Use a helm binary other than the one on PATH
    pub fn with_binary(binary: impl Into<String>) -> Self {
        HelmCli {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<String> {
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                MetalupError::HelmError(format!("failed to execute {}: {}", self.binary, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MetalupError::HelmError(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for HelmCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChartInstaller for HelmCli {
    #[instrument(skip(self, chart), fields(release = %chart.name))]
    async fn install(&self, chart: &HelmChartConfig) -> Result<ResourceHandle> {
        self.run(&repo_add_args(chart)).await?;
        self.run(&[
            "repo".to_string(),
            "update".to_string(),
            chart.name.clone(),
        ])
        .await?;
        self.run(&install_args(chart)).await?;

        info!(
            "Release {} installed into namespace {}",
            chart.name, chart.namespace
        );

        Ok(ResourceHandle::new(chart.name.clone()))
    }
}

/// Arguments registering the chart repository under the release name
fn repo_add_args(chart: &HelmChartConfig) -> Vec<String> {
    vec![
        "repo".to_string(),
        "add".to_string(),
        "--force-update".to_string(),
        chart.name.clone(),
        chart.repository_url.clone(),
    ]
}

/// Build the `helm upgrade --install` argument list for a chart request
pub fn install_args(chart: &HelmChartConfig) -> Vec<String> {
    let mut args = vec![
        "upgrade".to_string(),
        "--install".to_string(),
        chart.name.clone(),
        format!("{}/{}", chart.name, chart.chart_name),
        "--namespace".to_string(),
        chart.namespace.clone(),
        "--version".to_string(),
        chart.version.clone(),
    ];

    if chart.create_namespace {
        args.push("--create-namespace".to_string());
    }

    if let Some(values) = &chart.values_file {
        args.push("--values".to_string());
        args.push(values.display().to_string());
    }

    if chart.wait {
        args.push("--wait".to_string());
        args.push("--timeout".to_string());
        args.push(format!("{}s", chart.timeout_secs));
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_chart() -> HelmChartConfig {
        HelmChartConfig {
            name: "metallb".to_string(),
            namespace: "metallb-system".to_string(),
            chart_name: "metallb".to_string(),
            repository_url: "https://metallb.github.io/metallb".to_string(),
            version: "0.14.9".to_string(),
            create_namespace: true,
            values_file: None,
            wait: true,
            timeout_secs: 300,
        }
    }

    #[test]
    fn test_install_args_carry_version() {
        let args = install_args(&make_chart());

        let version_flag = args.iter().position(|a| a == "--version").unwrap();
        assert_eq!(args[version_flag + 1], "0.14.9");
    }

    #[test]
    fn test_install_args_target_namespace() {
        let args = install_args(&make_chart());

        let ns_flag = args.iter().position(|a| a == "--namespace").unwrap();
        assert_eq!(args[ns_flag + 1], "metallb-system");
        assert!(args.contains(&"--create-namespace".to_string()));
    }

    #[test]
    fn test_install_args_skip_create_namespace_when_disabled() {
        let chart = HelmChartConfig {
            create_namespace: false,
            ..make_chart()
        };

        let args = install_args(&chart);

        assert!(!args.contains(&"--create-namespace".to_string()));
    }

    #[test]
    fn test_install_args_wait_with_timeout() {
        let args = install_args(&make_chart());

        assert!(args.contains(&"--wait".to_string()));
        let timeout_flag = args.iter().position(|a| a == "--timeout").unwrap();
        assert_eq!(args[timeout_flag + 1], "300s");
    }

    #[test]
    fn test_install_args_without_wait_have_no_timeout() {
        let chart = HelmChartConfig {
            wait: false,
            ..make_chart()
        };

        let args = install_args(&chart);

        assert!(!args.contains(&"--wait".to_string()));
        assert!(!args.contains(&"--timeout".to_string()));
    }

    #[test]
    fn test_install_args_include_values_file() {
        let chart = HelmChartConfig {
            values_file: Some(PathBuf::from("values/metallb.yaml")),
            ..make_chart()
        };

        let args = install_args(&chart);

        let values_flag = args.iter().position(|a| a == "--values").unwrap();
        assert_eq!(args[values_flag + 1], "values/metallb.yaml");
    }

    #[test]
    fn test_repo_add_args_use_release_name_as_alias() {
        let args = repo_add_args(&make_chart());

        assert_eq!(
            args,
            vec![
                "repo",
                "add",
                "--force-update",
                "metallb",
                "https://metallb.github.io/metallb"
            ]
        );
    }
}
