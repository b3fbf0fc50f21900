// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::env;
use std::path::PathBuf;

use crate::constants::metallb;

/// Provisioner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// MetalLB chart version to install
    pub chart_version: String,
    /// Address range handed to the IPAddressPool.
    /// The format is validated by the MetalLB webhook, not locally.
    pub ip_range: String,
    /// Optional helm values file passed to the install
    pub values_file: Option<PathBuf>,
    /// Optional kubeconfig path; the default client config is inferred when unset
    pub kubeconfig: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let chart_version =
            env::var("METALLB_VERSION").unwrap_or_else(|_| metallb::DEFAULT_VERSION.to_string());
        let ip_range =
            env::var("METALLB_IP_RANGE").unwrap_or_else(|_| metallb::DEFAULT_IP_RANGE.to_string());
        let values_file = env::var("METALLB_VALUES_FILE").ok().map(PathBuf::from);
        let kubeconfig = env::var("METALUP_KUBECONFIG").ok().map(PathBuf::from);

        Config {
            chart_version,
            ip_range,
            values_file,
            kubeconfig,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chart_version: metallb::DEFAULT_VERSION.to_string(),
            ip_range: metallb::DEFAULT_IP_RANGE.to_string(),
            values_file: None,
            kubeconfig: None,
        }
    }
}
