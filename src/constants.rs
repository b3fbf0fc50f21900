// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "metalup";

/// MetalLB chart and resource identity
pub mod metallb {
    /// Namespace the chart release and its custom resources live in
    pub const NAMESPACE: &str = "metallb-system";
    /// Helm release name
    pub const RELEASE_NAME: &str = "metallb";
    /// Chart name within the repository
    pub const CHART_NAME: &str = "metallb";
    /// Upstream chart repository
    pub const REPOSITORY_URL: &str = "https://metallb.github.io/metallb";
    /// Chart version installed when METALLB_VERSION is not set
    pub const DEFAULT_VERSION: &str = "0.14.9";
    /// Address range used when METALLB_IP_RANGE is not set (fits kind/Docker networks)
    pub const DEFAULT_IP_RANGE: &str = "172.18.255.200-172.18.255.250";
    /// Name of the IPAddressPool custom resource
    pub const POOL_NAME: &str = "default-pool";
    /// Name of the L2Advertisement custom resource
    pub const ADVERTISEMENT_NAME: &str = "default-l2-advertisement";
    /// Seconds helm is given to report the release ready
    pub const INSTALL_TIMEOUT_SECS: u64 = 300;
}

/// API discovery polling configuration
pub mod api_poll {
    /// Initial polling interval in seconds when waiting for an API to register
    pub const POLL_INTERVAL_SECS: u64 = 2;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 30;
    /// Polling attempts before giving up on an API
    pub const POLL_MAX_ATTEMPTS: u32 = 10;
}
