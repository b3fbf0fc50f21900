// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API availability checking for chart-provided custom resources

use std::time::Duration;

use kube::api::GroupVersionKind;
use kube::discovery::{ApiResource, Discovery};
use kube::Client;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::constants::api_poll::POLL_MAX_INTERVAL_SECS;
use crate::error::{MetalupError, Result};

/// Wait for an API kind to become discoverable and resolve its ApiResource.
///
/// The MetalLB custom resource definitions are registered by the chart, so a
/// freshly installed release may not serve them immediately. Polls discovery
/// with exponential backoff and gives up after `max_attempts`.
pub async fn wait_for_api(
    client: &Client,
    gvk: &GroupVersionKind,
    max_attempts: u32,
    initial_interval: Duration,
) -> Result<ApiResource> {
    let mut interval = initial_interval;

    for attempt in 1..=max_attempts {
        match check_api_available(client, gvk).await {
            Ok(Some(resource)) => {
                debug!(
                    "API {}/{} ({}) is available",
                    gvk.group, gvk.version, gvk.kind
                );
                return Ok(resource);
            }
            Ok(None) => {
                info!(
                    "API {}/{} ({}) not yet available, waiting {:?}...",
                    gvk.group, gvk.version, gvk.kind, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error discovering {}/{}: {}, retrying in {:?}...",
                    gvk.group, gvk.version, e, interval
                );
            }
        }

        if attempt < max_attempts {
            sleep(interval).await;

            // Exponential backoff with max cap
            interval = (interval * 2).min(Duration::from_secs(POLL_MAX_INTERVAL_SECS));
        }
    }

    Err(MetalupError::ApiNotAvailable(format!(
        "{}/{} ({})",
        gvk.group, gvk.version, gvk.kind
    )))
}

/// Check whether the kind is served by attempting to discover its group.
async fn check_api_available(
    client: &Client,
    gvk: &GroupVersionKind,
) -> Result<Option<ApiResource>> {
    let discovery = Discovery::new(client.clone())
        .filter(&[gvk.group.as_str()])
        .run()
        .await?;

    Ok(discovery.resolve_gvk(gvk).map(|(resource, _)| resource))
}
