// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes plumbing: client creation, API discovery, manifest application.

pub mod apply;
pub mod client;
pub mod discovery;

pub use apply::ApiApplier;
pub use client::create_client;
pub use discovery::wait_for_api;
