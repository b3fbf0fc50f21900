// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request seen by the mock API server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// A mock API server that returns predefined responses based on request
/// method and path, and records every request it serves.
#[derive(Clone)]
pub struct MockApiServer {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApiServer {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// The requests served so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /apis/metallb.io/v1beta1/...
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockApiServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let server = self.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            server.requests.lock().unwrap().push(RecordedRequest {
                method: method.clone(),
                path: path.clone(),
                body: String::from_utf8_lossy(&bytes).to_string(),
            });

            match server.find_response(&method, &path) {
                Some((status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}

/// Core API versions response for GET /api
pub fn core_api_versions_json() -> String {
    serde_json::json!({
        "kind": "APIVersions",
        "versions": ["v1"],
        "serverAddressByClientCIDRs": [
            {"clientCIDR": "0.0.0.0/0", "serverAddress": "10.96.0.1:443"}
        ]
    })
    .to_string()
}

/// API group list containing the metallb.io group
pub fn api_group_list_json() -> String {
    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": [
            {
                "name": "metallb.io",
                "versions": [
                    {"groupVersion": "metallb.io/v1beta1", "version": "v1beta1"}
                ],
                "preferredVersion": {
                    "groupVersion": "metallb.io/v1beta1",
                    "version": "v1beta1"
                }
            }
        ]
    })
    .to_string()
}

/// API group list with no groups registered
pub fn empty_api_group_list_json() -> String {
    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": []
    })
    .to_string()
}

/// Resource list for the metallb.io/v1beta1 group version
pub fn metallb_api_resources_json() -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "metallb.io/v1beta1",
        "resources": [
            {
                "name": "ipaddresspools",
                "singularName": "ipaddresspool",
                "namespaced": true,
                "kind": "IPAddressPool",
                "verbs": ["get", "list", "watch", "create", "update", "patch", "delete"]
            },
            {
                "name": "l2advertisements",
                "singularName": "l2advertisement",
                "namespaced": true,
                "kind": "L2Advertisement",
                "verbs": ["get", "list", "watch", "create", "update", "patch", "delete"]
            }
        ]
    })
    .to_string()
}

/// A minimal applied-object response for a namespaced custom resource
pub fn applied_json(kind: &str, name: &str, namespace: &str) -> String {
    serde_json::json!({
        "apiVersion": "metallb.io/v1beta1",
        "kind": kind,
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        }
    })
    .to_string()
}
