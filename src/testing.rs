//! In-memory `ClusterClient` and fixtures for tests.

use crate::kube::{ClusterClient, ClusterError, ListQuery, LogOptions, LogStream};
use async_trait::async_trait;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Pod, Service};
use k8s_openapi::api::events::v1::Event;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::{ApiResource, DynamicObject};
use kube::core::ErrorResponse;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    NotFound,
    Forbidden,
    /// Never answers; exercises deadlines.
    Hang,
}

impl Failure {
    fn error(&self, what: &str) -> ClusterError {
        match self {
            Failure::NotFound => ClusterError::NotFound(format!("{} not found", what)),
            Failure::Forbidden => ClusterError::from(kube::Error::Api(ErrorResponse {
                status: "Failure".to_string(),
                message: format!("{} is forbidden", what),
                reason: "Forbidden".to_string(),
                code: 403,
            })),
            Failure::Hang => unreachable!("hangs are handled before building an error"),
        }
    }
}

/// How a fake log stream ends after its canned lines.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogEnd {
    #[default]
    Complete,
    ReadError,
    Stall,
}

#[derive(Default)]
pub struct FakeCluster {
    pub version: Option<Info>,
    pub namespaces: Vec<Namespace>,
    pub pods: Vec<Pod>,
    pub services: Vec<Service>,
    pub deployments: Vec<Deployment>,
    pub config_maps: Vec<ConfigMap>,
    pub events: Vec<Event>,
    /// Log lines keyed by pod name.
    pub logs: HashMap<String, Vec<String>>,
    pub log_end: LogEnd,
    /// Custom objects keyed by plural.
    pub custom: HashMap<String, Vec<DynamicObject>>,
    /// Failures keyed by operation name or custom plural.
    pub failures: HashMap<String, Failure>,
    pub queries: Mutex<Vec<ListQuery>>,
    pub log_requests: Mutex<Vec<LogOptions>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, operation: &str, failure: Failure) -> Self {
        self.failures.insert(operation.to_string(), failure);
        self
    }

    pub fn with_custom(mut self, plural: &str, objects: Vec<DynamicObject>) -> Self {
        self.custom.entry(plural.to_string()).or_default().extend(objects);
        self
    }

    pub fn recorded_queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap().clone()
    }

    async fn check(&self, operation: &str) -> Result<(), ClusterError> {
        match self.failures.get(operation) {
            None => Ok(()),
            Some(Failure::Hang) => futures::future::pending().await,
            Some(failure) => Err(failure.error(operation)),
        }
    }

    async fn list<T: Clone>(
        &self,
        operation: &str,
        query: &ListQuery,
        items: &[T],
        namespace_of: impl Fn(&T) -> Option<&String>,
    ) -> Result<Vec<T>, ClusterError> {
        self.queries.lock().unwrap().push(query.clone());
        self.check(operation).await?;
        Ok(items
            .iter()
            .filter(|item| match &query.namespace {
                Some(ns) => namespace_of(item) == Some(ns),
                None => true,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn server_version(&self) -> Result<Info, ClusterError> {
        self.check("server_version").await?;
        Ok(self.version.clone().unwrap_or_else(|| Info {
            git_version: "v1.30.2".to_string(),
            platform: "linux/amd64".to_string(),
            ..Default::default()
        }))
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        self.check("list_namespaces").await?;
        Ok(self.namespaces.clone())
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError> {
        self.check("get_namespace").await?;
        self.namespaces
            .iter()
            .find(|ns| ns.metadata.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("namespaces \"{}\" not found", name)))
    }

    async fn list_pods(&self, query: &ListQuery) -> Result<Vec<Pod>, ClusterError> {
        self.list("list_pods", query, &self.pods, |p| p.metadata.namespace.as_ref())
            .await
    }

    async fn list_services(&self, query: &ListQuery) -> Result<Vec<Service>, ClusterError> {
        self.list("list_services", query, &self.services, |s| s.metadata.namespace.as_ref())
            .await
    }

    async fn list_deployments(&self, query: &ListQuery) -> Result<Vec<Deployment>, ClusterError> {
        self.list("list_deployments", query, &self.deployments, |d| {
            d.metadata.namespace.as_ref()
        })
        .await
    }

    async fn list_config_maps(&self, query: &ListQuery) -> Result<Vec<ConfigMap>, ClusterError> {
        self.list("list_config_maps", query, &self.config_maps, |c| {
            c.metadata.namespace.as_ref()
        })
        .await
    }

    async fn list_events(&self, query: &ListQuery) -> Result<Vec<Event>, ClusterError> {
        self.list("list_events", query, &self.events, |e| e.metadata.namespace.as_ref())
            .await
    }

    async fn pod_logs(
        &self,
        _namespace: &str,
        pod: &str,
        options: &LogOptions,
    ) -> Result<LogStream, ClusterError> {
        self.log_requests.lock().unwrap().push(options.clone());
        self.check("pod_logs").await?;
        let Some(lines) = self.logs.get(pod) else {
            return Err(ClusterError::NotFound(format!("pods \"{}\" not found", pod)));
        };
        let head = futures::stream::iter(lines.clone().into_iter().map(Ok));
        let stream = match self.log_end {
            LogEnd::Complete => head.boxed(),
            LogEnd::ReadError => head
                .chain(futures::stream::once(async {
                    Err(ClusterError::Stream(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "connection reset",
                    )))
                }))
                .boxed(),
            LogEnd::Stall => head.chain(futures::stream::pending()).boxed(),
        };
        Ok(stream)
    }

    async fn list_custom(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>, ClusterError> {
        self.check(&resource.plural).await?;
        Ok(self
            .custom
            .get(&resource.plural)
            .map(|items| {
                items
                    .iter()
                    .filter(|o| namespace.is_none() || o.metadata.namespace.as_deref() == namespace)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_custom(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, ClusterError> {
        self.check(&resource.plural).await?;
        self.custom
            .get(&resource.plural)
            .and_then(|items| {
                items.iter().find(|o| {
                    o.metadata.name.as_deref() == Some(name)
                        && o.metadata.namespace.as_deref() == namespace
                })
            })
            .cloned()
            .ok_or_else(|| {
                ClusterError::NotFound(format!("{} \"{}\" not found", resource.plural, name))
            })
    }
}

pub fn namespace(name: &str) -> Namespace {
    serde_json::from_value(json!({
        "metadata": {
            "name": name,
            "creationTimestamp": "2024-01-02T03:04:05Z",
            "labels": { "kubernetes.io/metadata.name": name }
        },
        "status": { "phase": "Active" }
    }))
    .unwrap()
}

/// A running pod whose containers are all ready.
pub fn pod(namespace: &str, name: &str, containers: &[&str], annotations: Value) -> Pod {
    let specs: Vec<Value> = containers.iter().map(|c| json!({ "name": c })).collect();
    let statuses: Vec<Value> = containers
        .iter()
        .map(|c| json!({ "name": c, "ready": true, "restartCount": 0, "image": "img", "imageID": "" }))
        .collect();
    serde_json::from_value(json!({
        "metadata": {
            "name": name,
            "namespace": namespace,
            "creationTimestamp": "2024-05-01T10:00:00Z",
            "annotations": annotations
        },
        "spec": { "containers": specs, "nodeName": "worker-1" },
        "status": { "phase": "Running", "containerStatuses": statuses }
    }))
    .unwrap()
}

/// A Sail Operator object of `kind` with the given status block.
pub fn sail_object(kind: &str, namespace: Option<&str>, name: &str, status: Value) -> DynamicObject {
    serde_json::from_value(json!({
        "apiVersion": "sailoperator.io/v1",
        "kind": kind,
        "metadata": { "name": name, "namespace": namespace },
        "spec": { "version": "v1.24.1" },
        "status": status
    }))
    .unwrap()
}

pub fn healthy_status() -> Value {
    json!({
        "state": "Healthy",
        "conditions": [
            { "type": "Ready", "status": "True" },
            { "type": "Reconciled", "status": "True" }
        ]
    })
}
