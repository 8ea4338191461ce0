pub mod error;
pub mod tools;
pub mod types;

pub use error::ClusterError;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{AsyncBufReadExt, Stream, StreamExt, TryStreamExt};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Pod, Service};
use k8s_openapi::api::events::v1::Event;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::{Api, ApiResource, DynamicObject, ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::PathBuf;
use tracing::*;

/// Line-by-line pod log stream. Opening errors arrive as the first item.
pub type LogStream = BoxStream<'static, Result<String, ClusterError>>;

/// Scope and filters for a list call. Selectors are passed to the API server verbatim.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub namespace: Option<String>,
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new(namespace: Option<String>, label_selector: Option<String>) -> Self {
        ListQuery {
            namespace: non_empty(namespace),
            label_selector: non_empty(label_selector),
            ..Default::default()
        }
    }

    fn params(&self) -> ListParams {
        let mut params = ListParams::default();
        if let Some(labels) = &self.label_selector {
            params = params.labels(labels);
        }
        if let Some(fields) = &self.field_selector {
            params = params.fields(fields);
        }
        if let Some(limit) = self.limit {
            params = params.limit(limit);
        }
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub container: Option<String>,
    pub tail_lines: Option<i64>,
    pub follow: bool,
    pub previous: bool,
    pub since_seconds: Option<i64>,
}

impl LogOptions {
    fn params(&self) -> LogParams {
        LogParams {
            container: self.container.clone(),
            tail_lines: self.tail_lines,
            follow: self.follow,
            previous: self.previous,
            since_seconds: self.since_seconds,
            ..Default::default()
        }
    }
}

/// Read-only access to the cluster objects the tools need.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn server_version(&self) -> Result<Info, ClusterError>;

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError>;

    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError>;

    async fn list_pods(&self, query: &ListQuery) -> Result<Vec<Pod>, ClusterError>;

    async fn list_services(&self, query: &ListQuery) -> Result<Vec<Service>, ClusterError>;

    async fn list_deployments(&self, query: &ListQuery) -> Result<Vec<Deployment>, ClusterError>;

    async fn list_config_maps(&self, query: &ListQuery) -> Result<Vec<ConfigMap>, ClusterError>;

    async fn list_events(&self, query: &ListQuery) -> Result<Vec<Event>, ClusterError>;

    async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        options: &LogOptions,
    ) -> Result<LogStream, ClusterError>;

    /// Lists custom resources; `namespace = None` lists across the cluster.
    async fn list_custom(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>, ClusterError>;

    async fn get_custom(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, ClusterError>;
}

/// How to locate cluster credentials.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

/// `ClusterClient` backed by a `kube::Client`.
#[derive(Clone)]
pub struct KubeAgent {
    client: Client,
}

impl KubeAgent {
    pub fn new(client: Client) -> Self {
        KubeAgent { client }
    }

    /// Builds a client from an explicit kubeconfig, then KUBECONFIG, then
    /// in-cluster credentials, then the default kubeconfig loading rules.
    pub async fn connect(options: &ConnectOptions) -> Result<Self, ClusterError> {
        let kube_options = KubeConfigOptions {
            context: options.context.clone(),
            ..Default::default()
        };

        let config = if let Some(path) = &options.kubeconfig {
            info!("Using kubeconfig: {}", path.display());
            let kubeconfig = Kubeconfig::read_from(path)?;
            Config::from_custom_kubeconfig(kubeconfig, &kube_options).await?
        } else if std::env::var_os("KUBECONFIG").is_some() {
            // KUBECONFIG may hold a path list; the default rules merge it.
            info!("Using kubeconfig files from KUBECONFIG");
            Config::from_kubeconfig(&kube_options).await?
        } else {
            match Config::incluster() {
                Ok(config) => {
                    info!("Using in-cluster configuration");
                    config
                }
                Err(e) => {
                    debug!("In-cluster configuration unavailable: {}", e);
                    info!("Using default kubeconfig loading rules");
                    Config::from_kubeconfig(&kube_options).await?
                }
            }
        };

        info!("Connecting to Kubernetes API server at {}", config.cluster_url);
        let client = Client::try_from(config)?;
        Ok(KubeAgent::new(client))
    }

    fn scoped<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    fn dynamic(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }
}

#[async_trait]
impl ClusterClient for KubeAgent {
    async fn server_version(&self) -> Result<Info, ClusterError> {
        Ok(self.client.apiserver_version().await?)
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        Ok(api.get(name).await?)
    }

    async fn list_pods(&self, query: &ListQuery) -> Result<Vec<Pod>, ClusterError> {
        debug!("Listing pods: {:?}", query);
        let api: Api<Pod> = self.scoped(query.namespace.as_deref());
        Ok(api.list(&query.params()).await?.items)
    }

    async fn list_services(&self, query: &ListQuery) -> Result<Vec<Service>, ClusterError> {
        debug!("Listing services: {:?}", query);
        let api: Api<Service> = self.scoped(query.namespace.as_deref());
        Ok(api.list(&query.params()).await?.items)
    }

    async fn list_deployments(&self, query: &ListQuery) -> Result<Vec<Deployment>, ClusterError> {
        debug!("Listing deployments: {:?}", query);
        let api: Api<Deployment> = self.scoped(query.namespace.as_deref());
        Ok(api.list(&query.params()).await?.items)
    }

    async fn list_config_maps(&self, query: &ListQuery) -> Result<Vec<ConfigMap>, ClusterError> {
        debug!("Listing configmaps: {:?}", query);
        let api: Api<ConfigMap> = self.scoped(query.namespace.as_deref());
        Ok(api.list(&query.params()).await?.items)
    }

    async fn list_events(&self, query: &ListQuery) -> Result<Vec<Event>, ClusterError> {
        debug!("Listing events: {:?}", query);
        let api: Api<Event> = self.scoped(query.namespace.as_deref());
        Ok(api.list(&query.params()).await?.items)
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        options: &LogOptions,
    ) -> Result<LogStream, ClusterError> {
        debug!("Streaming logs for {}/{}: {:?}", namespace, pod, options);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        Ok(log_lines(api, pod.to_string(), options.params()).boxed())
    }

    async fn list_custom(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>, ClusterError> {
        debug!("Listing {} in {:?}", resource.plural, namespace);
        let api = self.dynamic(resource, namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn get_custom(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, ClusterError> {
        let api = self.dynamic(resource, namespace);
        Ok(api.get(name).await?)
    }
}

fn log_lines(
    api: Api<Pod>,
    pod: String,
    params: LogParams,
) -> impl Stream<Item = Result<String, ClusterError>> + Send {
    try_stream! {
        let reader = api.log_stream(&pod, &params).await?;
        let mut lines = Box::pin(reader.lines());
        while let Some(line) = lines.try_next().await? {
            yield line;
        }
    }
}

/// Treats empty strings from tool arguments as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
