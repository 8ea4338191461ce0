use crate::kube::types::{NamespaceDetailsResponse, NamespaceListResponse};
use crate::kube::{non_empty, ClusterClient, ClusterError};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub struct ListNamespacesTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListNamespacesTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListNamespacesTool { client, timeout }
    }

    pub async fn list_namespaces(&self) -> Result<NamespaceListResponse, ToolError> {
        let namespaces =
            bounded("listing namespaces", self.timeout, self.client.list_namespaces()).await?;
        debug!("Kubernetes API returned {} namespaces", namespaces.len());
        Ok(NamespaceListResponse::new(&namespaces))
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListNamespacesToolArgs {}

impl Tool for ListNamespacesTool {
    const NAME: &'static str = "list_namespaces";
    type Args = ListNamespacesToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ListNamespacesToolArgs>(
            Self::NAME,
            "Lists all namespaces in the Kubernetes cluster.",
        )
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let namespaces = self.list_namespaces().await?;
        Ok(ToolOutput::with_record(namespaces.as_string(), &namespaces))
    }
}

pub struct NamespaceDetailsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl NamespaceDetailsTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        NamespaceDetailsTool { client, timeout }
    }

    /// One namespace when `name` is given, otherwise all of them.
    pub async fn namespace_details(
        &self,
        name: Option<String>,
    ) -> Result<NamespaceDetailsResponse, ToolError> {
        let namespaces = match non_empty(name) {
            Some(name) => {
                let action = format!("getting namespace {}", name);
                let get = self.client.get_namespace(&name);
                match tokio::time::timeout(self.timeout, get).await {
                    Ok(Ok(ns)) => vec![ns],
                    Ok(Err(err)) if err.is_not_found() => {
                        warn!("Namespace {} not found", name);
                        return Err(ToolError::NotFound(format!("Namespace '{}' not found", name)));
                    }
                    Ok(Err(err)) => return Err(query_error(action, err)),
                    Err(_) => {
                        return Err(ToolError::Timeout {
                            action,
                            after: self.timeout,
                        })
                    }
                }
            }
            None => bounded("listing namespaces", self.timeout, self.client.list_namespaces()).await?,
        };
        Ok(NamespaceDetailsResponse::new(&namespaces))
    }
}

fn query_error(action: String, err: ClusterError) -> ToolError {
    error!("Error {}: {}", action, err);
    ToolError::query(action, err)
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NamespaceDetailsToolArgs {
    /// Namespace to describe. Omit for every namespace.
    #[serde(default)]
    pub namespace: Option<String>,
}

impl Tool for NamespaceDetailsTool {
    const NAME: &'static str = "get_namespace_details";
    type Args = NamespaceDetailsToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<NamespaceDetailsToolArgs>(
            Self::NAME,
            "Show status, creation time, labels and annotations for one namespace or all namespaces.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let details = self.namespace_details(args.namespace).await?;
        Ok(ToolOutput::with_record(details.as_string(), &details))
    }
}
