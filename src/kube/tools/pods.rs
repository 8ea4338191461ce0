use super::ResourceListArgs;
use crate::kube::types::PodListResponse;
use crate::kube::{ClusterClient, ListQuery};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use chrono::Utc;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub struct ListPodsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListPodsTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListPodsTool { client, timeout }
    }

    pub async fn list_pods(&self, query: &ListQuery) -> Result<PodListResponse, ToolError> {
        let pods = bounded("listing pods", self.timeout, self.client.list_pods(query)).await?;
        debug!("Kubernetes API returned {} pods", pods.len());
        Ok(PodListResponse::new(&pods, Utc::now()))
    }
}

impl Tool for ListPodsTool {
    const NAME: &'static str = "list_pods";
    type Args = ResourceListArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ResourceListArgs>(
            Self::NAME,
            "List pods with status, readiness, restarts, age and node. Optionally filter by namespace and label selector.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = ListQuery::new(args.namespace, args.label_selector);
        let pods = self.list_pods(&query).await?;
        let text = pods.as_string(query.namespace.as_deref(), query.label_selector.as_deref());
        Ok(ToolOutput::with_record(text, &pods))
    }
}
