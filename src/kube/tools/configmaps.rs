use super::ResourceListArgs;
use crate::kube::types::ConfigMapListResponse;
use crate::kube::{ClusterClient, ListQuery};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub struct ListConfigMapsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListConfigMapsTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListConfigMapsTool { client, timeout }
    }

    pub async fn list_config_maps(
        &self,
        query: &ListQuery,
    ) -> Result<ConfigMapListResponse, ToolError> {
        let config_maps = bounded(
            "listing configmaps",
            self.timeout,
            self.client.list_config_maps(query),
        )
        .await?;
        debug!("Kubernetes API returned {} configmaps", config_maps.len());
        Ok(ConfigMapListResponse::new(&config_maps))
    }
}

impl Tool for ListConfigMapsTool {
    const NAME: &'static str = "list_configmaps";
    type Args = ResourceListArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ResourceListArgs>(
            Self::NAME,
            "List configmaps with their data keys. Optionally filter by namespace and label selector.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = ListQuery::new(args.namespace, args.label_selector);
        let config_maps = self.list_config_maps(&query).await?;
        let text = config_maps.as_string(query.namespace.as_deref(), query.label_selector.as_deref());
        Ok(ToolOutput::with_record(text, &config_maps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Failure, FakeCluster};
    use k8s_openapi::api::core::v1::ConfigMap;
    use serde_json::json;

    fn config_map(namespace: &str, name: &str) -> ConfigMap {
        serde_json::from_value(json!({
            "metadata": { "name": name, "namespace": namespace },
            "data": { "mesh": "...", "meshNetworks": "..." }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn lists_configmaps_with_structured_copy() {
        let fake = FakeCluster {
            config_maps: vec![
                config_map("istio-system", "istio"),
                config_map("istio-system", "istio-sidecar-injector"),
                config_map("default", "kube-root-ca.crt"),
            ],
            ..Default::default()
        };
        let tool = ListConfigMapsTool::new(Arc::new(fake), Duration::from_secs(1));

        let output = tool
            .call(ResourceListArgs {
                namespace: Some("istio-system".to_string()),
                label_selector: None,
            })
            .await
            .unwrap();

        assert!(output.text.starts_with("Found 2 configmaps:"));
        let structured = output.structured.unwrap();
        assert_eq!(structured["count"], 2);
        assert_eq!(structured["configmaps"].as_array().unwrap().len(), 2);
        assert_eq!(structured["configmaps"][0]["data_count"], 2);
    }

    #[tokio::test]
    async fn selectors_reach_the_client_verbatim() {
        let fake = Arc::new(FakeCluster::new());
        let tool = ListConfigMapsTool::new(fake.clone(), Duration::from_secs(1));
        let output = tool
            .call(ResourceListArgs {
                namespace: None,
                label_selector: Some("istio.io/rev=default".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(
            output.text,
            "No configmaps found with label selector 'istio.io/rev=default'"
        );
        let queries = fake.recorded_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].namespace, None);
        assert_eq!(queries[0].label_selector.as_deref(), Some("istio.io/rev=default"));
    }

    #[tokio::test]
    async fn api_failures_become_query_errors() {
        let fake = FakeCluster::new().failing("list_config_maps", Failure::Forbidden);
        let tool = ListConfigMapsTool::new(Arc::new(fake), Duration::from_secs(1));
        let err = tool.call(ResourceListArgs::default()).await.unwrap_err();
        assert!(matches!(err, ToolError::Query { .. }));
        assert!(err.to_string().starts_with("Error listing configmaps: "));
    }
}
