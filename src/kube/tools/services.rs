use super::ResourceListArgs;
use crate::kube::types::ServiceListResponse;
use crate::kube::{ClusterClient, ListQuery};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub struct ListServicesTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListServicesTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListServicesTool { client, timeout }
    }

    pub async fn list_services(&self, query: &ListQuery) -> Result<ServiceListResponse, ToolError> {
        let services = bounded("listing services", self.timeout, self.client.list_services(query)).await?;
        debug!("Kubernetes API returned {} services", services.len());
        Ok(ServiceListResponse::new(&services))
    }
}

impl Tool for ListServicesTool {
    const NAME: &'static str = "list_services";
    type Args = ResourceListArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ResourceListArgs>(
            Self::NAME,
            "List services with type, cluster IP, external IPs and ports. Optionally filter by namespace and label selector.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = ListQuery::new(args.namespace, args.label_selector);
        let services = self.list_services(&query).await?;
        let text = services.as_string(query.namespace.as_deref(), query.label_selector.as_deref());
        Ok(ToolOutput::with_record(text, &services))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Failure, FakeCluster};
    use k8s_openapi::api::core::v1::Service;
    use serde_json::json;

    fn service(namespace: &str, name: &str) -> Service {
        serde_json::from_value(json!({
            "metadata": { "name": name, "namespace": namespace },
            "spec": {
                "type": "ClusterIP",
                "clusterIP": "10.96.0.20",
                "ports": [{ "name": "http", "port": 9080, "protocol": "TCP" }]
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn lists_services_with_structured_copy() {
        let fake = FakeCluster {
            services: vec![
                service("bookinfo", "productpage"),
                service("bookinfo", "reviews"),
                service("istio-system", "istiod"),
            ],
            ..Default::default()
        };
        let tool = ListServicesTool::new(Arc::new(fake), Duration::from_secs(1));

        let output = tool
            .call(ResourceListArgs {
                namespace: Some("bookinfo".to_string()),
                label_selector: None,
            })
            .await
            .unwrap();

        assert!(output.text.starts_with("Found 2 services:"));
        let structured = output.structured.unwrap();
        assert_eq!(structured["count"], 2);
        assert_eq!(structured["services"].as_array().unwrap().len(), 2);
        assert_eq!(structured["services"][0]["name"], "productpage");
    }

    #[tokio::test]
    async fn selectors_reach_the_client_verbatim() {
        let fake = Arc::new(FakeCluster::new());
        let tool = ListServicesTool::new(fake.clone(), Duration::from_secs(1));
        let output = tool
            .call(ResourceListArgs {
                namespace: Some("bookinfo".to_string()),
                label_selector: Some("app in (reviews,ratings)".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(
            output.text,
            "No services found in namespace 'bookinfo' with label selector 'app in (reviews,ratings)'"
        );
        let queries = fake.recorded_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(
            queries[0].label_selector.as_deref(),
            Some("app in (reviews,ratings)")
        );
    }

    #[tokio::test]
    async fn api_failures_become_query_errors() {
        let fake = FakeCluster::new().failing("list_services", Failure::Forbidden);
        let tool = ListServicesTool::new(Arc::new(fake), Duration::from_secs(1));
        let err = tool.call(ResourceListArgs::default()).await.unwrap_err();
        assert!(matches!(err, ToolError::Query { .. }));
        assert!(err.to_string().starts_with("Error listing services: "));
    }

    #[tokio::test]
    async fn empty_namespace_reports_no_services() {
        let tool = ListServicesTool::new(Arc::new(FakeCluster::new()), Duration::from_secs(1));
        let output = tool
            .call(ResourceListArgs {
                namespace: Some("bookinfo".to_string()),
                label_selector: None,
            })
            .await
            .unwrap();
        assert_eq!(output.text, "No services found in namespace 'bookinfo'");
        assert_eq!(output.structured.unwrap()["count"], 0);
    }
}
