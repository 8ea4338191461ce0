use crate::kube::ClusterClient;
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

#[derive(Debug, Serialize)]
pub struct TestConnectionResult {
    pub status: String,
    pub kubernetes_version: String,
    pub server_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub platform: String,
}

impl TestConnectionResult {
    pub fn as_string(&self) -> String {
        let mut output = format!(
            "Successfully connected to Kubernetes cluster.\nVersion: {}\nServer: {}",
            self.kubernetes_version, self.server_version
        );
        if !self.platform.is_empty() {
            output.push_str(&format!("\nPlatform: {}", self.platform));
        }
        output
    }
}

pub struct TestConnectionTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl TestConnectionTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        TestConnectionTool { client, timeout }
    }

    pub async fn test_connection(&self) -> Result<TestConnectionResult, ToolError> {
        let info = bounded(
            "connecting to Kubernetes",
            self.timeout,
            self.client.server_version(),
        )
        .await?;
        info!("Connected to Kubernetes {}", info.git_version);

        let kubernetes_version = if info.major.is_empty() {
            info.git_version.clone()
        } else {
            format!("{}.{}", info.major, info.minor)
        };
        Ok(TestConnectionResult {
            status: "connected".to_string(),
            kubernetes_version,
            server_version: info.git_version,
            platform: info.platform,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TestConnectionToolArgs {}

impl Tool for TestConnectionTool {
    const NAME: &'static str = "test_k8s_connection";
    type Args = TestConnectionToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<TestConnectionToolArgs>(
            Self::NAME,
            "Check connectivity to the Kubernetes API server and report its version.",
        )
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let result = self.test_connection().await?;
        Ok(ToolOutput::with_record(result.as_string(), &result))
    }
}
