use crate::kube::{non_empty, ClusterClient};
use crate::sail::types::IstioStatusResponse;
use crate::sail::SailKind;
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct IstioStatusToolArgs {
    /// Name of the Istio resource. Omit to report every installation.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

pub struct IstioStatusTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl IstioStatusTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        IstioStatusTool { client, timeout }
    }

    pub async fn istio_status(
        &self,
        name: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<IstioStatusResponse, ToolError> {
        let api = SailKind::Istio.api_resource();

        let items = match name {
            Some(name) => {
                let action = format!("getting Istio resource '{}'", name);
                let get = self.client.get_custom(&api, namespace, name);
                match bounded(&action, self.timeout, get).await {
                    Ok(obj) => vec![obj],
                    Err(ToolError::Query { source, .. }) if source.is_not_found() => {
                        let mut message = format!("Istio resource '{}' not found", name);
                        if let Some(ns) = namespace {
                            message.push_str(&format!(" in namespace '{}'", ns));
                        }
                        return Err(ToolError::NotFound(message));
                    }
                    Err(err) => return Err(err),
                }
            }
            None => {
                let list = self.client.list_custom(&api, namespace);
                match bounded("listing Istio resources", self.timeout, list).await {
                    Ok(items) => items,
                    Err(ToolError::Query { source, .. }) if source.is_not_found() => {
                        warn!("Istio CRD not found");
                        return Err(ToolError::NotFound(
                            "Istio CRD not found. Sail Operator may not be installed.".to_string(),
                        ));
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        debug!("Found {} Istio resources", items.len());
        Ok(IstioStatusResponse::new(&items))
    }
}

impl Tool for IstioStatusTool {
    const NAME: &'static str = "get_istio_status";
    type Args = IstioStatusToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<IstioStatusToolArgs>(
            Self::NAME,
            "Show version, state, revisions and conditions of Istio installations managed by the Sail Operator.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let name = non_empty(args.name);
        let namespace = non_empty(args.namespace);
        let status = self
            .istio_status(name.as_deref(), namespace.as_deref())
            .await?;
        Ok(ToolOutput::with_record(
            status.as_string(namespace.as_deref()),
            &status,
        ))
    }
}
