use crate::kube::{non_empty, ClusterClient};
use crate::sail::types::{SailResource, SailResourceListResponse};
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
pub struct ListSailResourcesToolArgs {
    /// Namespace to list from. Omit for all namespaces.
    #[serde(default)]
    pub namespace: Option<String>,
    /// One of `istio`, `istiorevision`, `istiocni`, `ztunnel` or `all` (default).
    #[serde(default)]
    pub resource: Option<String>,
}

pub struct ListSailResourcesTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListSailResourcesTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListSailResourcesTool { client, timeout }
    }

    /// Lists the selected kinds in fixed order. Kinds whose CRD is absent are skipped.
    pub async fn list_resources(
        &self,
        namespace: Option<&str>,
        resource: Option<&str>,
    ) -> Result<SailResourceListResponse, ToolError> {
        let kinds = SailKind::select(resource).ok_or_else(|| {
            ToolError::Validation(format!(
                "Unknown resource type: {}. Available types: istio, istiorevision, istiocni, ztunnel",
                resource.unwrap_or_default()
            ))
        })?;

        let mut resources = Vec::new();
        for kind in kinds {
            let action = format!("listing {} resources", kind.filter_name());
            let api = kind.api_resource();
            match bounded(&action, self.timeout, self.client.list_custom(&api, namespace)).await {
                Ok(items) => {
                    debug!("Found {} {} resources", items.len(), kind);
                    resources.extend(items.iter().map(|obj| SailResource::new(kind, obj)));
                }
                Err(ToolError::Query { source, .. }) if source.is_not_found() => {
                    info!("{} CRD not found, skipping", kind);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(SailResourceListResponse::new(resources))
    }
}

impl Tool for ListSailResourcesTool {
    const NAME: &'static str = "list_sailoperator_resources";
    type Args = ListSailResourcesToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ListSailResourcesToolArgs>(
            Self::NAME,
            "List Sail Operator custom resources (Istio, IstioRevision, IstioCNI, ZTunnel) with version, state and key conditions.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let namespace = non_empty(args.namespace);
        let resource = non_empty(args.resource);
        let list = self
            .list_resources(namespace.as_deref(), resource.as_deref())
            .await?;
        Ok(ToolOutput::with_record(
            list.as_string(namespace.as_deref(), resource.as_deref()),
            &list,
        ))
    }
}
