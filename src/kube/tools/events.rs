use crate::kube::types::events::append_field_selector;
use crate::kube::types::EventListResponse;
use crate::kube::{non_empty, ClusterClient, ListQuery};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListEventsToolArgs {
    /// Namespace to list events from. Omit for all namespaces.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Raw field selector, combined with the filters below.
    #[serde(default)]
    pub field_selector: Option<String>,
    /// Kind of the object the event is about, e.g. `Pod`.
    #[serde(default)]
    pub involved_kind: Option<String>,
    #[serde(default)]
    pub involved_name: Option<String>,
    #[serde(default)]
    pub involved_namespace: Option<String>,
    /// `Normal` or `Warning`.
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Maximum number of events to return.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListEventsToolArgs {
    /// Folds the convenience filters into a server-side field selector.
    pub fn query(self) -> ListQuery {
        let mut selector = non_empty(self.field_selector).unwrap_or_default();
        let filters = [
            ("regarding.kind", self.involved_kind),
            ("regarding.name", self.involved_name),
            ("regarding.namespace", self.involved_namespace),
            ("type", self.event_type),
            ("reason", self.reason),
        ];
        for (key, value) in filters {
            if let Some(value) = non_empty(value) {
                append_field_selector(&mut selector, key, &value);
            }
        }

        ListQuery {
            namespace: non_empty(self.namespace),
            label_selector: None,
            field_selector: Some(selector).filter(|s| !s.is_empty()),
            limit: self
                .limit
                .filter(|l| *l > 0)
                .map(|l| u32::try_from(l).unwrap_or(u32::MAX)),
        }
    }
}

pub struct ListEventsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListEventsTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListEventsTool { client, timeout }
    }

    pub async fn list_events(&self, query: &ListQuery) -> Result<EventListResponse, ToolError> {
        let events = bounded("listing events", self.timeout, self.client.list_events(query)).await?;
        debug!("Kubernetes API returned {} events", events.len());
        Ok(EventListResponse::new(&events))
    }
}

impl Tool for ListEventsTool {
    const NAME: &'static str = "list_events";
    type Args = ListEventsToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ListEventsToolArgs>(
            Self::NAME,
            "List cluster events, optionally filtered by namespace, involved object, type or reason.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let events = self.list_events(&args.query()).await?;
        Ok(ToolOutput::with_record(events.as_string(), &events))
    }
}
