//! Shared plumbing for the cluster tools: output envelope, error taxonomy and
//! definition helpers.

use crate::kube::ClusterError;
use rig::completion::ToolDefinition;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::*;

/// Result of a tool invocation: the human report plus an optional
/// machine-readable copy of the same data.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
    pub is_error: bool,
}

impl ToolOutput {
    /// Attaches `record` as the structured payload. Serialization failures fall
    /// back to an empty object so the text report is never lost.
    pub fn with_record<T: Serialize>(text: impl Into<String>, record: &T) -> Self {
        let structured = serde_json::to_value(record).unwrap_or_else(|e| {
            warn!("Failed to serialize structured tool output: {}", e);
            json!({})
        });
        ToolOutput {
            text: text.into(),
            structured: Some(structured),
            is_error: false,
        }
    }

    pub fn failure(err: &ToolError) -> Self {
        ToolOutput {
            text: err.to_string(),
            structured: None,
            is_error: true,
        }
    }

    /// Compact JSON of the structured payload, if any.
    pub fn structured_json(&self) -> Option<String> {
        self.structured.as_ref().map(|value| value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was missing or malformed; no cluster call was made.
    #[error("Error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Error {action}: {source}")]
    Query {
        action: String,
        #[source]
        source: ClusterError,
    },
    #[error("Error {action}: {source}")]
    Stream {
        action: String,
        #[source]
        source: ClusterError,
    },
    #[error("Error {action}: timed out after {}s", .after.as_secs())]
    Timeout { action: String, after: Duration },
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn query(action: impl Into<String>, source: ClusterError) -> Self {
        ToolError::Query {
            action: action.into(),
            source,
        }
    }

    /// Maps a client failure that happened while reading a stream. Failures to
    /// open it stay query failures.
    pub fn stream(action: impl Into<String>, source: ClusterError) -> Self {
        match source {
            ClusterError::Stream(_) => ToolError::Stream {
                action: action.into(),
                source,
            },
            other => ToolError::query(action, other),
        }
    }
}

/// Awaits a cluster call with a deadline, labelling failures with `action`.
pub async fn bounded<T, F>(action: &str, after: Duration, call: F) -> Result<T, ToolError>
where
    F: Future<Output = Result<T, ClusterError>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            error!("Error {}: {}", action, err);
            Err(ToolError::query(action, err))
        }
        Err(_) => {
            warn!("Timed out {} after {:?}", action, after);
            Err(ToolError::Timeout {
                action: action.to_string(),
                after,
            })
        }
    }
}

/// Builds a rig tool definition whose parameters are the JSON schema of `A`.
pub fn definition<A: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(A);
    let mut parameters = serde_json::to_value(&schema).unwrap_or_else(|e| {
        error!("Failed to render schema for {}: {}", name, e);
        json!({})
    });
    if let Some(object) = parameters.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
        object
            .entry("type")
            .or_insert_with(|| Value::String("object".to_string()));
        object
            .entry("properties")
            .or_insert_with(|| Value::Object(Default::default()));
    }
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct SampleArgs {
        /// Namespace to inspect
        namespace: Option<String>,
        pod_name: String,
    }

    #[test]
    fn definitions_expose_an_object_schema() {
        let def = definition::<SampleArgs>("sample", "A sample tool");
        assert_eq!(def.name, "sample");
        assert_eq!(def.parameters["type"], "object");
        assert!(def.parameters["properties"]["namespace"].is_object());
        assert_eq!(def.parameters["required"], json!(["pod_name"]));
        assert!(def.parameters.get("$schema").is_none());
    }

    #[tokio::test]
    async fn bounded_reports_timeouts() {
        let result: Result<(), ToolError> = bounded("listing pods", Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        let err = result.unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
        assert_eq!(err.to_string(), "Error listing pods: timed out after 0s");
    }

    #[tokio::test]
    async fn bounded_labels_client_failures() {
        let result: Result<(), ToolError> = bounded("listing pods", Duration::from_secs(1), async {
            Err(ClusterError::NotFound("namespaces \"x\" not found".to_string()))
        })
        .await;
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error listing pods: not found: namespaces \"x\" not found"
        );
        assert!(ToolOutput::failure(&err).is_error);
    }

    #[test]
    fn structured_payload_is_compact_json() {
        let output = ToolOutput::with_record("Found 1 pods", &json!({"count": 1}));
        assert_eq!(output.structured_json().as_deref(), Some(r#"{"count":1}"#));
        assert!(!output.is_error);
    }
}
