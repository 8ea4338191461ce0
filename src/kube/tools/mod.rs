pub mod configmaps;
pub mod connection;
pub mod deployments;
pub mod events;
pub mod logs;
pub mod mesh;
pub mod namespaces;
pub mod pods;
pub mod services;

pub use configmaps::ListConfigMapsTool;
pub use connection::TestConnectionTool;
pub use deployments::ListDeploymentsTool;
pub use events::ListEventsTool;
pub use logs::PodLogsTool;
pub use mesh::CheckMeshWorkloadsTool;
pub use namespaces::{ListNamespacesTool, NamespaceDetailsTool};
pub use pods::ListPodsTool;
pub use services::ListServicesTool;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments shared by the namespaced list tools.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ResourceListArgs {
    /// Namespace to list from. Omit or leave empty for all namespaces.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Label selector passed to the API server, e.g. `app=reviews,version=v1`.
    #[serde(default)]
    pub label_selector: Option<String>,
}
