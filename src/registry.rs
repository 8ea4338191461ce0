//! Name-to-tool dispatch shared by the protocol server and the command line.

use crate::environment::Environment;
use crate::kube::tools::{
    CheckMeshWorkloadsTool, ListConfigMapsTool, ListDeploymentsTool, ListEventsTool,
    ListNamespacesTool, ListPodsTool, ListServicesTool, NamespaceDetailsTool, PodLogsTool,
    TestConnectionTool,
};
use crate::kube::ClusterClient;
use crate::sail::tools::{IstioStatusTool, ListSailResourcesTool, SailHealthTool};
use crate::tool::{ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::*;

pub const TOOL_NAMES: [&str; 13] = [
    TestConnectionTool::NAME,
    ListNamespacesTool::NAME,
    NamespaceDetailsTool::NAME,
    ListPodsTool::NAME,
    ListServicesTool::NAME,
    ListDeploymentsTool::NAME,
    ListConfigMapsTool::NAME,
    ListEventsTool::NAME,
    PodLogsTool::NAME,
    CheckMeshWorkloadsTool::NAME,
    ListSailResourcesTool::NAME,
    IstioStatusTool::NAME,
    SailHealthTool::NAME,
];

pub struct ToolRegistry {
    connection: TestConnectionTool,
    namespaces: ListNamespacesTool,
    namespace_details: NamespaceDetailsTool,
    pods: ListPodsTool,
    services: ListServicesTool,
    deployments: ListDeploymentsTool,
    config_maps: ListConfigMapsTool,
    events: ListEventsTool,
    logs: PodLogsTool,
    mesh: CheckMeshWorkloadsTool,
    sail_resources: ListSailResourcesTool,
    istio_status: IstioStatusTool,
    sail_health: SailHealthTool,
}

impl ToolRegistry {
    pub fn new(client: Arc<dyn ClusterClient>, env: &Environment) -> Self {
        let timeout = env.request_timeout;
        ToolRegistry {
            connection: TestConnectionTool::new(client.clone(), timeout),
            namespaces: ListNamespacesTool::new(client.clone(), timeout),
            namespace_details: NamespaceDetailsTool::new(client.clone(), timeout),
            pods: ListPodsTool::new(client.clone(), timeout),
            services: ListServicesTool::new(client.clone(), timeout),
            deployments: ListDeploymentsTool::new(client.clone(), timeout),
            config_maps: ListConfigMapsTool::new(client.clone(), timeout),
            events: ListEventsTool::new(client.clone(), timeout),
            logs: PodLogsTool::new(client.clone(), env.log_timeout),
            mesh: CheckMeshWorkloadsTool::new(
                client.clone(),
                timeout,
                env.mesh_excluded_namespaces.clone(),
            ),
            sail_resources: ListSailResourcesTool::new(client.clone(), timeout),
            istio_status: IstioStatusTool::new(client.clone(), timeout),
            sail_health: SailHealthTool::new(client, timeout),
        }
    }

    pub fn pods(&self) -> &ListPodsTool {
        &self.pods
    }

    pub fn logs(&self) -> &PodLogsTool {
        &self.logs
    }

    pub fn sail_health(&self) -> &SailHealthTool {
        &self.sail_health
    }

    pub fn istio_status(&self) -> &IstioStatusTool {
        &self.istio_status
    }

    /// Definitions in registration order.
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            self.connection.definition(String::new()).await,
            self.namespaces.definition(String::new()).await,
            self.namespace_details.definition(String::new()).await,
            self.pods.definition(String::new()).await,
            self.services.definition(String::new()).await,
            self.deployments.definition(String::new()).await,
            self.config_maps.definition(String::new()).await,
            self.events.definition(String::new()).await,
            self.logs.definition(String::new()).await,
            self.mesh.definition(String::new()).await,
            self.sail_resources.definition(String::new()).await,
            self.istio_status.definition(String::new()).await,
            self.sail_health.definition(String::new()).await,
        ]
    }

    /// Runs the named tool. Only an unknown name is an error; every tool
    /// failure comes back as an output with `is_error` set.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        info!("Calling tool {}", name);
        let output = match name {
            TestConnectionTool::NAME => invoke(&self.connection, arguments).await,
            ListNamespacesTool::NAME => invoke(&self.namespaces, arguments).await,
            NamespaceDetailsTool::NAME => invoke(&self.namespace_details, arguments).await,
            ListPodsTool::NAME => invoke(&self.pods, arguments).await,
            ListServicesTool::NAME => invoke(&self.services, arguments).await,
            ListDeploymentsTool::NAME => invoke(&self.deployments, arguments).await,
            ListConfigMapsTool::NAME => invoke(&self.config_maps, arguments).await,
            ListEventsTool::NAME => invoke(&self.events, arguments).await,
            PodLogsTool::NAME => invoke(&self.logs, arguments).await,
            CheckMeshWorkloadsTool::NAME => invoke(&self.mesh, arguments).await,
            ListSailResourcesTool::NAME => invoke(&self.sail_resources, arguments).await,
            IstioStatusTool::NAME => invoke(&self.istio_status, arguments).await,
            SailHealthTool::NAME => invoke(&self.sail_health, arguments).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::UnknownTool(name.to_string()));
            }
        };
        Ok(output)
    }
}

async fn invoke<T>(tool: &T, arguments: Value) -> ToolOutput
where
    T: Tool<Output = ToolOutput, Error = ToolError>,
{
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    let args: T::Args = match serde_json::from_value(arguments) {
        Ok(args) => args,
        Err(e) => {
            let err = ToolError::Validation(format!("invalid arguments for {}: {}", T::NAME, e));
            warn!("{}", err);
            return ToolOutput::failure(&err);
        }
    };

    match tool.call(args).await {
        Ok(output) => {
            debug!("Tool {} returned {} chars", T::NAME, output.text.len());
            output
        }
        Err(err) => {
            warn!("Tool {} failed: {}", T::NAME, err);
            ToolOutput::failure(&err)
        }
    }
}
