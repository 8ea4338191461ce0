use crate::kube::types::logs::tail_lines;
use crate::kube::types::PodLogsResponse;
use crate::kube::{non_empty, ClusterClient, ClusterError, LogOptions, LogStream};
use crate::tool::{definition, ToolError, ToolOutput};
use futures::StreamExt;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::*;

#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PodLogsToolArgs {
    /// Namespace of the pod.
    pub namespace: String,
    pub pod_name: String,
    /// Container to read from. Required for multi-container pods.
    #[serde(default)]
    pub container: Option<String>,
    /// Number of trailing lines to return (default 50).
    #[serde(default)]
    pub lines: Option<i64>,
    /// Stream new lines as they are written. Only available from the command line.
    #[serde(default)]
    pub follow: bool,
    /// Read logs of the previous container instance.
    #[serde(default)]
    pub previous: bool,
    /// Only return lines newer than this many seconds.
    #[serde(default)]
    pub since_seconds: Option<i64>,
}

impl PodLogsToolArgs {
    fn validate(&self) -> Result<(), ToolError> {
        if self.namespace.trim().is_empty() {
            return Err(ToolError::Validation(
                "namespace parameter is required".to_string(),
            ));
        }
        if self.pod_name.trim().is_empty() {
            return Err(ToolError::Validation(
                "pod_name parameter is required".to_string(),
            ));
        }
        Ok(())
    }

    fn log_options(&self) -> LogOptions {
        LogOptions {
            container: non_empty(self.container.clone()),
            tail_lines: Some(tail_lines(self.lines)),
            follow: self.follow,
            previous: self.previous,
            since_seconds: self.since_seconds.filter(|s| *s > 0),
        }
    }

    fn describe(&self) -> String {
        format!(
            "for pod '{}' in namespace '{}'",
            self.pod_name, self.namespace
        )
    }
}

pub struct PodLogsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl PodLogsTool {
    /// `timeout` bounds the whole read of a non-follow request.
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        PodLogsTool { client, timeout }
    }

    /// Buffers the requested tail. When the deadline passes mid-stream the
    /// lines read so far are returned, marked as truncated.
    pub async fn pod_logs(&self, args: &PodLogsToolArgs) -> Result<PodLogsResponse, ToolError> {
        args.validate()?;
        if args.follow {
            return Err(ToolError::Validation(
                "follow is not supported over the tool transport, which returns a single response; \
                 use the `logs --follow` command for live output"
                    .to_string(),
            ));
        }

        let options = args.log_options();
        let open_action = format!("getting logs {}", args.describe());
        let read_action = format!("reading logs {}", args.describe());
        let deadline = Instant::now() + self.timeout;

        let open = self
            .client
            .pod_logs(&args.namespace, &args.pod_name, &options);
        let mut stream = match timeout_at(deadline, open).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                error!("Error {}: {}", open_action, err);
                return Err(ToolError::query(open_action, err));
            }
            Err(_) => {
                return Err(ToolError::Timeout {
                    action: open_action,
                    after: self.timeout,
                })
            }
        };

        let mut lines = Vec::new();
        loop {
            match timeout_at(deadline, stream.next()).await {
                Ok(Some(Ok(line))) => lines.push(line),
                Ok(Some(Err(err))) => {
                    let action = match err {
                        ClusterError::Stream(_) => read_action,
                        _ => open_action,
                    };
                    error!("Error {}: {}", action, err);
                    return Err(ToolError::stream(action, err));
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Log read {} hit the {:?} deadline after {} lines",
                        args.describe(),
                        self.timeout,
                        lines.len()
                    );
                    return Ok(self.response(args, &options, lines).truncated(self.timeout));
                }
            }
        }

        debug!("Read {} log lines {}", lines.len(), args.describe());
        Ok(self.response(args, &options, lines))
    }

    /// Opens a live stream for `args` with no deadline.
    pub async fn follow(&self, args: &PodLogsToolArgs) -> Result<LogStream, ToolError> {
        args.validate()?;
        let options = LogOptions {
            follow: true,
            ..args.log_options()
        };
        info!("Following logs {}", args.describe());
        self.client
            .pod_logs(&args.namespace, &args.pod_name, &options)
            .await
            .map_err(|err| ToolError::query(format!("getting logs {}", args.describe()), err))
    }

    fn response(
        &self,
        args: &PodLogsToolArgs,
        options: &LogOptions,
        lines: Vec<String>,
    ) -> PodLogsResponse {
        PodLogsResponse::new(
            &args.pod_name,
            &args.namespace,
            options.container.as_deref(),
            lines,
        )
    }
}

impl Tool for PodLogsTool {
    const NAME: &'static str = "get_pod_logs";
    type Args = PodLogsToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<PodLogsToolArgs>(
            Self::NAME,
            "Get the most recent log lines of a pod container.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let logs = self.pod_logs(&args).await?;
        Ok(ToolOutput::with_record(logs.as_string(), &logs))
    }
}
