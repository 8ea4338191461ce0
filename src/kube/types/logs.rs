use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tail length used when the caller does not ask for a positive line count.
pub const DEFAULT_TAIL_LINES: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodLogsResponse {
    pub status: String,
    pub pod: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub lines: Vec<String>,
    /// Set when the read deadline passed before the stream ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_after_secs: Option<u64>,
}

impl PodLogsResponse {
    pub fn new(pod: &str, namespace: &str, container: Option<&str>, lines: Vec<String>) -> Self {
        PodLogsResponse {
            status: "success".to_string(),
            pod: pod.to_string(),
            namespace: namespace.to_string(),
            container: container.map(str::to_string),
            lines,
            truncated_after_secs: None,
        }
    }

    pub fn truncated(mut self, after: Duration) -> Self {
        self.truncated_after_secs = Some(after.as_secs());
        self
    }

    fn container_suffix(&self) -> String {
        match &self.container {
            Some(c) => format!(" (container: {})", c),
            None => String::new(),
        }
    }

    pub fn as_string(&self) -> String {
        let mut output = if self.lines.is_empty() {
            format!(
                "No logs found for pod '{}' in namespace '{}'{}",
                self.pod,
                self.namespace,
                self.container_suffix()
            )
        } else {
            let mut output = format!(
                "=== Logs for pod '{}' in namespace '{}' ==={}\n",
                self.pod,
                self.namespace,
                self.container_suffix()
            );
            output.push_str(&format!("Showing last {} lines:\n\n", self.lines.len()));
            output.push_str(&self.lines.join("\n"));
            output
        };

        if let Some(secs) = self.truncated_after_secs {
            output.push_str(&format!(
                "\n\n[log output truncated: stream did not finish within {}s]",
                secs
            ));
        }
        output
    }
}

/// Normalizes a requested tail length.
pub fn tail_lines(requested: Option<i64>) -> i64 {
    match requested {
        Some(n) if n > 0 => n,
        _ => DEFAULT_TAIL_LINES,
    }
}
