use crate::kube::tools::logs::PodLogsToolArgs;
use crate::kube::{ConnectOptions, ListQuery};
use crate::registry::ToolRegistry;
use crate::server::McpServer;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "sail-operator-mcp", version)]
#[command(about = "Read-only Kubernetes and Sail Operator introspection over MCP", long_about = None)]
pub struct Cli {
    /// Path to a single kubeconfig file. Overrides KUBECONFIG, which is
    /// otherwise resolved by the default loading rules.
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Serve MCP tools over stdin/stdout (default)
    Serve,

    /// List pods
    Pods {
        #[arg(short, long)]
        namespace: Option<String>,
        #[arg(short = 'l', long = "label-selector", visible_alias = "selector")]
        selector: Option<String>,
    },

    /// Print pod logs
    Logs {
        pod: String,
        #[arg(short, long, default_value = "default")]
        namespace: String,
        #[arg(short, long)]
        container: Option<String>,
        #[arg(long, default_value_t = 50)]
        lines: i64,
        #[arg(long)]
        previous: bool,
        #[arg(long)]
        since_seconds: Option<i64>,
        /// Stream new lines until interrupted
        #[arg(short, long)]
        follow: bool,
    },

    /// Check Sail Operator health
    Health {
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Show Istio installation status
    Status {
        /// Istio resource name. Omit to list every installation.
        name: Option<String>,
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

/// Runs one command against the registry's tools, printing reports to stdout.
pub async fn execute(command: Command, registry: ToolRegistry) -> anyhow::Result<()> {
    match command {
        Command::Serve => McpServer::new(registry).serve_stdio().await,
        Command::Pods {
            namespace,
            selector,
        } => {
            let query = ListQuery::new(namespace, selector);
            let pods = registry.pods().list_pods(&query).await?;
            println!(
                "{}",
                pods.as_string(query.namespace.as_deref(), query.label_selector.as_deref())
            );
            Ok(())
        }
        Command::Logs {
            pod,
            namespace,
            container,
            lines,
            previous,
            since_seconds,
            follow,
        } => {
            let args = PodLogsToolArgs {
                namespace,
                pod_name: pod,
                container,
                lines: Some(lines),
                follow,
                previous,
                since_seconds,
            };
            if follow {
                follow_logs(&registry, &args).await
            } else {
                let logs = registry.logs().pod_logs(&args).await?;
                println!("{}", logs.as_string());
                Ok(())
            }
        }
        Command::Health { namespace } => {
            let report = registry.sail_health().check_health(namespace.as_deref()).await;
            println!("{}", report.as_string());
            Ok(())
        }
        Command::Status { name, namespace } => {
            let status = registry
                .istio_status()
                .istio_status(name.as_deref(), namespace.as_deref())
                .await?;
            println!("{}", status.as_string(namespace.as_deref()));
            Ok(())
        }
    }
}

/// Prints lines as they arrive until the stream ends or Ctrl-C is pressed.
async fn follow_logs(registry: &ToolRegistry, args: &PodLogsToolArgs) -> anyhow::Result<()> {
    let mut stream = registry.logs().follow(args).await?;
    loop {
        tokio::select! {
            line = stream.next() => match line {
                Some(Ok(line)) => println!("{}", line),
                Some(Err(err)) => return Err(err.into()),
                None => {
                    debug!("Log stream for {} ended", args.pod_name);
                    return Ok(());
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping log stream");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["sail-operator-mcp", "--context", "kind-mesh"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.connect_options().context.as_deref(), Some("kind-mesh"));
    }

    #[test]
    fn logs_defaults() {
        let cli = Cli::try_parse_from(["sail-operator-mcp", "logs", "reviews-v1"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Logs {
                pod: "reviews-v1".to_string(),
                namespace: "default".to_string(),
                container: None,
                lines: 50,
                previous: false,
                since_seconds: None,
                follow: false,
            })
        );
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "sail-operator-mcp",
            "status",
            "default",
            "-n",
            "istio-system",
            "--kubeconfig",
            "/tmp/kubeconfig",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Status {
                name: Some("default".to_string()),
                namespace: Some("istio-system".to_string()),
            })
        );
        assert_eq!(cli.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
    }

    #[test]
    fn pods_take_a_label_selector() {
        let cli =
            Cli::try_parse_from(["sail-operator-mcp", "pods", "-n", "bookinfo", "-l", "app=ratings"])
                .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Pods {
                namespace: Some("bookinfo".to_string()),
                selector: Some("app=ratings".to_string()),
            })
        );
    }

    #[test]
    fn pods_accept_the_long_label_selector_flag() {
        for flag in ["--label-selector", "--selector"] {
            let cli = Cli::try_parse_from(["sail-operator-mcp", "pods", flag, "app in (a,b)"]).unwrap();
            assert_eq!(
                cli.command,
                Some(Command::Pods {
                    namespace: None,
                    selector: Some("app in (a,b)".to_string()),
                })
            );
        }
    }

    #[test]
    fn kubeconfig_flag_is_not_bound_to_the_path_list_variable() {
        let command = Cli::command();
        let kubeconfig = command
            .get_arguments()
            .find(|arg| arg.get_id() == "kubeconfig")
            .unwrap();
        assert_eq!(kubeconfig.get_env(), None);

        let cli = Cli::try_parse_from(["sail-operator-mcp", "health"]).unwrap();
        assert_eq!(cli.connect_options().kubeconfig, None);
    }
}
