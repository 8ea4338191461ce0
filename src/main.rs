use crate::cli::{Cli, Command};
use crate::kube::KubeAgent;
use crate::registry::ToolRegistry;
use clap::Parser;
use dotenv::dotenv;
use environment::Environment;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod environment;
mod kube;
mod registry;
mod sail;
mod server;
#[cfg(test)]
mod testing;
mod tool;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // stdout carries the protocol, so logs go to stderr.
    // Set RUST_LOG to control log levels, e.g. RUST_LOG=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();
    let env = Environment::new();

    let agent = match KubeAgent::connect(&cli.connect_options()).await {
        Ok(agent) => agent,
        Err(e) => {
            error!("Failed to initialize Kubernetes client: {}", e);
            eprintln!("Failed to initialize Kubernetes client: {}", e);
            std::process::exit(1);
        }
    };
    info!("Kubernetes client initialized");

    let registry = ToolRegistry::new(Arc::new(agent), &env);
    let command = cli.command.unwrap_or(Command::Serve);
    if let Err(e) = cli::execute(command, registry).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
