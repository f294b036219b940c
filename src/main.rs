use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;

use kubesnap_core::{SnapshotBuilder, SnapshotError};
use kubesnap_k8s::KubeClusterClient;
use kubesnap_types::ClusterSnapshot;

mod render;

/// Kubesnap - a read-only snapshot of pod, deployment and service
/// names across a cluster
#[derive(Parser, Debug)]
#[command(name = "kubesnap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubernetes context name (defaults to the current context)
    #[arg(value_name = "CONTEXT")]
    context: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: Output,

    /// Abort the scan after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Maximum number of list requests in flight at once
    #[arg(long, default_value = "8")]
    max_in_flight: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let cancel = CancellationToken::new();

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    if let Some(secs) = args.timeout {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            deadline.cancel();
        });
    }

    let client = Arc::new(KubeClusterClient::new(args.context.as_deref()).await?);
    let builder = SnapshotBuilder::new(client).with_max_in_flight(args.max_in_flight);

    match builder.build(&cancel).await {
        Ok(snapshot) => {
            print_snapshot(&snapshot, args.output)?;
            Ok(())
        }
        Err(SnapshotError::Cancelled { partial }) => {
            eprintln!("Scan cancelled; showing partial results");
            print_snapshot(&partial, args.output)?;
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn print_snapshot(snapshot: &ClusterSnapshot, output: Output) -> Result<()> {
    match output {
        Output::Table => print!("{}", render::table(snapshot)),
        Output::Json => println!("{}", serde_json::to_string_pretty(snapshot)?),
    }
    Ok(())
}
