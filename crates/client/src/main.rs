// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reflector: tail a remote resource collection from the command line.
//!
//! Connects to a watch server, mirrors the requested collection, and logs
//! every applied change. Mostly useful for poking at a server and as a
//! worked example of driving the engine.

use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use reflector_client::{DrainLimits, FrameOutcome, Step, WatchClient, WatchConfig};
use reflector_core::query::ResourceQuery;

/// reflector: mirror a remote resource collection over a watch connection
#[derive(Parser, Debug)]
#[command(name = "reflector")]
#[command(about = "Mirror a remote resource collection over a watch connection")]
struct Args {
    /// Plural resource name to mirror (e.g. "pods")
    plural: String,

    /// Server base URL (http(s) is upgraded to ws(s))
    #[arg(short, long, default_value = "http://localhost:8001")]
    url: String,

    /// API group
    #[arg(long)]
    group: Option<String>,

    /// API version
    #[arg(long, default_value = "v1")]
    version: String,

    /// Namespace to scope to
    #[arg(short, long)]
    namespace: Option<String>,

    /// Label selector
    #[arg(short = 'l', long)]
    selector: Option<String>,

    /// Page size hint
    #[arg(long, default_value = "50")]
    limit: u32,

    /// Drain all remaining pages once the snapshot arrives
    #[arg(long)]
    drain: bool,

    /// Enable verbose logging
    #[arg(short = 'V', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut query = ResourceQuery::new(args.version, args.plural).with_limit(args.limit);
    if let Some(group) = args.group {
        query = query.in_group(group);
    }
    if let Some(namespace) = args.namespace {
        query = query.in_namespace(namespace);
    }
    if let Some(selector) = args.selector {
        query = query.with_label_selector(selector);
    }

    let config = WatchConfig {
        base_url: args.url,
        ..WatchConfig::default()
    };

    info!("Starting reflector");
    info!("  Server: {}", config.base_url);
    info!("  Resource: {}", query.plural);

    let mut client = WatchClient::new(config, query);
    client.connect().await?;

    loop {
        match client.step().await {
            Ok(Step::Frame(outcome)) => {
                info!(items = client.store().len(), ?outcome, "frame applied");
                if args.drain
                    && matches!(outcome, FrameOutcome::Snapshot)
                    && client.view().has_more()
                {
                    match client.drain_all(DrainLimits::default()).await {
                        Ok(added) => info!(added, "drained remaining pages"),
                        Err(e) => warn!(error = %e, "drain failed"),
                    }
                }
            }
            Ok(Step::Connected) => info!("reconnected"),
            Ok(Step::Closed) => warn!("connection closed"),
            Ok(Step::RetryFailed) => warn!("reconnect attempt failed"),
            Ok(Step::Idle) => {}
            Err(e) => warn!(error = %e, "engine error"),
        }
    }
}
