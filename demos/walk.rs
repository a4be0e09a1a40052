//! Walk a HAL API by following relations from a root URL.
//!
//! Usage:
//!
//! ```text
//! cargo run --example walk -- <root-url> [rel ...] [--all <rel>] [--debug]
//! ```
//!
//! Each positional `rel` is followed with `follow_first`. `--all <rel>`
//! lists every match of `rel` on the final resource.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result, bail};
use hal_navigator::{HttpConfig, Node, PoolOptions, Scheduler};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    root: String,
    relations: Vec<String>,
    list: Option<String>,
    debug: bool,
}

impl Args {
    /// Parse command-line arguments.
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let mut root = None;
        let mut relations = Vec::new();
        let mut list = None;
        let mut debug = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => debug = true,
                "--all" => list = Some(args.next().context("--all needs a relation")?),
                _ if root.is_none() => root = Some(arg),
                _ => relations.push(arg),
            }
        }

        let Some(root) = root else {
            bail!("usage: walk <root-url> [rel ...] [--all <rel>] [--debug]");
        };

        Ok(Self {
            root,
            relations,
            list,
            debug,
        })
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "hal_navigator=debug"
    } else {
        "hal_navigator=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse()?;
    init_logging(args.debug);

    let mut node = Node::builder()
        .url(&args.root)
        .transport(HttpConfig::new().with_request_timeout(Duration::from_secs(30)))
        .pool_options(PoolOptions::new().with_capacity(4))
        .scheduler(Scheduler::current())
        .build()?
        .fetch();

    println!("[Root] {}", args.root);

    for relation in &args.relations {
        let next = node
            .follow_first(relation)
            .await
            .with_context(|| format!("following '{relation}'"))?;
        println!("[Follow] {relation} -> {}", next.url().map(|u| u.as_str()).unwrap_or("?"));
        node = next.fetch();
    }

    let body = node.body().await?;

    println!("[Relations]");
    for relation in body.relations() {
        println!("        {relation}");
    }

    println!("[Properties]");
    for name in body.property_names() {
        if let Some(value) = body.property(name) {
            println!("        {name} = {value}");
        }
    }

    if let Some(relation) = &args.list {
        let targets = node.follow_all(relation).await?;
        println!("[All] {relation}: {} link(s)", targets.len());
        for target in targets {
            println!("        {}", target.url().map(|u| u.as_str()).unwrap_or("?"));
        }
    }

    Ok(())
}
