use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use linkbus::config::{Config, load_config};
use linkbus::hierarchy::{SegmentForest, SegmentNode};
use linkbus::loader::{BusLoader, FsSource};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the segment hierarchy of link buses", long_about = None)]
struct Cli {
    /// JSON bus document
    #[arg(value_name = "BUS_FILE")]
    bus_file: Utf8PathBuf,

    /// Source node of the bus to load (required when the document holds several)
    #[arg(short, long)]
    bus: Option<String>,

    /// Config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whole segment forest
    Tree,
    /// Print the stored parent of a segment
    Parent { id: String },
    /// List the named children of a segment
    Children { id: String },
    /// Search for a segment below another one (defaults to searching every root)
    Find {
        id: String,
        #[arg(long)]
        from: Option<String>,
    },
    /// List the named siblings of a segment
    Siblings {
        id: String,
        /// Segment to search the parent from (defaults to the root of the segment's own tree)
        #[arg(long, conflicts_with = "global")]
        root: Option<String>,
        /// Use the assembled parent link instead of searching from a root
        #[arg(long)]
        global: bool,
    },
    /// List the named ancestors of a segment, nearest first
    Ancestors { id: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let mut loader = BusLoader::new(FsSource);
    let forest = loader
        .load_forest(&cli.bus_file, cli.bus.as_deref())
        .with_context(|| format!("Failed to load {}", cli.bus_file))?;

    let out = run(&cli.command, &forest, &config)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run(command: &Command, forest: &SegmentForest, config: &Config) -> Result<serde_json::Value> {
    let value = match command {
        Command::Tree => serde_json::to_value(forest.to_views())?,
        Command::Parent { id } => json!(require(forest, id)?.parent_id()),
        Command::Children { id } => json!(require(forest, id)?.child_ids()),
        Command::Find { id, from } => {
            let found = match from {
                Some(from) => require(forest, from)?.find_node(Some(id.as_str())),
                None => forest.roots().find_map(|r| r.find_node(Some(id.as_str()))),
            };
            json!(found.map(|n| n.to_view()))
        }
        Command::Siblings { id, root, global } => {
            let node = require(forest, id)?;
            if *global {
                json!(node.sibling_ids_global())
            } else {
                let root = match root {
                    Some(root) => require(forest, root)?,
                    None => node.ancestors().last().unwrap_or(node),
                };
                if config.query.strict_siblings {
                    json!(node.try_sibling_ids(root)?)
                } else {
                    json!(node.sibling_ids(root))
                }
            }
        }
        Command::Ancestors { id } => json!(require(forest, id)?.ancestor_ids()),
    };
    Ok(value)
}

fn require<'a>(forest: &'a SegmentForest, id: &str) -> Result<SegmentNode<'a>> {
    forest
        .lookup(id)
        .ok_or_else(|| anyhow!("No segment '{}'", id))
}
