//! List command - show what the server would expose at a path.
//!
//! # Examples
//!
//! ```bash
//! # List the share root
//! davshare ls ~/public
//!
//! # Details with sizes and entity tags
//! davshare ls -l ~/public /docs
//!
//! # Output as JSON for scripting
//! davshare ls --json ~/public / | jq '.entries[].name'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::{debug, instrument};

use davshare_core::{ResourceNode, RootBinding, TreeError};

use super::path_segments;
use crate::output::{create_table, format_size};

#[derive(ClapArgs, Clone, Debug)]
pub struct Args {
    /// Directory the share is rooted at
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Path within the share (default: root)
    #[arg(default_value = "/")]
    pub path: String,

    /// Show type, size and ETag
    #[arg(short, long)]
    pub long: bool,

    /// Output as JSON
    #[arg(long, conflicts_with = "long")]
    pub json: bool,
}

/// JSON output format for ls command
#[derive(Serialize)]
struct LsOutput {
    path: String,
    entries: Vec<EntryInfo>,
}

#[derive(Serialize)]
struct EntryInfo {
    name: String,
    #[serde(rename = "type")]
    entry_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
}

impl EntryInfo {
    /// Snapshot a node. `None` if it vanished since it was listed.
    fn from_node(node: &ResourceNode) -> Result<Option<Self>, TreeError> {
        let info = match node {
            ResourceNode::Collection(c) => EntryInfo {
                name: c.name(),
                entry_type: "collection",
                size: None,
                etag: None,
            },
            ResourceNode::Leaf(l) => {
                let stat = match l.stat() {
                    Ok(stat) => stat,
                    Err(TreeError::NotFound { .. }) => return Ok(None),
                    Err(e) => return Err(e),
                };
                EntryInfo {
                    name: l.name(),
                    entry_type: "file",
                    size: Some(stat.size),
                    etag: Some(stat.etag),
                }
            }
        };
        Ok(Some(info))
    }
}

#[instrument(level = "info", name = "cmd::ls", skip_all, fields(path = %args.path))]
pub fn execute(args: &Args) -> Result<()> {
    let root = RootBinding::new(&args.root)
        .with_context(|| format!("Cannot share {}", args.root.display()))?;

    let node = root
        .walk(path_segments(&args.path))
        .with_context(|| format!("Cannot access {}", args.path))?;

    let nodes = match &node {
        ResourceNode::Collection(collection) => collection
            .list_children()
            .with_context(|| format!("Cannot list {}", args.path))?,
        ResourceNode::Leaf(_) => vec![node.clone()],
    };

    let mut entries = Vec::with_capacity(nodes.len());
    for child in &nodes {
        match EntryInfo::from_node(child)? {
            Some(info) => entries.push(info),
            None => debug!(name = %child.name(), "entry vanished while listing"),
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    if args.json {
        let output = LsOutput {
            path: args.path.clone(),
            entries,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if args.long {
        print_long_format(&entries);
    } else {
        for entry in &entries {
            println!("{}", display_name(entry));
        }
    }

    Ok(())
}

fn display_name(entry: &EntryInfo) -> String {
    if entry.entry_type == "collection" {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    }
}

fn print_long_format(entries: &[EntryInfo]) {
    let mut table = create_table();
    table.set_header(vec!["Type", "Size", "ETag", "Name"]);

    for entry in entries {
        let kind = if entry.entry_type == "collection" { "d" } else { "-" };
        table.add_row(vec![
            kind.to_string(),
            entry.size.map_or_else(|| "-".to_string(), format_size),
            entry.etag.clone().unwrap_or_else(|| "-".to_string()),
            display_name(entry),
        ]);
    }

    println!("{table}");
}
