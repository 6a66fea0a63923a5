//! Ring commands.

use anyhow::{bail, Context};
use clap::Subcommand;
use corelib::{ClientFactory, EntryKey, KeyId, KeyLocator, NodeDescriptor, RingState, Storage};
use locator::{NodeLocator, Simulation};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show which node owns NAME.
    Lookup { name: String },
    /// Store VALUE under NAME.
    Put { name: String, value: String },
    /// Read the value stored under NAME.
    Get { name: String },
    /// Delete NAME.
    Remove { name: String },
    /// List ring members with their record counts.
    Ring,
    /// Run several operations against one ring, e.g. "put a 1" "get a" ring.
    Batch { ops: Vec<String> },
}

/// Outcome of a command, printable for the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Owner { name: String, id: KeyId, owner: NodeDescriptor },
    Stored { name: String, owner: NodeDescriptor },
    Value { name: String, value: Vec<u8> },
    Removed { name: String, owner: NodeDescriptor },
    Ring(Vec<RingRow>),
    Batch(Vec<CommandResult>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingRow {
    pub node: NodeDescriptor,
    pub predecessor: Option<NodeDescriptor>,
    pub records: usize,
}

impl Command {
    /// Parse one batch operation: `lookup NAME`, `put NAME VALUE`,
    /// `get NAME`, `remove NAME` or `ring`.
    pub fn parse_op(op: &str) -> anyhow::Result<Command> {
        let words: Vec<&str> = op.split_whitespace().collect();
        let command = match words.as_slice() {
            ["lookup", name] => Command::Lookup { name: name.to_string() },
            ["put", name, value @ ..] if !value.is_empty() => Command::Put {
                name: name.to_string(),
                value: value.join(" "),
            },
            ["get", name] => Command::Get { name: name.to_string() },
            ["remove", name] => Command::Remove { name: name.to_string() },
            ["ring"] => Command::Ring,
            _ => bail!("cannot parse operation {:?}", op),
        };
        Ok(command)
    }

    pub async fn execute(&self, sim: &Simulation) -> anyhow::Result<CommandResult> {
        match self {
            Command::Batch { ops } => {
                let mut results = Vec::with_capacity(ops.len());
                for op in ops {
                    let command = Command::parse_op(op)?;
                    results.push(command.execute_single(sim).await?);
                }
                Ok(CommandResult::Batch(results))
            }
            single => single.execute_single(sim).await,
        }
    }

    async fn execute_single(&self, sim: &Simulation) -> anyhow::Result<CommandResult> {
        let result = match self {
            Command::Lookup { name } => {
                let key = EntryKey::from_name(&sim.partitioner(), name.as_str());
                let owner = entry_node(sim)?.lookup(key.id).await?;
                CommandResult::Owner {
                    name: name.clone(),
                    id: key.id,
                    owner,
                }
            }
            Command::Put { name, value } => {
                let key = EntryKey::from_name(&sim.partitioner(), name.as_str());
                let owner = entry_node(sim)?.lookup(key.id).await?;
                let handle = sim.clients().acquire(&owner).await?;
                let outcome = handle.put(key, value.clone().into_bytes()).await;
                sim.clients().release(&owner);
                outcome.with_context(|| format!("writing {} on {}", name, owner))?;
                CommandResult::Stored {
                    name: name.clone(),
                    owner,
                }
            }
            Command::Get { name } => {
                let key = EntryKey::from_name(&sim.partitioner(), name.as_str());
                let owner = entry_node(sim)?.lookup(key.id).await?;
                let handle = sim.clients().acquire(&owner).await?;
                let outcome = handle.get(key).await;
                sim.clients().release(&owner);
                CommandResult::Value {
                    name: name.clone(),
                    value: outcome.with_context(|| format!("reading {} from {}", name, owner))?,
                }
            }
            Command::Remove { name } => {
                let key = EntryKey::from_name(&sim.partitioner(), name.as_str());
                let owner = entry_node(sim)?.lookup(key.id).await?;
                let handle = sim.clients().acquire(&owner).await?;
                let outcome = handle.remove(key).await;
                sim.clients().release(&owner);
                outcome.with_context(|| format!("removing {} on {}", name, owner))?;
                CommandResult::Removed {
                    name: name.clone(),
                    owner,
                }
            }
            Command::Ring => CommandResult::Ring(
                sim.nodes()
                    .map(|node| RingRow {
                        node: node.local(),
                        predecessor: node.state().predecessor(),
                        records: node.storage().len(),
                    })
                    .collect(),
            ),
            Command::Batch { .. } => bail!("batches cannot be nested"),
        };
        Ok(result)
    }
}

/// Node every client request enters the ring through.
fn entry_node(sim: &Simulation) -> anyhow::Result<&Arc<NodeLocator>> {
    sim.nodes().next().context("ring has no nodes")
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Owner { name, id, owner } => {
                write!(f, "{} -> {} is owned by {} ({})", name, id, owner, owner.id)
            }
            CommandResult::Stored { name, owner } => write!(f, "stored {} on {}", name, owner),
            CommandResult::Value { name, value } => {
                write!(f, "{} = {}", name, String::from_utf8_lossy(value))
            }
            CommandResult::Removed { name, owner } => write!(f, "removed {} from {}", name, owner),
            CommandResult::Ring(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    let predecessor = row
                        .predecessor
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |p| p.to_string());
                    write!(
                        f,
                        "{} {:<16} pred {:<16} records {}",
                        row.node.id, row.node.name, predecessor, row.records
                    )?;
                }
                Ok(())
            }
            CommandResult::Batch(results) => {
                for (i, result) in results.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", result)?;
                }
                Ok(())
            }
        }
    }
}
