//! Detection of dependency cycles between messages sharing a timestamp.
//!
//! Messages with an earlier timestamp than their executing block are ordered by time already.
//! Messages with the same timestamp are not, so the logs of all hazard blocks are arranged in a
//! graph and checked for cycles with Kahn's algorithm.

use super::{CrossSafetyError, HazardSet, ValidationError};
use alloy_primitives::ChainId;
use derive_more::Display;
use kona_supervisor_storage::CrossChainSafetyProvider;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};
use tracing::{debug, trace};

/// A log of a hazard block.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("C{chain_id}:L{log_index}")]
struct LogNode {
    chain_id: ChainId,
    log_index: u32,
}

/// Dependency graph between the logs of the blocks in a [`HazardSet`].
///
/// Every log depends on the previous log of the same block. Every executing message with the
/// checked timestamp depends on the log it executes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardGraph {
    log_counts: BTreeMap<ChainId, u32>,
    message_edges: BTreeMap<LogNode, Vec<LogNode>>,
}

impl HazardGraph {
    /// Builds the graph of the messages executed at `timestamp` within the hazard blocks.
    ///
    /// # Errors
    /// * [`CrossSafetyError::InconsistentBlockSeal`] if log storage no longer holds a hazard block.
    /// * [`ValidationError`] if a message refers to a log that does not exist, to a chain outside
    ///   the hazard set, or to itself.
    pub fn build<P>(
        provider: &P,
        timestamp: u64,
        hazards: &HazardSet,
    ) -> Result<Self, CrossSafetyError>
    where
        P: CrossChainSafetyProvider + ?Sized,
    {
        let mut graph = Self::default();
        let mut blocks = Vec::with_capacity(hazards.len());

        for (chain_id, hazard) in hazards.entries() {
            let opened = provider.open_block(chain_id, hazard.number)?;
            if opened.block.id() != hazard.id() {
                return Err(CrossSafetyError::InconsistentBlockSeal {
                    chain_id,
                    expected: hazard.id(),
                    found: opened.block.id(),
                });
            }
            if let Some(log_index) =
                opened.executing_messages.keys().find(|index| **index >= opened.log_count)
            {
                return Err(ValidationError::InvalidLogIndex {
                    chain_id,
                    log_index: *log_index,
                    log_count: opened.log_count,
                }
                .into());
            }
            graph.log_counts.insert(chain_id, opened.log_count);
            blocks.push((chain_id, opened.executing_messages));
        }

        for (chain_id, messages) in blocks {
            for (log_index, msg) in messages {
                if msg.timestamp != timestamp {
                    continue;
                }
                let log_count = *graph
                    .log_counts
                    .get(&msg.chain_id)
                    .ok_or(ValidationError::UnknownChain(msg.chain_id))?;
                if msg.log_index >= log_count {
                    return Err(ValidationError::InvalidLogIndex {
                        chain_id: msg.chain_id,
                        log_index: msg.log_index,
                        log_count,
                    }
                    .into());
                }

                let initiating = LogNode { chain_id: msg.chain_id, log_index: msg.log_index };
                let executing = LogNode { chain_id, log_index };
                if initiating == executing {
                    return Err(ValidationError::SelfReferencingMessage { chain_id, log_index }
                        .into());
                }
                graph.message_edges.entry(initiating).or_default().push(executing);
            }
        }

        Ok(graph)
    }

    /// Returns the number of logs in the graph.
    pub fn node_count(&self) -> usize {
        self.log_counts.values().map(|count| *count as usize).sum()
    }

    /// Returns the number of dependencies between logs.
    pub fn edge_count(&self) -> usize {
        let sequential: usize =
            self.log_counts.values().map(|count| count.saturating_sub(1) as usize).sum();
        sequential + self.message_edges.values().map(Vec::len).sum::<usize>()
    }

    /// Returns `true` if the graph contains a cycle.
    ///
    /// Runs in time linear in the number of nodes and edges.
    pub fn has_cycle(&self) -> bool {
        let mut in_degree: HashMap<LogNode, u32> = HashMap::new();
        for (chain_id, log_count) in &self.log_counts {
            for log_index in 1..*log_count {
                *in_degree.entry(LogNode { chain_id: *chain_id, log_index }).or_default() += 1;
            }
        }
        for executing in self.message_edges.values().flatten() {
            *in_degree.entry(*executing).or_default() += 1;
        }

        let mut ready: Vec<LogNode> = self
            .nodes()
            .filter(|node| !in_degree.contains_key(node))
            .collect();
        let mut removed = 0;

        while let Some(node) = ready.pop() {
            removed += 1;
            for next in self.successors(node) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        in_degree.remove(&next);
                        ready.push(next);
                    }
                }
            }
        }

        removed < self.node_count()
    }

    /// Renders the graph as a Mermaid flowchart, for debugging.
    ///
    /// Logs without dependencies are drawn as circles.
    pub fn to_mermaid(&self) -> String {
        Mermaid(self).to_string()
    }

    fn nodes(&self) -> impl Iterator<Item = LogNode> + '_ {
        self.log_counts.iter().flat_map(|(chain_id, log_count)| {
            (0..*log_count).map(|log_index| LogNode { chain_id: *chain_id, log_index })
        })
    }

    fn successors(&self, node: LogNode) -> impl Iterator<Item = LogNode> + '_ {
        let log_count = self.log_counts.get(&node.chain_id).copied().unwrap_or_default();
        let next = (node.log_index + 1 < log_count)
            .then_some(LogNode { chain_id: node.chain_id, log_index: node.log_index + 1 });
        next.into_iter().chain(self.message_edges.get(&node).into_iter().flatten().copied())
    }
}

struct Mermaid<'a>(&'a HazardGraph);

impl fmt::Display for Mermaid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        let id = |node: LogNode| format!("N{}_{}", node.chain_id, node.log_index);
        let executing: HashSet<LogNode> = graph.message_edges.values().flatten().copied().collect();
        let has_dependencies = |node: LogNode| node.log_index > 0 || executing.contains(&node);

        writeln!(f, "flowchart TD")?;
        for node in graph.nodes() {
            if has_dependencies(node) {
                writeln!(f, "    {}[{node}]", id(node))?;
            } else {
                writeln!(f, "    {}(({node}))", id(node))?;
            }
        }
        for node in graph.nodes() {
            for next in graph.successors(node) {
                writeln!(f, "    {} --> {}", id(node), id(next))?;
            }
        }
        writeln!(f, "    subgraph Legend")?;
        writeln!(f, "        L1((In-Degree 0))")?;
        writeln!(f, "        L2[In-Degree > 0]")?;
        writeln!(f, "    end")
    }
}

/// Checks the hazard blocks for cycles between messages executed at `timestamp`.
///
/// # Errors
/// Fails with [`ValidationError::CyclicDependency`] if a cycle is found, or with any error of
/// [`HazardGraph::build`].
pub fn check_hazard_cycles<P>(
    provider: &P,
    timestamp: u64,
    hazards: &HazardSet,
) -> Result<(), CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
{
    let graph = HazardGraph::build(provider, timestamp, hazards)?;
    if graph.has_cycle() {
        debug!(
            target: "supervisor::safety_checker",
            timestamp,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Cycle detected in hazard graph"
        );
        trace!(target: "supervisor::safety_checker", graph = %graph.to_mermaid(), "Hazard graph");
        return Err(ValidationError::CyclicDependency { timestamp }.into());
    }
    Ok(())
}
