use crate::simulation::SimulationOutcome;
use crate::state::CanonicalKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Role of a state in a [`BasinGraph`].
///
/// Tags are ordered by precedence (`Transient < Cyclic < Target`) and a node tag only
/// ever increases.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum NodeTag {
    Transient,
    Cyclic,
    Target,
}

/// How the merged trajectories ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub reached: usize,
    pub cycled: usize,
    pub exhausted: usize,
}

/// A directed graph of sampled trajectories, keyed by [`CanonicalKey`].
///
/// The target node is always present (and tagged [`NodeTag::Target`]), even if no trajectory
/// reached it. Nodes and edges are deduplicated across all merged outcomes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BasinGraph {
    target: CanonicalKey,
    nodes: BTreeMap<CanonicalKey, NodeTag>,
    edges: BTreeSet<(CanonicalKey, CanonicalKey)>,
    cycles: BTreeSet<Vec<CanonicalKey>>,
    statistics: SampleStatistics,
}

impl BasinGraph {
    /// A graph consisting only of the `target` node.
    pub fn new(target: CanonicalKey) -> BasinGraph {
        let mut nodes = BTreeMap::new();
        nodes.insert(target.clone(), NodeTag::Target);
        BasinGraph {
            target,
            nodes,
            edges: BTreeSet::new(),
            cycles: BTreeSet::new(),
            statistics: SampleStatistics::default(),
        }
    }

    pub fn target(&self) -> &CanonicalKey {
        &self.target
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&CanonicalKey, NodeTag)> {
        self.nodes.iter().map(|(k, v)| (k, *v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&CanonicalKey, &CanonicalKey)> {
        self.edges.iter().map(|(a, b)| (a, b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn tag(&self, key: &CanonicalKey) -> Option<NodeTag> {
        self.nodes.get(key).copied()
    }

    pub fn contains_edge(&self, source: &CanonicalKey, target: &CanonicalKey) -> bool {
        self.edges.contains(&(source.clone(), target.clone()))
    }

    pub fn statistics(&self) -> SampleStatistics {
        self.statistics
    }

    /// Distinct cycles detected while merging outcomes.
    ///
    /// Each cycle lists its states once, rotated to start with the smallest key.
    pub fn cycles(&self) -> impl Iterator<Item = &[CanonicalKey]> {
        self.cycles.iter().map(|it| it.as_slice())
    }

    /// Merge one simulation outcome into the graph.
    ///
    /// - `ReachedTarget`: the path is added with transient nodes.
    /// - `DetectedCycle`: the lead-in path is added with transient nodes, then the cycle
    ///   with cyclic nodes.
    /// - `Exhausted`: ignored (only counted in [`BasinGraph::statistics`]).
    pub fn merge(&mut self, outcome: &SimulationOutcome) {
        match outcome {
            SimulationOutcome::ReachedTarget { path } => {
                self.statistics.reached += 1;
                self.merge_walk(path, NodeTag::Transient);
            }
            SimulationOutcome::DetectedCycle { cycle, path } => {
                self.statistics.cycled += 1;
                self.merge_walk(path, NodeTag::Transient);
                self.merge_walk(cycle, NodeTag::Cyclic);
                if let Some(cycle) = normalize_cycle(cycle) {
                    self.cycles.insert(cycle);
                }
            }
            SimulationOutcome::Exhausted { .. } => {
                self.statistics.exhausted += 1;
            }
        }
    }

    fn merge_walk(&mut self, walk: &[CanonicalKey], tag: NodeTag) {
        for pair in walk.windows(2) {
            self.upgrade(&pair[0], tag);
            self.upgrade(&pair[1], tag);
            self.edges.insert((pair[0].clone(), pair[1].clone()));
        }
    }

    fn upgrade(&mut self, key: &CanonicalKey, tag: NodeTag) {
        let tag = if *key == self.target {
            NodeTag::Target
        } else {
            tag
        };
        self.nodes
            .entry(key.clone())
            .and_modify(|it| *it = (*it).max(tag))
            .or_insert(tag);
    }
}

/// Turn a closed walk (`[a, b, c, a]`) into its distinct states rotated to start
/// with the smallest key (`[a, b, c]` if `a` is the smallest).
fn normalize_cycle(cycle: &[CanonicalKey]) -> Option<Vec<CanonicalKey>> {
    let states = cycle.split_last()?.1;
    let start = states
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)?;
    let mut states = states.to_vec();
    states.rotate_left(start);
    Some(states)
}
