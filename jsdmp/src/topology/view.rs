// JSD-MP: Joint Service Deployment and Manager Placement
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Resource views, hypothetical resource deltas and the graph queries built on top of them.

use super::{NodeId, Path, Topology, TopologyError};

use std::collections::{HashMap, HashSet, VecDeque};

/// # Resource View
///
/// Read access to the residual resources of a topology. The structure (nodes, links, roles and
/// manager restrictions) always comes from the underlying [`Topology`], while the residual amounts
/// may be overlaid by a [`ResourceDelta`].
pub trait ResourceView {
    /// Returns the underlying topology
    fn topology(&self) -> &Topology;

    /// Returns the number of free cores on the node
    fn cores(&self, node: NodeId) -> Result<i64, TopologyError>;

    /// Returns the amount of free memory on the node
    fn memory(&self, node: NodeId) -> Result<i64, TopologyError>;

    /// Returns the residual bandwidth of the directed link
    fn bandwidth(&self, source: NodeId, destination: NodeId) -> Result<i64, TopologyError>;

    /// Search for the path with the least number of hops from `source` to `destination`, using
    /// only links with at least `required_bandwidth` left. If `max_hops` is given, longer paths
    /// are not considered. Returns `Ok(None)` if no such path exists, and the empty path if
    /// `source == destination`.
    fn path(
        &self,
        source: NodeId,
        destination: NodeId,
        required_bandwidth: i64,
        max_hops: Option<usize>,
    ) -> Result<Option<Path>, TopologyError> {
        let topo = self.topology();
        topo.check(source)?;
        topo.check(destination)?;
        if source == destination {
            return Ok(Some(Vec::new()));
        }

        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        seen.insert(source);
        queue.push_back((source, 0));

        while let Some((u, hops)) = queue.pop_front() {
            if max_hops.map(|max| hops >= max).unwrap_or(false) {
                continue;
            }
            for v in topo.connections(u)? {
                if seen.contains(&v) || self.bandwidth(u, v)? < required_bandwidth {
                    continue;
                }
                seen.insert(v);
                parent.insert(v, u);
                if v == destination {
                    // walk back to the source
                    let mut path: Path = Vec::with_capacity(hops + 1);
                    let mut current = destination;
                    while let Some(prev) = parent.get(&current) {
                        path.push((*prev, current));
                        current = *prev;
                    }
                    path.reverse();
                    return Ok(Some(path));
                }
                queue.push_back((v, hops + 1));
            }
        }

        Ok(None)
    }

    /// Run a breadth-first search from `source`, using only links with at least
    /// `required_bandwidth` left, and return every reached node together with its hop distance
    /// (in the order of discovery, starting with `(source, 0)`).
    fn bfs(
        &self,
        source: NodeId,
        required_bandwidth: i64,
        max_hops: Option<usize>,
    ) -> Result<Vec<(NodeId, usize)>, TopologyError> {
        let topo = self.topology();
        topo.check(source)?;

        let mut reachability: Vec<(NodeId, usize)> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        seen.insert(source);
        queue.push_back((source, 0));

        while let Some((u, hops)) = queue.pop_front() {
            reachability.push((u, hops));
            if max_hops.map(|max| hops >= max).unwrap_or(false) {
                continue;
            }
            for v in topo.connections(u)? {
                if !seen.contains(&v) && self.bandwidth(u, v)? >= required_bandwidth {
                    seen.insert(v);
                    queue.push_back((v, hops + 1));
                }
            }
        }

        Ok(reachability)
    }
}

impl ResourceView for Topology {
    fn topology(&self) -> &Topology {
        self
    }

    fn cores(&self, node: NodeId) -> Result<i64, TopologyError> {
        Ok(self.node(node)?.cores)
    }

    fn memory(&self, node: NodeId) -> Result<i64, TopologyError> {
        Ok(self.node(node)?.memory)
    }

    fn bandwidth(&self, source: NodeId, destination: NodeId) -> Result<i64, TopologyError> {
        Ok(self.link(source, destination)?.bandwidth)
    }
}

/// # Reservable
///
/// Sink for resource reservations. Positive amounts consume resources, negative amounts release
/// them again. Reserving and releasing the same amount are exact inverses.
pub trait Reservable {
    /// Reserve `cores` and `memory` on the node
    fn reserve_node(&mut self, node: NodeId, cores: i64, memory: i64)
        -> Result<(), TopologyError>;

    /// Reserve `bandwidth` on the directed link
    fn reserve_link(
        &mut self,
        source: NodeId,
        destination: NodeId,
        bandwidth: i64,
    ) -> Result<(), TopologyError>;
}

impl Reservable for Topology {
    fn reserve_node(
        &mut self,
        node: NodeId,
        cores: i64,
        memory: i64,
    ) -> Result<(), TopologyError> {
        let current = self.node(node)?;
        let updated = current.with_resources(current.cores - cores, current.memory - memory);
        self.update_node(node, updated)
    }

    fn reserve_link(
        &mut self,
        source: NodeId,
        destination: NodeId,
        bandwidth: i64,
    ) -> Result<(), TopologyError> {
        let current = *self.link(source, destination)?;
        self.update_link(source, destination, super::Link::new(current.bandwidth - bandwidth))
    }
}

/// # Resource Delta
///
/// Amount of resources consumed by a hypothetical placement, keyed by node and link. The delta is
/// composed with a base view only when it is queried, using [`ResourceDelta::over`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDelta {
    nodes: HashMap<NodeId, (i64, i64)>,
    links: HashMap<(NodeId, NodeId), i64>,
}

impl ResourceDelta {
    /// Create an empty delta
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing is consumed
    pub fn is_empty(&self) -> bool {
        self.nodes.values().all(|(c, m)| *c == 0 && *m == 0) && self.links.values().all(|b| *b == 0)
    }

    /// Cores and memory consumed on the node
    pub fn node(&self, node: NodeId) -> (i64, i64) {
        self.nodes.get(&node).copied().unwrap_or((0, 0))
    }

    /// Bandwidth consumed on the link
    pub fn link(&self, source: NodeId, destination: NodeId) -> i64 {
        self.links.get(&(source, destination)).copied().unwrap_or(0)
    }

    /// Stack this delta on top of a base view.
    pub fn over<'a, V: ResourceView>(&'a self, base: &'a V) -> Overlay<'a, V> {
        Overlay { base, delta: self }
    }
}

impl Reservable for ResourceDelta {
    fn reserve_node(
        &mut self,
        node: NodeId,
        cores: i64,
        memory: i64,
    ) -> Result<(), TopologyError> {
        let entry = self.nodes.entry(node).or_insert((0, 0));
        entry.0 += cores;
        entry.1 += memory;
        Ok(())
    }

    fn reserve_link(
        &mut self,
        source: NodeId,
        destination: NodeId,
        bandwidth: i64,
    ) -> Result<(), TopologyError> {
        *self.links.entry((source, destination)).or_insert(0) += bandwidth;
        Ok(())
    }
}

/// A [`ResourceDelta`] stacked on top of a base view.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a, V = Topology> {
    base: &'a V,
    delta: &'a ResourceDelta,
}

impl<'a, V: ResourceView> ResourceView for Overlay<'a, V> {
    fn topology(&self) -> &Topology {
        self.base.topology()
    }

    fn cores(&self, node: NodeId) -> Result<i64, TopologyError> {
        Ok(self.base.cores(node)? - self.delta.node(node).0)
    }

    fn memory(&self, node: NodeId) -> Result<i64, TopologyError> {
        Ok(self.base.memory(node)? - self.delta.node(node).1)
    }

    fn bandwidth(&self, source: NodeId, destination: NodeId) -> Result<i64, TopologyError> {
        Ok(self.base.bandwidth(source, destination)? - self.delta.link(source, destination))
    }
}
