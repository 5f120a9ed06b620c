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

//! # Topology
//!
//! This module contains the physical resource graph on which service chains are placed. Every
//! node carries compute resources (cores and memory), a traffic role and the set of nodes that are
//! not allowed to manage it. Every directed link carries its residual bandwidth.
//!
//! The [`Topology`] stores the authoritative resource values. Read access to residual resources is
//! abstracted by the [`ResourceView`] trait, which also provides the bandwidth-constrained path and
//! reachability queries. A [`ResourceDelta`] stacked on top of any view (using
//! [`ResourceDelta::over`]) gives a hypothetical state without cloning the topology.
//!
//! ```rust
//! use jsdmp::topology::{Link, Node, ResourceView, Topology};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut topo = Topology::new();
//!     let s1 = topo.add_node("s1", Node::new(1, 2))?;
//!     let s2 = topo.add_node("s2", Node::new(1, 2))?;
//!     let s3 = topo.add_node("s3", Node::new(1, 2))?;
//!     topo.add_link(s1, s2, Link::new(10))?;
//!     topo.add_link(s1, s3, Link::new(5))?;
//!     topo.add_link(s2, s3, Link::new(10))?;
//!
//!     assert_eq!(topo.path(s1, s3, 5, None)?, Some(vec![(s1, s3)]));
//!     assert_eq!(topo.path(s1, s3, 10, None)?, Some(vec![(s1, s2), (s2, s3)]));
//!     assert_eq!(topo.path(s1, s3, 10, Some(1))?, None);
//!     Ok(())
//! }
//! ```

mod view;
pub use view::{Overlay, Reservable, ResourceDelta, ResourceView};

use crate::domain::Direction;

use petgraph::prelude::*;
use petgraph::stable_graph::StableGraph;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

type IndexType = u32;
/// Node Identification (and index into the graph)
pub type NodeId = NodeIndex<IndexType>;
/// Sequence of directed edges, from the first source to the last destination.
pub type Path = Vec<(NodeId, NodeId)>;
/// Resource graph, storing the named nodes and the links
pub type ResourceGraph = StableGraph<Site, Link, Directed, IndexType>;

/// Topology Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// A node with the same name is already present
    #[error("Node name must be unique: {0}")]
    DuplicateNodeName(String),
    /// Node is not present in the topology
    #[error("Node was not found in topology: {0:?}")]
    UnknownNode(NodeId),
    /// Node name is not present in the topology
    #[error("Node name was not found in topology: {0}")]
    UnknownNodeName(String),
    /// The two nodes are not connected by a directed link
    #[error("Link does not exist: {0:?} -> {1:?}")]
    UnknownLink(NodeId, NodeId),
}

/// # Node
///
/// Physical node with its residual compute resources. A node is a value: reserving resources
/// replaces it with an updated copy (see [`Node::with_resources`] and [`Topology::update_node`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Number of free cores
    pub cores: i64,
    /// Amount of free memory
    pub memory: i64,
    /// Traffic role of the node
    pub direction: Direction,
    /// Whether network functions may be placed on the node
    pub vnf_support: bool,
    /// Nodes that must never manage functions running on this node
    pub not_manager_nodes: HashSet<NodeId>,
}

impl Node {
    /// Create a node with the given resources, without any traffic role, supporting VNFs, and
    /// without any manager restriction.
    pub fn new(cores: i64, memory: i64) -> Self {
        Self {
            cores,
            memory,
            direction: Direction::None,
            vnf_support: true,
            not_manager_nodes: HashSet::new(),
        }
    }

    /// Set the traffic role of the node
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set whether network functions may be placed on the node
    pub fn with_vnf_support(mut self, vnf_support: bool) -> Self {
        self.vnf_support = vnf_support;
        self
    }

    /// Set the nodes which are not allowed to manage this node
    pub fn with_not_manager_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.not_manager_nodes = nodes.into_iter().collect();
        self
    }

    /// Returns a copy of this node with the resources replaced.
    pub fn with_resources(&self, cores: i64, memory: i64) -> Self {
        Self { cores, memory, ..self.clone() }
    }
}

/// Directed link with its residual bandwidth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Residual (or, inside a chain, demanded) bandwidth
    pub bandwidth: i64,
}

impl Link {
    /// Create a new link
    pub fn new(bandwidth: i64) -> Self {
        Self { bandwidth }
    }
}

/// Node weight of the resource graph
#[derive(Debug, Clone)]
pub struct Site {
    name: String,
    node: Node,
}

/// # Topology
///
/// Directed resource graph. Node names are unique for the entire lifetime of the topology. Nodes
/// and the outgoing links of each node are iterated in the order in which they were added.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: ResourceGraph,
    names: HashMap<String, NodeId>,
}

impl Topology {
    /// Generate an empty topology
    pub fn new() -> Self {
        Self { graph: ResourceGraph::default(), names: HashMap::new() }
    }

    /// Add a new node to the topology and return its id. Fails if the name is already taken.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        node: Node,
    ) -> Result<NodeId, TopologyError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(TopologyError::DuplicateNodeName(name));
        }
        let id = self.graph.add_node(Site { name: name.clone(), node });
        self.names.insert(name, id);
        Ok(id)
    }

    /// Add a directed link from `source` to `destination`. A bidirectional connection requires two
    /// links. Adding the same link twice replaces its bandwidth and keeps its original position in
    /// the adjacency order.
    pub fn add_link(
        &mut self,
        source: NodeId,
        destination: NodeId,
        link: Link,
    ) -> Result<(), TopologyError> {
        self.check(source)?;
        self.check(destination)?;
        self.graph.update_edge(source, destination, link);
        Ok(())
    }

    /// Replace the node with the given one. The name of the node is kept.
    pub fn update_node(&mut self, id: NodeId, node: Node) -> Result<(), TopologyError> {
        let site = self.graph.node_weight_mut(id).ok_or(TopologyError::UnknownNode(id))?;
        site.node = node;
        Ok(())
    }

    /// Replace the link from `source` to `destination` with the given one.
    pub fn update_link(
        &mut self,
        source: NodeId,
        destination: NodeId,
        link: Link,
    ) -> Result<(), TopologyError> {
        let edge = self
            .graph
            .find_edge(source, destination)
            .ok_or(TopologyError::UnknownLink(source, destination))?;
        self.graph[edge] = link;
        Ok(())
    }

    /// Returns a reference to the node
    pub fn node(&self, id: NodeId) -> Result<&Node, TopologyError> {
        self.graph.node_weight(id).map(|s| &s.node).ok_or(TopologyError::UnknownNode(id))
    }

    /// Returns a reference to the link from `source` to `destination`
    pub fn link(&self, source: NodeId, destination: NodeId) -> Result<&Link, TopologyError> {
        self.graph
            .find_edge(source, destination)
            .map(|e| &self.graph[e])
            .ok_or(TopologyError::UnknownLink(source, destination))
    }

    /// Get the id of the node with the given name.
    pub fn get_node_id(&self, name: impl AsRef<str>) -> Result<NodeId, TopologyError> {
        self.names
            .get(name.as_ref())
            .copied()
            .ok_or_else(|| TopologyError::UnknownNodeName(name.as_ref().to_string()))
    }

    /// Returns the name of the node
    pub fn get_node_name(&self, id: NodeId) -> Result<&str, TopologyError> {
        self.graph.node_weight(id).map(|s| s.name.as_str()).ok_or(TopologyError::UnknownNode(id))
    }

    /// Returns true if the node exists in the topology
    pub fn contains(&self, id: NodeId) -> bool {
        self.graph.contains_node(id)
    }

    /// Iterate over all nodes, in the order in which they were added
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    /// Returns the number of nodes in the topology
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of directed links in the topology
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over all directed links, in the order they were added
    pub fn links(&self) -> impl Iterator<Item = (NodeId, NodeId, &Link)> + '_ {
        self.graph.edge_indices().filter_map(move |e| {
            let (source, target) = self.graph.edge_endpoints(e)?;
            Some((source, target, self.graph.edge_weight(e)?))
        })
    }

    /// Returns the destinations of all links leaving `id`, in the order the links were added.
    pub fn connections(&self, id: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.check(id)?;
        let mut edges: Vec<_> =
            self.graph.edges(id).map(|e| (e.id(), e.target())).collect();
        edges.sort_by_key(|(e, _)| *e);
        Ok(edges.into_iter().map(|(_, t)| t).collect())
    }

    /// Returns `Err(UnknownNode)` if the node is not part of the topology
    pub(crate) fn check(&self, id: NodeId) -> Result<(), TopologyError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TopologyError::UnknownNode(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_node_name() {
        let mut topo = Topology::new();
        topo.add_node("parham", Node::new(1, 2)).unwrap();
        assert_eq!(
            topo.add_node("parham", Node::new(1, 2)),
            Err(TopologyError::DuplicateNodeName("parham".to_string()))
        );
    }

    #[test]
    fn invalid_link() {
        let mut topo = Topology::new();
        let a = topo.add_node("a", Node::new(1, 2)).unwrap();
        let ghost: NodeId = 42.into();
        assert_eq!(topo.add_link(a, ghost, Link::new(10)), Err(TopologyError::UnknownNode(ghost)));
        assert_eq!(topo.add_link(ghost, a, Link::new(10)), Err(TopologyError::UnknownNode(ghost)));
    }

    #[test]
    fn connections_keep_insertion_order() {
        let mut topo = Topology::new();
        let a = topo.add_node("a", Node::new(8, 16)).unwrap();
        let b = topo.add_node("b", Node::new(1, 2)).unwrap();
        let c = topo.add_node("c", Node::new(1, 2)).unwrap();
        topo.add_link(a, c, Link::new(10)).unwrap();
        topo.add_link(a, b, Link::new(10)).unwrap();

        assert_eq!(topo.connections(a).unwrap(), vec![c, b]);
        assert_eq!(topo.connections(b).unwrap(), vec![]);
        assert_eq!(topo.num_links(), 2);
    }

    #[test]
    fn links_keep_insertion_order() {
        let mut topo = Topology::new();
        let a = topo.add_node("a", Node::new(1, 1)).unwrap();
        let b = topo.add_node("b", Node::new(1, 1)).unwrap();
        let c = topo.add_node("c", Node::new(1, 1)).unwrap();
        topo.add_link(a, c, Link::new(1)).unwrap();
        topo.add_link(b, a, Link::new(2)).unwrap();
        topo.add_link(a, b, Link::new(3)).unwrap();
        // replacing a link keeps its position
        topo.add_link(a, c, Link::new(4)).unwrap();

        let links: Vec<_> = topo.links().map(|(u, v, l)| (u, v, l.bandwidth)).collect();
        assert_eq!(links, vec![(a, c, 4), (b, a, 2), (a, b, 3)]);
    }

    #[test]
    fn update_is_local_to_the_clone() {
        let mut topo = Topology::new();
        let e = topo.add_node("elahe", Node::new(1, 2)).unwrap();

        let mut clone = topo.clone();
        clone.update_node(e, Node::new(2, 2)).unwrap();

        assert_eq!(topo.node(e).unwrap().cores, 1);
        assert_eq!(clone.node(e).unwrap().cores, 2);
        assert_eq!(clone.get_node_name(e).unwrap(), "elahe");
        assert_eq!(clone.get_node_id("elahe").unwrap(), e);
    }

    #[test]
    fn update_link() {
        let mut topo = Topology::new();
        let a = topo.add_node("a", Node::new(1, 1)).unwrap();
        let b = topo.add_node("b", Node::new(1, 1)).unwrap();
        topo.add_link(a, b, Link::new(10)).unwrap();
        topo.update_link(a, b, Link::new(3)).unwrap();
        assert_eq!(topo.link(a, b).unwrap().bandwidth, 3);
        assert_eq!(topo.update_link(b, a, Link::new(3)), Err(TopologyError::UnknownLink(b, a)));
    }
}
