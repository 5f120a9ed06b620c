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

//! # Placements
//!
//! Immutable results of a solver. A [`Placement`] maps every function of a chain onto a node and
//! every bandwidth demand of the chain onto a path. A [`ManagementPlacement`] chooses the manager
//! node of a chain, together with one management path per manageable function. Both values know
//! how to reserve their resources on anything [`Reservable`], and how to release them again.
//! Reserving and releasing are exact inverses.
//!
//! A committed chain is represented as a [`Deployment`], which is either managed or unmanaged.

mod partial;
pub use partial::PartialPlacement;

use crate::domain::{Chain, Vnfm};
use crate::topology::{NodeId, Path, Reservable, TopologyError};

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when a malformed placement is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// Not every function of the chain is assigned to a node
    #[error("Placement of chain {0} assigns {2} of {1} functions")]
    IncompletePlacement(String, usize, usize),
    /// A bandwidth demand of the chain has no (or no matching) path
    #[error("Placement of chain {0} has no path for the link {1} -> {2}")]
    UnassignedLink(String, usize, usize),
    /// The number of management paths does not match the number of manageable functions
    #[error("Management of chain {0} requires {1} paths, but {2} are given")]
    IncompleteManagementPlacement(String, usize, usize),
}

/// # Placement
///
/// Mapping of a chain onto the topology. The constructor checks that every function has a node,
/// and that every link of the chain has a path connecting the two nodes. The path may be empty
/// only if both functions are placed on the same node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    chain: Arc<Chain>,
    nodes: Vec<NodeId>,
    links: BTreeMap<(usize, usize), Path>,
}

impl Placement {
    /// Create a new placement, checking that it is complete.
    pub fn new(
        chain: Arc<Chain>,
        nodes: Vec<NodeId>,
        links: BTreeMap<(usize, usize), Path>,
    ) -> Result<Self, PlacementError> {
        if nodes.len() != chain.len() {
            return Err(PlacementError::IncompletePlacement(
                chain.name.clone(),
                chain.len(),
                nodes.len(),
            ));
        }
        for (s, d) in chain.links().keys() {
            let connected = match links.get(&(*s, *d)) {
                Some(path) if path.is_empty() => nodes[*s] == nodes[*d],
                Some(path) => {
                    path.first().map(|(u, _)| *u) == Some(nodes[*s])
                        && path.last().map(|(_, v)| *v) == Some(nodes[*d])
                }
                None => false,
            };
            if !connected {
                return Err(PlacementError::UnassignedLink(chain.name.clone(), *s, *d));
            }
        }
        Ok(Self { chain, nodes, links })
    }

    /// The placed chain
    pub fn chain(&self) -> &Arc<Chain> {
        &self.chain
    }

    /// Node of every function, in chain order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Path of every link of the chain
    pub fn links(&self) -> &BTreeMap<(usize, usize), Path> {
        &self.links
    }

    /// Nodes of all manageable functions, in chain order (with repetitions).
    pub fn manageable_nodes(&self) -> Vec<NodeId> {
        self.chain.manageable_functions().map(|i| self.nodes[i]).collect()
    }

    /// Reserve the resources of all functions and paths.
    pub fn apply_on_topology<R: Reservable>(&self, target: &mut R) -> Result<(), TopologyError> {
        self.reserve(target, 1)
    }

    /// Release everything reserved by [`Placement::apply_on_topology`].
    pub fn revert_on_topology<R: Reservable>(&self, target: &mut R) -> Result<(), TopologyError> {
        self.reserve(target, -1)
    }

    fn reserve<R: Reservable>(&self, target: &mut R, sign: i64) -> Result<(), TopologyError> {
        for (function, node) in self.chain.functions().iter().zip(self.nodes.iter()) {
            target.reserve_node(*node, sign * function.cores, sign * function.memory)?;
        }
        for ((s, d), path) in self.links.iter() {
            let bandwidth = self.chain.link(*s, *d).map(|l| l.bandwidth).unwrap_or(0);
            for (u, v) in path {
                target.reserve_link(*u, *v, sign * bandwidth)?;
            }
        }
        Ok(())
    }
}

/// # Management Placement
///
/// Manager node of a chain, with one management path for every manageable function (in chain
/// order). `blocks` is the number of license blocks this assignment opened on the manager node.
/// For each of them, the resources of the manager template are reserved on that node. Every
/// management path always reserves the management bandwidth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementPlacement {
    chain: Arc<Chain>,
    vnfm: Vnfm,
    management_node: NodeId,
    management_links: Vec<Path>,
    blocks: usize,
}

impl ManagementPlacement {
    /// Create a new management placement, checking that there is exactly one path per manageable
    /// function.
    pub fn new(
        chain: Arc<Chain>,
        vnfm: Vnfm,
        management_node: NodeId,
        management_links: Vec<Path>,
        blocks: usize,
    ) -> Result<Self, PlacementError> {
        let expected = chain.num_manageable();
        if management_links.len() != expected {
            return Err(PlacementError::IncompleteManagementPlacement(
                chain.name.clone(),
                expected,
                management_links.len(),
            ));
        }
        Ok(Self { chain, vnfm, management_node, management_links, blocks })
    }

    /// The managed chain
    pub fn chain(&self) -> &Arc<Chain> {
        &self.chain
    }

    /// The manager template
    pub fn vnfm(&self) -> &Vnfm {
        &self.vnfm
    }

    /// Node hosting the manager
    pub fn management_node(&self) -> NodeId {
        self.management_node
    }

    /// Management paths, one per manageable function
    pub fn management_links(&self) -> &[Path] {
        &self.management_links
    }

    /// Number of license blocks opened on the manager node
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Reserve the manager resources and the management bandwidth.
    pub fn apply_on_topology<R: Reservable>(&self, target: &mut R) -> Result<(), TopologyError> {
        self.reserve(target, 1)
    }

    /// Release everything reserved by [`ManagementPlacement::apply_on_topology`].
    pub fn revert_on_topology<R: Reservable>(&self, target: &mut R) -> Result<(), TopologyError> {
        self.reserve(target, -1)
    }

    fn reserve<R: Reservable>(&self, target: &mut R, sign: i64) -> Result<(), TopologyError> {
        if self.blocks > 0 {
            let blocks = sign * self.blocks as i64;
            target.reserve_node(
                self.management_node,
                blocks * self.vnfm.cores,
                blocks * self.vnfm.memory,
            )?;
        }
        for (u, v) in self.management_links.iter().flatten() {
            target.reserve_link(*u, *v, sign * self.vnfm.bandwidth)?;
        }
        Ok(())
    }
}

/// A chain committed to the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    /// The functions are placed, but no manager was assigned
    Unmanaged(Placement),
    /// The functions are placed and managed
    Managed(Placement, ManagementPlacement),
}

impl Deployment {
    /// The placement of the functions
    pub fn placement(&self) -> &Placement {
        match self {
            Self::Unmanaged(p) | Self::Managed(p, _) => p,
        }
    }

    /// The management placement, if the chain is managed
    pub fn management(&self) -> Option<&ManagementPlacement> {
        match self {
            Self::Unmanaged(_) => None,
            Self::Managed(_, mp) => Some(mp),
        }
    }

    /// The deployed chain
    pub fn chain(&self) -> &Arc<Chain> {
        self.placement().chain()
    }

    /// Returns true if the chain is managed
    pub fn is_managed(&self) -> bool {
        matches!(self, Self::Managed(_, _))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Type;
    use crate::topology::{Link, Node, Topology};
    use maplit::btreemap;

    fn setup() -> (Topology, Arc<Chain>, Vec<NodeId>) {
        let mut topo = Topology::new();
        let s1 = topo.add_node("s1", Node::new(4, 4)).unwrap();
        let s2 = topo.add_node("s2", Node::new(4, 4)).unwrap();
        let s3 = topo.add_node("s3", Node::new(4, 4)).unwrap();
        topo.add_link(s1, s2, Link::new(20)).unwrap();
        topo.add_link(s2, s3, Link::new(20)).unwrap();
        topo.add_link(s1, s3, Link::new(20)).unwrap();

        let chain = Chain::new("ch-0", 100)
            .with_function(Type::new("a", 2, 1))
            .with_function(Type::new("b", 1, 2).with_manageable(false))
            .with_function(Type::new("c", 1, 1))
            .with_link(0, 1, Link::new(5))
            .unwrap()
            .with_link(1, 2, Link::new(7))
            .unwrap();

        (topo, Arc::new(chain), vec![s1, s2, s3])
    }

    #[test]
    fn incomplete_placement() {
        let (_, chain, n) = setup();
        assert_eq!(
            Placement::new(chain.clone(), vec![n[0], n[1]], BTreeMap::new()),
            Err(PlacementError::IncompletePlacement("ch-0".to_string(), 3, 2))
        );
        assert_eq!(
            Placement::new(
                chain.clone(),
                vec![n[0], n[1], n[2]],
                btreemap! {(0, 1) => vec![(n[0], n[1])]}
            ),
            Err(PlacementError::UnassignedLink("ch-0".to_string(), 1, 2))
        );
        assert_eq!(
            Placement::new(
                chain.clone(),
                vec![n[0], n[1], n[2]],
                btreemap! {(0, 1) => vec![(n[0], n[1])], (1, 2) => vec![]}
            ),
            Err(PlacementError::UnassignedLink("ch-0".to_string(), 1, 2))
        );
        assert!(Placement::new(
            chain,
            vec![n[0], n[1], n[1]],
            btreemap! {(0, 1) => vec![(n[0], n[1])], (1, 2) => vec![]}
        )
        .is_ok());
    }

    #[test]
    fn apply_and_revert() {
        let (mut topo, chain, n) = setup();
        let original = topo.clone();
        let p = Placement::new(
            chain,
            vec![n[0], n[0], n[2]],
            btreemap! {(0, 1) => vec![], (1, 2) => vec![(n[0], n[1]), (n[1], n[2])]},
        )
        .unwrap();

        p.apply_on_topology(&mut topo).unwrap();
        assert_eq!(topo.node(n[0]).unwrap().cores, 1);
        assert_eq!(topo.node(n[0]).unwrap().memory, 1);
        assert_eq!(topo.node(n[1]).unwrap().cores, 4);
        assert_eq!(topo.node(n[2]).unwrap().cores, 3);
        assert_eq!(topo.link(n[0], n[1]).unwrap().bandwidth, 13);
        assert_eq!(topo.link(n[1], n[2]).unwrap().bandwidth, 13);
        assert_eq!(topo.link(n[0], n[2]).unwrap().bandwidth, 20);
        assert_eq!(p.manageable_nodes(), vec![n[0], n[2]]);

        p.revert_on_topology(&mut topo).unwrap();
        for id in original.nodes() {
            assert_eq!(topo.node(id).unwrap(), original.node(id).unwrap());
        }
        for (u, v, link) in original.links() {
            assert_eq!(topo.link(u, v).unwrap(), link);
        }
    }

    #[test]
    fn management_placement() {
        let (mut topo, chain, n) = setup();
        let vnfm = Vnfm::new(1, 2, 4, 3, 2, 100).unwrap();

        assert_eq!(
            ManagementPlacement::new(chain.clone(), vnfm, n[0], vec![vec![]], 1),
            Err(PlacementError::IncompleteManagementPlacement("ch-0".to_string(), 2, 1))
        );

        let mp = ManagementPlacement::new(
            chain.clone(),
            vnfm,
            n[0],
            vec![vec![], vec![(n[0], n[2])]],
            1,
        )
        .unwrap();
        mp.apply_on_topology(&mut topo).unwrap();
        assert_eq!(topo.node(n[0]).unwrap().cores, 3);
        assert_eq!(topo.node(n[0]).unwrap().memory, 2);
        assert_eq!(topo.link(n[0], n[2]).unwrap().bandwidth, 18);
        mp.revert_on_topology(&mut topo).unwrap();
        assert_eq!(topo.node(n[0]).unwrap().cores, 4);
        assert_eq!(topo.link(n[0], n[2]).unwrap().bandwidth, 20);

        // joining an existing license block only reserves the paths
        let shared =
            ManagementPlacement::new(chain, vnfm, n[0], vec![vec![], vec![(n[0], n[2])]], 0)
                .unwrap();
        shared.apply_on_topology(&mut topo).unwrap();
        assert_eq!(topo.node(n[0]).unwrap().cores, 4);
        assert_eq!(topo.link(n[0], n[2]).unwrap().bandwidth, 18);
    }
}
