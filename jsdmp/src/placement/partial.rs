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

//! Appendable placement used while searching

use super::Placement;
use crate::domain::{Chain, DomainError};
use crate::topology::{NodeId, Overlay, Path, Reservable, ResourceDelta, ResourceView};
use crate::Error;

use std::collections::BTreeMap;
use std::sync::Arc;

/// # Partial Placement
///
/// Prefix of a placement, built by appending one function at a time. Next to the nodes and the
/// paths, it keeps track of the resources it consumes as a [`ResourceDelta`], such that the
/// hypothetical state after this prefix can be queried with [`PartialPlacement::view`] without
/// cloning the topology.
#[derive(Debug, Clone)]
pub struct PartialPlacement {
    chain: Arc<Chain>,
    nodes: Vec<NodeId>,
    links: BTreeMap<(usize, usize), Path>,
    delta: ResourceDelta,
}

impl PartialPlacement {
    /// Create an empty partial placement
    pub fn new(chain: Arc<Chain>) -> Self {
        Self { chain, nodes: Vec::new(), links: BTreeMap::new(), delta: ResourceDelta::new() }
    }

    /// Number of placed functions
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no function is placed yet
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if every function of the chain is placed
    pub fn is_complete(&self) -> bool {
        self.nodes.len() == self.chain.len()
    }

    /// Nodes of the placed functions
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Node of the last placed function
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Resources consumed by this prefix
    pub fn delta(&self) -> &ResourceDelta {
        &self.delta
    }

    /// The state of `base` after reserving the resources of this prefix
    pub fn view<'a, V: ResourceView>(&'a self, base: &'a V) -> Overlay<'a, V> {
        self.delta.over(base)
    }

    /// Place the next function on `node`. If `path` is given, it is used for the link from the
    /// previous function to this one.
    pub fn append(&mut self, node: NodeId, path: Option<Path>) -> Result<(), Error> {
        let idx = self.nodes.len();
        let function = self
            .chain
            .functions()
            .get(idx)
            .ok_or_else(|| DomainError::InvalidFunctionIndex(self.chain.name.clone(), idx))?;
        self.delta.reserve_node(node, function.cores, function.memory)?;
        self.nodes.push(node);

        if let (Some(path), Some(prev)) = (path, idx.checked_sub(1)) {
            let bandwidth = self.chain.link(prev, idx).map(|l| l.bandwidth).unwrap_or(0);
            for (u, v) in path.iter() {
                self.delta.reserve_link(*u, *v, bandwidth)?;
            }
            self.links.insert((prev, idx), path);
        }
        Ok(())
    }

    /// Returns a copy of this prefix, extended by one function.
    pub fn extended(&self, node: NodeId, path: Option<Path>) -> Result<Self, Error> {
        let mut next = self.clone();
        next.append(node, path)?;
        Ok(next)
    }

    /// Turn the complete prefix into a [`Placement`]. Links of the chain that do not connect two
    /// consecutive functions are routed now, on top of `base` and everything reserved so far.
    /// Returns `Ok(None)` if such a link cannot be routed.
    pub fn into_placement<V: ResourceView>(mut self, base: &V) -> Result<Option<Placement>, Error> {
        let pending: Vec<((usize, usize), i64)> = self
            .chain
            .links()
            .iter()
            .filter(|(key, _)| !self.links.contains_key(*key))
            .map(|(key, link)| (*key, link.bandwidth))
            .collect();

        for ((s, d), bandwidth) in pending {
            let (src, dst) = match (self.nodes.get(s), self.nodes.get(d)) {
                (Some(src), Some(dst)) => (*src, *dst),
                _ => break,
            };
            let path = match self.delta.over(base).path(src, dst, bandwidth, None)? {
                Some(path) => path,
                None => return Ok(None),
            };
            for (u, v) in path.iter() {
                self.delta.reserve_link(*u, *v, bandwidth)?;
            }
            self.links.insert((s, d), path);
        }

        Ok(Some(Placement::new(self.chain, self.nodes, self.links)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Type;
    use crate::topology::{Link, Node, Topology};

    #[test]
    fn append_reserves_in_delta() {
        let mut topo = Topology::new();
        let s1 = topo.add_node("s1", Node::new(4, 4)).unwrap();
        let s2 = topo.add_node("s2", Node::new(4, 4)).unwrap();
        topo.add_link(s1, s2, Link::new(10)).unwrap();
        topo.add_link(s2, s1, Link::new(10)).unwrap();
        let chain = Arc::new(
            Chain::new("ch-0", 10)
                .with_function(Type::new("a", 1, 2))
                .with_function(Type::new("b", 3, 1))
                .with_function(Type::new("c", 1, 1))
                .with_link(0, 1, Link::new(4))
                .unwrap()
                .with_link(1, 2, Link::new(4))
                .unwrap()
                .with_link(2, 0, Link::new(6))
                .unwrap(),
        );

        let mut pp = PartialPlacement::new(chain.clone());
        pp.append(s1, None).unwrap();
        let next = pp.extended(s2, Some(vec![(s1, s2)])).unwrap();
        assert_eq!(pp.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.last(), Some(s2));

        let view = next.view(&topo);
        assert_eq!(view.cores(s1), Ok(3));
        assert_eq!(view.memory(s1), Ok(2));
        assert_eq!(view.cores(s2), Ok(1));
        assert_eq!(view.bandwidth(s1, s2), Ok(6));
        // the base topology is never touched
        assert_eq!(topo.cores(s2), Ok(4));

        let full = next.extended(s2, Some(vec![])).unwrap();
        assert!(full.is_complete());
        let placement = full.into_placement(&topo).unwrap().unwrap();
        assert_eq!(placement.nodes(), &[s1, s2, s2]);
        assert_eq!(placement.links()[&(2, 0)], vec![(s2, s1)]);

        // too many functions
        let mut overfull = PartialPlacement::new(chain.clone());
        for _ in 0..3 {
            overfull.append(s1, None).unwrap();
        }
        assert!(overfull.append(s1, None).is_err());
    }

    #[test]
    fn unroutable_link() {
        let mut topo = Topology::new();
        let s1 = topo.add_node("s1", Node::new(4, 4)).unwrap();
        let s2 = topo.add_node("s2", Node::new(4, 4)).unwrap();
        topo.add_link(s1, s2, Link::new(10)).unwrap();
        let chain = Arc::new(
            Chain::new("ch-0", 10)
                .with_function(Type::new("a", 1, 1))
                .with_function(Type::new("b", 1, 1))
                .with_link(1, 0, Link::new(1))
                .unwrap(),
        );
        let mut pp = PartialPlacement::new(chain);
        pp.append(s1, None).unwrap();
        pp.append(s2, None).unwrap();
        assert_eq!(pp.into_placement(&topo), Ok(None));
    }
}
