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

//! Shared state and bookkeeping of all solvers

use crate::domain::{Chain, Config, Type, Vnfm};
use crate::placement::{Deployment, ManagementPlacement, Placement};
use crate::topology::{
    Link, NodeId, Reservable, ResourceDelta, ResourceView, Topology, TopologyError,
};
use crate::Error;

use log::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// # Solver State
///
/// Everything a solver owns: the requested chains, the manager template, the working copy of the
/// topology, the number of functions managed by every node, and the solution once it is computed.
///
/// The license blocks of a node always have their manager resources reserved on the working
/// topology, i.e., a node managing `l` functions holds `blocks(l)` times the cores and memory of
/// the manager template.
#[derive(Debug, Clone)]
pub struct SolverState {
    chains: Vec<Arc<Chain>>,
    vnfm: Vnfm,
    topology: Topology,
    manage_by_node: HashMap<NodeId, usize>,
    solution: Option<Vec<Deployment>>,
}

impl SolverState {
    /// Create the state, cloning the topology of the configuration
    pub fn new(config: &Config) -> Self {
        Self {
            chains: config.chains.clone(),
            vnfm: config.vnfm,
            topology: config.topology.clone(),
            manage_by_node: HashMap::new(),
            solution: None,
        }
    }

    /// Requested chains
    pub fn chains(&self) -> &[Arc<Chain>] {
        &self.chains
    }

    /// Manager template
    pub fn vnfm(&self) -> &Vnfm {
        &self.vnfm
    }

    /// Working copy of the topology
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub(crate) fn topology_mut(&mut self) -> &mut Topology {
        &mut self.topology
    }

    /// Number of functions managed by each node
    pub fn manage_by_node(&self) -> &HashMap<NodeId, usize> {
        &self.manage_by_node
    }

    /// Number of functions managed by the node
    pub fn load(&self, node: NodeId) -> usize {
        self.manage_by_node.get(&node).copied().unwrap_or(0)
    }

    /// The solution, if already computed
    pub fn solution(&self) -> Option<&[Deployment]> {
        self.solution.as_deref()
    }

    pub(crate) fn set_solution(&mut self, solution: Vec<Deployment>) {
        self.solution = Some(solution);
    }

    /// Total license cost: one license for every started block of `capacity` functions on every
    /// node.
    pub fn cost(&self) -> i64 {
        let blocks: usize = self.manage_by_node.values().map(|l| self.vnfm.blocks(*l)).sum();
        self.vnfm.license_cost * blocks as i64
    }

    /// Sum of the fees of all managed chains in the solution. Unmanaged chains earn nothing.
    pub fn profit(&self) -> i64 {
        self.solution
            .iter()
            .flatten()
            .filter(|d| d.is_managed())
            .map(|d| d.chain().fee)
            .sum()
    }

    /// Check if `function` can be placed on `current`. The node needs enough cores and memory,
    /// must support network functions, and its role must be compatible with the function. If both
    /// `previous` and `link` are given, there must be a path from the previous node with enough
    /// bandwidth (and at most `radius` hops, if given).
    pub fn is_resource_available<V: ResourceView>(
        &self,
        view: &V,
        previous: Option<NodeId>,
        current: NodeId,
        function: &Type,
        link: Option<&Link>,
        radius: Option<usize>,
    ) -> Result<bool, TopologyError> {
        let node = view.topology().node(current)?;
        if view.cores(current)? < function.cores || view.memory(current)? < function.memory {
            return Ok(false);
        }
        if !node.vnf_support || !node.direction.supports(function.direction) {
            return Ok(false);
        }
        if let (Some(previous), Some(link)) = (previous, link) {
            return Ok(view.path(previous, current, link.bandwidth, radius)?.is_some());
        }
        Ok(true)
    }

    /// Number of new license blocks opened on `candidate`, if it would additionally manage one
    /// function on each of the `members` nodes.
    pub fn get_management_cost(&self, candidate: NodeId, members: &[NodeId]) -> i64 {
        let load = self.load(candidate);
        self.vnfm.blocks(load + members.len()) as i64 - self.vnfm.blocks(load) as i64
    }

    /// Check if `candidate` can manage one function on each of the `members` nodes. Manager
    /// resources are only required if a new license block must be opened. Every member must be
    /// reachable within the radius of the manager, and no member may forbid the candidate as its
    /// manager.
    pub fn is_management_resource_available<V: ResourceView>(
        &self,
        view: &V,
        candidate: NodeId,
        members: &[NodeId],
    ) -> Result<bool, TopologyError> {
        let new_blocks = self.get_management_cost(candidate, members);
        if new_blocks > 0
            && (view.cores(candidate)? < new_blocks * self.vnfm.cores
                || view.memory(candidate)? < new_blocks * self.vnfm.memory)
        {
            return Ok(false);
        }

        let reachable: HashSet<NodeId> = view
            .bfs(candidate, self.vnfm.bandwidth, Some(self.vnfm.radius))?
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        if !members.iter().all(|m| reachable.contains(m)) {
            return Ok(false);
        }

        let topo = view.topology();
        for m in members {
            if topo.node(*m)?.not_manager_nodes.contains(&candidate) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Compute the management paths from `candidate` to every member, one after the other, each
    /// one taking the bandwidth reserved by the previous ones into account. Returns `Ok(None)` if
    /// one of the members cannot be reached within the radius.
    pub fn plan_management<V: ResourceView>(
        &self,
        view: &V,
        chain: &Arc<Chain>,
        candidate: NodeId,
        members: &[NodeId],
    ) -> Result<Option<ManagementPlacement>, Error> {
        let mut delta = ResourceDelta::new();
        let mut paths = Vec::with_capacity(members.len());
        for member in members {
            let path = match delta.over(view).path(
                candidate,
                *member,
                self.vnfm.bandwidth,
                Some(self.vnfm.radius),
            )? {
                Some(path) => path,
                None => return Ok(None),
            };
            for (u, v) in path.iter() {
                delta.reserve_link(*u, *v, self.vnfm.bandwidth)?;
            }
            paths.push(path);
        }
        let blocks = self.get_management_cost(candidate, members).max(0) as usize;
        Ok(Some(ManagementPlacement::new(chain.clone(), self.vnfm, candidate, paths, blocks)?))
    }

    /// Check the candidate and plan its management paths.
    pub fn try_manager<V: ResourceView>(
        &self,
        view: &V,
        placement: &Placement,
        candidate: NodeId,
    ) -> Result<Option<ManagementPlacement>, Error> {
        let members = placement.manageable_nodes();
        if !self.is_management_resource_available(view, candidate, &members)? {
            return Ok(None);
        }
        self.plan_management(view, placement.chain(), candidate, &members)
    }

    /// Search every node for the manager which opens the least number of new license blocks. On
    /// a tie, the first node (in insertion order) wins.
    pub fn best_manager<V: ResourceView>(
        &self,
        view: &V,
        placement: &Placement,
    ) -> Result<Option<ManagementPlacement>, Error> {
        let members = placement.manageable_nodes();
        let mut best: Option<(i64, ManagementPlacement)> = None;
        for candidate in view.topology().nodes() {
            if !self.is_management_resource_available(view, candidate, &members)? {
                continue;
            }
            let cost = self.get_management_cost(candidate, &members);
            if best.as_ref().map(|(c, _)| cost < *c).unwrap_or(true) {
                if let Some(mp) = self.plan_management(view, placement.chain(), candidate, &members)? {
                    best = Some((cost, mp));
                }
            }
        }
        if let Some((cost, mp)) = best.as_ref() {
            debug!(
                "Manager of {} on {} opens {} new license blocks",
                placement.chain().name,
                self.topology.get_node_name(mp.management_node())?,
                cost
            );
        }
        Ok(best.map(|(_, mp)| mp))
    }

    /// Reserve the placement and its manager on the working topology, and return the deployment.
    pub fn commit(
        &mut self,
        placement: Placement,
        management: ManagementPlacement,
    ) -> Result<Deployment, Error> {
        placement.apply_on_topology(&mut self.topology)?;
        self.commit_management(&management)?;
        Ok(Deployment::Managed(placement, management))
    }

    /// Reserve the manager on the working topology, and account for the managed functions.
    pub fn commit_management(&mut self, management: &ManagementPlacement) -> Result<(), Error> {
        let node = management.management_node();
        let added = management.chain().num_manageable();
        let load = self.load(node);
        let opened = self.vnfm.blocks(load + added) as i64 - self.vnfm.blocks(load) as i64;

        management.apply_on_topology(&mut self.topology)?;
        self.correct_blocks(node, opened - management.blocks() as i64)?;
        *self.manage_by_node.entry(node).or_insert(0) += added;
        Ok(())
    }

    /// Release the manager from the working topology, undoing [`SolverState::commit_management`].
    pub fn release_management(&mut self, management: &ManagementPlacement) -> Result<(), Error> {
        let node = management.management_node();
        let removed = management.chain().num_manageable();
        let load = self.load(node);
        let remaining = load.saturating_sub(removed);
        let closed = self.vnfm.blocks(load) as i64 - self.vnfm.blocks(remaining) as i64;

        management.revert_on_topology(&mut self.topology)?;
        self.correct_blocks(node, management.blocks() as i64 - closed)?;
        if remaining == 0 {
            self.manage_by_node.remove(&node);
        } else {
            self.manage_by_node.insert(node, remaining);
        }
        Ok(())
    }

    /// Reserve the manager resources of `blocks` additional license blocks on the node (or
    /// release them, if negative).
    fn correct_blocks(&mut self, node: NodeId, blocks: i64) -> Result<(), TopologyError> {
        if blocks != 0 {
            self.topology.reserve_node(node, blocks * self.vnfm.cores, blocks * self.vnfm.memory)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::topology::Node;
    use maplit::{btreemap, hashmap};

    fn setup() -> (Config, Vec<NodeId>) {
        let mut topo = Topology::new();
        let s1 = topo.add_node("s1", Node::new(4, 4)).unwrap();
        let s2 = topo.add_node("s2", Node::new(4, 4).with_direction(Direction::Ingress)).unwrap();
        let s3 = topo.add_node("s3", Node::new(1, 1).with_vnf_support(false)).unwrap();
        let s4 = topo.add_node("s4", Node::new(4, 4).with_not_manager_nodes(vec![s1])).unwrap();
        for (a, b) in &[(s1, s2), (s2, s1), (s2, s3), (s3, s2), (s1, s4), (s4, s1)] {
            topo.add_link(*a, *b, Link::new(10)).unwrap();
        }
        let chain = Chain::new("ch-0", 100)
            .with_function(Type::new("a", 1, 1))
            .with_function(Type::new("b", 1, 1))
            .with_link(0, 1, Link::new(5))
            .unwrap();
        let vnfm = Vnfm::new(2, 2, 2, 1, 1, 10).unwrap();
        (Config::new(hashmap! {}, vec![chain], vnfm, topo), vec![s1, s2, s3, s4])
    }

    #[test]
    fn resource_availability() {
        let (config, n) = setup();
        let state = SolverState::new(&config);
        let topo = state.topology();
        let plain = Type::new("x", 2, 2);
        let ingress = Type::new("in", 0, 0).with_direction(Direction::Ingress);
        let link = Link::new(5);

        assert_eq!(state.is_resource_available(topo, None, n[0], &plain, None, None), Ok(true));
        assert_eq!(state.is_resource_available(topo, None, n[0], &ingress, None, None), Ok(false));
        assert_eq!(state.is_resource_available(topo, None, n[1], &ingress, None, None), Ok(true));
        // no vnf support, even with enough resources
        assert_eq!(
            state.is_resource_available(topo, None, n[2], &Type::new("t", 0, 0), None, None),
            Ok(false)
        );
        assert_eq!(
            state.is_resource_available(topo, Some(n[3]), n[1], &plain, Some(&link), None),
            Ok(true)
        );
        assert_eq!(
            state.is_resource_available(topo, Some(n[3]), n[1], &plain, Some(&link), Some(1)),
            Ok(false)
        );
        assert_eq!(
            state.is_resource_available(topo, Some(n[3]), n[1], &plain, Some(&Link::new(11)), None),
            Ok(false)
        );
        assert_eq!(
            state.is_resource_available(topo, None, n[0], &Type::new("big", 5, 1), None, None),
            Ok(false)
        );
    }

    #[test]
    fn management_availability() {
        let (config, n) = setup();
        let state = SolverState::new(&config);
        let topo = state.topology();

        // radius 1
        assert_eq!(state.is_management_resource_available(topo, n[0], &[n[0], n[1]]), Ok(true));
        assert_eq!(state.is_management_resource_available(topo, n[0], &[n[2]]), Ok(false));
        // s4 forbids s1 as its manager
        assert_eq!(state.is_management_resource_available(topo, n[0], &[n[3]]), Ok(false));
        assert_eq!(state.is_management_resource_available(topo, n[3], &[n[3]]), Ok(true));
        // s3 has not enough resources for a new block
        assert_eq!(state.is_management_resource_available(topo, n[2], &[n[2]]), Ok(false));
        assert_eq!(state.get_management_cost(n[0], &[n[0], n[1]]), 1);
        assert_eq!(state.get_management_cost(n[0], &[n[0], n[1], n[1]]), 2);
    }

    #[test]
    fn commit_and_release() {
        let (config, n) = setup();
        let mut state = SolverState::new(&config);
        let chain = state.chains()[0].clone();
        let placement = Placement::new(
            chain.clone(),
            vec![n[0], n[1]],
            btreemap! {(0, 1) => vec![(n[0], n[1])]},
        )
        .unwrap();

        let mp = state.best_manager(state.topology(), &placement).unwrap().unwrap();
        assert_eq!(mp.management_node(), n[0]);
        assert_eq!(mp.blocks(), 1);
        let deployment = state.commit(placement.clone(), mp.clone()).unwrap();
        assert!(deployment.is_managed());
        assert_eq!(state.load(n[0]), 2);
        assert_eq!(state.cost(), 10);
        // 1 core for the function, 2 for the manager
        assert_eq!(state.topology().node(n[0]).unwrap().cores, 1);
        // 5 for the chain, 1 for the management path
        assert_eq!(state.topology().link(n[0], n[1]).unwrap().bandwidth, 4);

        // one path per manageable function
        let other = ManagementPlacement::new(chain, *state.vnfm(), n[0], vec![vec![]], 0);
        assert!(other.is_err());

        state.release_management(&mp).unwrap();
        assert_eq!(state.load(n[0]), 0);
        assert_eq!(state.cost(), 0);
        assert_eq!(state.topology().node(n[0]).unwrap().cores, 3);
        assert_eq!(state.topology().link(n[0], n[1]).unwrap().bandwidth, 5);
    }

    #[test]
    fn release_out_of_order_keeps_blocks_reserved() {
        let (config, n) = setup();
        let mut state = SolverState::new(&config);
        let single = Arc::new(Chain::new("single", 10).with_function(Type::new("a", 0, 0)));
        let plan = |state: &SolverState| {
            state.plan_management(state.topology(), &single, n[0], &[n[0]]).unwrap().unwrap()
        };

        let first = plan(&state);
        assert_eq!(first.blocks(), 1);
        state.commit_management(&first).unwrap();
        let second = plan(&state);
        assert_eq!(second.blocks(), 0);
        state.commit_management(&second).unwrap();
        assert_eq!(state.topology().node(n[0]).unwrap().cores, 2);

        // the block stays open for the second chain
        state.release_management(&first).unwrap();
        assert_eq!(state.load(n[0]), 1);
        assert_eq!(state.topology().node(n[0]).unwrap().cores, 2);
        state.release_management(&second).unwrap();
        assert_eq!(state.topology().node(n[0]).unwrap().cores, 4);
        assert_eq!(state.cost(), 0);
    }
}
