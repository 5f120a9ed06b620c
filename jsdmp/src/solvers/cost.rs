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

//! Cost functions guiding the placement search

use super::SolverState;
use crate::domain::Type;
use crate::topology::{Link, NodeId, ResourceView, TopologyError};

use std::collections::HashSet;

/// Penalty added by [`ManagerAwareCost`] for nodes which could not host a manager.
pub const NO_MANAGER_PENALTY: i64 = 10;

/// Cost of placing `function` on `current`, coming from `previous`. The search minimizes the sum
/// of these costs over the entire chain. The cost is only evaluated if the placement is feasible.
pub trait PlacementCost: Sync {
    /// Compute the cost of the step
    fn cost<V: ResourceView>(
        &self,
        state: &SolverState,
        view: &V,
        previous: Option<NodeId>,
        current: NodeId,
        function: &Type,
        link: Option<&Link>,
    ) -> Result<i64, TopologyError>;
}

/// Number of hops between the previous and the current node.
#[derive(Debug, Clone, Copy, Default)]
pub struct HopCountCost;

impl PlacementCost for HopCountCost {
    fn cost<V: ResourceView>(
        &self,
        _state: &SolverState,
        view: &V,
        previous: Option<NodeId>,
        current: NodeId,
        _function: &Type,
        link: Option<&Link>,
    ) -> Result<i64, TopologyError> {
        hops(view, previous, current, link)
    }
}

/// # Manager Aware Cost
///
/// Sum of
/// - the number of hops between the previous and the current node,
/// - the number of nodes forbidden as manager by the previous or the current node, and
/// - [`NO_MANAGER_PENALTY`], if the current node has not enough resources to host a manager.
///
/// This biases the search towards placements which can still be managed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerAwareCost;

impl PlacementCost for ManagerAwareCost {
    fn cost<V: ResourceView>(
        &self,
        state: &SolverState,
        view: &V,
        previous: Option<NodeId>,
        current: NodeId,
        _function: &Type,
        link: Option<&Link>,
    ) -> Result<i64, TopologyError> {
        let topo = view.topology();
        let node = topo.node(current)?;

        let mut forbidden: HashSet<NodeId> = node.not_manager_nodes.clone();
        if let Some(previous) = previous {
            forbidden.extend(topo.node(previous)?.not_manager_nodes.iter().copied());
        }

        let vnfm = state.vnfm();
        let penalty = if node.cores < vnfm.cores || node.memory < vnfm.memory {
            NO_MANAGER_PENALTY
        } else {
            0
        };

        Ok(hops(view, previous, current, link)? + forbidden.len() as i64 + penalty)
    }
}

fn hops<V: ResourceView>(
    view: &V,
    previous: Option<NodeId>,
    current: NodeId,
    link: Option<&Link>,
) -> Result<i64, TopologyError> {
    match (previous, link) {
        (Some(previous), Some(link)) => Ok(view
            .path(previous, current, link.bandwidth, None)?
            .map(|p| p.len() as i64)
            .unwrap_or(0)),
        _ => Ok(0),
    }
}
