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

//! # Random Solver
//!
//! Baseline which places every function on a random compatible node, and chooses a random
//! manager.

use super::{Solver, SolverOptions, SolverState};
use crate::domain::{Chain, Config};
use crate::placement::{Deployment, PartialPlacement};
use crate::topology::{NodeId, ResourceDelta, ResourceView};
use crate::Error;

use log::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// # Random Solver
///
/// For every function, a node is chosen uniformly among all nodes which have enough resources,
/// support network functions and have a compatible role. If the link from the previous function
/// cannot be routed, the chain is dropped. Then, the manager is chosen uniformly among all nodes
/// with enough resources for a manager, and dropped if it cannot reach all functions.
pub struct RandomSolver {
    state: SolverState,
    rng: StdRng,
}

impl Solver for RandomSolver {
    fn new(config: &Config, options: SolverOptions) -> Result<Box<Self>, Error> {
        Ok(Box::new(Self { state: SolverState::new(config), rng: options.rng() }))
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn work(&mut self) -> Result<Vec<Deployment>, Error> {
        let mut solution = Vec::new();
        for chain in self.state.chains().to_vec() {
            solution.extend(place_random(&mut self.state, &chain, &mut self.rng)?);
        }
        Ok(solution)
    }
}

/// Place the chain and its manager randomly, and reserve both on the working topology if
/// successful.
pub(crate) fn place_random<R: Rng>(
    state: &mut SolverState,
    chain: &Arc<Chain>,
    rng: &mut R,
) -> Result<Option<Deployment>, Error> {
    let topo = state.topology();
    let mut pp = PartialPlacement::new(chain.clone());

    for (i, function) in chain.functions().iter().enumerate() {
        let (node, path) = {
            let view = pp.view(topo);
            let mut candidates: Vec<NodeId> = Vec::new();
            for n in topo.nodes() {
                if state.is_resource_available(&view, None, n, function, None, None)? {
                    candidates.push(n);
                }
            }
            let node = match candidates.choose(rng) {
                Some(n) => *n,
                None => {
                    info!("Random placement of {} failed at function {}", chain.name, i);
                    return Ok(None);
                }
            };
            let link = i.checked_sub(1).and_then(|prev| chain.link(prev, i));
            let path = match (pp.last(), link) {
                (Some(previous), Some(link)) => {
                    match view.path(previous, node, link.bandwidth, None)? {
                        Some(path) => Some(path),
                        None => {
                            info!("Random placement of {} has no path to function {}", chain.name, i);
                            return Ok(None);
                        }
                    }
                }
                _ => None,
            };
            (node, path)
        };
        pp.append(node, path)?;
    }

    let placement = match pp.into_placement(topo)? {
        Some(p) => p,
        None => return Ok(None),
    };

    let vnfm = *state.vnfm();
    let mut delta = ResourceDelta::new();
    placement.apply_on_topology(&mut delta)?;
    let view = delta.over(topo);
    let mut qualified: Vec<NodeId> = Vec::new();
    for n in topo.nodes() {
        if topo.node(n)?.vnf_support
            && view.cores(n)? >= vnfm.cores
            && view.memory(n)? >= vnfm.memory
        {
            qualified.push(n);
        }
    }
    let manager = match qualified.choose(rng) {
        Some(n) => *n,
        None => return Ok(None),
    };
    let management = match state.try_manager(&view, &placement, manager)? {
        Some(mp) => mp,
        None => {
            info!("Random manager of {} cannot manage the chain", chain.name);
            return Ok(None);
        }
    };

    info!("Random placement of {} was successful", chain.name);
    Ok(Some(state.commit(placement, management)?))
}
