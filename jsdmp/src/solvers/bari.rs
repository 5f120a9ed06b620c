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

//! # Bari
//!
//! Optimal placement of a single chain, as a multi-stage shortest path problem. Stage `i` holds,
//! for every node `j`, the cheapest partial placement of the first `i + 1` functions which puts
//! function `i` on `j`. It is computed from stage `i - 1` by choosing the cheapest feasible
//! predecessor `k`, where feasibility is checked against the state implied by the partial
//! placement ending at `k`. All candidates of one stage are evaluated in parallel.

use super::{ManagerAwareCost, PlacementCost, Solver, SolverOptions, SolverState};
use crate::domain::{Chain, Config, Type};
use crate::placement::{Deployment, PartialPlacement, Placement};
use crate::topology::{Link, NodeId, ResourceDelta, ResourceView};
use crate::Error;

use log::*;
use std::panic;
use std::sync::Arc;
use std::thread;

type Stage = Vec<Option<(i64, PartialPlacement)>>;

/// # Bari
///
/// Places every chain (in order) at minimum cost, using the cost function `C`, and assigns the
/// manager which opens the least number of new license blocks. Chains for which no placement or
/// no manager exists are skipped.
pub struct Bari<C = ManagerAwareCost> {
    state: SolverState,
    options: SolverOptions,
    cost: C,
}

impl<C: PlacementCost> Bari<C> {
    /// Create the solver with a specific cost function
    pub fn with_cost(config: &Config, options: SolverOptions, cost: C) -> Self {
        Self { state: SolverState::new(config), options, cost }
    }

    /// Compute the cheapest placement of the chain on the current working topology, without
    /// reserving anything.
    pub fn place(&self, chain: &Arc<Chain>) -> Result<Option<Placement>, Error> {
        place_chain(&self.state, chain, &self.cost, self.options.num_threads())
    }
}

impl<C: PlacementCost + Default + Send> Solver for Bari<C> {
    fn new(config: &Config, options: SolverOptions) -> Result<Box<Self>, Error> {
        Ok(Box::new(Self::with_cost(config, options, C::default())))
    }

    fn name(&self) -> &'static str {
        "bari"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn work(&mut self) -> Result<Vec<Deployment>, Error> {
        let threads = self.options.num_threads();
        let mut solution = Vec::new();
        for chain in self.state.chains().to_vec() {
            let deployment = place_and_manage(&mut self.state, &chain, &self.cost, threads)?;
            solution.extend(deployment);
        }
        Ok(solution)
    }
}

/// Place the chain, and choose the best manager on top of it. Both are only reserved on the
/// working topology if both were found.
pub(crate) fn place_and_manage<C: PlacementCost>(
    state: &mut SolverState,
    chain: &Arc<Chain>,
    cost: &C,
    threads: usize,
) -> Result<Option<Deployment>, Error> {
    info!("Placement of {} started", chain.name);
    let placement = match place_chain(state, chain, cost, threads)? {
        Some(p) => p,
        None => {
            info!("VNF placement of {} failed", chain.name);
            return Ok(None);
        }
    };

    let mut delta = ResourceDelta::new();
    placement.apply_on_topology(&mut delta)?;
    let manager = state.best_manager(&delta.over(state.topology()), &placement)?;

    match manager {
        Some(management) => {
            info!("Placement of {} was successful", chain.name);
            Ok(Some(state.commit(placement, management)?))
        }
        None => {
            info!("No manager found for {}", chain.name);
            Ok(None)
        }
    }
}

/// Compute the cheapest placement of the chain on the working topology of `state`. The
/// candidates of each stage are split among `threads` scoped worker threads.
pub(crate) fn place_chain<C: PlacementCost>(
    state: &SolverState,
    chain: &Arc<Chain>,
    cost: &C,
    threads: usize,
) -> Result<Option<Placement>, Error> {
    let topo = state.topology();
    let nodes: Vec<NodeId> = topo.nodes().collect();
    let functions = chain.functions();
    if nodes.is_empty() || functions.is_empty() {
        return Ok(None);
    }

    // ingress function
    let mut stage: Stage = Vec::with_capacity(nodes.len());
    for n in nodes.iter() {
        let entry = if state.is_resource_available(topo, None, *n, &functions[0], None, None)? {
            let c = cost.cost(state, topo, None, *n, &functions[0], None)?;
            Some((c, PartialPlacement::new(chain.clone()).extended(*n, None)?))
        } else {
            None
        };
        stage.push(entry);
    }

    // remaining functions
    let threads = threads.max(1);
    let chunk_size = ((nodes.len() + threads - 1) / threads).max(1);
    for (i, function) in functions.iter().enumerate().skip(1) {
        let link = chain.link(i - 1, i);
        let mut next: Stage = vec![None; nodes.len()];
        let prev = &stage;
        let all_nodes = &nodes;

        let results: Vec<Result<(), Error>> = thread::scope(|s| {
            let handles: Vec<_> = next
                .chunks_mut(chunk_size)
                .enumerate()
                .map(|(c, slots)| {
                    s.spawn(move || -> Result<(), Error> {
                        for (offset, slot) in slots.iter_mut().enumerate() {
                            let j = all_nodes[c * chunk_size + offset];
                            *slot = best_predecessor(state, prev, j, function, link, cost)?;
                        }
                        Ok(())
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });
        for result in results {
            result?;
        }

        trace!(
            "{}: {} candidates for function {}",
            chain.name,
            next.iter().filter(|e| e.is_some()).count(),
            i
        );
        stage = next;
    }

    // cheapest complete placement whose remaining links can be routed. The sort is stable, so
    // on a tie the first node wins.
    let mut complete: Vec<(i64, PartialPlacement)> =
        stage.into_iter().flatten().filter(|(_, pp)| pp.is_complete()).collect();
    complete.sort_by_key(|(c, _)| *c);
    for (c, pp) in complete {
        match pp.into_placement(topo)? {
            Some(placement) => return Ok(Some(placement)),
            None => trace!("{}: remaining links of a placement with cost {} fail", chain.name, c),
        }
    }
    Ok(None)
}

/// Choose the cheapest feasible predecessor of `current`, and extend its partial placement.
fn best_predecessor<C: PlacementCost>(
    state: &SolverState,
    prev: &[Option<(i64, PartialPlacement)>],
    current: NodeId,
    function: &Type,
    link: Option<&Link>,
    cost: &C,
) -> Result<Option<(i64, PartialPlacement)>, Error> {
    let topo = state.topology();
    let mut best: Option<(i64, &PartialPlacement)> = None;

    for (acc, pp) in prev.iter().flatten() {
        let previous = match pp.last() {
            Some(previous) => previous,
            None => continue,
        };
        let view = pp.view(topo);
        if !state.is_resource_available(&view, Some(previous), current, function, link, None)? {
            continue;
        }
        let c = acc + cost.cost(state, &view, Some(previous), current, function, link)?;
        if best.map(|(b, _)| c < b).unwrap_or(true) {
            best = Some((c, pp));
        }
    }

    let (c, pp) = match best {
        Some(best) => best,
        None => return Ok(None),
    };
    let path = match (pp.last(), link) {
        (Some(previous), Some(link)) => {
            match pp.view(topo).path(previous, current, link.bandwidth, None)? {
                Some(path) => Some(path),
                None => return Ok(None),
            }
        }
        _ => None,
    };
    Ok(Some((c, pp.extended(current, path)?)))
}
