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

//! # Abu and Oabu
//!
//! Both solvers place all chains first (using the placement routine of Bari) while keeping the
//! manager resources reserved on a share of the eligible nodes. Only then, the managers are
//! chosen, preferring the nodes of the chain itself. Finally, a local search moves managers
//! around to reduce the license cost.

use super::bari::place_chain;
use super::local_search::improve_managers;
use super::{ManagerAwareCost, Solver, SolverOptions, SolverState};
use crate::domain::Config;
use crate::placement::{Deployment, ManagementPlacement, Placement};
use crate::topology::{NodeId, Reservable};
use crate::Error;

use itertools::Itertools;
use log::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// What to do if no node of the chain itself can act as a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    /// Search all nodes for the least number of new license blocks
    Greedy,
    /// Probe up to `n_iter` random nodes outside of the chain
    RandomProbe,
}

/// # Abu
///
/// 1. Reserve the manager resources on `reserve_percentage` percent of all nodes whose cores and
///    memory exceed the manager template (chosen at random).
/// 2. Place every chain with the placement routine of [`Bari`](super::Bari), and release the
///    reservations again.
/// 3. For every placed chain, choose the manager on one of its own nodes. If none qualifies, take
///    the node which opens the least number of new license blocks. Chains without manager are
///    removed again.
/// 4. Improve the managers with `n_iter` iterations of local search.
pub struct Abu {
    state: SolverState,
    options: SolverOptions,
    rng: StdRng,
    cost: ManagerAwareCost,
    fallback: Fallback,
}

impl Abu {
    fn with_fallback(config: &Config, options: SolverOptions, fallback: Fallback) -> Self {
        let rng = options.rng();
        Self { state: SolverState::new(config), options, rng, cost: ManagerAwareCost, fallback }
    }

    /// Reserve the manager resources on a random share of the eligible nodes, and return them.
    fn reserve_managers(&mut self) -> Result<Vec<NodeId>, Error> {
        let vnfm = *self.state.vnfm();
        let topo = self.state.topology();
        let eligible: Vec<NodeId> = topo
            .nodes()
            .filter(|n| {
                topo.node(*n).map(|x| x.cores > vnfm.cores && x.memory > vnfm.memory).unwrap_or(false)
            })
            .collect();
        let amount = (eligible.len() * self.options.reserve_percentage.min(100) + 99) / 100;
        let reserved: Vec<NodeId> =
            eligible.choose_multiple(&mut self.rng, amount).copied().collect();

        for n in reserved.iter() {
            self.state.topology_mut().reserve_node(*n, vnfm.cores, vnfm.memory)?;
        }
        debug!("Reserved manager resources on {} of {} eligible nodes", amount, eligible.len());
        Ok(reserved)
    }

    fn release_managers(&mut self, reserved: &[NodeId]) -> Result<(), Error> {
        let vnfm = *self.state.vnfm();
        for n in reserved {
            self.state.topology_mut().reserve_node(*n, -vnfm.cores, -vnfm.memory)?;
        }
        Ok(())
    }

    /// Choose the manager of an already reserved placement.
    fn first_manager(&mut self, placement: &Placement) -> Result<Option<ManagementPlacement>, Error> {
        let members = placement.manageable_nodes();
        let own: Vec<NodeId> = members.iter().copied().unique().collect();

        let topo = self.state.topology();
        for candidate in own {
            if let Some(mp) = self.state.try_manager(topo, placement, candidate)? {
                return Ok(Some(mp));
            }
        }

        match self.fallback {
            Fallback::Greedy => self.state.best_manager(topo, placement),
            Fallback::RandomProbe => {
                let others: Vec<NodeId> = topo.nodes().filter(|n| !members.contains(n)).collect();
                for _ in 0..self.options.n_iter {
                    let candidate = match others.choose(&mut self.rng) {
                        Some(n) => *n,
                        None => break,
                    };
                    if let Some(mp) = self.state.try_manager(topo, placement, candidate)? {
                        return Ok(Some(mp));
                    }
                }
                Ok(None)
            }
        }
    }

    fn run(&mut self) -> Result<Vec<Deployment>, Error> {
        let threads = self.options.num_threads();

        let reserved = self.reserve_managers()?;
        let mut placed: Vec<Placement> = Vec::new();
        for chain in self.state.chains().to_vec() {
            info!("Placement of {} started", chain.name);
            match place_chain(&self.state, &chain, &self.cost, threads)? {
                Some(p) => {
                    info!("VNF placement of {} was successful", chain.name);
                    p.apply_on_topology(self.state.topology_mut())?;
                    placed.push(p);
                }
                None => info!("VNF placement of {} failed", chain.name),
            }
        }
        self.release_managers(&reserved)?;

        // chains without manager are only released after all managers are chosen
        let mut solution = Vec::with_capacity(placed.len());
        let mut unmanaged = Vec::new();
        for p in placed {
            match self.first_manager(&p)? {
                Some(mp) => {
                    self.state.commit_management(&mp)?;
                    solution.push(Deployment::Managed(p, mp));
                }
                None => {
                    info!("No manager found for {}", p.chain().name);
                    unmanaged.push(p);
                }
            }
        }
        for p in unmanaged {
            p.revert_on_topology(self.state.topology_mut())?;
        }

        improve_managers(&mut self.state, &mut solution, self.options.n_iter, &mut self.rng)?;
        Ok(solution)
    }
}

impl Solver for Abu {
    fn new(config: &Config, options: SolverOptions) -> Result<Box<Self>, Error> {
        Ok(Box::new(Self::with_fallback(config, options, Fallback::Greedy)))
    }

    fn name(&self) -> &'static str {
        "abu"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn work(&mut self) -> Result<Vec<Deployment>, Error> {
        self.run()
    }
}

/// # Oabu
///
/// Same as [`Abu`], but if no node of the chain itself can act as a manager, up to `n_iter`
/// random nodes outside of the chain are probed instead.
pub struct Oabu(Abu);

impl Solver for Oabu {
    fn new(config: &Config, options: SolverOptions) -> Result<Box<Self>, Error> {
        Ok(Box::new(Self(Abu::with_fallback(config, options, Fallback::RandomProbe))))
    }

    fn name(&self) -> &'static str {
        "oabu"
    }

    fn state(&self) -> &SolverState {
        &self.0.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.0.state
    }

    fn work(&mut self) -> Result<Vec<Deployment>, Error> {
        self.0.run()
    }
}
