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

//! # Rari
//!
//! Hybrid of the random solver and Bari.

use super::bari::place_and_manage;
use super::local_search::improve_managers;
use super::random::place_random;
use super::{ManagerAwareCost, Solver, SolverOptions, SolverState};
use crate::domain::Config;
use crate::placement::Deployment;
use crate::Error;

use log::*;
use rand::rngs::StdRng;

/// # Rari
///
/// The first `random_share` of the chains is placed randomly (like the
/// [`RandomSolver`](super::RandomSolver)). All chains not placed this way are placed with the
/// routine of [`Bari`](super::Bari), on top of the random placements. Finally, if `local_search`
/// is enabled, the managers are improved like in [`Abu`](super::Abu).
pub struct Rari {
    state: SolverState,
    options: SolverOptions,
    rng: StdRng,
    cost: ManagerAwareCost,
}

impl Solver for Rari {
    fn new(config: &Config, options: SolverOptions) -> Result<Box<Self>, Error> {
        let rng = options.rng();
        Ok(Box::new(Self { state: SolverState::new(config), options, rng, cost: ManagerAwareCost }))
    }

    fn name(&self) -> &'static str {
        "rari"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn work(&mut self) -> Result<Vec<Deployment>, Error> {
        let chains = self.state.chains().to_vec();
        let share = self.options.random_share.max(0.0).min(1.0);
        let split = ((chains.len() as f64 * share).ceil() as usize).min(chains.len());

        let mut solution = Vec::new();
        let mut remaining = Vec::new();
        for chain in chains[..split].iter() {
            match place_random(&mut self.state, chain, &mut self.rng)? {
                Some(d) => solution.push(d),
                None => remaining.push(chain.clone()),
            }
        }
        info!("Random placed {} of {} chains", solution.len(), split);

        remaining.extend(chains[split..].iter().cloned());
        let threads = self.options.num_threads();
        let before = solution.len();
        for chain in remaining.iter() {
            solution.extend(place_and_manage(&mut self.state, chain, &self.cost, threads)?);
        }
        info!("Bari placed {} of the remaining {} chains", solution.len() - before, remaining.len());

        if self.options.local_search {
            improve_managers(&mut self.state, &mut solution, self.options.n_iter, &mut self.rng)?;
        }
        Ok(solution)
    }
}
