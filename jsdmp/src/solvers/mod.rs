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

//! # Solvers
//!
//! This module contains the [`Solver`] trait, and all algorithms implementing it. Every solver
//! owns a [`SolverState`], containing its private working copy of the topology, the number of
//! functions managed by each node, and the cached solution.
//!
//! ## Solvers
//!
//! - **[`Bari`]**: Places every chain optimally (with respect to a [`PlacementCost`]) using a
//!   multi-stage shortest path search over all nodes, and then chooses the manager which opens
//!   the least number of new license blocks. The evaluation of all candidate nodes of one stage
//!   runs on a scoped pool of worker threads.
//!
//!   *Type Arguments*: The cost function `C`, by default the [`ManagerAwareCost`].
//!
//! - **[`Abu`]**: Reserves manager resources on eligible nodes before placing all chains with the
//!   routine of `Bari`. Then, it prefers a manager on one of the nodes of the chain itself. After
//!   the first pass, a randomized local search moves managers around, as long as the total license
//!   cost does not increase.
//!
//! - **[`Oabu`]**: Same as `Abu`, but if no node of the chain can act as a manager, it probes up to
//!   `n_iter` random nodes instead of searching greedily.
//!
//! - **[`RandomSolver`]**: Places every function on a random compatible node, and chooses a random
//!   manager. This solver exists mainly for evaluation purpose.
//!
//! - **[`Rari`]**: Places a share of the chains using the random solver, and the rest using the
//!   routine of `Bari`. Afterwards, it runs the same local search as `Abu`.

mod abu;
mod bari;
mod cost;
mod local_search;
mod random;
mod rari;
mod state;

pub use abu::{Abu, Oabu};
pub use bari::Bari;
pub use cost::{HopCountCost, ManagerAwareCost, PlacementCost, NO_MANAGER_PENALTY};
pub use random::RandomSolver;
pub use rari::Rari;
pub use state::SolverState;

use crate::domain::Config;
use crate::placement::Deployment;
use crate::Error;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;

/// Interface for all solvers
pub trait Solver {
    /// Create the solver. The topology of the configuration is cloned into the private state of
    /// the solver, the configuration itself is never modified.
    fn new(config: &Config, options: SolverOptions) -> Result<Box<Self>, Error>
    where
        Self: Sized;

    /// Name of the algorithm
    fn name(&self) -> &'static str;

    /// Shared state of the solver
    fn state(&self) -> &SolverState;

    /// Mutable access to the shared state of the solver
    fn state_mut(&mut self) -> &mut SolverState;

    /// Main function computing the solution. Use [`Solver::solve`] instead, which calls this
    /// function only once.
    fn work(&mut self) -> Result<Vec<Deployment>, Error>;

    /// Compute the solution (only once) and return it. Subsequent calls return the cached
    /// solution.
    fn solve(&mut self) -> Result<&[Deployment], Error> {
        if self.state().solution().is_none() {
            let solution = self.work()?;
            self.state_mut().set_solution(solution);
        }
        Ok(self.state().solution().unwrap_or(&[]))
    }

    /// The cached solution, if already solved
    fn solution(&self) -> Option<&[Deployment]> {
        self.state().solution()
    }

    /// Total license cost of the current managers
    fn cost(&self) -> i64 {
        self.state().cost()
    }

    /// Sum of the fees of all managed chains in the solution
    fn profit(&self) -> i64 {
        self.state().profit()
    }
}

/// Tuning knobs of a single solver instance
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Number of local search iterations (and random probes of `Oabu`)
    pub n_iter: usize,
    /// Percentage (0 to 100) of eligible nodes on which `Abu` reserves manager resources
    pub reserve_percentage: usize,
    /// Number of worker threads for the placement search. `None` uses all cores.
    pub threads: Option<usize>,
    /// Seed of the random number generator. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Share of chains which `Rari` places randomly
    pub random_share: f64,
    /// Whether `Rari` runs the local search after placing all chains
    pub local_search: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            n_iter: 1000,
            reserve_percentage: 100,
            threads: None,
            seed: None,
            random_share: 0.5,
            local_search: true,
        }
    }
}

impl SolverOptions {
    /// Random number generator according to the seed
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Number of worker threads (at least one)
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// All available solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// [`Bari`]
    Bari,
    /// [`Abu`]
    Abu,
    /// [`Oabu`]
    Oabu,
    /// [`Rari`]
    Rari,
    /// [`RandomSolver`]
    Random,
}

impl SolverKind {
    /// All solvers, in a fixed order
    pub const ALL: [SolverKind; 5] =
        [SolverKind::Bari, SolverKind::Abu, SolverKind::Oabu, SolverKind::Rari, SolverKind::Random];

    /// Create the chosen solver
    pub fn build(
        &self,
        config: &Config,
        options: SolverOptions,
    ) -> Result<Box<dyn Solver + Send>, Error> {
        let solver: Box<dyn Solver + Send> = match self {
            Self::Bari => Bari::<ManagerAwareCost>::new(config, options)?,
            Self::Abu => Abu::new(config, options)?,
            Self::Oabu => Oabu::new(config, options)?,
            Self::Rari => Rari::new(config, options)?,
            Self::Random => RandomSolver::new(config, options)?,
        };
        Ok(solver)
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bari => write!(f, "bari"),
            Self::Abu => write!(f, "abu"),
            Self::Oabu => write!(f, "oabu"),
            Self::Rari => write!(f, "rari"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bari" => Ok(Self::Bari),
            "abu" => Ok(Self::Abu),
            "oabu" => Ok(Self::Oabu),
            "rari" => Ok(Self::Rari),
            "random" => Ok(Self::Random),
            _ => Err(Error::UnknownSolver(s.to_string())),
        }
    }
}
