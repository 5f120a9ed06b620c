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


//! # JSD-MP Bencher
//!
//! This library repeats the solvers on a single problem instance, possibly in parallel, and
//! collects profit, cost and running time of every run.
#![deny(missing_docs)]

mod runner;
mod utils;

pub use runner::bench;
pub use utils::{export_result, summary};

use jsdmp::solvers::{SolverKind, SolverOptions};

use clap::Args;
use serde::Serialize;

/// Arguments required for the bencher
#[derive(Args, Debug, Clone)]
pub struct BencherArguments {
    /// Solvers to run. Can be given multiple times, or as a comma-separated list.
    #[arg(short = 's', long = "solver", value_delimiter = ',', default_value = "bari")]
    pub solvers: Vec<SolverKind>,
    /// Number of runs per solver. Multiple runs only make sense for randomized solvers.
    #[arg(short = 'r', long, default_value = "1")]
    pub runs: usize,
    /// Number of runs executed in parallel. Defaults to the number of threads available on the
    /// system.
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
    /// Output file to store every run in csv format. Give the entire path, including the csv
    /// ending.
    #[arg(long = "csv")]
    pub output_csv: Option<String>,
    /// Output file to store the results in json format. Give the entire path, including the json
    /// ending.
    #[arg(long = "json")]
    pub output_json: Option<String>,
    /// Options passed to every solver
    #[command(flatten)]
    pub solver: SolverArguments,
}

/// Tuning knobs of the solvers, as command-line arguments
#[derive(Args, Debug, Clone)]
pub struct SolverArguments {
    /// Number of local search iterations, and of random manager probes of oabu
    #[arg(long, default_value = "1000")]
    pub n_iter: usize,
    /// Percentage of eligible nodes on which abu reserves manager resources in advance
    #[arg(long = "reserve", default_value = "100")]
    pub reserve_percentage: usize,
    /// Number of threads used by the placement search of a single run
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
    /// Random seed. Run `i` uses `seed + i`, which makes every run reproducible.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Share of chains which rari places randomly
    #[arg(long, default_value = "0.5")]
    pub random_share: f64,
    /// Skip the local search of rari
    #[arg(long)]
    pub no_local_search: bool,
}

impl SolverArguments {
    /// Solver options for the given run
    pub fn options(&self, run: usize) -> SolverOptions {
        SolverOptions {
            n_iter: self.n_iter,
            reserve_percentage: self.reserve_percentage,
            threads: self.threads,
            seed: self.seed.map(|s| s.wrapping_add(run as u64)),
            random_share: self.random_share,
            local_search: !self.no_local_search,
        }
    }
}

impl Default for SolverArguments {
    fn default() -> Self {
        let options = SolverOptions::default();
        Self {
            n_iter: options.n_iter,
            reserve_percentage: options.reserve_percentage,
            threads: options.threads,
            seed: options.seed,
            random_share: options.random_share,
            no_local_search: !options.local_search,
        }
    }
}

/// Result type that contains the entire output
#[derive(Debug, Clone, Serialize)]
pub struct BencherResult {
    /// String describing the scenario
    pub scenario: String,
    /// Number of nodes in the network
    pub num_nodes: usize,
    /// Number of directed links in the network
    pub num_links: usize,
    /// Number of requested chains
    pub num_chains: usize,
    /// Runs of every solver, in the order of the arguments
    pub results: Vec<SolverResult>,
}

/// All runs of a single solver
#[derive(Debug, Clone, Serialize)]
pub struct SolverResult {
    /// Name of the solver
    pub solver: String,
    /// Successful runs, ordered by run index
    pub runs: Vec<Run>,
    /// Number of runs which failed with an error
    pub failed: usize,
}

/// Result of a single run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// Index of the run
    pub run: usize,
    /// Name of the solver
    pub solver: String,
    /// Running time, measured in seconds
    pub elapsed_time: f64,
    /// Sum of the fees of all managed chains
    pub profit: i64,
    /// Total license cost of all managers
    pub cost: i64,
    /// Number of requested chains
    pub number_of_chains: usize,
    /// Number of chains in the solution
    pub number_of_placed_chains: usize,
}
