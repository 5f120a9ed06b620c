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

#![deny(missing_docs)]

//! # JSD-MP: Joint Service Deployment and Manager Placement
//! This is a library for placing service chains of virtual network functions onto a physical
//! network, while at the same time choosing, for every chain, a manager node which can reach all
//! of its manageable functions.
//!
//! ## Problem Statement
//! Given
//! - a directed topology, where each node has cores and memory, and each link has bandwidth,
//! - a list of service chains, each with an ordered list of functions and bandwidth demands,
//! - a manager template, with its resource demand, licensing capacity and reachability radius,
//!
//! map every function to a node and every bandwidth demand to a path, and choose a manager node
//! for each chain, such that no resource is overbooked, and the profit of all managed chains is
//! maximized while the license cost is minimized.
//!
//! ## Structure
//!
//! - **[`Topology`](topology)**: The resource graph, with the bandwidth and hop constrained path
//!   and reachability queries. Hypothetical states are expressed using a
//!   [`ResourceDelta`](topology::ResourceDelta) on top of any
//!   [`ResourceView`](topology::ResourceView).
//!
//! - **[`Domain`](domain)**: Function types, chains, the manager template and the
//!   [`Config`](domain::Config) bundling the entire problem instance.
//!
//! - **[`Placement`](placement)**: Immutable placement values, which reserve (and release) their
//!   resources on a topology.
//!
//! - **[`Solvers`](solvers)**: The [`Solver`](solvers::Solver) trait, its shared bookkeeping and
//!   the algorithms [`Bari`](solvers::Bari), [`Abu`](solvers::Abu), [`Oabu`](solvers::Oabu),
//!   [`Rari`](solvers::Rari) and [`RandomSolver`](solvers::RandomSolver).
//!
//! - **[`ExampleNetworks`](example_networks)**: Small prepared problem instances.
//!
//! ## Usage
//!
//! ```
//! use jsdmp::example_networks::*;
//! use jsdmp::solvers::{Bari, Solver, SolverOptions};
//! use jsdmp::Error;
//!
//! fn main() -> Result<(), Error> {
//!     let config = LineNet::config(1)?;
//!     let mut solver: Box<Bari> = Bari::new(&config, SolverOptions::default())?;
//!     solver.solve()?;
//!     assert_eq!(solver.profit(), 100);
//!     assert_eq!(solver.cost(), 4);
//!     Ok(())
//! }
//! ```
// test modules
pub mod example_networks;
mod test;

pub mod domain;
mod error;
pub mod placement;
pub mod printer;
pub mod solvers;
pub mod topology;

pub use error::Error;
