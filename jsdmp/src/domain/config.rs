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

//! Problem instance

use super::{Chain, Type, Vnfm};
use crate::topology::Topology;

use std::collections::HashMap;
use std::sync::Arc;

/// # Configuration
///
/// Complete, read-only problem instance. Solvers clone the topology into their own working copy,
/// so one `Config` can be shared (for instance inside an `Arc`) by any number of solvers running
/// in parallel.
#[derive(Debug, Clone)]
pub struct Config {
    /// All known function types, by id
    pub types: HashMap<String, Type>,
    /// Requested chains, in the order in which they are processed
    pub chains: Vec<Arc<Chain>>,
    /// Manager template
    pub vnfm: Vnfm,
    /// Physical topology
    pub topology: Topology,
}

impl Config {
    /// Create a new configuration
    pub fn new(
        types: HashMap<String, Type>,
        chains: Vec<Chain>,
        vnfm: Vnfm,
        topology: Topology,
    ) -> Self {
        Self { types, chains: chains.into_iter().map(Arc::new).collect(), vnfm, topology }
    }

    /// Returns a copy of this configuration, which only requests the first `n` chains
    pub fn with_first_chains(&self, n: usize) -> Self {
        Self { chains: self.chains.iter().take(n).cloned().collect(), ..self.clone() }
    }
}
