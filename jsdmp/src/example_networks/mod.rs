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

//! Problem instances for testing

use crate::domain::{Chain, Config, Type, Vnfm};
use crate::topology::Topology;
use crate::Error;

use std::collections::HashMap;

mod line_net;
pub use line_net::LineNet;

mod tree_net;
pub use tree_net::TreeNet;

/// Trait for easier access to example networks.
pub trait ExampleNetwork {
    /// Get the topology
    fn topology() -> Result<Topology, Error>;
    /// Get the function types used by the chains
    fn types() -> HashMap<String, Type>;
    /// Get the chains of the chosen variant
    fn chains(variant: usize) -> Result<Vec<Chain>, Error>;
    /// Get the manager template
    fn vnfm() -> Result<Vnfm, Error>;

    /// Get the complete configuration of the chosen variant
    fn config(variant: usize) -> Result<Config, Error> {
        Ok(Config::new(Self::types(), Self::chains(variant)?, Self::vnfm()?, Self::topology()?))
    }
}
