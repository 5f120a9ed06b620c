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

//! # LineNet

use super::ExampleNetwork;
use crate::domain::{Chain, Type, Vnfm};
use crate::topology::{Link, Node, Topology};
use crate::Error;

use maplit::hashmap;
use std::collections::HashMap;

/// # LineNet
///
/// ```text
///      m
///      |
/// s2 - s1 -> s3
/// ```
///
/// Three nodes `s1`, `s2`, `s3` with 2 cores and 2 memory, connected by links with bandwidth 20
/// (`s1 <-> s2` and `s1 -> s3`). The node `m` cannot host functions, but has room for two license
/// blocks of the manager. It is connected to `s1` in both directions.
///
/// The chains consist of three functions requiring 2 cores and 2 memory each, connected by links
/// with bandwidth 10. Variant `n` requests `n` chains, with fees `100`, `200`, and so on. The
/// topology has room for a single chain.
pub struct LineNet {}

impl ExampleNetwork for LineNet {
    fn topology() -> Result<Topology, Error> {
        let mut topo = Topology::new();
        let s1 = topo.add_node("s1", Node::new(2, 2))?;
        let s2 = topo.add_node("s2", Node::new(2, 2))?;
        let s3 = topo.add_node("s3", Node::new(2, 2))?;
        let m = topo.add_node("m", Node::new(4, 4).with_vnf_support(false))?;

        topo.add_link(s1, s2, Link::new(20))?;
        topo.add_link(s2, s1, Link::new(20))?;
        topo.add_link(s1, s3, Link::new(20))?;
        topo.add_link(m, s1, Link::new(20))?;
        topo.add_link(s1, m, Link::new(20))?;

        Ok(topo)
    }

    fn types() -> HashMap<String, Type> {
        hashmap! {"fw".to_string() => Type::new("fw", 2, 2)}
    }

    /// Variant `n` requests `n` chains
    fn chains(variant: usize) -> Result<Vec<Chain>, Error> {
        let fw = Type::new("fw", 2, 2);
        (0..variant)
            .map(|i| -> Result<Chain, Error> {
                Ok(Chain::new(format!("ch-{}", i + 1), 100 * (i as i64 + 1))
                    .with_function(fw.clone())
                    .with_function(fw.clone())
                    .with_function(fw.clone())
                    .with_link(0, 1, Link::new(10))?
                    .with_link(1, 2, Link::new(10))?)
            })
            .collect()
    }

    fn vnfm() -> Result<Vnfm, Error> {
        Ok(Vnfm::new(2, 2, 2, 2, 2, 2)?)
    }
}
