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

//! # TreeNet

use super::ExampleNetwork;
use crate::domain::{Chain, Direction, DomainError, Type, Vnfm};
use crate::topology::{Link, Node, Topology};
use crate::Error;

use maplit::hashmap;
use std::collections::HashMap;

/// # TreeNet
///
/// ```text
///            s0
///          /    \
///        s1      s2
///      / | \    / | \
///    n1 n2 n3  n4 n5 n6
/// ```
///
/// The root `s0` is the ingress and egress of all traffic, but has no resources. The two hubs
/// `s1` and `s2` have no resources either, and each leaf has 2 cores and 2 memory. All
/// connections are bidirectional with bandwidth 15.
///
/// Every chain consists of an (unmanaged) ingress, a firewall, a server and an (unmanaged)
/// egress, connected with bandwidth 5. Variant `n` requests `n` chains, with fees `100`, `200`,
/// and so on. The manager needs 2 cores and 2 memory, and a license block manages 4 functions.
pub struct TreeNet {}

impl ExampleNetwork for TreeNet {
    fn topology() -> Result<Topology, Error> {
        let mut topo = Topology::new();
        let s0 = topo.add_node("s0", Node::new(0, 0).with_direction(Direction::Both))?;
        let s1 = topo.add_node("s1", Node::new(0, 0))?;
        let s2 = topo.add_node("s2", Node::new(0, 0))?;
        let leaves = (1..=6)
            .map(|i| topo.add_node(format!("n{}", i), Node::new(2, 2)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut connect = |a, b| -> Result<(), Error> {
            topo.add_link(a, b, Link::new(15))?;
            topo.add_link(b, a, Link::new(15))?;
            Ok(())
        };
        connect(s0, s1)?;
        connect(s0, s2)?;
        for leaf in &leaves[..3] {
            connect(s1, *leaf)?;
        }
        for leaf in &leaves[3..] {
            connect(s2, *leaf)?;
        }

        Ok(topo)
    }

    fn types() -> HashMap<String, Type> {
        hashmap! {
            "in".to_string() => Type::new("in", 0, 0)
                .with_direction(Direction::Ingress)
                .with_manageable(false),
            "out".to_string() => Type::new("out", 0, 0)
                .with_direction(Direction::Egress)
                .with_manageable(false),
            "fw".to_string() => Type::new("fw", 2, 2),
            "svr".to_string() => Type::new("svr", 2, 2),
        }
    }

    /// Variant `n` requests `n` chains
    fn chains(variant: usize) -> Result<Vec<Chain>, Error> {
        let types = Self::types();
        (0..variant)
            .map(|i| -> Result<Chain, Error> {
                let mut chain = Chain::new(format!("ch-{}", i + 1), 100 * (i as i64 + 1));
                for name in &["in", "fw", "svr", "out"] {
                    let function = types
                        .get(*name)
                        .cloned()
                        .ok_or_else(|| DomainError::UnknownType(name.to_string()))?;
                    chain.add_function(function);
                }
                for f in 0..3 {
                    chain.add_link(f, f + 1, Link::new(5))?;
                }
                Ok(chain)
            })
            .collect()
    }

    fn vnfm() -> Result<Vnfm, Error> {
        Ok(Vnfm::new(2, 2, 4, 100, 1, 100)?)
    }
}
