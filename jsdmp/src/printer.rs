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

//! # Helper (printer) functions for placements
//! Module containing helper functions to get formatted strings of placements, where all node ids
//! are replaced by the node names.

use crate::placement::{Deployment, ManagementPlacement, Placement};
use crate::topology::{Path, Topology, TopologyError};

use itertools::Itertools;

/// Returns the formatted string of a path, like `s1 -> s2 -> s3`. The empty path is formatted as
/// `-`.
pub fn path(topo: &Topology, path: &Path) -> Result<String, TopologyError> {
    let first = match path.first() {
        Some((first, _)) => *first,
        None => return Ok(String::from("-")),
    };
    let names = std::iter::once(first)
        .chain(path.iter().map(|(_, v)| *v))
        .map(|n| topo.get_node_name(n))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().join(" -> "))
}

/// Get a vector of strings, which represent the placement. The first line names the chain, every
/// following line shows one function with its node, or one link with its path.
pub fn placement(topo: &Topology, placement: &Placement) -> Result<Vec<String>, TopologyError> {
    let chain = placement.chain();
    let mut result = vec![format!("{} (fee: {})", chain.name, chain.fee)];
    for (i, (function, node)) in chain.functions().iter().zip(placement.nodes()).enumerate() {
        result.push(format!(
            "  [{}] {} on {}{}",
            i,
            function.name,
            topo.get_node_name(*node)?,
            if function.manageable { "" } else { " (unmanaged)" }
        ));
    }
    for ((s, d), p) in placement.links() {
        result.push(format!("  [{} -> {}] {}", s, d, path(topo, p)?));
    }
    Ok(result)
}

/// Get a vector of strings, which represent the management placement: the manager node, followed
/// by every management path.
pub fn management(
    topo: &Topology,
    management: &ManagementPlacement,
) -> Result<Vec<String>, TopologyError> {
    let mut result = vec![format!(
        "  manager on {} ({} new license blocks)",
        topo.get_node_name(management.management_node())?,
        management.blocks()
    )];
    for p in management.management_links() {
        result.push(format!("    {}", path(topo, p)?));
    }
    Ok(result)
}

/// Get a vector of strings, which represent the deployment.
pub fn deployment(topo: &Topology, deployment: &Deployment) -> Result<Vec<String>, TopologyError> {
    let mut result = placement(topo, deployment.placement())?;
    match deployment.management() {
        Some(mp) => result.extend(management(topo, mp)?),
        None => result.push(String::from("  no manager")),
    }
    Ok(result)
}
