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


//! Loader for configuration directories, containing `topology.yml`, `chains.yml`, `types.yml` and
//! `vnfm.yml`.

use jsdmp::domain::{Chain, Config, Direction, DomainError, Type, Vnfm};
use jsdmp::topology::{Link, Node, Topology, TopologyError};

use log::*;
use serde::Deserialize;
use thiserror::Error;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors while loading a configuration directory
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file cannot be read
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    /// The file is no valid yaml, or has the wrong structure
    #[error("Cannot parse {0}: {1}")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
    /// The topology is inconsistent
    #[error("Topology Error: {0}")]
    TopologyError(#[from] TopologyError),
    /// The chains or the manager are inconsistent
    #[error("Domain Error: {0}")]
    DomainError(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
struct TypesFile {
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    name: String,
    cores: i64,
    ram: i64,
    #[serde(default)]
    ingress: bool,
    #[serde(default)]
    egress: bool,
    #[serde(default = "default_true")]
    manageable: bool,
}

#[derive(Debug, Deserialize)]
struct ChainsFile {
    chains: Vec<ChainEntry>,
}

#[derive(Debug, Deserialize)]
struct ChainEntry {
    cost: i64,
    nodes: Vec<FunctionEntry>,
    #[serde(default)]
    links: Vec<ChainLinkEntry>,
}

#[derive(Debug, Deserialize)]
struct FunctionEntry {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ChainLinkEntry {
    source: usize,
    destination: usize,
    bandwidth: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VnfmFile {
    cores: i64,
    ram: i64,
    capacity: usize,
    bandwidth: i64,
    radius: usize,
    license_fee: i64,
}

#[derive(Debug, Deserialize)]
struct TopologyFile {
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    links: Vec<LinkEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeEntry {
    id: String,
    cores: i64,
    ram: i64,
    vnf_support: bool,
    #[serde(default)]
    ingress: bool,
    #[serde(default)]
    egress: bool,
    #[serde(default)]
    not_manager_nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    source: String,
    destination: String,
    bandwidth: i64,
}

fn default_true() -> bool {
    true
}

fn read<T: for<'de> Deserialize<'de>>(directory: &Path, name: &str) -> Result<T, LoadError> {
    let path = directory.join(name);
    let content = fs::read_to_string(&path).map_err(|e| LoadError::Io(path.clone(), e))?;
    serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml(path, e))
}

/// Load the configuration from the directory. Chains are named `ch-<index>`, in the order in which
/// they appear in `chains.yml`.
pub fn load(directory: impl AsRef<Path>) -> Result<Config, LoadError> {
    let directory = directory.as_ref();
    let types_file: TypesFile = read(directory, "types.yml")?;
    let chains_file: ChainsFile = read(directory, "chains.yml")?;
    let vnfm_file: VnfmFile = read(directory, "vnfm.yml")?;
    let topology_file: TopologyFile = read(directory, "topology.yml")?;

    // a type is never ingress and egress at once; ingress wins
    let types: HashMap<String, Type> = types_file
        .types
        .into_iter()
        .map(|t| {
            let direction = Direction::from_flags(t.ingress, t.egress && !t.ingress);
            let ty = Type::new(t.name.clone(), t.cores, t.ram)
                .with_direction(direction)
                .with_manageable(t.manageable);
            (t.name, ty)
        })
        .collect();

    let mut chains = Vec::with_capacity(chains_file.chains.len());
    for (i, c) in chains_file.chains.into_iter().enumerate() {
        let mut chain = Chain::new(format!("ch-{}", i), c.cost);
        for f in c.nodes {
            let ty = types.get(&f.kind).ok_or_else(|| DomainError::UnknownType(f.kind.clone()))?;
            chain.add_function(ty.clone());
        }
        for l in c.links {
            chain.add_link(l.source, l.destination, Link::new(l.bandwidth))?;
        }
        chains.push(chain);
    }

    let vnfm = Vnfm::new(
        vnfm_file.cores,
        vnfm_file.ram,
        vnfm_file.capacity,
        vnfm_file.radius,
        vnfm_file.bandwidth,
        vnfm_file.license_fee,
    )?;

    // the excluded manager nodes may refer to nodes defined later in the file
    let mut topology = Topology::new();
    for n in topology_file.nodes.iter() {
        let node = Node::new(n.cores, n.ram)
            .with_direction(Direction::from_flags(n.ingress, n.egress))
            .with_vnf_support(n.vnf_support);
        topology.add_node(n.id.clone(), node)?;
    }
    for n in topology_file.nodes.iter().filter(|n| !n.not_manager_nodes.is_empty()) {
        let id = topology.get_node_id(&n.id)?;
        let excluded = n
            .not_manager_nodes
            .iter()
            .map(|name| topology.get_node_id(name))
            .collect::<Result<Vec<_>, _>>()?;
        let node = topology.node(id)?.clone().with_not_manager_nodes(excluded);
        topology.update_node(id, node)?;
    }
    for l in topology_file.links {
        let source = topology.get_node_id(&l.source)?;
        let destination = topology.get_node_id(&l.destination)?;
        topology.add_link(source, destination, Link::new(l.bandwidth))?;
    }

    info!(
        "Loaded {} types, {} chains, {} nodes and {} links from {}",
        types.len(),
        chains.len(),
        topology.num_nodes(),
        topology.num_links(),
        directory.display()
    );

    Ok(Config::new(types, chains, vnfm, topology))
}
