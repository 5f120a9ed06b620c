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

use crate::domain::{Chain, Config, Direction, Type, Vnfm};
use crate::example_networks::*;
use crate::placement::Deployment;
use crate::solvers::*;
use crate::topology::{Link, Node, Topology};
use maplit::hashmap;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn options() -> SolverOptions {
    SolverOptions { seed: Some(42), threads: Some(2), ..Default::default() }
}

fn node(solver: &dyn Solver, name: &str) -> crate::topology::NodeId {
    solver.state().topology().get_node_id(name).unwrap()
}

/// Check the relation of cost and profit to the solution and the manager loads.
fn check_accounting(solver: &dyn Solver) {
    let state = solver.state();
    let vnfm = state.vnfm();
    let blocks: usize = state.manage_by_node().values().map(|l| vnfm.blocks(*l)).sum();
    assert_eq!(solver.cost(), blocks as i64 * vnfm.license_cost);
    assert_eq!(solver.cost() % vnfm.license_cost, 0);

    let solution = solver.solution().unwrap();
    let fees: i64 = solution.iter().filter(|d| d.is_managed()).map(|d| d.chain().fee).sum();
    assert_eq!(solver.profit(), fees);

    let mut loads = hashmap! {};
    for mp in solution.iter().filter_map(|d| d.management()) {
        *loads.entry(mp.management_node()).or_insert(0) += mp.chain().num_manageable();
    }
    assert_eq!(&loads, state.manage_by_node());
}

#[test]
fn bari_single_chain() {
    super::init();
    let config = LineNet::config(1).unwrap();
    let mut bari = SolverKind::Bari.build(&config, options()).unwrap();
    let solution = bari.solve().unwrap().to_vec();

    assert_eq!(solution.len(), 1);
    let (s1, s2, s3, m) =
        (node(&*bari, "s1"), node(&*bari, "s2"), node(&*bari, "s3"), node(&*bari, "m"));
    match &solution[0] {
        Deployment::Managed(p, mp) => {
            assert_eq!(p.nodes(), &[s2, s1, s3]);
            assert_eq!(mp.management_node(), m);
            assert_eq!(mp.management_links().len(), 3);
        }
        Deployment::Unmanaged(_) => panic!("chain must be managed"),
    }
    let topo = bari.state().topology();
    for n in &[s1, s2, s3, m] {
        assert_eq!(topo.node(*n).unwrap().cores, 0);
        assert_eq!(topo.node(*n).unwrap().memory, 0);
    }
    assert_eq!(bari.profit(), 100);
    assert_eq!(bari.cost(), 4);
    check_accounting(&*bari);
}

#[test]
fn bari_capacity_for_one_chain() {
    super::init();
    let config = LineNet::config(2).unwrap();
    for kind in &[SolverKind::Bari, SolverKind::Abu, SolverKind::Oabu] {
        let mut solver = kind.build(&config, options()).unwrap();
        let solution = solver.solve().unwrap();
        assert_eq!(solution.len(), 1, "{}", kind);
        assert_eq!(solution[0].chain().fee, 100, "{}", kind);
        assert_eq!(solver.profit(), 100, "{}", kind);
        assert_eq!(solver.cost(), 4, "{}", kind);
        check_accounting(&*solver);
    }
}

#[test]
fn incompatible_nodes_are_never_used() {
    super::init();
    let fw = Type::new("fw", 2, 2);
    let chain = Chain::new("ch", 100)
        .with_function(Type::new("in", 0, 0).with_direction(Direction::Ingress))
        .with_function(fw.clone())
        .with_function(fw)
        .with_function(Type::new("out", 0, 0).with_direction(Direction::Egress))
        .with_link(0, 1, Link::new(10))
        .unwrap()
        .with_link(1, 2, Link::new(5))
        .unwrap()
        .with_link(2, 3, Link::new(5))
        .unwrap();

    // no node can be the egress
    let mut topo = Topology::new();
    let s1 = topo.add_node("s1", Node::new(2, 2)).unwrap();
    let s2 = topo.add_node("s2", Node::new(2, 2)).unwrap();
    let s3 = topo.add_node("s3", Node::new(2, 2).with_direction(Direction::Ingress)).unwrap();
    topo.add_link(s1, s2, Link::new(20)).unwrap();
    topo.add_link(s2, s1, Link::new(20)).unwrap();
    topo.add_link(s1, s3, Link::new(20)).unwrap();
    let vnfm = Vnfm::new(2, 2, 2, 2, 2, 2).unwrap();
    let config = Config::new(hashmap! {}, vec![chain], vnfm, topo);

    for kind in SolverKind::ALL.iter() {
        let mut solver = kind.build(&config, options()).unwrap();
        assert_eq!(solver.solve().unwrap().len(), 0, "{}", kind);
        assert_eq!(solver.profit(), 0);
        assert_eq!(solver.cost(), 0);
    }

    // the only node with enough resources does not support functions
    let mut topo = Topology::new();
    let big = topo.add_node("big", Node::new(100, 100).with_vnf_support(false)).unwrap();
    let small = topo.add_node("small", Node::new(1, 1)).unwrap();
    topo.add_link(big, small, Link::new(10)).unwrap();
    topo.add_link(small, big, Link::new(10)).unwrap();
    let chain = Chain::new("ch", 100).with_function(Type::new("fw", 2, 2));
    let config = Config::new(hashmap! {}, vec![chain], vnfm, topo);
    for kind in SolverKind::ALL.iter() {
        let mut solver = kind.build(&config, options()).unwrap();
        assert_eq!(solver.solve().unwrap().len(), 0, "{}", kind);
    }
}

#[test]
fn abu_tree() {
    super::init();
    let mut abu = SolverKind::Abu.build(&TreeNet::config(2).unwrap(), options()).unwrap();
    assert_eq!(abu.solve().unwrap().len(), 2);
    assert_eq!(abu.profit(), 300);
    assert_eq!(abu.cost(), 100);
    check_accounting(&*abu);

    // both chains share the same license block
    let managers: HashSet<_> =
        abu.solution().unwrap().iter().filter_map(|d| d.management()).map(|mp| mp.management_node()).collect();
    assert_eq!(managers.len(), 1);

    // the leaves cannot host three chains and their manager
    let mut abu = SolverKind::Abu.build(&TreeNet::config(3).unwrap(), options()).unwrap();
    assert_eq!(abu.solve().unwrap().len(), 0);
    assert_eq!(abu.profit(), 0);
    assert_eq!(abu.cost(), 0);
}

#[test]
fn oabu_tree() {
    super::init();
    let mut oabu = SolverKind::Oabu.build(&TreeNet::config(2).unwrap(), options()).unwrap();
    assert_eq!(oabu.name(), "oabu");
    assert_eq!(oabu.solve().unwrap().len(), 2);
    assert_eq!(oabu.profit(), 300);
    assert_eq!(oabu.cost(), 100);
    check_accounting(&*oabu);
}

#[test]
fn bari_tree() {
    super::init();
    let mut bari = SolverKind::Bari.build(&TreeNet::config(2).unwrap(), options()).unwrap();
    assert_eq!(bari.solve().unwrap().len(), 2);
    assert_eq!(bari.profit(), 300);
    assert_eq!(bari.cost(), 100);
    let n3 = node(&*bari, "n3");
    assert_eq!(bari.state().load(n3), 4);
    check_accounting(&*bari);
}

#[test]
fn random_manager_is_the_free_node() {
    super::init();
    let mut topo = Topology::new();
    let s = (1..=3).map(|i| topo.add_node(format!("s{}", i), Node::new(2, 2)).unwrap()).collect::<Vec<_>>();
    for a in s.iter() {
        for b in s.iter() {
            if a != b {
                topo.add_link(*a, *b, Link::new(20)).unwrap();
            }
        }
    }
    let fw = Type::new("fw", 2, 2);
    let chain = Chain::new("ch", 100)
        .with_function(fw.clone())
        .with_function(fw)
        .with_link(0, 1, Link::new(5))
        .unwrap();
    let vnfm = Vnfm::new(2, 2, 2, 2, 1, 10).unwrap();
    let config = Config::new(hashmap! {}, vec![chain], vnfm, topo);

    for seed in 0..10 {
        let options = SolverOptions { seed: Some(seed), ..Default::default() };
        let mut random = SolverKind::Random.build(&config, options).unwrap();
        let solution = random.solve().unwrap().to_vec();
        assert_eq!(solution.len(), 1);
        let mp = solution[0].management().unwrap();
        assert!(!solution[0].placement().nodes().contains(&mp.management_node()));
        assert_eq!(random.profit(), 100);
        assert_eq!(random.cost(), 10);
        check_accounting(&*random);
    }
}

#[test]
fn rari_accounting() {
    super::init();
    for share in &[0.0, 0.5, 1.0] {
        for local_search in &[false, true] {
            let options =
                SolverOptions { random_share: *share, local_search: *local_search, ..options() };
            let mut rari = SolverKind::Rari.build(&TreeNet::config(2).unwrap(), options).unwrap();
            assert!(rari.solve().unwrap().len() <= 2);
            assert!(rari.solution().unwrap().iter().all(|d| d.is_managed()));
            check_accounting(&*rari);
        }
    }

    // without any random share, rari behaves like bari
    let options = SolverOptions { random_share: 0.0, local_search: false, ..options() };
    let mut rari = SolverKind::Rari.build(&TreeNet::config(2).unwrap(), options).unwrap();
    rari.solve().unwrap();
    assert_eq!(rari.profit(), 300);
    assert_eq!(rari.cost(), 100);
}

#[test]
fn local_search_merges_license_blocks() {
    super::init();
    // two leaves around a hub. Each leaf hosts one chain, and both chains fit into one block.
    let mut topo = Topology::new();
    let h = topo.add_node("h", Node::new(0, 0)).unwrap();
    let a = topo.add_node("a", Node::new(6, 6)).unwrap();
    let b = topo.add_node("b", Node::new(6, 6)).unwrap();
    for leaf in &[a, b] {
        topo.add_link(h, *leaf, Link::new(10)).unwrap();
        topo.add_link(*leaf, h, Link::new(10)).unwrap();
    }
    let chains = vec![
        Chain::new("ch-0", 10).with_function(Type::new("fw", 4, 4)),
        Chain::new("ch-1", 20).with_function(Type::new("fw", 4, 4)),
    ];
    let vnfm = Vnfm::new(2, 2, 4, 2, 1, 100).unwrap();
    let config = Config::new(hashmap! {}, chains, vnfm, topo);

    // without local search, each leaf manages its own chain
    let options = SolverOptions { n_iter: 0, seed: Some(5), threads: Some(1), ..Default::default() };
    let mut abu = SolverKind::Abu.build(&config, options.clone()).unwrap();
    assert_eq!(abu.solve().unwrap().len(), 2);
    assert_eq!(abu.cost(), 200);
    assert_eq!(abu.state().manage_by_node(), &hashmap! {a => 1, b => 1});
    check_accounting(&*abu);

    // the local search moves one manager next to the other, closing one block
    let mut abu = SolverKind::Abu.build(&config, SolverOptions { n_iter: 50, ..options }).unwrap();
    assert_eq!(abu.solve().unwrap().len(), 2);
    assert_eq!(abu.profit(), 30);
    assert_eq!(abu.cost(), 100);
    check_accounting(&*abu);

    let loads = abu.state().manage_by_node();
    assert_eq!(loads.len(), 1);
    let (manager, load) = loads.iter().next().map(|(n, l)| (*n, *l)).unwrap();
    assert_eq!(load, 2);
    let other = if manager == a { b } else { a };
    let topo = abu.state().topology();
    assert_eq!(topo.node(manager).unwrap().cores, 0);
    assert_eq!(topo.node(other).unwrap().cores, 2);
    assert_eq!(topo.node(other).unwrap().memory, 2);
    assert_eq!(topo.node(h).unwrap().cores, 0);
}

#[test]
fn solve_is_cached() {
    let mut abu = SolverKind::Abu.build(&TreeNet::config(2).unwrap(), options()).unwrap();
    assert!(abu.solution().is_none());
    let first = abu.solve().unwrap().to_vec();
    let cost = abu.cost();
    let second = abu.solve().unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(abu.cost(), cost);
}

#[test]
fn hop_count_cost() {
    let config = LineNet::config(1).unwrap();
    let mut bari: Box<Bari<HopCountCost>> = Bari::new(&config, options()).unwrap();
    bari.solve().unwrap();
    assert_eq!(bari.profit(), 100);
}

#[test]
fn parallel_solvers_share_config() {
    let config = Arc::new(TreeNet::config(2).unwrap());
    let handles = SolverKind::ALL
        .iter()
        .map(|kind| {
            let kind = *kind;
            let config = config.clone();
            thread::spawn(move || {
                let mut solver = kind.build(&config, options()).unwrap();
                solver.solve().unwrap();
                (solver.profit(), solver.cost())
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        let (profit, cost) = handle.join().unwrap();
        assert!(profit <= 300);
        assert!(cost >= 0);
    }
    // the shared topology is untouched
    assert_eq!(config.topology.node(config.topology.get_node_id("n1").unwrap()).unwrap().cores, 2);
}
