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

//! Randomized local search over the manager assignment

use super::SolverState;
use crate::placement::Deployment;
use crate::topology::NodeId;
use crate::Error;

use log::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Hill climbing over the managers of the solution. In every iteration, a random managed chain
/// is moved to a random other node. The move is kept only if it is feasible and the total license
/// cost does not increase. Returns the number of accepted moves.
pub(crate) fn improve_managers<R: Rng>(
    state: &mut SolverState,
    solution: &mut [Deployment],
    n_iter: usize,
    rng: &mut R,
) -> Result<usize, Error> {
    let managed: Vec<usize> =
        solution.iter().enumerate().filter(|(_, d)| d.is_managed()).map(|(i, _)| i).collect();
    let nodes: Vec<NodeId> = state.topology().nodes().collect();
    if managed.is_empty() || nodes.len() < 2 {
        return Ok(0);
    }

    let mut accepted = 0;
    for _ in 0..n_iter {
        let idx = match managed.choose(rng) {
            Some(idx) => *idx,
            None => break,
        };
        let (placement, current) = match &solution[idx] {
            Deployment::Managed(p, mp) => (p.clone(), mp.clone()),
            Deployment::Unmanaged(_) => continue,
        };
        let candidate = loop {
            let n = nodes[rng.gen_range(0, nodes.len())];
            if n != current.management_node() {
                break n;
            }
        };

        let cost_before = state.cost();
        state.release_management(&current)?;
        match state.try_manager(state.topology(), &placement, candidate)? {
            Some(proposed) => {
                state.commit_management(&proposed)?;
                if state.cost() <= cost_before {
                    debug!(
                        "Move manager of {} to {} (cost {} -> {})",
                        placement.chain().name,
                        state.topology().get_node_name(candidate)?,
                        cost_before,
                        state.cost()
                    );
                    solution[idx] = Deployment::Managed(placement, proposed);
                    accepted += 1;
                } else {
                    state.release_management(&proposed)?;
                    state.commit_management(&current)?;
                }
            }
            None => state.commit_management(&current)?,
        }
    }

    info!("Local search accepted {} of {} moves", accepted, n_iter);
    Ok(accepted)
}
