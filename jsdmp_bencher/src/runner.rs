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


//! Runner for the Benchmark, based on the provided configuration

use super::utils::*;
use super::{BencherArguments, BencherResult, Run, SolverArguments, SolverResult};

use jsdmp::domain::Config;
use jsdmp::solvers::{Solver, SolverKind};
use jsdmp::Error as SolverError;

use console::{style, Term};
use indicatif::ProgressBar;
use log::*;

use std::error::Error;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{spawn, JoinHandle};
use std::time::Instant;

/// Benches every requested solver on the configuration, producing a result, and generating the
/// files (if necessary). All runs share the same read-only configuration.
pub fn bench(
    config: Arc<Config>,
    scenario: String,
    args: BencherArguments,
) -> Result<BencherResult, Box<dyn Error>> {
    let num_workers = args.workers.unwrap_or_else(num_cpus::get).max(1);
    let num_steps = args.solvers.len() + 1;

    // generate a TERM for nicer outputs
    let term = Term::stdout();
    term.write_line(&format!("{} {}...", style("Scenario:").bold().blue(), scenario))?;

    let mut results = Vec::with_capacity(args.solvers.len());
    for (i, kind) in args.solvers.iter().enumerate() {
        term.write_line(&format!(
            "{} Benchmarking {}...",
            style(format!("[{}/{}]", i, num_steps)).bright().black(),
            kind
        ))?;
        results.push(worker_runner(&config, *kind, &args.solver, args.runs, num_workers));
        term.clear_last_lines(1)?;
    }

    term.write_line(&format!(
        "{} {}",
        style(format!("[{}/{}]", num_steps - 1, num_steps)).bright().black(),
        "Collecting results..."
    ))?;

    let result = BencherResult {
        scenario: scenario.clone(),
        num_nodes: config.topology.num_nodes(),
        num_links: config.topology.num_links(),
        num_chains: config.chains.len(),
        results,
    };

    let summ = summary(&result);

    export_result(&result, &args)?;

    term.clear_last_lines(2)?;
    term.write_line(&format!(
        "{} {}... {} {}",
        style("Scenario:").bold().blue(),
        scenario,
        style("Done").bold().green(),
        style(&summ).bright().black(),
    ))?;

    Ok(result)
}

fn worker_runner(
    config: &Arc<Config>,
    kind: SolverKind,
    args: &SolverArguments,
    runs: usize,
    num_workers: usize,
) -> SolverResult {
    let mut result = SolverResult { solver: kind.to_string(), runs: Vec::new(), failed: 0 };

    let (sender, receiver) = channel::<(usize, Result<Run, SolverError>)>();
    let next_run = Arc::new(Mutex::new(0));

    let bar = ProgressBar::new(runs as u64);
    bar.tick();

    // spawn all workers
    let workers: Vec<JoinHandle<()>> = (0..num_workers.min(runs))
        .map(|_| {
            let c = config.clone();
            let a = args.clone();
            let tx = sender.clone();
            let next = next_run.clone();
            spawn(move || worker(c, kind, a, runs, tx, next))
        })
        .collect();
    drop(sender);

    // the loop ends early if all workers are gone
    for (run, outcome) in receiver.iter() {
        bar.inc(1);
        match outcome {
            Ok(r) => result.runs.push(r),
            Err(e) => {
                error!("Run {} of {} failed: {}", run, kind, e);
                result.failed += 1;
            }
        }
    }

    for w in workers {
        if w.join().is_err() {
            error!("A worker of {} panicked", kind);
        }
    }
    bar.finish_and_clear();

    result.runs.sort_by_key(|r| r.run);
    result
}

fn worker(
    config: Arc<Config>,
    kind: SolverKind,
    args: SolverArguments,
    runs: usize,
    sender: Sender<(usize, Result<Run, SolverError>)>,
    next_run: Arc<Mutex<usize>>,
) {
    loop {
        // check if there are jobs todo
        let run = {
            let mut next = match next_run.lock() {
                Ok(next) => next,
                Err(_) => break,
            };
            if *next < runs {
                *next += 1;
                *next - 1
            } else {
                break;
            }
        };

        let outcome = run_once(&config, kind, &args, run);
        if sender.send((run, outcome)).is_err() {
            break;
        }
    }
}

/// Build a fresh solver for the given run, solve it and measure the time.
pub(crate) fn run_once(
    config: &Config,
    kind: SolverKind,
    args: &SolverArguments,
    run: usize,
) -> Result<Run, SolverError> {
    let start_time = Instant::now();
    let mut solver = kind.build(config, args.options(run))?;
    let number_of_placed_chains = solver.solve()?.len();
    let elapsed_time = start_time.elapsed().as_secs_f64();
    debug!("{} run {} finished after {:.3}s", kind, run, elapsed_time);
    Ok(Run {
        run,
        solver: kind.to_string(),
        elapsed_time,
        profit: solver.profit(),
        cost: solver.cost(),
        number_of_chains: config.chains.len(),
        number_of_placed_chains,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use jsdmp::example_networks::{ExampleNetwork, TreeNet};

    #[test]
    fn runs_are_collected_in_order() {
        let config = Arc::new(TreeNet::config(2).unwrap());
        let args = SolverArguments { seed: Some(3), ..Default::default() };
        let result = worker_runner(&config, SolverKind::Random, &args, 8, 3);
        assert_eq!(result.solver, "random");
        assert_eq!(result.failed, 0);
        assert_eq!(
            result.runs.iter().map(|r| r.run).collect::<Vec<_>>(),
            (0..8).collect::<Vec<_>>()
        );
        for r in result.runs.iter() {
            assert_eq!(r.number_of_chains, 2);
            assert!(r.number_of_placed_chains <= 2);
            // the same seed gives the same outcome
            let again = run_once(&config, SolverKind::Random, &args, r.run).unwrap();
            assert_eq!(r, &Run { elapsed_time: r.elapsed_time, ..again });
        }
    }

    #[test]
    fn bari_run() {
        let config = TreeNet::config(2).unwrap();
        let run = run_once(&config, SolverKind::Bari, &SolverArguments::default(), 0).unwrap();
        assert_eq!(run.profit, 300);
        assert_eq!(run.cost, 100);
        assert_eq!(run.number_of_placed_chains, 2);
    }
}
