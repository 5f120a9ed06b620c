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


use jsdmp::domain::Config;
use jsdmp::example_networks::{ExampleNetwork, LineNet, TreeNet};
use jsdmp::printer;
use jsdmp::solvers::Solver;
use jsdmp_bencher::*;

use clap::{Parser, Subcommand, ValueEnum};
use log::*;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

mod loader;

fn main() -> Result<(), Box<dyn Error>> {
    // run clap
    let args = CommandLineArguments::parse();

    // initialize the env logger
    if args.verbose {
        pretty_env_logger::formatted_builder().filter_level(LevelFilter::Info).init();
    } else {
        pretty_env_logger::init();
    }

    let (config, scenario, placement, bench_args) = match args.cmd {
        MainCommand::Solve { config, placement, args } => {
            let scenario = config.display().to_string();
            (loader::load(&config)?, scenario, placement, args)
        }
        MainCommand::Example { network, variant, placement, args } => {
            let config = match network {
                ExampleSelection::Line => LineNet::config(variant)?,
                ExampleSelection::Tree => TreeNet::config(variant)?,
            };
            (config, format!("{:?}, variant={}", network, variant), placement, args)
        }
    };

    let config = Arc::new(config);
    if placement {
        print_placements(&config, &bench_args)?;
    }
    bench(config, scenario, bench_args)?;
    Ok(())
}

/// Solve the first run of every solver again, and print its deployments.
fn print_placements(config: &Config, args: &BencherArguments) -> Result<(), Box<dyn Error>> {
    for kind in args.solvers.iter() {
        let mut solver = kind.build(config, args.solver.options(0))?;
        let solution = solver.solve()?.to_vec();
        let topo = &config.topology;
        println!("{:=^40}", format!(" {} ", kind));
        for deployment in solution.iter() {
            println!("{}", printer::deployment(topo, deployment)?.join("\n"));
        }
        println!(
            "{}: {} of {} chains placed, profit {}, cost {}\n",
            kind,
            solution.len(),
            config.chains.len(),
            solver.profit(),
            solver.cost()
        );
    }
    Ok(())
}

/// Joint service deployment and manager placement. This program places chains of virtual network
/// functions together with their managers on a physical network, and benchmarks the solvers.
#[derive(Parser, Debug)]
#[command(name = "JSD-MP", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// Set the default logging level to info
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Action to perform
    #[command(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Solve the problem described in a configuration directory
    #[command(name = "solve")]
    Solve {
        /// Configuration directory, containing topology.yml, chains.yml, types.yml and vnfm.yml
        #[arg(short, long)]
        config: PathBuf,
        /// Print the placement of every chain and its manager
        #[arg(short, long)]
        placement: bool,
        /// Bencher Arguments
        #[command(flatten)]
        args: BencherArguments,
    },
    /// Solve one of the built-in example networks
    #[command(name = "example")]
    Example {
        /// Network to use
        #[arg(value_enum)]
        network: ExampleSelection,
        /// Variant of the network (number of requested chains)
        #[arg(short = 'n', long, default_value = "1")]
        variant: usize,
        /// Print the placement of every chain and its manager
        #[arg(short, long)]
        placement: bool,
        /// Bencher Arguments
        #[command(flatten)]
        args: BencherArguments,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ExampleSelection {
    /// Three switches on a line, with a dedicated manager node
    Line,
    /// Two-level tree with six leaves
    Tree,
}
