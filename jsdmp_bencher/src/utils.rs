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


//! Utility Functions for the bencher

use super::{BencherArguments, BencherResult, Run};

use csv::Writer;

use std::error::Error;

/// Write the results to the csv and json files given in the arguments. The csv file contains one
/// row per run (of every solver), the json file contains the entire result.
pub fn export_result(result: &BencherResult, args: &BencherArguments) -> Result<(), Box<dyn Error>> {
    if let Some(csv_file) = args.output_csv.as_ref() {
        let mut wtr = Writer::from_path(csv_file)?;
        for run in result.results.iter().flat_map(|r| r.runs.iter()) {
            wtr.serialize(run)?;
        }
        wtr.flush()?;
    }

    if let Some(json_file) = args.output_json.as_ref() {
        let result_str = serde_json::to_string_pretty(result)?;
        std::fs::write(json_file, result_str)?;
    }

    Ok(())
}

/// One-line summary of the result, with the averages of every solver
pub fn summary(result: &BencherResult) -> String {
    format!(
        "[info: n={}, e={}, c={}]{}",
        result.num_nodes,
        result.num_links,
        result.num_chains,
        result
            .results
            .iter()
            .map(|r| summary_bench(&r.solver, &r.runs, r.failed))
            .collect::<String>()
    )
}

fn summary_bench(title: &str, bench: &[Run], failed: usize) -> String {
    if bench.is_empty() {
        return format!(" [{}: failed={}]", title, failed);
    }
    let len = bench.len() as f64;
    format!(
        " [{}: p={:.1}, c={:.1}, placed={:.1}, t={:.3}s{}]",
        title,
        bench.iter().fold(0.0, |x, r| x + r.profit as f64) / len,
        bench.iter().fold(0.0, |x, r| x + r.cost as f64) / len,
        bench.iter().fold(0.0, |x, r| x + r.number_of_placed_chains as f64) / len,
        bench.iter().fold(0.0, |x, r| x + r.elapsed_time) / len,
        if failed > 0 { format!(", failed={}", failed) } else { String::new() },
    )
}
