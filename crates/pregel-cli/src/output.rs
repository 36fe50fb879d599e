// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Result rendering: a table for humans, JSON for scripts.

use std::io::Write;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use pregel_config::Algorithm;
use pregel_core::{NodeId, PregelResult};
use serde::Serialize;

/// JSON document printed by `pregel run --json`.
///
/// Unreachable distances (infinity) serialize as `null`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Computation that ran.
    pub algorithm: Algorithm,
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Completed supersteps.
    pub ran_supersteps: usize,
    /// Whether the run stopped on its own.
    pub did_converge: bool,
    /// Whether the run was cancelled by the timeout.
    pub cancelled: bool,
    /// Per-node values, indexed by node id.
    pub values: &'a [f64],
}

impl<'a> RunReport<'a> {
    /// Captures the printable parts of `result`.
    pub fn new(algorithm: Algorithm, result: &'a PregelResult) -> Self {
        Self {
            algorithm,
            node_count: result.values.len(),
            ran_supersteps: result.ran_supersteps,
            did_converge: result.did_converge,
            cancelled: result.cancelled,
            values: result.values.as_slice(),
        }
    }
}

/// Writes `report` as pretty JSON.
pub fn write_json(out: &mut impl Write, report: &RunReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Writes up to `top` rows plus a one-line summary.
///
/// Ranks are listed highest first; labels and distances by node id.
pub fn write_table(out: &mut impl Write, report: &RunReport<'_>, top: usize) -> Result<()> {
    let mut rows: Vec<(NodeId, f64)> = report.values.iter().copied().enumerate().collect();
    let header = match report.algorithm {
        Algorithm::PageRank => {
            rows.sort_by(|(ia, a), (ib, b)| b.total_cmp(a).then(ia.cmp(ib)));
            "rank"
        }
        Algorithm::Components => "component",
        Algorithm::ShortestPaths => "distance",
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("node"), Cell::new(header)]);
    for (node, value) in rows.into_iter().take(top) {
        table.add_row(vec![
            Cell::new(node).set_alignment(CellAlignment::Right),
            Cell::new(format_value(report.algorithm, value)).set_alignment(CellAlignment::Right),
        ]);
    }

    writeln!(out, "{table}")?;
    let status = if report.cancelled {
        "cancelled"
    } else if report.did_converge {
        "converged"
    } else {
        "superstep budget exhausted"
    };
    writeln!(
        out,
        "{} nodes, {} supersteps, {status}",
        report.node_count, report.ran_supersteps
    )?;
    Ok(())
}

fn format_value(algorithm: Algorithm, value: f64) -> String {
    match algorithm {
        Algorithm::PageRank => format!("{value:.6}"),
        Algorithm::Components => format!("{value}"),
        Algorithm::ShortestPaths if value.is_infinite() => "unreachable".to_owned(),
        Algorithm::ShortestPaths => format!("{value}"),
    }
}
