// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge-list loading.
//!
//! One relationship per line: `src dst [weight]`, whitespace separated.
//! Everything after `#` is a comment; blank lines are skipped. The node count
//! is one past the largest id seen, and ids must stay below [`MAX_NODES`].

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use pregel_core::{AdjacencyGraph, GraphBuilder, NodeId};

/// Upper bound on the node count of a loaded graph. Ids are dense, so one
/// stray large id would otherwise size every per-node array after it.
pub const MAX_NODES: usize = 1 << 28;

/// Parses an edge list into an [`AdjacencyGraph`].
pub fn parse_edges(reader: impl BufRead, undirected: bool) -> Result<AdjacencyGraph> {
    let mut builder = GraphBuilder::new(0).undirected(undirected);
    for (idx, line) in reader.lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("failed to read line {lineno}"))?;
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let (from, to, weight) = match fields.as_slice() {
            [from, to] => (node(from, lineno)?, node(to, lineno)?, 1.0),
            [from, to, weight] => {
                let weight: f64 = weight
                    .parse()
                    .with_context(|| format!("line {lineno}: invalid weight {weight:?}"))?;
                if !weight.is_finite() {
                    bail!("line {lineno}: weight must be finite");
                }
                (node(from, lineno)?, node(to, lineno)?, weight)
            }
            _ => bail!(
                "line {lineno}: expected `src dst [weight]`, found {} fields",
                fields.len()
            ),
        };
        builder
            .ensure_nodes(from.max(to) + 1)
            .add_weighted_edge(from, to, weight);
    }
    Ok(builder.build()?)
}

fn node(field: &str, lineno: usize) -> Result<NodeId> {
    let id: NodeId = field
        .parse()
        .with_context(|| format!("line {lineno}: invalid node id {field:?}"))?;
    if id >= MAX_NODES {
        bail!("line {lineno}: node id {id} exceeds the limit of {MAX_NODES} nodes");
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pregel_core::{Direction, GraphView};

    use super::*;

    #[test]
    fn comments_blank_lines_and_weights() {
        let input = "# header\n0 1\n\n1 2 2.5  # trailing\n   \n4 0\n";
        let graph = parse_edges(input.as_bytes(), false).unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.relationship_count(), 3);
        assert_eq!(graph.degree(0, Direction::Outgoing), 1);
        assert_eq!(graph.degree(0, Direction::Incoming), 1);
        assert_eq!(graph.degree(3, Direction::Both), 0);
    }

    #[test]
    fn undirected_lists_store_both_directions() {
        let graph = parse_edges("0 1\n".as_bytes(), true).unwrap();
        assert!(graph.is_undirected());
        assert_eq!(graph.degree(1, Direction::Outgoing), 1);
    }

    #[test]
    fn malformed_lines_report_their_number() {
        for (input, needle) in [
            ("0 1\n0\n", "line 2"),
            ("0 x\n", "invalid node id"),
            ("0 1 heavy\n", "invalid weight"),
            ("0 1 inf\n", "finite"),
            ("0 1 2 3\n", "4 fields"),
        ] {
            let err = parse_edges(input.as_bytes(), false).unwrap_err();
            assert!(
                format!("{err:#}").contains(needle),
                "{input:?}: {err:#}"
            );
        }
    }

    #[test]
    fn oversized_ids_are_rejected_with_their_line() {
        for input in [
            "0 1\n18446744073709551615 0\n",
            "0 1\n1000000000000 0\n",
            "0 1\n1 268435456\n",
        ] {
            let err = parse_edges(input.as_bytes(), false).unwrap_err();
            let text = format!("{err:#}");
            assert!(text.contains("line 2") && text.contains("exceeds"), "{input:?}: {text}");
        }
    }

    #[test]
    fn empty_input_is_an_empty_graph() {
        let graph = parse_edges("# nothing\n".as_bytes(), false).unwrap();
        assert_eq!(graph.node_count(), 0);
    }
}
