use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, Trim};
use log::debug;

use crate::error::{Error, Result};
use crate::network::{Link, Network, Node};

/// Reads an undirected graph from `source,target[,weight]` records.
///
/// Nodes are created in the order their names first appear. A repeated pair
/// of nodes (in either direction) adds its weight to the existing edge.
pub fn read<R: Read>(reader: R) -> Result<Network> {
    let mut network = Network::new(false);
    let mut node_indices = HashMap::new();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            let line = record.position().map_or(0, |p| p.line());
            return Err(Error::EdgeListRecord {
                line,
                message: format!("expected at least 2 fields, but got {}", record.len()),
            });
        }
        let weight = match record.get(2).filter(|w| !w.is_empty()) {
            Some(w) => w.parse::<f64>().map_err(|_| Error::EdgeListRecord {
                line: record.position().map_or(0, |p| p.line()),
                message: format!("invalid weight '{}'", w),
            })?,
            None => 1.0,
        };

        let mut node_for = |name: &str| {
            *node_indices.entry(name.to_string()).or_insert_with(|| {
                let id = network.node_count() as i64;
                network.add_node(Node {
                    id,
                    label: Some(name.to_string()),
                })
            })
        };
        let node1 = node_for(&record[0]);
        let node2 = node_for(&record[1]);

        if let Some((edge, _)) = network.graph.find_edge_undirected(node1, node2) {
            let link = &mut network.graph[edge];
            link.weight = Some(link.weight.unwrap_or(1.0) + weight);
        } else {
            network.add_edge(
                node1,
                node2,
                Link {
                    weight: Some(weight),
                },
            );
        }
    }

    debug!(
        "read edge list with {} nodes and {} edges",
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_edge_list() {
        let data = "alice,bob,3\nbob,carol\n# comment\ncarol, alice ,2.5\nbob,alice,1\n";
        let network = read(data.as_bytes()).unwrap();
        assert!(!network.is_directed());
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 3);

        let labels: Vec<_> = network
            .graph
            .node_weights()
            .map(|n| n.label.clone().unwrap())
            .collect();
        assert_eq!(labels, vec!["alice", "bob", "carol"]);

        let weights: Vec<_> = network.graph.edge_weights().map(|l| l.weight).collect();
        assert_eq!(weights, vec![Some(4.0), Some(1.0), Some(2.5)]);
        assert_eq!(
            network.endpoints().collect::<Vec<_>>(),
            vec![(0, 1), (1, 2), (0, 2)]
        );
    }

    #[test]
    fn test_short_record() {
        let result = read("a,b\nc\n".as_bytes());
        assert!(matches!(result, Err(Error::EdgeListRecord { line: 2, .. })));
    }

    #[test]
    fn test_invalid_weight() {
        let result = read("a,b,heavy\n".as_bytes());
        assert!(matches!(result, Err(Error::EdgeListRecord { .. })));
    }
}
