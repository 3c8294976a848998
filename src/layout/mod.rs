//! Node placement in the plane.

mod fruchterman_reingold;
mod kamada_kawai;

use std::collections::VecDeque;
use std::str::FromStr;

use rayon::prelude::*;

use crate::error::Result;
use crate::network::Network;

pub use fruchterman_reingold::FruchtermanReingold;
pub use kamada_kawai::KamadaKawai;

/// Distances below this are treated as this value to avoid division by zero
/// for coincident nodes.
const MIN_DISTANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Assigns a position to every node of a network.
pub trait Layout {
    fn name(&self) -> &'static str;

    /// Returns one position per node, indexed like the nodes of `network`.
    fn compute(&self, network: &Network) -> Result<Vec<Point>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutKind {
    #[default]
    KamadaKawai,
    FruchtermanReingold,
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "kamada-kawai" | "kk" => Ok(LayoutKind::KamadaKawai),
            "fruchterman-reingold" | "fr" => Ok(LayoutKind::FruchtermanReingold),
            _ => Err(format!("unknown layout '{}'", s)),
        }
    }
}

fn bfs_distances(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
    let mut distances = vec![None; adjacency.len()];
    distances[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(node) = queue.pop_front() {
        let next = distances[node].map(|d| d + 1);
        for &neighbor in &adjacency[node] {
            if distances[neighbor].is_none() {
                distances[neighbor] = next;
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

/// Shortest path lengths between all pairs of nodes, ignoring edge
/// direction. Unreachable pairs get the largest finite distance plus one.
pub(crate) fn distance_matrix(network: &Network) -> Vec<Vec<f64>> {
    let adjacency = network.adjacency();
    let hops: Vec<Vec<Option<usize>>> = (0..adjacency.len())
        .into_par_iter()
        .map(|source| bfs_distances(&adjacency, source))
        .collect();

    let unreachable = hops.iter().flatten().flatten().max().copied().unwrap_or(0) + 1;
    hops.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|d| d.unwrap_or(unreachable) as f64)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::network_from_edges;

    #[test]
    fn test_distance_matrix_path() {
        let network = network_from_edges(4, &[(0, 1), (2, 1), (2, 3)]);
        let d = distance_matrix(&network);
        assert_eq!(d[0], vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(d[3][1], 2.0);
    }

    #[test]
    fn test_distance_matrix_unreachable() {
        let network = network_from_edges(4, &[(0, 1), (1, 2)]);
        let d = distance_matrix(&network);
        assert_eq!(d[0][2], 2.0);
        assert_eq!(d[0][3], 3.0);
        assert_eq!(d[3][3], 0.0);
    }

    #[test]
    fn test_parse_layout_kind() {
        assert_eq!("kk".parse::<LayoutKind>(), Ok(LayoutKind::KamadaKawai));
        assert_eq!(
            "fruchterman-reingold".parse::<LayoutKind>(),
            Ok(LayoutKind::FruchtermanReingold)
        );
        assert!("circle".parse::<LayoutKind>().is_err());
    }
}
