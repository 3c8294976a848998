//! Partitioning of nodes into communities.

mod label_propagation;
mod spinglass;

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Result;
use crate::network::Network;

pub use label_propagation::LabelPropagation;
pub use spinglass::Spinglass;

/// Assigns a cluster label to every node of a network.
pub trait CommunityDetector {
    fn name(&self) -> &'static str;

    /// Returns one label per node, indexed like the nodes of `network`. The
    /// labels are numbered `0..K-1` in the order in which the clusters first
    /// appear.
    fn detect(&self, network: &Network) -> Result<Vec<usize>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommunityKind {
    #[default]
    Spinglass,
    LabelPropagation,
}

impl FromStr for CommunityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "spinglass" => Ok(CommunityKind::Spinglass),
            "label-propagation" | "lpa" => Ok(CommunityKind::LabelPropagation),
            _ => Err(format!("unknown community detection algorithm '{}'", s)),
        }
    }
}

/// Maps arbitrary labels to `0..K-1` by order of first appearance.
pub(crate) fn renumber(labels: &[usize]) -> Vec<usize> {
    let mut mapping = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect()
}

/// Number of distinct labels.
pub fn community_count(labels: &[usize]) -> usize {
    labels.iter().max().map_or(0, |max| max + 1)
}
