use std::collections::BTreeMap;

use log::debug;
use rand::seq::SliceRandom;

use super::{renumber, CommunityDetector};
use crate::error::Result;
use crate::network::Network;

/// Asynchronous label propagation (Raghavan et al., 2007).
///
/// Every node starts with its own label and repeatedly adopts the label that
/// is most frequent among its neighbors, until no node changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPropagation {
    pub max_iterations: usize,
    pub seed: Option<u64>,
}

impl Default for LabelPropagation {
    fn default() -> Self {
        LabelPropagation {
            max_iterations: 100,
            seed: None,
        }
    }
}

impl CommunityDetector for LabelPropagation {
    fn name(&self) -> &'static str {
        "label propagation"
    }

    fn detect(&self, network: &Network) -> Result<Vec<usize>> {
        let n = network.node_count();
        let adjacency = network.adjacency();
        let mut rng = crate::seeded_rng(self.seed);
        let mut labels: Vec<usize> = (0..n).collect();
        let mut order: Vec<usize> = (0..n).collect();

        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            order.shuffle(&mut rng);
            let mut changed = false;
            for &i in &order {
                if adjacency[i].is_empty() {
                    continue;
                }
                let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
                for &j in &adjacency[i] {
                    *counts.entry(labels[j]).or_default() += 1;
                }
                let max_count = counts.values().copied().max().unwrap_or(0);
                if counts.get(&labels[i]) == Some(&max_count) {
                    continue;
                }
                let candidates: Vec<usize> = counts
                    .into_iter()
                    .filter(|(_, count)| *count == max_count)
                    .map(|(label, _)| label)
                    .collect();
                if let Some(&label) = candidates.choose(&mut rng) {
                    labels[i] = label;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        debug!("label propagation finished after {} iterations", iterations);

        Ok(renumber(&labels))
    }
}
