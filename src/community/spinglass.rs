use log::debug;
use rand::Rng;

use super::{renumber, CommunityDetector};
use crate::error::{Error, Result};
use crate::network::Network;

const MAX_SPINS: usize = 500;

/// Community detection by simulated annealing of a Potts spin glass
/// (Reichardt and Bornholdt, 2006).
///
/// Each node carries one of `spins` states. The energy rewards edges inside a
/// state and penalizes them against the configuration null model, weighted by
/// `gamma`. Nodes are updated with the heat bath rule while the temperature
/// is lowered geometrically from `start_temperature` to `stop_temperature`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spinglass {
    /// Upper bound for the number of communities.
    pub spins: usize,
    pub gamma: f64,
    pub start_temperature: f64,
    pub stop_temperature: f64,
    pub cool_factor: f64,
    pub sweeps_per_temperature: usize,
    pub seed: Option<u64>,
}

impl Default for Spinglass {
    fn default() -> Self {
        Spinglass {
            spins: 16,
            gamma: 1.0,
            start_temperature: 1.0,
            stop_temperature: 0.01,
            cool_factor: 0.99,
            sweeps_per_temperature: 50,
            seed: None,
        }
    }
}

impl Spinglass {
    fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, message: &str| -> Result<()> {
            Err(Error::InvalidParameter {
                name,
                message: message.to_string(),
            })
        };
        if self.spins < 2 || self.spins > MAX_SPINS {
            return invalid("spins", "must be between 2 and 500");
        }
        if self.gamma < 0.0 {
            return invalid("gamma", "must not be negative");
        }
        if self.stop_temperature <= 0.0 || self.start_temperature <= self.stop_temperature {
            return invalid(
                "start_temperature",
                "must be larger than the positive stop temperature",
            );
        }
        if self.cool_factor <= 0.0 || self.cool_factor >= 1.0 {
            return invalid("cool_factor", "must be between 0 and 1");
        }
        if self.sweeps_per_temperature == 0 {
            return invalid("sweeps_per_temperature", "must be at least 1");
        }
        Ok(())
    }
}

impl CommunityDetector for Spinglass {
    fn name(&self) -> &'static str {
        "spinglass"
    }

    fn detect(&self, network: &Network) -> Result<Vec<usize>> {
        self.validate()?;
        let n = network.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }
        if !network.is_connected() {
            return Err(Error::Disconnected("spinglass community detection"));
        }
        let adjacency = network.adjacency();
        let degree: Vec<f64> = adjacency.iter().map(|a| a.len() as f64).collect();
        let two_m: f64 = degree.iter().sum();
        if two_m == 0.0 {
            return Ok(vec![0; n]);
        }

        let mut rng = crate::seeded_rng(self.seed);
        let mut spin: Vec<usize> = (0..n).map(|_| rng.gen_range(0..self.spins)).collect();
        let mut spin_degree = vec![0.0; self.spins];
        for (i, &s) in spin.iter().enumerate() {
            spin_degree[s] += degree[i];
        }

        let min_acceptance = (1.0 - 1.0 / self.spins as f64) * 0.01;
        let mut links = vec![0.0; self.spins];
        let mut weights = vec![0.0; self.spins];
        let mut temperature = self.start_temperature;

        while temperature > self.stop_temperature {
            let mut changes = 0;
            for _ in 0..(self.sweeps_per_temperature * n) {
                let i = rng.gen_range(0..n);
                let old = spin[i];
                spin_degree[old] -= degree[i];

                links.fill(0.0);
                for &j in &adjacency[i] {
                    links[spin[j]] += 1.0;
                }
                // energy decrease when node i takes spin s
                let null_model = self.gamma * degree[i] / two_m;
                let mut max_gain = f64::NEG_INFINITY;
                for s in 0..self.spins {
                    weights[s] = links[s] - null_model * spin_degree[s];
                    max_gain = max_gain.max(weights[s]);
                }
                let mut total = 0.0;
                for w in weights.iter_mut() {
                    *w = ((*w - max_gain) / temperature).exp();
                    total += *w;
                }

                let mut r = rng.gen_range(0.0..total);
                let mut new = self.spins - 1;
                for (s, w) in weights.iter().enumerate() {
                    if r < *w {
                        new = s;
                        break;
                    }
                    r -= w;
                }

                spin_degree[new] += degree[i];
                if new != old {
                    spin[i] = new;
                    changes += 1;
                }
            }

            let acceptance = changes as f64 / (self.sweeps_per_temperature * n) as f64;
            debug!(
                "spinglass temperature {:.4}, acceptance {:.4}",
                temperature, acceptance
            );
            if acceptance < min_acceptance {
                break;
            }
            temperature *= self.cool_factor;
        }

        Ok(renumber(&spin))
    }
}
