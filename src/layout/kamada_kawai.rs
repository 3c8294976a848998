use std::f64::consts::PI;

use log::debug;

use super::{distance_matrix, Layout, Point, MIN_DISTANCE};
use crate::error::{Error, Result};
use crate::network::Network;

/// Spring embedder after Kamada and Kawai (1989).
///
/// Every pair of nodes is connected by a spring whose natural length is
/// proportional to their graph distance. Nodes start on the unit circle and
/// the node with the largest energy gradient is moved by a Newton-Raphson
/// step in each iteration, so the result is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct KamadaKawai {
    /// Defaults to `50 * n`.
    pub max_iterations: Option<usize>,
    /// Stop once the largest gradient is not above this value.
    pub epsilon: f64,
    /// Spring strength constant, defaults to the number of nodes.
    pub kk_const: Option<f64>,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        KamadaKawai {
            max_iterations: None,
            epsilon: 0.0,
            kk_const: None,
        }
    }
}

fn circle(n: usize) -> (Vec<f64>, Vec<f64>) {
    (0..n)
        .map(|i| {
            let phi = 2.0 * PI * i as f64 / n as f64;
            (phi.cos(), phi.sin())
        })
        .unzip()
}

/// Gradient contribution of the spring between `m` and another node, given
/// their offset.
fn gradient(k: f64, l: f64, dx: f64, dy: f64) -> (f64, f64) {
    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
    (k * (dx - l * dx / dist), k * (dy - l * dy / dist))
}

impl Layout for KamadaKawai {
    fn name(&self) -> &'static str {
        "Kamada-Kawai"
    }

    fn compute(&self, network: &Network) -> Result<Vec<Point>> {
        let n = network.node_count();
        if n == 0 {
            return Ok(Vec::new());
        } else if n == 1 {
            return Ok(vec![Point::default()]);
        }
        if self.epsilon < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must not be negative".to_string(),
            });
        }
        let kk_const = self.kk_const.unwrap_or(n as f64);
        if kk_const <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "kk_const",
                message: "must be positive".to_string(),
            });
        }
        let max_iterations = self.max_iterations.unwrap_or(50 * n);

        let dij = distance_matrix(network);
        let max_dij = dij.iter().flatten().copied().fold(0.0, f64::max);
        let unit_length = (n as f64).sqrt() / max_dij;

        let mut kij = vec![vec![0.0; n]; n];
        let mut lij = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    kij[i][j] = kk_const / (dij[i][j] * dij[i][j]);
                    lij[i][j] = unit_length * dij[i][j];
                }
            }
        }

        let (mut x, mut y) = circle(n);

        let mut d1 = vec![0.0; n];
        let mut d2 = vec![0.0; n];
        for m in 0..n {
            for i in (0..n).filter(|&i| i != m) {
                let (g1, g2) = gradient(kij[m][i], lij[m][i], x[m] - x[i], y[m] - y[i]);
                d1[m] += g1;
                d2[m] += g2;
            }
        }

        let mut iterations = 0;
        while iterations < max_iterations {
            iterations += 1;

            let (m, max_delta) = (0..n)
                .map(|i| (i, (d1[i] * d1[i] + d2[i] * d2[i]).sqrt()))
                .fold((0, f64::NEG_INFINITY), |best, current| {
                    if current.1 > best.1 { current } else { best }
                });
            if max_delta <= self.epsilon {
                break;
            }

            let (old_x, old_y) = (x[m], y[m]);

            // Entries of the Hessian of the energy with respect to node m
            let (mut a, mut b, mut c) = (0.0, 0.0, 0.0);
            for i in (0..n).filter(|&i| i != m) {
                let dx = old_x - x[i];
                let dy = old_y - y[i];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let den = dist * dist * dist;
                let (k, l) = (kij[m][i], lij[m][i]);
                a += k * (1.0 - l * dy * dy / den);
                b += k * l * dx * dy / den;
                c += k * (1.0 - l * dx * dx / den);
            }
            let delta_y = (b * d1[m] - d2[m] * a) / (c * a - b * b);
            let delta_x = -(d1[m] + b * delta_y) / a;
            if !delta_x.is_finite() || !delta_y.is_finite() {
                debug!("Kamada-Kawai step for node {} is singular, stopping", m);
                break;
            }
            let (new_x, new_y) = (old_x + delta_x, old_y + delta_y);

            d1[m] = 0.0;
            d2[m] = 0.0;
            for i in (0..n).filter(|&i| i != m) {
                let (k, l) = (kij[m][i], lij[m][i]);
                // gradient of i points away from m, so the offsets are negated
                let (old_g1, old_g2) = gradient(k, l, x[i] - old_x, y[i] - old_y);
                let (new_g1, new_g2) = gradient(k, l, x[i] - new_x, y[i] - new_y);
                d1[i] += new_g1 - old_g1;
                d2[i] += new_g2 - old_g2;

                let (g1, g2) = gradient(k, l, new_x - x[i], new_y - y[i]);
                d1[m] += g1;
                d2[m] += g2;
            }
            x[m] = new_x;
            y[m] = new_y;
        }
        debug!("Kamada-Kawai layout finished after {} iterations", iterations);

        Ok(x.into_iter().zip(y).map(|(x, y)| Point::new(x, y)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::network_from_edges;

    fn distance(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn test_trivial_graphs() {
        let layout = KamadaKawai::default();
        assert!(layout.compute(&Network::new(false)).unwrap().is_empty());
        assert_eq!(
            layout.compute(&network_from_edges(1, &[])).unwrap(),
            vec![Point::default()]
        );
    }

    #[test]
    fn test_path_is_stretched() {
        let network = network_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let points = KamadaKawai::default().compute(&network).unwrap();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));

        // the end points of a path must be further apart than any neighbors
        let ends = distance(points[0], points[4]);
        for i in 0..4 {
            assert!(ends > distance(points[i], points[i + 1]));
        }
    }

    #[test]
    fn test_deterministic() {
        let network = network_from_edges(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5)]);
        let first = KamadaKawai::default().compute(&network).unwrap();
        let second = KamadaKawai::default().compute(&network).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_parameters() {
        let network = network_from_edges(2, &[(0, 1)]);
        let layout = KamadaKawai {
            kk_const: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            layout.compute(&network),
            Err(Error::InvalidParameter { name: "kk_const", .. })
        ));
    }
}
