use log::debug;
use rand::Rng;
use rayon::prelude::*;

use super::{Layout, Point, MIN_DISTANCE};
use crate::error::{Error, Result};
use crate::network::Network;

/// Force-directed placement after Fruchterman and Reingold (1991).
///
/// All node pairs repel each other, nodes connected by an edge attract each
/// other. The maximal displacement per iteration is bounded by a temperature
/// that cools down linearly to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FruchtermanReingold {
    pub iterations: usize,
    /// Defaults to `sqrt(n) / 10`.
    pub start_temperature: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for FruchtermanReingold {
    fn default() -> Self {
        FruchtermanReingold {
            iterations: 500,
            start_temperature: None,
            seed: None,
        }
    }
}

impl Layout for FruchtermanReingold {
    fn name(&self) -> &'static str {
        "Fruchterman-Reingold"
    }

    fn compute(&self, network: &Network) -> Result<Vec<Point>> {
        let n = network.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }
        let start_temperature = self.start_temperature.unwrap_or((n as f64).sqrt() / 10.0);
        if start_temperature <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "start_temperature",
                message: "must be positive".to_string(),
            });
        }

        let mut rng = crate::seeded_rng(self.seed);
        let half_width = (n as f64).sqrt() / 2.0;
        let mut points: Vec<Point> = (0..n)
            .map(|_| {
                Point::new(
                    rng.gen_range(-half_width..=half_width),
                    rng.gen_range(-half_width..=half_width),
                )
            })
            .collect();
        let edges: Vec<(usize, usize)> = network.endpoints().filter(|(s, t)| s != t).collect();

        let cooling = start_temperature / self.iterations.max(1) as f64;
        let mut temperature = start_temperature;
        for _ in 0..self.iterations {
            let mut displacement: Vec<(f64, f64)> = (0..n)
                .into_par_iter()
                .map(|i| {
                    let mut disp = (0.0, 0.0);
                    for j in (0..n).filter(|&j| j != i) {
                        let mut dx = points[i].x - points[j].x;
                        let dy = points[i].y - points[j].y;
                        if dx == 0.0 && dy == 0.0 {
                            // separate coincident nodes along the x axis
                            dx = if i < j { -MIN_DISTANCE } else { MIN_DISTANCE };
                        }
                        let dist2 = (dx * dx + dy * dy).max(MIN_DISTANCE * MIN_DISTANCE);
                        disp.0 += dx / dist2;
                        disp.1 += dy / dist2;
                    }
                    disp
                })
                .collect();

            for &(s, t) in &edges {
                let dx = points[s].x - points[t].x;
                let dy = points[s].y - points[t].y;
                let dist = (dx * dx + dy * dy).sqrt();
                displacement[s].0 -= dx * dist;
                displacement[s].1 -= dy * dist;
                displacement[t].0 += dx * dist;
                displacement[t].1 += dy * dist;
            }

            for (point, (dx, dy)) in points.iter_mut().zip(displacement) {
                let length = (dx * dx + dy * dy).sqrt();
                let scale = if length > temperature {
                    temperature / length
                } else {
                    1.0
                };
                point.x += dx * scale;
                point.y += dy * scale;
            }
            temperature -= cooling;
        }
        debug!(
            "Fruchterman-Reingold layout finished after {} iterations",
            self.iterations
        );
        Ok(points)
    }
}
