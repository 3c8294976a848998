//! Converts a graph into a flat list of edges with 2D positions and
//! community labels, ready to be drawn by simple plotting programs.
//!
//! The conversion loads a graph, keeps only its largest connected component,
//! computes a layout, detects communities, normalizes the coordinates into the
//! unit square and writes one CSV row per edge. See [`pipeline::run`].

pub mod community;
pub mod error;
pub mod export;
pub mod input;
pub mod layout;
pub mod network;
pub mod normalize;
pub mod pipeline;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use error::{Error, Result};
pub use pipeline::{run, Config, Summary};

/// Random number generator for the stochastic algorithms, seeded from the
/// operating system if no seed is given.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
