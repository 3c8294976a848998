//! The conversion from a graph file to an edge CSV, step by step.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::{debug, info};

use crate::community::{self, CommunityDetector, CommunityKind, LabelPropagation, Spinglass};
use crate::error::Result;
use crate::export;
use crate::input::{self, InputFormat};
use crate::layout::{FruchtermanReingold, KamadaKawai, Layout, LayoutKind};
use crate::normalize::normalize;

/// Selects the algorithms used by [`run`].
///
/// The default uses a Kamada-Kawai layout and spinglass community detection
/// with 16 spins, seeded from the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_format: InputFormat,
    pub layout: LayoutKind,
    pub communities: CommunityKind,
    /// Upper bound for the number of spinglass communities.
    pub spins: usize,
    /// Seed for all randomized algorithms, makes runs reproducible.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_format: InputFormat::Auto,
            layout: LayoutKind::KamadaKawai,
            communities: CommunityKind::Spinglass,
            spins: 16,
            seed: None,
        }
    }
}

impl Config {
    pub fn layout(&self) -> Box<dyn Layout> {
        match self.layout {
            LayoutKind::KamadaKawai => Box::new(KamadaKawai::default()),
            LayoutKind::FruchtermanReingold => Box::new(FruchtermanReingold {
                seed: self.seed,
                ..Default::default()
            }),
        }
    }

    pub fn detector(&self) -> Box<dyn CommunityDetector> {
        match self.communities {
            CommunityKind::Spinglass => Box::new(Spinglass {
                spins: self.spins,
                seed: self.seed,
                ..Default::default()
            }),
            CommunityKind::LabelPropagation => Box::new(LabelPropagation {
                seed: self.seed,
                ..Default::default()
            }),
        }
    }
}

/// Counts collected while running the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub input_nodes: usize,
    pub input_edges: usize,
    /// Nodes in the largest connected component.
    pub nodes: usize,
    /// Edges in the largest connected component, which is also the number
    /// of rows written.
    pub edges: usize,
    pub communities: usize,
}

/// Converts the graph at `input` into an edge CSV at `output`.
///
/// The output file is only created once all rows are known and written to a
/// temporary file next to it. If any step fails, `output` is left untouched.
pub fn run(input: &Path, output: &Path, config: &Config) -> Result<Summary> {
    let network = input::load(input, config.input_format)?;
    info!(
        "loaded graph with {} nodes and {} edges",
        network.node_count(),
        network.edge_count()
    );

    let giant = network.giant()?;
    info!(
        "largest connected component has {} nodes and {} edges",
        giant.node_count(),
        giant.edge_count()
    );

    let layout = config.layout();
    info!("computing {} layout", layout.name());
    let positions = normalize(&layout.compute(&giant)?);

    let detector = config.detector();
    info!("detecting communities with {}", detector.name());
    let clusters = detector.detect(&giant)?;
    let communities = community::community_count(&clusters);
    info!("found {} communities", communities);

    let rows = write_output(output, |writer| {
        export::write_edges(writer, &giant, &positions, &clusters)
    })?;
    info!("wrote {} rows to {:?}", rows, output);

    Ok(Summary {
        input_nodes: network.node_count(),
        input_edges: network.edge_count(),
        nodes: giant.node_count(),
        edges: rows,
        communities,
    })
}

fn write_output<F>(path: &Path, write: F) -> Result<usize>
where
    F: FnOnce(BufWriter<&mut File>) -> Result<usize>,
{
    // The temporary file must be on the same file system to be moved atomically
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode as `File::create`, the umask is applied when the file is opened
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temporary_file = builder.tempfile_in(directory)?;
    debug!("writing rows to {:?}", temporary_file.path());
    let rows = write(BufWriter::new(temporary_file.as_file_mut()))?;
    temporary_file.persist(path)?;
    Ok(rows)
}
