use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("GML syntax error in line {line}: {message}")]
    GmlSyntax { line: usize, message: String },
    #[error("invalid GML graph: {0}")]
    GmlStructure(String),
    #[error("invalid edge list record in line {line}: {message}")]
    EdgeListRecord { line: u64, message: String },
    #[error("graph has no nodes")]
    EmptyGraph,
    #[error("graph is not connected, {0} requires a connected graph")]
    Disconnected(&'static str),
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },
    #[error("expected {expected} {what} (one per node), but got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    PersistingTemporaryFile(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;
