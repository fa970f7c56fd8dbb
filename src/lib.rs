#![doc = include_str!("../README.md")]
use thiserror::Error;

pub mod config;
pub mod edge;
pub mod graph;
pub mod node;
pub mod parser;
pub mod writer;

pub use config::{Config, Fixtures};
pub use edge::Edge;
pub use graph::{BuildReport, Builder, Graph, RejectedRow};
pub use node::{Dbxrefs, Node, NodeType};
pub use parser::{Level, Row, RowEntity};

/// Separator used to join multiple values inside a single OWLNETS column
/// and to split multi-valued dbxref cells of the source table
pub const VALUE_SEPARATOR: char = '|';

const DEFAULT_NUM_NODES: usize = 256;
const DEFAULT_NUM_DBXREFS: usize = 2;

/// Errors of the crosswalk to OWLNETS conversion
#[derive(Error, Debug)]
pub enum OwlnetsError {
    /// A row lacks a required identifier
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    /// A required configuration value is absent or blank
    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),
    /// The configuration file cannot be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The source table cannot be opened or parsed
    #[error("source table unavailable: {0}")]
    SourceUnavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shortcut for `Result<T, OwlnetsError>`
pub type OwlnetsResult<T> = Result<T, OwlnetsError>;
