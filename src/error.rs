use thiserror::Error;

use crate::engine::Clustering;

/// Error types for the clustering engine
#[derive(Error, Debug)]
pub enum ClusterError {
    /// k out of range, empty schema, empty table or a zero iteration cap
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A row, centroid or column list does not conform to the feature schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The iteration cap was reached before assignments stabilized.
    /// `partial` holds the last computed labeling for inspection.
    #[error("No convergence after {iterations} iterations")]
    NonConvergence {
        iterations: usize,
        partial: Box<Clustering>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A cluster that received no rows during an update step.
///
/// Not fatal: the centroid keeps its previous position and the event is
/// recorded on the result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cluster {cluster} has no members in iteration {iteration}, holding previous position")]
pub struct EmptyCluster {
    pub iteration: usize,
    pub cluster: usize,
}
