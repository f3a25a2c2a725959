//! # position_kmeans
//!
//! Groups basketball players into unlabeled positional clusters from
//! per-player tracking statistics (drives, catch-and-shoots, post-ups,
//! passes, speed, rebound chances, ...).
//!
//! The crate is the clustering engine: a [`FeatureTable`] of players goes in,
//! a [`Clustering`] with labels, terminal centroids and per-centroid distances
//! comes out. Runs are reproducible: the same table, `k`, seed and iteration
//! cap always produce the same result.
//!
//! ## Example
//!
//! ```rust
//! use position_kmeans::{ratio_column, ClusterConfig, FeatureSource, FeatureTableBuilder, KMeans};
//!
//! let fga: FeatureSource = [("201939", 20.0), ("203507", 18.0), ("1628983", 10.0)]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v))
//!     .collect();
//! let drives: FeatureSource = [("201939", 5.0), ("203507", 14.0), ("1628983", 9.0)]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v))
//!     .collect();
//! let passes_per_min = [("201939", 1.9), ("203507", 1.2), ("1628983", 0.8)];
//!
//! let table = FeatureTableBuilder::new()
//!     .column("drives per attempt", ratio_column(&drives, &fga))
//!     .column("passes made per minute", passes_per_min)
//!     .build()
//!     .unwrap();
//!
//! let clustering = KMeans::new(ClusterConfig::new(2).with_seed(7))
//!     .fit(&table)
//!     .unwrap();
//! assert_eq!(clustering.assignment.len(), 3);
//! ```

mod assign;
mod builder;
mod centroid;
mod config;
mod convergence;
mod distance;
mod engine;
mod error;
mod palette;
mod schema;
mod table;
mod update;

pub mod output;

pub use assign::{assign, Assignment};
pub use builder::{ratio_column, FeatureSource, FeatureTableBuilder};
pub use centroid::{Centroid, CentroidSet};
pub use config::ClusterConfig;
pub use convergence::{ConvergenceController, State};
pub use distance::{distance, distance_matrix, euclidean};
pub use engine::{Clustering, KMeans};
pub use error::{ClusterError, EmptyCluster};
pub use palette::color_for;
pub use schema::Schema;
pub use table::{FeatureRow, FeatureTable, RowView};
pub use update::update;
