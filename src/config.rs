use crate::error::ClusterError;

/// Configuration for a clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Number of clusters
    pub k: usize,

    /// Ordered feature columns to cluster on. `None` uses every column of the table.
    pub features: Option<Vec<String>>,

    /// Seed for centroid initialization
    pub seed: u64,

    /// Maximum number of update/assignment cycles before giving up
    pub max_iters: usize,

    /// Spread the distance computation over the rayon thread pool
    pub parallel: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: 3,
            features: None,
            seed: 200,
            max_iters: 300,
            parallel: true,
        }
    }
}

impl ClusterConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Restrict clustering to these columns, in this order
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that do not need the table.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.k == 0 {
            return Err(ClusterError::InvalidParameter(
                "k must be greater than 0".to_string(),
            ));
        }
        self.validate_run()
    }

    /// Checks on everything but `k`, for runs whose centroids are supplied.
    pub fn validate_run(&self) -> Result<(), ClusterError> {
        if self.max_iters == 0 {
            return Err(ClusterError::InvalidParameter(
                "max_iters must be greater than 0".to_string(),
            ));
        }
        if let Some(features) = &self.features {
            if features.is_empty() {
                return Err(ClusterError::InvalidParameter(
                    "feature list must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
