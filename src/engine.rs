use log::{debug, info, warn};
use ndarray::Array2;

use crate::assign::{assign, Assignment};
use crate::centroid::CentroidSet;
use crate::config::ClusterConfig;
use crate::convergence::{ConvergenceController, State};
use crate::distance::distance_matrix;
use crate::error::{ClusterError, EmptyCluster};
use crate::palette::color_for;
use crate::table::FeatureTable;
use crate::update::update;

/// Outcome of a clustering run: the table that was clustered, the terminal
/// centroids and everything derived from them.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// The table actually clustered (projected onto the configured features)
    pub table: FeatureTable,
    pub centroids: CentroidSet,
    pub assignment: Assignment,
    /// (n_rows, k) distances from each row to each centroid
    pub distances: Array2<f64>,
    /// Completed update/assignment cycles
    pub iterations: usize,
    pub empty_clusters: Vec<EmptyCluster>,
}

impl Clustering {
    pub fn k(&self) -> usize {
        self.centroids.k()
    }

    /// Display colour of every row, derived from its label.
    pub fn colors(&self) -> Vec<&'static str> {
        self.assignment
            .labels()
            .iter()
            .map(|&label| color_for(label))
            .collect()
    }

    /// Assign the rows of `table` to the nearest terminal centroid.
    pub fn predict(&self, table: &FeatureTable) -> Result<Assignment, ClusterError> {
        let table = table.project(self.table.schema().columns())?;
        let distances = distance_matrix(&table, &self.centroids, false)?;
        Ok(assign(&distances.view()))
    }
}

/// K-means over a [`FeatureTable`], driven until assignments stop changing.
///
/// # Example
///
/// ```
/// use position_kmeans::{ClusterConfig, FeatureTable, KMeans, Schema};
/// use ndarray::array;
///
/// let table = FeatureTable::from_array(
///     Schema::new(["drives per attempt"]).unwrap(),
///     vec!["a".into(), "b".into(), "c".into(), "d".into()],
///     array![[0.1], [0.12], [0.8], [0.82]],
/// )
/// .unwrap();
///
/// let clustering = KMeans::new(ClusterConfig::new(2)).fit(&table).unwrap();
/// assert_eq!(clustering.assignment.len(), 4);
/// assert_eq!(clustering.k(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    config: ClusterConfig,
}

impl KMeans {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Cluster `table` starting from seeded centroids.
    pub fn fit(&self, table: &FeatureTable) -> Result<Clustering, ClusterError> {
        self.config.validate()?;
        let table = self.select_features(table)?;
        let centroids = CentroidSet::initialize(&table, self.config.k, self.config.seed)?;
        self.run(table, centroids)
    }

    /// Cluster `table` starting from the given centroids. Their count overrides `k`.
    pub fn fit_from(
        &self,
        table: &FeatureTable,
        centroids: CentroidSet,
    ) -> Result<Clustering, ClusterError> {
        self.config.validate_run()?;
        let table = self.select_features(table)?;
        table
            .schema()
            .ensure_same(centroids.schema(), "starting centroids")?;
        if centroids.k() > table.nrows() {
            return Err(ClusterError::InvalidParameter(format!(
                "k ({}) exceeds the number of rows ({})",
                centroids.k(),
                table.nrows()
            )));
        }
        self.run(table, centroids)
    }

    fn select_features(&self, table: &FeatureTable) -> Result<FeatureTable, ClusterError> {
        match &self.config.features {
            Some(features) => table.project(features.as_slice()),
            None => Ok(table.clone()),
        }
    }

    fn run(
        &self,
        table: FeatureTable,
        mut centroids: CentroidSet,
    ) -> Result<Clustering, ClusterError> {
        let k = centroids.k();
        let parallel = self.config.parallel;
        info!(
            "Clustering {} rows x {} features into {} clusters",
            table.nrows(),
            table.ncols(),
            k
        );

        let mut distances = distance_matrix(&table, &centroids, parallel)?;
        let mut assignment = assign(&distances.view());
        debug!("Initial cluster sizes {:?}", assignment.cluster_sizes(k));

        let mut controller = ConvergenceController::new(self.config.max_iters);
        let mut empty_clusters = Vec::new();

        while controller.state() == State::Running {
            if controller.exhausted() {
                warn!(
                    "No convergence after {} iterations",
                    controller.iterations()
                );
                return Err(ClusterError::NonConvergence {
                    iterations: controller.iterations(),
                    partial: Box::new(Clustering {
                        table,
                        centroids,
                        assignment,
                        distances,
                        iterations: controller.iterations(),
                        empty_clusters,
                    }),
                });
            }
            let iteration = controller.iterations() + 1;

            for cluster in update(&table, &assignment, &mut centroids)? {
                let event = EmptyCluster { iteration, cluster };
                warn!("{}", event);
                empty_clusters.push(event);
            }

            distances = distance_matrix(&table, &centroids, parallel)?;
            let next = assign(&distances.view());
            debug!(
                "Iteration {}: {} rows changed cluster, sizes {:?}",
                iteration,
                next.changed_from(&assignment),
                next.cluster_sizes(k)
            );

            controller.record(&assignment, &next);
            assignment = next;
        }

        info!("Converged after {} iterations", controller.iterations());
        Ok(Clustering {
            table,
            centroids,
            assignment,
            distances,
            iterations: controller.iterations(),
            empty_clusters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn line_table(values: &[f64]) -> FeatureTable {
        FeatureTable::from_array(
            Schema::new(["x"]).unwrap(),
            (0..values.len()).map(|i| format!("p{}", i)).collect(),
            Array2::from_shape_vec((values.len(), 1), values.to_vec()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_two_groups_from_given_centroids() {
        let table = line_table(&[0.0, 0.0, 10.0, 10.0]);
        let start = CentroidSet::from_points(table.schema().clone(), vec![vec![1.0], vec![9.0]])
            .unwrap();

        let clustering = KMeans::new(ClusterConfig::new(2))
            .fit_from(&table, start)
            .unwrap();

        assert_eq!(clustering.assignment.labels(), [0, 0, 1, 1]);
        assert_relative_eq!(clustering.centroids.get(0).values[0], 0.0);
        assert_relative_eq!(clustering.centroids.get(1).values[0], 10.0);
        assert!(clustering.iterations <= 2);
        assert!(clustering.empty_clusters.is_empty());
    }

    #[test]
    fn test_identical_rows_converge_in_one_cycle() {
        let table = FeatureTable::from_array(
            Schema::new(["x", "y"]).unwrap(),
            (0..5).map(|i| i.to_string()).collect(),
            Array2::from_elem((5, 2), 3.5),
        )
        .unwrap();

        let clustering = KMeans::new(ClusterConfig::new(2)).fit(&table).unwrap();

        assert_eq!(clustering.iterations, 1);
        assert!(clustering.assignment.labels().iter().all(|&l| l == 0));
        // cluster 1 never gets a member and stays where it started
        assert_eq!(
            clustering.empty_clusters,
            vec![EmptyCluster {
                iteration: 1,
                cluster: 1
            }]
        );
        assert_eq!(clustering.centroids.get(1).values, array![3.5, 3.5]);
    }

    #[test]
    fn test_empty_cluster_holds_position() {
        let table = line_table(&[0.0, 1.0, 2.0]);
        let start =
            CentroidSet::from_points(table.schema().clone(), vec![vec![0.5], vec![100.0]])
                .unwrap();

        let clustering = KMeans::new(ClusterConfig::new(2))
            .fit_from(&table, start)
            .unwrap();

        assert_eq!(clustering.centroids.get(1).values[0], 100.0);
        assert_relative_eq!(clustering.centroids.get(0).values[0], 1.0);
        assert!(!clustering.empty_clusters.is_empty());
    }

    #[test]
    fn test_cluster_emptied_mid_run_holds_position() {
        // cluster 0 starts with rows 0.0 and 10.0; after the first update
        // its neighbours move closer to both and take them over
        let table = line_table(&[-7.0, -1.0, 0.0, 10.0, 11.0, 17.0]);
        let start = CentroidSet::from_points(
            table.schema().clone(),
            vec![vec![4.9], vec![-6.0], vec![16.0]],
        )
        .unwrap();

        let clustering = KMeans::new(ClusterConfig::new(3))
            .fit_from(&table, start)
            .unwrap();

        assert_eq!(clustering.assignment.labels(), [1, 1, 1, 2, 2, 2]);
        assert_eq!(clustering.assignment.cluster_sizes(3), vec![0, 3, 3]);
        assert_eq!(
            clustering.empty_clusters,
            vec![EmptyCluster {
                iteration: 2,
                cluster: 0
            }]
        );
        // mean of its last members, 0.0 and 10.0
        assert_eq!(clustering.centroids.get(0).values[0], 5.0);
        assert_eq!(clustering.iterations, 2);
    }

    #[test]
    fn test_fit_from_ignores_config_k() {
        let table = line_table(&[0.0, 0.0, 10.0, 10.0]);
        let start = CentroidSet::from_points(table.schema().clone(), vec![vec![1.0], vec![9.0]])
            .unwrap();

        let clustering = KMeans::new(ClusterConfig::new(0))
            .fit_from(&table, start)
            .unwrap();
        assert_eq!(clustering.k(), 2);
    }

    #[test]
    fn test_fit_on_column_spanning_f64_range() {
        let table = line_table(&[-1e308, 1e308]);
        let clustering = KMeans::new(ClusterConfig::new(2)).fit(&table).unwrap();
        assert_eq!(clustering.assignment.len(), 2);
        assert!(clustering.centroids.points().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_k_larger_than_rows_is_invalid() {
        let table = line_table(&[0.0, 1.0]);
        let result = KMeans::new(ClusterConfig::new(3)).fit(&table);
        assert!(matches!(result, Err(ClusterError::InvalidParameter(_))));
    }

    #[test]
    fn test_non_convergence_exposes_partial_result() {
        // the first cycle moves row 2 from cluster 0 to cluster 1, so a cap of
        // one cycle is not enough to observe a stable assignment
        let table = line_table(&[0.0, 1.0, 7.0, 10.0]);
        let start =
            CentroidSet::from_points(table.schema().clone(), vec![vec![6.0], vec![10.0]])
                .unwrap();

        let result = KMeans::new(ClusterConfig::new(2).with_max_iters(1)).fit_from(&table, start);

        match result {
            Err(ClusterError::NonConvergence {
                iterations,
                partial,
            }) => {
                assert_eq!(iterations, 1);
                assert_eq!(partial.assignment.labels(), [0, 0, 1, 1]);
                assert_eq!(partial.iterations, 1);
            }
            other => panic!("expected NonConvergence, got {:?}", other.map(|c| c.iterations)),
        }
    }

    #[test]
    fn test_predict_reproduces_final_assignment() {
        let table = line_table(&[0.0, 0.5, 4.0, 9.0, 9.5, 10.0]);
        let clustering = KMeans::new(ClusterConfig::new(2).with_seed(3))
            .fit(&table)
            .unwrap();

        assert_eq!(clustering.predict(&table).unwrap(), clustering.assignment);
        assert_eq!(clustering.colors().len(), 6);
    }

    #[test]
    fn test_feature_selection() {
        let table = FeatureTable::from_array(
            Schema::new(["noise", "x"]).unwrap(),
            (0..4).map(|i| i.to_string()).collect(),
            array![[50.0, 0.0], [-50.0, 0.1], [50.0, 5.0], [-50.0, 5.1]],
        )
        .unwrap();
        let start = CentroidSet::from_points(
            Schema::new(["x"]).unwrap(),
            vec![vec![0.0], vec![5.0]],
        )
        .unwrap();

        let clustering = KMeans::new(ClusterConfig::new(2).with_features(["x"]))
            .fit_from(&table, start)
            .unwrap();

        assert_eq!(clustering.table.schema().columns(), ["x"]);
        assert_eq!(clustering.assignment.labels(), [0, 0, 1, 1]);
    }
}
