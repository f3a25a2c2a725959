use ndarray::ArrayView2;

/// Per-row cluster labels, in table row order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment(Vec<usize>);

impl Assignment {
    pub fn new(labels: Vec<usize>) -> Self {
        Self(labels)
    }

    pub fn labels(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rows assigned to each of the k clusters.
    pub fn cluster_sizes(&self, k: usize) -> Vec<usize> {
        let mut sizes = vec![0usize; k];
        for &label in &self.0 {
            sizes[label] += 1;
        }
        sizes
    }

    /// Row indices assigned to `cluster`, ascending.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == cluster)
            .map(|(row, _)| row)
            .collect()
    }

    /// How many rows carry a different label in `other`.
    pub fn changed_from(&self, other: &Assignment) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

/// Label every row with its nearest centroid.
///
/// `distances` is the (n_rows, k) matrix from
/// [`distance_matrix`](crate::distance_matrix). Ties go to the lowest
/// centroid index.
pub fn assign(distances: &ArrayView2<f64>) -> Assignment {
    let labels = distances
        .rows()
        .into_iter()
        .map(|row| {
            let mut best_cluster = 0;
            let mut best_dist = f64::INFINITY;
            for (ci, &dist) in row.iter().enumerate() {
                if dist < best_dist {
                    best_dist = dist;
                    best_cluster = ci;
                }
            }
            best_cluster
        })
        .collect();

    Assignment(labels)
}
