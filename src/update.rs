use ndarray::{Array1, Array2};

use crate::assign::Assignment;
use crate::centroid::CentroidSet;
use crate::error::ClusterError;
use crate::table::FeatureTable;

/// Move every centroid to the column-wise mean of its assigned rows.
///
/// A centroid with no assigned rows keeps its previous position. Returns the
/// indices of those empty clusters, ascending.
pub fn update(
    table: &FeatureTable,
    assignment: &Assignment,
    centroids: &mut CentroidSet,
) -> Result<Vec<usize>, ClusterError> {
    table
        .schema()
        .ensure_same(centroids.schema(), "centroid set")?;
    if assignment.len() != table.nrows() {
        return Err(ClusterError::SchemaMismatch(format!(
            "assignment covers {} rows, table has {}",
            assignment.len(),
            table.nrows()
        )));
    }

    let k = centroids.k();
    let mut sums = Array2::<f64>::zeros((k, table.ncols()));
    let mut counts = vec![0usize; k];

    for (row, &label) in table.data().rows().into_iter().zip(assignment.labels()) {
        if label >= k {
            return Err(ClusterError::InvalidParameter(format!(
                "label {} out of range for k = {}",
                label, k
            )));
        }
        let mut sum = sums.row_mut(label);
        sum += &row;
        counts[label] += 1;
    }

    let mut empty = Vec::new();
    for (ci, (sum, &count)) in sums.rows().into_iter().zip(&counts).enumerate() {
        if count > 0 {
            let mean: Array1<f64> = sum.mapv(|x| x / count as f64);
            centroids.set(ci, mean);
        } else {
            empty.push(ci);
        }
    }

    Ok(empty)
}
