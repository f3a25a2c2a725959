use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::centroid::{Centroid, CentroidSet};
use crate::error::ClusterError;
use crate::schema::Schema;
use crate::table::{FeatureTable, RowView};

/// Euclidean distance between a row and a centroid over `schema`.
///
/// Fails with `SchemaMismatch` unless both the row and the centroid carry
/// exactly `schema`.
pub fn distance(
    row: &RowView<'_>,
    centroid: &Centroid<'_>,
    schema: &Schema,
) -> Result<f64, ClusterError> {
    schema.ensure_same(row.schema, &format!("row '{}'", row.key))?;
    schema.ensure_same(centroid.schema, &format!("centroid {}", centroid.index))?;
    Ok(euclidean(&row.values, &centroid.values))
}

/// sqrt(sum((a - b)^2)), summed in column order.
#[inline]
pub fn euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Distances from every row to every centroid, shape (n_rows, k).
///
/// Entry `[r, i]` is the distance from row `r` to centroid `i`. With
/// `parallel` set the rows are spread over the rayon pool; every cell is
/// computed independently, so the result is identical to the serial path.
pub fn distance_matrix(
    table: &FeatureTable,
    centroids: &CentroidSet,
    parallel: bool,
) -> Result<Array2<f64>, ClusterError> {
    table
        .schema()
        .ensure_same(centroids.schema(), "centroid set")?;

    let data = table.data();
    let points = centroids.points();
    let k = centroids.k();
    let mut flat = vec![0.0f64; table.nrows() * k];

    // one chunk of k cells per row
    let fill = |(r, out): (usize, &mut [f64])| {
        let row = data.row(r);
        for (d, centroid) in out.iter_mut().zip(points.rows()) {
            *d = euclidean(&row, &centroid);
        }
    };
    if parallel {
        flat.par_chunks_mut(k).enumerate().for_each(fill);
    } else {
        flat.chunks_mut(k).enumerate().for_each(fill);
    }

    Array2::from_shape_vec((table.nrows(), k), flat).map_err(|e| {
        ClusterError::SchemaMismatch(format!("cannot shape distance matrix: {}", e))
    })
}
