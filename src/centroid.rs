use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::ClusterError;
use crate::schema::Schema;
use crate::table::FeatureTable;

/// Borrowed view of one centroid.
#[derive(Debug, Clone, Copy)]
pub struct Centroid<'a> {
    pub index: usize,
    pub schema: &'a Schema,
    pub values: ArrayView1<'a, f64>,
}

/// Exactly k centroids over a feature schema, mutated in place by the update step.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidSet {
    schema: Schema,
    points: Array2<f64>,
}

impl CentroidSet {
    /// Draw k centroids for `table`, each coordinate uniformly from the
    /// observed [min, max] of its column.
    ///
    /// Uses `ChaCha8Rng` seeded with `seed`: the same table, k and seed always
    /// give the same centroids.
    pub fn initialize(table: &FeatureTable, k: usize, seed: u64) -> Result<Self, ClusterError> {
        if k == 0 {
            return Err(ClusterError::InvalidParameter(
                "k must be greater than 0".to_string(),
            ));
        }
        if k > table.nrows() {
            return Err(ClusterError::InvalidParameter(format!(
                "k ({}) exceeds the number of rows ({})",
                k,
                table.nrows()
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let samplers: Vec<ColumnSampler> = table
            .column_ranges()
            .into_iter()
            .map(|(lo, hi)| ColumnSampler::new(lo, hi))
            .collect();

        let mut points = Array2::zeros((k, table.ncols()));
        for i in 0..k {
            for (j, sampler) in samplers.iter().enumerate() {
                points[[i, j]] = sampler.sample(&mut rng);
            }
        }

        Ok(Self {
            schema: table.schema().clone(),
            points,
        })
    }

    /// Explicit starting positions, one inner vector per centroid.
    pub fn from_points(schema: Schema, points: Vec<Vec<f64>>) -> Result<Self, ClusterError> {
        if points.is_empty() {
            return Err(ClusterError::InvalidParameter(
                "k must be greater than 0".to_string(),
            ));
        }

        let k = points.len();
        let d = schema.len();
        let mut flat = Vec::with_capacity(k * d);
        for (i, point) in points.into_iter().enumerate() {
            if point.len() != d {
                return Err(ClusterError::SchemaMismatch(format!(
                    "centroid {} has {} values but schema {} has {}",
                    i,
                    point.len(),
                    schema,
                    d
                )));
            }
            if let Some(c) = point.iter().position(|v| !v.is_finite()) {
                return Err(ClusterError::SchemaMismatch(format!(
                    "centroid {} has non-finite value {} in column '{}'",
                    i,
                    point[c],
                    schema.columns()[c]
                )));
            }
            flat.extend(point);
        }

        let points = Array2::from_shape_vec((k, d), flat).map_err(|e| {
            ClusterError::SchemaMismatch(format!("cannot shape centroids: {}", e))
        })?;
        Ok(Self { schema, points })
    }

    pub fn k(&self) -> usize {
        self.points.nrows()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, index: usize) -> Centroid<'_> {
        Centroid {
            index,
            schema: &self.schema,
            values: self.points.row(index),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Centroid<'_>> + '_ {
        (0..self.k()).map(move |i| self.get(i))
    }

    /// All centroids as a (k, n_features) array.
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    pub(crate) fn set(&mut self, index: usize, values: Array1<f64>) {
        self.points.row_mut(index).assign(&values);
    }
}

/// Uniform draw over one column's observed [lo, hi].
enum ColumnSampler {
    /// every row shares one value
    Constant(f64),
    Range(Uniform<f64>),
    /// `hi - lo` overflows f64; interpolate from a unit draw instead
    Wide { lo: f64, hi: f64, unit: Uniform<f64> },
}

impl ColumnSampler {
    fn new(lo: f64, hi: f64) -> Self {
        if lo >= hi {
            ColumnSampler::Constant(lo)
        } else if (hi - lo).is_finite() {
            ColumnSampler::Range(Uniform::new_inclusive(lo, hi))
        } else {
            ColumnSampler::Wide {
                lo,
                hi,
                unit: Uniform::new_inclusive(0.0, 1.0),
            }
        }
    }

    fn sample(&self, rng: &mut ChaCha8Rng) -> f64 {
        match self {
            ColumnSampler::Constant(value) => *value,
            ColumnSampler::Range(dist) => dist.sample(rng),
            ColumnSampler::Wide { lo, hi, unit } => {
                let u = unit.sample(rng);
                (lo * (1.0 - u) + hi * u).clamp(*lo, *hi)
            }
        }
    }
}
