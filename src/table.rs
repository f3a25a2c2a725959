use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::ClusterError;
use crate::schema::Schema;

/// One entity (player) as handed over by the acquisition side:
/// an entity key and an ordered feature-name -> value mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub key: String,
    pub values: Vec<(String, f64)>,
}

impl FeatureRow {
    pub fn new<K: Into<String>>(key: K, values: Vec<(String, f64)>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

/// Borrowed view of a single table row, used by the distance evaluator.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    pub key: &'a str,
    pub schema: &'a Schema,
    pub values: ArrayView1<'a, f64>,
}

/// A dense numeric dataset: rows are entities, columns are the features of `schema`.
///
/// Shape and feature values are fixed once constructed. Cluster labels,
/// per-centroid distances and colours live on [`Clustering`](crate::Clustering),
/// never in here, so they cannot leak into distance computation.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    schema: Schema,
    keys: Vec<String>,
    data: Array2<f64>,
}

impl FeatureTable {
    /// Build a table from an `(n_rows, schema.len())` array and one key per row.
    pub fn from_array(
        schema: Schema,
        keys: Vec<String>,
        data: Array2<f64>,
    ) -> Result<Self, ClusterError> {
        if data.nrows() == 0 {
            return Err(ClusterError::InvalidParameter(
                "feature table has no rows".to_string(),
            ));
        }
        if data.ncols() != schema.len() {
            return Err(ClusterError::SchemaMismatch(format!(
                "data has {} columns but schema {} has {}",
                data.ncols(),
                schema,
                schema.len()
            )));
        }
        if keys.len() != data.nrows() {
            return Err(ClusterError::SchemaMismatch(format!(
                "{} keys given for {} rows",
                keys.len(),
                data.nrows()
            )));
        }

        let mut seen = HashSet::with_capacity(keys.len());
        for key in &keys {
            if !seen.insert(key.as_str()) {
                return Err(ClusterError::SchemaMismatch(format!(
                    "duplicate entity key '{}'",
                    key
                )));
            }
        }

        for ((r, c), value) in data.indexed_iter() {
            if !value.is_finite() {
                return Err(ClusterError::SchemaMismatch(format!(
                    "row '{}' has non-finite value {} in column '{}'",
                    keys[r],
                    value,
                    schema.columns()[c]
                )));
            }
        }

        Ok(Self { schema, keys, data })
    }

    /// Build a table from keyed rows. Each row must carry exactly the schema's
    /// columns; values are re-ordered into schema order.
    pub fn from_rows(schema: Schema, rows: Vec<FeatureRow>) -> Result<Self, ClusterError> {
        let n_rows = rows.len();
        let n_cols = schema.len();
        let mut data = Array2::zeros((n_rows, n_cols));
        let mut keys = Vec::with_capacity(n_rows);

        for (r, row) in rows.into_iter().enumerate() {
            if row.values.len() != n_cols {
                return Err(ClusterError::SchemaMismatch(format!(
                    "row '{}' has {} values but schema {} has {}",
                    row.key,
                    row.values.len(),
                    schema,
                    n_cols
                )));
            }

            let mut filled = vec![false; n_cols];
            for (name, value) in &row.values {
                let c = schema.index_of(name).ok_or_else(|| {
                    ClusterError::SchemaMismatch(format!(
                        "row '{}' has unknown column '{}'",
                        row.key, name
                    ))
                })?;
                if filled[c] {
                    return Err(ClusterError::SchemaMismatch(format!(
                        "row '{}' sets column '{}' twice",
                        row.key, name
                    )));
                }
                filled[c] = true;
                data[[r, c]] = *value;
            }
            keys.push(row.key);
        }

        Self::from_array(schema, keys, data)
    }

    /// Read a tab separated file: header row, first column is the entity key,
    /// every further column is a numeric feature.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self, ClusterError> {
        let file = File::open(&path)?;

        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(file);

        let headers = rdr.headers()?.clone();
        let schema = Schema::new(headers.iter().skip(1).map(str::to_string))?;

        let mut keys = Vec::new();
        let mut flat = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            let mut cells = record.iter();
            let key = cells.next().unwrap_or_default().to_string();

            let mut n_values = 0;
            for (c, cell) in cells.enumerate() {
                let value = cell.trim().parse::<f64>().map_err(|_| {
                    ClusterError::SchemaMismatch(format!(
                        "record {} ('{}'): cannot parse '{}' in column '{}'",
                        i,
                        key,
                        cell,
                        headers.get(c + 1).unwrap_or("?")
                    ))
                })?;
                flat.push(value);
                n_values += 1;
            }
            if n_values != schema.len() {
                return Err(ClusterError::SchemaMismatch(format!(
                    "record {} ('{}') has {} values, expected {}",
                    i,
                    key,
                    n_values,
                    schema.len()
                )));
            }
            keys.push(key);
        }

        if keys.is_empty() {
            return Err(ClusterError::InvalidParameter(format!(
                "no data lines found in {:?}",
                path.as_ref()
            )));
        }

        let data = Array2::from_shape_vec((keys.len(), schema.len()), flat).map_err(|e| {
            ClusterError::SchemaMismatch(format!("cannot shape table: {}", e))
        })?;
        Self::from_array(schema, keys, data)
    }

    /// A new table restricted to `columns`, in that order.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self, ClusterError> {
        let schema = Schema::new(columns.iter().map(|c| c.as_ref().to_string()))?;
        let indices = columns
            .iter()
            .map(|c| {
                self.schema.index_of(c.as_ref()).ok_or_else(|| {
                    ClusterError::SchemaMismatch(format!(
                        "unknown feature column '{}' (table has {})",
                        c.as_ref(),
                        self.schema
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            schema,
            keys: self.keys.clone(),
            data: self.data.select(Axis(1), &indices),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn row(&self, index: usize) -> RowView<'_> {
        RowView {
            key: &self.keys[index],
            schema: &self.schema,
            values: self.data.row(index),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        (0..self.nrows()).map(move |i| self.row(i))
    }

    /// Observed (min, max) of every feature column.
    pub fn column_ranges(&self) -> Vec<(f64, f64)> {
        self.data
            .columns()
            .into_iter()
            .map(|col| {
                col.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
            })
            .collect()
    }
}
