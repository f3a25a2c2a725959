use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use ndarray::Array2;

use crate::error::ClusterError;
use crate::schema::Schema;
use crate::table::FeatureTable;

/// Per-feature source: entity key -> value.
pub type FeatureSource = BTreeMap<String, f64>;

/// Assembles a [`FeatureTable`] from independent per-feature sources.
///
/// Every source is keyed by entity (player id). Rows are only built once all
/// sources are known, after their key sets have been aligned, so a column can
/// never silently be matched to the wrong player.
#[derive(Debug, Default)]
pub struct FeatureTableBuilder {
    columns: Vec<(String, FeatureSource)>,
}

impl FeatureTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature column. A later column with the same name is rejected at build time.
    pub fn column<N, I, K>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let source = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.columns.push((name.into(), source));
        self
    }

    /// Build over the keys present in every source. Keys missing from any
    /// source are dropped (and logged).
    pub fn build(self) -> Result<FeatureTable, ClusterError> {
        let keys = self.common_keys();
        for (name, source) in &self.columns {
            let dropped = source.len() - keys.len();
            if dropped > 0 {
                warn!(
                    "Column '{}': dropping {} of {} keys not present in every source",
                    name,
                    dropped,
                    source.len()
                );
            }
        }
        self.assemble(keys)
    }

    /// Build only if every source has exactly the same key set.
    pub fn build_strict(self) -> Result<FeatureTable, ClusterError> {
        if let Some((first_name, first)) = self.columns.first() {
            for (name, source) in &self.columns[1..] {
                if !source.keys().eq(first.keys()) {
                    return Err(ClusterError::SchemaMismatch(format!(
                        "column '{}' covers {} keys, column '{}' covers a different set of {}",
                        first_name,
                        first.len(),
                        name,
                        source.len()
                    )));
                }
            }
        }
        let keys = self.common_keys();
        self.assemble(keys)
    }

    fn common_keys(&self) -> BTreeSet<String> {
        let mut iter = self.columns.iter();
        let mut keys: BTreeSet<String> = match iter.next() {
            Some((_, source)) => source.keys().cloned().collect(),
            None => return BTreeSet::new(),
        };
        for (_, source) in iter {
            keys.retain(|k| source.contains_key(k));
        }
        keys
    }

    fn assemble(self, keys: BTreeSet<String>) -> Result<FeatureTable, ClusterError> {
        let schema = Schema::new(self.columns.iter().map(|(name, _)| name.clone()))?;
        if keys.is_empty() {
            return Err(ClusterError::InvalidParameter(
                "feature sources share no entity keys".to_string(),
            ));
        }

        let mut data = Array2::zeros((keys.len(), schema.len()));
        for (c, (_, source)) in self.columns.iter().enumerate() {
            for (r, key) in keys.iter().enumerate() {
                data[[r, c]] = source[key];
            }
        }

        debug!(
            "Assembled feature table: {} rows x {} columns",
            keys.len(),
            schema.len()
        );
        FeatureTable::from_array(schema, keys.into_iter().collect(), data)
    }
}

/// Derive a ratio source (e.g. drives per field goal attempt).
///
/// Keys whose denominator is missing or not positive are excluded.
pub fn ratio_column(numerators: &FeatureSource, denominators: &FeatureSource) -> FeatureSource {
    numerators
        .iter()
        .filter_map(|(key, &num)| match denominators.get(key) {
            Some(&den) if den > 0.0 => Some((key.clone(), num / den)),
            _ => None,
        })
        .collect()
}
