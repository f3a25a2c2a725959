use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ClusterError;

/// The ordered list of numeric feature columns used in distance computation.
///
/// Shared between a [`FeatureTable`](crate::FeatureTable) and the
/// [`CentroidSet`](crate::CentroidSet) built from it; cloning is cheap.
#[derive(Clone)]
pub struct Schema(Arc<[String]>);

impl Schema {
    /// Build a schema from column names. Fails on an empty list or duplicate names.
    pub fn new<I, S>(columns: I) -> Result<Self, ClusterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ClusterError::InvalidParameter(
                "feature schema must contain at least one column".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(ClusterError::InvalidParameter(format!(
                    "duplicate feature column '{}'",
                    name
                )));
            }
        }

        Ok(Self(columns.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: `Schema::new` rejects an empty column list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c == name)
    }

    /// Fail with `SchemaMismatch` unless `other` is the same ordered column list.
    pub fn ensure_same(&self, other: &Schema, what: &str) -> Result<(), ClusterError> {
        if self == other {
            Ok(())
        } else {
            Err(ClusterError::SchemaMismatch(format!(
                "{} has columns {} but expected {}",
                what, other, self
            )))
        }
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Schema {}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
