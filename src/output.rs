//! TSV writers handing a finished clustering to plotting/reporting tools.

use std::path::Path;

use csv::WriterBuilder;

use crate::centroid::CentroidSet;
use crate::engine::Clustering;
use crate::error::ClusterError;
use crate::palette::color_for;

/// Write one line per row: key, feature values, `cluster`, `color` and
/// `distance_<i>` for every centroid.
pub fn write_labeled_tsv<P: AsRef<Path>>(
    path: P,
    clustering: &Clustering,
) -> Result<(), ClusterError> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    let table = &clustering.table;

    let mut header = vec!["key".to_string()];
    header.extend(table.schema().columns().iter().cloned());
    header.push("cluster".to_string());
    header.push("color".to_string());
    header.extend((0..clustering.k()).map(|i| format!("distance_{}", i)));
    wtr.write_record(&header)?;

    for (r, row) in table.rows().enumerate() {
        let label = clustering.assignment.labels()[r];
        let mut record = vec![row.key.to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        record.push(label.to_string());
        record.push(color_for(label).to_string());
        record.extend(clustering.distances.row(r).iter().map(|d| d.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write one line per centroid: `cluster`, `color` and its feature values.
pub fn write_centroids_tsv<P: AsRef<Path>>(
    path: P,
    centroids: &CentroidSet,
) -> Result<(), ClusterError> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_path(path)?;

    let mut header = vec!["cluster".to_string(), "color".to_string()];
    header.extend(centroids.schema().columns().iter().cloned());
    wtr.write_record(&header)?;

    for centroid in centroids.iter() {
        let mut record = vec![
            centroid.index.to_string(),
            color_for(centroid.index).to_string(),
        ];
        record.extend(centroid.values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
