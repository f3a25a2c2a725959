//main.rs
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use position_kmeans::output::{write_centroids_tsv, write_labeled_tsv};
use position_kmeans::{ClusterConfig, ClusterError, FeatureTable, KMeans};

#[derive(Parser)]
#[clap(version = "0.3.0", author = "Stefan L. <stefan.lang@med.lu.se>")]
struct Opts {
    /// Tab separated player table: key column followed by numeric features
    #[clap(short, long)]
    file: String,

    /// Number of clusters
    #[clap(short, long)]
    k: usize,

    /// Labeled table output (TSV)
    #[clap(short, long)]
    outfile: String,

    /// Optional centroid output (TSV)
    #[clap(short, long)]
    centroids: Option<String>,

    /// Comma separated feature columns to cluster on (default: all)
    #[clap(long, value_delimiter = ',')]
    features: Option<Vec<String>>,

    #[clap(long, default_value_t = 200)]
    seed: u64,

    #[clap(long, default_value_t = 300)]
    max_iters: usize,

    /// Compute distances on a single thread
    #[clap(long)]
    serial: bool,

    /// Write the last labeling even if the iteration cap is hit
    #[clap(long)]
    accept_partial: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));
    let opts = Opts::parse();

    let table = FeatureTable::from_tsv(&opts.file)?;
    info!(
        "Loaded {} rows × {} columns",
        table.nrows(),
        table.ncols()
    );

    let mut config = ClusterConfig::new(opts.k)
        .with_seed(opts.seed)
        .with_max_iters(opts.max_iters)
        .with_parallel(!opts.serial);
    if let Some(features) = opts.features {
        config = config.with_features(features);
    }

    let clustering = match KMeans::new(config).fit(&table) {
        Ok(clustering) => clustering,
        Err(ClusterError::NonConvergence {
            iterations,
            partial,
        }) if opts.accept_partial => {
            warn!(
                "Writing best-effort labeling after {} iterations without convergence",
                iterations
            );
            *partial
        }
        Err(e) => return Err(e.into()),
    };

    write_labeled_tsv(&opts.outfile, &clustering)?;
    if let Some(path) = &opts.centroids {
        write_centroids_tsv(path, &clustering.centroids)?;
    }

    info!(
        "Assigned {} players into {} clusters (sizes {:?}) after {} iterations",
        clustering.assignment.len(),
        clustering.k(),
        clustering.assignment.cluster_sizes(clustering.k()),
        clustering.iterations
    );

    Ok(())
}
