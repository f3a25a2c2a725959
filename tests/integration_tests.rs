use approx::assert_relative_eq;
use ndarray::Array2;
use position_kmeans::{
    assign, distance, distance_matrix, update, CentroidSet, ClusterConfig, ClusterError,
    FeatureRow, FeatureTable, FeatureTableBuilder, KMeans, Schema,
};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FEATURES: [&str; 4] = [
    "drives per attempt",
    "post-ups per attempt",
    "passes made per minute",
    "dreb chance per min",
];

/// Three synthetic player archetypes (ball handlers, bigs, wings) with noise.
fn generate_players(per_group: usize, seed: u64) -> FeatureTable {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Uniform::new(-0.05, 0.05);
    let centers = [
        [0.6, 0.02, 1.8, 0.15],
        [0.05, 0.4, 0.9, 0.6],
        [0.3, 0.1, 1.2, 0.3],
    ];

    let n = per_group * centers.len();
    let mut data = Array2::zeros((n, FEATURES.len()));
    for (g, center) in centers.iter().enumerate() {
        for i in 0..per_group {
            for (j, &c) in center.iter().enumerate() {
                data[[g * per_group + i, j]] = c + noise.sample(&mut rng);
            }
        }
    }

    FeatureTable::from_array(
        Schema::new(FEATURES).unwrap(),
        (0..n).map(|i| format!("{}", 1_600_000 + i)).collect(),
        data,
    )
    .unwrap()
}

#[test]
fn test_runs_are_deterministic() {
    let table = generate_players(20, 11);
    let config = ClusterConfig::new(3).with_seed(200);

    let a = KMeans::new(config.clone()).fit(&table).unwrap();
    let b = KMeans::new(config).fit(&table).unwrap();

    assert_eq!(a.assignment, b.assignment);
    assert_eq!(a.iterations, b.iterations);
    let bits = |c: &CentroidSet| c.points().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a.centroids), bits(&b.centroids));
}

#[test]
fn test_parallel_and_serial_runs_agree() {
    let table = generate_players(30, 5);

    let parallel = KMeans::new(ClusterConfig::new(3).with_parallel(true))
        .fit(&table)
        .unwrap();
    let serial = KMeans::new(ClusterConfig::new(3).with_parallel(false))
        .fit(&table)
        .unwrap();

    assert_eq!(parallel.assignment, serial.assignment);
    assert_eq!(parallel.centroids, serial.centroids);
}

#[test]
fn test_separated_archetypes_recovered() {
    let table = generate_players(15, 3);
    // one starting point near each archetype
    let start = CentroidSet::from_points(
        table.schema().clone(),
        vec![
            vec![0.5, 0.0, 1.6, 0.2],
            vec![0.1, 0.3, 1.0, 0.5],
            vec![0.3, 0.1, 1.3, 0.3],
        ],
    )
    .unwrap();

    let clustering = KMeans::new(ClusterConfig::new(3))
        .fit_from(&table, start)
        .unwrap();

    let labels = clustering.assignment.labels();
    for g in 0..3 {
        let group = &labels[g * 15..(g + 1) * 15];
        assert!(group.iter().all(|&l| l == g), "group {} split: {:?}", g, group);
    }
    assert_eq!(clustering.assignment.cluster_sizes(3), vec![15, 15, 15]);
}

#[test]
fn test_converged_centroids_reproduce_assignment() {
    let table = generate_players(10, 9);
    let clustering = KMeans::new(ClusterConfig::new(3)).fit(&table).unwrap();

    let distances = distance_matrix(&table, &clustering.centroids, false).unwrap();
    assert_eq!(assign(&distances.view()), clustering.assignment);
    assert_eq!(clustering.predict(&table).unwrap(), clustering.assignment);
}

#[test]
fn test_update_is_idempotent_at_convergence() {
    let table = generate_players(10, 21);
    let clustering = KMeans::new(ClusterConfig::new(3)).fit(&table).unwrap();

    let mut centroids = clustering.centroids.clone();
    update(&table, &clustering.assignment, &mut centroids).unwrap();
    assert_eq!(centroids, clustering.centroids);
}

#[test]
fn test_four_points_two_clusters() {
    let table = FeatureTable::from_rows(
        Schema::new(["x"]).unwrap(),
        ["a", "b", "c", "d"]
            .iter()
            .zip([0.0, 0.0, 10.0, 10.0])
            .map(|(k, v)| FeatureRow::new(*k, vec![("x".to_string(), v)]))
            .collect(),
    )
    .unwrap();
    let start =
        CentroidSet::from_points(table.schema().clone(), vec![vec![1.0], vec![9.0]]).unwrap();

    let clustering = KMeans::new(ClusterConfig::new(2))
        .fit_from(&table, start)
        .unwrap();

    assert_eq!(clustering.assignment.members(0), vec![0, 1]);
    assert_eq!(clustering.assignment.members(1), vec![2, 3]);
    assert_relative_eq!(clustering.centroids.get(0).values[0], 0.0);
    assert_relative_eq!(clustering.centroids.get(1).values[0], 10.0);
    assert!(clustering.iterations <= 2);
}

#[test]
fn test_k_exceeding_rows() {
    let table = FeatureTable::from_array(
        Schema::new(["x"]).unwrap(),
        vec!["a".to_string(), "b".to_string()],
        Array2::from_shape_vec((2, 1), vec![1.0, 2.0]).unwrap(),
    )
    .unwrap();

    let result = KMeans::new(ClusterConfig::new(3)).fit(&table);
    assert!(matches!(result, Err(ClusterError::InvalidParameter(_))));
}

#[test]
fn test_unknown_feature_is_schema_mismatch() {
    let table = generate_players(2, 1);
    let result = KMeans::new(ClusterConfig::new(2).with_features(["height"])).fit(&table);
    assert!(matches!(result, Err(ClusterError::SchemaMismatch(_))));
}

#[test]
fn test_distance_non_negative_and_zero_on_own_row() {
    let table = generate_players(5, 17);
    let own = CentroidSet::from_points(
        table.schema().clone(),
        table.data().rows().into_iter().map(|r| r.to_vec()).collect(),
    )
    .unwrap();

    for row in table.rows() {
        for centroid in own.iter() {
            let d = distance(&row, &centroid, table.schema()).unwrap();
            assert!(d >= 0.0);
        }
    }
    for (r, row) in table.rows().enumerate() {
        assert_eq!(distance(&row, &own.get(r), table.schema()).unwrap(), 0.0);
    }
}

#[test]
fn test_builder_to_clustering() {
    let drives = [("1", 0.6), ("2", 0.62), ("3", 0.05), ("4", 0.07), ("5", 0.3)];
    let post_ups = [("1", 0.01), ("2", 0.02), ("3", 0.45), ("4", 0.4), ("6", 0.2)];

    let table = FeatureTableBuilder::new()
        .column("drives per attempt", drives)
        .column("post-ups per attempt", post_ups)
        .build()
        .unwrap();
    assert_eq!(table.keys(), ["1", "2", "3", "4"]);

    let start = CentroidSet::from_points(
        table.schema().clone(),
        vec![vec![0.5, 0.0], vec![0.0, 0.5]],
    )
    .unwrap();
    let clustering = KMeans::new(ClusterConfig::new(2))
        .fit_from(&table, start)
        .unwrap();
    assert_eq!(clustering.assignment.labels(), [0, 0, 1, 1]);
}
