//! Random Forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::{MaxFeatures, OobMode, RandomForestConfig};
use crate::dataset;
use crate::error::CartError;
use crate::oob::compute_oob;
use crate::result::{RandomForestResult, TrainingMetadata};
use crate::tree::{DecisionTree, grow};
use crate::value::Row;

/// A fitted Random Forest ensemble.
///
/// Trees are kept in build order: tree `i` was grown from the `i`-th seed
/// drawn from the master RNG.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) n_features: usize,
}

impl RandomForest {
    /// Borrow the member trees in build order.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the number of feature columns this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Resolve `MaxFeatures` to a concrete count.
pub(crate) fn resolve_max_features(
    max_features: MaxFeatures,
    n_features: usize,
) -> Result<usize, CartError> {
    let resolved = match max_features {
        MaxFeatures::Sqrt => (n_features as f64).sqrt().round() as usize,
        MaxFeatures::Log2 => (n_features as f64).log2().ceil().max(1.0) as usize,
        MaxFeatures::Fixed(n) => n,
        MaxFeatures::All => n_features,
    };
    if resolved == 0 || resolved > n_features {
        return Err(CartError::InvalidMaxFeatures {
            max_features: resolved,
            n_features,
        });
    }
    Ok(resolved)
}

/// Number of rows drawn per tree: `floor(fraction * n_rows)`.
pub(crate) fn resolve_sample_size(sample_fraction: f64, n_rows: usize) -> Result<usize, CartError> {
    let requested = (n_rows as f64 * sample_fraction).floor() as usize;
    if requested == 0 || requested > n_rows {
        return Err(CartError::InvalidSampleSize {
            requested,
            available: n_rows,
        });
    }
    Ok(requested)
}

/// Draw `sample_size` distinct row indices and return them with the rows left out.
///
/// The sample is a plain random subset, not a with-replacement bootstrap;
/// indices stay in draw order.
fn subsample(n_rows: usize, sample_size: usize, rng: &mut impl Rng) -> (Vec<usize>, Vec<usize>) {
    let in_bag_indices = index::sample(rng, n_rows, sample_size).into_vec();
    let mut in_bag = vec![false; n_rows];
    for &i in &in_bag_indices {
        in_bag[i] = true;
    }
    let oob_indices: Vec<usize> = (0..n_rows).filter(|&i| !in_bag[i]).collect();
    (in_bag_indices, oob_indices)
}

/// Draw the feature columns one tree may split on, in ascending order.
fn feature_subset(n_features: usize, max_features: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut columns = index::sample(rng, n_features, max_features).into_vec();
    columns.sort_unstable();
    columns
}

/// Train the Random Forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_rows = rows.len()))]
pub(crate) fn train(config: &RandomForestConfig, rows: &[Row]) -> Result<RandomForestResult, CartError> {
    // --- Validate inputs ---
    let n_features = dataset::validate(rows)?;
    let n_rows = rows.len();

    // --- Validate config ---
    let max_features_resolved = resolve_max_features(config.max_features, n_features)?;
    let sample_size = resolve_sample_size(config.sample_fraction, n_rows)?;

    info!(
        n_trees = config.n_trees,
        n_rows,
        n_features,
        max_features = max_features_resolved,
        sample_size,
        "training random forest"
    );

    // Generate per-tree seeds from master RNG.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    let criterion = config.criterion;
    let missing = config.missing_marker.as_ref();

    // Parallel tree training; collect keeps seed order.
    let tree_results: Vec<(DecisionTree, Vec<usize>)> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (in_bag, oob_indices) = subsample(n_rows, sample_size, &mut rng);
            let columns = feature_subset(n_features, max_features_resolved, &mut rng);

            let sample: Vec<&Row> = in_bag.iter().map(|&i| &rows[i]).collect();
            let root = grow(&sample, &columns, criterion, missing);

            debug!(
                seed,
                ?columns,
                n_nodes = root.n_nodes(),
                depth = root.depth(),
                "tree grown"
            );

            (DecisionTree { root, n_features }, oob_indices)
        })
        .collect();

    let mut trees = Vec::with_capacity(config.n_trees);
    let mut oob_indices_per_tree = Vec::with_capacity(config.n_trees);
    for (tree, oob) in tree_results {
        trees.push(tree);
        oob_indices_per_tree.push(oob);
    }

    // OOB evaluation.
    let oob_score = if config.oob_mode == OobMode::Enabled {
        Some(compute_oob(&trees, rows, &oob_indices_per_tree)?)
    } else {
        None
    };

    let forest = RandomForest { trees, n_features };

    let metadata = TrainingMetadata {
        n_trees: config.n_trees,
        n_features,
        n_rows,
        max_features_resolved,
        sample_size,
    };

    info!(
        oob_accuracy = oob_score.as_ref().map(|s| s.accuracy),
        "random forest training complete"
    );

    Ok(RandomForestResult::new(forest, oob_score, oob_indices_per_tree, metadata))
}
