//! Accuracy regression tests for arbor-cart.
//!
//! These tests verify that algorithmic changes do not degrade tree or forest
//! classification accuracy on a deterministic synthetic dataset with mixed
//! numeric and categorical columns.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use std::collections::BTreeSet;

use arbor_cart::{DecisionTreeConfig, Node, OobMode, RandomForestConfig, Row, SplitRule, Value};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic classification dataset
// ---------------------------------------------------------------------------

const COLORS: [&str; 3] = ["red", "green", "blue"];

/// Generate a 300-row, 10-feature, 3-class dataset plus a trailing label.
///
/// Columns 0-2 are informative numbers (class * 3.0 + noise in [0, 0.5]).
/// Column 3 is an informative category (the class colour, with 10% noise).
/// Columns 4-9 are pure numeric noise in [0, 0.5]; every 25th value of
/// column 4 is the missing marker "?".
fn make_classification(seed: u64) -> Vec<Row> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_rows = 300;
    let n_classes = 3;

    (0..n_rows)
        .map(|i| {
            let class = i % n_classes;
            let mut row: Row = Vec::with_capacity(11);
            for _ in 0..3 {
                row.push(Value::from(class as f64 * 3.0 + rng.r#gen::<f64>() * 0.5));
            }
            let colour = if rng.r#gen::<f64>() < 0.1 {
                COLORS[rng.gen_range(0..COLORS.len())]
            } else {
                COLORS[class]
            };
            row.push(Value::from(colour));
            for f in 4..10 {
                if f == 4 && i % 25 == 0 {
                    row.push(Value::from("?"));
                } else {
                    row.push(Value::from(rng.r#gen::<f64>() * 0.5));
                }
            }
            row.push(Value::from(format!("class-{class}")));
            row
        })
        .collect()
}

/// Collect every split rule of a tree in pre-order.
fn split_rules<'a>(node: &'a Node, out: &mut Vec<&'a SplitRule>) {
    if let Node::Internal {
        rule,
        on_true,
        on_false,
    } = node
    {
        out.push(rule);
        split_rules(on_true, out);
        split_rules(on_false, out);
    }
}

// ---------------------------------------------------------------------------
// a) single_tree_holdout_accuracy
// ---------------------------------------------------------------------------

/// A pruned single tree must classify held-out rows with accuracy > 0.9.
#[test]
fn single_tree_holdout_accuracy() {
    let train = make_classification(42);
    let test = make_classification(7);
    let tree = DecisionTreeConfig::new().fit(&train).unwrap();

    let accuracy = tree.score(&test).unwrap();
    assert!(accuracy > 0.9, "holdout accuracy {accuracy} <= 0.9");
}

// ---------------------------------------------------------------------------
// b) forest_holdout_accuracy
// ---------------------------------------------------------------------------

/// A 100-tree forest must classify held-out rows with accuracy > 0.9.
#[test]
fn forest_holdout_accuracy() {
    let train = make_classification(42);
    let test = make_classification(7);
    let result = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .fit(&train)
        .unwrap();

    let accuracy = result.forest().score(&test).unwrap();
    assert!(accuracy > 0.9, "forest holdout accuracy {accuracy} <= 0.9");
}

// ---------------------------------------------------------------------------
// c) oob_accuracy_above_threshold
// ---------------------------------------------------------------------------

/// OOB accuracy with 100 trees must exceed 0.85.
#[test]
fn oob_accuracy_above_threshold() {
    let rows = make_classification(42);
    let result = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .with_oob_mode(OobMode::Enabled)
        .fit(&rows)
        .unwrap();

    let oob = result
        .oob_score()
        .expect("OOB score must be computed when OobMode::Enabled");
    assert!(oob.accuracy > 0.85, "oob_accuracy {} <= 0.85", oob.accuracy);
    assert_eq!(oob.n_oob_rows, rows.len());
}

// ---------------------------------------------------------------------------
// d) deterministic_predictions
// ---------------------------------------------------------------------------

/// Same config and seed must produce identical forests and predictions.
#[test]
fn deterministic_predictions() {
    let rows = make_classification(42);
    let config = RandomForestConfig::new(50).unwrap().with_seed(42);

    let result1 = config.fit(&rows).unwrap();
    let result2 = config.fit(&rows).unwrap();

    assert_eq!(result1.forest(), result2.forest());
    assert_eq!(
        result1.forest().predict_batch(&rows).unwrap(),
        result2.forest().predict_batch(&rows).unwrap(),
        "predictions differ across runs with the same seed"
    );
}

// ---------------------------------------------------------------------------
// e) keyed_batch_covers_every_row
// ---------------------------------------------------------------------------

/// Keyed batch inference returns one label per identifier, matching `predict`.
#[test]
fn keyed_batch_covers_every_row() {
    let rows = make_classification(42);
    let forest = RandomForestConfig::new(20)
        .unwrap()
        .fit(&rows)
        .unwrap()
        .into_forest();

    let keyed: Vec<(String, Row)> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (format!("row-{i:03}"), row.clone()))
        .collect();
    let predictions = forest.predict_keyed(&keyed).unwrap();

    assert_eq!(predictions.len(), rows.len());
    for (key, row) in &keyed {
        assert_eq!(predictions[key], forest.predict(row).unwrap());
    }
}

// ---------------------------------------------------------------------------
// f) forest_trees_keep_their_column_subset
// ---------------------------------------------------------------------------

/// Every tree splits on at most `max_features_resolved` distinct columns and
/// never on the missing marker.
#[test]
fn forest_trees_keep_their_column_subset() {
    let rows = make_classification(42);
    let result = RandomForestConfig::new(40)
        .unwrap()
        .with_seed(11)
        .fit(&rows)
        .unwrap();
    let max_features = result.metadata().max_features_resolved;
    assert_eq!(max_features, 3);

    let missing = Value::from("?");
    let mut split_trees = 0;
    for (i, tree) in result.forest().trees().iter().enumerate() {
        let mut rules = Vec::new();
        split_rules(tree.root(), &mut rules);
        if !rules.is_empty() {
            split_trees += 1;
        }

        let columns: BTreeSet<usize> = rules.iter().map(|r| r.column()).collect();
        assert!(
            columns.len() <= max_features,
            "tree {i} split on {columns:?}, more than {max_features} columns"
        );
        assert!(
            rules.iter().all(|r| *r.value() != missing),
            "tree {i} split on the missing marker"
        );
    }
    assert!(split_trees > 0, "no tree split at all");
}
