//! Configuration builder for Random Forest training.

use crate::error::CartError;
use crate::impurity::ImpurityMetric;
use crate::result::RandomForestResult;
use crate::value::{Row, Value};

/// Strategy for sizing the feature-column subset each tree may split on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxFeatures {
    /// Square root of the feature count, rounded to the nearest integer.
    Sqrt,
    /// Log base 2 of the feature count, rounded up.
    Log2,
    /// A fixed count.
    Fixed(usize),
    /// All features (no subsampling).
    All,
}

/// Whether to compute out-of-bag evaluation during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OobMode {
    /// Score every row with the trees that did not sample it.
    Enabled,
    /// Skip OOB evaluation.
    Disabled,
}

/// Configuration for Random Forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter         | Default               |
/// |-------------------|-----------------------|
/// | `max_features`    | `Sqrt`                |
/// | `sample_fraction` | 2/3                   |
/// | `criterion`       | `Entropy`             |
/// | `missing_marker`  | `Some(Category("?"))` |
/// | `seed`            | 42                    |
/// | `oob_mode`        | `Disabled`            |
///
/// [`RandomForestConfig::default`] uses 200 trees.
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_features: MaxFeatures,
    pub(crate) sample_fraction: f64,
    pub(crate) criterion: ImpurityMetric,
    pub(crate) missing_marker: Option<Value>,
    pub(crate) seed: u64,
    pub(crate) oob_mode: OobMode,
}

impl RandomForestConfig {
    /// Number of trees used by [`RandomForestConfig::default`].
    pub const DEFAULT_TREES: usize = 200;

    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, CartError> {
        if n_trees == 0 {
            return Err(CartError::InvalidTreeCount { tree_count: n_trees });
        }
        Ok(Self {
            n_trees,
            max_features: MaxFeatures::Sqrt,
            sample_fraction: 2.0 / 3.0,
            criterion: ImpurityMetric::Entropy,
            missing_marker: Some(Value::from("?")),
            seed: 42,
            oob_mode: OobMode::Disabled,
        })
    }

    // --- Setters ---

    /// Set the feature-subset strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the fraction of rows drawn (without replacement) for each tree.
    #[must_use]
    pub fn with_sample_fraction(mut self, sample_fraction: f64) -> Self {
        self.sample_fraction = sample_fraction;
        self
    }

    /// Set the impurity metric.
    #[must_use]
    pub fn with_criterion(mut self, criterion: ImpurityMetric) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the value that is never used as a split point. `None` allows all values.
    #[must_use]
    pub fn with_missing_marker(mut self, missing_marker: Option<Value>) -> Self {
        self.missing_marker = missing_marker;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the OOB evaluation mode.
    #[must_use]
    pub fn with_oob_mode(mut self, oob_mode: OobMode) -> Self {
        self.oob_mode = oob_mode;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the feature-subset strategy.
    #[must_use]
    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    /// Return the per-tree sample fraction.
    #[must_use]
    pub fn sample_fraction(&self) -> f64 {
        self.sample_fraction
    }

    /// Return the impurity metric.
    #[must_use]
    pub fn criterion(&self) -> ImpurityMetric {
        self.criterion
    }

    /// Return the missing-value marker, if any.
    #[must_use]
    pub fn missing_marker(&self) -> Option<&Value> {
        self.missing_marker.as_ref()
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the OOB evaluation mode.
    #[must_use]
    pub fn oob_mode(&self) -> OobMode {
        self.oob_mode
    }

    /// Train a Random Forest on `rows` (features followed by label).
    ///
    /// Trees are not pruned.
    ///
    /// # Errors
    ///
    /// | Variant                              | When                                               |
    /// |--------------------------------------|----------------------------------------------------|
    /// | [`CartError::EmptyDataset`]          | `rows` is empty                                    |
    /// | [`CartError::ZeroFeatures`]          | rows hold only a label                             |
    /// | [`CartError::RowLengthMismatch`]     | rows have inconsistent lengths                     |
    /// | [`CartError::NonFiniteValue`]        | a numeric cell is NaN or infinite                  |
    /// | [`CartError::InvalidMaxFeatures`]    | resolved max_features is outside [1, n_features]   |
    /// | [`CartError::InvalidSampleSize`]     | `sample_fraction` yields 0 rows or more than exist |
    /// | [`CartError::OobEvaluationFailed`]   | OOB enabled but no row was ever left out           |
    pub fn fit(&self, rows: &[Row]) -> Result<RandomForestResult, CartError> {
        crate::forest::train(self, rows)
    }
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_trees: Self::DEFAULT_TREES,
            max_features: MaxFeatures::Sqrt,
            sample_fraction: 2.0 / 3.0,
            criterion: ImpurityMetric::Entropy,
            missing_marker: Some(Value::from("?")),
            seed: 42,
            oob_mode: OobMode::Disabled,
        }
    }
}
