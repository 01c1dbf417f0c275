//! Aligned categorical distributions
//!
//! This module turns two label sequences into count vectors over a shared
//! support so that they can be compared category by category.
//!
//! # Alignment
//!
//! The support is the union of categories seen in either sequence. A category
//! missing from one side keeps a zero count on that side instead of being
//! dropped, since a category that appears or vanishes is drift in itself.
//!
//! # Rare-category grouping
//!
//! Long tails of tiny categories make PSI noisy. Two knobs fold them into a
//! single [`OTHER_CATEGORY`] bucket:
//!
//! - **`min_category_size_ratio`**: categories below this share in *both*
//!   samples are grouped
//! - **`max_num_categories`**: only the most frequent categories are kept
//!
//! # Examples
//!
//! ```
//! use driftwise_stats::categorical::{CategoricalDistribution, CategoryBinning};
//!
//! let train = ["a", "a", "b", "b"];
//! let test = ["a", "c", "c", "c"];
//! let dist = CategoricalDistribution::new(&train, &test, &CategoryBinning::default()).unwrap();
//!
//! // Train order first, categories unseen in train after them
//! assert_eq!(dist.categories, vec!["a", "b", "c"]);
//! assert_eq!(dist.train_counts, vec![2, 2, 0]);
//! assert_eq!(dist.test_counts, vec![1, 0, 3]);
//! ```

use std::{cmp::Reverse, collections::BTreeMap};

use crate::{DriftError, Side};

/// Label of the bucket collecting grouped categories.
pub const OTHER_CATEGORY: &str = "Other";

/// Parameters controlling how rare categories are grouped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBinning {
    /// Categories whose share is below this ratio in both samples are grouped.
    pub min_category_size_ratio: f64,
    /// Maximum number of categories kept before grouping the remainder.
    pub max_num_categories: Option<usize>,
}

impl Default for CategoryBinning {
    fn default() -> Self {
        Self {
            min_category_size_ratio: 0.01,
            max_num_categories: None,
        }
    }
}

impl CategoryBinning {
    /// Binning that keeps every category as-is.
    #[must_use]
    pub fn ungrouped() -> Self {
        Self {
            min_category_size_ratio: 0.0,
            max_num_categories: None,
        }
    }
}

/// Two count vectors over a shared, ordered set of categories.
///
/// Categories are ordered by descending train count, then descending test
/// count, then name. The [`OTHER_CATEGORY`] bucket, when present, is last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalDistribution {
    pub categories: Vec<String>,
    pub train_counts: Vec<u64>,
    pub test_counts: Vec<u64>,
}

impl CategoricalDistribution {
    /// Aligns two label sequences over the union of their categories.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::EmptyInput`] naming the empty side.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftwise_stats::categorical::{CategoricalDistribution, CategoryBinning, OTHER_CATEGORY};
    ///
    /// let mut train = vec!["a"; 98];
    /// train.extend(["b", "c"]);
    /// let test = vec!["a"; 100];
    ///
    /// let binning = CategoryBinning { min_category_size_ratio: 0.05, max_num_categories: None };
    /// let dist = CategoricalDistribution::new(&train, &test, &binning).unwrap();
    /// assert_eq!(dist.categories, vec!["a", OTHER_CATEGORY]);
    /// assert_eq!(dist.train_counts, vec![98, 2]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new<S>(train: &[S], test: &[S], binning: &CategoryBinning) -> Result<Self, DriftError>
    where
        S: AsRef<str>,
    {
        if train.is_empty() {
            return Err(DriftError::EmptyInput { side: Side::Train });
        }
        if test.is_empty() {
            return Err(DriftError::EmptyInput { side: Side::Test });
        }

        let mut counts: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for label in train {
            counts.entry(label.as_ref()).or_default().0 += 1;
        }
        for label in test {
            counts.entry(label.as_ref()).or_default().1 += 1;
        }

        let mut entries = counts.into_iter().collect::<Vec<_>>();
        // BTreeMap iteration is name-ordered, so a stable sort keeps names as the last key
        entries.sort_by_key(|&(_, (train_count, test_count))| {
            (Reverse(train_count), Reverse(test_count))
        });

        let train_total = train.len() as f64;
        let test_total = test.len() as f64;
        let is_rare = |&(train_count, test_count): &(u64, u64)| {
            (train_count as f64 / train_total) < binning.min_category_size_ratio
                && (test_count as f64 / test_total) < binning.min_category_size_ratio
        };

        let (mut kept, mut grouped): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|(_, pair)| !is_rare(pair));
        if let Some(max) = binning.max_num_categories {
            if kept.len() > max {
                grouped.extend(kept.split_off(max));
            }
        }

        let mut dist = Self {
            categories: Vec::with_capacity(kept.len() + 1),
            train_counts: Vec::with_capacity(kept.len() + 1),
            test_counts: Vec::with_capacity(kept.len() + 1),
        };
        for (category, (train_count, test_count)) in kept {
            dist.push(category, train_count, test_count);
        }
        if !grouped.is_empty() {
            let (train_count, test_count) = grouped
                .iter()
                .fold((0, 0), |(a, b), (_, (c, d))| (a + c, b + d));
            dist.push(OTHER_CATEGORY, train_count, test_count);
        }
        Ok(dist)
    }

    fn push(&mut self, category: &str, train_count: u64, test_count: u64) {
        self.categories.push(category.to_owned());
        self.train_counts.push(train_count);
        self.test_counts.push(test_count);
    }

    /// Number of categories in the shared support.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Train counts normalized to probabilities.
    #[must_use]
    pub fn train_probabilities(&self) -> Vec<f64> {
        normalize(&self.train_counts)
    }

    /// Test counts normalized to probabilities.
    #[must_use]
    pub fn test_probabilities(&self) -> Vec<f64> {
        normalize(&self.test_counts)
    }
}

#[expect(clippy::cast_precision_loss)]
fn normalize(counts: &[u64]) -> Vec<f64> {
    let total = counts.iter().sum::<u64>();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&count| count as f64 / total as f64)
        .collect()
}
