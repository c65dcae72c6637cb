//! Small statistics helpers shared by the metric functions

use std::collections::BTreeMap;

/// Arithmetic mean of a non-empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty(), "mean of an empty slice");
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`) of a non-empty slice
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `p·log2(p)` with the `0·log2(0) = 0` limit
pub(crate) fn plogp(p: f64) -> f64 {
    if p <= 0.0 {
        0.0
    } else {
        p * p.log2()
    }
}

/// Shannon entropy (base 2) of a frequency table
pub(crate) fn entropy<K>(counts: &BTreeMap<K, usize>) -> f64 {
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    // Folding down from +0.0 keeps a zero entropy positive
    counts.values().fold(0.0, |h, &count| {
        h - plogp(count as f64 / total as f64)
    })
}

/// Frequency table of the items, keyed in sorted order
pub(crate) fn frequencies<K: Ord, I: IntoIterator<Item = K>>(items: I) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}
