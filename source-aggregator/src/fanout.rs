use crate::types::{Result, SourceKey};
use futures::future::join_all;
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Runs every branch concurrently and waits for all of them to settle.
///
/// A failed branch is logged and contributes an empty list, so the barrier
/// itself never fails. The outer `Vec` follows the order of `branches`, not
/// completion order.
pub async fn settle_all<L, T, F>(source: SourceKey, branches: Vec<(L, F)>) -> Vec<Vec<T>>
where
    L: Display,
    F: Future<Output = Result<Vec<T>>>,
{
    let (labels, futures): (Vec<L>, Vec<F>) = branches.into_iter().unzip();
    let results = join_all(futures).await;

    labels
        .into_iter()
        .zip(results)
        .map(|(label, result)| match result {
            Ok(items) => items,
            Err(e) => {
                warn!(source = %source, branch = %label, error = %e, "Sub-fetch failed, contributing nothing");
                Vec::new()
            }
        })
        .collect()
}

/// Concatenates branch results in order and keeps the first `cap` records.
pub fn merge_capped<T>(parts: Vec<Vec<T>>, cap: usize) -> Vec<T> {
    parts.into_iter().flatten().take(cap).collect()
}

/// [`merge_capped`] after dropping records that fail `keep`.
pub fn merge_filtered<T>(parts: Vec<Vec<T>>, cap: usize, keep: impl Fn(&T) -> bool) -> Vec<T> {
    parts
        .into_iter()
        .flatten()
        .filter(|item| keep(item))
        .take(cap)
        .collect()
}
