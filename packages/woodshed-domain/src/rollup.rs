//! Closed-form maintenance of a parent mean over its children. Every helper
//! matches a full recomputation over the surviving children to within
//! floating-point tolerance; `recompute` is the authoritative form used by
//! reconciliation.

/// Mean after one child's field moves by `delta`, with `n` children total.
pub fn apply_delta(avg: f64, n: usize, delta: f64) -> f64 {
	if n == 0 {
		return 0.0;
	}

	(avg * n as f64 + delta) / n as f64
}

/// Mean after a child with `value` joins, with `n_after` children total.
pub fn apply_addition(avg: f64, n_after: usize, value: f64) -> f64 {
	if n_after == 0 {
		return 0.0;
	}

	(avg * (n_after - 1) as f64 + value) / n_after as f64
}

/// Mean after `k` of `n_before` children leave, their field values summing
/// to `sum_removed`. Removing every child resets the mean to zero.
pub fn apply_removal(avg: f64, n_before: usize, k: usize, sum_removed: f64) -> f64 {
	if k >= n_before {
		return 0.0;
	}

	(avg * n_before as f64 - sum_removed) / (n_before - k) as f64
}

/// Full mean over the current children; zero for an empty set.
pub fn recompute<I>(values: I) -> f64
where
	I: IntoIterator<Item = f64>,
{
	let mut sum = 0.0;
	let mut count = 0_usize;

	for value in values {
		sum += value;
		count += 1;
	}

	if count == 0 { 0.0 } else { sum / count as f64 }
}

pub fn drift(incremental: f64, recomputed: f64) -> f64 {
	(incremental - recomputed).abs()
}
