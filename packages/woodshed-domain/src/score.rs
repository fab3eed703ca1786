use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use woodshed_config::Scoring;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One ledger entry for a single stat property, ordered by `at`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct StatChange {
	pub at: OffsetDateTime,
	pub from: f64,
	pub to: f64,
}

/// Time-weighted rehearsal score on 0-100. Each positive gain decays
/// exponentially with age and the decayed total is squashed through a
/// half-saturation curve, so recent and larger increments dominate and the
/// score never reaches 100. Empty history scores zero, and appending an
/// event never lowers the score at a fixed `now`.
pub fn rehearsals_score(changes: &[StatChange], now: OffsetDateTime, cfg: &Scoring) -> f64 {
	let weighted = changes
		.iter()
		.map(|change| {
			let gain = (change.to - change.from).max(0.0);

			gain * decay(change.at, now, cfg.rehearsals_tau_days)
		})
		.sum::<f64>();

	saturate(weighted, cfg.rehearsals_half_saturation)
}

/// Recency-weighted confidence score on 0-100: the mean of recorded
/// confidence levels, each weighted by its age decay, so the latest
/// assessment dominates without erasing the trend. Empty history scores
/// zero.
pub fn confidence_score(changes: &[StatChange], now: OffsetDateTime, cfg: &Scoring) -> f64 {
	let mut weighted = 0.0;
	let mut total_weight = 0.0;

	for change in changes {
		let weight = decay(change.at, now, cfg.confidence_tau_days);

		weighted += change.to.clamp(0.0, 100.0) * weight;
		total_weight += weight;
	}

	if total_weight == 0.0 {
		return 0.0;
	}

	weighted / total_weight
}

/// Composite progress on 0-100: the configured blend of both scores. Zero
/// when both inputs are zero and monotone non-decreasing in each.
pub fn progress(rehearsals_score: f64, confidence_score: f64, cfg: &Scoring) -> f64 {
	cfg.rehearsals_weight * rehearsals_score.clamp(0.0, 100.0)
		+ cfg.confidence_weight * confidence_score.clamp(0.0, 100.0)
}

fn decay(at: OffsetDateTime, now: OffsetDateTime, tau_days: f64) -> f64 {
	let age_days = ((now - at).as_seconds_f64() / SECONDS_PER_DAY).max(0.0);

	(-age_days / tau_days).exp()
}

fn saturate(weighted: f64, half_saturation: f64) -> f64 {
	if weighted <= 0.0 {
		return 0.0;
	}

	100.0 * weighted / (weighted + half_saturation)
}
