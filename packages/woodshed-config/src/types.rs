use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub scoring: Scoring,
	pub rollup: Rollup,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

/// Tuning for the time-weighted rehearsal and confidence scores.
#[derive(Clone, Debug, Deserialize)]
pub struct Scoring {
	/// Decay constant, in days, for rehearsal gains.
	pub rehearsals_tau_days: f64,
	/// Decay constant, in days, for confidence levels.
	pub confidence_tau_days: f64,
	/// Decayed rehearsal gain at which the score reaches 50.
	pub rehearsals_half_saturation: f64,
	pub rehearsals_weight: f64,
	pub confidence_weight: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Rollup {
	/// Absolute difference between a stored aggregate and its full
	/// recomputation above which reconciliation rewrites the parent.
	pub drift_tolerance: f64,
}
