mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Rollup, Scoring, Service};

use std::{fs, path::Path};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if !LOG_LEVELS.contains(&cfg.service.log_level.as_str()) {
		return Err(Error::Validation {
			message: "service.log_level must be one of trace, debug, info, warn, or error."
				.to_string(),
		});
	}

	for (label, tau) in [
		("scoring.rehearsals_tau_days", cfg.scoring.rehearsals_tau_days),
		("scoring.confidence_tau_days", cfg.scoring.confidence_tau_days),
	] {
		if !tau.is_finite() || tau <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number greater than zero."),
			});
		}
	}

	if !cfg.scoring.rehearsals_half_saturation.is_finite()
		|| cfg.scoring.rehearsals_half_saturation <= 0.0
	{
		return Err(Error::Validation {
			message: "scoring.rehearsals_half_saturation must be a finite number greater than zero."
				.to_string(),
		});
	}

	for (label, weight) in [
		("scoring.rehearsals_weight", cfg.scoring.rehearsals_weight),
		("scoring.confidence_weight", cfg.scoring.confidence_weight),
	] {
		if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	let weight_sum = cfg.scoring.rehearsals_weight + cfg.scoring.confidence_weight;

	if (weight_sum - 1.0).abs() > 1e-9 {
		return Err(Error::Validation {
			message: "scoring.rehearsals_weight and scoring.confidence_weight must sum to 1.0."
				.to_string(),
		});
	}

	if !cfg.rollup.drift_tolerance.is_finite() || cfg.rollup.drift_tolerance <= 0.0 {
		return Err(Error::Validation {
			message: "rollup.drift_tolerance must be a finite number greater than zero."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let log_level = cfg.service.log_level.trim();

	cfg.service.log_level =
		if log_level.is_empty() { "info".to_string() } else { log_level.to_ascii_lowercase() };
}
