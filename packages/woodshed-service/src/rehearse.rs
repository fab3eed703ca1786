use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, WoodshedService};
use woodshed_domain::{rollup, score};
use woodshed_storage::models::{MutationOp, SongScopeWrite, StatProperty};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RehearsePasses {
	/// Every section gains its own `occurrences`.
	Perfect,
	/// Every section gains its own `partial_occurrences`.
	Partial,
	/// Explicit per-section amounts; sections with amount zero are left
	/// untouched.
	Amounts(Vec<RehearsalAmount>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RehearsalAmount {
	pub section_id: Uuid,
	pub amount: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RehearseRequest {
	pub song_id: Uuid,
	pub passes: RehearsePasses,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RehearseResponse {
	pub song_id: Uuid,
	pub rehearsed: usize,
	pub rehearsals: f64,
	pub progress: f64,
}

impl WoodshedService {
	/// Applies one rehearsal pass over a song. Each touched section gets
	/// exactly one ledger record and fresh scores; the song aggregates are
	/// rolled up once with the net delta across the whole batch.
	pub async fn rehearse(&self, req: RehearseRequest) -> Result<RehearseResponse> {
		let now = OffsetDateTime::now_utc();

		if let RehearsePasses::Amounts(amounts) = &req.passes {
			validate_amounts(amounts)?;
		}

		let (mut song, mut sections) = self.stores.scopes.load_song_scope(req.song_id).await?;

		if let RehearsePasses::Amounts(amounts) = &req.passes {
			for amount in amounts {
				if !sections.iter().any(|section| section.section_id == amount.section_id) {
					return Err(Error::NotFound {
						message: format!("Section {} not found.", amount.section_id),
					});
				}
			}
		}

		let mut history = Vec::new();
		let mut rehearsals_old = 0.0;
		let mut rehearsals_new = 0.0;
		let mut progress_old = 0.0;
		let mut progress_new = 0.0;
		let mut rehearsed = 0_usize;

		for section in sections.iter_mut() {
			let amount = match &req.passes {
				RehearsePasses::Perfect => section.occurrences,
				RehearsePasses::Partial => section.partial_occurrences,
				RehearsePasses::Amounts(amounts) => amounts
					.iter()
					.find(|amount| amount.section_id == section.section_id)
					.map(|amount| amount.amount)
					.unwrap_or(0),
			};

			if amount == 0 {
				continue;
			}

			let old = section.rehearsals;
			let new = old + amount;
			let record = crate::history_record(
				section.section_id,
				StatProperty::Rehearsals,
				old as f64,
				new as f64,
				now,
			);
			let ledger =
				self.stores.ledger.history(section.section_id, StatProperty::Rehearsals).await?;
			let mut changes = crate::stat_changes(&ledger);

			changes.push(score::StatChange { at: now, from: old as f64, to: new as f64 });

			let rehearsals_score = score::rehearsals_score(&changes, now, &self.cfg.scoring);
			let progress =
				score::progress(rehearsals_score, section.confidence_score, &self.cfg.scoring);

			rehearsals_old += old as f64;
			rehearsals_new += new as f64;
			progress_old += section.progress;
			progress_new += progress;

			section.rehearsals = new;
			section.rehearsals_score = rehearsals_score;
			section.progress = progress;
			section.updated_at = now;

			history.push(record);
			rehearsed += 1;
		}

		if rehearsed == 0 {
			return Ok(RehearseResponse {
				song_id: req.song_id,
				rehearsed: 0,
				rehearsals: song.rehearsals,
				progress: song.progress,
			});
		}

		let n = sections.len();

		song.rehearsals =
			rollup::apply_delta(song.rehearsals, n, rehearsals_new - rehearsals_old);
		song.progress = rollup::apply_delta(song.progress, n, progress_new - progress_old);
		song.last_time_played = Some(now);
		song.updated_at = now;

		let response = RehearseResponse {
			song_id: req.song_id,
			rehearsed,
			rehearsals: song.rehearsals,
			progress: song.progress,
		};
		let payload = serde_json::json!({
			"song_id": req.song_id,
			"passes": req.passes,
			"rehearsed": rehearsed,
		});

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: Vec::new(),
				history,
				event: crate::outbox_event(MutationOp::Rehearse, payload, now),
			})
			.await?;

		tracing::info!(song_id = %req.song_id, rehearsed, "Rehearsed song.");

		Ok(response)
	}
}

fn validate_amounts(amounts: &[RehearsalAmount]) -> Result<()> {
	if amounts.is_empty() {
		return Err(Error::InvalidRequest {
			message: "No rehearsal amounts provided.".to_string(),
		});
	}

	let unique = amounts.iter().map(|amount| amount.section_id).collect::<HashSet<_>>();

	if unique.len() != amounts.len() {
		return Err(Error::InvalidRequest {
			message: "Duplicate section ids provided.".to_string(),
		});
	}

	if let Some(negative) = amounts.iter().find(|amount| amount.amount < 0) {
		return Err(Error::InvalidRequest {
			message: format!(
				"Rehearsal amount for section {} must not be negative.",
				negative.section_id
			),
		});
	}

	Ok(())
}
