use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, WoodshedService};
use woodshed_domain::{rollup, score};
use woodshed_storage::models::{MutationOp, SongScopeWrite, StatProperty};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateSectionRequest {
	pub song_id: Uuid,
	pub section_id: Uuid,
	pub name: Option<String>,
	pub confidence: Option<f64>,
	pub rehearsals: Option<i64>,
	pub occurrences: Option<i64>,
	pub partial_occurrences: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateSectionResponse {
	pub song_id: Uuid,
	pub section_id: Uuid,
	pub updated: bool,
}

impl WoodshedService {
	/// Edits one section. Stat fields are monotone where the model demands
	/// it: `rehearsals` may only grow, `confidence` must stay on 0-100.
	/// Each stat change appends exactly one ledger record before its score
	/// is recomputed from the extended ledger.
	pub async fn update_section(
		&self,
		req: UpdateSectionRequest,
	) -> Result<UpdateSectionResponse> {
		let now = OffsetDateTime::now_utc();

		validate(&req)?;

		let (mut song, mut sections) = self.stores.scopes.load_song_scope(req.song_id).await?;
		let n = sections.len();
		let section = sections
			.iter_mut()
			.find(|section| section.section_id == req.section_id)
			.ok_or_else(|| Error::NotFound {
				message: format!("Section {} not found.", req.section_id),
			})?;

		if let Some(rehearsals) = req.rehearsals
			&& rehearsals < section.rehearsals
		{
			return Err(Error::Conflict {
				message: format!(
					"Rehearsals may not decrease ({} < {}).",
					rehearsals, section.rehearsals
				),
			});
		}

		let mut history = Vec::new();
		let mut rehearsals_played = false;
		let mut updated = false;

		if let Some(name) = req.name.as_deref().map(str::trim)
			&& name != section.name
		{
			section.name = name.to_string();
			updated = true;
		}
		if let Some(occurrences) = req.occurrences
			&& occurrences != section.occurrences
		{
			section.occurrences = occurrences;
			updated = true;
		}
		if let Some(partial_occurrences) = req.partial_occurrences
			&& partial_occurrences != section.partial_occurrences
		{
			section.partial_occurrences = partial_occurrences;
			updated = true;
		}

		if let Some(rehearsals) = req.rehearsals
			&& rehearsals > section.rehearsals
		{
			let old = section.rehearsals;
			let record = crate::history_record(
				section.section_id,
				StatProperty::Rehearsals,
				old as f64,
				rehearsals as f64,
				now,
			);
			let ledger =
				self.stores.ledger.history(section.section_id, StatProperty::Rehearsals).await?;
			let mut changes = crate::stat_changes(&ledger);

			changes.push(score::StatChange { at: now, from: old as f64, to: rehearsals as f64 });

			section.rehearsals = rehearsals;
			section.rehearsals_score = score::rehearsals_score(&changes, now, &self.cfg.scoring);
			song.rehearsals =
				rollup::apply_delta(song.rehearsals, n, (rehearsals - old) as f64);

			history.push(record);
			rehearsals_played = true;
			updated = true;
		}

		if let Some(confidence) = req.confidence
			&& (confidence - section.confidence).abs() > f64::EPSILON
		{
			let old = section.confidence;
			let record = crate::history_record(
				section.section_id,
				StatProperty::Confidence,
				old,
				confidence,
				now,
			);
			let ledger =
				self.stores.ledger.history(section.section_id, StatProperty::Confidence).await?;
			let mut changes = crate::stat_changes(&ledger);

			changes.push(score::StatChange { at: now, from: old, to: confidence });

			section.confidence = confidence;
			section.confidence_score = score::confidence_score(&changes, now, &self.cfg.scoring);
			song.confidence = rollup::apply_delta(song.confidence, n, confidence - old);

			history.push(record);
			updated = true;
		}

		if !history.is_empty() {
			let progress = score::progress(
				section.rehearsals_score,
				section.confidence_score,
				&self.cfg.scoring,
			);

			song.progress = rollup::apply_delta(song.progress, n, progress - section.progress);
			section.progress = progress;
		}

		if !updated {
			return Ok(UpdateSectionResponse {
				song_id: req.song_id,
				section_id: req.section_id,
				updated: false,
			});
		}

		section.updated_at = now;

		if rehearsals_played {
			song.last_time_played = Some(now);
		}

		song.updated_at = now;

		let payload = serde_json::json!({
			"song_id": req.song_id,
			"section_id": req.section_id,
		});

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: Vec::new(),
				history,
				event: crate::outbox_event(MutationOp::UpdateSection, payload, now),
			})
			.await?;

		tracing::info!(song_id = %req.song_id, section_id = %req.section_id, "Updated section.");

		Ok(UpdateSectionResponse {
			song_id: req.song_id,
			section_id: req.section_id,
			updated: true,
		})
	}
}

fn validate(req: &UpdateSectionRequest) -> Result<()> {
	if req.name.is_none()
		&& req.confidence.is_none()
		&& req.rehearsals.is_none()
		&& req.occurrences.is_none()
		&& req.partial_occurrences.is_none()
	{
		return Err(Error::InvalidRequest { message: "No updates provided.".to_string() });
	}

	if let Some(name) = req.name.as_deref()
		&& name.trim().is_empty()
	{
		return Err(Error::InvalidRequest {
			message: "Section name must be non-empty.".to_string(),
		});
	}
	if let Some(confidence) = req.confidence
		&& (!confidence.is_finite() || !(0.0..=100.0).contains(&confidence))
	{
		return Err(Error::InvalidRequest {
			message: "Confidence must be in the range 0-100.".to_string(),
		});
	}

	for (label, value) in [
		("Occurrences", req.occurrences),
		("Partial occurrences", req.partial_occurrences),
	] {
		if let Some(value) = value
			&& value < 0
		{
			return Err(Error::InvalidRequest {
				message: format!("{label} must not be negative."),
			});
		}
	}

	Ok(())
}
