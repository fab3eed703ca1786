use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, WoodshedService};
use woodshed_domain::rollup;
use woodshed_storage::models::{MutationOp, SongScopeWrite};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReconcileRequest {
	pub song_id: Uuid,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateField {
	Confidence,
	Rehearsals,
	Progress,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldDrift {
	pub field: AggregateField,
	pub stored: f64,
	pub recomputed: f64,
	pub drift: f64,
	pub applied: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReconcileReport {
	pub song_id: Uuid,
	pub fields: Vec<FieldDrift>,
	pub applied: bool,
}

impl WoodshedService {
	/// Recomputes the song aggregates from the current sections and, when a
	/// stored value has drifted past the configured tolerance, rewrites the
	/// song with the recomputed values. The recomputation is authoritative;
	/// running it again right away reports nothing to apply.
	pub async fn reconcile_song(&self, req: ReconcileRequest) -> Result<ReconcileReport> {
		let now = OffsetDateTime::now_utc();
		let (mut song, sections) = self.stores.scopes.load_song_scope(req.song_id).await?;
		let tolerance = self.cfg.rollup.drift_tolerance;
		let recomputed = [
			(
				AggregateField::Confidence,
				song.confidence,
				rollup::recompute(sections.iter().map(|s| s.confidence)),
			),
			(
				AggregateField::Rehearsals,
				song.rehearsals,
				rollup::recompute(sections.iter().map(|s| s.rehearsals as f64)),
			),
			(
				AggregateField::Progress,
				song.progress,
				rollup::recompute(sections.iter().map(|s| s.progress)),
			),
		];
		let fields = recomputed
			.into_iter()
			.map(|(field, stored, recomputed)| {
				let drift = rollup::drift(stored, recomputed);

				FieldDrift { field, stored, recomputed, drift, applied: drift > tolerance }
			})
			.collect::<Vec<_>>();
		let applied = fields.iter().any(|field| field.applied);

		if !applied {
			return Ok(ReconcileReport { song_id: req.song_id, fields, applied: false });
		}

		for field in &fields {
			if field.applied {
				tracing::warn!(
					song_id = %req.song_id,
					field = ?field.field,
					stored = field.stored,
					recomputed = field.recomputed,
					"Aggregate drifted past tolerance; rewriting from children."
				);
			}
		}

		for field in &fields {
			match field.field {
				AggregateField::Confidence => song.confidence = field.recomputed,
				AggregateField::Rehearsals => song.rehearsals = field.recomputed,
				AggregateField::Progress => song.progress = field.recomputed,
			}
		}

		song.updated_at = now;

		let payload = serde_json::json!({
			"song_id": req.song_id,
			"fields": fields,
		});

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: Vec::new(),
				history: Vec::new(),
				event: crate::outbox_event(MutationOp::ReconcileSong, payload, now),
			})
			.await?;

		Ok(ReconcileReport { song_id: req.song_id, fields, applied: true })
	}
}
