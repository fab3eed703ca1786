use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, WoodshedService};
use woodshed_domain::{ordering, rollup};
use woodshed_storage::models::{MutationOp, SongScopeWrite, SongSection};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSectionRequest {
	pub song_id: Uuid,
	pub name: String,
	pub occurrences: Option<i64>,
	pub partial_occurrences: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSectionResponse {
	pub song_id: Uuid,
	pub section_id: Uuid,
	pub order: i32,
}

impl WoodshedService {
	/// Appends a new section at the end of the song with zeroed stats. The
	/// song aggregates are diluted through the addition formula.
	pub async fn create_section(&self, req: CreateSectionRequest) -> Result<CreateSectionResponse> {
		let now = OffsetDateTime::now_utc();
		let name = req.name.trim();

		if name.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Section name must be non-empty.".to_string(),
			});
		}

		let occurrences = req.occurrences.unwrap_or(1);
		let partial_occurrences = req.partial_occurrences.unwrap_or(0);

		if occurrences < 0 || partial_occurrences < 0 {
			return Err(Error::InvalidRequest {
				message: "Occurrences must not be negative.".to_string(),
			});
		}

		let (mut song, mut sections) = self.stores.scopes.load_song_scope(req.song_id).await?;
		let section = SongSection {
			section_id: Uuid::new_v4(),
			song_id: req.song_id,
			name: name.to_string(),
			order: ordering::append_order(&sections),
			rehearsals: 0,
			confidence: 0.0,
			rehearsals_score: 0.0,
			confidence_score: 0.0,
			progress: 0.0,
			occurrences,
			partial_occurrences,
			created_at: now,
			updated_at: now,
		};
		let section_id = section.section_id;
		let order = section.order;
		let payload = serde_json::json!({
			"song_id": req.song_id,
			"section": crate::section_snapshot(&section),
		});

		sections.push(section);

		let n_after = sections.len();

		song.confidence = rollup::apply_addition(song.confidence, n_after, 0.0);
		song.rehearsals = rollup::apply_addition(song.rehearsals, n_after, 0.0);
		song.progress = rollup::apply_addition(song.progress, n_after, 0.0);
		song.updated_at = now;

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: Vec::new(),
				history: Vec::new(),
				event: crate::outbox_event(MutationOp::CreateSection, payload, now),
			})
			.await?;

		tracing::info!(song_id = %req.song_id, section_id = %section_id, "Created section.");

		Ok(CreateSectionResponse { song_id: req.song_id, section_id, order })
	}
}
