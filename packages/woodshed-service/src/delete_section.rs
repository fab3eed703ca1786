use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, WoodshedService};
use woodshed_domain::{ordering, rollup};
use woodshed_storage::models::{MutationOp, SongScopeWrite};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteSectionRequest {
	pub song_id: Uuid,
	pub section_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteSectionResponse {
	pub song_id: Uuid,
	pub section_id: Uuid,
	pub remaining: usize,
}

impl WoodshedService {
	/// Deletes one section, closes the order gap, and rolls the song
	/// aggregates down by the removed stats.
	pub async fn delete_section(&self, req: DeleteSectionRequest) -> Result<DeleteSectionResponse> {
		let now = OffsetDateTime::now_utc();
		let (mut song, mut sections) = self.stores.scopes.load_song_scope(req.song_id).await?;
		let n_before = sections.len();
		let removed = ordering::remove_one(&mut sections, req.section_id)
			.map_err(|err| crate::ordering_not_found(err, "Section"))?;

		song.confidence = rollup::apply_removal(song.confidence, n_before, 1, removed.confidence);
		song.rehearsals =
			rollup::apply_removal(song.rehearsals, n_before, 1, removed.rehearsals as f64);
		song.progress = rollup::apply_removal(song.progress, n_before, 1, removed.progress);
		song.updated_at = now;

		let remaining = sections.len();
		let payload = serde_json::json!({
			"song_id": req.song_id,
			"section": crate::section_snapshot(&removed),
		});

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: vec![req.section_id],
				history: Vec::new(),
				event: crate::outbox_event(MutationOp::DeleteSection, payload, now),
			})
			.await?;

		tracing::info!(song_id = %req.song_id, section_id = %req.section_id, "Deleted section.");

		Ok(DeleteSectionResponse { song_id: req.song_id, section_id: req.section_id, remaining })
	}
}
