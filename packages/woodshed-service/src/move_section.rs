use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, WoodshedService};
use woodshed_domain::ordering;
use woodshed_storage::models::{MutationOp, SongScopeWrite};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveSectionRequest {
	pub song_id: Uuid,
	pub section_id: Uuid,
	pub over_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveSectionResponse {
	pub song_id: Uuid,
	pub sections: Vec<SectionPosition>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionPosition {
	pub section_id: Uuid,
	pub order: i32,
}

impl WoodshedService {
	/// Moves a section into the slot held by `over_id`, shifting only the
	/// siblings between the two slots.
	pub async fn move_section(&self, req: MoveSectionRequest) -> Result<MoveSectionResponse> {
		let now = OffsetDateTime::now_utc();
		let (mut song, mut sections) = self.stores.scopes.load_song_scope(req.song_id).await?;

		ordering::move_item(&mut sections, req.section_id, req.over_id)
			.map_err(|err| crate::ordering_not_found(err, "Section"))?;

		song.updated_at = now;

		let positions = sections
			.iter()
			.map(|section| SectionPosition { section_id: section.section_id, order: section.order })
			.collect();
		let payload = serde_json::json!({
			"song_id": req.song_id,
			"section_id": req.section_id,
			"over_id": req.over_id,
		});

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: Vec::new(),
				history: Vec::new(),
				event: crate::outbox_event(MutationOp::MoveSection, payload, now),
			})
			.await?;

		tracing::info!(
			song_id = %req.song_id,
			section_id = %req.section_id,
			over_id = %req.over_id,
			"Moved section."
		);

		Ok(MoveSectionResponse { song_id: req.song_id, sections: positions })
	}
}
