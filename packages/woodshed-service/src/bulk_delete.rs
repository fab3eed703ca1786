use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, WoodshedService};
use woodshed_domain::{ordering, rollup};
use woodshed_storage::models::{MutationOp, SongScopeWrite};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkDeleteSectionsRequest {
	pub song_id: Uuid,
	pub section_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkDeleteSectionsResponse {
	pub song_id: Uuid,
	pub deleted: usize,
	pub remaining: usize,
}

impl WoodshedService {
	/// Deletes a batch of sections in one counting pass and applies a single
	/// rollup removal for the whole batch.
	pub async fn bulk_delete_sections(
		&self,
		req: BulkDeleteSectionsRequest,
	) -> Result<BulkDeleteSectionsResponse> {
		let now = OffsetDateTime::now_utc();

		if req.section_ids.is_empty() {
			return Err(Error::InvalidRequest {
				message: "No section ids provided.".to_string(),
			});
		}

		let unique = req.section_ids.iter().collect::<HashSet<_>>();

		if unique.len() != req.section_ids.len() {
			return Err(Error::InvalidRequest {
				message: "Duplicate section ids provided.".to_string(),
			});
		}

		let (mut song, mut sections) = self.stores.scopes.load_song_scope(req.song_id).await?;
		let n_before = sections.len();
		let removed = ordering::remove_many(&mut sections, &req.section_ids)
			.map_err(|err| crate::ordering_not_found(err, "Section"))?;
		let k = removed.len();

		song.confidence = rollup::apply_removal(
			song.confidence,
			n_before,
			k,
			removed.iter().map(|s| s.confidence).sum(),
		);
		song.rehearsals = rollup::apply_removal(
			song.rehearsals,
			n_before,
			k,
			removed.iter().map(|s| s.rehearsals as f64).sum(),
		);
		song.progress = rollup::apply_removal(
			song.progress,
			n_before,
			k,
			removed.iter().map(|s| s.progress).sum(),
		);
		song.updated_at = now;

		let remaining = sections.len();
		let payload = serde_json::json!({
			"song_id": req.song_id,
			"section_ids": req.section_ids,
		});

		self.stores
			.scopes
			.persist_song_scope(SongScopeWrite {
				song,
				sections,
				deleted_section_ids: req.section_ids.clone(),
				history: Vec::new(),
				event: crate::outbox_event(MutationOp::BulkDeleteSections, payload, now),
			})
			.await?;

		tracing::info!(song_id = %req.song_id, deleted = k, "Bulk deleted sections.");

		Ok(BulkDeleteSectionsResponse { song_id: req.song_id, deleted: k, remaining })
	}
}
