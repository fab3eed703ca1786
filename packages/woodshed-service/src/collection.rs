use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, WoodshedService};
use woodshed_domain::ordering;
use woodshed_storage::models::{CollectionEntry, CollectionKind, CollectionWrite, MutationOp};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateEntryRequest {
	pub kind: CollectionKind,
	pub owner_id: Uuid,
	pub name: String,
	pub target_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateEntryResponse {
	pub entry_id: Uuid,
	pub order: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveEntryRequest {
	pub kind: CollectionKind,
	pub owner_id: Uuid,
	pub entry_id: Uuid,
	pub over_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveEntryResponse {
	pub entries: Vec<EntryPosition>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryPosition {
	pub entry_id: Uuid,
	pub order: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteEntryRequest {
	pub kind: CollectionKind,
	pub owner_id: Uuid,
	pub entry_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
	pub entry_id: Uuid,
	pub remaining: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkDeleteEntriesRequest {
	pub kind: CollectionKind,
	pub owner_id: Uuid,
	pub entry_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkDeleteEntriesResponse {
	pub deleted: usize,
	pub remaining: usize,
}

/// The stat-free ordered collections (album and playlist track lists, band
/// member rosters, per-user catalogs) share one reindexing path, scoped by
/// `(kind, owner_id)`.
impl WoodshedService {
	pub async fn create_entry(&self, req: CreateEntryRequest) -> Result<CreateEntryResponse> {
		let now = OffsetDateTime::now_utc();
		let name = req.name.trim();

		if name.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Entry name must be non-empty.".to_string(),
			});
		}

		let mut entries = self.stores.scopes.load_collection(req.kind, req.owner_id).await?;
		let entry = CollectionEntry {
			entry_id: Uuid::new_v4(),
			kind: req.kind,
			owner_id: req.owner_id,
			name: name.to_string(),
			target_id: req.target_id,
			order: ordering::append_order(&entries),
			created_at: now,
		};
		let entry_id = entry.entry_id;
		let order = entry.order;

		entries.push(entry);

		self.persist_entries(req.kind, req.owner_id, entries, Vec::new(), MutationOp::CreateEntry, now)
			.await?;

		Ok(CreateEntryResponse { entry_id, order })
	}

	pub async fn move_entry(&self, req: MoveEntryRequest) -> Result<MoveEntryResponse> {
		let now = OffsetDateTime::now_utc();
		let mut entries = self.stores.scopes.load_collection(req.kind, req.owner_id).await?;

		ordering::move_item(&mut entries, req.entry_id, req.over_id)
			.map_err(|err| crate::ordering_not_found(err, "Entry"))?;

		let positions = entries
			.iter()
			.map(|entry| EntryPosition { entry_id: entry.entry_id, order: entry.order })
			.collect();

		self.persist_entries(req.kind, req.owner_id, entries, Vec::new(), MutationOp::MoveEntry, now)
			.await?;

		Ok(MoveEntryResponse { entries: positions })
	}

	pub async fn delete_entry(&self, req: DeleteEntryRequest) -> Result<DeleteEntryResponse> {
		let now = OffsetDateTime::now_utc();
		let mut entries = self.stores.scopes.load_collection(req.kind, req.owner_id).await?;

		ordering::remove_one(&mut entries, req.entry_id)
			.map_err(|err| crate::ordering_not_found(err, "Entry"))?;

		let remaining = entries.len();

		self.persist_entries(
			req.kind,
			req.owner_id,
			entries,
			vec![req.entry_id],
			MutationOp::DeleteEntry,
			now,
		)
		.await?;

		Ok(DeleteEntryResponse { entry_id: req.entry_id, remaining })
	}

	pub async fn bulk_delete_entries(
		&self,
		req: BulkDeleteEntriesRequest,
	) -> Result<BulkDeleteEntriesResponse> {
		let now = OffsetDateTime::now_utc();

		if req.entry_ids.is_empty() {
			return Err(Error::InvalidRequest { message: "No entry ids provided.".to_string() });
		}

		let unique = req.entry_ids.iter().collect::<HashSet<_>>();

		if unique.len() != req.entry_ids.len() {
			return Err(Error::InvalidRequest {
				message: "Duplicate entry ids provided.".to_string(),
			});
		}

		let mut entries = self.stores.scopes.load_collection(req.kind, req.owner_id).await?;
		let removed = ordering::remove_many(&mut entries, &req.entry_ids)
			.map_err(|err| crate::ordering_not_found(err, "Entry"))?;
		let remaining = entries.len();

		self.persist_entries(
			req.kind,
			req.owner_id,
			entries,
			req.entry_ids,
			MutationOp::BulkDeleteEntries,
			now,
		)
		.await?;

		Ok(BulkDeleteEntriesResponse { deleted: removed.len(), remaining })
	}

	async fn persist_entries(
		&self,
		kind: CollectionKind,
		owner_id: Uuid,
		entries: Vec<CollectionEntry>,
		deleted_entry_ids: Vec<Uuid>,
		op: MutationOp,
		now: OffsetDateTime,
	) -> Result<()> {
		let payload = serde_json::json!({
			"kind": kind,
			"owner_id": owner_id,
			"entries": entries.len(),
			"deleted": deleted_entry_ids,
		});

		self.stores
			.scopes
			.persist_collection(CollectionWrite {
				kind,
				owner_id,
				entries,
				deleted_entry_ids,
				event: crate::outbox_event(op, payload, now),
			})
			.await?;

		tracing::info!(kind = ?kind, owner_id = %owner_id, op = ?op, "Persisted collection.");

		Ok(())
	}
}
