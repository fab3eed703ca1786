pub mod bulk_delete;
pub mod collection;
pub mod create_section;
pub mod delete_section;
pub mod move_section;
pub mod reconcile;
pub mod rehearse;
pub mod song;
pub mod time_serde;
pub mod update_section;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

pub use bulk_delete::{BulkDeleteSectionsRequest, BulkDeleteSectionsResponse};
pub use collection::{
	BulkDeleteEntriesRequest, BulkDeleteEntriesResponse, CreateEntryRequest, CreateEntryResponse,
	DeleteEntryRequest, DeleteEntryResponse, EntryPosition, MoveEntryRequest, MoveEntryResponse,
};
pub use create_section::{CreateSectionRequest, CreateSectionResponse};
pub use delete_section::{DeleteSectionRequest, DeleteSectionResponse};
pub use move_section::{MoveSectionRequest, MoveSectionResponse, SectionPosition};
pub use reconcile::{AggregateField, FieldDrift, ReconcileReport, ReconcileRequest};
pub use rehearse::{RehearsalAmount, RehearsePasses, RehearseRequest, RehearseResponse};
pub use song::{FetchSongRequest, SectionView, SongView};
pub use update_section::{UpdateSectionRequest, UpdateSectionResponse};

use woodshed_config::Config;
use woodshed_domain::{ordering::OrderingError, score::StatChange};
use woodshed_storage::{
	memory::MemoryStore,
	models::{
		CollectionEntry, CollectionKind, CollectionWrite, HistoryRecord, MutationOp, OutboxEvent,
		Song, SongScopeWrite, SongSection, StatProperty,
	},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Loads and atomically persists whole sibling scopes. A persist call either
/// commits the entire write set or leaves the scope untouched.
pub trait ScopeStore
where
	Self: Send + Sync,
{
	fn load_song_scope<'a>(
		&'a self,
		song_id: Uuid,
	) -> BoxFuture<'a, woodshed_storage::Result<(Song, Vec<SongSection>)>>;

	fn persist_song_scope<'a>(
		&'a self,
		write: SongScopeWrite,
	) -> BoxFuture<'a, woodshed_storage::Result<()>>;

	fn load_collection<'a>(
		&'a self,
		kind: CollectionKind,
		owner_id: Uuid,
	) -> BoxFuture<'a, woodshed_storage::Result<Vec<CollectionEntry>>>;

	fn persist_collection<'a>(
		&'a self,
		write: CollectionWrite,
	) -> BoxFuture<'a, woodshed_storage::Result<()>>;
}

/// Read side of the append-only stat ledger. Appends travel inside the
/// scope write sets so they commit atomically with the mutation they record.
pub trait LedgerStore
where
	Self: Send + Sync,
{
	fn history<'a>(
		&'a self,
		section_id: Uuid,
		property: StatProperty,
	) -> BoxFuture<'a, woodshed_storage::Result<Vec<HistoryRecord>>>;
}

#[derive(Clone)]
pub struct Stores {
	pub scopes: Arc<dyn ScopeStore>,
	pub ledger: Arc<dyn LedgerStore>,
}
impl Stores {
	pub fn new(scopes: Arc<dyn ScopeStore>, ledger: Arc<dyn LedgerStore>) -> Self {
		Self { scopes, ledger }
	}

	pub fn in_memory() -> Self {
		Self::with_memory(Arc::new(MemoryStore::new()))
	}

	pub fn with_memory(store: Arc<MemoryStore>) -> Self {
		Self { scopes: store.clone(), ledger: store }
	}
}

impl ScopeStore for MemoryStore {
	fn load_song_scope<'a>(
		&'a self,
		song_id: Uuid,
	) -> BoxFuture<'a, woodshed_storage::Result<(Song, Vec<SongSection>)>> {
		Box::pin(async move { MemoryStore::load_song_scope(self, song_id) })
	}

	fn persist_song_scope<'a>(
		&'a self,
		write: SongScopeWrite,
	) -> BoxFuture<'a, woodshed_storage::Result<()>> {
		Box::pin(async move { MemoryStore::persist_song_scope(self, write) })
	}

	fn load_collection<'a>(
		&'a self,
		kind: CollectionKind,
		owner_id: Uuid,
	) -> BoxFuture<'a, woodshed_storage::Result<Vec<CollectionEntry>>> {
		Box::pin(async move { MemoryStore::load_collection(self, kind, owner_id) })
	}

	fn persist_collection<'a>(
		&'a self,
		write: CollectionWrite,
	) -> BoxFuture<'a, woodshed_storage::Result<()>> {
		Box::pin(async move { MemoryStore::persist_collection(self, write) })
	}
}
impl LedgerStore for MemoryStore {
	fn history<'a>(
		&'a self,
		section_id: Uuid,
		property: StatProperty,
	) -> BoxFuture<'a, woodshed_storage::Result<Vec<HistoryRecord>>> {
		Box::pin(async move { MemoryStore::history(self, section_id, property) })
	}
}

pub struct WoodshedService {
	pub cfg: Config,
	pub stores: Stores,
}
impl WoodshedService {
	pub fn new(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores }
	}
}

pub(crate) fn stat_changes(records: &[HistoryRecord]) -> Vec<StatChange> {
	records
		.iter()
		.map(|record| StatChange { at: record.created_at, from: record.from, to: record.to })
		.collect()
}

pub(crate) fn history_record(
	section_id: Uuid,
	property: StatProperty,
	from: f64,
	to: f64,
	now: OffsetDateTime,
) -> HistoryRecord {
	HistoryRecord { record_id: Uuid::new_v4(), section_id, property, from, to, created_at: now }
}

pub(crate) fn outbox_event(op: MutationOp, payload: Value, now: OffsetDateTime) -> OutboxEvent {
	OutboxEvent { event_id: Uuid::new_v4(), op, payload, created_at: now }
}

pub(crate) fn section_snapshot(section: &SongSection) -> Value {
	serde_json::json!({
		"section_id": section.section_id,
		"song_id": section.song_id,
		"name": section.name,
		"order": section.order,
		"rehearsals": section.rehearsals,
		"confidence": section.confidence,
		"rehearsals_score": section.rehearsals_score,
		"confidence_score": section.confidence_score,
		"progress": section.progress,
		"occurrences": section.occurrences,
		"partial_occurrences": section.partial_occurrences,
	})
}

pub(crate) fn ordering_not_found(err: OrderingError, noun: &str) -> Error {
	match err {
		OrderingError::ItemNotFound(id) => {
			Error::NotFound { message: format!("{noun} {id} not found.") }
		},
		OrderingError::TargetNotFound(id) => {
			Error::NotFound { message: format!("Move target {id} not found.") }
		},
	}
}
