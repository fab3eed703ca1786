use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use woodshed_domain::ordering::Ordered;

/// Parent of a song's sections. The three aggregate fields are means over
/// the current sections and are never written directly by callers.
#[derive(Clone, Debug)]
pub struct Song {
	pub song_id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub confidence: f64,
	pub rehearsals: f64,
	pub progress: f64,
	pub last_time_played: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// The stat-bearing leaf: one section of a song, position-ordered among its
/// siblings.
#[derive(Clone, Debug)]
pub struct SongSection {
	pub section_id: Uuid,
	pub song_id: Uuid,
	pub name: String,
	pub order: i32,
	pub rehearsals: i64,
	pub confidence: f64,
	pub rehearsals_score: f64,
	pub confidence_score: f64,
	pub progress: f64,
	pub occurrences: i64,
	pub partial_occurrences: i64,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl Ordered for SongSection {
	fn id(&self) -> Uuid {
		self.section_id
	}

	fn order(&self) -> i32 {
		self.order
	}

	fn set_order(&mut self, order: i32) {
		self.order = order;
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatProperty {
	Rehearsals,
	Confidence,
}

/// Append-only ledger entry recording one stat change on one section.
#[derive(Clone, Debug)]
pub struct HistoryRecord {
	pub record_id: Uuid,
	pub section_id: Uuid,
	pub property: StatProperty,
	pub from: f64,
	pub to: f64,
	pub created_at: OffsetDateTime,
}

/// Every position-ordered collection that carries no per-child stats:
/// album and playlist track listings, band member rosters, and the
/// per-user catalogs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
	AlbumSongs,
	PlaylistSongs,
	ArtistMembers,
	GuitarTunings,
	Instruments,
	Roles,
	SectionTypes,
}

/// One entry of an ordered collection, scoped by `(kind, owner_id)`.
#[derive(Clone, Debug)]
pub struct CollectionEntry {
	pub entry_id: Uuid,
	pub kind: CollectionKind,
	pub owner_id: Uuid,
	pub name: String,
	pub target_id: Option<Uuid>,
	pub order: i32,
	pub created_at: OffsetDateTime,
}
impl Ordered for CollectionEntry {
	fn id(&self) -> Uuid {
		self.entry_id
	}

	fn order(&self) -> i32 {
		self.order
	}

	fn set_order(&mut self, order: i32) {
		self.order = order;
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationOp {
	CreateSection,
	MoveSection,
	DeleteSection,
	BulkDeleteSections,
	Rehearse,
	UpdateSection,
	ReconcileSong,
	CreateEntry,
	MoveEntry,
	DeleteEntry,
	BulkDeleteEntries,
}

/// Announcement of a committed mutation, enqueued atomically with it and
/// drained by the external transport.
#[derive(Clone, Debug)]
pub struct OutboxEvent {
	pub event_id: Uuid,
	pub op: MutationOp,
	pub payload: Value,
	pub created_at: OffsetDateTime,
}

/// Complete post-mutation state of one song scope, committed as a unit.
#[derive(Clone, Debug)]
pub struct SongScopeWrite {
	pub song: Song,
	pub sections: Vec<SongSection>,
	pub deleted_section_ids: Vec<Uuid>,
	pub history: Vec<HistoryRecord>,
	pub event: OutboxEvent,
}

/// Complete post-mutation state of one ordered collection.
#[derive(Clone, Debug)]
pub struct CollectionWrite {
	pub kind: CollectionKind,
	pub owner_id: Uuid,
	pub entries: Vec<CollectionEntry>,
	pub deleted_entry_ids: Vec<Uuid>,
	pub event: OutboxEvent,
}
