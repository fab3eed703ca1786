use std::{
	collections::HashMap,
	sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::{
	Error, Result,
	models::{
		CollectionEntry, CollectionKind, CollectionWrite, HistoryRecord, OutboxEvent, Song,
		SongScopeWrite, SongSection, StatProperty,
	},
};
use woodshed_domain::ordering;

/// In-memory reference store. A write set is validated first and applied
/// only as a whole, so a rejected or failed commit leaves the scope exactly
/// as it was; the store lock serializes writes to any one scope.
#[derive(Default)]
pub struct MemoryStore {
	inner: Mutex<State>,
}

#[derive(Default)]
struct State {
	songs: HashMap<Uuid, Song>,
	sections: HashMap<Uuid, Vec<SongSection>>,
	collections: HashMap<(CollectionKind, Uuid), Vec<CollectionEntry>>,
	history: Vec<HistoryRecord>,
	outbox: Vec<OutboxEvent>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seed_song(&self, song: Song, mut sections: Vec<SongSection>) {
		let mut state = self.lock();

		sections.sort_by_key(|section| section.order);
		state.sections.insert(song.song_id, sections);
		state.songs.insert(song.song_id, song);
	}

	pub fn seed_history(&self, records: Vec<HistoryRecord>) {
		let mut state = self.lock();

		state.history.extend(records);
	}

	pub fn seed_collection(
		&self,
		kind: CollectionKind,
		owner_id: Uuid,
		mut entries: Vec<CollectionEntry>,
	) {
		let mut state = self.lock();

		entries.sort_by_key(|entry| entry.order);
		state.collections.insert((kind, owner_id), entries);
	}

	pub fn load_song_scope(&self, song_id: Uuid) -> Result<(Song, Vec<SongSection>)> {
		let state = self.lock();
		let song = state
			.songs
			.get(&song_id)
			.cloned()
			.ok_or_else(|| Error::NotFound(format!("Song {song_id} not found.")))?;
		let mut sections = state.sections.get(&song_id).cloned().unwrap_or_default();

		sections.sort_by_key(|section| section.order);

		Ok((song, sections))
	}

	pub fn persist_song_scope(&self, write: SongScopeWrite) -> Result<()> {
		let mut state = self.lock();

		if !state.songs.contains_key(&write.song.song_id) {
			return Err(Error::NotFound(format!("Song {} not found.", write.song.song_id)));
		}
		if !ordering::is_contiguous(&write.sections) {
			return Err(Error::Conflict(format!(
				"Section orders for song {} are not contiguous.",
				write.song.song_id
			)));
		}

		for id in &write.deleted_section_ids {
			if write.sections.iter().any(|section| section.section_id == *id) {
				return Err(Error::Conflict(format!(
					"Section {id} is both deleted and persisted."
				)));
			}
		}

		let song_id = write.song.song_id;

		state.sections.insert(song_id, write.sections);
		state.songs.insert(song_id, write.song);
		state.history.extend(write.history);
		state.outbox.push(write.event);

		Ok(())
	}

	pub fn load_collection(
		&self,
		kind: CollectionKind,
		owner_id: Uuid,
	) -> Result<Vec<CollectionEntry>> {
		let state = self.lock();
		let mut entries = state.collections.get(&(kind, owner_id)).cloned().unwrap_or_default();

		entries.sort_by_key(|entry| entry.order);

		Ok(entries)
	}

	pub fn persist_collection(&self, write: CollectionWrite) -> Result<()> {
		let mut state = self.lock();

		if !ordering::is_contiguous(&write.entries) {
			return Err(Error::Conflict(format!(
				"Entry orders for {:?} collection of {} are not contiguous.",
				write.kind, write.owner_id
			)));
		}

		state.collections.insert((write.kind, write.owner_id), write.entries);
		state.outbox.push(write.event);

		Ok(())
	}

	/// Ledger for one section and property, in append order.
	pub fn history(&self, section_id: Uuid, property: StatProperty) -> Result<Vec<HistoryRecord>> {
		let state = self.lock();
		let records = state
			.history
			.iter()
			.filter(|record| record.section_id == section_id && record.property == property)
			.cloned()
			.collect();

		Ok(records)
	}

	pub fn events(&self) -> Vec<OutboxEvent> {
		self.lock().outbox.clone()
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}
