//! Fixtures shared by the acceptance suites. Everything here builds plain
//! model values; the stores under test stay the production ones.

use time::OffsetDateTime;
use uuid::Uuid;

use woodshed_domain::rollup;
use woodshed_storage::{
	memory::MemoryStore,
	models::{CollectionEntry, CollectionKind, HistoryRecord, Song, SongSection, StatProperty},
};

pub fn song(title: &str) -> Song {
	let now = OffsetDateTime::now_utc();

	Song {
		song_id: Uuid::new_v4(),
		user_id: Uuid::new_v4(),
		title: title.to_string(),
		confidence: 0.0,
		rehearsals: 0.0,
		progress: 0.0,
		last_time_played: None,
		created_at: now,
		updated_at: now,
	}
}

pub fn section(song_id: Uuid, name: &str, order: i32) -> SongSection {
	let now = OffsetDateTime::now_utc();

	SongSection {
		section_id: Uuid::new_v4(),
		song_id,
		name: name.to_string(),
		order,
		rehearsals: 0,
		confidence: 0.0,
		rehearsals_score: 0.0,
		confidence_score: 0.0,
		progress: 0.0,
		occurrences: 1,
		partial_occurrences: 0,
		created_at: now,
		updated_at: now,
	}
}

pub fn entry(kind: CollectionKind, owner_id: Uuid, name: &str, order: i32) -> CollectionEntry {
	CollectionEntry {
		entry_id: Uuid::new_v4(),
		kind,
		owner_id,
		name: name.to_string(),
		target_id: None,
		order,
		created_at: OffsetDateTime::now_utc(),
	}
}

pub fn rehearsal_record(
	section_id: Uuid,
	from: f64,
	to: f64,
	at: OffsetDateTime,
) -> HistoryRecord {
	HistoryRecord {
		record_id: Uuid::new_v4(),
		section_id,
		property: StatProperty::Rehearsals,
		from,
		to,
		created_at: at,
	}
}

/// Seeds a song whose aggregates are the exact means of its sections and
/// returns the song id plus the section ids in order.
pub fn seed_consistent_song(
	store: &MemoryStore,
	title: &str,
	sections: Vec<SongSection>,
) -> (Uuid, Vec<Uuid>) {
	let mut seeded = song(title);

	seeded.confidence = rollup::recompute(sections.iter().map(|s| s.confidence));
	seeded.rehearsals = rollup::recompute(sections.iter().map(|s| s.rehearsals as f64));
	seeded.progress = rollup::recompute(sections.iter().map(|s| s.progress));

	let song_id = seeded.song_id;
	let sections = sections
		.into_iter()
		.map(|mut section| {
			section.song_id = song_id;

			section
		})
		.collect::<Vec<_>>();
	let section_ids = sections.iter().map(|s| s.section_id).collect();

	store.seed_song(seeded, sections);

	(song_id, section_ids)
}

/// A song with `count` zero-stat sections named `Section 0..count`.
pub fn seed_plain_song(store: &MemoryStore, count: usize) -> (Uuid, Vec<Uuid>) {
	let parent = song("Practice song");
	let song_id = parent.song_id;
	let sections = (0..count)
		.map(|order| section(song_id, &format!("Section {order}"), order as i32))
		.collect::<Vec<_>>();
	let section_ids = sections.iter().map(|s| s.section_id).collect();

	store.seed_song(parent, sections);

	(song_id, section_ids)
}
