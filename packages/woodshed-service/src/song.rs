use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, WoodshedService};
use woodshed_storage::models::{Song, SongSection};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchSongRequest {
	pub song_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SongView {
	pub song_id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub confidence: f64,
	pub rehearsals: f64,
	pub progress: f64,
	#[serde(with = "crate::time_serde::option")]
	pub last_time_played: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	pub sections: Vec<SectionView>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionView {
	pub section_id: Uuid,
	pub name: String,
	pub order: i32,
	pub rehearsals: i64,
	pub confidence: f64,
	pub rehearsals_score: f64,
	pub confidence_score: f64,
	pub progress: f64,
	pub occurrences: i64,
	pub partial_occurrences: i64,
}

impl WoodshedService {
	pub async fn fetch_song(&self, req: FetchSongRequest) -> Result<SongView> {
		let (song, sections) = self.stores.scopes.load_song_scope(req.song_id).await?;

		Ok(song_view(song, &sections))
	}
}

fn song_view(song: Song, sections: &[SongSection]) -> SongView {
	SongView {
		song_id: song.song_id,
		user_id: song.user_id,
		title: song.title,
		confidence: song.confidence,
		rehearsals: song.rehearsals,
		progress: song.progress,
		last_time_played: song.last_time_played,
		updated_at: song.updated_at,
		sections: sections.iter().map(section_view).collect(),
	}
}

fn section_view(section: &SongSection) -> SectionView {
	SectionView {
		section_id: section.section_id,
		name: section.name.clone(),
		order: section.order,
		rehearsals: section.rehearsals,
		confidence: section.confidence,
		rehearsals_score: section.rehearsals_score,
		confidence_score: section.confidence_score,
		progress: section.progress,
		occurrences: section.occurrences,
		partial_occurrences: section.partial_occurrences,
	}
}
