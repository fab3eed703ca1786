use uuid::Uuid;

use woodshed_domain::rollup;
use woodshed_service::{
	BulkDeleteSectionsRequest, DeleteSectionRequest, Error, FetchSongRequest,
};
use woodshed_storage::models::SongSection;
use woodshed_testkit as testkit;

fn rehearsed_section(song_id: Uuid, name: &str, order: i32, rehearsals: i64) -> SongSection {
	let mut section = testkit::section(song_id, name, order);

	section.rehearsals = rehearsals;
	section.confidence = 50.0;
	section.progress = 25.0;

	section
}

#[tokio::test]
async fn deleting_one_section_rolls_the_aggregates_down() {
	let (service, store) = super::build_service();
	let song_id = Uuid::new_v4();
	let sections = vec![
		rehearsed_section(song_id, "Intro", 0, 8),
		rehearsed_section(song_id, "Verse", 1, 2),
		rehearsed_section(song_id, "Chorus", 2, 14),
	];
	let (song_id, ids) = testkit::seed_consistent_song(&store, "Estimated Prophet", sections);

	service
		.delete_section(DeleteSectionRequest { song_id, section_id: ids[1] })
		.await
		.expect("delete failed");

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");
	let expected =
		rollup::recompute(song.sections.iter().map(|section| section.rehearsals as f64));

	assert_eq!(song.sections.len(), 2);
	assert_eq!(
		song.sections.iter().map(|section| section.order).collect::<Vec<_>>(),
		vec![0, 1]
	);
	assert!(rollup::drift(song.rehearsals, expected) < 1e-9);
}

#[tokio::test]
async fn bulk_deleting_half_the_sections_keeps_the_mean_exact() {
	let (service, store) = super::build_service();
	let song_id = Uuid::new_v4();
	let sections = (0..4)
		.map(|order| rehearsed_section(song_id, &format!("Part {order}"), order, 10))
		.collect::<Vec<_>>();
	let (song_id, ids) = testkit::seed_consistent_song(&store, "Ripple", sections);

	service
		.bulk_delete_sections(BulkDeleteSectionsRequest {
			song_id,
			section_ids: vec![ids[0], ids[3]],
		})
		.await
		.expect("bulk delete failed");

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert_eq!(song.sections.len(), 2);
	assert!(rollup::drift(song.rehearsals, 10.0) < 1e-9);
	assert!(rollup::drift(song.confidence, 50.0) < 1e-9);
}

#[tokio::test]
async fn deleting_the_only_section_zeroes_the_aggregates() {
	let (service, store) = super::build_service();
	let song_id = Uuid::new_v4();
	let sections = vec![rehearsed_section(song_id, "Jam", 0, 42)];
	let (song_id, ids) = testkit::seed_consistent_song(&store, "Dark Star", sections);

	service
		.delete_section(DeleteSectionRequest { song_id, section_id: ids[0] })
		.await
		.expect("delete failed");

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert!(song.sections.is_empty());
	assert_eq!(song.confidence, 0.0);
	assert_eq!(song.rehearsals, 0.0);
	assert_eq!(song.progress, 0.0);
	assert!(!song.rehearsals.is_nan());
}

#[tokio::test]
async fn bulk_delete_with_a_missing_id_changes_nothing() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 3);
	let err = service
		.bulk_delete_sections(BulkDeleteSectionsRequest {
			song_id,
			section_ids: vec![ids[0], Uuid::new_v4()],
		})
		.await
		.expect_err("expected NotFound");

	assert!(matches!(err, Error::NotFound { .. }));

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert_eq!(song.sections.len(), 3);
	assert!(store.events().is_empty());
}

#[tokio::test]
async fn bulk_delete_rejects_empty_and_duplicate_batches() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 2);
	let empty = service
		.bulk_delete_sections(BulkDeleteSectionsRequest { song_id, section_ids: Vec::new() })
		.await
		.expect_err("expected InvalidRequest");
	let duplicated = service
		.bulk_delete_sections(BulkDeleteSectionsRequest {
			song_id,
			section_ids: vec![ids[0], ids[0]],
		})
		.await
		.expect_err("expected InvalidRequest");

	assert!(matches!(empty, Error::InvalidRequest { .. }));
	assert!(matches!(duplicated, Error::InvalidRequest { .. }));
}
