use uuid::Uuid;

use woodshed_domain::rollup;
use woodshed_service::{CreateSectionRequest, Error, FetchSongRequest};
use woodshed_testkit as testkit;

#[tokio::test]
async fn a_new_section_lands_at_the_end_with_zero_stats() {
	let (service, store) = super::build_service();
	let song_id = Uuid::new_v4();
	let mut section = testkit::section(song_id, "Verse", 0);

	section.rehearsals = 6;
	section.confidence = 60.0;
	section.progress = 30.0;

	let (song_id, _) = testkit::seed_consistent_song(&store, "Scarlet", vec![section]);
	let response = service
		.create_section(CreateSectionRequest {
			song_id,
			name: "Transition".to_string(),
			occurrences: Some(2),
			partial_occurrences: None,
		})
		.await
		.expect("create failed");

	assert_eq!(response.order, 1);

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");
	let created = song
		.sections
		.iter()
		.find(|section| section.section_id == response.section_id)
		.expect("expected section");

	assert_eq!(created.order, 1);
	assert_eq!(created.rehearsals, 0);
	assert_eq!(created.occurrences, 2);
	assert_eq!(created.partial_occurrences, 0);

	let expected =
		rollup::recompute(song.sections.iter().map(|section| section.rehearsals as f64));

	assert!(rollup::drift(song.rehearsals, expected) < 1e-9);
	assert!(rollup::drift(song.rehearsals, 3.0) < 1e-9);
}

#[tokio::test]
async fn creating_in_a_missing_song_is_not_found() {
	let (service, _) = super::build_service();
	let err = service
		.create_section(CreateSectionRequest {
			song_id: Uuid::new_v4(),
			name: "Intro".to_string(),
			occurrences: None,
			partial_occurrences: None,
		})
		.await
		.expect_err("expected NotFound");

	assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn a_blank_name_is_rejected() {
	let (service, store) = super::build_service();
	let (song_id, _) = testkit::seed_plain_song(&store, 1);
	let err = service
		.create_section(CreateSectionRequest {
			song_id,
			name: "   ".to_string(),
			occurrences: None,
			partial_occurrences: None,
		})
		.await
		.expect_err("expected InvalidRequest");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}
