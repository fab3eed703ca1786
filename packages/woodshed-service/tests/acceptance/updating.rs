use woodshed_domain::rollup;
use woodshed_service::{Error, FetchSongRequest, UpdateSectionRequest};
use woodshed_storage::models::StatProperty;
use woodshed_testkit as testkit;

fn update(song_id: uuid::Uuid, section_id: uuid::Uuid) -> UpdateSectionRequest {
	UpdateSectionRequest {
		song_id,
		section_id,
		name: None,
		confidence: None,
		rehearsals: None,
		occurrences: None,
		partial_occurrences: None,
	}
}

#[tokio::test]
async fn setting_confidence_reledgers_and_rolls_up() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 2);

	service
		.update_section(UpdateSectionRequest {
			confidence: Some(80.0),
			..update(song_id, ids[0])
		})
		.await
		.expect("update failed");

	let history = store.history(ids[0], StatProperty::Confidence).expect("history failed");

	assert_eq!(history.len(), 1);
	assert_eq!(history[0].from, 0.0);
	assert_eq!(history[0].to, 80.0);

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");
	let section = song
		.sections
		.iter()
		.find(|section| section.section_id == ids[0])
		.expect("expected section");
	let expected = rollup::recompute(song.sections.iter().map(|section| section.confidence));

	assert_eq!(section.confidence, 80.0);
	assert!(section.confidence_score > 0.0);
	assert!(section.progress > 0.0);
	assert!(rollup::drift(song.confidence, expected) < 1e-9);
	assert!(song.last_time_played.is_none());
}

#[tokio::test]
async fn lowering_rehearsals_is_a_conflict_with_no_side_effects() {
	let (service, store) = super::build_service();
	let song_id = uuid::Uuid::new_v4();
	let mut section = testkit::section(song_id, "Verse", 0);

	section.rehearsals = 9;

	let (song_id, ids) = testkit::seed_consistent_song(&store, "Althea", vec![section]);
	let err = service
		.update_section(UpdateSectionRequest {
			rehearsals: Some(4),
			..update(song_id, ids[0])
		})
		.await
		.expect_err("expected Conflict");

	assert!(matches!(err, Error::Conflict { .. }));
	assert!(store.history(ids[0], StatProperty::Rehearsals).expect("history failed").is_empty());
	assert!(store.events().is_empty());
}

#[tokio::test]
async fn raising_rehearsals_marks_the_song_played() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 1);

	service
		.update_section(UpdateSectionRequest {
			rehearsals: Some(3),
			..update(song_id, ids[0])
		})
		.await
		.expect("update failed");

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert!(song.last_time_played.is_some());
	assert_eq!(song.sections[0].rehearsals, 3);
	assert!(song.sections[0].rehearsals_score > 0.0);
}

#[tokio::test]
async fn an_unchanged_value_appends_no_history() {
	let (service, store) = super::build_service();
	let song_id = uuid::Uuid::new_v4();
	let mut section = testkit::section(song_id, "Verse", 0);

	section.rehearsals = 5;

	let (song_id, ids) = testkit::seed_consistent_song(&store, "Bertha", vec![section]);
	let response = service
		.update_section(UpdateSectionRequest {
			rehearsals: Some(5),
			..update(song_id, ids[0])
		})
		.await
		.expect("update failed");

	assert!(!response.updated);
	assert!(store.history(ids[0], StatProperty::Rehearsals).expect("history failed").is_empty());
	assert!(store.events().is_empty());
}

#[tokio::test]
async fn renaming_updates_without_touching_the_ledger() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 1);
	let response = service
		.update_section(UpdateSectionRequest {
			name: Some("Outro jam".to_string()),
			..update(song_id, ids[0])
		})
		.await
		.expect("update failed");

	assert!(response.updated);
	assert!(store.history(ids[0], StatProperty::Rehearsals).expect("history failed").is_empty());
	assert!(store.history(ids[0], StatProperty::Confidence).expect("history failed").is_empty());

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert_eq!(song.sections[0].name, "Outro jam");
}

#[tokio::test]
async fn bad_requests_are_rejected() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 1);
	let nothing = service.update_section(update(song_id, ids[0])).await;
	let out_of_range = service
		.update_section(UpdateSectionRequest {
			confidence: Some(130.0),
			..update(song_id, ids[0])
		})
		.await;
	let negative = service
		.update_section(UpdateSectionRequest {
			occurrences: Some(-2),
			..update(song_id, ids[0])
		})
		.await;
	let missing = service
		.update_section(UpdateSectionRequest {
			confidence: Some(10.0),
			..update(song_id, uuid::Uuid::new_v4())
		})
		.await;

	assert!(matches!(nothing, Err(Error::InvalidRequest { .. })));
	assert!(matches!(out_of_range, Err(Error::InvalidRequest { .. })));
	assert!(matches!(negative, Err(Error::InvalidRequest { .. })));
	assert!(matches!(missing, Err(Error::NotFound { .. })));
}
