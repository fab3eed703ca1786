use woodshed_service::{FetchSongRequest, ReconcileRequest};
use woodshed_testkit as testkit;

#[tokio::test]
async fn drifted_aggregates_are_rewritten_from_the_children() {
	let (service, store) = super::build_service();
	let mut song = testkit::song("Terrapin");
	let song_id = song.song_id;
	let mut verse = testkit::section(song_id, "Verse", 0);
	let mut chorus = testkit::section(song_id, "Chorus", 1);

	verse.rehearsals = 4;
	chorus.rehearsals = 8;
	song.rehearsals = 99.0;

	store.seed_song(song, vec![verse, chorus]);

	let report =
		service.reconcile_song(ReconcileRequest { song_id }).await.expect("reconcile failed");

	assert!(report.applied);
	assert!(report.fields.iter().any(|field| field.applied && field.stored == 99.0));

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert!((song.rehearsals - 6.0).abs() < 1e-9);
}

#[tokio::test]
async fn reconciliation_is_idempotent() {
	let (service, store) = super::build_service();
	let mut song = testkit::song("Terrapin");
	let song_id = song.song_id;

	song.confidence = 12.0;

	store.seed_song(song, vec![testkit::section(song_id, "Verse", 0)]);

	let first =
		service.reconcile_song(ReconcileRequest { song_id }).await.expect("reconcile failed");
	let second =
		service.reconcile_song(ReconcileRequest { song_id }).await.expect("reconcile failed");

	assert!(first.applied);
	assert!(!second.applied);
	assert!(second.fields.iter().all(|field| !field.applied));
}

#[tokio::test]
async fn in_tolerance_aggregates_are_left_alone() {
	let (service, store) = super::build_service();
	let (song_id, _) = testkit::seed_plain_song(&store, 2);
	let report =
		service.reconcile_song(ReconcileRequest { song_id }).await.expect("reconcile failed");

	assert!(!report.applied);
	assert!(store.events().is_empty());
}

#[tokio::test]
async fn reconciling_an_empty_song_resets_to_zero() {
	let (service, store) = super::build_service();
	let mut song = testkit::song("Space");
	let song_id = song.song_id;

	song.progress = 55.0;

	store.seed_song(song, Vec::new());

	let report =
		service.reconcile_song(ReconcileRequest { song_id }).await.expect("reconcile failed");

	assert!(report.applied);

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert_eq!(song.progress, 0.0);
}
