use uuid::Uuid;

use woodshed_service::{Error, FetchSongRequest, MoveSectionRequest};
use woodshed_storage::models::MutationOp;
use woodshed_testkit as testkit;

#[tokio::test]
async fn moving_over_the_head_rotates_one_slot() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 5);
	let response = service
		.move_section(MoveSectionRequest {
			song_id,
			section_id: ids[2],
			over_id: ids[0],
		})
		.await
		.expect("move failed");
	let order_of = |section_id: Uuid| {
		response
			.sections
			.iter()
			.find(|position| position.section_id == section_id)
			.map(|position| position.order)
			.expect("expected position")
	};

	assert_eq!(order_of(ids[0]), 1);
	assert_eq!(order_of(ids[1]), 2);
	assert_eq!(order_of(ids[2]), 0);
	assert_eq!(order_of(ids[3]), 3);
	assert_eq!(order_of(ids[4]), 4);
}

#[tokio::test]
async fn moving_back_restores_the_original_order() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 6);

	service
		.move_section(MoveSectionRequest { song_id, section_id: ids[4], over_id: ids[1] })
		.await
		.expect("move failed");
	service
		.move_section(MoveSectionRequest { song_id, section_id: ids[4], over_id: ids[3] })
		.await
		.expect("move back failed");

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");
	let restored =
		song.sections.iter().map(|section| section.section_id).collect::<Vec<_>>();

	assert_eq!(restored, ids);
}

#[tokio::test]
async fn moving_over_a_missing_target_changes_nothing() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 4);
	let err = service
		.move_section(MoveSectionRequest {
			song_id,
			section_id: ids[1],
			over_id: Uuid::new_v4(),
		})
		.await
		.expect_err("expected NotFound");

	assert!(matches!(err, Error::NotFound { .. }));

	let song = service.fetch_song(FetchSongRequest { song_id }).await.expect("fetch failed");

	assert_eq!(
		song.sections.iter().map(|section| section.order).collect::<Vec<_>>(),
		vec![0, 1, 2, 3]
	);
	assert!(store.events().is_empty());
}

#[tokio::test]
async fn moving_in_a_missing_song_is_not_found() {
	let (service, _) = super::build_service();
	let err = service
		.move_section(MoveSectionRequest {
			song_id: Uuid::new_v4(),
			section_id: Uuid::new_v4(),
			over_id: Uuid::new_v4(),
		})
		.await
		.expect_err("expected NotFound");

	assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn a_committed_move_announces_itself() {
	let (service, store) = super::build_service();
	let (song_id, ids) = testkit::seed_plain_song(&store, 3);

	service
		.move_section(MoveSectionRequest { song_id, section_id: ids[0], over_id: ids[2] })
		.await
		.expect("move failed");

	let events = store.events();

	assert_eq!(events.len(), 1);
	assert_eq!(events[0].op, MutationOp::MoveSection);
}
