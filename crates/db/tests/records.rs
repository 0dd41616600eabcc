mod support;

use support::{id, make_post, setup_db};
use xwatch_core::{PostPayload, ResourceKind};

#[test]
fn upsert_replaces_same_id_without_duplicating() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    db.upsert_records(&[make_post("10", "first", 1, 1), make_post("11", "other", 0, 2)])
        .expect("first upsert");
    db.upsert_records(&[make_post("10", "edited", 7, 1)])
        .expect("second upsert");
    db.upsert_records(&[make_post("10", "edited", 9, 1)])
        .expect("third upsert");

    assert_eq!(db.count_records(ResourceKind::Post).expect("count"), 2);
    let stored = db
        .get_record(ResourceKind::Post, &id("10"))
        .expect("get")
        .expect("present");
    let payload: PostPayload = stored.decode().expect("decode");
    assert_eq!(payload.text, "edited");
    assert_eq!(payload.metrics.like_count, 9);

    let untouched = db
        .get_record(ResourceKind::Post, &id("11"))
        .expect("get")
        .expect("present");
    assert_eq!(untouched.decode::<PostPayload>().expect("decode").text, "other");
}

#[test]
fn records_are_scoped_by_kind() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let mut mention = make_post("10", "mention", 0, 1);
    mention.kind = ResourceKind::Mention;
    db.upsert_records(&[make_post("10", "post", 0, 1), mention])
        .expect("upsert");

    assert_eq!(db.count_records(ResourceKind::Post).expect("count"), 1);
    assert_eq!(db.count_records(ResourceKind::Mention).expect("count"), 1);
    assert_eq!(db.count_records(ResourceKind::Profile).expect("count"), 0);
    let posts = db.list_records(ResourceKind::Post).expect("list");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].kind, ResourceKind::Post);
}

#[test]
fn list_round_trips_timestamps_and_payload() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let original = make_post("42", "hello", 3, 5);
    db.upsert_records(std::slice::from_ref(&original))
        .expect("upsert");
    let listed = db.list_records(ResourceKind::Post).expect("list");
    assert_eq!(listed, vec![original]);
}

#[test]
fn missing_record_is_none() {
    let test_db = setup_db();
    assert!(
        test_db
            .db
            .get_record(ResourceKind::Post, &id("1"))
            .expect("get")
            .is_none()
    );
}
