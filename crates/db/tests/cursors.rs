mod support;

use support::{id, setup_db};
use xwatch_core::ResourceKind;

#[test]
fn cursor_converges_to_numeric_max_regardless_of_order() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    assert!(db.cursor_for(ResourceKind::Mention).expect("cursor").is_none());

    db.advance_cursor(ResourceKind::Mention, &[id("5"), id("3"), id("9")])
        .expect("advance");
    db.advance_cursor(ResourceKind::Mention, &[id("10")])
        .expect("advance");
    db.advance_cursor(ResourceKind::Mention, &[id("7"), id("2")])
        .expect("advance");

    assert_eq!(
        db.cursor_for(ResourceKind::Mention).expect("cursor"),
        Some(id("10"))
    );
}

#[test]
fn empty_observation_is_a_no_op() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    assert_eq!(
        db.advance_cursor(ResourceKind::Post, &[]).expect("advance"),
        None
    );
    db.advance_cursor(ResourceKind::Post, &[id("20")])
        .expect("advance");
    assert_eq!(
        db.advance_cursor(ResourceKind::Post, &[]).expect("advance"),
        Some(id("20"))
    );
}

#[test]
fn cursors_are_independent_per_stream() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    db.advance_cursor(ResourceKind::Post, &[id("100")])
        .expect("advance");
    db.advance_cursor(ResourceKind::Mention, &[id("4")])
        .expect("advance");
    assert_eq!(db.cursor_for(ResourceKind::Post).expect("cursor"), Some(id("100")));
    assert_eq!(db.cursor_for(ResourceKind::Mention).expect("cursor"), Some(id("4")));
}
