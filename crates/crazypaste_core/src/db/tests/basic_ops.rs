//! Create/read/update/delete behavior.

use super::*;
use std::collections::HashSet;

#[test]
fn create_then_get_round_trips_fields() {
    let (db, _clock, _temp) = setup_temp_db();

    let created = db
        .pastes
        .create(CreatePasteRequest {
            title: Some("  greeting ".to_string()),
            content: "fn main() {}".to_string(),
            language: Some("rust".to_string()),
            expiration: Some("never".to_string()),
            password: None,
            burn_after_reading: false,
        })
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.created, T0);
    assert_eq!(created.expires, None);

    let fetched = db.pastes.get_by_id(&created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.title, "greeting");
    assert_eq!(fetched.content, "fn main() {}");
    assert_eq!(fetched.language, "rust");
}

#[test]
fn create_applies_title_and_language_defaults() {
    let (db, _clock, _temp) = setup_temp_db();

    let created = db
        .pastes
        .create(CreatePasteRequest {
            title: Some("   ".to_string()),
            ..request("plain")
        })
        .unwrap();
    let fetched = db.pastes.get_by_id(&created.id).unwrap().unwrap();
    assert_eq!(fetched.title, crate::DEFAULT_TITLE);
    assert_eq!(fetched.language, crate::PLAIN_TEXT_LANGUAGE);
}

#[test]
fn create_rejects_blank_content_without_writing() {
    let (db, _clock, _temp) = setup_temp_db();

    let err = db.pastes.create(request("  \n ")).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(!err.is_storage_failure());
    assert!(db.pastes.get_all().unwrap().is_empty());
}

#[test]
fn created_ids_are_pairwise_distinct() {
    let (db, _clock, _temp) = setup_temp_db();

    let ids: HashSet<String> = (0..200)
        .map(|i| db.pastes.create(request(&format!("paste {}", i))).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 200);
    assert_eq!(db.pastes.get_all().unwrap().len(), 200);
}

#[test]
fn create_prepends_newest_first() {
    let (db, clock, _temp) = setup_temp_db();

    let first = db.pastes.create(request("first")).unwrap();
    clock.advance_millis(1);
    let second = db.pastes.create(request("second")).unwrap();

    let all = db.pastes.get_all().unwrap();
    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[test]
fn get_missing_id_is_none() {
    let (db, _clock, _temp) = setup_temp_db();
    assert!(db.pastes.get_by_id("missing").unwrap().is_none());
    assert!(db.pastes.peek("missing").unwrap().is_none());
}

#[test]
fn delete_reports_existence_and_is_idempotent() {
    let (db, _clock, _temp) = setup_temp_db();
    let keep = db.pastes.create(request("keep")).unwrap();
    let doomed = db.pastes.create(request("doomed")).unwrap();

    assert!(db.pastes.delete(&doomed.id).unwrap());
    let after_first = db.pastes.get_all().unwrap();
    assert!(db.pastes.get_by_id(&doomed.id).unwrap().is_none());

    assert!(!db.pastes.delete(&doomed.id).unwrap());
    let after_second = db.pastes.get_all().unwrap();
    assert!(db.pastes.get_by_id(&doomed.id).unwrap().is_none());

    assert_eq!(after_first, after_second);
    assert_eq!(after_first.len(), 1);
    assert_eq!(after_first[0].id, keep.id);
}

#[test]
fn update_replaces_record_but_keeps_created() {
    let (db, _clock, _temp) = setup_temp_db();
    let original = db.pastes.create(request("before")).unwrap();

    let mut changed = original.clone();
    changed.content = "after".to_string();
    changed.title = "renamed".to_string();
    changed.created = 1;
    assert!(db.pastes.update(&changed).unwrap());

    let fetched = db.pastes.peek(&original.id).unwrap().unwrap();
    assert_eq!(fetched.content, "after");
    assert_eq!(fetched.title, "renamed");
    assert_eq!(fetched.created, original.created);
}

#[test]
fn update_rejects_invalid_replacement_without_writing() {
    let (db, _clock, _temp) = setup_temp_db();
    let original = db.pastes.create(request("keep me")).unwrap();

    let mut blank = original.clone();
    blank.content = "   ".to_string();
    let err = db.pastes.update(&blank).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut backwards = original.clone();
    backwards.expires = Some(original.created);
    let err = db.pastes.update(&backwards).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let fetched = db.pastes.peek(&original.id).unwrap().unwrap();
    assert_eq!(fetched, original);
}

#[test]
fn update_missing_paste_returns_false() {
    let (db, _clock, _temp) = setup_temp_db();
    let mut ghost = db.pastes.create(request("ghost")).unwrap();
    ghost.id = "not-stored".to_string();
    assert!(!db.pastes.update(&ghost).unwrap());
    assert!(db.pastes.peek("not-stored").unwrap().is_none());
}

#[test]
fn insert_rejects_duplicate_ids_and_invalid_records() {
    let (db, _clock, _temp) = setup_temp_db();
    let stored = db.pastes.create(request("original")).unwrap();

    let err = db.pastes.insert(&stored).unwrap_err();
    assert!(matches!(err, AppError::StorageMessage(_)));

    let mut backwards = stored.clone();
    backwards.id = "backwards".to_string();
    backwards.expires = Some(backwards.created);
    let err = db.pastes.insert(&backwards).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn data_survives_reopen() {
    let (db, _clock, temp) = setup_temp_db();
    let created = db.pastes.create(request("durable")).unwrap();
    drop(db);

    let path = temp.path().join("test.db");
    let reopened = Database::new(path.to_str().unwrap()).unwrap();
    let fetched = reopened.pastes.peek(&created.id).unwrap().unwrap();
    assert_eq!(fetched.content, "durable");
}

#[test]
fn second_open_of_same_path_is_locked() {
    let (db, _clock, temp) = setup_temp_db();
    let path = temp.path().join("test.db");
    let err = Database::new(path.to_str().unwrap()).err().expect("second open fails");
    assert!(matches!(err, AppError::Locked(_)), "unexpected error: {}", err);
    drop(db);
}
