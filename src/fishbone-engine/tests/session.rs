// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;

use chrono::{TimeZone, Utc};

use fishbone_core::ErrorCode;
use fishbone_engine::persistence::SESSION_KEY;
use fishbone_engine::{FileStorage, FishboneApp, Intent, SessionStorage};

#[test]
fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let mut app = FishboneApp::with_defaults(FileStorage::new(dir.path()));
        app.dispatch(Intent::SetProblemStatement("Pump leaks".to_string()))
            .unwrap();
        app.dispatch(Intent::AddCause {
            category: "Material".to_string(),
        })
        .unwrap();
        let id = app.document().causes[0].id;
        app.update_why(0, "Seal hardened").unwrap();
        app.save_cause().unwrap();
        id
    };

    let app = FishboneApp::with_defaults(FileStorage::new(dir.path()));
    let doc = app.document();
    assert_eq!("Pump leaks", doc.problem_statement);
    assert_eq!(1, doc.causes.len());
    assert_eq!(id, doc.causes[0].id);
    assert_eq!("Seal hardened", doc.causes[0].whys[0]);
    assert_eq!(2, doc.next_cause_id);
    assert!(!app.panel().is_editing());
}

#[test]
fn corrupt_session_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.set(SESSION_KEY, "{ not json").unwrap();

    let app = FishboneApp::with_defaults(storage);
    assert!(app.document().causes.is_empty());
    assert_eq!("6M", app.document().scheme_id);
}

#[test]
fn session_with_foreign_category_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage
        .set(
            SESSION_KEY,
            r#"{"problemStatement":"x","currentMethodology":"4P","causes":{"cause-1":{"id":"cause-1","category":"Machine","text":"t","priority":3,"status":"Not Started","comments":"","isRootCause":false,"whys":["","","","",""]}},"selectedCause":null,"nextCauseId":2}"#,
        )
        .unwrap();

    let app = FishboneApp::with_defaults(storage);
    assert!(app.document().causes.is_empty());
    assert_eq!("", app.document().problem_statement);
}

#[test]
fn saved_file_loads_into_another_app() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();

    let mut source = FishboneApp::with_defaults(FileStorage::new(dir.path().join("a")));
    source
        .dispatch(Intent::SetScheme("4P".to_string()))
        .unwrap();
    source
        .dispatch(Intent::AddCause {
            category: "Policy".to_string(),
        })
        .unwrap();
    let exported = source.save_file(now).unwrap();
    assert_eq!("fishbone-analysis-2026-10-19.json", exported.file_name);
    let path = exported.write_to(dir.path()).unwrap();

    let mut target = FishboneApp::with_defaults(FileStorage::new(dir.path().join("b")));
    let contents = fs::read_to_string(path).unwrap();
    target.load_file(&contents).unwrap();
    assert_eq!("4P", target.document().scheme_id);
    assert_eq!("Policy", target.document().causes[0].category);

    let err = target.load_file("{\"state\": 7}").unwrap_err();
    assert_eq!(ErrorCode::CorruptData, err.code);
    assert_eq!("4P", target.document().scheme_id);
}
