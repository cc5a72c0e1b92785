// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for the JSON wire format.
//!
//! These tests verify that:
//! 1. Documents survive a session round trip unchanged, cause order included
//! 2. Saved files decode to the document they were written from
//! 3. Decoded documents pass store validation

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use fishbone_core::Status;
use fishbone_core::catalog::SCHEMES;

use crate::datamodel::{AnalysisDocument, Cause, CauseId, WHY_COUNT};
use crate::json::*;
use crate::store::validate_document;

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z0-9 ,.'\"<>&]{0,40}".prop_map(|s| s.to_string()),
        "\\PC{0,20}".prop_map(|s| s.to_string()),
    ]
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop::sample::select(Status::ALL.to_vec())
}

fn cause_strategy(categories: &'static [&'static str]) -> impl Strategy<Value = Cause> {
    (
        prop::sample::select(categories.to_vec()),
        text_strategy(),
        1u8..=5,
        status_strategy(),
        text_strategy(),
        any::<bool>(),
        prop::collection::vec(text_strategy(), WHY_COUNT),
    )
        .prop_map(
            |(category, text, priority, status, comments, is_root_cause, whys)| {
                let mut cause = Cause::new(CauseId::new(1), category);
                cause.text = text;
                cause.priority = priority;
                cause.status = status;
                cause.comments = comments;
                cause.is_root_cause = is_root_cause;
                for (slot, why) in cause.whys.iter_mut().zip(whys) {
                    *slot = why;
                }
                cause
            },
        )
}

fn document_strategy() -> impl Strategy<Value = AnalysisDocument> {
    prop::sample::select(SCHEMES.to_vec()).prop_flat_map(|scheme| {
        (
            text_strategy(),
            prop::collection::vec(cause_strategy(scheme.categories), 0..12),
            0u32..4,
            any::<prop::sample::Index>(),
            any::<bool>(),
        )
            .prop_map(move |(problem, mut causes, gap, pick, select)| {
                // ids are increasing but not contiguous, as after deletes
                let mut next = 1;
                for cause in causes.iter_mut() {
                    next += gap;
                    cause.id = CauseId::new(next);
                    next += 1;
                }
                let selected_cause = if select && !causes.is_empty() {
                    Some(causes[pick.index(causes.len())].id)
                } else {
                    None
                };
                AnalysisDocument {
                    problem_statement: problem,
                    scheme_id: scheme.id.to_string(),
                    causes,
                    selected_cause,
                    next_cause_id: next,
                }
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn session_round_trip(doc in document_strategy()) {
        let json = to_session_json(&doc).unwrap();
        let decoded = from_session_json(&json).unwrap();
        prop_assert_eq!(&doc, &decoded);
        prop_assert!(validate_document(&decoded).is_ok());
    }

    #[test]
    fn analysis_file_round_trip(doc in document_strategy(), secs in 0i64..4_000_000_000) {
        let saved_at = Utc.timestamp_opt(secs, 0).unwrap();
        let json = to_analysis_file_json(&doc, saved_at).unwrap();
        prop_assert_eq!(doc, from_analysis_file_json(&json).unwrap());
    }

    #[test]
    fn cause_map_keeps_insertion_order(doc in document_strategy()) {
        let state = SessionState::from(&doc);
        let value = serde_json::to_string(&state.causes).unwrap();
        let reparsed: CauseMap = serde_json::from_str(&value).unwrap();
        let keys: Vec<String> = reparsed.0.iter().map(|(k, _)| k.clone()).collect();
        let expected: Vec<String> = doc.causes.iter().map(|c| c.id.to_string()).collect();
        prop_assert_eq!(expected, keys);
    }
}
