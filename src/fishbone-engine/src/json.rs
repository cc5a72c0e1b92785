// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! JSON wire format for session snapshots and saved analysis files.
//!
//! Field names are camelCase and causes are stored as an object keyed by
//! cause id, in insertion order:
//!
//! ```json
//! {
//!   "currentMethodology": "6M",
//!   "problemStatement": "Line 3 stops",
//!   "causes": {
//!     "cause-1": {
//!       "id": "cause-1", "category": "Machine", "text": "Worn bearing",
//!       "priority": 5, "status": "In Progress", "comments": "",
//!       "isRootCause": true, "whys": ["", "", "", "", ""]
//!     }
//!   },
//!   "selectedCause": null,
//!   "nextCauseId": 2
//! }
//! ```
//!
//! A saved file wraps that record as `{"state": ..., "timestamp": ...}`.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use fishbone_core::catalog::DEFAULT_SCHEME_ID;
use fishbone_core::{Error, ErrorCode, ErrorKind, Result, Status};

use crate::datamodel::{AnalysisDocument, Cause, CauseId, WHY_COUNT};

const ANALYSIS_FILE_PREFIX: &str = "fishbone-analysis-";

// Helper functions for serde defaults and skip_serializing_if

fn default_methodology() -> String {
    DEFAULT_SCHEME_ID.to_string()
}

fn default_next_cause_id() -> u32 {
    1
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Default + serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn deserialize_null_methodology<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_else(default_methodology))
}

fn deserialize_null_next_cause_id<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_else(default_next_cause_id))
}

fn corrupt(details: String) -> Error {
    Error::new(ErrorKind::Import, ErrorCode::CorruptData, Some(details))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseRecord {
    pub id: String,
    pub category: String,
    pub text: String,
    pub priority: i64,
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub comments: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub is_root_cause: bool,
    pub whys: Vec<String>,
}

/// Causes keyed by id. Serializes as a JSON object but keeps entries in the
/// order they were inserted, which is also the order they are drawn in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CauseMap(pub Vec<(String, CauseRecord)>);

impl Serialize for CauseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, record) in &self.0 {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

struct CauseMapVisitor;

impl<'de> Visitor<'de> for CauseMapVisitor {
    type Value = CauseMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of causes keyed by id")
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<CauseMap, E> {
        Ok(CauseMap::default())
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<CauseMap, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, record)) = access.next_entry::<String, CauseRecord>()? {
            entries.push((key, record));
        }
        Ok(CauseMap(entries))
    }
}

impl<'de> Deserialize<'de> for CauseMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(CauseMapVisitor)
    }
}

/// The document as stored in the session and inside saved files. Every
/// field is optional on input; missing ones take the empty-document value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(
        default = "default_methodology",
        deserialize_with = "deserialize_null_methodology"
    )]
    pub current_methodology: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub problem_statement: String,
    #[serde(default)]
    pub causes: CauseMap,
    #[serde(default)]
    pub selected_cause: Option<String>,
    #[serde(
        default = "default_next_cause_id",
        deserialize_with = "deserialize_null_next_cause_id"
    )]
    pub next_cause_id: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::from(&AnalysisDocument::default())
    }
}

/// Contents of a `fishbone-analysis-<date>.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFile {
    pub state: SessionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&Cause> for CauseRecord {
    fn from(cause: &Cause) -> Self {
        CauseRecord {
            id: cause.id.to_string(),
            category: cause.category.clone(),
            text: cause.text.clone(),
            priority: i64::from(cause.priority),
            status: cause.status.as_str().to_string(),
            comments: cause.comments.clone(),
            is_root_cause: cause.is_root_cause,
            whys: cause.whys.to_vec(),
        }
    }
}

impl TryFrom<CauseRecord> for Cause {
    type Error = Error;

    fn try_from(record: CauseRecord) -> Result<Self> {
        let id: CauseId = record.id.parse()?;
        let priority = u8::try_from(record.priority)
            .map_err(|_| corrupt(format!("{id}: priority {} out of range", record.priority)))?;
        let status: Status = record
            .status
            .parse()
            .map_err(|_| corrupt(format!("{id}: unknown status '{}'", record.status)))?;
        let whys: [String; WHY_COUNT] = record.whys.try_into().map_err(|whys: Vec<String>| {
            corrupt(format!("{id}: expected {WHY_COUNT} whys, found {}", whys.len()))
        })?;

        Ok(Cause {
            id,
            category: record.category,
            text: record.text,
            priority,
            status,
            comments: record.comments,
            is_root_cause: record.is_root_cause,
            whys,
        })
    }
}

impl From<&AnalysisDocument> for SessionState {
    fn from(doc: &AnalysisDocument) -> Self {
        SessionState {
            current_methodology: doc.scheme_id.clone(),
            problem_statement: doc.problem_statement.clone(),
            causes: CauseMap(
                doc.causes
                    .iter()
                    .map(|c| (c.id.to_string(), CauseRecord::from(c)))
                    .collect(),
            ),
            selected_cause: doc.selected_cause.map(|id| id.to_string()),
            next_cause_id: doc.next_cause_id,
        }
    }
}

/// Decodes the record into a document. Only checks what the wire format
/// itself guarantees; scheme membership and the id counter are checked by
/// [`crate::store::validate_document`].
impl TryFrom<SessionState> for AnalysisDocument {
    type Error = Error;

    fn try_from(state: SessionState) -> Result<Self> {
        let mut causes = Vec::with_capacity(state.causes.0.len());
        for (key, record) in state.causes.0 {
            if key != record.id {
                return Err(corrupt(format!(
                    "cause stored under '{key}' has id '{}'",
                    record.id
                )));
            }
            causes.push(Cause::try_from(record)?);
        }

        let selected_cause = match state.selected_cause {
            Some(id) => Some(id.parse::<CauseId>()?),
            None => None,
        };

        Ok(AnalysisDocument {
            problem_statement: state.problem_statement,
            scheme_id: state.current_methodology,
            causes,
            selected_cause,
            next_cause_id: state.next_cause_id,
        })
    }
}

pub fn to_session_json(doc: &AnalysisDocument) -> Result<String> {
    serde_json::to_string(&SessionState::from(doc)).map_err(|err| {
        Error::new(
            ErrorKind::Storage,
            ErrorCode::Serialization,
            Some(err.to_string()),
        )
    })
}

pub fn from_session_json(json: &str) -> Result<AnalysisDocument> {
    let state: SessionState =
        serde_json::from_str(json).map_err(|err| corrupt(err.to_string()))?;
    AnalysisDocument::try_from(state)
}

/// Pretty-printed contents of a saved analysis file.
pub fn to_analysis_file_json(doc: &AnalysisDocument, saved_at: DateTime<Utc>) -> Result<String> {
    let file = AnalysisFile {
        state: SessionState::from(doc),
        timestamp: Some(saved_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    };
    serde_json::to_string_pretty(&file).map_err(|err| {
        Error::new(
            ErrorKind::Storage,
            ErrorCode::Serialization,
            Some(err.to_string()),
        )
    })
}

pub fn from_analysis_file_json(json: &str) -> Result<AnalysisDocument> {
    let file: AnalysisFile = serde_json::from_str(json).map_err(|err| corrupt(err.to_string()))?;
    AnalysisDocument::try_from(file.state)
}

pub fn analysis_file_name(date: NaiveDate) -> String {
    format!("{ANALYSIS_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}
