// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The analysis store: sole owner of the mutable [`AnalysisDocument`].
//!
//! Every operation either applies completely or returns an error and leaves
//! the document untouched. Consumers read through [`AnalysisStore::document`]
//! or take an owned [`AnalysisStore::snapshot`].

use std::collections::HashSet;

use fishbone_core::catalog::{self, MAX_PRIORITY, MIN_PRIORITY};
use fishbone_core::common::{Error, ErrorCode, ErrorKind, Result};
use fishbone_core::{import_err, store_err};

use crate::datamodel::{AnalysisDocument, Cause, CauseFields, CauseId, WHY_COUNT};

#[derive(Clone, Debug, Default)]
pub struct AnalysisStore {
    doc: AnalysisDocument,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Read-only view of the live document.
    pub fn document(&self) -> &AnalysisDocument {
        &self.doc
    }

    /// Owned copy of the document; later mutations don't affect it.
    pub fn snapshot(&self) -> AnalysisDocument {
        self.doc.clone()
    }

    pub fn set_problem_statement(&mut self, text: impl Into<String>) {
        self.doc.problem_statement = text.into();
    }

    /// Switches the active scheme. All causes are discarded: categories are
    /// not portable between schemes. Confirming that with the user is the
    /// caller's job.
    pub fn set_scheme(&mut self, scheme_id: &str) -> Result<()> {
        if catalog::scheme(scheme_id).is_none() {
            return store_err!(InvalidScheme, scheme_id.to_string());
        }

        let discarded = self.doc.causes.len();
        self.doc.scheme_id = scheme_id.to_string();
        self.doc.causes.clear();
        self.doc.selected_cause = None;
        tracing::debug!(scheme = scheme_id, discarded, "switched scheme");
        Ok(())
    }

    pub fn add_cause(&mut self, category: &str) -> Result<CauseId> {
        let in_scheme = self
            .doc
            .scheme()
            .map(|s| s.contains(category))
            .unwrap_or(false);
        if !in_scheme {
            return store_err!(
                InvalidCategory,
                format!("'{}' is not in scheme {}", category, self.doc.scheme_id)
            );
        }

        let Some(next) = self.doc.next_cause_id.checked_add(1) else {
            return store_err!(
                Validation,
                format!("cause ids exhausted at {}", self.doc.next_cause_id)
            );
        };
        let id = CauseId::new(self.doc.next_cause_id);
        self.doc.next_cause_id = next;
        self.doc.causes.push(Cause::new(id, category));
        tracing::debug!(%id, category, "added cause");
        Ok(id)
    }

    pub fn update_cause(&mut self, id: CauseId, fields: CauseFields) -> Result<()> {
        validate_priority(fields.priority)?;
        let Some(cause) = self.doc.get_cause_mut(id) else {
            return store_err!(NotFound, id.to_string());
        };
        cause.set_fields(fields);
        Ok(())
    }

    pub fn update_why(
        &mut self,
        id: CauseId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let Some(cause) = self.doc.get_cause_mut(id) else {
            return store_err!(NotFound, id.to_string());
        };
        if index >= WHY_COUNT {
            return store_err!(
                IndexOutOfRange,
                format!("why {} of {}", index, WHY_COUNT)
            );
        }
        cause.whys[index] = value.into();
        Ok(())
    }

    pub fn delete_cause(&mut self, id: CauseId) -> Result<Cause> {
        let Some(pos) = self.doc.causes.iter().position(|c| c.id == id) else {
            return store_err!(NotFound, id.to_string());
        };
        let removed = self.doc.causes.remove(pos);
        if self.doc.selected_cause == Some(id) {
            self.doc.selected_cause = None;
        }
        tracing::debug!(%id, "deleted cause");
        Ok(removed)
    }

    pub fn select_cause(&mut self, id: CauseId) -> Result<()> {
        if self.doc.get_cause(id).is_none() {
            return store_err!(NotFound, id.to_string());
        }
        self.doc.selected_cause = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.doc.selected_cause = None;
    }

    /// Resets to the initial empty document. Irreversible.
    pub fn clear(&mut self) {
        self.doc = AnalysisDocument::default();
    }

    /// Replaces the whole document after checking it for internal
    /// consistency; on error the current document is kept.
    pub fn restore(&mut self, doc: AnalysisDocument) -> Result<()> {
        validate_document(&doc)?;
        tracing::debug!(
            scheme = %doc.scheme_id,
            causes = doc.causes.len(),
            "restored document"
        );
        self.doc = doc;
        Ok(())
    }
}

fn validate_priority(priority: u8) -> Result<()> {
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return store_err!(
            Validation,
            format!(
                "priority {} outside {}..={}",
                priority, MIN_PRIORITY, MAX_PRIORITY
            )
        );
    }
    Ok(())
}

fn corrupt(details: String) -> Error {
    Error::new(ErrorKind::Import, ErrorCode::CorruptData, Some(details))
}

/// Checks the invariants a document must hold before it can be installed
/// in a store.
///
/// A counter at `u32::MAX` is accepted; such a document loads but rejects
/// further causes.
pub fn validate_document(doc: &AnalysisDocument) -> Result<()> {
    if doc.next_cause_id == 0 {
        return import_err!(CorruptData, "next cause id must be at least 1".to_string());
    }

    let scheme = doc
        .scheme()
        .ok_or_else(|| corrupt(format!("unknown scheme '{}'", doc.scheme_id)))?;

    let mut seen = HashSet::with_capacity(doc.causes.len());
    for cause in &doc.causes {
        if !seen.insert(cause.id) {
            return import_err!(CorruptData, format!("duplicate cause id {}", cause.id));
        }
        if !scheme.contains(&cause.category) {
            return import_err!(
                CorruptData,
                format!(
                    "{}: category '{}' is not in scheme {}",
                    cause.id, cause.category, scheme.id
                )
            );
        }
        if validate_priority(cause.priority).is_err() {
            return import_err!(
                CorruptData,
                format!("{}: priority {} out of range", cause.id, cause.priority)
            );
        }
        if cause.id.number() >= doc.next_cause_id {
            return import_err!(
                CorruptData,
                format!("{} is not below the next id counter {}", cause.id, doc.next_cause_id)
            );
        }
    }

    if let Some(selected) = doc.selected_cause {
        if !seen.contains(&selected) {
            return import_err!(
                CorruptData,
                format!("selected cause {selected} does not exist")
            );
        }
    }

    Ok(())
}
