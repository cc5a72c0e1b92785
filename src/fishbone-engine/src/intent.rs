// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Typed user intents and their application to an [`AnalysisStore`].

use fishbone_core::Result;

use crate::datamodel::{AnalysisDocument, CauseFields, CauseId};
use crate::store::AnalysisStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    SetProblemStatement(String),
    SetScheme(String),
    AddCause { category: String },
    UpdateCause { id: CauseId, fields: CauseFields },
    UpdateWhy { id: CauseId, index: usize, value: String },
    DeleteCause(CauseId),
    SelectCause(CauseId),
    ClearSelection,
    Clear,
    Restore(Box<AnalysisDocument>),
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::SetProblemStatement(_) => "set_problem_statement",
            Intent::SetScheme(_) => "set_scheme",
            Intent::AddCause { .. } => "add_cause",
            Intent::UpdateCause { .. } => "update_cause",
            Intent::UpdateWhy { .. } => "update_why",
            Intent::DeleteCause(_) => "delete_cause",
            Intent::SelectCause(_) => "select_cause",
            Intent::ClearSelection => "clear_selection",
            Intent::Clear => "clear",
            Intent::Restore(_) => "restore",
        }
    }
}

/// What a successfully applied intent produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// Set when the intent created a cause.
    pub created: Option<CauseId>,
}

pub fn apply_intent(store: &mut AnalysisStore, intent: Intent) -> Result<Applied> {
    let name = intent.name();
    let mut applied = Applied::default();

    let result = match intent {
        Intent::SetProblemStatement(text) => {
            store.set_problem_statement(text);
            Ok(())
        }
        Intent::SetScheme(scheme_id) => store.set_scheme(&scheme_id),
        Intent::AddCause { category } => store.add_cause(&category).map(|id| {
            applied.created = Some(id);
        }),
        Intent::UpdateCause { id, fields } => store.update_cause(id, fields),
        Intent::UpdateWhy { id, index, value } => store.update_why(id, index, value),
        Intent::DeleteCause(id) => store.delete_cause(id).map(|_| ()),
        Intent::SelectCause(id) => store.select_cause(id),
        Intent::ClearSelection => {
            store.clear_selection();
            Ok(())
        }
        Intent::Clear => {
            store.clear();
            Ok(())
        }
        Intent::Restore(doc) => store.restore(*doc),
    };

    match result {
        Ok(()) => Ok(applied),
        Err(err) => {
            tracing::debug!(intent = name, error = %err, "intent rejected");
            Err(err)
        }
    }
}

/// Applies `intents` in order against a staged copy of the store. The store
/// is only updated if every intent succeeds.
pub fn apply_intents(store: &mut AnalysisStore, intents: Vec<Intent>) -> Result<Vec<Applied>> {
    let mut staged = store.clone();
    let mut results = Vec::with_capacity(intents.len());

    for intent in intents {
        results.push(apply_intent(&mut staged, intent)?);
    }

    *store = staged;
    Ok(results)
}
