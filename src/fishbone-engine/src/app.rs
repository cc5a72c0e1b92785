// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The application cycle: apply an intent, recompute the diagram and the
//! report from scratch, then write the session snapshot.

use chrono::{DateTime, Utc};
use fishbone_core::Result;

use crate::datamodel::{AnalysisDocument, CauseId};
use crate::diagram::common::Point;
use crate::diagram::{Affordance, hit_test, render_svg};
use crate::intent::{Intent, apply_intent, apply_intents};
use crate::layout::config::{Canvas, LayoutConfig};
use crate::layout::{DiagramLayout, layout_document};
use crate::panel::PanelController;
use crate::persistence::{
    ExportedFile, SessionStorage, clear_session, export_analysis, export_report, import_analysis,
    load_session, save_session,
};
use crate::report::{Report, generate_report};
use crate::store::AnalysisStore;

/// Length past which the problem statement is flagged as too long. It is
/// never truncated.
pub const PROBLEM_STATEMENT_SOFT_LIMIT: usize = 450;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemStatementView {
    pub text: String,
    pub char_count: usize,
    pub over_limit: bool,
}

impl ProblemStatementView {
    pub fn new(text: &str) -> Self {
        let char_count = text.chars().count();
        ProblemStatementView {
            text: text.to_string(),
            char_count,
            over_limit: char_count > PROBLEM_STATEMENT_SOFT_LIMIT,
        }
    }
}

/// Everything derived from the document after a mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub layout: DiagramLayout,
    pub report: Report,
    pub problem: ProblemStatementView,
}

impl Frame {
    fn compute(doc: &AnalysisDocument, canvas: Canvas, config: &LayoutConfig) -> Self {
        Frame {
            layout: layout_document(doc, canvas, config),
            report: generate_report(doc),
            problem: ProblemStatementView::new(&doc.problem_statement),
        }
    }

    pub fn svg(&self) -> String {
        render_svg(&self.layout)
    }
}

pub struct FishboneApp<S: SessionStorage> {
    store: AnalysisStore,
    panel: PanelController,
    storage: S,
    canvas: Canvas,
    config: LayoutConfig,
    frame: Frame,
}

impl<S: SessionStorage> FishboneApp<S> {
    /// Restores the last session from `storage`, if any. A restored
    /// selection is kept but the editor is not reopened.
    pub fn startup(storage: S, canvas: Canvas, config: LayoutConfig) -> Self {
        let mut store = AnalysisStore::new();
        if !storage.is_available() {
            tracing::warn!(backend = storage.name(), "session storage unavailable");
        } else if let Err(err) = store.restore(load_session(&storage)) {
            tracing::warn!(error = %err, "discarding session");
        }
        let frame = Frame::compute(store.document(), canvas, &config);
        FishboneApp {
            store,
            panel: PanelController::new(),
            storage,
            canvas,
            config,
            frame,
        }
    }

    pub fn with_defaults(storage: S) -> Self {
        Self::startup(storage, Canvas::default(), LayoutConfig::default())
    }

    pub fn document(&self) -> &AnalysisDocument {
        self.store.document()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelController {
        &mut self.panel
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Applies `intent` and redraws. A newly added cause is opened in the
    /// editor straight away.
    pub fn dispatch(&mut self, intent: Intent) -> Result<&Frame> {
        let applied = apply_intent(&mut self.store, intent)?;
        if let Some(id) = applied.created {
            let select = self.panel.open_cause(self.store.document(), id)?;
            apply_intent(&mut self.store, select)?;
        }
        Ok(self.refresh())
    }

    /// Applies every intent or none of them, then redraws once.
    pub fn dispatch_all(&mut self, intents: Vec<Intent>) -> Result<&Frame> {
        apply_intents(&mut self.store, intents)?;
        Ok(self.refresh())
    }

    fn refresh(&mut self) -> &Frame {
        let doc = self.store.document();
        self.panel.sync(doc);
        self.frame = Frame::compute(doc, self.canvas, &self.config);
        tracing::debug!(causes = doc.causes.len(), "redrew diagram");

        if let Err(err) = save_session(&self.storage, doc) {
            tracing::warn!(backend = self.storage.name(), error = %err, "could not save session");
        }
        &self.frame
    }

    /// Acts on a click at `point` on the diagram and reports what was hit.
    pub fn click(&mut self, point: Point) -> Result<Option<Affordance>> {
        let Some(affordance) = hit_test(&self.frame.layout, point) else {
            return Ok(None);
        };
        match affordance {
            Affordance::AddCause(category) => {
                self.dispatch(Intent::AddCause {
                    category: category.to_string(),
                })?;
            }
            Affordance::Cause(id) => {
                self.open_cause(id)?;
            }
            Affordance::Category(category) => {
                self.panel.show_category(self.store.document(), category)?;
            }
            // Editing the statement happens in the text field.
            Affordance::ProblemBox => {}
        }
        Ok(Some(affordance))
    }

    pub fn open_cause(&mut self, id: CauseId) -> Result<&Frame> {
        let select = self.panel.open_cause(self.store.document(), id)?;
        self.dispatch(select)
    }

    /// Commits the editor's staged fields. On error the editor stays open
    /// with its edits.
    pub fn save_cause(&mut self) -> Result<&Frame> {
        match self.panel.save() {
            Some(intents) => {
                apply_intents(&mut self.store, intents)?;
                self.panel.close_editor();
                Ok(self.refresh())
            }
            None => Ok(&self.frame),
        }
    }

    pub fn cancel_edit(&mut self) -> Result<&Frame> {
        match self.panel.cancel() {
            Some(intent) => self.dispatch(intent),
            None => Ok(&self.frame),
        }
    }

    pub fn delete_cause(&mut self) -> Result<&Frame> {
        match self.panel.delete() {
            Some(intent) => {
                apply_intent(&mut self.store, intent)?;
                self.panel.close_editor();
                Ok(self.refresh())
            }
            None => Ok(&self.frame),
        }
    }

    pub fn update_why(&mut self, index: usize, value: impl Into<String>) -> Result<&Frame> {
        match self.panel.update_why(index, value) {
            Some(intent) => self.dispatch(intent),
            None => Ok(&self.frame),
        }
    }

    pub fn save_file(&self, now: DateTime<Utc>) -> Result<ExportedFile> {
        export_analysis(self.store.document(), now)
    }

    /// Replaces the document with a saved file's. A bad file leaves the
    /// current document as it was.
    pub fn load_file(&mut self, contents: &str) -> Result<&Frame> {
        let doc = import_analysis(contents)?;
        self.panel = PanelController::new();
        self.dispatch(Intent::Restore(Box::new(doc)))
    }

    pub fn export_report(&self, now: DateTime<Utc>) -> ExportedFile {
        export_report(self.store.document(), now)
    }

    /// Starts over with an empty document and drops the stored session
    /// before the fresh one is written.
    pub fn clear(&mut self) -> Result<&Frame> {
        if let Err(err) = clear_session(&self.storage) {
            tracing::warn!(backend = self.storage.name(), error = %err, "could not clear session");
        }
        self.panel = PanelController::new();
        self.dispatch(Intent::Clear)
    }
}
