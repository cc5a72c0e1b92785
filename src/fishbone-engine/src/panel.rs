// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! View-models for the detail panel and the cause editor.
//!
//! Nothing here mutates the document. Edits are staged in an [`EditBuffer`]
//! and leave the panel as [`Intent`]s for the caller to dispatch.

use fishbone_core::catalog::{self, MAX_PRIORITY, MIN_PRIORITY};
use fishbone_core::{Result, Status, store_err};

use crate::datamodel::{AnalysisDocument, Cause, CauseFields, CauseId, WHY_COUNT};
use crate::intent::Intent;

pub const EMPTY_CATEGORY_HINT: &str = "No causes added yet. Click the + button to add a cause.";
pub const WHY_PLACEHOLDER: &str = "Why did this happen?";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Diagram,
    Analysis,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CauseSummary {
    pub id: CauseId,
    pub text: String,
    pub priority_label: &'static str,
    pub priority_color: &'static str,
    pub status: Status,
    pub comments: Option<String>,
    pub is_root_cause: bool,
}

impl From<&Cause> for CauseSummary {
    fn from(cause: &Cause) -> Self {
        let level = cause.priority_level();
        CauseSummary {
            id: cause.id,
            text: cause.text.clone(),
            priority_label: level.label,
            priority_color: level.color,
            status: cause.status,
            comments: (!cause.comments.is_empty()).then(|| cause.comments.clone()),
            is_root_cause: cause.is_root_cause,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDetails {
    pub category: String,
    pub color: &'static str,
    pub causes: Vec<CauseSummary>,
}

impl CategoryDetails {
    /// "Machine (2 causes)", or just the category when it is empty.
    pub fn heading(&self) -> String {
        if self.causes.is_empty() {
            self.category.clone()
        } else {
            format!("{} ({} causes)", self.category, self.causes.len())
        }
    }

    /// Hint shown in place of the list when the category has no causes.
    pub fn empty_hint(&self) -> Option<&'static str> {
        self.causes.is_empty().then_some(EMPTY_CATEGORY_HINT)
    }
}

/// Lists the causes filed under `category`. Fails if the category isn't part
/// of the document's scheme.
pub fn category_details(doc: &AnalysisDocument, category: &str) -> Result<CategoryDetails> {
    let in_scheme = doc.scheme().is_some_and(|s| s.contains(category));
    if !in_scheme {
        return store_err!(InvalidCategory, category.to_string());
    }
    Ok(CategoryDetails {
        category: category.to_string(),
        color: catalog::category_color(category),
        causes: doc.causes_in(category).map(CauseSummary::from).collect(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhyRow {
    pub index: usize,
    pub label: String,
    pub value: String,
    pub placeholder: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiveWhysView {
    pub cause: CauseId,
    pub title: String,
    pub rows: Vec<WhyRow>,
}

pub fn five_whys_view(cause: &Cause) -> FiveWhysView {
    let rows = (0..WHY_COUNT)
        .map(|index| WhyRow {
            index,
            label: format!("Why {}:", index + 1),
            value: cause.whys[index].clone(),
            placeholder: WHY_PLACEHOLDER,
        })
        .collect();
    FiveWhysView {
        cause: cause.id,
        title: format!("5 Whys Analysis for: {}", cause.text),
        rows,
    }
}

/// Uncommitted edits to one cause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditBuffer {
    id: CauseId,
    fields: CauseFields,
}

impl EditBuffer {
    pub fn new(cause: &Cause) -> Self {
        EditBuffer {
            id: cause.id,
            fields: cause.fields(),
        }
    }

    pub fn id(&self) -> CauseId {
        self.id
    }

    pub fn fields(&self) -> &CauseFields {
        &self.fields
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.fields.text = text.into();
    }

    /// Out-of-range priorities are rejected here, before they can reach the
    /// store.
    pub fn set_priority(&mut self, priority: u8) -> Result<()> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return store_err!(Validation, format!("priority {priority} out of range"));
        }
        self.fields.priority = priority;
        Ok(())
    }

    pub fn set_status(&mut self, status: Status) {
        self.fields.status = status;
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.fields.comments = comments.into();
    }

    pub fn set_root_cause(&mut self, is_root_cause: bool) {
        self.fields.is_root_cause = is_root_cause;
    }
}

/// Tracks what the panel is showing and turns panel actions into intents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelController {
    tab: Tab,
    category: Option<String>,
    editor: Option<EditBuffer>,
    whys_for: Option<CauseId>,
}

impl PanelController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn editor(&self) -> Option<&EditBuffer> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditBuffer> {
        self.editor.as_mut()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn show_category(
        &mut self,
        doc: &AnalysisDocument,
        category: &str,
    ) -> Result<CategoryDetails> {
        let details = category_details(doc, category)?;
        self.category = Some(category.to_string());
        Ok(details)
    }

    /// Details of the category last shown, recomputed from `doc`.
    pub fn category_view(&self, doc: &AnalysisDocument) -> Option<CategoryDetails> {
        let category = self.category.as_deref()?;
        category_details(doc, category).ok()
    }

    /// 5 Whys rows for the cause last opened, recomputed from `doc`.
    pub fn five_whys(&self, doc: &AnalysisDocument) -> Option<FiveWhysView> {
        let id = self.whys_for?;
        doc.get_cause(id).map(five_whys_view)
    }

    /// Opens `id` in the editor, shows its category and 5 Whys on the
    /// analysis tab. Returns the intent that selects it.
    pub fn open_cause(&mut self, doc: &AnalysisDocument, id: CauseId) -> Result<Intent> {
        let Some(cause) = doc.get_cause(id) else {
            return store_err!(NotFound, id.to_string());
        };
        self.editor = Some(EditBuffer::new(cause));
        self.category = Some(cause.category.clone());
        self.whys_for = Some(id);
        self.tab = Tab::Analysis;
        Ok(Intent::SelectCause(id))
    }

    /// Intents that commit the staged edits and deselect the cause. The
    /// editor stays open until [`PanelController::close_editor`], so a
    /// rejected save keeps the user's edits.
    pub fn save(&self) -> Option<Vec<Intent>> {
        let editor = self.editor.as_ref()?;
        Some(vec![
            Intent::UpdateCause {
                id: editor.id,
                fields: editor.fields.clone(),
            },
            Intent::ClearSelection,
        ])
    }

    /// Discards staged edits.
    pub fn cancel(&mut self) -> Option<Intent> {
        self.editor.take().map(|_| Intent::ClearSelection)
    }

    pub fn delete(&self) -> Option<Intent> {
        self.editor
            .as_ref()
            .map(|editor| Intent::DeleteCause(editor.id))
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Answers for the 5 Whys commit one slot at a time.
    pub fn update_why(&self, index: usize, value: impl Into<String>) -> Option<Intent> {
        let id = self.whys_for?;
        Some(Intent::UpdateWhy {
            id,
            index,
            value: value.into(),
        })
    }

    /// Drops references to causes or categories that `doc` no longer has.
    pub fn sync(&mut self, doc: &AnalysisDocument) {
        if self
            .editor
            .as_ref()
            .is_some_and(|editor| doc.get_cause(editor.id).is_none())
        {
            self.editor = None;
        }
        if self.whys_for.is_some_and(|id| doc.get_cause(id).is_none()) {
            self.whys_for = None;
        }
        let scheme = doc.scheme();
        if self
            .category
            .as_deref()
            .is_some_and(|category| !scheme.is_some_and(|s| s.contains(category)))
        {
            self.category = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::apply_intents;
    use crate::store::AnalysisStore;
    use fishbone_core::ErrorCode;

    #[test]
    fn empty_category_shows_hint() {
        let doc = AnalysisDocument::default();
        let details = category_details(&doc, "Material").unwrap();
        assert_eq!("Material", details.heading());
        assert_eq!(Some(EMPTY_CATEGORY_HINT), details.empty_hint());
        assert_eq!("#27ae60", details.color);

        let err = category_details(&doc, "Policy").unwrap_err();
        assert_eq!(ErrorCode::InvalidCategory, err.code);
    }

    #[test]
    fn category_lists_causes_with_priority_labels() {
        let mut store = AnalysisStore::new();
        let id = store.add_cause("Method").unwrap();
        let fields = CauseFields {
            priority: 2,
            comments: "seen twice".to_string(),
            is_root_cause: true,
            ..CauseFields::default()
        };
        store.update_cause(id, fields).unwrap();
        store.add_cause("Method").unwrap();

        let details = category_details(store.document(), "Method").unwrap();
        assert_eq!("Method (2 causes)", details.heading());
        assert_eq!(None, details.empty_hint());
        let first = &details.causes[0];
        assert_eq!(("Low", "#f1c40f"), (first.priority_label, first.priority_color));
        assert_eq!(Some("seen twice".to_string()), first.comments);
        assert!(first.is_root_cause);
        assert_eq!(None, details.causes[1].comments);
    }

    #[test]
    fn five_whys_rows() {
        let mut cause = Cause::new(CauseId::new(3), "Machine");
        cause.whys[1] = "Lubrication skipped".to_string();
        let view = five_whys_view(&cause);
        assert_eq!("5 Whys Analysis for: New Cause", view.title);
        assert_eq!(WHY_COUNT, view.rows.len());
        assert_eq!("Why 1:", view.rows[0].label);
        assert_eq!("Why 5:", view.rows[4].label);
        assert_eq!("Lubrication skipped", view.rows[1].value);
        assert!(view.rows.iter().all(|r| r.placeholder == WHY_PLACEHOLDER));
    }

    #[test]
    fn edit_buffer_rejects_bad_priority() {
        let mut buffer = EditBuffer::new(&Cause::new(CauseId::new(1), "Method"));
        assert_eq!(ErrorCode::Validation, buffer.set_priority(0).unwrap_err().code);
        assert_eq!(ErrorCode::Validation, buffer.set_priority(6).unwrap_err().code);
        buffer.set_priority(5).unwrap();
        assert_eq!(5, buffer.fields().priority);
    }

    #[test]
    fn open_edit_save_flow() {
        let mut store = AnalysisStore::new();
        let id = store.add_cause("Machine").unwrap();
        let mut panel = PanelController::new();
        assert_eq!(Tab::Diagram, panel.tab());

        let select = panel.open_cause(store.document(), id).unwrap();
        assert_eq!(Intent::SelectCause(id), select);
        assert_eq!(Tab::Analysis, panel.tab());
        apply_intents(&mut store, vec![select]).unwrap();
        assert_eq!(Some(id), store.document().selected_cause);

        let editor = panel.editor_mut().unwrap();
        editor.set_text("Worn bearing");
        editor.set_status(Status::Completed);
        editor.set_root_cause(true);
        // staged edits don't touch the store
        assert_eq!("New Cause", store.document().causes[0].text);

        apply_intents(&mut store, panel.save().unwrap()).unwrap();
        panel.close_editor();
        let cause = &store.document().causes[0];
        assert_eq!("Worn bearing", cause.text);
        assert_eq!(Status::Completed, cause.status);
        assert!(cause.is_root_cause);
        assert_eq!(None, store.document().selected_cause);
        assert!(!panel.is_editing());
        assert_eq!(
            "Machine (1 causes)",
            panel.category_view(store.document()).unwrap().heading()
        );
    }

    #[test]
    fn cancel_discards_edits() {
        let mut store = AnalysisStore::new();
        let id = store.add_cause("Machine").unwrap();
        let mut panel = PanelController::new();
        panel.open_cause(store.document(), id).unwrap();
        panel.editor_mut().unwrap().set_text("changed");

        assert_eq!(Some(Intent::ClearSelection), panel.cancel());
        assert!(!panel.is_editing());
        assert_eq!(None, panel.cancel());
        assert_eq!("New Cause", store.document().causes[0].text);
    }

    #[test]
    fn delete_and_sync_close_the_editor() {
        let mut store = AnalysisStore::new();
        let id = store.add_cause("Machine").unwrap();
        let mut panel = PanelController::new();
        panel.open_cause(store.document(), id).unwrap();

        let intent = panel.delete().unwrap();
        assert_eq!(Intent::DeleteCause(id), intent);
        apply_intents(&mut store, vec![intent]).unwrap();
        panel.sync(store.document());
        assert!(!panel.is_editing());
        assert_eq!(None, panel.five_whys(store.document()));
        assert_eq!(None, panel.update_why(0, "x"));
    }

    #[test]
    fn scheme_switch_drops_shown_category() {
        let mut store = AnalysisStore::new();
        let mut panel = PanelController::new();
        panel.show_category(store.document(), "Machine").unwrap();
        store.set_scheme("4P").unwrap();
        panel.sync(store.document());
        assert_eq!(None, panel.category_view(store.document()));
    }

    #[test]
    fn open_missing_cause_fails() {
        let mut panel = PanelController::new();
        let err = panel
            .open_cause(&AnalysisDocument::default(), CauseId::new(9))
            .unwrap_err();
        assert_eq!(ErrorCode::NotFound, err.code);
        assert_eq!(Tab::Diagram, panel.tab());

        panel.switch_tab(Tab::Analysis);
        assert_eq!(Tab::Analysis, panel.tab());
        assert!(!panel.is_editing());
    }

    #[test]
    fn why_edits_target_opened_cause() {
        let mut store = AnalysisStore::new();
        let id = store.add_cause("Measurement").unwrap();
        let mut panel = PanelController::new();
        panel.open_cause(store.document(), id).unwrap();
        panel.cancel();

        // the 5 Whys stay available after the editor closes
        let intent = panel.update_why(2, "Gauge drift").unwrap();
        apply_intents(&mut store, vec![intent]).unwrap();
        let view = panel.five_whys(store.document()).unwrap();
        assert_eq!("Gauge drift", view.rows[2].value);
    }
}
