// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::datamodel::CauseId;
use crate::diagram::common::{Point, Rect};
use crate::layout::text::{LINE_HEIGHT, estimate_text_width};
use crate::layout::{CategoryBranch, CauseLeaf, DiagramLayout};

/// Extra slack around label boxes so clicks just beside the glyphs land.
const LABEL_PADDING: f64 = 3.0;

/// A clickable part of the diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affordance {
    ProblemBox,
    Category(&'static str),
    AddCause(&'static str),
    Cause(CauseId),
}

impl Affordance {
    /// The `data-action` value the renderer attaches to this affordance.
    pub fn action(&self) -> &'static str {
        match self {
            Affordance::ProblemBox => "edit-problem",
            Affordance::Category(_) => "show-category",
            Affordance::AddCause(_) => "add-cause",
            Affordance::Cause(_) => "edit-cause",
        }
    }
}

/// Labels are centered on their point with the baseline at `y`.
pub fn category_label_bounds(branch: &CategoryBranch) -> Rect {
    let width = estimate_text_width(branch.category);
    Rect {
        top: branch.label.y - LINE_HEIGHT - LABEL_PADDING,
        left: branch.label.x - width / 2.0 - LABEL_PADDING,
        right: branch.label.x + width / 2.0 + LABEL_PADDING,
        bottom: branch.label.y + LABEL_PADDING,
    }
}

/// Cause labels start at the leaf position with the baseline at `y`.
pub fn cause_label_bounds(leaf: &CauseLeaf) -> Rect {
    let width = estimate_text_width(&leaf.label);
    Rect {
        top: leaf.position.y - LINE_HEIGHT - LABEL_PADDING,
        left: leaf.position.x - LABEL_PADDING,
        right: leaf.position.x + width + LABEL_PADDING,
        bottom: leaf.position.y + LABEL_PADDING,
    }
}

/// Finds the affordance under `point`.
///
/// Add controls win over cause labels, which win over category labels, which
/// win over the problem box. Among causes the most recently placed one is on
/// top, matching paint order.
pub fn hit_test(layout: &DiagramLayout, point: Point) -> Option<Affordance> {
    if let Some(branch) = layout
        .branches
        .iter()
        .find(|b| b.add_control.contains(point))
    {
        return Some(Affordance::AddCause(branch.category));
    }

    let leaf = layout
        .branches
        .iter()
        .rev()
        .flat_map(|b| b.causes.iter().rev())
        .find(|leaf| cause_label_bounds(leaf).contains(point));
    if let Some(leaf) = leaf {
        return Some(Affordance::Cause(leaf.id));
    }

    if let Some(branch) = layout
        .branches
        .iter()
        .find(|b| category_label_bounds(b).contains(point))
    {
        return Some(Affordance::Category(branch.category));
    }

    if layout.problem.rect.contains(point) {
        return Some(Affordance::ProblemBox);
    }

    None
}
