// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Spine-and-branch placement of categories and causes.
//!
//! The layout is closed-form: category anchors are spaced evenly along the
//! spine regardless of how many causes each holds, and the k-th cause of a
//! category sits at a fixed offset from the (k-1)-th. Appending a cause never
//! moves the ones already placed, so there is no relayout and no collision
//! handling. Causes that run past the canvas are left where they are and
//! flagged through [`CauseLeaf::within_canvas`].

pub mod config;
pub mod text;

use fishbone_core::catalog::{self, Scheme};

use crate::datamodel::{AnalysisDocument, Cause, CauseId};
use crate::diagram::common::{Circle, Line, Point, Rect};

use self::config::{Canvas, LayoutConfig};
use self::text::truncate_label;

/// Which side of the spine a branch hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

impl Side {
    /// Even category indices go above the spine, odd ones below.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Side::Above
        } else {
            Side::Below
        }
    }

    /// Direction away from the spine in canvas coordinates (y grows down).
    pub fn sign(&self) -> f64 {
        match self {
            Side::Above => -1.0,
            Side::Below => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProblemBox {
    pub rect: Rect,
    pub corner_radius: f64,
    pub label: String,
    /// The statement was empty and `label` is the placeholder prompt.
    pub is_placeholder: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CauseLeaf {
    pub id: CauseId,
    /// Position within the category, in document order.
    pub index: usize,
    pub position: Point,
    /// Line back to the category branch, drawn in `color`.
    pub connector: Line,
    /// Priority color.
    pub color: &'static str,
    pub label: String,
    pub root_marker: Option<Circle>,
    pub within_canvas: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBranch {
    pub category: &'static str,
    pub index: usize,
    pub side: Side,
    pub color: &'static str,
    /// Where the branch meets the spine.
    pub anchor: Point,
    pub end: Point,
    pub label: Point,
    pub add_control: Circle,
    pub causes: Vec<CauseLeaf>,
}

impl CategoryBranch {
    pub fn line(&self) -> Line {
        Line {
            from: self.anchor,
            to: self.end,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiagramLayout {
    pub canvas: Canvas,
    pub scheme_id: &'static str,
    pub spine: Line,
    pub problem: ProblemBox,
    pub branches: Vec<CategoryBranch>,
}

impl DiagramLayout {
    pub fn leaves(&self) -> impl Iterator<Item = &CauseLeaf> {
        self.branches.iter().flat_map(|b| b.causes.iter())
    }

    pub fn leaf(&self, id: CauseId) -> Option<&CauseLeaf> {
        self.leaves().find(|leaf| leaf.id == id)
    }

    pub fn branch(&self, category: &str) -> Option<&CategoryBranch> {
        self.branches.iter().find(|b| b.category == category)
    }
}

/// Lays out `causes` on the branches of `scheme`.
///
/// Causes whose category is not part of `scheme` are skipped; the store
/// never holds such causes. Runs in a single pass over `causes`.
pub fn layout_diagram(
    scheme: &'static Scheme,
    problem_statement: &str,
    causes: &[Cause],
    canvas: Canvas,
    config: &LayoutConfig,
) -> DiagramLayout {
    let center_y = canvas.height / 2.0;
    let spine_length = config.spine_length(canvas);
    let spine_start_x = config.spine_start_x;
    let spine_end_x = spine_start_x + spine_length;

    let spine = Line {
        from: Point::new(spine_start_x, center_y),
        to: Point::new(spine_end_x, center_y),
    };

    let problem = layout_problem_box(problem_statement, spine_end_x, center_y, config);

    let branch_spacing = spine_length / (scheme.categories.len() + 1) as f64;
    let mut branches: Vec<CategoryBranch> = scheme
        .categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let anchor_x = spine_start_x + branch_spacing * (index + 1) as f64;
            layout_branch(*category, index, anchor_x, center_y, config)
        })
        .collect();

    for cause in causes {
        let Some(index) = scheme.category_index(&cause.category) else {
            continue;
        };
        let branch = &mut branches[index];
        let leaf = layout_cause(branch, cause, center_y, canvas, config);
        branch.causes.push(leaf);
    }

    DiagramLayout {
        canvas,
        scheme_id: scheme.id,
        spine,
        problem,
        branches,
    }
}

/// Lays out a document snapshot. Falls back to the default scheme if the
/// document names one the catalog doesn't know.
pub fn layout_document(
    doc: &AnalysisDocument,
    canvas: Canvas,
    config: &LayoutConfig,
) -> DiagramLayout {
    let scheme = doc.scheme().unwrap_or_else(catalog::default_scheme);
    layout_diagram(scheme, &doc.problem_statement, &doc.causes, canvas, config)
}

fn layout_problem_box(
    problem_statement: &str,
    spine_end_x: f64,
    center_y: f64,
    config: &LayoutConfig,
) -> ProblemBox {
    let rect = Rect::from_origin(
        spine_end_x + config.problem_box_gap,
        center_y - config.problem_box_height / 2.0,
        config.problem_box_width,
        config.problem_box_height,
    );

    let is_placeholder = problem_statement.is_empty();
    let text = if is_placeholder {
        config.problem_placeholder.as_str()
    } else {
        problem_statement
    };

    ProblemBox {
        rect,
        corner_radius: config.problem_box_corner_radius,
        label: truncate_label(text, config.problem_label_max_chars),
        is_placeholder,
    }
}

fn layout_branch(
    category: &'static str,
    index: usize,
    anchor_x: f64,
    center_y: f64,
    config: &LayoutConfig,
) -> CategoryBranch {
    let side = Side::for_index(index);
    let s = side.sign();

    let end = Point::new(
        anchor_x + s * config.branch_slant,
        center_y + s * config.branch_length,
    );
    let label_dy = match side {
        Side::Above => -config.label_offset_above,
        Side::Below => config.label_offset_below,
    };

    CategoryBranch {
        category,
        index,
        side,
        color: catalog::category_color(category),
        anchor: Point::new(anchor_x, center_y),
        end,
        label: Point::new(anchor_x + s * config.label_offset_x, end.y + label_dy),
        add_control: Circle {
            x: anchor_x + s * config.add_control_offset_x,
            y: end.y + s * config.add_control_offset_y,
            r: config.add_control_radius,
        },
        causes: vec![],
    }
}

fn layout_cause(
    branch: &CategoryBranch,
    cause: &Cause,
    center_y: f64,
    canvas: Canvas,
    config: &LayoutConfig,
) -> CauseLeaf {
    let index = branch.causes.len();
    let s = branch.side.sign();
    let k = index as f64;

    let origin = Point::new(
        branch.anchor.x + s * config.cause_origin_offset_x,
        center_y + s * config.cause_origin_offset_y,
    );
    let position = Point::new(
        origin.x + k * config.cause_step_x,
        center_y + s * (config.cause_origin_offset_y + k * config.cause_step_y),
    );

    let root_marker = cause.is_root_cause.then(|| Circle {
        x: position.x - config.root_marker_offset_x,
        y: position.y - config.root_marker_offset_y,
        r: config.root_marker_radius,
    });

    let within_canvas = (0.0..=canvas.width).contains(&position.x)
        && (0.0..=canvas.height).contains(&position.y);

    CauseLeaf {
        id: cause.id,
        index,
        position,
        connector: Line {
            from: origin,
            to: position,
        },
        color: cause.priority_level().color,
        label: truncate_label(&cause.text, config.cause_label_max_chars),
        root_marker,
        within_canvas,
    }
}
