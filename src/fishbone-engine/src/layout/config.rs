// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Size of the drawing surface, in canvas units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Geometric constants of the spine-and-branch layout.
///
/// Offsets are distances from the relevant anchor; the layout applies the
/// sign for branches above or below the spine.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    // Spine
    /// X position where the spine starts.
    pub spine_start_x: f64,
    /// Space kept free to the right of the problem box.
    pub right_margin: f64,

    // Problem box
    /// Gap between the spine's end and the problem box.
    pub problem_box_gap: f64,
    pub problem_box_width: f64,
    pub problem_box_height: f64,
    pub problem_box_corner_radius: f64,
    /// Characters shown in the problem box before truncation.
    pub problem_label_max_chars: usize,
    pub problem_placeholder: String,

    // Category branches
    /// Vertical extent of a branch from the spine.
    pub branch_length: f64,
    /// Horizontal lean of a branch away from its anchor.
    pub branch_slant: f64,
    pub label_offset_x: f64,
    pub label_offset_above: f64,
    pub label_offset_below: f64,
    pub add_control_offset_x: f64,
    pub add_control_offset_y: f64,
    pub add_control_radius: f64,

    // Causes
    /// Horizontal offset from the anchor of a category's first cause.
    pub cause_origin_offset_x: f64,
    /// Vertical offset from the spine of a category's first cause.
    pub cause_origin_offset_y: f64,
    /// Added per cause along the x axis.
    pub cause_step_x: f64,
    /// Added per cause away from the spine.
    pub cause_step_y: f64,
    pub cause_label_max_chars: usize,
    pub root_marker_offset_x: f64,
    pub root_marker_offset_y: f64,
    pub root_marker_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spine_start_x: 50.0,
            right_margin: 150.0,
            problem_box_gap: 20.0,
            problem_box_width: 180.0,
            problem_box_height: 80.0,
            problem_box_corner_radius: 8.0,
            problem_label_max_chars: 20,
            problem_placeholder: "Click to define problem".to_string(),
            branch_length: 120.0,
            branch_slant: 40.0,
            label_offset_x: 50.0,
            label_offset_above: 10.0,
            label_offset_below: 20.0,
            add_control_offset_x: 70.0,
            add_control_offset_y: 35.0,
            add_control_radius: 12.0,
            cause_origin_offset_x: 20.0,
            cause_origin_offset_y: 60.0,
            cause_step_x: 15.0,
            cause_step_y: 25.0,
            cause_label_max_chars: 15,
            root_marker_offset_x: 10.0,
            root_marker_offset_y: 5.0,
            root_marker_radius: 4.0,
        }
    }
}

impl LayoutConfig {
    /// Length of the spine for `canvas`: whatever width remains after the
    /// left offset, the problem box and the right margin. Never negative.
    pub fn spine_length(&self, canvas: Canvas) -> f64 {
        let reserved =
            self.spine_start_x + self.problem_box_gap + self.problem_box_width + self.right_margin;
        (canvas.width - reserved).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();

        assert!((config.spine_start_x - 50.0).abs() < f64::EPSILON);
        assert!((config.problem_box_width - 180.0).abs() < f64::EPSILON);
        assert!((config.problem_box_height - 80.0).abs() < f64::EPSILON);
        assert!((config.branch_length - 120.0).abs() < f64::EPSILON);
        assert!((config.cause_step_y - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.problem_label_max_chars, 20);
        assert_eq!(config.cause_label_max_chars, 15);

        let canvas = Canvas::default();
        assert!((canvas.width - 1200.0).abs() < f64::EPSILON);
        assert!((canvas.height - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_spine_length() {
        let config = LayoutConfig::default();
        assert!((config.spine_length(Canvas::default()) - 800.0).abs() < f64::EPSILON);

        let narrow = Canvas {
            width: 300.0,
            height: 800.0,
        };
        assert_eq!(0.0, config.spine_length(narrow));
    }
}
