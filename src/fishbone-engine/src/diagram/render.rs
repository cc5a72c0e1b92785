// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::diagram::common::{Circle, Line, escape_xml_attr, escape_xml_text, format_number};
use crate::layout::{CategoryBranch, CauseLeaf, DiagramLayout, ProblemBox};

const RENDER_STYLES: &str = r#"
.fishbone-canvas text {
  font-size: 12px;
  font-family: "Roboto", "Open Sans", "Arial", sans-serif;
}

.fishbone-spine {
  stroke-width: 4px;
  stroke: #2c3e50;
}

.problem-box {
  fill: #fdecea;
  stroke: #e74c3c;
  stroke-width: 2px;
  cursor: pointer;
}

.problem-text {
  font-weight: 600;
  text-anchor: middle;
  dominant-baseline: middle;
  cursor: pointer;
}

.problem-text.placeholder {
  fill: #7f8c8d;
  font-style: italic;
}

.category-branch {
  stroke-width: 3px;
}

.category-label {
  font-weight: 600;
  cursor: pointer;
}

.category-add-btn {
  fill: #ffffff;
  stroke: #2c3e50;
  stroke-width: 1px;
  cursor: pointer;
}

.category-add-text {
  text-anchor: middle;
  dominant-baseline: central;
  cursor: pointer;
}

.cause-line {
  stroke-width: 2px;
}

.cause-text {
  font-size: 11px;
  cursor: pointer;
}

.root-cause-indicator {
  fill: #c0392b;
}
"#;

fn line_attrs(line: &Line) -> String {
    format!(
        "x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
        format_number(line.from.x),
        format_number(line.from.y),
        format_number(line.to.x),
        format_number(line.to.y)
    )
}

fn circle_attrs(circle: &Circle) -> String {
    format!(
        "cx=\"{}\" cy=\"{}\" r=\"{}\"",
        format_number(circle.x),
        format_number(circle.y),
        format_number(circle.r)
    )
}

fn render_problem(problem: &ProblemBox) -> String {
    let rect = &problem.rect;
    let center = rect.center();
    let text_class = if problem.is_placeholder {
        "problem-text placeholder"
    } else {
        "problem-text"
    };

    let mut svg = String::new();
    svg.push_str("<g data-action=\"edit-problem\">");
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" ry=\"{}\" class=\"problem-box\"></rect>",
        format_number(rect.left),
        format_number(rect.top),
        format_number(rect.width()),
        format_number(rect.height()),
        format_number(problem.corner_radius),
        format_number(problem.corner_radius),
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" class=\"{}\">{}</text>",
        format_number(center.x),
        format_number(center.y),
        text_class,
        escape_xml_text(&problem.label)
    ));
    svg.push_str("</g>");
    svg
}

fn render_branch(branch: &CategoryBranch) -> String {
    let category = escape_xml_attr(branch.category);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"category\" data-category=\"{}\">",
        category
    ));
    svg.push_str(&format!(
        "<line {} stroke=\"{}\" class=\"category-branch\"></line>",
        line_attrs(&branch.line()),
        branch.color
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"{}\" class=\"category-label\" data-action=\"show-category\">{}</text>",
        format_number(branch.label.x),
        format_number(branch.label.y),
        branch.color,
        escape_xml_text(branch.category)
    ));
    svg.push_str("<g data-action=\"add-cause\">");
    svg.push_str(&format!(
        "<circle {} class=\"category-add-btn\"></circle>",
        circle_attrs(&branch.add_control)
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" class=\"category-add-text\">+</text>",
        format_number(branch.add_control.x),
        format_number(branch.add_control.y)
    ));
    svg.push_str("</g>");

    for leaf in &branch.causes {
        svg.push_str(&render_cause(leaf));
    }

    svg.push_str("</g>");
    svg
}

fn render_cause(leaf: &CauseLeaf) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"cause\" data-cause-id=\"{}\" data-action=\"edit-cause\">",
        leaf.id
    ));
    svg.push_str(&format!(
        "<line {} stroke=\"{}\" class=\"cause-line\"></line>",
        line_attrs(&leaf.connector),
        leaf.color
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" fill=\"{}\" class=\"cause-text\">{}</text>",
        format_number(leaf.position.x),
        format_number(leaf.position.y),
        leaf.color,
        escape_xml_text(&leaf.label)
    ));
    if let Some(marker) = &leaf.root_marker {
        svg.push_str(&format!(
            "<circle {} class=\"root-cause-indicator\"></circle>",
            circle_attrs(marker)
        ));
    }
    svg.push_str("</g>");
    svg
}

/// Draws `layout` as a standalone SVG document. Clickable parts carry a
/// `data-action` attribute naming what a click should do, plus the
/// category or cause id it applies to.
pub fn render_svg(layout: &DiagramLayout) -> String {
    let width = format_number(layout.canvas.width);
    let height = format_number(layout.canvas.height);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" class=\"fishbone-canvas\" data-scheme=\"{}\">",
        width,
        height,
        width,
        height,
        escape_xml_attr(layout.scheme_id)
    ));
    svg.push_str("<style>\n");
    svg.push_str(RENDER_STYLES);
    svg.push_str("\n</style>\n");
    svg.push_str("<g>");

    svg.push_str(&format!(
        "<line {} class=\"fishbone-spine\"></line>",
        line_attrs(&layout.spine)
    ));
    svg.push_str(&render_problem(&layout.problem));
    for branch in &layout.branches {
        svg.push_str(&render_branch(branch));
    }

    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{Cause, CauseId};
    use crate::layout::config::{Canvas, LayoutConfig};
    use crate::layout::layout_diagram;
    use fishbone_core::catalog;

    fn render(problem: &str, causes: &[Cause]) -> String {
        let layout = layout_diagram(
            catalog::scheme("6M").unwrap(),
            problem,
            causes,
            Canvas::default(),
            &LayoutConfig::default(),
        );
        render_svg(&layout)
    }

    #[test]
    fn renders_spine_problem_and_every_category() {
        let svg = render("Line 3 stops", &[]);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1200\""));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(
            "<line x1=\"50\" y1=\"400\" x2=\"850\" y2=\"400\" class=\"fishbone-spine\"></line>"
        ));
        assert!(svg.contains(">Line 3 stops</text>"));
        for category in catalog::scheme("6M").unwrap().categories {
            assert!(svg.contains(&format!("data-category=\"{}\"", category)));
        }
        assert_eq!(6, svg.matches("data-action=\"add-cause\"").count());
        assert!(!svg.contains("class=\"cause\""));
    }

    #[test]
    fn renders_causes_with_priority_color_and_root_marker() {
        let mut cause = Cause::new(CauseId::new(7), "Machine");
        cause.text = "Worn <bearing> & seal".to_string();
        cause.priority = 5;
        cause.is_root_cause = true;
        let svg = render("", &[cause]);

        assert!(svg.contains("data-cause-id=\"cause-7\""));
        assert!(svg.contains("stroke=\"#e74c3c\" class=\"cause-line\""));
        assert!(svg.contains(">Worn &lt;bearin...</text>"));
        assert_eq!(1, svg.matches("root-cause-indicator\"></circle>").count());
        assert!(svg.contains("problem-text placeholder"));
    }
}
