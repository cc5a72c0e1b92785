// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Summary statistics and the exportable analysis report.

use std::fmt::Write as _;

use chrono::NaiveDate;
use fishbone_core::Status;
use fishbone_core::catalog::{self, HIGH_PRIORITY_THRESHOLD, PRIORITY_LEVELS, PriorityLevel};

use crate::datamodel::{AnalysisDocument, CauseId};

const REPORT_FILE_PREFIX: &str = "rca-report-";
const UNDEFINED_PROBLEM: &str = "Not defined";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    /// Causes with priority of at least [`HIGH_PRIORITY_THRESHOLD`].
    pub high_priority: usize,
    pub root_causes: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriorityBucket {
    pub level: &'static PriorityLevel,
    pub count: usize,
    /// Share of all causes in percent. 0 for an empty document.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootCauseEntry {
    pub id: CauseId,
    pub text: String,
    pub category: String,
    pub priority_label: &'static str,
    pub status: Status,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: CauseId,
    pub text: String,
    pub priority_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySection {
    pub category: &'static str,
    pub causes: Vec<CategoryEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub problem_statement: String,
    pub scheme_id: String,
    pub summary: Summary,
    /// One bucket per priority level, lowest first.
    pub histogram: Vec<PriorityBucket>,
    pub root_causes: Vec<RootCauseEntry>,
    /// Non-empty categories in scheme order.
    pub categories: Vec<CategorySection>,
}

pub fn summarize(doc: &AnalysisDocument) -> Summary {
    Summary {
        total: doc.causes.len(),
        high_priority: doc
            .causes
            .iter()
            .filter(|c| c.priority >= HIGH_PRIORITY_THRESHOLD)
            .count(),
        root_causes: doc.causes.iter().filter(|c| c.is_root_cause).count(),
    }
}

pub fn priority_histogram(doc: &AnalysisDocument) -> Vec<PriorityBucket> {
    let denominator = doc.causes.len().max(1) as f64;
    PRIORITY_LEVELS
        .iter()
        .map(|level| {
            let count = doc
                .causes
                .iter()
                .filter(|c| c.priority == level.level)
                .count();
            PriorityBucket {
                level,
                count,
                percentage: count as f64 / denominator * 100.0,
            }
        })
        .collect()
}

/// Builds the report for a document snapshot.
pub fn generate_report(doc: &AnalysisDocument) -> Report {
    let root_causes = doc
        .causes
        .iter()
        .filter(|c| c.is_root_cause)
        .map(|c| RootCauseEntry {
            id: c.id,
            text: c.text.clone(),
            category: c.category.clone(),
            priority_label: c.priority_level().label,
            status: c.status,
            comments: (!c.comments.is_empty()).then(|| c.comments.clone()),
        })
        .collect();

    let categories = doc
        .scheme()
        .unwrap_or_else(catalog::default_scheme)
        .categories
        .iter()
        .filter_map(|category| {
            let causes: Vec<CategoryEntry> = doc
                .causes_in(category)
                .map(|c| CategoryEntry {
                    id: c.id,
                    text: c.text.clone(),
                    priority_label: c.priority_level().label,
                })
                .collect();
            (!causes.is_empty()).then_some(CategorySection {
                category: *category,
                causes,
            })
        })
        .collect();

    Report {
        problem_statement: doc.problem_statement.clone(),
        scheme_id: doc.scheme_id.clone(),
        summary: summarize(doc),
        histogram: priority_histogram(doc),
        root_causes,
        categories,
    }
}

impl Report {
    /// Renders the report as Markdown, dated `date`.
    pub fn to_markdown(&self, date: NaiveDate) -> String {
        let problem = if self.problem_statement.is_empty() {
            UNDEFINED_PROBLEM
        } else {
            self.problem_statement.as_str()
        };

        let mut out = String::new();
        out.push_str("# Root Cause Analysis Report\n\n");
        let _ = write!(out, "**Date:** {date}\n\n");
        let _ = write!(out, "**Problem Statement:** {problem}\n\n");
        let _ = write!(out, "**Methodology:** {}\n\n", self.scheme_id);

        out.push_str("## Summary\n");
        let _ = writeln!(out, "- Total Causes Identified: {}", self.summary.total);
        let _ = writeln!(out, "- High Priority Causes: {}", self.summary.high_priority);
        let _ = write!(out, "- Root Causes: {}\n\n", self.summary.root_causes);

        if !self.root_causes.is_empty() {
            out.push_str("## Root Causes\n");
            for (i, cause) in self.root_causes.iter().enumerate() {
                let _ = writeln!(out, "{}. **{}** ({})", i + 1, cause.text, cause.category);
                let _ = writeln!(out, "   - Priority: {}", cause.priority_label);
                let _ = writeln!(out, "   - Status: {}", cause.status);
                if let Some(comments) = &cause.comments {
                    let _ = writeln!(out, "   - Comments: {comments}");
                }
                out.push('\n');
            }
        }

        for section in &self.categories {
            let _ = writeln!(out, "## {}", section.category);
            for cause in &section.causes {
                let _ = writeln!(out, "- {} (Priority: {})", cause.text, cause.priority_label);
            }
            out.push('\n');
        }

        out
    }
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("{REPORT_FILE_PREFIX}{}.md", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{Cause, CauseFields};
    use crate::store::AnalysisStore;
    use float_cmp::approx_eq;

    fn sample_store() -> AnalysisStore {
        let mut store = AnalysisStore::new();
        store.set_problem_statement("Line 3 stops every night");
        let bearing = store.add_cause("Machine").unwrap();
        store
            .update_cause(
                bearing,
                CauseFields {
                    text: "Worn bearing".to_string(),
                    priority: 5,
                    status: Status::InProgress,
                    comments: "Replaced in March".to_string(),
                    is_root_cause: true,
                },
            )
            .unwrap();
        let training = store.add_cause("Manpower").unwrap();
        store
            .update_cause(
                training,
                CauseFields {
                    text: "No night-shift training".to_string(),
                    priority: 4,
                    ..CauseFields::default()
                },
            )
            .unwrap();
        store.add_cause("Machine").unwrap();
        store
    }

    #[test]
    fn empty_document_has_zeroed_summary_and_histogram() {
        let report = generate_report(&AnalysisDocument::default());
        assert_eq!(Summary::default(), report.summary);
        assert_eq!(5, report.histogram.len());
        for bucket in &report.histogram {
            assert_eq!(0, bucket.count);
            assert!(approx_eq!(f64, 0.0, bucket.percentage));
        }
        assert!(report.root_causes.is_empty());
        assert!(report.categories.is_empty());
    }

    #[test]
    fn summary_and_histogram_count_causes() {
        let report = generate_report(sample_store().document());
        assert_eq!(
            Summary {
                total: 3,
                high_priority: 2,
                root_causes: 1
            },
            report.summary
        );

        let counts: Vec<usize> = report.histogram.iter().map(|b| b.count).collect();
        assert_eq!(vec![0, 0, 1, 1, 1], counts);
        let medium = &report.histogram[2];
        assert_eq!("Medium", medium.level.label);
        assert!(approx_eq!(f64, 100.0 / 3.0, medium.percentage, ulps = 2));
    }

    #[test]
    fn sections_follow_scheme_order() {
        let report = generate_report(sample_store().document());
        let order: Vec<&str> = report.categories.iter().map(|s| s.category).collect();
        assert_eq!(vec!["Manpower", "Machine"], order);
        assert_eq!(2, report.categories[1].causes.len());
        assert_eq!("Worn bearing", report.categories[1].causes[0].text);
        assert_eq!("New Cause", report.categories[1].causes[1].text);
    }

    #[test]
    fn markdown_layout() {
        let report = generate_report(sample_store().document());
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let expected = "\
# Root Cause Analysis Report

**Date:** 2026-03-14

**Problem Statement:** Line 3 stops every night

**Methodology:** 6M

## Summary
- Total Causes Identified: 3
- High Priority Causes: 2
- Root Causes: 1

## Root Causes
1. **Worn bearing** (Machine)
   - Priority: Critical
   - Status: In Progress
   - Comments: Replaced in March

## Manpower
- No night-shift training (Priority: High)

## Machine
- Worn bearing (Priority: Critical)
- New Cause (Priority: Medium)

";
        assert_eq!(expected, report.to_markdown(date));
    }

    #[test]
    fn markdown_for_empty_document() {
        let report = generate_report(&AnalysisDocument::default());
        let md = report.to_markdown(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert!(md.contains("**Problem Statement:** Not defined\n"));
        assert!(!md.contains("## Root Causes"));
        assert!(md.ends_with("- Root Causes: 0\n\n"));
    }

    #[test]
    fn root_cause_without_comments_omits_line() {
        let mut doc = AnalysisDocument::default();
        let mut cause = Cause::new(CauseId::new(1), "Method");
        cause.is_root_cause = true;
        doc.causes.push(cause);
        doc.next_cause_id = 2;
        let report = generate_report(&doc);
        assert_eq!(None, report.root_causes[0].comments);
        assert!(!report.to_markdown(NaiveDate::default()).contains("Comments"));
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        assert_eq!("rca-report-2026-10-09.md", report_file_name(date));
    }
}
