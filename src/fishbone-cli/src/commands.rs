// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;

use fishbone_engine::datamodel::AnalysisDocument;
use fishbone_engine::json::analysis_file_name;
use fishbone_engine::panel::{PanelController, category_details, five_whys_view};
use fishbone_engine::persistence::{export_analysis, export_report, import_analysis, write_atomic};
use fishbone_engine::report::generate_report;
use fishbone_engine::{
    AnalysisStore, Canvas, CauseId, Intent, LayoutConfig, apply_intent, apply_intents,
    layout_document, render_svg,
};

use crate::cli::{
    AddArgs, EditArgs, FieldArgs, NewArgs, RenderArgs, ReportArgs, SchemeArgs, ShowArgs, WhyArgs,
};

fn require_file(file: Option<PathBuf>) -> Result<PathBuf> {
    file.ok_or_else(|| anyhow!("no analysis file given; pass --file <PATH>"))
}

fn open(path: &Path) -> Result<AnalysisStore> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = import_analysis(&contents)
        .map_err(|err| anyhow!(err.user_message()))
        .with_context(|| format!("failed to load {}", path.display()))?;
    let mut store = AnalysisStore::new();
    store.restore(doc)?;
    tracing::debug!(
        path = %path.display(),
        causes = store.document().causes.len(),
        "opened analysis"
    );
    Ok(store)
}

fn save(path: &Path, doc: &AnalysisDocument) -> Result<()> {
    let file = export_analysis(doc, Utc::now())?;
    write_atomic(path, &file.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Accepts `cause-3` or a bare `3`.
fn parse_cause_id(id: &str) -> Result<CauseId> {
    let id = if id.bytes().all(|b| b.is_ascii_digit()) {
        format!("cause-{id}")
    } else {
        id.to_string()
    };
    id.parse::<CauseId>()
        .map_err(|_| anyhow!("'{id}' is not a cause id"))
}

/// Stages `fields` over the cause's current values and commits them as one
/// update.
fn edit_cause(store: &mut AnalysisStore, id: CauseId, fields: FieldArgs) -> Result<()> {
    let mut panel = PanelController::new();
    let select = panel.open_cause(store.document(), id)?;
    let editor = panel
        .editor_mut()
        .ok_or_else(|| anyhow!("{id} could not be opened"))?;
    if let Some(text) = fields.text {
        editor.set_text(text);
    }
    if let Some(priority) = fields.priority {
        editor.set_priority(priority)?;
    }
    if let Some(status) = fields.status {
        editor.set_status(status);
    }
    if let Some(comments) = fields.comments {
        editor.set_comments(comments);
    }
    if let Some(root_cause) = fields.root_cause {
        editor.set_root_cause(root_cause);
    }

    let mut intents = vec![select];
    intents.extend(panel.save().unwrap_or_default());
    apply_intents(store, intents)?;
    Ok(())
}

pub fn new(file: Option<PathBuf>, args: NewArgs, out: &mut dyn Write) -> Result<()> {
    let path = file.unwrap_or_else(|| PathBuf::from(analysis_file_name(Utc::now().date_naive())));
    if path.exists() && !args.force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }

    let mut store = AnalysisStore::new();
    let mut intents = vec![Intent::SetScheme(args.scheme)];
    if let Some(problem) = args.problem {
        intents.push(Intent::SetProblemStatement(problem));
    }
    apply_intents(&mut store, intents)?;
    save(&path, store.document())?;
    writeln!(out, "created {}", path.display())?;
    Ok(())
}

pub fn problem(file: Option<PathBuf>, text: String, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let mut store = open(&path)?;
    apply_intent(&mut store, Intent::SetProblemStatement(text))?;
    save(&path, store.document())?;

    let count = store.document().problem_statement.chars().count();
    if count > fishbone_engine::app::PROBLEM_STATEMENT_SOFT_LIMIT {
        writeln!(
            out,
            "warning: problem statement is {count} characters, over the {} character guideline",
            fishbone_engine::app::PROBLEM_STATEMENT_SOFT_LIMIT
        )?;
    }
    Ok(())
}

pub fn scheme(file: Option<PathBuf>, args: SchemeArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let mut store = open(&path)?;
    let discarded = store.document().causes.len();
    if discarded > 0 && !args.yes {
        bail!(
            "switching to {} discards {discarded} causes; pass --yes to confirm",
            args.scheme
        );
    }
    apply_intent(&mut store, Intent::SetScheme(args.scheme))?;
    save(&path, store.document())?;
    writeln!(out, "scheme is now {}", store.document().scheme_id)?;
    Ok(())
}

pub fn add(file: Option<PathBuf>, args: AddArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let mut store = open(&path)?;
    let applied = apply_intent(
        &mut store,
        Intent::AddCause {
            category: args.category,
        },
    )?;
    let id = applied
        .created
        .ok_or_else(|| anyhow!("no cause was created"))?;
    if !args.fields.is_empty() {
        edit_cause(&mut store, id, args.fields)?;
    }
    save(&path, store.document())?;
    writeln!(out, "{id}")?;
    Ok(())
}

pub fn edit(file: Option<PathBuf>, args: EditArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let id = parse_cause_id(&args.id)?;
    let mut store = open(&path)?;
    edit_cause(&mut store, id, args.fields)?;
    save(&path, store.document())?;
    writeln!(out, "updated {id}")?;
    Ok(())
}

pub fn why(file: Option<PathBuf>, args: WhyArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let id = parse_cause_id(&args.id)?;
    let index = args
        .number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("whys are numbered from 1"))?;
    let mut store = open(&path)?;
    apply_intent(
        &mut store,
        Intent::UpdateWhy {
            id,
            index,
            value: args.answer,
        },
    )?;
    save(&path, store.document())?;
    writeln!(out, "updated why {} of {id}", args.number)?;
    Ok(())
}

pub fn delete(file: Option<PathBuf>, id: &str, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let id = parse_cause_id(id)?;
    let mut store = open(&path)?;
    apply_intent(&mut store, Intent::DeleteCause(id))?;
    save(&path, store.document())?;
    writeln!(out, "deleted {id}")?;
    Ok(())
}

pub fn show(file: Option<PathBuf>, args: ShowArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let store = open(&path)?;
    let doc = store.document();

    if let Some(category) = args.category {
        let details = category_details(doc, &category)?;
        writeln!(out, "{}", details.heading())?;
        if let Some(hint) = details.empty_hint() {
            writeln!(out, "{hint}")?;
        }
        for cause in &details.causes {
            let marker = if cause.is_root_cause { " [root cause]" } else { "" };
            writeln!(out, "{} {}{marker}", cause.id, cause.text)?;
            writeln!(
                out,
                "    Priority: {} | Status: {}",
                cause.priority_label, cause.status
            )?;
            if let Some(comments) = &cause.comments {
                writeln!(out, "    {comments}")?;
            }
        }
        return Ok(());
    }

    if let Some(id) = args.cause {
        let id = parse_cause_id(&id)?;
        let cause = doc
            .get_cause(id)
            .ok_or_else(|| anyhow!("{id} not found"))?;
        writeln!(out, "{} ({})", cause.text, cause.category)?;
        writeln!(
            out,
            "Priority: {} | Status: {}{}",
            cause.priority_level().label,
            cause.status,
            if cause.is_root_cause { " | Root cause" } else { "" }
        )?;
        if !cause.comments.is_empty() {
            writeln!(out, "Comments: {}", cause.comments)?;
        }
        let whys = five_whys_view(cause);
        writeln!(out, "{}", whys.title)?;
        for row in &whys.rows {
            let value = if row.value.is_empty() { "-" } else { row.value.as_str() };
            writeln!(out, "  {} {value}", row.label)?;
        }
        return Ok(());
    }

    let report = generate_report(doc);
    let problem = if doc.problem_statement.is_empty() {
        "(not defined)"
    } else {
        doc.problem_statement.as_str()
    };
    writeln!(out, "Problem: {problem}")?;
    writeln!(out, "Scheme: {}", doc.scheme_id)?;
    writeln!(
        out,
        "Causes: {} total, {} high priority, {} root",
        report.summary.total, report.summary.high_priority, report.summary.root_causes
    )?;
    for bucket in &report.histogram {
        writeln!(
            out,
            "  {:<9} {:>3} ({:.0}%)",
            bucket.level.label, bucket.count, bucket.percentage
        )?;
    }
    for section in &report.categories {
        writeln!(out, "{}", section.category)?;
        for cause in &section.causes {
            writeln!(out, "  {} {} ({})", cause.id, cause.text, cause.priority_label)?;
        }
    }
    Ok(())
}

pub fn report(file: Option<PathBuf>, args: ReportArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let store = open(&path)?;
    let exported = export_report(store.document(), Utc::now());
    match args.output_dir {
        Some(dir) => {
            let written = exported
                .write_to(&dir)
                .with_context(|| format!("failed to write report into {}", dir.display()))?;
            writeln!(out, "wrote {}", written.display())?;
        }
        None => out.write_all(exported.contents.as_bytes())?,
    }
    Ok(())
}

pub fn render(file: Option<PathBuf>, args: RenderArgs, out: &mut dyn Write) -> Result<()> {
    let path = require_file(file)?;
    let store = open(&path)?;
    let canvas = Canvas {
        width: args.width,
        height: args.height,
    };
    let layout = layout_document(store.document(), canvas, &LayoutConfig::default());
    let overflow = layout.leaves().filter(|leaf| !leaf.within_canvas).count();
    if overflow > 0 {
        tracing::warn!(overflow, "some causes fall outside the canvas");
    }

    let svg = render_svg(&layout);
    match args.output {
        Some(output) => {
            write_atomic(&output, &svg)
                .with_context(|| format!("failed to write {}", output.display()))?;
            writeln!(out, "wrote {}", output.display())?;
        }
        None => writeln!(out, "{svg}")?,
    }
    Ok(())
}
