// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fishbone_core::Status;
use fishbone_core::catalog::DEFAULT_SCHEME_ID;

use crate::commands;

#[derive(Debug, Parser)]
#[command(
    name = "fishbone",
    about = "Build fishbone (Ishikawa) root-cause analyses from the command line",
    version
)]
pub struct Cli {
    /// Analysis file to read and update.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new, empty analysis.
    New(NewArgs),

    /// Set the problem statement.
    Problem {
        text: String,
    },

    /// Switch the categorization scheme. Discards every cause.
    Scheme(SchemeArgs),

    /// Add a cause under a category.
    Add(AddArgs),

    /// Change the fields of a cause.
    Edit(EditArgs),

    /// Record one answer of a cause's 5 Whys.
    Why(WhyArgs),

    /// Delete a cause.
    Delete {
        /// Cause id, as `cause-3` or just `3`.
        id: String,
    },

    /// Print the analysis, a category or a single cause.
    Show(ShowArgs),

    /// Write the Markdown report.
    Report(ReportArgs),

    /// Draw the diagram as SVG.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Categorization scheme: 6M or 4P.
    #[arg(long, default_value = DEFAULT_SCHEME_ID)]
    pub scheme: String,

    #[arg(long)]
    pub problem: Option<String>,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct SchemeArgs {
    pub scheme: String,

    /// Confirm that existing causes may be discarded.
    #[arg(short, long)]
    pub yes: bool,
}

/// Cause fields settable from the command line. Unset flags keep the
/// cause's current value.
#[derive(Debug, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub text: Option<String>,

    /// 1 (Very Low) to 5 (Critical).
    #[arg(long)]
    pub priority: Option<u8>,

    /// Not Started, In Progress, Under Review or Completed.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,

    #[arg(long)]
    pub comments: Option<String>,

    /// Mark or unmark as a root cause.
    #[arg(long)]
    pub root_cause: Option<bool>,
}

impl FieldArgs {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.comments.is_none()
            && self.root_cause.is_none()
    }
}

fn parse_status(s: &str) -> std::result::Result<Status, String> {
    s.parse().map_err(|_| {
        let names: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub category: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args)]
pub struct WhyArgs {
    pub id: String,

    /// Which why, 1 to 5.
    pub number: usize,

    pub answer: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// List the causes of one category.
    #[arg(long, conflicts_with = "cause")]
    pub category: Option<String>,

    /// Show one cause with its 5 Whys.
    #[arg(long)]
    pub cause: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Directory to write `rca-report-<date>.md` into. Prints to stdout
    /// when omitted.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Where to write the SVG. Prints to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,

    #[arg(long, default_value_t = 800.0)]
    pub height: f64,
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let file = cli.file;
    match cli.command {
        Commands::New(args) => commands::new(file, args, out),
        Commands::Problem { text } => commands::problem(file, text, out),
        Commands::Scheme(args) => commands::scheme(file, args, out),
        Commands::Add(args) => commands::add(file, args, out),
        Commands::Edit(args) => commands::edit(file, args, out),
        Commands::Why(args) => commands::why(file, args, out),
        Commands::Delete { id } => commands::delete(file, &id, out),
        Commands::Show(args) => commands::show(file, args, out),
        Commands::Report(args) => commands::report(file, args, out),
        Commands::Render(args) => commands::render(file, args, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_fields() {
        let cli = Cli::try_parse_from([
            "fishbone",
            "add",
            "Machine",
            "--text",
            "Worn bearing",
            "--priority",
            "5",
            "--status",
            "In Progress",
            "--root-cause",
            "true",
            "-f",
            "a.json",
        ])
        .unwrap();
        assert_eq!(Some(PathBuf::from("a.json")), cli.file);
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!("Machine", args.category);
        assert_eq!(Some(5), args.fields.priority);
        assert_eq!(Some(Status::InProgress), args.fields.status);
        assert_eq!(Some(true), args.fields.root_cause);
        assert!(!args.fields.is_empty());
    }

    #[test]
    fn rejects_unknown_status() {
        let err = Cli::try_parse_from(["fishbone", "edit", "1", "--status", "Done"]).unwrap_err();
        assert!(err.to_string().contains("Not Started"));
    }

    #[test]
    fn new_defaults_to_six_m() {
        let cli = Cli::try_parse_from(["fishbone", "new"]).unwrap();
        let Commands::New(args) = cli.command else {
            panic!("expected new");
        };
        assert_eq!("6M", args.scheme);
        assert_eq!(None, cli.file);
    }
}
