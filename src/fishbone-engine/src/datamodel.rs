// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use fishbone_core::catalog::{
    self, DEFAULT_PRIORITY, DEFAULT_SCHEME_ID, PriorityLevel, Scheme, Status,
};
use fishbone_core::{Error, ErrorCode, ErrorKind};

/// Number of answers recorded by the 5 Whys drill-down.
pub const WHY_COUNT: usize = 5;

pub const DEFAULT_CAUSE_TEXT: &str = "New Cause";

const CAUSE_ID_PREFIX: &str = "cause-";

/// Identifier of a cause, rendered as `cause-N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CauseId(u32);

impl CauseId {
    pub fn new(n: u32) -> Self {
        CauseId(n)
    }

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl Display for CauseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CAUSE_ID_PREFIX, self.0)
    }
}

impl FromStr for CauseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(CAUSE_ID_PREFIX)
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(CauseId)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Import,
                    ErrorCode::CorruptData,
                    Some(format!("malformed cause id '{s}'")),
                )
            })
    }
}

/// The editable fields of a cause, replaced as a unit on save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CauseFields {
    pub text: String,
    pub priority: u8,
    pub status: Status,
    pub comments: String,
    pub is_root_cause: bool,
}

impl Default for CauseFields {
    fn default() -> Self {
        CauseFields {
            text: DEFAULT_CAUSE_TEXT.to_string(),
            priority: DEFAULT_PRIORITY,
            status: Status::default(),
            comments: String::new(),
            is_root_cause: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cause {
    pub id: CauseId,
    pub category: String,
    pub text: String,
    pub priority: u8,
    pub status: Status,
    pub comments: String,
    pub is_root_cause: bool,
    pub whys: [String; WHY_COUNT],
}

impl Cause {
    pub fn new(id: CauseId, category: &str) -> Self {
        let defaults = CauseFields::default();
        Cause {
            id,
            category: category.to_string(),
            text: defaults.text,
            priority: defaults.priority,
            status: defaults.status,
            comments: defaults.comments,
            is_root_cause: defaults.is_root_cause,
            whys: Default::default(),
        }
    }

    pub fn fields(&self) -> CauseFields {
        CauseFields {
            text: self.text.clone(),
            priority: self.priority,
            status: self.status,
            comments: self.comments.clone(),
            is_root_cause: self.is_root_cause,
        }
    }

    pub(crate) fn set_fields(&mut self, fields: CauseFields) {
        self.text = fields.text;
        self.priority = fields.priority;
        self.status = fields.status;
        self.comments = fields.comments;
        self.is_root_cause = fields.is_root_cause;
    }

    /// Catalog entry for this cause's priority. Priorities outside the
    /// catalog range never reach a stored cause, but fall back to the
    /// default level rather than panicking.
    pub fn priority_level(&self) -> &'static PriorityLevel {
        catalog::priority_level(self.priority)
            .or_else(|| catalog::priority_level(DEFAULT_PRIORITY))
            .unwrap_or(&catalog::PRIORITY_LEVELS[0])
    }
}

/// The root aggregate: everything a user has recorded about one problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisDocument {
    pub problem_statement: String,
    pub scheme_id: String,
    /// Causes in insertion order.
    pub causes: Vec<Cause>,
    pub selected_cause: Option<CauseId>,
    pub next_cause_id: u32,
}

impl Default for AnalysisDocument {
    fn default() -> Self {
        AnalysisDocument {
            problem_statement: String::new(),
            scheme_id: DEFAULT_SCHEME_ID.to_string(),
            causes: vec![],
            selected_cause: None,
            next_cause_id: 1,
        }
    }
}

impl AnalysisDocument {
    pub fn scheme(&self) -> Option<&'static Scheme> {
        catalog::scheme(&self.scheme_id)
    }

    pub fn get_cause(&self, id: CauseId) -> Option<&Cause> {
        self.causes.iter().find(|c| c.id == id)
    }

    pub fn get_cause_mut(&mut self, id: CauseId) -> Option<&mut Cause> {
        self.causes.iter_mut().find(|c| c.id == id)
    }

    /// Causes filed under `category`, in insertion order.
    pub fn causes_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Cause> + 'a {
        self.causes.iter().filter(move |c| c.category == category)
    }

    pub fn selected(&self) -> Option<&Cause> {
        self.selected_cause.and_then(|id| self.get_cause(id))
    }
}
