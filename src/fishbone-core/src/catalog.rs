// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Static reference data: categorization schemes, category colors,
//! priority levels and the status enumeration.

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, ErrorCode, ErrorKind};

/// A named, ordered set of top-level cause categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheme {
    pub id: &'static str,
    pub categories: &'static [&'static str],
}

impl Scheme {
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(&category)
    }

    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| *c == category)
    }
}

pub const DEFAULT_SCHEME_ID: &str = "6M";

pub const SCHEMES: &[Scheme] = &[
    Scheme {
        id: "6M",
        categories: &[
            "Manpower",
            "Method",
            "Machine",
            "Material",
            "Measurement",
            "Mother Nature",
        ],
    },
    Scheme {
        id: "4P",
        categories: &["Policy", "Process", "People", "Plant"],
    },
];

pub fn scheme(id: &str) -> Option<&'static Scheme> {
    SCHEMES.iter().find(|s| s.id == id)
}

pub fn default_scheme() -> &'static Scheme {
    &SCHEMES[0]
}

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Manpower", "#3498db"),
    ("Method", "#e74c3c"),
    ("Machine", "#f39c12"),
    ("Material", "#27ae60"),
    ("Measurement", "#9b59b6"),
    ("Mother Nature", "#16a085"),
    ("Policy", "#3498db"),
    ("Process", "#e74c3c"),
    ("People", "#f39c12"),
    ("Plant", "#27ae60"),
];

/// Used for categories without an entry in the color table.
pub const FALLBACK_CATEGORY_COLOR: &str = "#7f8c8d";

pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_CATEGORY_COLOR)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorityLevel {
    pub level: u8,
    pub label: &'static str,
    pub color: &'static str,
}

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
pub const DEFAULT_PRIORITY: u8 = 3;
/// Causes at or above this level count as high priority.
pub const HIGH_PRIORITY_THRESHOLD: u8 = 4;

pub const PRIORITY_LEVELS: [PriorityLevel; 5] = [
    PriorityLevel {
        level: 1,
        label: "Very Low",
        color: "#95a5a6",
    },
    PriorityLevel {
        level: 2,
        label: "Low",
        color: "#f1c40f",
    },
    PriorityLevel {
        level: 3,
        label: "Medium",
        color: "#f39c12",
    },
    PriorityLevel {
        level: 4,
        label: "High",
        color: "#e67e22",
    },
    PriorityLevel {
        level: 5,
        label: "Critical",
        color: "#e74c3c",
    },
];

pub fn priority_level(level: u8) -> Option<&'static PriorityLevel> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&level) {
        Some(&PRIORITY_LEVELS[(level - 1) as usize])
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    UnderReview,
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::NotStarted,
        Status::InProgress,
        Status::UnderReview,
        Status::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::UnderReview => "Under Review",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Store,
                    ErrorCode::Validation,
                    Some(format!("unknown status '{s}'")),
                )
            })
    }
}
