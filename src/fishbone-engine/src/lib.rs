// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod app;
pub mod datamodel;
pub mod diagram;
pub mod intent;
pub mod json;
#[cfg(test)]
mod json_proptest;
pub mod layout;
pub mod panel;
pub mod persistence;
pub mod report;
pub mod store;

pub use fishbone_core::{Error, ErrorCode, ErrorKind, Result};

pub use self::app::{FishboneApp, Frame, ProblemStatementView};
pub use self::datamodel::{AnalysisDocument, Cause, CauseFields, CauseId};
pub use self::diagram::{Affordance, hit_test, render_svg};
pub use self::intent::{Applied, Intent, apply_intent, apply_intents};
pub use self::layout::config::{Canvas, LayoutConfig};
pub use self::layout::{DiagramLayout, layout_diagram, layout_document};
pub use self::persistence::{FileStorage, MemoryStorage, SessionStorage};
pub use self::report::{Report, generate_report};
pub use self::store::AnalysisStore;
