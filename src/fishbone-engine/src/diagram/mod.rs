// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod common;
mod hit;
mod render;

pub use hit::{Affordance, cause_label_bounds, category_label_bounds, hit_test};
pub use render::render_svg;
