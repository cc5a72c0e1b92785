// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property tests for the diagram layout.
//!
//! These tests verify that:
//! 1. Layout is a pure function of (scheme, causes, canvas)
//! 2. Appending a cause never moves causes that were already placed
//! 3. Branch geometry does not depend on the causes at all

use proptest::prelude::*;

use fishbone_core::catalog::{self, SCHEMES, Scheme};
use fishbone_engine::layout::Side;
use fishbone_engine::{Canvas, Cause, CauseId, LayoutConfig, layout_diagram};

fn scheme_strategy() -> impl Strategy<Value = &'static Scheme> {
    prop::sample::select(SCHEMES.iter().collect::<Vec<_>>())
}

fn causes_for(scheme: &'static Scheme, picks: &[(usize, bool)]) -> Vec<Cause> {
    picks
        .iter()
        .enumerate()
        .map(|(i, (pick, root))| {
            let category = scheme.categories[pick % scheme.categories.len()];
            let mut cause = Cause::new(CauseId::new(i as u32 + 1), category);
            cause.is_root_cause = *root;
            cause
        })
        .collect()
}

fn canvas_strategy() -> impl Strategy<Value = Canvas> {
    (400.0f64..2400.0, 300.0f64..1600.0).prop_map(|(width, height)| Canvas { width, height })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn layout_is_deterministic(
        scheme in scheme_strategy(),
        picks in prop::collection::vec((0usize..8, any::<bool>()), 0..30),
        canvas in canvas_strategy(),
    ) {
        let causes = causes_for(scheme, &picks);
        let config = LayoutConfig::default();
        let first = layout_diagram(scheme, "Problem", &causes, canvas, &config);
        let second = layout_diagram(scheme, "Problem", &causes, canvas, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn appending_keeps_existing_positions(
        scheme in scheme_strategy(),
        picks in prop::collection::vec((0usize..8, any::<bool>()), 0..30),
        extra in 0usize..8,
        canvas in canvas_strategy(),
    ) {
        let config = LayoutConfig::default();
        let causes = causes_for(scheme, &picks);
        let before = layout_diagram(scheme, "", &causes, canvas, &config);

        let mut grown = causes.clone();
        let category = scheme.categories[extra % scheme.categories.len()];
        grown.push(Cause::new(CauseId::new(picks.len() as u32 + 1), category));
        let after = layout_diagram(scheme, "", &grown, canvas, &config);

        for leaf in before.leaves() {
            prop_assert_eq!(Some(leaf), after.leaf(leaf.id));
        }
        prop_assert_eq!(before.leaves().count() + 1, after.leaves().count());
    }

    #[test]
    fn branches_ignore_causes(
        scheme in scheme_strategy(),
        picks in prop::collection::vec((0usize..8, any::<bool>()), 0..30),
        canvas in canvas_strategy(),
    ) {
        let config = LayoutConfig::default();
        let empty = layout_diagram(scheme, "", &[], canvas, &config);
        let full = layout_diagram(scheme, "", &causes_for(scheme, &picks), canvas, &config);

        prop_assert_eq!(scheme.categories.len(), full.branches.len());
        for (a, b) in empty.branches.iter().zip(&full.branches) {
            prop_assert_eq!(a.anchor, b.anchor);
            prop_assert_eq!(a.end, b.end);
            prop_assert_eq!(a.label, b.label);
            prop_assert_eq!(a.add_control, b.add_control);
            let expected = if a.index % 2 == 0 { Side::Above } else { Side::Below };
            prop_assert_eq!(expected, a.side);
        }
    }
}

#[test]
fn anchors_are_evenly_spaced() {
    let scheme = catalog::scheme("4P").unwrap();
    let config = LayoutConfig::default();
    let canvas = Canvas::default();
    let layout = layout_diagram(scheme, "", &[], canvas, &config);

    let spacing = config.spine_length(canvas) / 5.0;
    for branch in &layout.branches {
        let expected = config.spine_start_x + spacing * (branch.index + 1) as f64;
        assert!((branch.anchor.x - expected).abs() < 1e-9);
        assert!((branch.anchor.y - canvas.height / 2.0).abs() < 1e-9);
    }
}

#[test]
fn crowded_category_runs_off_canvas_without_clamping() {
    let scheme = catalog::scheme("6M").unwrap();
    let causes: Vec<Cause> = (1..=20)
        .map(|n| Cause::new(CauseId::new(n), "Manpower"))
        .collect();
    let layout = layout_diagram(
        scheme,
        "",
        &causes,
        Canvas::default(),
        &LayoutConfig::default(),
    );

    let leaves: Vec<_> = layout.leaves().collect();
    assert!(leaves[0].within_canvas);
    let last = leaves[19];
    assert!(!last.within_canvas);
    assert!(last.position.y < 0.0);
}
