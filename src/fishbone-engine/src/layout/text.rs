// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

const CHAR_WIDTH: f64 = 7.0;
pub const LINE_HEIGHT: f64 = 14.0;

const ELLIPSIS: &str = "...";

/// Shortens `text` to at most `max_chars` characters, replacing the tail
/// with "..." when it doesn't fit.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Estimate text width based on character count.
///
/// Each character is taken to be about 7 units wide; good enough for hit
/// testing labels, not for typesetting.
pub fn estimate_text_width(text: &str) -> f64 {
    text.chars().count() as f64 * CHAR_WIDTH
}
