// ABOUTME: Safe explainability snippets - numeric-only summaries of memory source records
// ABOUTME: Visibility levels gate what may ever be surfaced; raw free text never appears
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use crate::models::{AiVisibility, CheckIn, FeedbackEntry, JournalEntry};

/// Numeric-only snippet for a check-in source
#[must_use]
pub fn checkin_snippet(checkin: &CheckIn) -> String {
    let mut snippet = format!(
        "sleep {:.1}h (quality {}/5), fatigue {}/5, soreness {:?}, stress {}/5",
        checkin.sleep_hours,
        checkin.sleep_quality,
        checkin.physical_fatigue,
        checkin.soreness,
        checkin.stress
    );
    if let Some(score) = checkin.readiness_score {
        snippet.push_str(&format!(", readiness {score}/100"));
    }
    snippet
}

/// Snippet for a diary entry, honoring its visibility level.
///
/// `Hidden` entries produce nothing at all. `MetricsOnly` yields the numeric
/// fields. `FullAiAccess` adds only whether a note exists, never its content;
/// qualitative detail reaches memories through extracted tags upstream,
/// never verbatim.
#[must_use]
pub fn journal_snippet(entry: &JournalEntry) -> Option<String> {
    match entry.visibility {
        AiVisibility::Hidden => None,
        AiVisibility::MetricsOnly => Some(numeric_fields(entry)),
        AiVisibility::FullAiAccess => {
            let mut snippet = numeric_fields(entry);
            if entry.note.is_some() {
                snippet.push_str(", note on file");
            }
            Some(snippet)
        }
    }
}

fn numeric_fields(entry: &JournalEntry) -> String {
    format!(
        "mood {}/5, energy {}/5, sleep {:.1}h (quality {}/5), soreness {}/5, stress {}/5, motivation {}/5",
        entry.mood,
        entry.energy,
        entry.sleep_hours,
        entry.sleep_quality,
        entry.soreness,
        entry.stress,
        entry.motivation
    )
}

/// Snippet for a feedback entry: extracted tags only, never the raw comment.
/// Invisible feedback produces nothing.
#[must_use]
pub fn feedback_snippet(entry: &FeedbackEntry) -> Option<String> {
    if !entry.visible_to_ai {
        return None;
    }
    if entry.tags.is_empty() {
        return Some("feedback given (no tags extracted)".to_owned());
    }
    Some(format!("feedback tags: {}", entry.tags.join(", ")))
}
