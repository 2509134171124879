// ABOUTME: Deterministic markdown rendering of a workout prescription
// ABOUTME: Section order is fixed so rendered output is stable across runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use std::fmt::Write as _;

use crate::models::{PrescriptionStep, WorkoutPrescription};

fn push_step(out: &mut String, step: &PrescriptionStep) {
    let _ = write!(out, "- {}", step.description);
    match (step.distance_m, step.duration_min) {
        (Some(m), _) => {
            let _ = write!(out, " ({m}m, ~{} min)", step.duration_min);
        }
        (None, minutes) => {
            let _ = write!(out, " ({minutes} min)");
        }
    }
    if let Some(target) = &step.target {
        let _ = write!(out, " @ {target}");
    }
    out.push('\n');
}

fn push_section(out: &mut String, heading: &str, steps: &[PrescriptionStep]) {
    let _ = writeln!(out, "## {heading}");
    for step in steps {
        push_step(out, step);
    }
    out.push('\n');
}

/// Render a prescription to markdown.
///
/// Section order is fixed: warm-up, main set, cool-down, targets, technique,
/// fueling (when present), variants, progression (when present), success
/// criteria. The same prescription always renders to the same string.
#[must_use]
pub fn render_markdown(prescription: &WorkoutPrescription) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}", prescription.title);
    match prescription.distance_m {
        Some(m) => {
            let _ = writeln!(
                out,
                "{} | {m}m | ~{} min\n",
                prescription.date, prescription.duration_min
            );
        }
        None => {
            let _ = writeln!(out, "{} | {} min\n", prescription.date, prescription.duration_min);
        }
    }
    let _ = writeln!(out, "**Goal:** {}\n", prescription.goal);

    push_section(&mut out, "Warm-up", &prescription.warmup);
    push_section(&mut out, "Main set", &prescription.main);
    push_section(&mut out, "Cool-down", &prescription.cooldown);

    let _ = writeln!(out, "## Targets");
    let _ = writeln!(out, "{}\n", prescription.targets_summary);

    let _ = writeln!(out, "## Technique");
    for cue in &prescription.technique_cues {
        let _ = writeln!(out, "- {cue}");
    }
    out.push('\n');

    if let Some(fueling) = &prescription.fueling {
        let _ = writeln!(out, "## Fueling");
        let _ = writeln!(out, "{fueling}\n");
    }

    let _ = writeln!(out, "## Variants");
    let _ = writeln!(out, "- **Feeling great:** {}", prescription.variant_ideal);
    let _ = writeln!(out, "- **Low energy:** {}\n", prescription.variant_low_energy);

    if let Some(note) = &prescription.progression_note {
        let _ = writeln!(out, "## Progression");
        let _ = writeln!(out, "{note}\n");
    }

    let _ = writeln!(out, "## Success criteria");
    for criterion in &prescription.success_criteria {
        let _ = writeln!(out, "- {criterion}");
    }

    out
}
