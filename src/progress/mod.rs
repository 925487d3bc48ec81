//! Derived progress figures.
//!
//! Pure functions over immutable snapshots. Nothing here reads cached
//! counters such as `Phase::total_modules`; every figure is recomputed from
//! the live records.

use serde::Serialize;

use crate::domain::{Entry, Journey, Phase, Status};

/// Phase completion roll-up for one journey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyProgress {
    pub total_phases: usize,
    pub completed_phases: usize,
    /// Percentage of completed phases, 0 to 100.
    pub overall_progress: u8,
}

/// Entry counts for one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStats {
    pub total_modules: usize,
    pub modules_completed: usize,
}

/// Status breakdown of the entries in one focus area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAreaStats {
    pub focus_area: String,
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub planned: usize,
}

impl FocusAreaStats {
    fn empty(focus_area: &str) -> Self {
        Self {
            focus_area: focus_area.to_string(),
            total: 0,
            completed: 0,
            in_progress: 0,
            planned: 0,
        }
    }

    fn count(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Completed => self.completed += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Planned => self.planned += 1,
        }
    }
}

/// Compute phase completion for `journey`.
///
/// Only phases whose `journey_id` matches are counted, so callers may pass
/// the full phase set of a snapshot.
pub fn compute_journey_progress(journey: &Journey, phases: &[Phase]) -> JourneyProgress {
    let owned = phases.iter().filter(|p| p.journey_id == journey.id);

    let (total_phases, completed_phases) = owned.fold((0usize, 0usize), |(total, done), p| {
        (total + 1, done + usize::from(p.is_completed()))
    });

    JourneyProgress {
        total_phases,
        completed_phases,
        overall_progress: percentage(completed_phases, total_phases),
    }
}

/// Compute live entry counts for `phase`.
pub fn compute_phase_stats(phase: &Phase, entries: &[Entry]) -> PhaseStats {
    entries
        .iter()
        .filter(|e| e.phase_id == phase.id)
        .fold(PhaseStats::default(), |mut stats, e| {
            stats.total_modules += 1;
            if e.is_completed() {
                stats.modules_completed += 1;
            }
            stats
        })
}

/// Compute per-focus-area status counts for `phase`, in focus-area order.
///
/// A focus area without entries reports all zeros. Entries whose domain is
/// not one of the phase's focus areas are not counted anywhere.
pub fn compute_focus_area_stats(phase: &Phase, entries: &[Entry]) -> Vec<FocusAreaStats> {
    let mut stats: Vec<FocusAreaStats> = phase
        .focus_areas
        .iter()
        .map(|area| FocusAreaStats::empty(area))
        .collect();

    for entry in entries.iter().filter(|e| e.phase_id == phase.id) {
        if let Some(slot) = stats.iter_mut().find(|s| s.focus_area == entry.domain) {
            slot.count(entry.status);
        }
    }

    stats
}

/// `round(100 * part / whole)`, half away from zero; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}
