//! Read-side ordering, grouping and filtering.
//!
//! The read path only sorts; it never checks that entry orders form a
//! contiguous sequence (that is the audit's job).

use serde::Serialize;

use crate::domain::{Entry, JourneyId, Ordered, Phase, PhaseId, Status};

/// Sort records by `order` ascending, ties broken by document id.
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.order_key()
            .cmp(&b.order_key())
            .then_with(|| a.id_key().cmp(b.id_key()))
    });
}

/// Phases owned by `journey_id`, in display order.
pub fn phases_for_journey<'a>(phases: &'a [Phase], journey_id: &JourneyId) -> Vec<&'a Phase> {
    let mut owned: Vec<&Phase> = phases.iter().filter(|p| &p.journey_id == journey_id).collect();
    sort_by_order(&mut owned);
    owned
}

/// Entries owned by `phase_id`, in display order.
pub fn entries_for_phase<'a>(entries: &'a [Entry], phase_id: &PhaseId) -> Vec<&'a Entry> {
    let mut owned: Vec<&Entry> = entries.iter().filter(|e| &e.phase_id == phase_id).collect();
    sort_by_order(&mut owned);
    owned
}

/// Entries of `phase_id` whose domain is exactly `focus_area`, in display order.
pub fn entries_in_focus_area<'a>(
    entries: &'a [Entry],
    phase_id: &PhaseId,
    focus_area: &str,
) -> Vec<&'a Entry> {
    let mut scoped: Vec<&Entry> = entries
        .iter()
        .filter(|e| &e.phase_id == phase_id && e.domain == focus_area)
        .collect();
    sort_by_order(&mut scoped);
    scoped
}

/// Keep only entries with `status`, preserving input order.
pub fn filter_by_status<'a>(entries: &[&'a Entry], status: Status) -> Vec<&'a Entry> {
    entries.iter().copied().filter(|e| e.status == status).collect()
}

/// Keep only entries marked public, preserving input order.
pub fn public_only<'a>(entries: &[&'a Entry]) -> Vec<&'a Entry> {
    entries.iter().copied().filter(|e| e.is_public).collect()
}

/// Entries split into the three display groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusGroups<'a> {
    pub completed: Vec<&'a Entry>,
    pub in_progress: Vec<&'a Entry>,
    pub planned: Vec<&'a Entry>,
}

impl StatusGroups<'_> {
    pub fn len(&self) -> usize {
        self.completed.len() + self.in_progress.len() + self.planned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition entries into Completed, In Progress and Planned groups, each
/// sorted by `order` ascending.
pub fn partition_by_status<'a>(entries: &[&'a Entry]) -> StatusGroups<'a> {
    let mut groups = StatusGroups::default();
    for entry in entries {
        match entry.status {
            Status::Completed => groups.completed.push(*entry),
            Status::InProgress => groups.in_progress.push(*entry),
            Status::Planned => groups.planned.push(*entry),
        }
    }
    sort_by_order(&mut groups.completed);
    sort_by_order(&mut groups.in_progress);
    sort_by_order(&mut groups.planned);
    groups
}

/// A phase with its entries in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseGroup<'a> {
    pub phase: &'a Phase,
    pub entries: Vec<&'a Entry>,
}

/// Group entries under their phases, phases in display order.
///
/// Entries whose phase is not in `phases` are left out.
pub fn group_by_phase<'a>(phases: &[&'a Phase], entries: &'a [Entry]) -> Vec<PhaseGroup<'a>> {
    let mut ordered: Vec<&Phase> = phases.to_vec();
    sort_by_order(&mut ordered);
    ordered
        .into_iter()
        .map(|phase| PhaseGroup {
            phase,
            entries: entries_for_phase(entries, &phase.id),
        })
        .collect()
}

/// An ordered focus area with its entries in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAreaGroup<'a> {
    pub focus_area: &'a str,
    pub entries: Vec<&'a Entry>,
}

/// Group a phase's entries by focus area, in the phase's focus-area order.
pub fn group_by_focus_area<'a>(phase: &'a Phase, entries: &'a [Entry]) -> Vec<FocusAreaGroup<'a>> {
    phase
        .focus_areas
        .iter()
        .map(|area| FocusAreaGroup {
            focus_area: area.as_str(),
            entries: entries_in_focus_area(entries, &phase.id, area),
        })
        .collect()
}
