//! Journey detail drill-down.
//!
//! Three mutually exclusive views driven by two selectors:
//!
//! ```text
//! AllPhases --select_phase--> PhaseOverview --select_focus_area--> FocusAreaEntries
//!     ^                            |    ^                                |
//!     +-------clear_phase----------+    +--------clear_focus_area--------+
//! ```
//!
//! The state holds only the selectors. Views are recomputed from an
//! already-loaded [`JourneySnapshot`] on every call; no transition reads
//! from the store.

use serde::{Deserialize, Serialize};

use crate::domain::{Entry, Journey, JourneyId, Phase, PhaseId};
use crate::progress::{compute_focus_area_stats, compute_phase_stats, FocusAreaStats, PhaseStats};
use crate::query::{self, StatusGroups};
use crate::snapshot::JourneySnapshot;

/// Navigation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("No phase selected")]
    NoPhaseSelected,

    #[error("Phase not found: {0}")]
    UnknownPhase(PhaseId),

    #[error("Focus area {focus_area:?} is not part of phase {phase}")]
    UnknownFocusArea { phase: PhaseId, focus_area: String },

    #[error("Invalid navigation query: {0}")]
    InvalidQuery(String),

    #[error("Failed to encode navigation query: {0}")]
    Encode(String),
}

/// Selector state for one journey detail page.
///
/// Serializes to the page's query string so a drill-down position can be
/// bookmarked and shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    #[serde(rename = "phase", default, skip_serializing_if = "Option::is_none")]
    selected_phase: Option<PhaseId>,
    #[serde(rename = "focus", default, skip_serializing_if = "Option::is_none")]
    selected_focus_area: Option<String>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_phase(&self) -> Option<&PhaseId> {
        self.selected_phase.as_ref()
    }

    pub fn selected_focus_area(&self) -> Option<&str> {
        self.selected_focus_area.as_deref()
    }

    /// Select a phase. Switching to a different phase clears the focus area,
    /// since focus areas are phase-scoped.
    pub fn select_phase(&mut self, phase_id: PhaseId) {
        if self.selected_phase.as_ref() != Some(&phase_id) {
            self.selected_focus_area = None;
        }
        self.selected_phase = Some(phase_id);
    }

    /// Back to the all-phases view.
    pub fn clear_phase(&mut self) {
        self.selected_phase = None;
        self.selected_focus_area = None;
    }

    /// Select a focus area of the currently selected phase.
    pub fn select_focus_area(
        &mut self,
        snapshot: &JourneySnapshot,
        focus_area: &str,
    ) -> Result<(), NavigationError> {
        let phase_id = self
            .selected_phase
            .as_ref()
            .ok_or(NavigationError::NoPhaseSelected)?;
        let phase = snapshot
            .phase(phase_id)
            .ok_or_else(|| NavigationError::UnknownPhase(phase_id.clone()))?;
        if !phase.has_focus_area(focus_area) {
            return Err(NavigationError::UnknownFocusArea {
                phase: phase_id.clone(),
                focus_area: focus_area.to_string(),
            });
        }
        self.selected_focus_area = Some(focus_area.to_string());
        Ok(())
    }

    /// Back to the phase overview; the phase stays selected.
    pub fn clear_focus_area(&mut self) {
        self.selected_focus_area = None;
    }

    /// Encode as `phase=..&focus=..`.
    pub fn to_query_string(&self) -> Result<String, NavigationError> {
        serde_urlencoded::to_string(self).map_err(|e| NavigationError::Encode(e.to_string()))
    }

    /// Decode from a query string. A focus area without a phase is dropped.
    pub fn from_query_string(query: &str) -> Result<Self, NavigationError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state: NavigationState = serde_urlencoded::from_str(query)
            .map_err(|e| NavigationError::InvalidQuery(e.to_string()))?;
        if state.selected_phase.as_ref().is_some_and(|p| p.as_str().is_empty()) {
            state.selected_phase = None;
        }
        if state.selected_phase.is_none() || state.selected_focus_area.as_deref() == Some("") {
            state.selected_focus_area = None;
        }
        Ok(state)
    }

    /// Render the current view of `journey_id` from `snapshot`.
    ///
    /// Stale selectors (a phase that no longer exists or belongs to another
    /// journey, a focus area the phase no longer lists) fall back to the
    /// nearest valid view.
    pub fn view<'a>(
        &self,
        snapshot: &'a JourneySnapshot,
        journey_id: &JourneyId,
    ) -> Option<View<'a>> {
        let journey = snapshot.journey(journey_id)?;

        let phase = self
            .selected_phase
            .as_ref()
            .and_then(|id| snapshot.phase(id))
            .filter(|p| &p.journey_id == journey_id);

        let Some(phase) = phase else {
            return Some(View::AllPhases(all_phases(snapshot, journey)));
        };

        let focus_area = self
            .selected_focus_area
            .as_deref()
            .and_then(|area| phase.focus_areas.iter().find(|a| a.as_str() == area));

        match focus_area {
            Some(area) => {
                let scoped = query::entries_in_focus_area(snapshot.entries(), &phase.id, area);
                Some(View::FocusAreaEntries(FocusAreaEntriesView {
                    journey,
                    phase,
                    focus_area: area.as_str(),
                    groups: query::partition_by_status(&scoped),
                }))
            }
            None => Some(View::PhaseOverview(PhaseOverviewView {
                journey,
                phase,
                stats: compute_phase_stats(phase, snapshot.entries()),
                focus_areas: compute_focus_area_stats(phase, snapshot.entries()),
            })),
        }
    }
}

/// One rendered drill-down level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View<'a> {
    AllPhases(AllPhasesView<'a>),
    PhaseOverview(PhaseOverviewView<'a>),
    FocusAreaEntries(FocusAreaEntriesView<'a>),
}

/// State A: every phase of the journey with its live counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllPhasesView<'a> {
    pub journey: &'a Journey,
    pub phases: Vec<PhaseCard<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseCard<'a> {
    pub phase: &'a Phase,
    pub stats: PhaseStats,
}

/// State B: one phase with a stat card per focus area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseOverviewView<'a> {
    pub journey: &'a Journey,
    pub phase: &'a Phase,
    pub stats: PhaseStats,
    pub focus_areas: Vec<FocusAreaStats>,
}

/// State C: one focus area's entries grouped by status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAreaEntriesView<'a> {
    pub journey: &'a Journey,
    pub phase: &'a Phase,
    pub focus_area: &'a str,
    pub groups: StatusGroups<'a>,
}

impl<'a> FocusAreaEntriesView<'a> {
    /// Entries in display sequence: completed, then in progress, then planned.
    pub fn entries(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.groups
            .completed
            .iter()
            .chain(&self.groups.in_progress)
            .chain(&self.groups.planned)
            .copied()
    }
}

fn all_phases<'a>(snapshot: &'a JourneySnapshot, journey: &'a Journey) -> AllPhasesView<'a> {
    let phases = snapshot
        .phases_of(&journey.id)
        .into_iter()
        .map(|phase| PhaseCard {
            phase,
            stats: compute_phase_stats(phase, snapshot.entries()),
        })
        .collect();
    AllPhasesView { journey, phases }
}
