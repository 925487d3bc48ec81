//! Immutable journey snapshot.
//!
//! Produced once by the load stage (see
//! [`crate::repository::JourneyRepository::load_snapshot`]); everything
//! downstream (navigation, stats, audit) reads from it without touching
//! the store again.

use serde::Serialize;

use crate::domain::{Entry, Journey, JourneyId, Phase, PhaseId};
use crate::progress::{compute_journey_progress, JourneyProgress};
use crate::query;

/// Journeys, phases and entries as loaded from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneySnapshot {
    journeys: Vec<Journey>,
    phases: Vec<Phase>,
    entries: Vec<Entry>,
}

/// A journey with its derived progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySummary<'a> {
    #[serde(flatten)]
    pub journey: &'a Journey,
    #[serde(flatten)]
    pub progress: JourneyProgress,
}

impl JourneySnapshot {
    /// Build a snapshot; each collection is put in display order.
    pub fn new(mut journeys: Vec<Journey>, mut phases: Vec<Phase>, mut entries: Vec<Entry>) -> Self {
        query::sort_by_order(&mut journeys);
        query::sort_by_order(&mut phases);
        query::sort_by_order(&mut entries);
        Self {
            journeys,
            phases,
            entries,
        }
    }

    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn journey(&self, id: &JourneyId) -> Option<&Journey> {
        self.journeys.iter().find(|j| &j.id == id)
    }

    pub fn phase(&self, id: &PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| &p.id == id)
    }

    /// Phases of a journey in display order.
    pub fn phases_of(&self, journey_id: &JourneyId) -> Vec<&Phase> {
        query::phases_for_journey(&self.phases, journey_id)
    }

    /// Entries of a phase in display order.
    pub fn entries_of(&self, phase_id: &PhaseId) -> Vec<&Entry> {
        query::entries_for_phase(&self.entries, phase_id)
    }

    /// Journey with derived progress, or `None` for an unknown id.
    pub fn journey_summary(&self, id: &JourneyId) -> Option<JourneySummary<'_>> {
        let journey = self.journey(id)?;
        Some(JourneySummary {
            journey,
            progress: compute_journey_progress(journey, &self.phases),
        })
    }

    /// Summaries of every journey in display order.
    pub fn summaries(&self) -> Vec<JourneySummary<'_>> {
        self.journeys
            .iter()
            .map(|journey| JourneySummary {
                journey,
                progress: compute_journey_progress(journey, &self.phases),
            })
            .collect()
    }

    /// The subset shown on the public site.
    ///
    /// Keeps public journeys, all phases of those journeys, and the public
    /// entries of those phases.
    pub fn public_view(&self) -> JourneySnapshot {
        let journeys: Vec<Journey> = self.journeys.iter().filter(|j| j.is_public).cloned().collect();
        let phases: Vec<Phase> = self
            .phases
            .iter()
            .filter(|p| journeys.iter().any(|j| j.id == p.journey_id))
            .cloned()
            .collect();
        let entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.is_public && phases.iter().any(|p| p.id == e.phase_id))
            .cloned()
            .collect();
        JourneySnapshot::new(journeys, phases, entries)
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty() && self.phases.is_empty() && self.entries.is_empty()
    }
}
