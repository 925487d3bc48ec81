//! Shared world and record-building steps for the read-side features.
//!
//! Records are built directly rather than through the validating
//! constructors, so scenarios can stage legacy data that breaks the model's
//! invariants.

use cucumber::{given, World};

use waypoint::audit::AuditReport;
use waypoint::domain::{
    Color, Entry, EntryId, EntryType, Icon, Journey, JourneyId, Phase, PhaseId, Status,
};
use waypoint::navigation::NavigationState;
use waypoint::progress::{FocusAreaStats, JourneyProgress, PhaseStats};
use waypoint::snapshot::JourneySnapshot;

/// Test context for progress, audit and navigation scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct JourneyWorld {
    pub journeys: Vec<Journey>,
    pub phases: Vec<Phase>,
    pub entries: Vec<Entry>,
    pub progress: Option<JourneyProgress>,
    pub phase_stats: Option<PhaseStats>,
    pub focus_stats: Vec<FocusAreaStats>,
    pub report: Option<AuditReport>,
    pub audited: Option<JourneySnapshot>,
    pub nav: NavigationState,
    pub current_journey: Option<JourneyId>,
    pub last_error: Option<String>,
}

impl JourneyWorld {
    fn new() -> Self {
        Self {
            journeys: Vec::new(),
            phases: Vec::new(),
            entries: Vec::new(),
            progress: None,
            phase_stats: None,
            focus_stats: Vec::new(),
            report: None,
            audited: None,
            nav: NavigationState::new(),
            current_journey: None,
            last_error: None,
        }
    }

    pub fn snapshot(&self) -> JourneySnapshot {
        JourneySnapshot::new(self.journeys.clone(), self.phases.clone(), self.entries.clone())
    }

    pub fn journey(&self, id: &str) -> &Journey {
        self.journeys
            .iter()
            .find(|j| j.id.as_str() == id)
            .unwrap_or_else(|| panic!("no journey {id} in scenario"))
    }

    pub fn phase(&self, id: &str) -> &Phase {
        self.phases
            .iter()
            .find(|p| p.id.as_str() == id)
            .unwrap_or_else(|| panic!("no phase {id} in scenario"))
    }

    fn add_journey(&mut self, id: &str, is_public: bool) {
        let order = self.journeys.len() as i64 + 1;
        self.journeys.push(Journey {
            id: JourneyId::new(id),
            title: format!("Journey {id}"),
            description: String::new(),
            icon: Icon::Cloud,
            color: Color::Blue,
            is_public,
            order,
        });
    }
}

/// Split a comma-separated step argument.
pub fn list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn status(tag: &str) -> Status {
    tag.parse().unwrap_or_else(|e| panic!("bad status {tag:?}: {e}"))
}

// --- Given steps ---

#[given(expr = "a journey {string}")]
async fn given_journey(world: &mut JourneyWorld, id: String) {
    world.add_journey(&id, true);
}

#[given(expr = "a private journey {string}")]
async fn given_private_journey(world: &mut JourneyWorld, id: String) {
    world.add_journey(&id, false);
}

#[given(expr = "a phase {string} of journey {string} with status {string} and focus areas {string}")]
async fn given_phase(
    world: &mut JourneyWorld,
    id: String,
    journey: String,
    status_tag: String,
    areas: String,
) {
    let order = world
        .phases
        .iter()
        .filter(|p| p.journey_id.as_str() == journey)
        .count() as i64
        + 1;
    world.phases.push(Phase {
        id: PhaseId::new(id.as_str()),
        journey_id: JourneyId::new(journey),
        title: format!("Phase {id}"),
        description: String::new(),
        status: status(&status_tag),
        focus_areas: list(&areas),
        order,
        total_modules: None,
    });
}

#[given(expr = "phase {string} caches {int} total modules")]
async fn given_cached_total(world: &mut JourneyWorld, id: String, total: u32) {
    let phase = world
        .phases
        .iter_mut()
        .find(|p| p.id.as_str() == id)
        .expect("phase should exist");
    phase.total_modules = Some(total);
}

#[given(expr = "an entry {string} in phase {string} with domain {string}, status {string} and order {int}")]
async fn given_entry(
    world: &mut JourneyWorld,
    id: String,
    phase: String,
    domain: String,
    status_tag: String,
    order: u32,
) {
    world.entries.push(Entry {
        id: EntryId::new(id.as_str()),
        phase_id: PhaseId::new(phase),
        domain,
        title: format!("Entry {id}"),
        entry_type: EntryType::Lab,
        status: status(&status_tag),
        description: String::new(),
        tech_stack: Vec::new(),
        order,
        is_public: true,
        issuer: None,
        issue_date: None,
        credential_link: None,
        certificate_image: None,
        github_link: None,
    });
}

#[given(expr = "entry {string} is private")]
async fn given_private_entry(world: &mut JourneyWorld, id: String) {
    let entry = world
        .entries
        .iter_mut()
        .find(|e| e.id.as_str() == id)
        .expect("entry should exist");
    entry.is_public = false;
}
