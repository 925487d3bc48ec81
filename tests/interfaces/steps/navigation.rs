//! Drill-down navigation step definitions.

use cucumber::{then, when};

use waypoint::domain::{JourneyId, PhaseId};
use waypoint::navigation::{NavigationState, View};

use super::model::{list, JourneyWorld};

fn view_name(view: &View<'_>) -> &'static str {
    match view {
        View::AllPhases(_) => "all phases",
        View::PhaseOverview(_) => "phase overview",
        View::FocusAreaEntries(_) => "focus area entries",
    }
}

impl JourneyWorld {
    fn journey_id(&self) -> JourneyId {
        self.current_journey.clone().expect("no journey opened")
    }
}

// --- When steps ---

#[when(expr = "I open journey {string}")]
async fn when_open_journey(world: &mut JourneyWorld, id: String) {
    world.current_journey = Some(JourneyId::new(id));
    world.nav = NavigationState::new();
}

#[when(expr = "I select phase {string}")]
async fn when_select_phase(world: &mut JourneyWorld, id: String) {
    world.nav.select_phase(PhaseId::new(id));
}

#[when(expr = "I select focus area {string}")]
async fn when_select_focus_area(world: &mut JourneyWorld, area: String) {
    let snapshot = world.snapshot();
    world.last_error = world
        .nav
        .select_focus_area(&snapshot, &area)
        .err()
        .map(|e| e.to_string());
}

#[when("I go back to the phase")]
async fn when_clear_focus_area(world: &mut JourneyWorld) {
    world.nav.clear_focus_area();
}

#[when("I go back to all phases")]
async fn when_clear_phase(world: &mut JourneyWorld) {
    world.nav.clear_phase();
}

#[when(expr = "I follow the link {string}")]
async fn when_follow_link(world: &mut JourneyWorld, query: String) {
    world.nav = NavigationState::from_query_string(&query).expect("query should parse");
}

#[when(expr = "phase {string} is removed")]
async fn when_phase_removed(world: &mut JourneyWorld, id: String) {
    world.phases.retain(|p| p.id.as_str() != id);
}

// --- Then steps ---

#[then(expr = "the view is {string}")]
async fn then_view_is(world: &mut JourneyWorld, expected: String) {
    let snapshot = world.snapshot();
    let view = world
        .nav
        .view(&snapshot, &world.journey_id())
        .expect("journey should exist");
    assert_eq!(view_name(&view), expected);
}

#[then(expr = "the view lists phases {string}")]
async fn then_lists_phases(world: &mut JourneyWorld, ids: String) {
    let snapshot = world.snapshot();
    let view = world.nav.view(&snapshot, &world.journey_id());
    let Some(View::AllPhases(all)) = view else {
        panic!("expected the all phases view, got {view:?}");
    };
    let actual: Vec<String> = all.phases.iter().map(|c| c.phase.id.to_string()).collect();
    assert_eq!(actual, list(&ids));
}

#[then(expr = "the view shows entries {string}")]
async fn then_shows_entries(world: &mut JourneyWorld, ids: String) {
    let snapshot = world.snapshot();
    let view = world.nav.view(&snapshot, &world.journey_id());
    let Some(View::FocusAreaEntries(scoped)) = view else {
        panic!("expected the focus area entries view, got {view:?}");
    };
    let actual: Vec<String> = scoped.entries().map(|e| e.id.to_string()).collect();
    assert_eq!(actual, list(&ids));
}

#[then(expr = "the selection is rejected with {string}")]
async fn then_rejected(world: &mut JourneyWorld, text: String) {
    let error = world.last_error.as_deref().expect("selection should have failed");
    assert!(error.contains(&text), "{error:?} does not contain {text:?}");
}

#[then(expr = "the link is {string}")]
async fn then_link_is(world: &mut JourneyWorld, expected: String) {
    assert_eq!(world.nav.to_query_string().expect("state should encode"), expected);
}
