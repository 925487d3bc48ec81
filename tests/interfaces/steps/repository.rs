//! Repository write-path step definitions.

use std::fmt;
use std::sync::Arc;

use cucumber::{given, then, when, World};

use waypoint::domain::{
    Entry, EntryDraft, EntryId, Journey, JourneyDraft, JourneyId, Phase, PhaseDraft, PhaseId,
};
use waypoint::repository::{DeletePolicy, JourneyRepository, RepositoryError};
use waypoint::storage::{MockDocumentStore, ENTRIES, JOURNEYS, PHASES};
use waypoint::validation::ValidationError;

use super::model::list;

/// Test context for repository scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct RepositoryWorld {
    store: Arc<MockDocumentStore>,
    repo: JourneyRepository,
    last_result: Option<Result<(), RepositoryError>>,
}

impl fmt::Debug for RepositoryWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryWorld")
            .field("delete_policy", &self.repo.delete_policy())
            .field("last_result", &self.last_result)
            .finish()
    }
}

impl RepositoryWorld {
    fn new() -> Self {
        let store = Arc::new(MockDocumentStore::new());
        Self {
            repo: JourneyRepository::new(store.clone()),
            store,
            last_result: None,
        }
    }

    fn error(&self) -> &RepositoryError {
        match &self.last_result {
            Some(Err(e)) => e,
            other => panic!("expected a failed operation, got {other:?}"),
        }
    }
}

fn draft_entry(domain: &str) -> EntryDraft {
    EntryDraft {
        domain: domain.to_string(),
        title: "Scenario entry".to_string(),
        entry_type: "project".to_string(),
        status: "Planned".to_string(),
        ..Default::default()
    }
}

// --- Given steps ---

#[given(expr = "a repository with the {string} delete policy")]
async fn given_policy(world: &mut RepositoryWorld, policy: String) {
    let policy = match policy.as_str() {
        "reject" => DeletePolicy::Reject,
        "cascade" => DeletePolicy::Cascade,
        other => panic!("unknown delete policy {other}"),
    };
    world.repo = JourneyRepository::with_policy(world.store.clone(), policy);
}

#[given(expr = "journey {string} with phase {string} holding entries {string}")]
async fn given_tree(world: &mut RepositoryWorld, journey: String, phase: String, entries: String) {
    if world.repo.get_journey(&JourneyId::new(journey.as_str())).await.is_err() {
        let draft = JourneyDraft {
            title: format!("Journey {journey}"),
            icon: "rocket".to_string(),
            color: "teal".to_string(),
            ..Default::default()
        };
        let record = Journey::new(JourneyId::new(journey.as_str()), draft).expect("valid journey");
        world.repo.insert_journey(&record).await.expect("insert journey");
    }

    let draft = PhaseDraft {
        title: format!("Phase {phase}"),
        status: "In Progress".to_string(),
        focus_areas: vec!["Linux".to_string()],
        ..Default::default()
    };
    let phase = Phase::new(PhaseId::new(phase), JourneyId::new(journey), draft).expect("valid phase");
    world.repo.insert_phase(&phase).await.expect("insert phase");

    for (index, id) in list(&entries).into_iter().enumerate() {
        let mut draft = draft_entry("Linux");
        draft.order = index as u32 + 1;
        let entry = Entry::new(EntryId::new(id), &phase, draft).expect("valid entry");
        world.repo.insert_entry(&entry).await.expect("insert entry");
    }
}

#[given(expr = "deleting {string} fails")]
async fn given_delete_fails(world: &mut RepositoryWorld, id: String) {
    world.store.fail_delete_of(&id).await;
}

// --- When steps ---

#[when(expr = "I delete phase {string}")]
async fn when_delete_phase(world: &mut RepositoryWorld, id: String) {
    world.last_result = Some(world.repo.delete_phase(&PhaseId::new(id)).await);
}

#[when(expr = "I delete journey {string}")]
async fn when_delete_journey(world: &mut RepositoryWorld, id: String) {
    world.last_result = Some(world.repo.delete_journey(&JourneyId::new(id)).await);
}

#[when(expr = "I delete entry {string}")]
async fn when_delete_entry(world: &mut RepositoryWorld, id: String) {
    world.last_result = Some(world.repo.delete_entry(&EntryId::new(id)).await);
}

#[when(expr = "I add an entry to phase {string} with domain {string}")]
async fn when_add_entry(world: &mut RepositoryWorld, phase: String, domain: String) {
    let result = world
        .repo
        .create_entry(&PhaseId::new(phase), draft_entry(&domain))
        .await;
    world.last_result = Some(result.map(|_| ()));
}

// --- Then steps ---

#[then("the operation succeeds")]
async fn then_succeeds(world: &mut RepositoryWorld) {
    match &world.last_result {
        Some(Ok(())) => {}
        other => panic!("expected success, got {other:?}"),
    }
}

#[then(expr = "the delete is rejected because {int} dependents exist")]
async fn then_rejected(world: &mut RepositoryWorld, count: usize) {
    match world.error() {
        RepositoryError::DependentsExist { dependents, .. } => assert_eq!(*dependents, count),
        other => panic!("expected DependentsExist, got {other}"),
    }
}

#[then(expr = "the delete stops having removed {string} with {string} remaining")]
async fn then_partial(world: &mut RepositoryWorld, deleted: String, remaining: String) {
    match world.error() {
        RepositoryError::PartialDelete {
            deleted: done,
            remaining: left,
            ..
        } => {
            assert_eq!(done, &list(&deleted));
            assert_eq!(left, &list(&remaining));
        }
        other => panic!("expected PartialDelete, got {other}"),
    }
}

#[then("the operation fails as not found")]
async fn then_not_found(world: &mut RepositoryWorld) {
    assert!(
        matches!(world.error(), RepositoryError::NotFound { .. }),
        "got {}",
        world.error()
    );
}

#[then("the entry is rejected as outside the focus areas")]
async fn then_outside_focus(world: &mut RepositoryWorld) {
    assert!(
        matches!(
            world.error(),
            RepositoryError::Validation(ValidationError::UnknownFocusArea { .. })
        ),
        "got {}",
        world.error()
    );
}

#[then(expr = "the store holds {int} journeys, {int} phases and {int} entries")]
async fn then_counts(world: &mut RepositoryWorld, journeys: usize, phases: usize, entries: usize) {
    assert_eq!(
        (
            world.store.stored_count(JOURNEYS).await,
            world.store.stored_count(PHASES).await,
            world.store.stored_count(ENTRIES).await,
        ),
        (journeys, phases, entries)
    );
}
