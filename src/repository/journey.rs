//! Journey repository.
//!
//! Typed access to the three journey collections. Records are validated
//! before any store call; reads hand back records in display order.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{DeletePolicy, EntityKind, RepositoryError, Result};
use crate::domain::{
    Entry, EntryDraft, EntryId, EntryPatch, Journey, JourneyDraft, JourneyId, JourneyPatch, Phase,
    PhaseDraft, PhaseId, PhasePatch,
};
use crate::snapshot::JourneySnapshot;
use crate::storage::helpers::{from_document, into_document};
use crate::storage::{Direction, Document, DocumentStore, ListQuery, ENTRIES, JOURNEYS, PHASES};
use crate::validation::ValidationError;

/// Repository for journeys, phases and entries.
pub struct JourneyRepository {
    store: Arc<dyn DocumentStore>,
    delete_policy: DeletePolicy,
}

impl JourneyRepository {
    /// Create a repository that rejects deletes of records with children.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn with_policy(store: Arc<dyn DocumentStore>, delete_policy: DeletePolicy) -> Self {
        Self {
            store,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    // ------------------------------------------------------------------
    // Journeys
    // ------------------------------------------------------------------

    /// Validate `draft` and store it under a generated id.
    pub async fn create_journey(&self, draft: JourneyDraft) -> Result<Journey> {
        let journey = Journey::new(JourneyId::generate(), draft)?;
        self.insert_journey(&journey).await?;
        Ok(journey)
    }

    /// Store an already-built journey.
    pub async fn insert_journey(&self, journey: &Journey) -> Result<()> {
        journey.validate()?;
        self.insert(EntityKind::Journey, journey).await?;
        info!(journey = %journey.id, "journey created");
        Ok(())
    }

    pub async fn get_journey(&self, id: &JourneyId) -> Result<Journey> {
        self.fetch(EntityKind::Journey, id.as_str()).await
    }

    /// All journeys in display order.
    pub async fn list_journeys(&self) -> Result<Vec<Journey>> {
        self.list(EntityKind::Journey, ordered()).await
    }

    pub async fn update_journey(&self, id: &JourneyId, patch: &JourneyPatch) -> Result<Journey> {
        let current = self.get_journey(id).await?;
        let next = current.apply(patch)?;
        self.replace(EntityKind::Journey, id.as_str(), &current, &next).await?;
        Ok(next)
    }

    /// Delete a journey and, under `Cascade`, its phases and their entries.
    pub async fn delete_journey(&self, id: &JourneyId) -> Result<()> {
        self.get_journey(id).await?;

        let phases = self.list_phases(id).await?;
        let mut steps = Vec::new();
        for phase in &phases {
            for entry in self.list_entries(&phase.id).await? {
                steps.push((EntityKind::Entry, entry.id.into_inner()));
            }
        }
        steps.extend(phases.into_iter().map(|p| (EntityKind::Phase, p.id.into_inner())));

        self.delete_tree(EntityKind::Journey, id.as_str(), steps).await
    }

    // ------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------

    /// Validate `draft` and store it under `journey_id` with a generated id.
    pub async fn create_phase(&self, journey_id: &JourneyId, draft: PhaseDraft) -> Result<Phase> {
        let phase = Phase::new(PhaseId::generate(), journey_id.clone(), draft)?;
        self.insert_phase(&phase).await?;
        Ok(phase)
    }

    /// Store an already-built phase; its journey must exist.
    pub async fn insert_phase(&self, phase: &Phase) -> Result<()> {
        phase.validate()?;
        self.get_journey(&phase.journey_id).await?;
        self.insert(EntityKind::Phase, phase).await?;
        info!(phase = %phase.id, journey = %phase.journey_id, "phase created");
        Ok(())
    }

    pub async fn get_phase(&self, id: &PhaseId) -> Result<Phase> {
        self.fetch(EntityKind::Phase, id.as_str()).await
    }

    /// Phases of a journey in display order.
    pub async fn list_phases(&self, journey_id: &JourneyId) -> Result<Vec<Phase>> {
        self.list(EntityKind::Phase, ordered().where_eq("journeyId", journey_id.as_str()))
            .await
    }

    /// Apply `patch` to a phase.
    ///
    /// Removing a focus area that stored entries still use is rejected.
    pub async fn update_phase(&self, id: &PhaseId, patch: &PhasePatch) -> Result<Phase> {
        let current = self.get_phase(id).await?;
        let next = current.apply(patch)?;

        if next.focus_areas != current.focus_areas {
            let entries = self.list_entries(id).await?;
            if let Some(entry) = entries
                .iter()
                .find(|e| current.has_focus_area(&e.domain) && !next.has_focus_area(&e.domain))
            {
                return Err(ValidationError::UnknownFocusArea {
                    domain: entry.domain.clone(),
                    allowed: next.focus_areas.clone(),
                }
                .into());
            }
        }

        self.replace(EntityKind::Phase, id.as_str(), &current, &next).await?;
        Ok(next)
    }

    /// Delete a phase and, under `Cascade`, its entries.
    pub async fn delete_phase(&self, id: &PhaseId) -> Result<()> {
        self.get_phase(id).await?;
        let steps = self
            .list_entries(id)
            .await?
            .into_iter()
            .map(|e| (EntityKind::Entry, e.id.into_inner()))
            .collect();
        self.delete_tree(EntityKind::Phase, id.as_str(), steps).await
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Validate `draft` and store it under `phase_id` with a generated id.
    ///
    /// An `order` of 0 appends the entry after the phase's last entry.
    pub async fn create_entry(&self, phase_id: &PhaseId, mut draft: EntryDraft) -> Result<Entry> {
        let phase = self.get_phase(phase_id).await?;
        if draft.order == 0 {
            let last = self
                .list_entries(phase_id)
                .await?
                .iter()
                .map(|e| e.order)
                .max()
                .unwrap_or(0);
            draft.order = last
                .checked_add(1)
                .ok_or(ValidationError::InvalidOrder { value: last })?;
        }
        let entry = Entry::new(EntryId::generate(), &phase, draft)?;
        self.insert(EntityKind::Entry, &entry).await?;
        info!(entry = %entry.id, phase = %phase.id, "entry created");
        Ok(entry)
    }

    /// Store an already-built entry; its phase must exist and list the
    /// entry's domain as a focus area.
    pub async fn insert_entry(&self, entry: &Entry) -> Result<()> {
        entry.validate()?;
        let phase = self.get_phase(&entry.phase_id).await?;
        entry.check_owner(&phase)?;
        self.insert(EntityKind::Entry, entry).await?;
        info!(entry = %entry.id, phase = %phase.id, "entry created");
        Ok(())
    }

    pub async fn get_entry(&self, id: &EntryId) -> Result<Entry> {
        self.fetch(EntityKind::Entry, id.as_str()).await
    }

    /// Entries of a phase in display order.
    pub async fn list_entries(&self, phase_id: &PhaseId) -> Result<Vec<Entry>> {
        self.list(EntityKind::Entry, ordered().where_eq("phaseId", phase_id.as_str()))
            .await
    }

    pub async fn update_entry(&self, id: &EntryId, patch: &EntryPatch) -> Result<Entry> {
        let current = self.get_entry(id).await?;
        let next = current.apply(patch)?;
        if next.domain != current.domain {
            let phase = self.get_phase(&next.phase_id).await?;
            next.check_owner(&phase)?;
        }
        self.replace(EntityKind::Entry, id.as_str(), &current, &next).await?;
        Ok(next)
    }

    pub async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.store
            .delete(ENTRIES, id.as_str())
            .await
            .map_err(|e| RepositoryError::from_store(EntityKind::Entry, e))?;
        info!(entry = %id, "entry deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Load stage
    // ------------------------------------------------------------------

    /// Read all three collections once and build an immutable snapshot.
    ///
    /// A malformed document fails the whole load.
    pub async fn load_snapshot(&self) -> Result<JourneySnapshot> {
        let all = ListQuery::new();
        let (journeys, phases, entries) = tokio::try_join!(
            self.store.list(JOURNEYS, &all),
            self.store.list(PHASES, &all),
            self.store.list(ENTRIES, &all),
        )?;

        let journeys = decode_all::<Journey>(JOURNEYS, journeys)?;
        let phases = decode_all::<Phase>(PHASES, phases)?;
        let entries = decode_all::<Entry>(ENTRIES, entries)?;
        debug!(
            journeys = journeys.len(),
            phases = phases.len(),
            entries = entries.len(),
            "snapshot loaded"
        );
        Ok(JourneySnapshot::new(journeys, phases, entries))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn insert<T: Serialize>(&self, kind: EntityKind, record: &T) -> Result<()> {
        let doc = into_document(kind.collection(), record)?;
        self.store.create(kind.collection(), doc).await?;
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, kind: EntityKind, id: &str) -> Result<T> {
        let doc = self
            .store
            .get(kind.collection(), id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(kind, id))?;
        Ok(from_document(kind.collection(), doc)?)
    }

    async fn list<T: DeserializeOwned>(&self, kind: EntityKind, query: ListQuery) -> Result<Vec<T>> {
        let docs = self.store.list(kind.collection(), &query).await?;
        Ok(decode_all(kind.collection(), docs)?)
    }

    /// Write `next` over `current`, nulling fields that `next` dropped.
    async fn replace<T: Serialize>(&self, kind: EntityKind, id: &str, current: &T, next: &T) -> Result<()> {
        let before = into_document(kind.collection(), current)?;
        let mut partial = into_document(kind.collection(), next)?;
        for field in before.keys() {
            if !partial.contains_key(field) {
                partial.insert(field.clone(), Value::Null);
            }
        }
        self.store
            .update(kind.collection(), id, partial)
            .await
            .map_err(|e| RepositoryError::from_store(kind, e))?;
        info!(kind = %kind, id, "record updated");
        Ok(())
    }

    /// Delete `steps` in order, then the root record.
    ///
    /// Under `Reject` any step means the root still has children.
    async fn delete_tree(&self, kind: EntityKind, id: &str, mut steps: Vec<(EntityKind, String)>) -> Result<()> {
        if !steps.is_empty() && self.delete_policy == DeletePolicy::Reject {
            return Err(RepositoryError::DependentsExist {
                kind,
                id: id.to_string(),
                dependents: steps.len(),
            });
        }

        steps.push((kind, id.to_string()));
        let mut deleted = Vec::with_capacity(steps.len());
        for (index, (step_kind, step_id)) in steps.iter().enumerate() {
            if let Err(source) = self.store.delete(step_kind.collection(), step_id).await {
                let remaining: Vec<String> = steps[index..].iter().map(|(_, id)| id.clone()).collect();
                warn!(
                    kind = %kind,
                    id,
                    failed = %step_id,
                    deleted = deleted.len(),
                    remaining = remaining.len(),
                    error = %source,
                    "cascade delete stopped"
                );
                return Err(RepositoryError::PartialDelete {
                    kind,
                    id: id.to_string(),
                    deleted,
                    remaining,
                    source,
                });
            }
            debug!(kind = %step_kind, id = %step_id, "deleted");
            deleted.push(step_id.clone());
        }

        info!(kind = %kind, id, removed = deleted.len(), "delete complete");
        Ok(())
    }
}

fn ordered() -> ListQuery {
    ListQuery::new().order_by("order", Direction::Asc)
}

fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> crate::storage::Result<Vec<T>> {
    docs.into_iter().map(|doc| from_document(collection, doc)).collect()
}
