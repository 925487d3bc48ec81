//! YAML seed import.
//!
//! A seed file nests entries under phases under journeys. The whole file is
//! validated, and its ids checked against the store, before anything is
//! written. A write that still fails midway reports the ids already
//! imported.
//!
//! ```yaml
//! journeys:
//!   - id: cloud-engineer
//!     title: Cloud Engineer
//!     icon: cloud
//!     color: blue
//!     isPublic: true
//!     phases:
//!       - title: Foundations
//!         status: In Progress
//!         focusAreas: [Linux, Git]
//!         entries:
//!           - title: Shell scripting
//!             domain: Linux
//!             type: lab
//!             status: Completed
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{
    Entry, EntryDraft, EntryId, Journey, JourneyDraft, JourneyId, Phase, PhaseDraft, PhaseId,
};
use crate::repository::{EntityKind, JourneyRepository, RepositoryError};
use crate::validation::ValidationError;

/// Result type for seed operations.
pub type Result<T> = std::result::Result<T, SeedError>;

/// Errors that can occur while reading or importing a seed.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid record at {location}: {source}")]
    Invalid {
        location: String,
        source: ValidationError,
    },

    #[error("Duplicate {kind} id in seed: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("{kind} {id} already exists in the store")]
    AlreadyStored { kind: EntityKind, id: String },

    #[error("Seed import stopped after {} record(s): {source}", .imported.len())]
    PartialImport {
        /// Ids written before the failure, in write order.
        imported: Vec<String>,
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Top level of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub journeys: Vec<SeedJourney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedJourney {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub draft: JourneyDraft,
    #[serde(default)]
    pub phases: Vec<SeedPhase>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPhase {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub draft: PhaseDraft,
    #[serde(default)]
    pub total_modules: Option<u32>,
    #[serde(default)]
    pub entries: Vec<SeedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub draft: EntryDraft,
}

/// Validated records ready to be written, parents before children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedPlan {
    pub journeys: Vec<Journey>,
    pub phases: Vec<Phase>,
    pub entries: Vec<Entry>,
}

/// Counts of records written by [`import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub journeys: usize,
    pub phases: usize,
    pub entries: usize,
}

impl SeedFile {
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::parse(&yaml)
    }

    /// Validate every record and assign ids and back-references.
    ///
    /// Entries without an explicit `order` are numbered 1..N within their
    /// phase in file order.
    pub fn plan(self) -> Result<SeedPlan> {
        let mut plan = SeedPlan::default();
        let mut seen: HashSet<(EntityKind, String)> = HashSet::new();

        for (j, seed_journey) in self.journeys.into_iter().enumerate() {
            let journey_id = seed_journey.id.map(JourneyId::new).unwrap_or_else(JourneyId::generate);
            claim(&mut seen, EntityKind::Journey, journey_id.as_str())?;
            let location = format!("journeys[{j}]");
            let journey = Journey::new(journey_id, seed_journey.draft).map_err(at(&location))?;

            for (p, seed_phase) in seed_journey.phases.into_iter().enumerate() {
                let phase_id = seed_phase.id.map(PhaseId::new).unwrap_or_else(PhaseId::generate);
                claim(&mut seen, EntityKind::Phase, phase_id.as_str())?;
                let location = format!("{location}.phases[{p}]");
                let mut phase =
                    Phase::new(phase_id, journey.id.clone(), seed_phase.draft).map_err(at(&location))?;
                phase.total_modules = seed_phase.total_modules;

                for (e, seed_entry) in seed_phase.entries.into_iter().enumerate() {
                    let entry_id = seed_entry.id.map(EntryId::new).unwrap_or_else(EntryId::generate);
                    claim(&mut seen, EntityKind::Entry, entry_id.as_str())?;
                    let location = format!("{location}.entries[{e}]");
                    let mut draft = seed_entry.draft;
                    if draft.order == 0 {
                        draft.order = e as u32 + 1;
                    }
                    plan.entries.push(Entry::new(entry_id, &phase, draft).map_err(at(&location))?);
                }
                plan.phases.push(phase);
            }
            plan.journeys.push(journey);
        }

        Ok(plan)
    }
}

/// Validate `seed` in full, then write journeys, phases and entries.
///
/// Fails with `AlreadyStored` before any write when a planned id is
/// already taken.
pub async fn import(repo: &JourneyRepository, seed: SeedFile) -> Result<ImportSummary> {
    let plan = seed.plan()?;
    check_unclaimed(repo, &plan).await?;

    let mut imported = Vec::new();
    for journey in &plan.journeys {
        repo.insert_journey(journey)
            .await
            .map_err(|e| partial(&imported, e))?;
        imported.push(journey.id.to_string());
    }
    for phase in &plan.phases {
        repo.insert_phase(phase).await.map_err(|e| partial(&imported, e))?;
        imported.push(phase.id.to_string());
    }
    for entry in &plan.entries {
        repo.insert_entry(entry).await.map_err(|e| partial(&imported, e))?;
        imported.push(entry.id.to_string());
    }

    let summary = ImportSummary {
        journeys: plan.journeys.len(),
        phases: plan.phases.len(),
        entries: plan.entries.len(),
    };
    info!(
        journeys = summary.journeys,
        phases = summary.phases,
        entries = summary.entries,
        "seed imported"
    );
    Ok(summary)
}

async fn check_unclaimed(repo: &JourneyRepository, plan: &SeedPlan) -> Result<()> {
    for journey in &plan.journeys {
        stored(EntityKind::Journey, journey.id.as_str(), repo.get_journey(&journey.id).await)?;
    }
    for phase in &plan.phases {
        stored(EntityKind::Phase, phase.id.as_str(), repo.get_phase(&phase.id).await)?;
    }
    for entry in &plan.entries {
        stored(EntityKind::Entry, entry.id.as_str(), repo.get_entry(&entry.id).await)?;
    }
    Ok(())
}

fn stored<T>(kind: EntityKind, id: &str, lookup: std::result::Result<T, RepositoryError>) -> Result<()> {
    match lookup {
        Ok(_) => Err(SeedError::AlreadyStored {
            kind,
            id: id.to_string(),
        }),
        Err(RepositoryError::NotFound { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn partial(imported: &[String], source: RepositoryError) -> SeedError {
    warn!(imported = imported.len(), error = %source, "seed import stopped");
    SeedError::PartialImport {
        imported: imported.to_vec(),
        source,
    }
}

fn claim(seen: &mut HashSet<(EntityKind, String)>, kind: EntityKind, id: &str) -> Result<()> {
    if !seen.insert((kind, id.to_string())) {
        return Err(SeedError::DuplicateId {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn at(location: &str) -> impl Fn(ValidationError) -> SeedError + '_ {
    move |source| SeedError::Invalid {
        location: location.to_string(),
        source,
    }
}
