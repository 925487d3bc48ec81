//! Offline consistency audit.
//!
//! Reads full snapshots and reports findings; never writes back and never
//! fails. Checks:
//! - duplicate entry ids (error)
//! - entry domain outside its phase's focus areas (error)
//! - cached `totalModules` differing from the live entry count (warning)
//! - entry orders of a phase not exactly `1..=count` (error)
//! - focus area with no entries (warning)
//! - entry whose phase is missing (error)
//! - phase whose journey is missing (error, snapshot audit only)

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::domain::{Entry, JourneyId, Phase, PhaseId};
use crate::query;
use crate::snapshot::JourneySnapshot;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FindingKind {
    DuplicateEntryId,
    DomainNotInFocusAreas,
    TotalModulesMismatch,
    NonSequentialOrder,
    EmptyFocusArea,
    OrphanEntry,
    OrphanPhase,
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::TotalModulesMismatch | FindingKind::EmptyFocusArea => Severity::Warning,
            FindingKind::DuplicateEntryId
            | FindingKind::DomainNotInFocusAreas
            | FindingKind::NonSequentialOrder
            | FindingKind::OrphanEntry
            | FindingKind::OrphanPhase => Severity::Error,
        }
    }
}

/// One audit result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    /// Offending document ids, most specific first.
    pub ids: Vec<String>,
}

impl Finding {
    fn new(kind: FindingKind, message: String, ids: Vec<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message,
            ids,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// Findings of a full audit pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No findings of any severity.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

/// Audit a set of phases and the entries that belong to them.
///
/// Entries whose phase is not in `phases` are reported as orphans, so pass
/// the entries of the same journey(s) as the phases.
pub fn audit_journey(phases: &[Phase], entries: &[Entry]) -> Vec<Finding> {
    let mut findings = check_duplicate_ids(entries);

    let mut ordered: Vec<&Phase> = phases.iter().collect();
    query::sort_by_order(&mut ordered);
    for phase in ordered {
        findings.extend(check_phase(phase, entries));
    }

    let known: HashSet<&PhaseId> = phases.iter().map(|p| &p.id).collect();
    findings.extend(check_orphan_entries(&known, entries));
    findings
}

/// Audit every journey in a snapshot, plus phases that reference a
/// missing journey.
pub fn audit_snapshot(snapshot: &JourneySnapshot) -> AuditReport {
    let mut findings = check_duplicate_ids(snapshot.entries());

    for phase in snapshot.phases() {
        findings.extend(check_phase(phase, snapshot.entries()));
    }

    let known_phases: HashSet<&PhaseId> = snapshot.phases().iter().map(|p| &p.id).collect();
    findings.extend(check_orphan_entries(&known_phases, snapshot.entries()));

    let known_journeys: HashSet<&JourneyId> = snapshot.journeys().iter().map(|j| &j.id).collect();
    for phase in snapshot.phases() {
        if !known_journeys.contains(&phase.journey_id) {
            findings.push(Finding::new(
                FindingKind::OrphanPhase,
                format!(
                    "Phase {} references missing journey {}",
                    phase.id, phase.journey_id
                ),
                vec![phase.id.to_string(), phase.journey_id.to_string()],
            ));
        }
    }

    AuditReport { findings }
}

fn check_duplicate_ids(entries: &[Entry]) -> Vec<Finding> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for entry in entries {
        let count = counts.entry(entry.id.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(entry.id.as_str());
        }
        *count += 1;
    }

    first_seen
        .into_iter()
        .filter_map(|id| {
            let count = counts[id];
            (count > 1).then(|| {
                Finding::new(
                    FindingKind::DuplicateEntryId,
                    format!("Entry id {id} appears {count} times"),
                    vec![id.to_string()],
                )
            })
        })
        .collect()
}

fn check_phase(phase: &Phase, entries: &[Entry]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let owned = query::entries_for_phase(entries, &phase.id);

    for entry in &owned {
        if !phase.has_focus_area(&entry.domain) {
            findings.push(Finding::new(
                FindingKind::DomainNotInFocusAreas,
                format!(
                    "Entry {} has domain {:?} which is not in phase {} focus areas {:?}",
                    entry.id, entry.domain, phase.id, phase.focus_areas
                ),
                vec![entry.id.to_string(), phase.id.to_string()],
            ));
        }
    }

    if let Some(stored) = phase.total_modules {
        if stored as usize != owned.len() {
            findings.push(Finding::new(
                FindingKind::TotalModulesMismatch,
                format!(
                    "Phase {} ({}): totalModules={} but entries={}",
                    phase.id,
                    phase.title,
                    stored,
                    owned.len()
                ),
                vec![phase.id.to_string()],
            ));
        }
    }

    // `owned` is already sorted by order.
    let actual: Vec<u32> = owned.iter().map(|e| e.order).collect();
    let sequential = actual
        .iter()
        .enumerate()
        .all(|(i, order)| *order as usize == i + 1);
    if !sequential {
        let mut ids = vec![phase.id.to_string()];
        ids.extend(owned.iter().map(|e| e.id.to_string()));
        findings.push(Finding::new(
            FindingKind::NonSequentialOrder,
            format!(
                "Phase {}: entry orders {:?} are not 1..{}",
                phase.id,
                actual,
                actual.len()
            ),
            ids,
        ));
    }

    for area in &phase.focus_areas {
        if !owned.iter().any(|e| &e.domain == area) {
            findings.push(Finding::new(
                FindingKind::EmptyFocusArea,
                format!("Phase {}: focus area {:?} has 0 entries", phase.id, area),
                vec![phase.id.to_string()],
            ));
        }
    }

    findings
}

fn check_orphan_entries(known: &HashSet<&PhaseId>, entries: &[Entry]) -> Vec<Finding> {
    let mut orphans: Vec<&Entry> = entries.iter().filter(|e| !known.contains(&e.phase_id)).collect();
    query::sort_by_order(&mut orphans);
    orphans
        .into_iter()
        .map(|entry| {
            Finding::new(
                FindingKind::OrphanEntry,
                format!(
                    "Entry {} references missing phase {}",
                    entry.id, entry.phase_id
                ),
                vec![entry.id.to_string(), entry.phase_id.to_string()],
            )
        })
        .collect()
}
