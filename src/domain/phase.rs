//! Phase: an ordered stage within a journey.

use serde::{Deserialize, Serialize};

use super::ids::{JourneyId, PhaseId};
use super::kinds::Status;
use crate::validation::{self, limits, Result};

/// A stored phase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: PhaseId,
    pub journey_id: JourneyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    /// Topic labels scoping the phase's entries, in display order.
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub order: i64,
    /// Cached entry count written by admin tooling.
    ///
    /// Advisory only: live counts always come from the entries and a
    /// mismatch is reported by the audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_modules: Option<u32>,
}

/// Phase fields as submitted by the admin form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseDraft {
    pub title: String,
    pub description: String,
    pub status: String,
    pub focus_areas: Vec<String>,
    pub order: i64,
}

/// Partial update for a phase. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_modules: Option<u32>,
}

impl Phase {
    /// Build a validated phase owned by `journey_id`.
    pub fn new(id: PhaseId, journey_id: JourneyId, draft: PhaseDraft) -> Result<Self> {
        let phase = Self {
            id,
            journey_id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            status: Status::try_from(draft.status.as_str())?,
            focus_areas: draft
                .focus_areas
                .into_iter()
                .map(|label| label.trim().to_string())
                .collect(),
            order: draft.order,
            total_modules: None,
        };
        phase.validate()?;
        Ok(phase)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_required("id", self.id.as_str())?;
        validation::validate_required("journeyId", self.journey_id.as_str())?;
        validation::validate_title("title", &self.title)?;
        validation::validate_description(&self.description)?;
        validation::validate_labels("focusAreas", &self.focus_areas, limits::MAX_FOCUS_AREAS)
    }

    /// Whether `label` is one of this phase's focus areas.
    pub fn has_focus_area(&self, label: &str) -> bool {
        self.focus_areas.iter().any(|area| area == label)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Return the record with `patch` applied, validated as a whole.
    pub fn apply(&self, patch: &PhasePatch) -> Result<Self> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(focus_areas) = &patch.focus_areas {
            next.focus_areas = focus_areas.iter().map(|l| l.trim().to_string()).collect();
        }
        if let Some(order) = patch.order {
            next.order = order;
        }
        if let Some(total) = patch.total_modules {
            next.total_modules = Some(total);
        }
        next.validate()?;
        Ok(next)
    }
}
