//! Entry: a single learning artifact inside a phase.

use serde::{Deserialize, Serialize};

use super::ids::{EntryId, PhaseId};
use super::kinds::{EntryType, Status};
use super::phase::Phase;
use crate::validation::{self, limits, Result, ValidationError};

/// A stored entry record.
///
/// `order` is expected to form the sequence `1..N` within a phase. Reads
/// only sort by it; gaps and duplicates are reported by the audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub phase_id: PhaseId,
    /// Focus area of the owning phase this entry belongs to.
    pub domain: String,
    pub title: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub status: Status,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
}

/// Entry fields as submitted by the admin form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryDraft {
    pub domain: String,
    pub title: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub status: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub order: u32,
    pub is_public: bool,
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub credential_link: Option<String>,
    pub certificate_image: Option<String>,
    pub github_link: Option<String>,
}

/// Partial update for an entry. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
}

impl Entry {
    /// Build a validated entry under `phase`.
    ///
    /// The entry's domain must be one of the phase's focus areas.
    pub fn new(id: EntryId, phase: &Phase, draft: EntryDraft) -> Result<Self> {
        let entry = Self {
            id,
            phase_id: phase.id.clone(),
            domain: draft.domain.trim().to_string(),
            title: draft.title.trim().to_string(),
            entry_type: EntryType::try_from(draft.entry_type.as_str())?,
            status: Status::try_from(draft.status.as_str())?,
            description: draft.description,
            tech_stack: draft
                .tech_stack
                .into_iter()
                .map(|label| label.trim().to_string())
                .collect(),
            order: draft.order,
            is_public: draft.is_public,
            issuer: non_blank(draft.issuer),
            issue_date: non_blank(draft.issue_date),
            credential_link: non_blank(draft.credential_link),
            certificate_image: non_blank(draft.certificate_image),
            github_link: non_blank(draft.github_link),
        };
        entry.validate()?;
        entry.check_owner(phase)?;
        Ok(entry)
    }

    /// Field rules that hold regardless of the owning phase.
    pub fn validate(&self) -> Result<()> {
        validation::validate_required("id", self.id.as_str())?;
        validation::validate_required("phaseId", self.phase_id.as_str())?;
        validation::validate_required("domain", &self.domain)?;
        validation::validate_title("title", &self.title)?;
        validation::validate_description(&self.description)?;
        validation::validate_labels("techStack", &self.tech_stack, limits::MAX_TECH_STACK)?;
        validation::validate_entry_order(self.order)?;
        validation::validate_url("credentialLink", self.credential_link.as_deref())?;
        validation::validate_url("certificateImage", self.certificate_image.as_deref())?;
        validation::validate_url("githubLink", self.github_link.as_deref())?;
        if self.entry_type == EntryType::Certification && self.issuer.is_none() {
            return Err(ValidationError::IssuerRequired);
        }
        Ok(())
    }

    /// Check the entry against the phase it claims to belong to.
    pub fn check_owner(&self, phase: &Phase) -> Result<()> {
        if !phase.has_focus_area(&self.domain) {
            return Err(ValidationError::UnknownFocusArea {
                domain: self.domain.clone(),
                allowed: phase.focus_areas.clone(),
            });
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Return the record with `patch` applied.
    ///
    /// Only phase-independent rules are checked here; callers that change
    /// `domain` re-check with [`Entry::check_owner`].
    pub fn apply(&self, patch: &EntryPatch) -> Result<Self> {
        let mut next = self.clone();
        if let Some(domain) = &patch.domain {
            next.domain = domain.trim().to_string();
        }
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(entry_type) = patch.entry_type {
            next.entry_type = entry_type;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(tech_stack) = &patch.tech_stack {
            next.tech_stack = tech_stack.iter().map(|l| l.trim().to_string()).collect();
        }
        if let Some(order) = patch.order {
            next.order = order;
        }
        if let Some(is_public) = patch.is_public {
            next.is_public = is_public;
        }
        if let Some(issuer) = &patch.issuer {
            next.issuer = non_blank(Some(issuer.clone()));
        }
        if let Some(issue_date) = &patch.issue_date {
            next.issue_date = non_blank(Some(issue_date.clone()));
        }
        if let Some(link) = &patch.credential_link {
            next.credential_link = non_blank(Some(link.clone()));
        }
        if let Some(image) = &patch.certificate_image {
            next.certificate_image = non_blank(Some(image.clone()));
        }
        if let Some(link) = &patch.github_link {
            next.github_link = non_blank(Some(link.clone()));
        }
        next.validate()?;
        Ok(next)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
