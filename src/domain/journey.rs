//! Journey: a top-level learning track.

use serde::{Deserialize, Serialize};

use super::ids::JourneyId;
use super::kinds::{Color, Icon};
use crate::validation::{self, Result};

/// A stored journey record.
///
/// Progress figures are never stored on the journey; see
/// [`crate::progress::compute_journey_progress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: JourneyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub icon: Icon,
    pub color: Color,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub order: i64,
}

/// Journey fields as submitted by the admin form.
///
/// Enumerations arrive as raw tags and are parsed by [`Journey::new`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JourneyDraft {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub is_public: bool,
    pub order: i64,
}

/// Partial update for a journey. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Journey {
    /// Build a validated journey from a draft.
    pub fn new(id: JourneyId, draft: JourneyDraft) -> Result<Self> {
        let journey = Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            icon: Icon::try_from(draft.icon.as_str())?,
            color: Color::try_from(draft.color.as_str())?,
            is_public: draft.is_public,
            order: draft.order,
        };
        journey.validate()?;
        Ok(journey)
    }

    /// Check the field rules on an already-typed record.
    pub fn validate(&self) -> Result<()> {
        validation::validate_required("id", self.id.as_str())?;
        validation::validate_title("title", &self.title)?;
        validation::validate_description(&self.description)
    }

    /// Return the record with `patch` applied, validated as a whole.
    pub fn apply(&self, patch: &JourneyPatch) -> Result<Self> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(icon) = patch.icon {
            next.icon = icon;
        }
        if let Some(color) = patch.color {
            next.color = color;
        }
        if let Some(is_public) = patch.is_public {
            next.is_public = is_public;
        }
        if let Some(order) = patch.order {
            next.order = order;
        }
        next.validate()?;
        Ok(next)
    }
}
