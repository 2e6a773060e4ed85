//! Work model, category/status enums, and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::media::{MediaAsset, MediaAssetMeta};

/// Fixed set of community work categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkCategory {
    #[serde(rename = "Cultural Events")]
    CulturalEvents,
    #[serde(rename = "Community Service")]
    CommunityService,
    #[serde(rename = "Educational Programs")]
    EducationalPrograms,
    #[serde(rename = "Heritage Preservation")]
    HeritagePreservation,
    #[serde(rename = "Festival Organization")]
    FestivalOrganization,
    #[serde(rename = "Youth Programs")]
    YouthPrograms,
    #[serde(rename = "Social Initiatives")]
    SocialInitiatives,
    #[serde(rename = "Documentation")]
    Documentation,
    #[serde(rename = "Other")]
    Other,
}

impl WorkCategory {
    pub const ALL: [WorkCategory; 9] = [
        WorkCategory::CulturalEvents,
        WorkCategory::CommunityService,
        WorkCategory::EducationalPrograms,
        WorkCategory::HeritagePreservation,
        WorkCategory::FestivalOrganization,
        WorkCategory::YouthPrograms,
        WorkCategory::SocialInitiatives,
        WorkCategory::Documentation,
        WorkCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkCategory::CulturalEvents => "Cultural Events",
            WorkCategory::CommunityService => "Community Service",
            WorkCategory::EducationalPrograms => "Educational Programs",
            WorkCategory::HeritagePreservation => "Heritage Preservation",
            WorkCategory::FestivalOrganization => "Festival Organization",
            WorkCategory::YouthPrograms => "Youth Programs",
            WorkCategory::SocialInitiatives => "Social Initiatives",
            WorkCategory::Documentation => "Documentation",
            WorkCategory::Other => "Other",
        }
    }
}

impl FromStr for WorkCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| "Invalid category selected".to_string())
    }
}

impl fmt::Display for WorkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion status of a work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    #[default]
    Completed,
    Ongoing,
    Planned,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Completed => "completed",
            WorkStatus::Ongoing => "ongoing",
            WorkStatus::Planned => "planned",
        }
    }
}

impl FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(WorkStatus::Completed),
            "ongoing" => Ok(WorkStatus::Ongoing),
            "planned" => Ok(WorkStatus::Planned),
            _ => Err("Status must be completed, ongoing, or planned".to_string()),
        }
    }
}

/// Work entity with full media payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: WorkCategory,
    pub status: WorkStatus,
    pub completed_date: DateTime<Utc>,
    pub media: Vec<MediaAsset>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Work with media payload bytes omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: WorkCategory,
    pub status: WorkStatus,
    pub completed_date: DateTime<Utc>,
    pub media: Vec<MediaAssetMeta>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Work> for WorkSummary {
    fn from(work: Work) -> Self {
        Self {
            id: work.id,
            title: work.title,
            description: work.description,
            category: work.category,
            status: work.status,
            completed_date: work.completed_date,
            media: work.media.into_iter().map(MediaAssetMeta::from).collect(),
            created_at: work.created_at,
            updated_at: work.updated_at,
        }
    }
}

/// Validated work fields, ready for persistence
#[derive(Debug, Clone)]
pub struct NewWork {
    pub title: String,
    pub description: String,
    pub category: WorkCategory,
    pub status: WorkStatus,
    pub completed_date: DateTime<Utc>,
    pub media: Vec<MediaAsset>,
}

/// Incoming create/update body for a work
///
/// Category and status arrive as raw strings and are parsed during
/// validation so that bad values produce a 400 with the field-level message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub completed_date: Option<DateTime<Utc>>,
    pub media: Option<Vec<MediaAsset>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_its_display_string() {
        for category in WorkCategory::ALL {
            assert_eq!(category.as_str().parse::<WorkCategory>(), Ok(category));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("Basket Weaving".parse::<WorkCategory>().is_err());
    }

    #[test]
    fn status_defaults_to_completed() {
        assert_eq!(WorkStatus::default(), WorkStatus::Completed);
    }

    #[test]
    fn category_serializes_to_the_wire_string() {
        let json = serde_json::to_string(&WorkCategory::HeritagePreservation).unwrap();
        assert_eq!(json, "\"Heritage Preservation\"");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&WorkStatus::Ongoing).unwrap();
        assert_eq!(json, "\"ongoing\"");
    }
}
