//! Typed shape of a generated roadmap. Mirrors `schema::roadmap_schema()` field for field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Course,
    Book,
    Article,
    Tool,
}

impl ResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Course => "Course",
            ResourceType::Book => "Book",
            ResourceType::Article => "Article",
            ResourceType::Tool => "Tool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// One phase of the pivot plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub title: String,
    pub duration: String,
    pub description: String,
    pub key_actions: Vec<String>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsAnalysis {
    /// 0 – 100, bounds enforced by schema validation before deserialization.
    pub score: u8,
    pub match_level: MatchLevel,
    pub missing_keywords: Vec<String>,
    pub formatting_issues: Vec<String>,
    pub tips: Vec<String>,
}

/// Career roadmap plus ATS scan, exactly as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResult {
    pub summary: String,
    pub current_analysis: String,
    pub gap_analysis: Vec<String>,
    pub timeline: Vec<Milestone>,
    pub estimated_total_time: String,
    pub ats_analysis: AtsAnalysis,
}
