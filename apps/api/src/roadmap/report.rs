//! Dashboard digest and Markdown export of a generated roadmap.

use std::fmt::Write as _;

use serde::Serialize;

use crate::models::profile::Profile;
use crate::roadmap::models::RoadmapResult;

const DIGEST_KEYWORDS: usize = 5;
const DIGEST_TIPS: usize = 3;

/// Traffic-light band for the ATS score gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Weak,
    Fair,
    Strong,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::Strong,
            50..=79 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }
}

/// What the results dashboard shows above the fold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDigest {
    pub target_role: String,
    pub target_industry: String,
    pub summary: String,
    pub estimated_total_time: String,
    pub ats_score: u8,
    pub score_band: ScoreBand,
    pub top_missing_keywords: Vec<String>,
    /// Missing keywords not listed in `top_missing_keywords`.
    pub more_missing_keywords: usize,
    pub top_tips: Vec<String>,
    pub gap_analysis: Vec<String>,
    pub milestone_count: usize,
}

pub fn dashboard_digest(profile: &Profile, roadmap: &RoadmapResult) -> DashboardDigest {
    let ats = &roadmap.ats_analysis;
    DashboardDigest {
        target_role: profile.target_role.clone(),
        target_industry: profile.target_industry.clone(),
        summary: roadmap.summary.clone(),
        estimated_total_time: roadmap.estimated_total_time.clone(),
        ats_score: ats.score,
        score_band: ScoreBand::from_score(ats.score),
        top_missing_keywords: ats.missing_keywords.iter().take(DIGEST_KEYWORDS).cloned().collect(),
        more_missing_keywords: ats.missing_keywords.len().saturating_sub(DIGEST_KEYWORDS),
        top_tips: ats.tips.iter().take(DIGEST_TIPS).cloned().collect(),
        gap_analysis: roadmap.gap_analysis.clone(),
        milestone_count: roadmap.timeline.len(),
    }
}

/// Renders the full roadmap as a standalone Markdown document.
pub fn render_markdown(profile: &Profile, roadmap: &RoadmapResult) -> String {
    let mut out = String::new();
    let ats = &roadmap.ats_analysis;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# Career Roadmap: {}", profile.target_role);
    if !profile.target_industry.is_empty() {
        let _ = writeln!(out, "\n_{}_", profile.target_industry);
    }
    let _ = writeln!(out, "\n{}", roadmap.summary);
    let _ = writeln!(out, "\n**Estimated time:** {}", roadmap.estimated_total_time);

    let _ = writeln!(out, "\n## Where You Are\n\n{}", roadmap.current_analysis);

    let _ = writeln!(out, "\n## ATS Scan\n");
    let _ = writeln!(
        out,
        "**Score:** {}/100 ({:?} match)",
        ats.score, ats.match_level
    );
    write_list(&mut out, "Missing keywords", &ats.missing_keywords);
    write_list(&mut out, "Formatting issues", &ats.formatting_issues);
    write_list(&mut out, "Tips", &ats.tips);

    write_list(&mut out, "## Gaps to Bridge", &roadmap.gap_analysis);

    let _ = writeln!(out, "\n## Roadmap");
    for (i, milestone) in roadmap.timeline.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n### {}. {} ({})\n\n{}",
            i + 1,
            milestone.title,
            milestone.duration,
            milestone.description
        );
        write_list(&mut out, "Key actions", &milestone.key_actions);
        if !milestone.resources.is_empty() {
            let _ = writeln!(out, "\nResources:\n");
            for resource in &milestone.resources {
                let _ = write!(out, "- [{}] {}", resource.kind.label(), resource.title);
                if let Some(provider) = &resource.provider {
                    let _ = write!(out, " ({provider})");
                }
                if let Some(duration) = &resource.duration {
                    let _ = write!(out, ", {duration}");
                }
                match resource.url.as_deref() {
                    Some(url) if url != "#" => {
                        let _ = writeln!(out, " <{url}>");
                    }
                    _ => out.push('\n'),
                }
            }
        }
    }

    out
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    if heading.starts_with('#') {
        let _ = writeln!(out, "\n{heading}\n");
    } else {
        let _ = writeln!(out, "\n{heading}:\n");
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::sample::{sample_profile, sample_roadmap};

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Strong);
    }

    #[test]
    fn test_digest_caps_keywords_and_tips() {
        let digest = dashboard_digest(&sample_profile(), &sample_roadmap());
        assert_eq!(digest.target_role, "UX Designer");
        assert_eq!(digest.ats_score, 42);
        assert_eq!(digest.score_band, ScoreBand::Weak);
        assert_eq!(digest.top_missing_keywords.len(), 5);
        assert_eq!(digest.more_missing_keywords, 1);
        assert_eq!(digest.top_tips.len(), 3);
        assert_eq!(digest.milestone_count, 3);
    }

    #[test]
    fn test_markdown_contains_every_milestone_in_order() {
        let markdown = render_markdown(&sample_profile(), &sample_roadmap());
        assert!(markdown.starts_with("# Career Roadmap: UX Designer\n"));
        assert!(markdown.contains("**Score:** 42/100 (Low match)"));

        let first = markdown.find("### 1. Foundations of UX & Design Thinking (Month 1)").unwrap();
        let second = markdown.find("### 2. Technical Tooling (Figma) (Month 2-3)").unwrap();
        let third = markdown.find("### 3. Portfolio & Case Studies (Month 4-5)").unwrap();
        assert!(first < second && second < third);

        assert!(markdown.contains("- [Book] Refactoring UI (Adam Wathan)\n"));
        assert!(!markdown.contains("<#>"));
    }
}
