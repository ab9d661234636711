//! Built-in demonstration data, shown without calling the model.

use crate::models::profile::{LearningStyle, Profile};
use crate::roadmap::models::{
    AtsAnalysis, MatchLevel, Milestone, Resource, ResourceType, RoadmapResult,
};

pub fn sample_profile() -> Profile {
    let mut profile = Profile::default();
    profile.set_resume_text("Sample Resume", None);
    profile.current_role = "Marketing Coordinator".to_string();
    profile.target_role = "UX Designer".to_string();
    profile.target_industry = "SaaS / Tech".to_string();
    profile.top_skills = strings(&[
        "Graphic Design",
        "Social Media Management",
        "Content Creation",
        "Empathy",
    ]);
    profile.learning_style = LearningStyle::Visual;
    profile
}

pub fn sample_roadmap() -> RoadmapResult {
    RoadmapResult {
        summary: "This roadmap bridges the gap between Marketing and UX Design by leveraging \
            your existing visual skills and user empathy, while building technical proficiency \
            in prototyping and formal user research methodologies."
            .to_string(),
        current_analysis: "Your background in Marketing provides a strong foundation in \
            understanding user personas, brand consistency, and storytelling, all critical soft \
            skills for UX."
            .to_string(),
        gap_analysis: strings(&[
            "User Research Methodologies",
            "Wireframing & Prototyping (Figma)",
            "Information Architecture",
            "Usability Testing",
        ]),
        estimated_total_time: "4-5 Months".to_string(),
        ats_analysis: AtsAnalysis {
            score: 42,
            match_level: MatchLevel::Low,
            missing_keywords: strings(&[
                "Figma",
                "User Flows",
                "Prototyping",
                "Usability Testing",
                "Wireframing",
                "HCI",
            ]),
            formatting_issues: strings(&[
                "Resume is creative but not ATS-friendly (graphics parsed incorrectly)",
                "Missing standard 'Skills' section header",
            ]),
            tips: strings(&[
                "Replace the skill bars/graphs with a standard text list.",
                "Add a 'Projects' section highlighting specific UX case studies, even if they are conceptual.",
                "Incorporate standard UX terminology (e.g., 'User-Centered Design') into your experience descriptions.",
            ]),
        },
        timeline: vec![
            Milestone {
                title: "Foundations of UX & Design Thinking".to_string(),
                duration: "Month 1".to_string(),
                description: "Master the core principles of User Experience design, focusing on \
                    the 'why' before the 'how'."
                    .to_string(),
                key_actions: strings(&[
                    "Complete Google UX Design Certificate Course 1 & 2",
                    "Read 'The Design of Everyday Things' by Don Norman",
                    "Practice analyzing apps you use daily for usability issues",
                ]),
                resources: vec![
                    resource("Google UX Design Certificate", ResourceType::Course, "Coursera"),
                    resource("The Design of Everyday Things", ResourceType::Book, "Don Norman"),
                ],
            },
            Milestone {
                title: "Technical Tooling (Figma)".to_string(),
                duration: "Month 2-3".to_string(),
                description: "Get hands-on with industry standard tools to translate concepts \
                    into visuals."
                    .to_string(),
                key_actions: strings(&[
                    "Recreate 3 popular app interfaces in Figma (Pixel perfect copy)",
                    "Learn auto-layout, components, and prototyping features",
                    "Participate in daily UI challenges",
                ]),
                resources: vec![
                    resource("Figma 101 Crash Course", ResourceType::Course, "YouTube"),
                    resource("Refactoring UI", ResourceType::Book, "Adam Wathan"),
                ],
            },
            Milestone {
                title: "Portfolio & Case Studies".to_string(),
                duration: "Month 4-5".to_string(),
                description: "Apply your skills to create 2-3 comprehensive case studies that \
                    solve real problems."
                    .to_string(),
                key_actions: strings(&[
                    "Conduct a personal project from research to high-fidelity prototype",
                    "Document your process: Problem, Research, Solution, Testing",
                    "Build a portfolio website using a simple builder",
                ]),
                resources: vec![
                    resource("Portfolio Inspiration", ResourceType::Article, "Bestfolios"),
                    resource("Webflow for Designers", ResourceType::Tool, "Webflow"),
                ],
            },
        ],
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn resource(title: &str, kind: ResourceType, provider: &str) -> Resource {
    Resource {
        title: title.to_string(),
        kind,
        provider: Some(provider.to_string()),
        url: Some("#".to_string()),
        duration: None,
    }
}
