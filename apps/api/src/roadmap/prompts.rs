// Prompt constants for roadmap generation.

/// System instruction sent with every roadmap request.
pub const ROADMAP_SYSTEM: &str = "You are PivotPath AI. You provide brutal but constructive \
    honesty regarding resume ATS compatibility, followed by an encouraging and strategic \
    career pivot roadmap.";

/// Prefix for inline resume text.
pub const RESUME_CONTEXT_PREFIX: &str = "Resume Context: ";

/// Sent in place of a resume when the user skipped the upload.
pub const NO_RESUME: &str = "No resume provided.";

/// Follows an attached resume file.
pub const ATTACHMENT_INSTRUCTION: &str = "Analyze the attached resume file to understand the \
    user's background, experience, and transferable skills.";

/// Roadmap instruction template.
/// Replace: {current_role}, {target_role}, {target_industry}, {skills}, {learning_style}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Act as an expert career coach and ATS (Applicant Tracking System) specialist.

User Profile:
- Current Role/Background: {current_role}
- Target Role: {target_role}
- Target Industry: {target_industry}
- Self-identified Skills: {skills}
- Learning Style: {learning_style}

Task 1: Create a detailed, step-by-step career pivot roadmap.
- Break it down into logical milestones.
- Suggest specific real-world resources.

Task 2: Perform a strict ATS Scan on the provided resume content against the Target Role ("{target_role}").
- Calculate a compatibility score (0-100).
- Identify CRITICAL missing keywords (hard skills, tools, methodologies) that an ATS would look for.
- Check for formatting red flags.
- Provide specific tips to pass the screen."#;
