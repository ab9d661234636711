//! Prompt Builder: turns a `Profile` into the ordered content parts of a roadmap request.
//!
//! Pure and deterministic: the same profile always yields the same parts.

use crate::llm_client::ContentPart;
use crate::models::profile::{Profile, ResumeInput};
use crate::roadmap::prompts::{
    ATTACHMENT_INSTRUCTION, NO_RESUME, RESUME_CONTEXT_PREFIX, ROADMAP_PROMPT_TEMPLATE,
};

/// Resume text beyond this many characters is dropped without notice.
pub const MAX_RESUME_CHARS: usize = 10_000;

/// Builds the request parts: resume context first, roadmap instruction last.
pub fn build_prompt(profile: &Profile) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(3);

    match profile.resume() {
        ResumeInput::Attachment { mime_type, data } => {
            parts.push(ContentPart::InlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            });
            parts.push(ContentPart::Text(ATTACHMENT_INSTRUCTION.to_string()));
        }
        ResumeInput::Text { text } if !text.is_empty() => {
            parts.push(ContentPart::Text(format!(
                "{RESUME_CONTEXT_PREFIX}{}",
                truncate_chars(text, MAX_RESUME_CHARS)
            )));
        }
        _ => parts.push(ContentPart::Text(NO_RESUME.to_string())),
    }

    parts.push(ContentPart::Text(build_instruction(profile)));
    parts
}

/// Fills the roadmap instruction template from the profile.
pub fn build_instruction(profile: &Profile) -> String {
    ROADMAP_PROMPT_TEMPLATE
        .replace("{current_role}", &profile.current_role)
        .replace("{target_role}", &profile.target_role)
        .replace("{target_industry}", &profile.target_industry)
        .replace("{skills}", &profile.top_skills.join(", "))
        .replace("{learning_style}", profile.learning_style.label())
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
