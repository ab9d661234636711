//! Career profile collected by the intake wizard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resume content supplied by the user. At most one representation exists at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResumeInput {
    #[default]
    None,
    Text { text: String },
    Attachment {
        mime_type: String,
        /// Base64-encoded file bytes, passed through to the model untouched.
        data: String,
    },
}

impl ResumeInput {
    /// Builds a text resume. Empty text collapses to `None`.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            ResumeInput::None
        } else {
            ResumeInput::Text { text }
        }
    }

    pub fn attachment(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ResumeInput::Attachment {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ResumeInput::None)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStyle {
    Visual,
    #[serde(rename = "Hands-on")]
    HandsOn,
    Reading,
    #[default]
    Mixed,
}

impl LearningStyle {
    pub fn label(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::HandsOn => "Hands-on",
            LearningStyle::Reading => "Reading",
            LearningStyle::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The user's career background and preferences.
///
/// Fields are free text and are not validated here; whatever the user typed is
/// what the model sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    resume: ResumeInput,
    resume_file_name: Option<String>,
    pub current_role: String,
    pub target_role: String,
    pub target_industry: String,
    /// Insertion order is preserved; duplicates are allowed.
    pub top_skills: Vec<String>,
    pub learning_style: LearningStyle,
}

impl Profile {
    pub fn resume(&self) -> &ResumeInput {
        &self.resume
    }

    pub fn resume_file_name(&self) -> Option<&str> {
        self.resume_file_name.as_deref()
    }

    /// Resume text, or `""` when the resume is absent or an attachment.
    pub fn resume_text(&self) -> &str {
        match &self.resume {
            ResumeInput::Text { text } => text,
            _ => "",
        }
    }

    /// Replaces the resume with pasted or decoded text, dropping any attachment.
    pub fn set_resume_text(&mut self, text: impl Into<String>, file_name: Option<String>) {
        self.resume = ResumeInput::text(text);
        self.resume_file_name = if self.resume.is_none() {
            None
        } else {
            file_name
        };
    }

    /// Replaces the resume with a binary attachment, dropping any text.
    pub fn set_resume_attachment(
        &mut self,
        mime_type: impl Into<String>,
        data: impl Into<String>,
        file_name: Option<String>,
    ) {
        self.resume = ResumeInput::attachment(mime_type, data);
        self.resume_file_name = file_name;
    }

    pub fn set_resume(&mut self, resume: ResumeInput, file_name: Option<String>) {
        match resume {
            ResumeInput::Text { text } => self.set_resume_text(text, file_name),
            ResumeInput::Attachment { mime_type, data } => {
                self.set_resume_attachment(mime_type, data, file_name)
            }
            ResumeInput::None => self.clear_resume(),
        }
    }

    pub fn clear_resume(&mut self) {
        self.resume = ResumeInput::None;
        self.resume_file_name = None;
    }

    /// Appends a trimmed skill. Blank input is ignored.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() {
            return false;
        }
        self.top_skills.push(skill.to_string());
        true
    }

    /// Removes every entry equal to `skill`.
    pub fn remove_skill(&mut self, skill: &str) {
        self.top_skills.retain(|s| s != skill);
    }
}

/// An attached resume as clients see it. The file data is never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSummary {
    pub mime_type: String,
    /// Length of the base64 payload held for the model.
    pub encoded_bytes: usize,
}

/// Wire form of a `Profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub resume_text: String,
    pub resume_attachment: Option<AttachmentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_file_name: Option<String>,
    pub current_role: String,
    pub target_role: String,
    pub target_industry: String,
    pub top_skills: Vec<String>,
    pub learning_style: LearningStyle,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        let resume_attachment = match profile.resume() {
            ResumeInput::Attachment { mime_type, data } => Some(AttachmentSummary {
                mime_type: mime_type.clone(),
                encoded_bytes: data.len(),
            }),
            _ => None,
        };
        Self {
            resume_text: profile.resume_text().to_string(),
            resume_attachment,
            resume_file_name: profile.resume_file_name().map(str::to_string),
            current_role: profile.current_role.clone(),
            target_role: profile.target_role.clone(),
            target_industry: profile.target_industry.clone(),
            top_skills: profile.top_skills.clone(),
            learning_style: profile.learning_style,
        }
    }
}
