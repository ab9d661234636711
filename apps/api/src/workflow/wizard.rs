//! Wizard Step Sequencer: five fixed data-entry steps over a draft `Profile`.
//!
//! Progresses linearly: Resume → CurrentRole → PivotGoal → Skills → Style.
//! Each input may only touch the fields owned by the current step.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::{LearningStyle, Profile, ResumeInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Resume,
    CurrentRole,
    PivotGoal,
    Skills,
    Style,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Resume,
        WizardStep::CurrentRole,
        WizardStep::PivotGoal,
        WizardStep::Skills,
        WizardStep::Style,
    ];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Resume => 0,
            WizardStep::CurrentRole => 1,
            WizardStep::PivotGoal => 2,
            WizardStep::Skills => 3,
            WizardStep::Style => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Resume => "Resume",
            WizardStep::CurrentRole => "Current Role",
            WizardStep::PivotGoal => "Pivot Goal",
            WizardStep::Skills => "Skills",
            WizardStep::Style => "Style",
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User input while the wizard is on screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardInput {
    Next,
    Back,
    #[serde(rename_all = "camelCase")]
    SetResumeText {
        text: String,
        #[serde(default)]
        file_name: Option<String>,
    },
    /// Produced by the upload endpoint; not accepted as JSON.
    #[serde(skip)]
    SetResume {
        resume: ResumeInput,
        file_name: Option<String>,
    },
    ClearResume,
    #[serde(rename_all = "camelCase")]
    SetCurrentRole { current_role: String },
    #[serde(rename_all = "camelCase")]
    SetPivotGoal {
        target_role: String,
        target_industry: String,
    },
    AddSkill { skill: String },
    RemoveSkill { skill: String },
    #[serde(rename_all = "camelCase")]
    SetLearningStyle { learning_style: LearningStyle },
}

impl WizardInput {
    pub fn name(&self) -> &'static str {
        match self {
            WizardInput::Next => "next",
            WizardInput::Back => "back",
            WizardInput::SetResumeText { .. } => "set_resume_text",
            WizardInput::SetResume { .. } => "upload_resume",
            WizardInput::ClearResume => "clear_resume",
            WizardInput::SetCurrentRole { .. } => "set_current_role",
            WizardInput::SetPivotGoal { .. } => "set_pivot_goal",
            WizardInput::AddSkill { .. } => "add_skill",
            WizardInput::RemoveSkill { .. } => "remove_skill",
            WizardInput::SetLearningStyle { .. } => "set_learning_style",
        }
    }

    /// The step an editing input belongs to; `None` for navigation.
    fn owning_step(&self) -> Option<WizardStep> {
        match self {
            WizardInput::Next | WizardInput::Back => None,
            WizardInput::SetResumeText { .. }
            | WizardInput::SetResume { .. }
            | WizardInput::ClearResume => Some(WizardStep::Resume),
            WizardInput::SetCurrentRole { .. } => Some(WizardStep::CurrentRole),
            WizardInput::SetPivotGoal { .. } => Some(WizardStep::PivotGoal),
            WizardInput::AddSkill { .. } | WizardInput::RemoveSkill { .. } => {
                Some(WizardStep::Skills)
            }
            WizardInput::SetLearningStyle { .. } => Some(WizardStep::Style),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("'{input}' belongs to the {expected} step, but the wizard is on {current}")]
    WrongStep {
        input: &'static str,
        expected: WizardStep,
        current: WizardStep,
    },
}

/// Result of feeding one input to the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    /// Still in the wizard, possibly on another step.
    Stay(Wizard),
    /// `next` on the last step.
    Completed(Profile),
    /// `back` on the first step of a fresh profile.
    Cancelled,
    /// `back` on the first step while editing an existing profile.
    Exited,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: WizardStep,
    draft: Profile,
    editing_existing: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Fresh wizard over an empty profile.
    pub fn new() -> Self {
        Self {
            step: WizardStep::Resume,
            draft: Profile::default(),
            editing_existing: false,
        }
    }

    /// Wizard pre-filled with a profile the user already submitted.
    pub fn editing(profile: Profile) -> Self {
        Self {
            step: WizardStep::Resume,
            draft: profile,
            editing_existing: true,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &Profile {
        &self.draft
    }

    pub fn is_editing_existing(&self) -> bool {
        self.editing_existing
    }

    /// Applies one input without mutating `self`.
    pub fn apply(&self, input: WizardInput) -> Result<WizardOutcome, WizardError> {
        if let Some(expected) = input.owning_step() {
            if expected != self.step {
                return Err(WizardError::WrongStep {
                    input: input.name(),
                    expected,
                    current: self.step,
                });
            }
        }

        let outcome = match input {
            WizardInput::Next => match self.step.next() {
                Some(step) => WizardOutcome::Stay(self.at(step)),
                None => WizardOutcome::Completed(self.draft.clone()),
            },
            WizardInput::Back => match self.step.prev() {
                Some(step) => WizardOutcome::Stay(self.at(step)),
                None if self.editing_existing => WizardOutcome::Exited,
                None => WizardOutcome::Cancelled,
            },
            edit => {
                let mut next = self.clone();
                next.edit(edit);
                WizardOutcome::Stay(next)
            }
        };
        Ok(outcome)
    }

    fn at(&self, step: WizardStep) -> Self {
        Self {
            step,
            ..self.clone()
        }
    }

    fn edit(&mut self, input: WizardInput) {
        let draft = &mut self.draft;
        match input {
            WizardInput::SetResumeText { text, file_name } => draft.set_resume_text(text, file_name),
            WizardInput::SetResume { resume, file_name } => draft.set_resume(resume, file_name),
            WizardInput::ClearResume => draft.clear_resume(),
            WizardInput::SetCurrentRole { current_role } => draft.current_role = current_role,
            WizardInput::SetPivotGoal {
                target_role,
                target_industry,
            } => {
                draft.target_role = target_role;
                draft.target_industry = target_industry;
            }
            WizardInput::AddSkill { skill } => {
                draft.add_skill(&skill);
            }
            WizardInput::RemoveSkill { skill } => draft.remove_skill(&skill),
            WizardInput::SetLearningStyle { learning_style } => {
                draft.learning_style = learning_style
            }
            WizardInput::Next | WizardInput::Back => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stay(outcome: WizardOutcome) -> Wizard {
        match outcome {
            WizardOutcome::Stay(wizard) => wizard,
            other => panic!("expected to stay in wizard, got {other:?}"),
        }
    }

    fn advance(wizard: &Wizard) -> Wizard {
        stay(wizard.apply(WizardInput::Next).unwrap())
    }

    #[test]
    fn test_step_order_and_labels() {
        let labels: Vec<_> = WizardStep::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec!["Resume", "Current Role", "Pivot Goal", "Skills", "Style"]
        );
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
        assert_eq!(WizardStep::Resume.prev(), None);
        assert_eq!(WizardStep::Style.next(), None);
        assert!(WizardStep::Style.is_last());
    }

    #[test]
    fn test_full_walk_completes_with_accumulated_profile() {
        let mut wizard = Wizard::new();
        wizard = stay(
            wizard
                .apply(WizardInput::SetResumeText {
                    text: "Five years in retail".into(),
                    file_name: None,
                })
                .unwrap(),
        );
        wizard = advance(&wizard);
        wizard = stay(
            wizard
                .apply(WizardInput::SetCurrentRole {
                    current_role: "Store Manager".into(),
                })
                .unwrap(),
        );
        wizard = advance(&wizard);
        wizard = stay(
            wizard
                .apply(WizardInput::SetPivotGoal {
                    target_role: "Product Manager".into(),
                    target_industry: "E-commerce".into(),
                })
                .unwrap(),
        );
        wizard = advance(&wizard);
        wizard = stay(
            wizard
                .apply(WizardInput::AddSkill {
                    skill: "Forecasting".into(),
                })
                .unwrap(),
        );
        wizard = advance(&wizard);
        wizard = stay(
            wizard
                .apply(WizardInput::SetLearningStyle {
                    learning_style: LearningStyle::HandsOn,
                })
                .unwrap(),
        );
        assert_eq!(wizard.step(), WizardStep::Style);

        match wizard.apply(WizardInput::Next).unwrap() {
            WizardOutcome::Completed(profile) => {
                assert_eq!(profile.resume_text(), "Five years in retail");
                assert_eq!(profile.current_role, "Store Manager");
                assert_eq!(profile.target_role, "Product Manager");
                assert_eq!(profile.target_industry, "E-commerce");
                assert_eq!(profile.top_skills, vec!["Forecasting"]);
                assert_eq!(profile.learning_style, LearningStyle::HandsOn);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_back_decrements_step() {
        let wizard = advance(&advance(&Wizard::new()));
        assert_eq!(wizard.step(), WizardStep::PivotGoal);
        let wizard = stay(wizard.apply(WizardInput::Back).unwrap());
        assert_eq!(wizard.step(), WizardStep::CurrentRole);
    }

    #[test]
    fn test_back_on_first_step_cancels_fresh_wizard() {
        assert_eq!(
            Wizard::new().apply(WizardInput::Back).unwrap(),
            WizardOutcome::Cancelled
        );
    }

    #[test]
    fn test_back_on_first_step_exits_when_editing() {
        let wizard = Wizard::editing(Profile::default());
        assert_eq!(
            wizard.apply(WizardInput::Back).unwrap(),
            WizardOutcome::Exited
        );
    }

    #[test]
    fn test_edit_outside_its_step_is_rejected() {
        let wizard = Wizard::new();
        let err = wizard
            .apply(WizardInput::AddSkill {
                skill: "Rust".into(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::WrongStep {
                input: "add_skill",
                expected: WizardStep::Skills,
                current: WizardStep::Resume,
            }
        );
        assert!(wizard.draft().top_skills.is_empty());
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let wizard = Wizard::new();
        let _ = wizard
            .apply(WizardInput::SetResumeText {
                text: "Resume".into(),
                file_name: None,
            })
            .unwrap();
        assert_eq!(wizard.draft().resume_text(), "");
    }

    #[test]
    fn test_editing_prefills_draft() {
        let mut profile = Profile::default();
        profile.target_role = "Data Analyst".into();
        let wizard = Wizard::editing(profile.clone());
        assert_eq!(wizard.draft(), &profile);
        assert!(wizard.is_editing_existing());
        assert_eq!(wizard.step(), WizardStep::Resume);
    }

    #[test]
    fn test_input_deserializes_from_tagged_json() {
        let input: WizardInput = serde_json::from_str(
            r#"{"action": "set_pivot_goal", "targetRole": "UX Designer", "targetIndustry": "SaaS"}"#,
        )
        .unwrap();
        assert_eq!(
            input,
            WizardInput::SetPivotGoal {
                target_role: "UX Designer".into(),
                target_industry: "SaaS".into(),
            }
        );

        let input: WizardInput =
            serde_json::from_str(r#"{"action": "set_learning_style", "learningStyle": "Reading"}"#)
                .unwrap();
        assert_eq!(
            input,
            WizardInput::SetLearningStyle {
                learning_style: LearningStyle::Reading
            }
        );
    }
}
