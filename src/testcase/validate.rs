//! Field validation for a draft before it is submitted.

use super::draft::TestCaseDraft;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Length as the browser form measures it: UTF-16 code units.
fn form_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Per-field messages, keyed the way the form shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("Please fix the errors in the form ({} fields)", self.count())]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keyed by step id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub steps: BTreeMap<u32, StepErrors>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
}

impl StepErrors {
    fn is_empty(&self) -> bool {
        self.description.is_none() && self.expected_result.is_none()
    }
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.steps.is_empty()
    }

    /// Total number of failing fields.
    pub fn count(&self) -> usize {
        let steps: usize = self
            .steps
            .values()
            .map(|s| {
                usize::from(s.description.is_some()) + usize::from(s.expected_result.is_some())
            })
            .sum();
        usize::from(self.title.is_some()) + usize::from(self.description.is_some()) + steps
    }
}

impl TestCaseDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some("Title is required".to_string());
        } else if form_length(&self.title) > MAX_TITLE_CHARS {
            errors.title = Some(format!(
                "Title must be {} characters or less",
                MAX_TITLE_CHARS
            ));
        }

        if form_length(&self.description) > MAX_DESCRIPTION_CHARS {
            errors.description = Some(format!(
                "Description must be {} characters or less",
                MAX_DESCRIPTION_CHARS
            ));
        }

        for step in self.steps() {
            let mut step_errors = StepErrors::default();
            if step.description.trim().is_empty() {
                step_errors.description = Some("Step description is required".to_string());
            }
            if step.expected_result.trim().is_empty() {
                step_errors.expected_result = Some("Expected result is required".to_string());
            }
            if !step_errors.is_empty() {
                errors.steps.insert(step.id, step_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
