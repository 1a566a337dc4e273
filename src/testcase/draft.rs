//! The test case being authored: metadata, tags and an ordered list of steps.

use super::capture_failure_message;
use crate::capture::{CaptureResult, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: u32,
    pub description: String,
    pub expected_result: String,
    /// PNG data URI from a capture, if one is attached.
    pub screenshot: Option<String>,
}

impl Step {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            description: String::new(),
            expected_result: String::new(),
            screenshot: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDraft")]
pub struct TestCaseDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub prerequisites: String,
    tags: Vec<String>,
    steps: Vec<Step>,
}

/// Wire shape of a draft before its invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDraft {
    title: String,
    description: String,
    priority: Priority,
    prerequisites: String,
    tags: Vec<String>,
    steps: Vec<Step>,
}

impl TryFrom<RawDraft> for TestCaseDraft {
    type Error = DraftError;

    /// Rebuilds the draft through the same checks the editing methods apply.
    fn try_from(raw: RawDraft) -> Result<Self, Self::Error> {
        if raw.steps.is_empty() {
            return Err(DraftError::NoSteps);
        }

        let mut seen = HashSet::new();
        for step in &raw.steps {
            if step.id == u32::MAX {
                return Err(DraftError::StepIdsExhausted);
            }
            if !seen.insert(step.id) {
                return Err(DraftError::DuplicateStepId(step.id));
            }
        }

        let mut draft = Self {
            title: raw.title,
            description: raw.description,
            priority: raw.priority,
            prerequisites: raw.prerequisites,
            tags: Vec::new(),
            steps: raw.steps,
        };
        for tag in &raw.tags {
            draft.add_tag(tag)?;
        }
        Ok(draft)
    }
}

impl Default for TestCaseDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCaseDraft {
    /// An empty draft with a single blank step.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            prerequisites: String::new(),
            tags: Vec::new(),
            steps: vec![Step::new(1)],
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, id: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn step_mut(&mut self, id: u32) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.id == id)
    }

    /// Appends a blank step and returns its id (one past the highest id).
    pub fn add_step(&mut self) -> Result<u32, DraftError> {
        let id = match self.steps.iter().map(|s| s.id).max() {
            Some(max) => max.checked_add(1).ok_or(DraftError::StepIdsExhausted)?,
            None => 1,
        };
        self.steps.push(Step::new(id));
        log::debug!("[TESTCASE] Added step {}", id);
        Ok(id)
    }

    /// Removes a step. A test case always keeps at least one.
    pub fn remove_step(&mut self, id: u32) -> Result<Step, DraftError> {
        let index = self
            .steps
            .iter()
            .position(|s| s.id == id)
            .ok_or(DraftError::UnknownStep(id))?;
        if self.steps.len() <= 1 {
            return Err(DraftError::LastStep);
        }
        log::debug!("[TESTCASE] Removed step {}", id);
        Ok(self.steps.remove(index))
    }

    pub fn add_tag(&mut self, raw: &str) -> Result<(), TagError> {
        let tag = raw.trim();
        if tag.is_empty() {
            return Err(TagError::Empty);
        }
        if self.tags.iter().any(|t| t == tag) {
            return Err(TagError::Duplicate(tag.to_string()));
        }
        if self.tags.len() >= MAX_TAGS {
            return Err(TagError::LimitReached);
        }
        self.tags.push(tag.to_string());
        Ok(())
    }

    /// Returns whether the tag was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Stores a successful capture on a step.
    ///
    /// A failed capture leaves the step untouched and comes back as
    /// `DraftError::Capture`, whose message is ready to show the user.
    pub fn attach_capture(
        &mut self,
        step_id: u32,
        result: CaptureResult,
    ) -> Result<(), DraftError> {
        let step = self
            .step_mut(step_id)
            .ok_or(DraftError::UnknownStep(step_id))?;

        match result {
            CaptureResult::Success { image_data } => {
                step.screenshot = Some(image_data);
                log::info!("[TESTCASE] Screenshot attached to step {}", step_id);
                Ok(())
            }
            CaptureResult::Failure { reason } => Err(DraftError::Capture(reason)),
        }
    }

    /// Drops a step's screenshot, returning it if there was one.
    pub fn remove_screenshot(&mut self, step_id: u32) -> Result<Option<String>, DraftError> {
        let step = self
            .step_mut(step_id)
            .ok_or(DraftError::UnknownStep(step_id))?;
        Ok(step.screenshot.take())
    }

    /// `"<title> (<n> steps)"`
    pub fn summary(&self) -> String {
        format!("{} ({} steps)", self.title, self.steps.len())
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Test case must have at least one step")]
    LastStep,

    #[error("No step with id {0}")]
    UnknownStep(u32),

    #[error("Test case has no steps")]
    NoSteps,

    #[error("Step id {0} is used more than once")]
    DuplicateStepId(u32),

    #[error("No step ids left")]
    StepIdsExhausted,

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("{}", capture_failure_message(.0))]
    Capture(ErrorKind),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TagError {
    #[error("Tag is empty")]
    Empty,

    #[error("Tag already exists: {0}")]
    Duplicate(String),

    #[error("Maximum 5 tags allowed")]
    LimitReached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_has_one_blank_step() {
        let draft = TestCaseDraft::new();
        assert_eq!(draft.steps().len(), 1);
        assert_eq!(draft.steps()[0], Step::new(1));
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn step_ids_continue_after_highest() {
        let mut draft = TestCaseDraft::new();
        assert_eq!(draft.add_step(), Ok(2));
        assert_eq!(draft.add_step(), Ok(3));
        draft.remove_step(2).unwrap();
        assert_eq!(draft.add_step(), Ok(4));
    }

    #[test]
    fn last_step_cannot_be_removed() {
        let mut draft = TestCaseDraft::new();
        assert_eq!(draft.remove_step(1), Err(DraftError::LastStep));
        assert_eq!(draft.remove_step(9), Err(DraftError::UnknownStep(9)));
    }

    #[test]
    fn tags_are_trimmed_unique_and_capped() {
        let mut draft = TestCaseDraft::new();
        draft.add_tag("  smoke ").unwrap();
        assert_eq!(draft.tags(), ["smoke"]);
        assert_eq!(
            draft.add_tag("smoke"),
            Err(TagError::Duplicate("smoke".into()))
        );
        assert_eq!(draft.add_tag("   "), Err(TagError::Empty));

        for tag in ["a", "b", "c", "d"] {
            draft.add_tag(tag).unwrap();
        }
        assert_eq!(draft.add_tag("e"), Err(TagError::LimitReached));

        assert!(draft.remove_tag("b"));
        assert!(!draft.remove_tag("b"));
        draft.add_tag("e").unwrap();
    }

    #[test]
    fn failed_capture_leaves_step_alone() {
        let mut draft = TestCaseDraft::new();
        let err = draft
            .attach_capture(
                1,
                CaptureResult::Failure {
                    reason: ErrorKind::PermissionDenied,
                },
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission denied. Please allow screen capture to take screenshots."
        );
        assert_eq!(draft.step(1).unwrap().screenshot, None);
    }

    #[test]
    fn screenshot_attach_and_remove() {
        let mut draft = TestCaseDraft::new();
        draft
            .attach_capture(
                1,
                CaptureResult::Success {
                    image_data: "data:image/png;base64,AAAA".into(),
                },
            )
            .unwrap();
        assert_eq!(
            draft.remove_screenshot(1).unwrap().as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(draft.remove_screenshot(1).unwrap(), None);
        assert_eq!(draft.remove_screenshot(5), Err(DraftError::UnknownStep(5)));
    }

    #[test]
    fn serializes_like_the_form_state() {
        let draft = TestCaseDraft::new();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["priority"], "Medium");
        assert_eq!(json["steps"][0]["expectedResult"], "");
        assert!(json["steps"][0]["screenshot"].is_null());
    }

    fn draft_json(tags: &str, steps: &str) -> String {
        format!(
            r#"{{"title":"T","description":"","priority":"High","prerequisites":"","tags":{},"steps":{}}}"#,
            tags, steps
        )
    }

    const ONE_STEP: &str =
        r#"[{"id":1,"description":"d","expectedResult":"e","screenshot":null}]"#;

    #[test]
    fn well_formed_json_round_trips() {
        let mut draft = TestCaseDraft::new();
        draft.title = "T".to_string();
        draft.add_tag("smoke").unwrap();
        draft.add_step().unwrap();

        let json = serde_json::to_string(&draft).unwrap();
        let parsed: TestCaseDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
    }

    #[test]
    fn json_without_steps_is_rejected() {
        let err = serde_json::from_str::<TestCaseDraft>(&draft_json("[]", "[]")).unwrap_err();
        assert!(err.to_string().contains("Test case has no steps"), "{}", err);
    }

    #[test]
    fn json_with_duplicate_or_excess_tags_is_rejected() {
        let dup = draft_json(r#"["a","a"]"#, ONE_STEP);
        let err = serde_json::from_str::<TestCaseDraft>(&dup).unwrap_err();
        assert!(err.to_string().contains("Tag already exists: a"), "{}", err);

        let six = draft_json(r#"["a","b","c","d","e","f"]"#, ONE_STEP);
        let err = serde_json::from_str::<TestCaseDraft>(&six).unwrap_err();
        assert!(err.to_string().contains("Maximum 5 tags allowed"), "{}", err);

        let blank = draft_json(r#"["  "]"#, ONE_STEP);
        assert!(serde_json::from_str::<TestCaseDraft>(&blank).is_err());
    }

    #[test]
    fn json_with_duplicate_step_ids_is_rejected() {
        let steps = r#"[{"id":3,"description":"","expectedResult":"","screenshot":null},
                        {"id":3,"description":"","expectedResult":"","screenshot":null}]"#;
        let err = serde_json::from_str::<TestCaseDraft>(&draft_json("[]", steps)).unwrap_err();
        assert!(err.to_string().contains("Step id 3 is used more than once"), "{}", err);
    }

    #[test]
    fn json_with_maximal_step_id_is_rejected() {
        let steps = r#"[{"id":4294967295,"description":"","expectedResult":"","screenshot":null}]"#;
        let err = serde_json::from_str::<TestCaseDraft>(&draft_json("[]", steps)).unwrap_err();
        assert!(err.to_string().contains("No step ids left"), "{}", err);
    }

    #[test]
    fn add_step_reports_exhausted_ids() {
        let mut draft = TestCaseDraft::new();
        draft.step_mut(1).unwrap().id = u32::MAX;
        assert_eq!(draft.add_step(), Err(DraftError::StepIdsExhausted));
        assert_eq!(draft.steps().len(), 1);
    }
}
