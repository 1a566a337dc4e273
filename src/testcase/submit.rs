//! Simulated submission. Nothing is stored; the draft is validated, a short
//! delay stands in for the round trip, and the form is reset.

use super::draft::TestCaseDraft;
use super::validate::ValidationErrors;
use std::time::Duration;

/// Delay used by the authoring UI.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1500);

/// Validates and "submits" the draft, returning its summary line.
///
/// On validation failure the draft is left as it was.
pub async fn submit(
    draft: &mut TestCaseDraft,
    delay: Duration,
) -> Result<String, ValidationErrors> {
    if let Err(errors) = draft.validate() {
        log::warn!("[TESTCASE] Submit rejected: {}", errors);
        return Err(errors);
    }

    tokio::time::sleep(delay).await;

    let summary = draft.summary();
    log::info!("[TESTCASE] Test case created: {}", summary);
    draft.reset();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submit_returns_summary_and_resets() {
        let mut draft = TestCaseDraft::new();
        draft.title = "Checkout".to_string();
        draft.add_tag("payments").unwrap();
        for id in [1, draft.add_step().unwrap()] {
            let step = draft.step_mut(id).unwrap();
            step.description = format!("step {}", id);
            step.expected_result = "ok".to_string();
        }

        let summary = submit(&mut draft, Duration::ZERO).await.unwrap();
        assert_eq!(summary, "Checkout (2 steps)");
        assert_eq!(draft, TestCaseDraft::new());
    }

    #[tokio::test]
    async fn invalid_draft_is_kept() {
        let mut draft = TestCaseDraft::new();
        draft.title = "Half done".to_string();
        let before = draft.clone();

        let errors = submit(&mut draft, Duration::ZERO).await.unwrap_err();
        assert!(errors.title.is_none());
        assert_eq!(errors.steps.len(), 1);
        assert_eq!(draft, before);
    }
}
