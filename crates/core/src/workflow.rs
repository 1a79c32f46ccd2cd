//! Draft workflow tracker.
//!
//! An [`AuthoringSession`] is a plain value: the caller loads it, passes it
//! to [`advance`] together with an [`Action`], and persists the session
//! returned in the [`StepOutcome`]. Failed steps still return a session so
//! the caller can store the user-visible error alongside any partial
//! progress.
//!
//! Step numbering follows the five prompt slots: after `Generate` the
//! tracker sits on step 1, each successful `Refine` consumes prompt
//! `current_step` and moves one step forward, and step 6 means every prompt
//! has been used.

use serde::{Deserialize, Serialize};

use crate::grammar::{self, DEFAULT_LANGUAGE};
use crate::prompts;
use crate::publication::contains_error_marker;
use crate::services::{GrammarChecker, ServiceError, TextGenerator};
use crate::types::Timestamp;

/// Number of prompt slots an author can fill.
pub const MAX_PROMPTS: usize = 5;

/// Step the tracker returns to on every `Generate`.
pub const FIRST_STEP: u8 = 1;

// ---------------------------------------------------------------------------
// Session value
// ---------------------------------------------------------------------------

/// One iteration of generated or refined article text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub content: String,
}

/// Position of the tracker within the refinement sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// 1-based prompt number the next refine will use (1..=6).
    pub current_step: u8,
    /// Whether the current draft has been through the grammar service.
    pub grammar_checked: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            current_step: FIRST_STEP,
            grammar_checked: false,
        }
    }
}

impl WorkflowState {
    /// Every prompt slot has been consumed by a refine.
    pub fn prompts_exhausted(&self) -> bool {
        usize::from(self.current_step) > MAX_PROMPTS
    }
}

/// Form fields echoed back to the author between steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoringInputs {
    pub topic: String,
    pub primary_keyword: String,
    pub additional_keywords: String,
    /// Prompt slots 1..=5, stored 0-based.
    pub prompts: Vec<String>,
    pub feedback: String,
}

impl AuthoringInputs {
    /// Non-empty prompt number `number` (1-based).
    pub fn prompt(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.prompts.get(index))
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }

    /// Trim every field and cap the prompt list at [`MAX_PROMPTS`].
    pub fn normalized(mut self) -> Self {
        self.topic = self.topic.trim().to_string();
        self.primary_keyword = self.primary_keyword.trim().to_string();
        self.additional_keywords = self.additional_keywords.trim().to_string();
        self.feedback = self.feedback.trim().to_string();
        self.prompts.truncate(MAX_PROMPTS);
        for prompt in &mut self.prompts {
            *prompt = prompt.trim().to_string();
        }
        self
    }
}

/// Everything the authoring page needs between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoringSession {
    pub inputs: AuthoringInputs,
    pub drafts: Vec<Draft>,
    pub state: WorkflowState,
    pub grammar_result: Option<String>,
    pub error: Option<String>,
    pub updated_at: Option<Timestamp>,
}

impl AuthoringSession {
    /// The draft every action operates on.
    pub fn current_draft(&self) -> Option<&Draft> {
        self.drafts.last()
    }

    /// Replace the content of the last draft. No-op when there is none.
    pub fn replace_current_draft(&mut self, content: String) {
        if let Some(last) = self.drafts.last_mut() {
            last.content = content;
        }
    }

    /// Return to the empty session shown on first visit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Actions and errors
// ---------------------------------------------------------------------------

/// A step the author can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Generate,
    Refine,
    CheckGrammar,
}

/// Recoverable workflow failures. `Display` is the message shown to the
/// author.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Required input missing or step not allowed yet.
    #[error("{0}")]
    Validation(String),

    /// The text generator failed.
    #[error("{0}")]
    Generation(String),

    /// The grammar service failed.
    #[error("{0}")]
    GrammarService(String),

    /// A publish date could not be parsed.
    #[error("{0}")]
    DateFormat(String),

    /// The spreadsheet store or blog platform rejected a write.
    #[error("{0}")]
    ExternalWrite(String),
}

impl WorkflowError {
    /// Stable machine-readable code for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "validation_error",
            WorkflowError::Generation(_) => "generation_error",
            WorkflowError::GrammarService(_) => "grammar_service_error",
            WorkflowError::DateFormat(_) => "date_format_error",
            WorkflowError::ExternalWrite(_) => "external_write_error",
        }
    }
}

/// Result of one [`advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub session: AuthoringSession,
    pub error: Option<WorkflowError>,
}

impl StepOutcome {
    fn ok(session: AuthoringSession) -> Self {
        Self {
            session,
            error: None,
        }
    }

    /// Record `error` on the session and return both.
    fn failed(mut session: AuthoringSession, error: WorkflowError) -> Self {
        session.error = Some(error.to_string());
        Self {
            session,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Run one workflow action against `session`.
///
/// The previous step's error message is cleared before the action runs.
pub async fn advance(
    action: Action,
    mut session: AuthoringSession,
    generator: &dyn TextGenerator,
    grammar: &dyn GrammarChecker,
) -> StepOutcome {
    session.error = None;
    match action {
        Action::Generate => generate(session, generator).await,
        Action::Refine => refine(session, generator).await,
        Action::CheckGrammar => check_grammar(session, grammar).await,
    }
}

async fn generate(mut session: AuthoringSession, generator: &dyn TextGenerator) -> StepOutcome {
    session.drafts.clear();
    session.state = WorkflowState::default();
    session.grammar_result = None;

    let inputs = &session.inputs;
    let opening_prompt = match inputs.prompt(1) {
        Some(p) if !inputs.topic.is_empty() && !inputs.primary_keyword.is_empty() => p,
        _ => {
            return StepOutcome::failed(
                session,
                WorkflowError::Validation(
                    "Please provide a topic, primary keyword, and at least Prompt 1.".into(),
                ),
            );
        }
    };

    let prompt = prompts::generation_prompt(
        opening_prompt,
        &inputs.primary_keyword,
        &inputs.additional_keywords,
    );

    match generator.generate(&prompt).await {
        Ok(text) => {
            session.drafts.push(Draft {
                content: text.trim().to_string(),
            });
            StepOutcome::ok(session)
        }
        Err(e) => StepOutcome::failed(
            session,
            WorkflowError::Generation(format!("Error generating content: {e}")),
        ),
    }
}

async fn refine(mut session: AuthoringSession, generator: &dyn TextGenerator) -> StepOutcome {
    let Some(previous) = session.current_draft() else {
        return StepOutcome::failed(
            session,
            WorkflowError::Validation("No draft to refine. Please generate a draft first.".into()),
        );
    };

    if session.state.prompts_exhausted() {
        return StepOutcome::failed(
            session,
            WorkflowError::Validation("All prompts have been processed.".into()),
        );
    }

    let step = usize::from(session.state.current_step);
    let Some(step_prompt) = session.inputs.prompt(step) else {
        return StepOutcome::failed(
            session,
            WorkflowError::Validation(format!("Please provide feedback in Prompt {step}.")),
        );
    };

    let prompt = prompts::refinement_prompt(
        &previous.content,
        step_prompt,
        &session.inputs.primary_keyword,
        &session.inputs.additional_keywords,
        &session.inputs.feedback,
    );

    match generator.generate(&prompt).await {
        Ok(text) => {
            session.replace_current_draft(text.trim().to_string());
            session.state.current_step += 1;
            // The rewritten text has not been through the grammar service.
            session.state.grammar_checked = false;
            session.grammar_result = None;
            StepOutcome::ok(session)
        }
        Err(e) => StepOutcome::failed(
            session,
            WorkflowError::Generation(format!("Error refining content: {e}")),
        ),
    }
}

async fn check_grammar(mut session: AuthoringSession, grammar: &dyn GrammarChecker) -> StepOutcome {
    let Some(current) = session.current_draft() else {
        return StepOutcome::failed(
            session,
            WorkflowError::Validation("No draft to check. Please generate a draft first.".into()),
        );
    };

    if contains_error_marker(&current.content) {
        return StepOutcome::failed(
            session,
            WorkflowError::Validation("Cannot check grammar due to previous errors.".into()),
        );
    }

    let result = grammar_pass(&current.content, grammar).await;
    match result {
        Ok(pass) => {
            session.replace_current_draft(pass.text);
            session.grammar_result = Some(grammar::summarize(pass.edit_count));
            session.state.grammar_checked = true;
            StepOutcome::ok(session)
        }
        Err(e) => {
            let message = format!("Grammar check failed: {e}");
            session.grammar_result = Some(message.clone());
            StepOutcome::failed(session, WorkflowError::GrammarService(message))
        }
    }
}

/// Corrected text plus the number of edits the service reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarPass {
    pub text: String,
    pub edit_count: usize,
}

/// Check `text` with the grammar service and apply every suggested edit.
pub async fn grammar_pass(
    text: &str,
    grammar: &dyn GrammarChecker,
) -> Result<GrammarPass, ServiceError> {
    let edits = grammar.check(text, DEFAULT_LANGUAGE).await?;
    Ok(GrammarPass {
        text: grammar::apply(text, &edits),
        edit_count: edits.len(),
    })
}
